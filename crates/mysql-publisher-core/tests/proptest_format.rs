// crates/mysql-publisher-core/tests/proptest_format.rs
// ============================================================================
// Module: Formatting Property-Based Tests
// Description: Property tests for value formatting.
// Purpose: Detect panics and ordering bugs across wide input ranges.
// ============================================================================

//! Property-based tests for formatter invariants.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use mysql_publisher_core::MetricValue;
use mysql_publisher_core::format_value;
use mysql_publisher_core::runtime::format_float;
use proptest::prelude::*;

proptest! {
    #[test]
    fn int_arrays_keep_element_order(values in prop::collection::vec(any::<i64>(), 0 .. 16)) {
        let rendered = format_value(&MetricValue::IntArray(values.clone())).unwrap();
        let expected = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        prop_assert_eq!(rendered, expected);
    }

    #[test]
    fn finite_floats_round_trip(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let rendered = format_float(value);
        let parsed: f64 = rendered.parse().unwrap();
        prop_assert_eq!(parsed.to_bits(), value.to_bits());
    }

    #[test]
    fn strings_are_verbatim(text in ".*") {
        prop_assert_eq!(format_value(&MetricValue::String(text.clone())).unwrap(), text);
    }
}
