// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Setting `MYSQL_PUBLISHER_SYSTEM_HOST` points the tests at an existing
//! server; otherwise they start a container. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Default container image tag.
const DEFAULT_IMAGE_TAG: &str = "8.0";
/// Default server port for an external server.
const DEFAULT_PORT: u16 = 3306;
/// Default login user for an external server.
const DEFAULT_USER: &str = "root";
/// Default login password for an external server.
const DEFAULT_PASSWORD: &str = "root";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Host of an existing server; enables external mode.
    Host,
    /// Port of the existing server.
    Port,
    /// Login user for the existing server.
    User,
    /// Login password for the existing server.
    Password,
    /// `mysql` image tag used for containers.
    ImageTag,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "MYSQL_PUBLISHER_SYSTEM_HOST",
            Self::Port => "MYSQL_PUBLISHER_SYSTEM_PORT",
            Self::User => "MYSQL_PUBLISHER_SYSTEM_USER",
            Self::Password => "MYSQL_PUBLISHER_SYSTEM_PASSWORD",
            Self::ImageTag => "MYSQL_PUBLISHER_SYSTEM_IMAGE_TAG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Existing MySQL server to test against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalMysql {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
}

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Existing server, when configured.
    pub external: Option<ExternalMysql>,
    /// Container image tag.
    pub image_tag: String,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation.
    pub fn load() -> Result<Self, String> {
        Self::from_source(read_env_strict)
    }

    /// Loads configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is empty or fails validation.
    pub fn from_source(
        source: impl Fn(&str) -> Result<Option<String>, String>,
    ) -> Result<Self, String> {
        let read = |key: SystemTestEnv| read_nonempty(&source, key.as_str());
        let image_tag = read(SystemTestEnv::ImageTag)?.unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string());
        let Some(host) = read(SystemTestEnv::Host)? else {
            return Ok(Self {
                external: None,
                image_tag,
            });
        };
        let port = read(SystemTestEnv::Port)?
            .map(|value| parse_port(SystemTestEnv::Port.as_str(), &value))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);
        let user = read(SystemTestEnv::User)?.unwrap_or_else(|| DEFAULT_USER.to_string());
        let password =
            read(SystemTestEnv::Password)?.unwrap_or_else(|| DEFAULT_PASSWORD.to_string());
        Ok(Self {
            external: Some(ExternalMysql {
                host,
                port,
                user,
                password,
            }),
            image_tag,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads a variable and rejects empty values.
fn read_nonempty(
    source: &impl Fn(&str) -> Result<Option<String>, String>,
    name: &str,
) -> Result<Option<String>, String> {
    match source(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a non-zero TCP port.
fn parse_port(name: &str, raw: &str) -> Result<u16, String> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(format!("{name} must be a TCP port between 1 and 65535")),
    }
}
