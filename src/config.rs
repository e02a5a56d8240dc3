//! Environment-driven client configuration.
//!
//! The backend location is chosen by deployment environment, with an
//! optional explicit override:
//!
//! | Variable            | Meaning                                      |
//! |---------------------|----------------------------------------------|
//! | `MONALISA_ENV`      | `development` (default) or `production`      |
//! | `MONALISA_BASE_URL` | Overrides the environment's default base URL |

use core::fmt;
use core::str::FromStr;

use crate::error::{MonalisaError, Result};

/// Environment variable selecting the deployment environment.
pub const ENV_VAR: &str = "MONALISA_ENV";

/// Environment variable overriding the base URL.
pub const BASE_URL_VAR: &str = "MONALISA_BASE_URL";

/// Base URL of a locally running backend.
const DEVELOPMENT_BASE_URL: &str = "http://localhost:8000";

/// Base URL of the hosted backend.
const PRODUCTION_BASE_URL: &str = "https://api.monalisa.app";

/// Deployment environment of the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Local backend on port 8000.
    #[default]
    Development,
    /// Hosted backend.
    Production,
}

impl Environment {
    /// Returns the default base URL for this environment.
    #[inline]
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }

    /// Returns the canonical name of this environment.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = MonalisaError;

    #[inline]
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(MonalisaError::Config(format!(
                "unknown environment {other:?} (expected development or production)"
            ))),
        }
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Selected environment.
    pub environment: Environment,
    /// Explicit base URL, taking precedence over the environment default.
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`MonalisaError::Config`] if `MONALISA_ENV` names an unknown
    /// environment.
    #[inline]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`MonalisaError::Config`] if the environment name is unknown.
    #[inline]
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let environment = non_empty(ENV_VAR)
            .map(|raw| raw.parse::<Environment>())
            .transpose()?
            .unwrap_or_default();
        let base_url = non_empty(BASE_URL_VAR);
        tracing::debug!(%environment, has_override = base_url.is_some(), "resolved configuration");
        Ok(Self {
            environment,
            base_url,
        })
    }

    /// Returns the base URL requests are sent to.
    #[inline]
    #[must_use]
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}
