//! Deployment environment detection
//!
//! `WIRESTACK_ENV` wins over `NODE_ENV`. Only the exact value `production`
//! counts as production; anything else, including no value at all, is a
//! development-style environment.

use std::fmt;

/// Primary environment variable
pub const ENV_VAR: &str = "WIRESTACK_ENV";

/// Fallback environment variable, honored for compatibility with JS tooling
pub const FALLBACK_ENV_VAR: &str = "NODE_ENV";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
    /// Any other label; treated like development
    Other(String),
}

impl Environment {
    /// Detect from the process environment
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var(ENV_VAR).ok(),
            std::env::var(FALLBACK_ENV_VAR).ok(),
        )
    }

    /// An empty primary value counts as unset and defers to the fallback
    fn resolve(primary: Option<String>, fallback: Option<String>) -> Self {
        let raw = primary.filter(|v| !v.is_empty()).or(fallback);
        Self::parse(raw.as_deref())
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Development,
            Some("production") => Self::Production,
            Some("development") => Self::Development,
            Some("test") => Self::Test,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
            Self::Test => f.write_str("test"),
            Self::Other(label) => f.write_str(label),
        }
    }
}
