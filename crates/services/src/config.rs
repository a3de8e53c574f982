use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_DB_URL: &str = "sqlite://prep.sqlite3";
pub const DEFAULT_SESSION_KEY: &str = "user";
pub const DEFAULT_LOGIN_LATENCY: Duration = Duration::from_millis(1000);
pub const DEFAULT_CONTACT_LATENCY: Duration = Duration::from_millis(2000);

/// Runtime settings shared by the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    /// Storage key holding the serialized learner session.
    pub session_key: String,
    /// Simulated round trip for login and signup.
    pub login_latency: Duration,
    /// Simulated round trip for contact submissions.
    pub contact_latency: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            login_latency: DEFAULT_LOGIN_LATENCY,
            contact_latency: DEFAULT_CONTACT_LATENCY,
        }
    }
}

impl AppConfig {
    /// Defaults with every simulated delay removed.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            login_latency: Duration::ZERO,
            contact_latency: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read overrides through `lookup`.
    ///
    /// `PREP_DB_URL` and `PREP_SESSION_KEY` replace their defaults;
    /// `PREP_LATENCY_MS` sets both simulated delays.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a blank URL or key, or a latency
    /// that is not a whole number of milliseconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("PREP_DB_URL") {
            if raw.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "PREP_DB_URL",
                    raw,
                });
            }
            config.db_url = normalize_sqlite_url(raw);
        }

        if let Some(raw) = lookup("PREP_SESSION_KEY") {
            if raw.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "PREP_SESSION_KEY",
                    raw,
                });
            }
            config.session_key = raw.trim().to_string();
        }

        if let Some(raw) = lookup("PREP_LATENCY_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "PREP_LATENCY_MS",
                raw: raw.clone(),
            })?;
            config.login_latency = Duration::from_millis(millis);
            config.contact_latency = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

/// Accept bare file paths as well as `sqlite:` URLs.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite://{trimmed}")
    }
}
