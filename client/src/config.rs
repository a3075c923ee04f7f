//! Connector configuration.

use std::env;

/// Credentials identifying one backing-store project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Store project identifier; also the process-wide handle registry key
    pub project_id: String,
    /// API key for the store client
    pub api_key: String,
}

impl Credentials {
    /// Create credentials for a project.
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
        }
    }
}

/// Where to reach a local store emulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    pub host: String,
    pub port: u16,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
        }
    }
}

impl EmulatorConfig {
    /// Emulator at an explicit host and port.
    pub fn at(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Configuration for [`connect`](crate::connect).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub credentials: Credentials,
    /// When set, the backend is redirected at this emulator on connect
    pub emulator: Option<EmulatorConfig>,
}

impl StoreConfig {
    /// Configuration with the given credentials and no emulator redirect.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            emulator: None,
        }
    }

    /// Enable emulator redirection.
    pub fn with_emulator(mut self, emulator: EmulatorConfig) -> Self {
        self.emulator = Some(emulator);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// `RIPPLE_PROJECT_ID` and `RIPPLE_API_KEY` are required.
    /// `RIPPLE_EMULATOR_HOST` enables emulator redirection, with
    /// `RIPPLE_EMULATOR_PORT` defaulting to 8080.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id =
            env::var("RIPPLE_PROJECT_ID").map_err(|_| ConfigError::MissingProjectId)?;
        let api_key = env::var("RIPPLE_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

        let emulator = match env::var("RIPPLE_EMULATOR_HOST") {
            Ok(host) => {
                let port = env::var("RIPPLE_EMULATOR_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidEmulatorPort)?;
                Some(EmulatorConfig { host, port })
            }
            Err(_) => None,
        };

        let config = Self {
            credentials: Credentials::new(project_id, api_key),
            emulator,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        if self.credentials.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

/// Configuration errors. Fatal: the caller must fix its setup before retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("store project id is required")]
    MissingProjectId,

    #[error("store api key is required")]
    MissingApiKey,

    #[error("invalid emulator port value")]
    InvalidEmulatorPort,
}
