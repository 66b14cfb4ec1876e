//! Configuration manager.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_LIFETIME: u64 = 60 * 15; // 15 minutes.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    #[serde(default)]
    pub name: String,
    /// Public URL of current instance.
    #[serde(default)]
    pub url: String,
    /// Socket address to listen on.
    #[serde(skip_serializing)]
    pub address: Option<String>,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to issued sessions.
    #[serde(default, skip_serializing)]
    pub session: Session,
    /// Related to Argon2 configuration.
    #[serde(skip_serializing)]
    pub argon2: Option<Argon2>,
    /// Administrator account created on start-up when missing.
    #[serde(skip_serializing)]
    pub admin: Option<Admin>,
}

/// Session configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Seconds between issuance and expiration.
    pub lifetime: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            lifetime: DEFAULT_SESSION_LIFETIME,
        }
    }
}

/// Argon2 configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Argon2 {
    /// Memory used while hashing.
    pub memory_cost: u32,
    /// Iterations of hash.
    pub iterations: u32,
    /// Parallelism degree.
    pub parallelism: u32,
    /// Output hash length.
    pub hash_length: usize,
}

impl Default for Argon2 {
    fn default() -> Self {
        Self {
            memory_cost: 1024 * 64, // 64 MiB.
            iterations: 4,
            parallelism: 2,
            hash_length: 32,
        }
    }
}

#[cfg(test)]
impl Argon2 {
    /// Cheapest valid parameters.
    pub fn fast() -> Self {
        Self {
            memory_cost: 64,
            iterations: 1,
            parallelism: 1,
            hash_length: 32,
        }
    }
}

/// Bootstrap administrator.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Normalizes a URL string by ensuring it starts with a valid scheme
    /// (`http` or `https`).
    fn normalize_url(&self, url: &str) -> Result<String, url::ParseError> {
        let url_with_scheme =
            if url.starts_with("http://") || url.starts_with("https://") {
                url.to_string()
            } else {
                format!("https://{url}")
            };

        let parsed_url = Url::parse(&url_with_scheme)?;
        Ok(parsed_url.to_string())
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Result<Arc<Self>, url::ParseError> {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(file_path) {
            Ok(file) => {
                let config: Configuration = match serde_yaml::from_reader(file)
                {
                    Ok(config) => config,
                    Err(err) => {
                        return Ok(Arc::new(self.error(err)));
                    },
                };

                Ok(Arc::new(self.finalize(config)?))
            },
            Err(err) => Ok(Arc::new(self.error(err))),
        }
    }

    /// Set version and normalize URLs of a freshly parsed configuration.
    fn finalize(
        &self,
        mut config: Configuration,
    ) -> Result<Configuration, url::ParseError> {
        config.version = VERSION.to_owned();
        config.path = self.path.clone();
        if !config.url.is_empty() {
            config.url = self.normalize_url(&config.url)?;
        }
        Ok(config)
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found or invalid");
        Self {
            version: VERSION.to_owned(),
            ..Default::default()
        }
    }
}
