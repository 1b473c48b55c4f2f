//! Configuration manager for Encore.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 15 minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL: u64 = 900;
/// 15 days.
pub const DEFAULT_REFRESH_TOKEN_TTL: u64 = 15 * 86_400;
/// Expired rows stay queryable for audit this long before the retention
/// job drops them.
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name, also the JWT issuer.
    pub name: String,
    /// Domain name of current instance.
    pub url: String,
    /// Listening port. Default is 8080.
    pub port: Option<u16>,
    #[serde(default)]
    pub version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to token issuance configuration.
    #[serde(skip_serializing)]
    pub token: Option<Token>,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Token issuance configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Symmetric signing secret, at least 32 bytes.
    pub secret: String,
    /// Update token audience. Default is the instance URL.
    pub audience: Option<String>,
    /// Access-token lifetime in seconds.
    pub access_token_ttl: Option<u64>,
    /// Refresh-token lifetime in seconds.
    pub refresh_token_ttl: Option<u64>,
    /// Days expired refresh tokens are kept before deletion.
    pub retention_days: Option<u64>,
    /// Hardened replay handling: revoke every session of a user when a
    /// rotated token is presented again.
    #[serde(default)]
    pub revoke_on_reuse: bool,
}

impl Token {
    pub fn access_token_ttl(&self) -> u64 {
        self.access_token_ttl.unwrap_or(DEFAULT_ACCESS_TOKEN_TTL)
    }

    pub fn refresh_token_ttl(&self) -> u64 {
        self.refresh_token_ttl.unwrap_or(DEFAULT_REFRESH_TOKEN_TTL)
    }

    pub fn retention_secs(&self) -> u64 {
        self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS) * 86_400
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
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
                let mut config: Configuration =
                    match serde_yaml::from_reader(file) {
                        Ok(config) => config,
                        Err(err) => {
                            return Ok(Arc::new(self.error(err)));
                        },
                    };

                config.version = VERSION.to_owned();
                config.url = self.normalize_url(&config.url)?;

                Ok(Arc::new(config))
            },
            Err(err) => Ok(Arc::new(self.error(err))),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found");
        Self {
            version: VERSION.to_owned(),
            ..Default::default()
        }
    }
}
