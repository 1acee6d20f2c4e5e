//! Server configuration from command line and environment

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::Parser;
use flatstore::{StoreConfig, config::DEFAULT_READ_BUFFER_SIZE};

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 600;

/// Default request body limit
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Length of a generated token secret
const GENERATED_SECRET_LEN: usize = 32;

/// flatstore REST server
#[derive(Debug, Clone, Parser)]
#[command(name = "flatstore-server", version, about)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "FLATSTORE_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Directory holding courses.json, authors.json and users.json
    #[arg(long, env = "FLATSTORE_DATA_DIR", default_value = "bd")]
    pub data_dir: PathBuf,

    /// Secret for signing tokens and keying password digests
    ///
    /// When unset a random secret is generated, so tokens and stored
    /// passwords do not survive a restart.
    #[arg(long, env = "FLATSTORE_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Token lifetime in seconds
    #[arg(long, env = "FLATSTORE_TOKEN_TTL", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_secs: u64,

    /// Read buffer size for store scans
    #[arg(long, env = "FLATSTORE_READ_BUFFER", default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    pub read_buffer_size: usize,

    /// Let writers to the same store file run concurrently (last rename wins)
    #[arg(long, env = "FLATSTORE_CONCURRENT_WRITES")]
    pub concurrent_writes: bool,

    /// Allowed CORS origins
    #[arg(
        long = "cors-origin",
        env = "FLATSTORE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:4200"
    )]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes
    #[arg(long, env = "FLATSTORE_MAX_BODY", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("bd"),
            token_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            concurrent_writes: false,
            cors_origins: vec!["http://localhost:4200".to_string()],
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Configuration rooted at `data_dir` with defaults elsewhere
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Set the token secret
    pub fn with_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = Some(secret.into());
        self
    }

    /// Store settings derived from this configuration
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new()
            .with_read_buffer_size(self.read_buffer_size)
            .with_serialized_writers(!self.concurrent_writes)
    }

    pub fn courses_path(&self) -> PathBuf {
        self.store_path("courses.json")
    }

    pub fn authors_path(&self) -> PathBuf {
        self.store_path("authors.json")
    }

    pub fn users_path(&self) -> PathBuf {
        self.store_path("users.json")
    }

    fn store_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Configured secret, or fresh random bytes when none is set
    ///
    /// The second value tells whether the secret was generated.
    pub fn resolve_secret(&self) -> Result<(Vec<u8>, bool), getrandom::Error> {
        match &self.token_secret {
            Some(secret) if !secret.is_empty() => Ok((secret.as_bytes().to_vec(), false)),
            _ => {
                let mut secret = vec![0u8; GENERATED_SECRET_LEN];
                getrandom::fill(&mut secret)?;
                Ok((secret, true))
            }
        }
    }
}
