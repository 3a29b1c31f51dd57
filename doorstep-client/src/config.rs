//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::store::{FileStore, MemoryStore, SharedStore};

/// Client configuration for connecting to the marketplace API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://api.example.com")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the persisted session file; sessions live in
    /// memory only when unset
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            data_dir: None,
        }
    }

    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// - `DOORSTEP_API_URL` (required)
    /// - `DOORSTEP_TIMEOUT_SECS` (default 30)
    /// - `DOORSTEP_DATA_DIR` (optional)
    pub fn from_env() -> ClientResult<Self> {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("DOORSTEP_API_URL")
            .map_err(|_| ClientError::Config("DOORSTEP_API_URL must be set".into()))?;

        let mut config = Self::new(base_url);
        if let Some(timeout) = std::env::var("DOORSTEP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(dir) = std::env::var("DOORSTEP_DATA_DIR")
            && !dir.is_empty()
        {
            config.data_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the directory of the persisted session
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Path of the session file, if a data directory is configured
    pub fn session_file(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join("session.json"))
    }

    /// Open the session store this configuration describes
    pub fn open_session_store(&self) -> ClientResult<SharedStore> {
        match self.session_file() {
            Some(path) => {
                if let Some(dir) = &self.data_dir {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        ClientError::Store(format!("create {}: {e}", dir.display()))
                    })?;
                }
                tracing::info!(path = %path.display(), "Opening persisted session");
                Ok(Arc::new(FileStore::open(path)?))
            }
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<crate::http::NetworkHttpClient> {
        crate::http::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
