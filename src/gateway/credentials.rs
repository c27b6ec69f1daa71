use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{GatewayError, Result};

/// Source of the API key used for paid operations
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether a key is available right now
    async fn has_selected_key(&self) -> bool;

    /// Run the interactive key selection step
    async fn open_select_key(&self) -> Result<()>;

    /// The key to send with requests
    async fn api_key(&self) -> Option<String>;
}

/// Key read from an environment variable, optionally overridden by a key
/// typed in at the terminal
pub struct EnvCredentials {
    env_var: String,
    interactive: bool,
    selected: RwLock<Option<String>>,
}

impl EnvCredentials {
    pub fn new<S: Into<String>>(env_var: S) -> Self {
        Self {
            env_var: env_var.into(),
            interactive: false,
            selected: RwLock::new(None),
        }
    }

    /// Allow prompting on stdin when no key is available
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    fn from_env(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    fn missing(&self) -> GatewayError {
        GatewayError::MissingCredential { env_var: self.env_var.clone() }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentials {
    async fn has_selected_key(&self) -> bool {
        self.api_key().await.is_some()
    }

    async fn open_select_key(&self) -> Result<()> {
        if !self.interactive {
            return Err(self.missing().into());
        }

        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(b"Video generation needs a billing-enabled API key.\nPaste key: ")
            .await?;
        stderr.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        let key = line.trim();
        if key.is_empty() {
            debug!("Key selection cancelled");
            return Err(self.missing().into());
        }

        *self.selected.write().await = Some(key.to_string());
        info!("🔑 API key selected");
        Ok(())
    }

    async fn api_key(&self) -> Option<String> {
        if let Some(key) = self.selected.read().await.clone() {
            return Some(key);
        }
        self.from_env()
    }
}

/// Fixed key, or none; selection installs the configured fallback
pub struct StaticCredentials {
    key: RwLock<Option<String>>,
    on_select: Option<String>,
}

impl StaticCredentials {
    pub fn new(key: Option<&str>) -> Self {
        Self {
            key: RwLock::new(key.map(str::to_string)),
            on_select: None,
        }
    }

    /// Key that the selection step will install
    pub fn selecting(mut self, key: &str) -> Self {
        self.on_select = Some(key.to_string());
        self
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn has_selected_key(&self) -> bool {
        self.key.read().await.is_some()
    }

    async fn open_select_key(&self) -> Result<()> {
        match &self.on_select {
            Some(key) => {
                *self.key.write().await = Some(key.clone());
                Ok(())
            }
            None => Err(GatewayError::MissingCredential { env_var: "static".to_string() }.into()),
        }
    }

    async fn api_key(&self) -> Option<String> {
        self.key.read().await.clone()
    }
}
