//! Pairing-token persistence.
//!
//! The TV issues a token (`client-key`) the first time the user accepts the
//! pairing prompt.  Sending it back on later registrations skips the prompt,
//! so it is stored between runs.  The whole persisted state is one JSON
//! object:
//!
//! ```json
//! {
//!   "clientKey": "abc123"
//! }
//! ```
//!
//! [`FileTokenStore`] keeps it at an injectable path, by default in the
//! platform config directory:
//! - Windows:  `%APPDATA%\tvctl\credentials.json`
//! - Linux:    `~/.config/tvctl/credentials.json`
//! - macOS:    `~/Library/Application Support/tvctl/credentials.json`
//!
//! [`MemoryTokenStore`] keeps it in memory for tests and embedders that
//! manage persistence themselves.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for credential file operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing credentials at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid credential JSON.
    #[error("failed to parse credentials: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads and saves the pairing token.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` on first run.
    fn load(&self) -> Result<Option<String>, CredentialError>;

    /// Replaces the stored token.
    fn save(&self, token: &str) -> Result<(), CredentialError>;
}

/// On-disk schema.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(rename = "clientKey", default, skip_serializing_if = "Option::is_none")]
    client_key: Option<String>,
}

// ── File store ────────────────────────────────────────────────────────────────

/// Token store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NoPlatformConfigDir`] when the base
    /// directory cannot be determined from the environment.
    pub fn at_default_location() -> Result<Self, CredentialError> {
        Ok(Self::new(default_credentials_path()?))
    }

    /// The file this store uses.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    /// A missing file means "never paired" and is not an error.
    fn load(&self) -> Result<Option<String>, CredentialError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let stored: StoredCredentials = serde_json::from_str(&content)?;
                Ok(stored.client_key.filter(|key| !key.is_empty()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CredentialError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| CredentialError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let stored = StoredCredentials {
            client_key: Some(token.to_string()),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, content).map_err(|source| CredentialError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Token store that keeps the token in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store (first-run behaviour).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Returns the current token.
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.token())
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }
}

// ── Default location ──────────────────────────────────────────────────────────

/// Resolves the default credential file path.
///
/// # Errors
///
/// Returns [`CredentialError::NoPlatformConfigDir`] if the base directory
/// cannot be determined.
pub fn default_credentials_path() -> Result<PathBuf, CredentialError> {
    platform_config_dir()
        .map(|dir| dir.join("credentials.json"))
        .ok_or(CredentialError::NoPlatformConfigDir)
}

/// Resolves the platform config base directory plus the `tvctl` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("tvctl"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("tvctl")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("tvctl"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
