//! Session persisted to a JSON file so it survives between CLI invocations.

use std::path::Path;
use std::path::PathBuf;
use std::sync::RwLock;

use log::debug;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::session::SessionStore;
use crate::session::error::SessionError;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    access_token: String,
}

pub struct FileSession {
    path: PathBuf,
    token: RwLock<Option<String>>,
}

impl FileSession {
    /// Opens the session at `path`, loading a token if one was saved.
    ///
    /// A file that cannot be read or parsed is treated as signed out.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let token = if path.exists() {
            Self::load(&path)
        } else {
            None
        };

        debug!(
            "Opened session at `{}` (signed in: {})",
            path.to_string_lossy(),
            token.is_some()
        );
        Ok(Self {
            path,
            token: RwLock::new(token),
        })
    }

    /// Reads the saved token. Anything unreadable counts as signed out.
    fn load(path: &Path) -> Option<String> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file `{}`: {e}",
                    path.to_string_lossy()
                );
                return None;
            }
        };
        match serde_json::from_str::<SessionFile>(&raw) {
            Ok(file) => Some(file.access_token).filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!(
                    "Ignoring malformed session file `{}`: {e}",
                    path.to_string_lossy()
                );
                None
            }
        }
    }

        pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.to_string_lossy().to_string(),
            source,
        }
    }
}

impl SessionStore for FileSession {
    fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return self.clear();
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_string(&SessionFile {
            access_token: token.to_string(),
        })?;
        std::fs::write(&self.path, body).map_err(|e| self.io_error(e))?;

        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
        }
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
