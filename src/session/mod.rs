//! Bearer token storage.
//!
//! The token is handed to the API client through a [`SessionStore`] injected
//! at start-up instead of being read from ambient global state.

use std::sync::RwLock;

use crate::session::error::SessionError;

pub mod error;
pub mod file_session;

pub use file_session::FileSession;

/// Holds at most one bearer token.
///
/// An empty token is the same as no token.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;

    fn is_signed_in(&self) -> bool {
        self.get().is_some()
    }
}

/// Session kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let session = Self::new();
        session.store(token);
        session
    }

    fn store(&self, token: &str) {
        let token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }
}

impl SessionStore for MemorySession {
    fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        self.store(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
