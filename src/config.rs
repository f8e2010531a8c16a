//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "https://approval-v2.onrender.com";
pub const DEFAULT_POLL_ATTEMPTS: u32 = 6;
pub const DEFAULT_POLL_DELAY_MS: u64 = 1200;
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub poll_attempts: u32,
    pub poll_delay: Duration,
    pub upcoming_days: u32,
    pub session_path: PathBuf,
    pub logs_path: PathBuf,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_delay: Duration::from_millis(DEFAULT_POLL_DELAY_MS),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            session_path: PathBuf::from("data/session.json"),
            logs_path: PathBuf::from("logs"),
        }
    }

    /// Overrides defaults with whatever is set in the environment.
    pub fn load(&mut self) -> Result<(), AppError> {
        if let Ok(base) = std::env::var("API_BASE")
            && !base.trim().is_empty()
        {
            self.api_base = base.trim().trim_end_matches('/').to_string();
        }

        self.poll_attempts = std::env::var("POLL_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_POLL_ATTEMPTS);
        if self.poll_attempts == 0 {
            return Err(AppError::InvalidConfig {
                key: "POLL_ATTEMPTS".to_string(),
                value: "0".to_string(),
            });
        }

        self.poll_delay = std::env::var("POLL_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(Duration::from_millis(DEFAULT_POLL_DELAY_MS), Duration::from_millis);

        self.upcoming_days = std::env::var("UPCOMING_DAYS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_UPCOMING_DAYS);

        if let Ok(path) = std::env::var("SESSION_PATH") {
            self.session_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LOGS_PATH") {
            self.logs_path = PathBuf::from(path);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
