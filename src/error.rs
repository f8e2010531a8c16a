#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration error: {msg}")]
    ConfigurationError { msg: String },

    #[error("Invalid config value \"{value}\" for key \"{key}\"")]
    InvalidConfig { key: String, value: String },
}
