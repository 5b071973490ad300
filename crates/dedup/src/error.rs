use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (threshold out of range, empty window, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}
