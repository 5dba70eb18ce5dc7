use thiserror::Error;

/// Failures raised while walking the virtual filesystem.
///
/// The payload is the absolute display path (`/home/user/x`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("No such file or directory: {0}")]
    NotFound(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("Is a directory: {0}")]
    IsADirectory(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid session config: {field} must not be empty")]
    Empty { field: &'static str },
}
