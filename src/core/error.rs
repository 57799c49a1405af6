use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Member '{0}' not found on '{1}'")]
    MemberNotFound(String, String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, HookError>;

impl<T> From<std::sync::PoisonError<T>> for HookError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for HookError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
