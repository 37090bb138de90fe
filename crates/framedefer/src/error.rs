use thiserror::Error;

pub type DeferResult<T> = Result<T, DeferError>;

#[derive(Debug, Error)]
pub enum DeferError {
    /// Only produced by the strict constructor; the default one tolerates zero.
    #[error("max_count must be positive, got {0}")]
    InvalidMaxCount(u32),

    #[error("config error [{origin}]: {message}")]
    Config { origin: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
