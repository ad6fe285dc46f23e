use thiserror::Error;

pub type GenfResult<T> = Result<T, GenfError>;

#[derive(Debug, Error)]
pub enum GenfError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
