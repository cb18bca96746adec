use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("{0}")]
    UnsupportedMedia(String),

    #[error("{0}")]
    MediaTooLarge(String),
}

pub type Result<T> = std::result::Result<T, MatchlyError>;
