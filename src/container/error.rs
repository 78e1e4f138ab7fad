use std::io;

use thiserror::Error;

/// Errors surfaced by container decoding and directory creation.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container file unreadable or unwritable")]
    Io(#[from] io::Error),
    #[error("malformed container: {0}")]
    Format(String),
    #[error("invalid path `{0}`: {1}")]
    InvalidPath(String, &'static str),
    #[error("cannot create directory `{0}`: no such parent directory")]
    MissingParent(String),
}
