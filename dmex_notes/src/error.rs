use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NoteError>;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Cannot access physician note file: {}", path.display())]
    AccessDenied { path: PathBuf },

    #[error("Error reading physician note file: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
