use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Physician note cannot be empty or whitespace")]
    InvalidInput,
}
