#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Physician note input for the dmex pipeline.

pub mod error;
pub mod reader;

pub use error::NoteError;
pub use reader::{FALLBACK_NOTE, FileNoteReader, unwrap_json_note};
