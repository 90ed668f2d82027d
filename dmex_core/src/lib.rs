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

//! Extraction engine for durable-medical-equipment orders.
//!
//! A note goes through [`classify`] against a priority-ordered
//! [`DeviceRegistry`], then the [`Extractor`] pulls the note-level fields and
//! dispatches to the [`DeviceHandler`] registered for the classified device.

use async_trait::async_trait;

pub mod classify;
pub mod device;
pub mod error;
pub mod extract;
pub mod processor;
pub mod util;

pub use classify::{UNKNOWN_DEVICE, classify};
pub use device::{DEFAULT_PRIORITY, DeviceDefinition, DeviceRegistry, RegistryFallback};
pub use error::{ExtractError, Result};
pub use extract::handlers::{CpapHandler, DeviceHandler, HandlerRegistry, NoopHandler, OxygenHandler};
pub use extract::result::ExtractionResult;
pub use extract::Extractor;
pub use processor::{Processor, read_and_extract};

/// Supplies the raw text of a physician note.
#[async_trait]
pub trait NoteSource: Send + Sync {
    async fn read_note(&self) -> anyhow::Result<String>;
}

/// Receives a finished extraction for delivery downstream.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn submit(&self, order: &ExtractionResult) -> anyhow::Result<()>;
}
