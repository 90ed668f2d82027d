//! Static strategy pattern for CLI commands.
//!
//! Each command is its own strategy type with its own input, dispatched
//! statically from `main`.

use dmex_config::Config;
use dmex_core::{DeviceRegistry, Extractor, RegistryFallback};
use dmex_notes::FileNoteReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod extract;
mod info;
mod init;
mod process;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use process::{ProcessInput, ProcessStrategy};
pub use version::VersionStrategy;

/// Contract for all command strategies.
///
/// Each strategy defines its own input type, so parameters reach the command
/// without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

fn registry_for(config: &Config) -> DeviceRegistry {
    let registry = config.device_registry();
    match registry.fallback() {
        Some(RegistryFallback::Missing) => {
            info!("No device configuration found. Using built-in device definitions.");
        }
        Some(reason) => warn!("Using built-in device definitions: {reason}"),
        None => {}
    }
    registry
}

/// Extractor over the configured device registry and the built-in handlers.
fn extractor_for(config: &Config) -> Arc<Extractor> {
    Arc::new(Extractor::new(registry_for(config)))
}

/// Reader for `note`, or the configured note path when none is given.
fn note_reader(config: &Config, note: Option<PathBuf>) -> FileNoteReader {
    let path = note.unwrap_or_else(|| config.note_path.clone());
    FileNoteReader::new(path)
}
