//! Keyword classification of a note against the device registry.

use tracing::{debug, info, warn};

use crate::device::DeviceRegistry;
use crate::util::FoldedText;

/// Returned when no configured keyword occurs in the note.
pub const UNKNOWN_DEVICE: &str = "Unknown";

/// Name of the first device, in registry order, with any keyword in the note.
///
/// First match wins: a lower-priority device is never returned while a
/// higher-priority one matches, wherever its keyword sits in the text.
#[must_use]
pub fn classify<'r>(note: &str, registry: &'r DeviceRegistry) -> &'r str {
    classify_folded(&FoldedText::new(note), registry)
}

pub(crate) fn classify_folded<'r>(note: &FoldedText<'_>, registry: &'r DeviceRegistry) -> &'r str {
    debug!(
        "Starting device type detection for note with {} characters",
        note.raw().len()
    );

    for device in registry.devices() {
        debug!(
            "Checking device: {} with priority {}",
            device.name, device.priority
        );
        for keyword in &device.keywords {
            if note.contains(keyword) {
                info!(
                    "Identified device type: {} (matched keyword: '{keyword}')",
                    device.name
                );
                return &device.name;
            }
            debug!("Keyword '{keyword}' not found for device {}", device.name);
        }
    }

    warn!("Could not identify device type from note. No configured keywords matched.");
    UNKNOWN_DEVICE
}
