//! Field extraction: note-level fields plus the device-specific pass.

use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod handlers;
pub mod patterns;
pub mod result;

use crate::classify::classify_folded;
use crate::device::DeviceRegistry;
use crate::error::{ExtractError, Result};
use crate::util::FoldedText;
use handlers::{DeviceHandler, HandlerRegistry};
use result::ExtractionResult;

/// Stateless extraction engine over a loaded device registry.
///
/// Holds only read-only data, so one instance can be shared across threads
/// behind an `Arc` and called concurrently.
#[derive(Debug)]
pub struct Extractor {
    registry: DeviceRegistry,
    handlers: HandlerRegistry,
}

impl Extractor {
    /// An extractor with the CPAP and oxygen handlers registered.
    #[must_use]
    pub fn new(registry: DeviceRegistry) -> Self {
        Self {
            registry,
            handlers: HandlerRegistry::with_defaults(),
        }
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn DeviceHandler>) -> Self {
        self.handlers.register(handler);
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Extract an order from `note`.
    ///
    /// Fails only on blank input; every missing field degrades to unset
    /// (or `"Unknown"` for device and provider).
    pub fn extract(&self, note: &str) -> Result<ExtractionResult> {
        if note.trim().is_empty() {
            warn!("Physician note is empty or null");
            return Err(ExtractError::InvalidInput);
        }

        debug!("Starting DME data extraction from physician note");
        let folded = FoldedText::new(note);

        let device = classify_folded(&folded, &self.registry);
        let mut result = ExtractionResult::new(device);
        result.ordering_provider = patterns::ordering_provider(note);
        result.patient_name = patterns::patient_name(note);
        result.date_of_birth = patterns::date_of_birth(note);
        result.diagnosis = patterns::diagnosis(note);

        self.handlers.get(device).extract(&folded, &mut result);

        info!("DME data extraction completed. Device: {}", result.device);
        Ok(result)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DeviceRegistry::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceDefinition;

    #[test]
    fn blank_input_is_rejected() {
        let extractor = Extractor::default();
        assert_eq!(extractor.extract(""), Err(ExtractError::InvalidInput));
        assert_eq!(extractor.extract(" \n\t "), Err(ExtractError::InvalidInput));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn wheelchair_gets_no_device_fields() {
        let extractor = Extractor::default();
        let result = extractor
            .extract("Wheelchair with 2 L seat cushion, full face humidifier, sleep")
            .expect("non-blank note should extract");
        assert_eq!(result.device, "Wheelchair");
        assert_eq!(result.liters, None);
        assert_eq!(result.usage, None);
        assert_eq!(result.mask_type, None);
        assert!(result.add_ons.is_empty());
        assert_eq!(result.qualifier, None);
    }

    struct WalkerHandler;

    impl DeviceHandler for WalkerHandler {
        fn device(&self) -> &'static str {
            "Walker"
        }

        fn extract(&self, note: &FoldedText<'_>, result: &mut ExtractionResult) {
            if note.contains("wheeled") {
                result.add_ons.insert("wheels".to_string());
            }
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn registered_handler_runs_for_configured_device() {
        let registry =
            DeviceRegistry::from_definitions(vec![DeviceDefinition::new("Walker", ["walker"], 1)]);
        let extractor = Extractor::new(registry).with_handler(Arc::new(WalkerHandler));

        let result = extractor
            .extract("Needs a wheeled walker. Dr. Wilson")
            .expect("non-blank note should extract");
        assert_eq!(result.device, "Walker");
        assert!(result.add_ons.contains("wheels"));
        assert_eq!(result.ordering_provider, "Dr. Wilson");
    }
}
