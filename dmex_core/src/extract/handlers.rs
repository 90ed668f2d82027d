//! Device-specific extraction strategies, looked up by device name.
//!
//! Adding support for a device means implementing [`DeviceHandler`] and
//! registering it; the dispatch in [`crate::Extractor`] never changes.
//! Devices without a handler (configured-only devices such as a wheelchair)
//! resolve to [`NoopHandler`].

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::patterns::{AHI_VALUE, FLOW_RATE, capture};
use super::result::ExtractionResult;
use crate::device::{CPAP, OXYGEN_TANK};
use crate::util::FoldedText;

/// Extracts the fields that only make sense for one kind of device.
pub trait DeviceHandler: Send + Sync {
    /// The device name this handler is registered under.
    fn device(&self) -> &str;

    /// Fill device-specific fields of `result`. Must not touch fields that
    /// belong to other devices.
    fn extract(&self, note: &FoldedText<'_>, result: &mut ExtractionResult);
}

/// Handler for devices with no specific fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl DeviceHandler for NoopHandler {
    fn device(&self) -> &'static str {
        ""
    }

    fn extract(&self, _note: &FoldedText<'_>, result: &mut ExtractionResult) {
        debug!("No specific extraction logic for device type: {}", result.device);
    }
}

static NOOP: NoopHandler = NoopHandler;

/// Mask type, humidifier add-on and AHI qualifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpapHandler;

impl CpapHandler {
    /// More specific phrases come before the generic ones they contain.
    const MASK_TYPES: [&'static str; 3] = ["full face", "nasal pillow", "nasal"];
    const HUMIDIFIERS: [&'static str; 2] = ["heated humidifier", "humidifier"];
    const AHI_THRESHOLD: &'static str = "AHI > 20";

    fn qualifier(note: &FoldedText<'_>) -> Option<String> {
        if note.contains(Self::AHI_THRESHOLD) {
            return Some(Self::AHI_THRESHOLD.to_string());
        }
        if note.contains("AHI:") {
            return capture(&AHI_VALUE, note.raw()).map(|value| format!("AHI: {value}"));
        }
        None
    }
}

impl DeviceHandler for CpapHandler {
    fn device(&self) -> &'static str {
        CPAP
    }

    fn extract(&self, note: &FoldedText<'_>, result: &mut ExtractionResult) {
        debug!("Extracting CPAP-specific data");

        if let Some(mask) = Self::MASK_TYPES.iter().find(|m| note.contains(m)) {
            debug!("Identified CPAP mask type: {mask}");
            result.mask_type = Some((*mask).to_string());
        }

        // The humidifier variants are exclusive: record at most one.
        if let Some(add_on) = Self::HUMIDIFIERS.iter().find(|h| note.contains(h)) {
            debug!("Identified CPAP add-on: {add_on}");
            result.add_ons.insert((*add_on).to_string());
        }

        if let Some(qualifier) = Self::qualifier(note) {
            debug!("Identified CPAP qualifier: {qualifier}");
            result.qualifier = Some(qualifier);
        }
    }
}

/// Flow rate and usage scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxygenHandler;

impl OxygenHandler {
    /// Reported in this order, not in order of appearance.
    const USAGE_SCENARIOS: [&'static str; 4] = ["sleep", "exertion", "continuous", "as needed"];
}

impl DeviceHandler for OxygenHandler {
    fn device(&self) -> &'static str {
        OXYGEN_TANK
    }

    fn extract(&self, note: &FoldedText<'_>, result: &mut ExtractionResult) {
        debug!("Extracting Oxygen Tank-specific data");

        if let Some(rate) = capture(&FLOW_RATE, note.raw()) {
            let liters = format!("{rate} L");
            debug!("Identified oxygen flow rate: {liters}");
            result.liters = Some(liters);
        }

        let scenarios: Vec<&str> = Self::USAGE_SCENARIOS
            .into_iter()
            .filter(|s| note.contains(s))
            .collect();
        if !scenarios.is_empty() {
            let usage = scenarios.join(" and ");
            debug!("Identified oxygen usage: {usage}");
            result.usage = Some(usage);
        }
    }
}

/// Device name to handler lookup.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn DeviceHandler>>,
}

impl HandlerRegistry {
    /// A registry with no handlers; every device resolves to [`NoopHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The CPAP and oxygen handlers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CpapHandler));
        registry.register(Arc::new(OxygenHandler));
        registry
    }

    /// Register `handler`, replacing any handler for the same device.
    pub fn register(&mut self, handler: Arc<dyn DeviceHandler>) {
        info!("Registering extraction handler: {}", handler.device());
        self.handlers.insert(handler.device().to_string(), handler);
    }

    #[must_use]
    pub fn get(&self, device: &str) -> &dyn DeviceHandler {
        match self.handlers.get(device) {
            Some(handler) => handler.as_ref(),
            None => &NOOP,
        }
    }

    #[must_use]
    pub fn contains(&self, device: &str) -> bool {
        self.handlers.contains_key(device)
    }

    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("devices", &self.list())
            .finish()
    }
}
