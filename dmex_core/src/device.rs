//! Device definitions and the priority-ordered registry built from them.
//!
//! The registry is loaded once at startup. Configuration that is absent,
//! empty or unreadable never fails the load: the built-in device list takes
//! its place and the reason is kept on the registry for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Priority given to configured devices that omit one.
pub const DEFAULT_PRIORITY: i32 = 999;

pub const CPAP: &str = "CPAP";
pub const OXYGEN_TANK: &str = "Oxygen Tank";
pub const WHEELCHAIR: &str = "Wheelchair";

const fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// A recognisable device: its canonical name and the keywords that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDefinition {
    /// Canonical label handed downstream.
    #[serde(default, alias = "Name")]
    pub name: String,

    /// Matched case-insensitively as substrings of the note.
    #[serde(default, alias = "Keywords")]
    pub keywords: Vec<String>,

    /// Lower values are checked first.
    #[serde(default = "default_priority", alias = "Priority")]
    pub priority: i32,
}

impl DeviceDefinition {
    #[must_use]
    pub fn new<I, K>(name: impl Into<String>, keywords: I, priority: i32) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            priority,
        }
    }

    /// Drop blank keywords; `None` when nothing usable is left.
    fn sanitized(mut self) -> Option<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            warn!("Skipping device definition without a name");
            return None;
        }
        self.name = name.to_string();

        let before = self.keywords.len();
        self.keywords.retain(|k| !k.trim().is_empty());
        if self.keywords.len() < before {
            warn!(
                "Device {}: ignored {} blank keyword(s)",
                self.name,
                before - self.keywords.len()
            );
        }

        if self.keywords.is_empty() {
            warn!("Skipping device {}: no keywords configured", self.name);
            return None;
        }
        Some(self)
    }
}

/// Why the built-in device list was used instead of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryFallback {
    #[error("no device configuration section found")]
    Missing,

    #[error("device configuration section is empty")]
    Empty,

    #[error("device configuration is invalid: {0}")]
    Invalid(String),
}

/// The loaded, priority-ordered set of device definitions.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: Vec<DeviceDefinition>,
    fallback: Option<RegistryFallback>,
}

impl DeviceRegistry {
    /// Build a registry from a configuration read.
    ///
    /// `Ok(None)` means the section was absent. Any failure, or a section
    /// without a single usable entry, yields [`DeviceRegistry::defaults`].
    #[must_use]
    pub fn load<E: Display>(source: Result<Option<Vec<DeviceDefinition>>, E>) -> Self {
        let reason = match source {
            Ok(Some(definitions)) if !definitions.is_empty() => {
                let total = definitions.len();
                let usable: Vec<_> = definitions
                    .into_iter()
                    .filter_map(DeviceDefinition::sanitized)
                    .collect();
                if !usable.is_empty() {
                    let registry = Self::from_definitions(usable);
                    registry.log_loaded();
                    return registry;
                }
                RegistryFallback::Invalid(format!("none of {total} device entries is usable"))
            }
            Ok(Some(_)) => RegistryFallback::Empty,
            Ok(None) => RegistryFallback::Missing,
            Err(e) => {
                error!("Error loading DME device configurations: {e}");
                RegistryFallback::Invalid(e.to_string())
            }
        };

        warn!("{reason}. Using default device configurations.");
        let mut registry = Self::defaults();
        registry.fallback = Some(reason);
        registry.log_loaded();
        registry
    }

    /// Order definitions by ascending priority, keeping input order on ties.
    #[must_use]
    pub fn from_definitions(mut devices: Vec<DeviceDefinition>) -> Self {
        // sort_by_key is stable
        devices.sort_by_key(|d| d.priority);
        Self {
            devices,
            fallback: None,
        }
    }

    /// The built-in device list.
    #[must_use]
    pub fn defaults() -> Self {
        Self::from_definitions(vec![
            DeviceDefinition::new(CPAP, ["CPAP", "continuous positive airway pressure"], 1),
            DeviceDefinition::new(OXYGEN_TANK, ["oxygen", "O2", "oxygen tank"], 2),
            DeviceDefinition::new(WHEELCHAIR, ["wheelchair", "mobility chair"], 3),
        ])
    }

    #[must_use]
    pub fn devices(&self) -> &[DeviceDefinition] {
        &self.devices
    }

    /// Set when the defaults replaced configuration.
    #[must_use]
    pub const fn fallback(&self) -> Option<&RegistryFallback> {
        self.fallback.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    fn log_loaded(&self) {
        info!("Loaded {} DME device configurations", self.devices.len());
        for device in &self.devices {
            debug!(
                "Device: {}, Keywords: [{}], Priority: {}",
                device.name,
                device.keywords.join(", "),
                device.priority
            );
        }
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}
