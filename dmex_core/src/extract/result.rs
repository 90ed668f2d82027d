use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::classify::UNKNOWN_DEVICE;

/// Structured order data pulled from one physician note.
///
/// Serializes with the intake API's field names; unset fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub device: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_type: Option<String>,

    /// Zero or one entry today; a set so handlers cannot record duplicates.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub add_ons: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,

    /// `"Dr. <name>"`, or `"Unknown"` when the note names nobody.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ordering_provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liters: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(default, rename = "dob", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
}

impl ExtractionResult {
    #[must_use]
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_unknown_device(&self) -> bool {
        self.device == UNKNOWN_DEVICE
    }
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            device: UNKNOWN_DEVICE.to_string(),
            mask_type: None,
            add_ons: BTreeSet::new(),
            qualifier: None,
            ordering_provider: UNKNOWN_DEVICE.to_string(),
            liters: None,
            usage: None,
            patient_name: None,
            date_of_birth: None,
            diagnosis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_unknown() {
        let result = ExtractionResult::default();
        assert!(result.is_unknown_device());
        assert_eq!(result.ordering_provider, "Unknown");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn serialization_skips_unset_fields() {
        let mut result = ExtractionResult::new("CPAP");
        result.mask_type = Some("full face".to_string());
        result.add_ons.insert("humidifier".to_string());
        result.ordering_provider = "Dr. House".to_string();
        result.date_of_birth = Some("01/01/1960".to_string());

        let value = serde_json::to_value(&result).expect("result should serialize");
        assert_eq!(
            value,
            json!({
                "device": "CPAP",
                "mask_type": "full face",
                "add_ons": ["humidifier"],
                "ordering_provider": "Dr. House",
                "dob": "01/01/1960",
            })
        );
    }
}
