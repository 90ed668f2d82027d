use dmex_client::ApiConfig;
use dmex_core::{DeviceDefinition, DeviceRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_DIR: &str = "dmex";
const CONFIG_FILE: &str = "config.json";
const LOCAL_CONFIG_FILE: &str = "dmex.json";

pub const ENV_API_ENDPOINT: &str = "DMEX_API_ENDPOINT";
pub const ENV_API_TIMEOUT_SECS: &str = "DMEX_API_TIMEOUT_SECS";
pub const ENV_NOTE_PATH: &str = "DMEX_NOTE_PATH";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "Config::default_note_path")]
    pub note_path: PathBuf,
    #[serde(default)]
    pub api: ApiConfig,
    /// Kept raw so a malformed device list cannot fail the whole file; see
    /// [`Config::device_definitions`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<serde_json::Value>,
    /// Older `DmeDevices` section, read only when `devices` is absent.
    #[serde(default, rename = "DmeDevices", skip_serializing)]
    pub legacy_devices: Option<serde_json::Value>,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            note_path: Self::default_note_path(),
            api: ApiConfig::default(),
            devices: None,
            legacy_devices: None,
            source: None,
        }
    }
}

impl Config {
    fn default_note_path() -> PathBuf {
        PathBuf::from("physician_note.txt")
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Otherwise `./dmex.json` and then
    /// `~/dmex/config.json` are tried, and defaults are used when neither
    /// exists. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let candidate = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Config file not found at: {}", p.display());
                }
                Some(p.to_path_buf())
            }
            None => Self::discover(),
        };

        let mut config = match candidate {
            Some(p) => {
                let config = Self::from_file(&p)?;
                info!("Loaded config from {}", p.display());
                config
            }
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        let home = Self::config_dir().ok()?.join(CONFIG_FILE);
        home.exists().then_some(home)
    }

    /// Apply `DMEX_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_API_ENDPOINT) {
            debug!("{ENV_API_ENDPOINT} overrides api.endpoint");
            self.api.endpoint = endpoint;
        }
        if let Some(timeout) = lookup(ENV_API_TIMEOUT_SECS).and_then(|v| v.trim().parse().ok()) {
            debug!("{ENV_API_TIMEOUT_SECS} overrides api.timeout_secs");
            self.api.timeout_secs = timeout;
        }
        if let Some(path) = lookup(ENV_NOTE_PATH) {
            debug!("{ENV_NOTE_PATH} overrides note_path");
            self.note_path = PathBuf::from(path);
        }
    }

    /// The configured device list.
    ///
    /// `devices` takes precedence over `DmeDevices`. `Ok(None)` when neither
    /// section holds a value; an error when the chosen one does not describe
    /// a list of devices.
    pub fn device_definitions(&self) -> anyhow::Result<Option<Vec<DeviceDefinition>>> {
        let section = [&self.devices, &self.legacy_devices]
            .into_iter()
            .flatten()
            .find(|value| !value.is_null());
        match section {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }

    /// Device registry for this configuration, falling back to built-in devices.
    #[must_use]
    pub fn device_registry(&self) -> DeviceRegistry {
        DeviceRegistry::load(self.device_definitions())
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE);
        Self::write_template(&config_path)?;
        Ok(config_path)
    }

    /// Write [`CONFIG_TEMPLATE`] to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        std::fs::write(path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}

pub const CONFIG_TEMPLATE: &str = r#"{
  "note_path": "physician_note.txt",
  "api": {
    "endpoint": "https://alert-api.com/DrExtract",
    "timeout_secs": 30,
    "retry": {
      "delays_ms": [1000, 2000, 4000]
    }
  },
  "devices": [
    { "name": "CPAP", "keywords": ["CPAP", "continuous positive airway pressure"], "priority": 1 },
    { "name": "Oxygen Tank", "keywords": ["oxygen", "O2", "oxygen tank"], "priority": 2 },
    { "name": "Wheelchair", "keywords": ["wheelchair", "mobility chair"], "priority": 3 },
    { "name": "Hospital Bed", "keywords": ["hospital bed", "adjustable bed"], "priority": 4 }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use dmex_core::RegistryFallback;
    use std::collections::HashMap;

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap_or_else(|e| panic!("config should parse: {e}"))
    }

    #[test]
    fn template_parses_and_lists_devices() {
        let config = parse(CONFIG_TEMPLATE);
        let registry = config.device_registry();
        assert!(registry.fallback().is_none());
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.devices()[3].name, "Hospital Bed");
        assert_eq!(config.api.retry.delays_ms, vec![1000, 2000, 4000]);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = parse("{}");
        assert_eq!(config.note_path, PathBuf::from("physician_note.txt"));
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(
            config.device_registry().fallback(),
            Some(&RegistryFallback::Missing)
        );
    }

    #[test]
    fn null_devices_count_as_missing() {
        let config = parse(r#"{"devices": null}"#);
        assert_eq!(
            config.device_registry().fallback(),
            Some(&RegistryFallback::Missing)
        );
    }

    #[test]
    fn empty_devices_fall_back() {
        let config = parse(r#"{"devices": []}"#);
        let registry = config.device_registry();
        assert_eq!(registry.fallback(), Some(&RegistryFallback::Empty));
        assert_eq!(registry.devices()[0].name, "CPAP");
    }

    #[test]
    fn malformed_devices_do_not_break_other_settings() {
        let config = parse(
            r#"{"api": {"endpoint": "http://intake.local/orders"}, "devices": {"name": "CPAP"}}"#,
        );
        assert_eq!(config.api.endpoint, "http://intake.local/orders");
        assert!(config.device_definitions().is_err());

        let registry = config.device_registry();
        assert!(matches!(
            registry.fallback(),
            Some(RegistryFallback::Invalid(_))
        ));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn legacy_section_name_is_accepted() {
        let config = parse(
            r#"{"DmeDevices": [{"Name": "Hospital Bed", "Keywords": ["hospital bed", "adjustable bed"], "Priority": 1}]}"#,
        );
        let registry = config.device_registry();
        assert!(registry.fallback().is_none());
        assert_eq!(registry.devices()[0].name, "Hospital Bed");
    }

    #[test]
    fn both_section_names_load_and_devices_wins() {
        let config = parse(
            r#"{
                "devices": [{"name": "Walker", "keywords": ["walker"], "priority": 1}],
                "DmeDevices": [{"Name": "Hospital Bed", "Keywords": ["hospital bed"], "Priority": 1}]
            }"#,
        );
        let registry = config.device_registry();
        assert!(registry.fallback().is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.devices()[0].name, "Walker");
    }

    #[test]
    fn null_devices_defer_to_legacy_section() {
        let config = parse(
            r#"{"devices": null, "DmeDevices": [{"Name": "Hospital Bed", "Keywords": ["hospital bed"]}]}"#,
        );
        assert_eq!(config.device_registry().devices()[0].name, "Hospital Bed");
    }

    #[test]
    fn environment_overrides_win() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_API_ENDPOINT, "https://intake.example.org/orders"),
            (ENV_API_TIMEOUT_SECS, "12"),
            (ENV_NOTE_PATH, "/tmp/note.json"),
        ]);
        let mut config = parse(r#"{"api": {"endpoint": "https://alert-api.com/DrExtract"}}"#);
        config.apply_overrides(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.api.endpoint, "https://intake.example.org/orders");
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.note_path, PathBuf::from("/tmp/note.json"));
    }

    #[test]
    fn unparsable_timeout_override_is_ignored() {
        let mut config = parse("{}");
        config.apply_overrides(|key| (key == ENV_API_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn from_file_records_source() {
        let dir = std::env::temp_dir().join(format!("dmex_cfg_{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("temp dir: {e}"));
        let path = dir.join("dmex.json");

        Config::write_template(&path).unwrap_or_else(|e| panic!("write template: {e}"));
        assert!(Config::write_template(&path).is_err());

        let config = Config::load(Some(path.as_path())).unwrap_or_else(|e| panic!("load: {e}"));
        assert_eq!(config.source.as_deref(), Some(path.as_path()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let path = std::env::temp_dir().join(format!("dmex_missing_{}.json", uuid::Uuid::now_v7()));
        assert!(Config::load(Some(path.as_path())).is_err());
    }
}
