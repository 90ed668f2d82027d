use dmex_config::Config;
use std::path::PathBuf;

/// Prints the resolved configuration and the device registry it produces.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load(input.as_deref())?;

        println!("=== dmex Configuration ===\n");

        println!("Source:");
        match &config.source {
            Some(path) => println!("  File: {}", path.display()),
            None => println!("  File: (none, using defaults)"),
        }
        println!("  Note Path: {}", config.note_path.display());
        println!();

        println!("API:");
        println!("  Endpoint: {}", config.api.endpoint);
        if config.api.is_test_endpoint() {
            println!("  Note: placeholder/test endpoint");
        }
        println!("  Timeout: {}s", config.api.timeout_secs);
        println!(
            "  Attempts: {} (delays: {})",
            config.api.retry.attempts(),
            format_delays(&config.api.retry.delays_ms)
        );
        println!();

        let extractor = super::extractor_for(&config);
        let registry = extractor.registry();

        println!("Devices:");
        if let Some(reason) = registry.fallback() {
            println!("  Built-in defaults in use: {reason}");
        }
        let handlers = extractor.handlers();
        for device in registry.devices() {
            let fields = if handlers.contains(&device.name) {
                "device fields"
            } else {
                "common fields only"
            };
            println!(
                "  [{}] {}: {} ({fields})",
                device.priority,
                device.name,
                device.keywords.join(", ")
            );
        }
        println!();

        println!("Field Handlers:");
        for name in handlers.list() {
            println!("  {name}");
        }

        Ok(())
    }
}

fn format_delays(delays_ms: &[u64]) -> String {
    if delays_ms.is_empty() {
        return "none".to_string();
    }
    delays_ms
        .iter()
        .map(|ms| format!("{ms}ms"))
        .collect::<Vec<_>>()
        .join(", ")
}
