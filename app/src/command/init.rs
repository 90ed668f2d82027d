use dmex_config::Config;

/// Writes the configuration template to `~/dmex/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;
        println!("Created config at {}", path.display());
        Ok(())
    }
}
