use dmex_config::Config;
use dmex_core::read_and_extract;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ExtractInput {
    pub config: Option<PathBuf>,
    pub note: Option<PathBuf>,
    pub pretty: bool,
}

/// Read and extract a note, printing the order as JSON instead of submitting.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load(input.config.as_deref())?;

        let reader = super::note_reader(&config, input.note);
        let extractor = super::extractor_for(&config);
        let order = read_and_extract(&reader, &extractor).await?;

        let json = if input.pretty {
            serde_json::to_string_pretty(&order)?
        } else {
            serde_json::to_string(&order)?
        };
        println!("{json}");
        Ok(())
    }
}
