use dmex_client::DmeApiClient;
use dmex_config::Config;
use dmex_core::Processor;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ProcessInput {
    pub config: Option<PathBuf>,
    pub note: Option<PathBuf>,
}

/// Full pipeline: read the note, extract the order, submit it.
#[derive(Debug, Clone, Copy)]
pub struct ProcessStrategy;

impl super::CommandStrategy for ProcessStrategy {
    type Input = ProcessInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load(input.config.as_deref())?;

        let reader = super::note_reader(&config, input.note);
        info!("Reading physician note from {}", reader.path().display());

        let client = DmeApiClient::new(config.api.clone())?;
        info!("Orders will be submitted to {}", client.endpoint());
        let processor = Processor::new(reader, client, super::extractor_for(&config));

        let order = processor.run().await?;
        info!(
            "Processed order for {} (ordering provider: {})",
            order.device, order.ordering_provider
        );
        Ok(())
    }
}
