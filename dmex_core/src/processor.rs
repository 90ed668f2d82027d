//! Read → extract → submit pipeline over the collaborator traits.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::extract::Extractor;
use crate::extract::result::ExtractionResult;
use crate::{NoteSource, OrderSink};

/// Read one note from `source` and extract it, without submitting anything.
pub async fn read_and_extract<S>(
    source: &S,
    extractor: &Extractor,
) -> anyhow::Result<ExtractionResult>
where
    S: NoteSource + ?Sized,
{
    let note = source.read_note().await?;
    info!(
        "Successfully read physician note (length: {} characters)",
        note.len()
    );

    let order = extractor.extract(&note)?;
    if order.is_unknown_device() {
        warn!("No configured device matched the note; order carries device 'Unknown'");
    } else {
        info!("Extracted DME data for device: {}", order.device);
    }
    Ok(order)
}

pub struct Processor<S, K>
where
    S: NoteSource,
    K: OrderSink,
{
    source: S,
    sink: K,
    extractor: Arc<Extractor>,
}

impl<S, K> Processor<S, K>
where
    S: NoteSource,
    K: OrderSink,
{
    pub const fn new(source: S, sink: K, extractor: Arc<Extractor>) -> Self {
        Self {
            source,
            sink,
            extractor,
        }
    }

    /// Run the full pipeline and return what was submitted.
    pub async fn run(&self) -> anyhow::Result<ExtractionResult> {
        info!("Beginning physician note processing");

        let order = read_and_extract(&self.source, &self.extractor).await?;

        if let Err(e) = self.sink.submit(&order).await {
            error!("Failed to submit DME data: {e:#}");
            return Err(e.context("API submission failed"));
        }

        info!("Successfully submitted DME data");
        Ok(order)
    }
}
