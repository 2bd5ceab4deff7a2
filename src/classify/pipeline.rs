use color_eyre::eyre::{self, OptionExt as _};
use frame_classifier_kernel::types::{
    labels::LabelTable,
    prob::{arg_max, Classification},
};
use imageproc::image::RgbImage;

use crate::classify::{blob, Network, PipelineConfig};

/// Ties the label table, the network, and the preprocessing
/// configuration together. Each frame is processed independently; no
/// state is carried between calls.
#[derive(Debug)]
pub struct Classifier<N> {
    net: N,
    labels: LabelTable,
    config: PipelineConfig,
}

impl<N: Network> Classifier<N> {
    pub fn new(net: N, labels: LabelTable, config: PipelineConfig) -> eyre::Result<Self> {
        config.validate()?;
        Ok(Self {
            net,
            labels,
            config,
        })
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Blob construction, forward pass, arg-max, label lookup.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn classify(&mut self, frame: &RgbImage) -> eyre::Result<Classification> {
        let blob = blob::build_blob(frame, &self.config.blob);
        tracing::debug!(blob_mean = blob::blob_mean(&blob), shape = ?blob.shape());

        let probs = self.net.forward(blob)?;
        tracing::trace!(classes = probs.len(), ?probs);

        let prediction = arg_max(&probs)
            .ok_or_eyre("network produced an empty probability vector")?;
        tracing::debug!(class = prediction.class, score = prediction.score);

        Ok(prediction.describe(&self.labels, self.config.class_index_limit))
    }
}
