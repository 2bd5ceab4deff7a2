use std::path::PathBuf;

use color_eyre::eyre::{self};
use frame_classifier::classify::{
    BlobConfig, Classifier, FrozenGraph, PipelineConfig,
};
use frame_classifier_kernel::types::labels::LabelTable;

mod classify;
mod show;
mod watch;

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Classify(classify::Args),
    Watch(watch::Args),
    Show(show::Args),
}

impl Subcommand {
    pub fn run(&self) -> eyre::Result<()> {
        match self {
            Subcommand::Classify(args) => args.run()?,
            Subcommand::Watch(args) => args.run()?,
            Subcommand::Show(args) => args.run()?,
        }

        Ok(())
    }
}

/// Model, label, and preprocessing options shared by the classifying
/// subcommands.
#[derive(clap::Parser, Debug)]
pub struct ClassifierArgs {
    /// Frozen TensorFlow graph file
    #[clap(long)]
    model: PathBuf,
    /// Label file, one class name per line
    #[clap(long)]
    labels: PathBuf,
    /// Spatial edge length of the network input
    #[clap(long, default_value = "224")]
    input_size: u32,
    /// Scale factor applied after mean subtraction
    #[clap(long, default_value = "1.0")]
    scale: f32,
    /// Per-channel mean to subtract, in output channel order
    #[clap(long, value_delimiter = ',', default_value = "0,0,0")]
    mean: Vec<f32>,
    /// Keep the decoded channel order instead of swapping R and B
    #[clap(long, default_value = "false")]
    no_swap_rb: bool,
    /// Treat class indices at or beyond this value as unknown, the way
    /// the legacy fixed bounds check did. Defaults to the table length.
    #[clap(long)]
    class_index_limit: Option<usize>,
}

impl ClassifierArgs {
    fn pipeline_config(&self) -> eyre::Result<PipelineConfig> {
        let mean: [f32; 3] = self
            .mean
            .as_slice()
            .try_into()
            .map_err(|_| eyre::eyre!("--mean takes exactly three components"))?;
        let config = PipelineConfig {
            blob: BlobConfig {
                input_size: self.input_size,
                scale: self.scale,
                mean,
                swap_rb: !self.no_swap_rb,
            },
            class_index_limit: self.class_index_limit,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load labels and network, in that order; both failures are fatal.
    pub fn build_classifier(&self) -> eyre::Result<Classifier<FrozenGraph>> {
        let config = self.pipeline_config()?;

        let labels = LabelTable::load(&self.labels)?;
        tracing::debug!(count = labels.len(), path = %self.labels.display(), "labels loaded");
        if labels.is_empty() {
            tracing::warn!("label table is empty, every class will be unknown");
        }

        let net = tracing::debug_span!("load-model")
            .in_scope(|| FrozenGraph::load(&self.model, config.blob.input_shape()))?;

        Classifier::new(net, labels, config)
    }
}
