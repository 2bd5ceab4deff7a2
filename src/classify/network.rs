use std::path::Path;

use color_eyre::eyre::{self, eyre};
use tract_tensorflow::prelude::*;

use crate::classify::Blob;

/// A loaded classification network. One synchronous forward pass per
/// frame; implementations are substituted in tests.
pub trait Network {
    /// Run the blob through the network and return the probability
    /// vector, flattened to a single row.
    fn forward(&mut self, blob: Blob) -> eyre::Result<Vec<f32>>;
}

/// A frozen TensorFlow graph, loaded once and released on drop.
#[derive(custom_debug::Debug)]
pub struct FrozenGraph {
    #[debug(skip)]
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_shape: [usize; 4],
}

impl FrozenGraph {
    /// Load and optimize a serialized frozen graph. Any failure here is
    /// fatal for the run.
    pub fn load(model: &Path, input_shape: [usize; 4]) -> eyre::Result<Self> {
        let plan = tract_tensorflow::tensorflow()
            .model_for_path(model)
            .map_err(|e| eyre!("cannot read frozen graph {}: {e}", model.display()))?
            .with_input_fact(0, f32::fact(input_shape).into())
            .map_err(|e| eyre!("cannot fix network input shape: {e}"))?
            .into_optimized()
            .map_err(|e| eyre!("cannot optimize network: {e}"))?
            .into_runnable()
            .map_err(|e| eyre!("cannot plan network execution: {e}"))?;

        tracing::debug!(model = %model.display(), ?input_shape, "frozen graph loaded");
        Ok(Self { plan, input_shape })
    }

    pub fn input_shape(&self) -> [usize; 4] {
        self.input_shape
    }
}

impl Network for FrozenGraph {
    fn forward(&mut self, blob: Blob) -> eyre::Result<Vec<f32>> {
        let outputs = self
            .plan
            .run(tvec!(blob.into_tensor().into()))
            .map_err(|e| eyre!("forward pass failed: {e}"))?;
        let probs = outputs
            .first()
            .ok_or_else(|| eyre!("network produced no output"))?
            .to_array_view::<f32>()
            .map_err(|e| eyre!("network output is not f32: {e}"))?;
        Ok(probs.iter().copied().collect())
    }
}
