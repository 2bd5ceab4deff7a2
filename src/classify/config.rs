use color_eyre::eyre;

/// How a frame is turned into a network input tensor.
///
/// The arithmetic follows the usual DNN blob convention: resize to
/// `input_size` square, subtract `mean` per channel, multiply by `scale`.
/// `mean` is given in output channel order (after any R/B swap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobConfig {
    /// Spatial edge length of the network input, in pixels.
    pub input_size: u32,
    /// Multiplier applied after mean subtraction.
    pub scale: f32,
    /// Per-channel mean to subtract.
    pub mean: [f32; 3],
    /// Swap the R and B channels (RGB frames feeding a BGR-trained graph).
    pub swap_rb: bool,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            input_size: 224,
            scale: 1.0,
            mean: [0.0, 0.0, 0.0],
            swap_rb: true,
        }
    }
}

impl BlobConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.input_size == 0 {
            eyre::bail!("input size must be positive");
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            eyre::bail!("scale factor must be finite and non-zero");
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            eyre::bail!("mean components must be finite");
        }
        Ok(())
    }

    /// Network input shape for this configuration, NCHW with batch 1.
    pub fn input_shape(&self) -> [usize; 4] {
        let size = self.input_size as usize;
        [1, 3, size, size]
    }
}

/// Per-frame classification behavior shared by the execution modes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineConfig {
    pub blob: BlobConfig,
    /// Reproduce the historical bounds check against a fixed constant
    /// instead of the label-table length. `None` uses the table length.
    pub class_index_limit: Option<usize>,
}

impl PipelineConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        self.blob.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        BlobConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_values() {
        let mut config = BlobConfig {
            input_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.input_size = 224;
        config.scale = f32::NAN;
        assert!(config.validate().is_err());

        config.scale = 1.0;
        config.mean = [0.0, f32::INFINITY, 0.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn input_shape_is_nchw() {
        let config = BlobConfig {
            input_size: 224,
            ..Default::default()
        };
        assert_eq!(config.input_shape(), [1, 3, 224, 224]);
    }
}
