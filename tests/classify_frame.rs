use color_eyre::eyre;
use frame_classifier::classify::{Blob, BlobConfig, Classifier, Network, PipelineConfig};
use frame_classifier_kernel::types::labels::LabelTable;
use imageproc::image::{Rgb, RgbImage};

/// Returns a fixed probability vector and records the blob shape it was
/// handed, so the whole pipeline runs without any vision/ML library.
#[derive(Debug)]
struct StubNetwork {
    probs: Vec<f32>,
    seen_shape: Option<Vec<usize>>,
}

impl StubNetwork {
    fn new(probs: &[f32]) -> Self {
        Self {
            probs: probs.to_vec(),
            seen_shape: None,
        }
    }
}

impl Network for &mut StubNetwork {
    fn forward(&mut self, blob: Blob) -> eyre::Result<Vec<f32>> {
        self.seen_shape = Some(blob.shape().to_vec());
        Ok(self.probs.clone())
    }
}

fn labels(names: &[&str]) -> LabelTable {
    let text = names.join("\n");
    LabelTable::from_reader(text.as_bytes()).unwrap()
}

fn synthetic_frame() -> RgbImage {
    RgbImage::from_fn(64, 48, |x, y| Rgb([x as u8, y as u8, (x + y) as u8]))
}

fn config(input_size: u32) -> PipelineConfig {
    PipelineConfig {
        blob: BlobConfig {
            input_size,
            ..Default::default()
        },
        class_index_limit: None,
    }
}

#[test]
fn classifies_synthetic_frame() -> eyre::Result<()> {
    let mut net = StubNetwork::new(&[0.1, 0.9, 0.3]);
    let mut classifier = Classifier::new(&mut net, labels(&["cat", "dog", "toaster"]), config(8))?;

    let classification = classifier.classify(&synthetic_frame())?;
    assert_eq!(classification.label, "dog");
    assert_eq!(classification.score, 0.9);
    assert_eq!(
        classification.to_string(),
        "description: dog, maxVal: 0.9"
    );

    drop(classifier);
    assert_eq!(net.seen_shape.as_deref(), Some(&[1, 3, 8, 8][..]));
    Ok(())
}

#[test]
fn unknown_when_class_is_outside_the_table() -> eyre::Result<()> {
    let mut net = StubNetwork::new(&[0.0, 0.0, 0.0, 0.8]);
    let mut classifier = Classifier::new(&mut net, labels(&["cat", "dog"]), config(8))?;

    let classification = classifier.classify(&synthetic_frame())?;
    assert_eq!(classification.label, "Unknown");
    assert_eq!(classification.score, 0.8);
    Ok(())
}

#[test]
fn class_index_limit_reproduces_legacy_bounds_check() -> eyre::Result<()> {
    let mut config = config(8);
    config.class_index_limit = Some(1);

    let mut net = StubNetwork::new(&[0.1, 0.9]);
    let mut classifier = Classifier::new(&mut net, labels(&["cat", "dog"]), config)?;

    // Class 1 is resolvable, but the legacy limit masks it.
    let classification = classifier.classify(&synthetic_frame())?;
    assert_eq!(classification.label, "Unknown");
    Ok(())
}

#[test]
fn empty_probability_vector_is_an_error() -> eyre::Result<()> {
    let mut net = StubNetwork::new(&[]);
    let mut classifier = Classifier::new(&mut net, labels(&["cat"]), config(8))?;

    assert!(classifier.classify(&synthetic_frame()).is_err());
    Ok(())
}

#[test]
fn rejects_invalid_preprocessing_config() {
    let mut bad = config(0);
    bad.class_index_limit = None;

    let mut net = StubNetwork::new(&[1.0]);
    assert!(Classifier::new(&mut net, labels(&["cat"]), bad).is_err());
}
