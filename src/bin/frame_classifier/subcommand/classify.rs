use std::path::PathBuf;

use color_eyre::eyre::{self, WrapErr as _};
use frame_classifier::{classify::resize_to_input, util};
use frame_classifier_video::capture::{Frame, VideoCapture};
use imageproc::image::imageops;
use tracing::info;

use super::ClassifierArgs;

/// Classify a single frame: an image file, or the first frame of a video
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// The input image or video file
    input: PathBuf,
    #[clap(flatten)]
    classifier: ClassifierArgs,
    /// Mirror the frame horizontally before classification
    #[clap(long, default_value = "false")]
    flip: bool,
    /// Write the preprocessed frame to this path
    #[clap(long)]
    dump_frame: Option<PathBuf>,
    /// Display the annotated frame
    #[clap(long, default_value = "false")]
    display_image: bool,
    /// Font for the overlay text
    #[clap(long)]
    font: Option<PathBuf>,
}

impl Args {
    #[tracing::instrument(name = "classify", skip_all)]
    pub(crate) fn run(&self) -> eyre::Result<()> {
        let mut classifier = self.classifier.build_classifier()?;

        let mut capture = tracing::debug_span!("open", file = %self.input.display())
            .in_scope(|| VideoCapture::open(&self.input))?;

        let mut frame = Frame::empty();
        if !capture.decode_frame(&mut frame)? {
            eyre::bail!("no frame in {}", self.input.display());
        }

        let mut image = frame.to_rgb_image();
        if self.flip {
            image = imageops::flip_horizontal(&image);
        }

        let classification = classifier.classify(&image)?;
        info!(%classification);

        if let Some(path) = &self.dump_frame {
            let preprocessed = resize_to_input(&image, &classifier.config().blob);
            preprocessed
                .save(path)
                .wrap_err_with(|| format!("cannot write frame dump {}", path.display()))?;
            info!(path = %path.display(), "preprocessed frame written");
        }

        if self.display_image {
            if let Some(font) = util::load_font(self.font.as_deref())? {
                util::draw_status(&mut image, &font, &classification.to_string());
            }
            util::show("frame-classifier", &image);
        }

        Ok(())
    }
}
