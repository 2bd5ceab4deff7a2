use std::path::PathBuf;

use color_eyre::eyre::{self};
use frame_classifier::util;
use frame_classifier_video::capture::{Frame, VideoCapture};

/// Display an image (or the first frame of a video) in a window
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// The input image or video file
    input: PathBuf,
}

impl Args {
    #[tracing::instrument(name = "show", skip_all)]
    pub(crate) fn run(&self) -> eyre::Result<()> {
        let mut capture = VideoCapture::open(&self.input)?;

        let mut frame = Frame::empty();
        if !capture.decode_frame(&mut frame)? {
            eyre::bail!("no frame in {}", self.input.display());
        }

        util::show("frame-classifier", &frame.to_rgb_image());
        Ok(())
    }
}
