use std::path::{Path, PathBuf};

use color_eyre::eyre::{self};
use frame_classifier::{
    classify::{Classifier, FrozenGraph},
    util::{self, LiveWindow},
};
use frame_classifier_video::capture::{Frame, VideoCapture};
use imageproc::image::imageops;
use tracing::{info, Span};

use super::ClassifierArgs;
use crate::tui::ProgressBarBuilder;

/// Classify a live stream frame by frame until it ends
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Camera index, or a video file to play through
    input: String,
    #[clap(flatten)]
    classifier: ClassifierArgs,
    /// Mirror each frame horizontally before classification
    #[clap(long, default_value = "false")]
    flip: bool,
    /// Display each annotated frame in a window
    #[clap(long, default_value = "false")]
    display_image: bool,
    /// Font for the overlay text
    #[clap(long)]
    font: Option<PathBuf>,
}

impl Args {
    #[tracing::instrument(name = "watch", skip_all)]
    pub(crate) fn run(&self) -> eyre::Result<()> {
        let mut classifier = self.classifier.build_classifier()?;

        let mut capture = tracing::debug_span!("open", input = %self.input)
            .in_scope(|| open_source(&self.input))?;
        info!(
            width = capture.width(),
            height = capture.height(),
            frames = ?capture.frames(),
            "start reading stream"
        );

        let pbar = capture
            .frames()
            .map(|frames| ProgressBarBuilder::new(frames).build(Span::current()));

        let mut window = self
            .display_image
            .then(|| LiveWindow::open("frame-classifier", capture.width(), capture.height()))
            .transpose()?;
        let font = if self.display_image {
            util::load_font(self.font.as_deref())?
        } else {
            None
        };

        let mut frame = Frame::empty();
        loop {
            if !capture.decode_frame(&mut frame)? {
                info!(pos = %frame.position(), "end of stream");
                break;
            }
            if let Some(pbar) = &pbar {
                pbar.set_position(frame.position());
            }

            if !process_frame(&mut classifier, &frame, self.flip, window.as_mut(), font.as_ref())? {
                info!("window closed, stopping");
                break;
            }
        }

        Ok(())
    }
}

#[tracing::instrument(skip_all, fields(pos = %frame.position()))]
fn process_frame(
    classifier: &mut Classifier<FrozenGraph>,
    frame: &Frame,
    flip: bool,
    window: Option<&mut LiveWindow>,
    font: Option<&ab_glyph::FontVec>,
) -> eyre::Result<bool> {
    let mut image = frame.to_rgb_image();
    if flip {
        image = imageops::flip_horizontal(&image);
    }

    let classification = classifier.classify(&image)?;
    info!(%classification);

    if let Some(window) = window {
        if let Some(font) = font {
            util::draw_status(&mut image, font, &classification.to_string());
        }
        return window.present(&image);
    }

    Ok(true)
}

/// A bare integer selects a camera device; anything else is a path.
fn open_source(input: &str) -> frame_classifier_video::Result<VideoCapture> {
    match input.parse::<u32>() {
        Ok(index) => VideoCapture::open_camera(index),
        Err(_) => VideoCapture::open(Path::new(input)),
    }
}
