use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use frame_classifier_video::capture::time::FramePosition;

/// Frame-count progress reporting for streams of known length, rendered
/// through the indicatif tracing layer.
#[derive(Debug, Clone, Copy)]
pub struct ProgressBarBuilder {
    frames: usize,
}

impl ProgressBarBuilder {
    pub fn new(frames: usize) -> Self {
        Self { frames }
    }

    pub fn build(&self, span: Span) -> ProgressBar {
        static TEMPLATE: &str =
            "{spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len}fr ({per_sec}, ETA: {eta})";
        span.pb_set_style(&ProgressStyle::with_template(TEMPLATE).unwrap());
        span.pb_set_length(self.frames as u64);
        ProgressBar { span }
    }
}

#[derive(Debug)]
pub struct ProgressBar {
    span: Span,
}

impl ProgressBar {
    pub fn set_position(&self, pos: FramePosition) {
        self.span.pb_set_position(pos.index() as u64);
    }
}
