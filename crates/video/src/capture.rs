use std::path::{Path, PathBuf};

use ffmpeg::{decoder, format, frame, media, software::scaling};
use frame_classifier_kernel::types::time::{Duration, FramePosition, Timestamp};
use image::RgbImage;
use num_rational::Ratio;

use crate::{Error, Result};

pub use frame_classifier_kernel::types::time;

/// A decoded RGB24 frame together with its position in the stream.
///
/// The buffer is reused across [`VideoCapture::decode_frame`] calls; the
/// frame owns no other native resources.
#[derive(custom_debug::Debug)]
pub struct Frame {
    pos: FramePosition,
    dur: Duration,
    #[debug(skip)]
    data: frame::Video,
}

impl Frame {
    pub fn empty() -> Self {
        Self {
            pos: FramePosition::default(),
            dur: Duration::default(),
            data: frame::Video::empty(),
        }
    }

    pub fn position(&self) -> FramePosition {
        self.pos
    }

    pub fn duration(&self) -> Duration {
        self.dur
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    pub fn data(&self) -> &[u8] {
        self.data.data(0)
    }

    /// Owned copy of the frame, suitable for drawing on.
    pub fn to_rgb_image(&self) -> RgbImage {
        // The plane may carry per-row padding; copy row by row.
        let width = self.width() as usize;
        let src = self.data();
        let stride = self.data.stride(0);
        let mut img = RgbImage::new(self.width(), self.height());
        for (y, row) in img.chunks_exact_mut(width * 3).enumerate() {
            row.copy_from_slice(&src[y * stride..][..width * 3]);
        }
        img
    }
}

/// Source of decoded frames: a video file, a still image, or a camera
/// device. Still images behave as one-frame streams.
#[derive(custom_debug::Debug)]
pub struct VideoCapture {
    dur: Option<Duration>,
    fps: Ratio<i64>,
    frames: Option<usize>,
    stream_time_base: Ratio<i64>,
    width: u32,
    height: u32,

    #[debug(skip)]
    ictx: format::context::Input,
    video_stream_idx: usize,
    #[debug(skip)]
    decoder: decoder::Video,
    #[debug(skip)]
    decoded: frame::Video,
    #[debug(skip)]
    scaler: scaling::Context,
    packet_sent: bool,
    next_idx: usize,
}

impl VideoCapture {
    /// Open a video file or still image.
    pub fn open(file: &Path) -> Result<Self> {
        let ictx = format::input(&file)?;
        Self::from_input(ictx)
    }

    /// Open a camera device by index.
    pub fn open_camera(index: u32) -> Result<Self> {
        let path = camera_device_path(index)?;
        tracing::debug!(%index, path = %path.display(), "opening camera device");
        Self::open(&path)
    }

    fn from_input(ictx: format::context::Input) -> Result<Self> {
        let video_stream_idx = ictx
            .streams()
            .best(media::Type::Video)
            .ok_or(Error::NoVideoStream)?
            .index();

        let context_decoder = ffmpeg::codec::context::Context::from_parameters(
            ictx.stream(video_stream_idx)
                .ok_or(Error::NoVideoStream)?
                .parameters(),
        )?;
        let decoder = context_decoder.decoder().video()?;

        let scaler = scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            format::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            scaling::Flags::BILINEAR,
        )?;

        let fps = get_fps(&ictx, video_stream_idx).unwrap_or(Ratio::ONE);
        let frames = get_frames(&ictx, video_stream_idx, fps).map(|n| n as usize);
        let dur = get_duration(&ictx, video_stream_idx).map(Duration::new);
        let stream_time_base = ictx
            .stream(video_stream_idx)
            .ok_or(Error::NoVideoStream)?
            .time_base()
            .to_ratio();

        tracing::debug!(
            ?dur,
            %fps,
            ?frames,
            width = decoder.width(),
            height = decoder.height()
        );

        Ok(Self {
            dur,
            fps,
            frames,
            stream_time_base,
            width: decoder.width(),
            height: decoder.height(),

            ictx,
            video_stream_idx,
            decoder,
            decoded: frame::Video::empty(),
            scaler,
            packet_sent: false,
            next_idx: 0,
        })
    }

    /// Total stream duration, unknown for live devices.
    pub fn duration(&self) -> Option<Duration> {
        self.dur
    }

    pub fn fps(&self) -> Ratio<i64> {
        self.fps
    }

    pub fn sec_per_frame(&self) -> Duration {
        Duration::new(self.fps.recip())
    }

    /// Total frame count, unknown for live devices.
    pub fn frames(&self) -> Option<usize> {
        self.frames
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn decoded_position(&self) -> FramePosition {
        let ts = match self.decoded.timestamp() {
            Some(pts) => Timestamp::new(Ratio::from_integer(pts) * self.stream_time_base),
            // Some devices deliver frames without usable timestamps.
            None => Timestamp::new(self.sec_per_frame().as_ratio() * self.next_idx as i64),
        };
        FramePosition::new(self.next_idx, ts)
    }

    fn receive_decoded(&mut self) -> Result<Option<FramePosition>> {
        loop {
            if !self.packet_sent {
                let video_stream_idx = self.video_stream_idx;
                let packet = self
                    .ictx
                    .packets()
                    .find(|(stream, _packet)| stream.index() == video_stream_idx);
                match packet {
                    Some((_stream, packet)) => self.decoder.send_packet(&packet)?,
                    None => self.decoder.send_eof()?,
                }
                self.packet_sent = true;
            }

            match self.decoder.receive_frame(&mut self.decoded) {
                Ok(()) => {
                    let pos = self.decoded_position();
                    self.next_idx += 1;
                    return Ok(Some(pos));
                }
                Err(ffmpeg::Error::Eof) => {
                    tracing::trace!("EOF reached");
                    return Ok(None);
                }
                Err(ffmpeg::Error::Other {
                    errno: libc::EAGAIN,
                }) => {
                    self.packet_sent = false;
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Decode the next frame into `frame`. Returns `false` on
    /// end-of-stream; `frame` then carries the end position only.
    pub fn decode_frame(&mut self, frame: &mut Frame) -> Result<bool> {
        match self.receive_decoded()? {
            Some(pos) => {
                frame.pos = pos;
                frame.dur = self.sec_per_frame();
                self.scaler.run(&self.decoded, &mut frame.data)?;
                Ok(true)
            }
            None => {
                frame.pos = FramePosition::new(
                    self.next_idx,
                    Timestamp::new(self.sec_per_frame().as_ratio() * self.next_idx as i64),
                );
                frame.dur = self.sec_per_frame();
                Ok(false)
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn camera_device_path(index: u32) -> Result<PathBuf> {
    Ok(PathBuf::from(format!("/dev/video{index}")))
}

#[cfg(not(target_os = "linux"))]
fn camera_device_path(_index: u32) -> Result<PathBuf> {
    Err(Error::CameraUnsupported)
}

// The probing fallbacks below mirror OpenCV's FFmpeg backend: prefer the
// container's own numbers, then derive from what is known.

fn get_duration(ictx: &format::context::Input, stream_idx: usize) -> Option<Ratio<i64>> {
    let duration = Ratio::from(ictx.duration()) * ffmpeg::rescale::TIME_BASE.to_ratio();
    if duration > Ratio::ZERO {
        return Some(duration);
    }

    let stream = ictx.stream(stream_idx)?;
    let duration = Ratio::from(stream.duration()) * stream.time_base().to_ratio();
    (duration > Ratio::ZERO).then_some(duration)
}

fn get_fps(ictx: &format::context::Input, stream_idx: usize) -> Option<Ratio<i64>> {
    let stream = ictx.stream(stream_idx)?;

    let fps = stream.avg_frame_rate().to_ratio();
    if fps > Ratio::ZERO {
        return Some(fps);
    }

    let fps = stream.rate().to_ratio();
    if fps > Ratio::ZERO {
        return Some(fps);
    }

    let fps = stream.time_base().invert().to_ratio();
    (fps > Ratio::ZERO).then_some(fps)
}

fn get_frames(
    ictx: &format::context::Input,
    stream_idx: usize,
    fps: Ratio<i64>,
) -> Option<i64> {
    let frames = ictx.stream(stream_idx)?.frames();
    if frames > 0 {
        return Some(frames);
    }

    let frames = (get_duration(ictx, stream_idx)? * fps).round().to_integer();
    (frames > 0).then_some(frames)
}

trait ToRatio {
    fn to_ratio(&self) -> Ratio<i64>;
}

impl ToRatio for ffmpeg::Rational {
    fn to_ratio(&self) -> Ratio<i64> {
        if self.denominator() == 0 {
            return Ratio::ZERO;
        }
        Ratio::new(self.numerator() as i64, self.denominator() as i64)
    }
}
