pub mod capture;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no video stream in input")]
    NoVideoStream,
    #[error("camera capture by index is not supported on this platform")]
    CameraUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn init() -> Result<()> {
    ffmpeg::init()?;
    Ok(())
}
