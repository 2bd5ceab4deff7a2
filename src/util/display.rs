use color_eyre::eyre::{self, eyre};
use imageproc::image::RgbImage;
use sdl2::{event::Event, pixels::PixelFormatEnum, render::WindowCanvas, EventPump};

/// Show a single frame in a blocking window; returns when the user
/// closes it. Best-effort, for the single-shot modes.
pub fn show(title: &str, image: &RgbImage) {
    imageproc::window::display_image(
        title,
        image,
        u32::min(image.width(), 1024),
        u32::min(image.height(), 768),
    );
}

/// Non-blocking window for the live loop: one `present` call per frame,
/// closed by any key press or the window close button.
pub struct LiveWindow {
    canvas: WindowCanvas,
    events: EventPump,
}

impl LiveWindow {
    pub fn open(title: &str, width: u32, height: u32) -> eyre::Result<Self> {
        let sdl = sdl2::init().map_err(|e| eyre!("cannot initialize SDL: {e}"))?;
        let video = sdl
            .video()
            .map_err(|e| eyre!("cannot initialize SDL video: {e}"))?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()?;
        let canvas = window.into_canvas().build()?;
        let events = sdl
            .event_pump()
            .map_err(|e| eyre!("cannot obtain SDL event pump: {e}"))?;
        Ok(Self { canvas, events })
    }

    /// Draw the frame. Returns `false` once the user asked to quit.
    pub fn present(&mut self, image: &RgbImage) -> eyre::Result<bool> {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. } | Event::KeyDown { .. } => return Ok(false),
                _ => {}
            }
        }

        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            image.width(),
            image.height(),
        )?;
        texture.update(None, image.as_raw(), image.width() as usize * 3)?;

        self.canvas.clear();
        self.canvas
            .copy(&texture, None, None)
            .map_err(|e| eyre!("cannot blit frame: {e}"))?;
        self.canvas.present();
        Ok(true)
    }
}
