use std::{fs, path::Path};

use ab_glyph::{FontVec, PxScale};
use color_eyre::eyre::{self, eyre, WrapErr as _};
use imageproc::{
    drawing::draw_text_mut,
    image::{Rgb, RgbImage},
};

const STATUS_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const STATUS_POS: (i32, i32) = (10, 10);
const STATUS_SCALE: f32 = 16.0;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the overlay font from an explicit path, or probe common system
/// locations. `None` means no usable font; overlay is then skipped and
/// the console status stands alone.
pub fn load_font(path: Option<&Path>) -> eyre::Result<Option<FontVec>> {
    if let Some(path) = path {
        let data = fs::read(path)
            .wrap_err_with(|| format!("cannot read font file {}", path.display()))?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| eyre!("cannot parse font file {}", path.display()))?;
        return Ok(Some(font));
    }

    for candidate in SYSTEM_FONTS {
        let Ok(data) = fs::read(candidate) else {
            continue;
        };
        if let Ok(font) = FontVec::try_from_vec(data) {
            tracing::debug!(path = candidate, "loaded system font");
            return Ok(Some(font));
        }
    }

    tracing::warn!("no usable font found, status overlay disabled");
    Ok(None)
}

/// Draw the status line into the top-left corner of the frame.
pub fn draw_status(image: &mut RgbImage, font: &FontVec, status: &str) {
    draw_text_mut(
        image,
        STATUS_COLOR,
        STATUS_POS.0,
        STATUS_POS.1,
        PxScale::from(STATUS_SCALE),
        font,
        status,
    );
}
