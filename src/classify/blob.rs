use imageproc::image::{imageops, RgbImage};
use tract_tensorflow::prelude::*;

use crate::classify::BlobConfig;

/// Network input tensor: NCHW, batch 1, `f32`.
pub type Blob = tract_ndarray::Array4<f32>;

/// Resize a frame to the network's spatial input size.
pub fn resize_to_input(image: &RgbImage, config: &BlobConfig) -> RgbImage {
    imageops::resize(
        image,
        config.input_size,
        config.input_size,
        imageops::FilterType::Triangle,
    )
}

/// Turn a frame into a network input tensor: resize, mean-subtract,
/// scale, optionally swap R/B. Pure function, no state.
pub fn build_blob(image: &RgbImage, config: &BlobConfig) -> Blob {
    let resized = resize_to_input(image, config);
    let size = config.input_size as usize;
    tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        let src_channel = if config.swap_rb { 2 - c } else { c };
        let px = resized.get_pixel(x as u32, y as u32)[src_channel];
        (px as f32 - config.mean[c]) * config.scale
    })
}

/// Mean of all blob values, logged as a preprocessing diagnostic.
pub fn blob_mean(blob: &Blob) -> f32 {
    if blob.is_empty() {
        return 0.0;
    }
    blob.iter().sum::<f32>() / blob.len() as f32
}

#[cfg(test)]
mod tests {
    use imageproc::image::Rgb;

    use super::*;

    fn solid_image(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(color))
    }

    #[test]
    fn blob_has_nchw_shape() {
        let config = BlobConfig {
            input_size: 8,
            ..Default::default()
        };
        let blob = build_blob(&solid_image(32, 16, [0, 0, 0]), &config);
        assert_eq!(blob.shape(), &[1, 3, 8, 8]);
    }

    #[test]
    fn mean_and_scale_are_applied() {
        let config = BlobConfig {
            input_size: 4,
            scale: 0.5,
            mean: [10.0, 20.0, 30.0],
            swap_rb: false,
        };
        let blob = build_blob(&solid_image(4, 4, [110, 120, 130]), &config);
        assert_eq!(blob[[0, 0, 0, 0]], 50.0);
        assert_eq!(blob[[0, 1, 0, 0]], 50.0);
        assert_eq!(blob[[0, 2, 0, 0]], 50.0);
    }

    #[test]
    fn swap_rb_exchanges_channels() {
        let config = BlobConfig {
            input_size: 2,
            scale: 1.0,
            mean: [0.0; 3],
            swap_rb: true,
        };
        let blob = build_blob(&solid_image(2, 2, [200, 100, 50]), &config);
        assert_eq!(blob[[0, 0, 0, 0]], 50.0);
        assert_eq!(blob[[0, 1, 0, 0]], 100.0);
        assert_eq!(blob[[0, 2, 0, 0]], 200.0);
    }

    #[test]
    fn blob_mean_of_solid_image() {
        let config = BlobConfig {
            input_size: 4,
            scale: 1.0,
            mean: [0.0; 3],
            swap_rb: false,
        };
        let blob = build_blob(&solid_image(4, 4, [7, 7, 7]), &config);
        assert_eq!(blob_mean(&blob), 7.0);
    }
}
