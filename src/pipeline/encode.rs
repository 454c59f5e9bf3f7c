//! Image encoding: `DynamicImage` → PNG bytes for the package media folder.
//!
//! PNG is lossless, so slide text stays crisp at any zoom level in the
//! viewer. Slides are opaque, so the alpha channel pdfium produces is dropped
//! before encoding; that alone shrinks each image by roughly a quarter.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised slide as an RGB PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let png = encode_png(&img).expect("encode should succeed");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).expect("valid png");
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn encoding_is_deterministic() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(7, 3, Rgba([1, 2, 3, 255])));
        assert_eq!(encode_png(&img).unwrap(), encode_png(&img).unwrap());
    }
}
