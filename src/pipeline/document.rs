//! The document abstraction every pipeline stage works against.
//!
//! [`PageSource`] is the seam between the conversion pipeline and the
//! rasterisation engine. The production implementation wraps pdfium
//! ([`crate::pipeline::pdfium::PdfiumDocument`]); tests plug in an in-memory
//! document so the pairing and packaging logic can be exercised without the
//! native library.

use crate::error::Pdf2PptxError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Points per inch in PDF user space.
pub const POINTS_PER_INCH: f64 = 72.0;

/// English Metric Units per point (914 400 EMU per inch / 72).
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Physical page dimensions in points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    /// Pixel dimensions of this page rendered at `dpi`, each rounded to the
    /// nearest whole pixel and never smaller than one.
    pub fn pixel_extent(&self, dpi: u32) -> (u32, u32) {
        (
            points_to_pixels(self.width_pt, dpi),
            points_to_pixels(self.height_pt, dpi),
        )
    }

    /// Dimensions in EMU, the unit PresentationML uses for geometry.
    pub fn to_emu(&self) -> (i64, i64) {
        (points_to_emu(self.width_pt), points_to_emu(self.height_pt))
    }
}

fn points_to_pixels(points: f32, dpi: u32) -> u32 {
    let px = (points as f64 / POINTS_PER_INCH * dpi as f64).round();
    (px as u32).max(1)
}

fn points_to_emu(points: f32) -> i64 {
    (points as f64 * EMU_PER_POINT).round() as i64
}

/// Random access to the pages of an opened paginated document.
///
/// Page indices are 0-based and in document order. Implementations report
/// per-page failures as [`Pdf2PptxError::RenderFailure`] carrying the index.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Intrinsic physical size of a page.
    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError>;

    /// Rasterise a page to exactly `width_px × height_px` pixels.
    ///
    /// Annotations are not drawn; the page content alone is rendered.
    fn rasterize(
        &self,
        index: usize,
        width_px: u32,
        height_px: u32,
    ) -> Result<DynamicImage, Pdf2PptxError>;

    /// All extractable text on the page in content-stream reading order.
    fn page_text(&self, index: usize) -> Result<String, Pdf2PptxError>;

    /// Contents of the page's comment annotations, in page order.
    fn annotation_notes(&self, index: usize) -> Result<Vec<String>, Pdf2PptxError>;

    /// Document title from the info dictionary, if present.
    fn title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_landscape_at_150_dpi() {
        let size = PageSize::new(792.0, 612.0);
        assert_eq!(size.pixel_extent(150), (1650, 1275));
    }

    #[test]
    fn doubling_dpi_doubles_pixels_within_rounding() {
        let size = PageSize::new(362.83, 272.13); // beamer 4:3 (128mm × 96mm)
        let (w1, h1) = size.pixel_extent(97);
        let (w2, h2) = size.pixel_extent(194);
        assert!((w2 as i64 - 2 * w1 as i64).abs() <= 1, "{w1} → {w2}");
        assert!((h2 as i64 - 2 * h1 as i64).abs() <= 1, "{h1} → {h2}");
    }

    #[test]
    fn rounding_is_to_nearest_pixel() {
        // 100pt at 1 dpi = 1.388… px → 1; 108pt = 1.5 px → 2
        assert_eq!(PageSize::new(100.0, 108.0).pixel_extent(1), (1, 2));
    }

    #[test]
    fn tiny_pages_never_collapse_to_zero_pixels() {
        assert_eq!(PageSize::new(0.1, 0.1).pixel_extent(1), (1, 1));
    }

    #[test]
    fn emu_conversion_matches_inch_grid() {
        // 10in × 7.5in
        assert_eq!(PageSize::new(720.0, 540.0).to_emu(), (9_144_000, 6_858_000));
    }
}
