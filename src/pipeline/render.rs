//! Slide rasterisation: one slide page → PNG bytes plus its dimensions.
//!
//! The pixel size is derived from the page's physical size and the requested
//! density, so a 10in-wide page at 150 DPI is always 1 500 px wide. There is
//! no upper clamp: the caller owns the trade-off between fidelity and package
//! size. Any engine failure is fatal to the conversion and names the page.

use crate::error::Pdf2PptxError;
use crate::pipeline::document::{PageSize, PageSource};
use crate::pipeline::encode;
use tracing::debug;

/// A rasterised slide page.
#[derive(Debug, Clone)]
pub struct RenderedSlide {
    pub png: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub size: PageSize,
}

/// Reject densities the rasteriser cannot honour.
pub fn validate_dpi(dpi: u32) -> Result<(), Pdf2PptxError> {
    if dpi == 0 {
        return Err(Pdf2PptxError::InvalidParameter(
            "DPI must be a positive integer, got 0".into(),
        ));
    }
    Ok(())
}

/// Render page `index` of `document` at `dpi`.
pub fn render_slide<D: PageSource + ?Sized>(
    document: &D,
    index: usize,
    dpi: u32,
) -> Result<RenderedSlide, Pdf2PptxError> {
    validate_dpi(dpi)?;

    let size = document.page_size(index)?;
    let (width, height) = size.pixel_extent(dpi);
    let image = document.rasterize(index, width, height)?;

    if image.width() != width || image.height() != height {
        return Err(Pdf2PptxError::render(
            index,
            format!(
                "engine produced {}x{} px, expected {}x{} px",
                image.width(),
                image.height(),
                width,
                height
            ),
        ));
    }

    let png = encode::encode_png(&image)
        .map_err(|e| Pdf2PptxError::render(index, format!("PNG encoding failed: {e}")))?;

    debug!(
        "Rendered page {} ({:.1}x{:.1}pt) → {}x{} px at {} DPI",
        index, size.width_pt, size.height_pt, width, height, dpi
    );

    Ok(RenderedSlide {
        png,
        pixel_width: width,
        pixel_height: height,
        size,
    })
}
