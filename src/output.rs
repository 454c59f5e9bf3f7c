//! Output types returned by the conversion entry points.

use crate::pipeline::classify::PairingMode;
use crate::pipeline::document::PageSize;
use serde::{Deserialize, Serialize};

/// A finished conversion held in memory.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The complete `.pptx` package.
    pub package: Vec<u8>,
    pub stats: ConversionStats,
}

/// Statistics from one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the input document.
    pub total_pages: usize,
    /// Slides in the output deck.
    pub slides: usize,
    /// Slides whose notes are not empty.
    pub slides_with_notes: usize,
    pub dpi: u32,
    /// Name of the pairing policy (`none`, `interleaved`, `annotations`, or
    /// `custom`).
    pub pairing: String,
    /// Deck canvas in EMU.
    pub canvas_width_emu: i64,
    pub canvas_height_emu: i64,
    /// Size of the package in bytes.
    pub package_bytes: u64,
    /// Time spent rasterising and encoding slide pages.
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// What [`crate::inspect`] reports about a document without converting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    /// Size of the first page, which would fix the deck canvas.
    pub first_page: Option<PageSize>,
    /// Whether any page differs in size from the first.
    pub mixed_page_sizes: bool,
    pub title: Option<String>,
    /// Slides each built-in pairing mode would produce.
    pub predicted_slides: Vec<PredictedSlides>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedSlides {
    pub mode: PairingMode,
    pub slides: usize,
}
