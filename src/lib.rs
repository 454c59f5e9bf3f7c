//! # pdf2pptx
//!
//! Convert PDF slide decks into PowerPoint packages with working speaker
//! notes.
//!
//! Slide-authoring toolchains often emit a PDF in which every slide page is
//! followed by a page of notes for the presenter. Viewers that only know PDF
//! show those note pages to the audience. This crate splits the pages into
//! slides and notes, rasterises each slide into an image and writes a
//! `.pptx` whose notes view carries the extracted text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate the local file (exists, readable, %PDF)
//!  ├─ 2. Classify  pair pages: none | interleaved | annotations
//!  ├─ 3. Render    rasterise slide pages via pdfium at the given DPI
//!  ├─ 4. Notes     plain text from note pages or comment annotations
//!  ├─ 5. Package   slides, notes slides, images → OOXML zip
//!  └─ 6. Publish   staged file renamed onto the destination
//! ```
//!
//! Every error is fatal: a deck is produced in full or not at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert_to_file, ConversionConfig, PairingMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .dpi(300)
//!         .pairing(PairingMode::Interleaved)
//!         .build()?;
//!     let stats = convert_to_file("talk.pdf", "talk.pptx", &config).await?;
//!     eprintln!("{} slides, {} with notes", stats.slides, stats.slides_with_notes);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## The pdfium library
//!
//! Rendering uses the pdfium shared library, looked up via `PDFIUM_LIB_PATH`
//! (the library file or its directory), then the working directory, then the
//! system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod progress;
pub mod staging;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI};
pub use convert::{
    convert, convert_document, convert_document_to_file, convert_file_sync, convert_sync,
    convert_to_file, inspect, inspect_document,
};
pub use error::Pdf2PptxError;
pub use output::{ConversionOutput, ConversionStats, DocumentInfo, PredictedSlides};
pub use package::{PackageAssembler, SlideRecord};
pub use pipeline::classify::{
    classify, classify_with, NoteRef, PagePair, PageRole, PairingMode, PairingStrategy,
};
pub use pipeline::document::{PageSize, PageSource};
pub use pipeline::driver::{Pipeline, PipelineState};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use staging::{clean, STAGING_PREFIX};
