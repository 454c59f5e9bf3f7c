//! The pipeline driver: classifier → rasteriser / note extractor → assembler,
//! in document order, in one pass.
//!
//! ```text
//! Idle ─open─► Opened ─first pair─► Streaming ─finalize─► Finalized ─close─► Closed
//!                 │                     │
//!                 └──── fatal error ────┴──► Failed
//! ```
//!
//! A document with no pages goes straight from `Opened` to `Finalized`.

use crate::config::ConversionConfig;
use crate::error::Pdf2PptxError;
use crate::output::ConversionStats;
use crate::package::{PackageAssembler, SlideRecord};
use crate::pipeline::classify::{classify_with, count_pairs, PairingStrategy};
use crate::pipeline::document::PageSource;
use crate::pipeline::notes::extract_notes;
use crate::pipeline::render::{render_slide, validate_dpi};
use crate::progress::ProgressCallback;
use std::io::{Seek, Write};
use std::time::Instant;
use tracing::{debug, info};

/// Lifecycle of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Opened,
    Streaming,
    Finalized,
    Closed,
    Failed,
}

/// Drives one conversion of one document.
pub struct Pipeline<'d, D: PageSource + ?Sized> {
    document: Option<&'d D>,
    strategy: Option<Box<dyn PairingStrategy>>,
    pairing: String,
    dpi: u32,
    progress: Option<ProgressCallback>,
    state: PipelineState,
}

impl<'d, D: PageSource + ?Sized> Pipeline<'d, D> {
    /// A pipeline in the `Idle` state.
    ///
    /// Fails with [`Pdf2PptxError::InvalidParameter`] on a DPI of zero,
    /// before any document is touched.
    pub fn new(config: &ConversionConfig) -> Result<Self, Pdf2PptxError> {
        validate_dpi(config.dpi)?;
        Ok(Self {
            document: None,
            strategy: Some(config.pairing.strategy()),
            pairing: config.pairing.to_string(),
            dpi: config.dpi,
            progress: config.progress_callback.clone(),
            state: PipelineState::Idle,
        })
    }

    /// Take an opened document for the run.
    pub fn open(&mut self, document: &'d D) -> Result<(), Pdf2PptxError> {
        if self.state != PipelineState::Idle {
            return Err(Pdf2PptxError::InvalidState(format!(
                "open called in state {:?}",
                self.state
            )));
        }
        info!(
            "Pipeline opened: {} pages, {} pairing, {} DPI",
            document.page_count(),
            self.pairing,
            self.dpi
        );
        self.document = Some(document);
        self.state = PipelineState::Opened;
        Ok(())
    }

    /// Replace the pairing policy with a caller-supplied one.
    pub fn with_strategy(mut self, strategy: Box<dyn PairingStrategy>) -> Self {
        self.strategy = Some(strategy);
        self.pairing = "custom".to_string();
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Convert every pair into `sink` and return it with the run's stats.
    ///
    /// Any error leaves the pipeline in [`PipelineState::Failed`]; the sink
    /// is dropped and must be discarded by the caller.
    pub fn run<W: Write + Seek>(
        &mut self,
        sink: W,
    ) -> Result<(W, ConversionStats), Pdf2PptxError> {
        if self.state != PipelineState::Opened {
            return Err(Pdf2PptxError::InvalidState(format!(
                "run called in state {:?}",
                self.state
            )));
        }
        match self.stream(sink) {
            Ok(done) => {
                self.state = PipelineState::Finalized;
                Ok(done)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                Err(e)
            }
        }
    }

    /// Release the document once the package has been published.
    pub fn close(&mut self) -> Result<(), Pdf2PptxError> {
        if self.state != PipelineState::Finalized {
            return Err(Pdf2PptxError::InvalidState(format!(
                "close called in state {:?}",
                self.state
            )));
        }
        self.document = None;
        self.state = PipelineState::Closed;
        debug!("Pipeline closed");
        Ok(())
    }

    fn stream<W: Write + Seek>(&mut self, sink: W) -> Result<(W, ConversionStats), Pdf2PptxError> {
        let started = Instant::now();
        let document = self
            .document
            .ok_or_else(|| Pdf2PptxError::InvalidState("document already released".into()))?;
        let strategy = self
            .strategy
            .take()
            .ok_or_else(|| Pdf2PptxError::InvalidState("pipeline already ran".into()))?;

        let page_count = document.page_count();
        let total = count_pairs(strategy.as_ref(), page_count);
        if let Some(cb) = &self.progress {
            cb.on_conversion_start(total);
        }

        let mut assembler = PackageAssembler::begin(sink).with_title(document.title());
        let mut render_ms = 0u64;
        let mut with_notes = 0usize;

        for pair in classify_with(strategy, page_count) {
            if self.state == PipelineState::Opened {
                self.state = PipelineState::Streaming;
            }
            if let Some(cb) = &self.progress {
                cb.on_slide_start(pair.ordinal, total);
            }

            let render_start = Instant::now();
            let rendered = render_slide(document, pair.slide, self.dpi)?;
            render_ms += render_start.elapsed().as_millis() as u64;

            let notes = match pair.note {
                Some(note) => extract_notes(document, note)?,
                None => String::new(),
            };
            let notes_len = notes.len();
            if !notes.is_empty() {
                with_notes += 1;
            }

            assembler.add_slide(SlideRecord {
                ordinal: pair.ordinal,
                image_png: rendered.png,
                pixel_width: rendered.pixel_width,
                pixel_height: rendered.pixel_height,
                size: rendered.size,
                notes,
            })?;

            debug!(
                "Slide {} ← page {} ({:?})",
                pair.ordinal, pair.slide, pair.note
            );
            if let Some(cb) = &self.progress {
                cb.on_slide_complete(pair.ordinal, total, notes_len);
            }
        }

        let canvas = assembler
            .canvas()
            .unwrap_or(crate::package::layout::DEFAULT_CANVAS);
        let slides = assembler.slide_count();
        let mut sink = assembler.finalize()?;
        let package_bytes = sink
            .stream_position()
            .map_err(|e| Pdf2PptxError::write("package", e))?;

        if let Some(cb) = &self.progress {
            cb.on_conversion_complete(slides);
        }

        let stats = ConversionStats {
            total_pages: page_count,
            slides,
            slides_with_notes: with_notes,
            dpi: self.dpi,
            pairing: self.pairing.clone(),
            canvas_width_emu: canvas.cx,
            canvas_height_emu: canvas.cy,
            package_bytes,
            render_duration_ms: render_ms,
            total_duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            "Converted {} pages into {} slides ({} with notes), {} bytes",
            stats.total_pages, stats.slides, stats.slides_with_notes, stats.package_bytes
        );
        Ok((sink, stats))
    }
}
