//! Progress-callback trait for per-slide conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each slide.
//!
//! # Example
//!
//! ```rust
//! use pdf2pptx::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_slide_complete(&self, ordinal: usize, total: usize, notes_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Slide {}/{} done ({} bytes of notes)", ordinal + 1, total, notes_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each slide.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in slide order from a single thread,
/// but that thread may not be the caller's (async entry points run the
/// pipeline on a blocking worker).
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first slide is rendered.
    ///
    /// # Arguments
    /// * `total_slides`: number of slides the deck will contain
    fn on_conversion_start(&self, total_slides: usize) {
        let _ = total_slides;
    }

    /// Called before a slide page is rasterised.
    ///
    /// # Arguments
    /// * `ordinal`: 0-based slide position
    /// * `total`: total slides
    fn on_slide_start(&self, ordinal: usize, total: usize) {
        let _ = (ordinal, total);
    }

    /// Called once a slide and its notes are in the package.
    ///
    /// # Arguments
    /// * `ordinal`: 0-based slide position
    /// * `total`: total slides
    /// * `notes_len`: byte length of the slide's notes
    fn on_slide_complete(&self, ordinal: usize, total: usize, notes_len: usize) {
        let _ = (ordinal, total, notes_len);
    }

    /// Called once after the package has been finalized.
    fn on_conversion_complete(&self, total_slides: usize) {
        let _ = total_slides;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

