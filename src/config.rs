//! Configuration types for PDF-to-PPTX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`].

use crate::error::Pdf2PptxError;
use crate::pipeline::classify::PairingMode;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default rasterisation density.
pub const DEFAULT_DPI: u32 = 600;

/// Configuration for a PDF-to-PPTX conversion.
///
/// # Example
/// ```rust
/// use pdf2pptx::{ConversionConfig, PairingMode};
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .pairing(PairingMode::Interleaved)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising slide pages. Default: 600.
    ///
    /// Pixel size is `inches × dpi` on each axis, so memory and package size
    /// grow with the square of this value. There is no upper clamp.
    pub dpi: u32,

    /// How pages pair into slides and notes. Default: [`PairingMode::NoNotes`].
    pub pairing: PairingMode,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional per-slide progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            pairing: PairingMode::default(),
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("pairing", &self.pairing)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn pairing(mut self, mode: PairingMode) -> Self {
        self.config.pairing = mode;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        crate::pipeline::render::validate_dpi(self.config.dpi)?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 600);
        assert_eq!(c.pairing, PairingMode::NoNotes);
        assert!(c.password.is_none());
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let err = ConversionConfig::builder().dpi(0).build().unwrap_err();
        assert!(matches!(err, Pdf2PptxError::InvalidParameter(_)));
    }

    #[test]
    fn high_dpi_is_not_clamped() {
        let c = ConversionConfig::builder().dpi(2400).build().unwrap();
        assert_eq!(c.dpi, 2400);
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder()
            .password("hunter2")
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
