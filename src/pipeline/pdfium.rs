//! pdfium-backed [`PageSource`].
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which keeps
//! thread-local state and is not async-safe. Everything in this module is
//! blocking; the async entry points in [`crate::convert`] run it inside
//! `tokio::task::spawn_blocking`.

use crate::error::Pdf2PptxError;
use crate::pipeline::document::{PageSize, PageSource};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bind to a pdfium shared library.
///
/// Lookup order: `PDFIUM_LIB_PATH` (a library file or the directory holding
/// it), then the working directory, then the system library search path.
pub fn bind_engine() -> Result<Pdfium, Pdf2PptxError> {
    if let Ok(configured) = std::env::var("PDFIUM_LIB_PATH") {
        let configured = PathBuf::from(configured);
        let lib = if configured.is_dir() {
            configured.join(Pdfium::pdfium_platform_library_name())
        } else {
            configured
        };
        debug!("Binding pdfium from PDFIUM_LIB_PATH: {}", lib.display());
        return Pdfium::bind_to_library(&lib)
            .map(Pdfium::new)
            .map_err(|e| Pdf2PptxError::EngineUnavailable(format!("{}: {e}", lib.display())));
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| Pdf2PptxError::EngineUnavailable(e.to_string()))
}

/// An opened PDF document.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `path`, failing with [`Pdf2PptxError::DocumentOpenFailure`] when
    /// the file is corrupt, encrypted without a (correct) password, or not a PDF.
    pub fn open(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, Pdf2PptxError> {
        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{e:?}");
            let detail = if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    "wrong password".to_string()
                } else {
                    "document is encrypted; provide a password".to_string()
                }
            } else {
                err_str
            };
            Pdf2PptxError::DocumentOpenFailure {
                path: path.to_path_buf(),
                detail,
            }
        })?;

        info!(
            "PDF loaded: {} pages ({})",
            document.pages().len(),
            path.display()
        );
        Ok(Self { document })
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>, Pdf2PptxError> {
        let idx = PdfPageIndex::try_from(index)
            .map_err(|_| Pdf2PptxError::render(index, "page index exceeds engine range"))?;
        self.document
            .pages()
            .get(idx)
            .map_err(|e| Pdf2PptxError::render(index, format!("{e:?}")))
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn rasterize(
        &self,
        index: usize,
        width_px: u32,
        height_px: u32,
    ) -> Result<DynamicImage, Pdf2PptxError> {
        let page = self.page(index)?;
        let render_config = PdfRenderConfig::new()
            .set_target_size(width_px as i32, height_px as i32)
            .render_annotations(false)
            .render_form_data(true);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| Pdf2PptxError::render(index, format!("{e:?}")))?;
        Ok(bitmap.as_image())
    }

    fn page_text(&self, index: usize) -> Result<String, Pdf2PptxError> {
        let page = self.page(index)?;
        let text = page
            .text()
            .map_err(|e| Pdf2PptxError::render(index, format!("text layer: {e:?}")))?;
        Ok(text.all())
    }

    fn annotation_notes(&self, index: usize) -> Result<Vec<String>, Pdf2PptxError> {
        let page = self.page(index)?;
        Ok(page
            .annotations()
            .iter()
            .filter(|annotation| {
                matches!(
                    annotation.annotation_type(),
                    PdfPageAnnotationType::Text | PdfPageAnnotationType::Highlight
                )
            })
            .filter_map(|annotation| annotation.contents())
            .filter(|contents| !contents.trim().is_empty())
            .collect())
    }

    fn title(&self) -> Option<String> {
        self.document
            .metadata()
            .get(PdfDocumentMetadataTagType::Title)
            .map(|tag| tag.value().to_string())
            .filter(|v| !v.is_empty())
    }
}
