//! Conversion entry points.
//!
//! pdfium is blocking and not async-safe, so the async functions move the
//! whole pipeline onto one `spawn_blocking` thread. The `*_sync` variants
//! run it on the calling thread. [`convert_document`] and
//! [`convert_document_to_file`] accept any [`PageSource`], which is how
//! the pipeline is driven without the native engine.

use crate::config::ConversionConfig;
use crate::error::Pdf2PptxError;
use crate::output::{ConversionOutput, ConversionStats, DocumentInfo, PredictedSlides};
use crate::pipeline::classify::PairingMode;
use crate::pipeline::document::PageSource;
use crate::pipeline::driver::Pipeline;
use crate::pipeline::input::resolve_input;
use crate::pipeline::pdfium::{bind_engine, PdfiumDocument};
use crate::pipeline::render::validate_dpi;
use crate::staging::StagedPackage;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Convert a PDF to a presentation package held in memory.
///
/// # Errors
/// Every error is fatal; nothing is returned for a partially converted deck.
///
/// # Example
/// ```rust,no_run
/// use pdf2pptx::{convert, ConversionConfig, PairingMode};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .pairing(PairingMode::Interleaved)
///     .build()?;
/// let output = convert("talk.pdf", &config).await?;
/// std::fs::write("talk.pptx", &output.package)?;
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let input = input.as_ref().to_path_buf();
    let config = config.clone();
    run_blocking(move || convert_sync(&input, &config)).await
}

/// Convert a PDF and publish the package at `output`.
///
/// The package is staged next to `output` and renamed into place only once
/// it is complete. On failure nothing appears at `output`.
pub async fn convert_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let input = input.as_ref().to_path_buf();
    let output = output.as_ref().to_path_buf();
    let config = config.clone();
    run_blocking(move || convert_file_sync(&input, &output, &config)).await
}

/// Report page count, sizes, title and predicted slide counts.
pub async fn inspect(
    input: impl AsRef<Path>,
    password: Option<String>,
) -> Result<DocumentInfo, Pdf2PptxError> {
    let input = input.as_ref().to_path_buf();
    run_blocking(move || {
        let path = resolve_input(&input)?;
        let pdfium = bind_engine()?;
        let document = PdfiumDocument::open(&pdfium, &path, password.as_deref())?;
        inspect_document(&document)
    })
    .await
}

/// Blocking variant of [`convert`].
pub fn convert_sync(
    input: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    validate_dpi(config.dpi)?;
    let path = resolve_input(input)?;
    let pdfium = bind_engine()?;
    let document = PdfiumDocument::open(&pdfium, &path, config.password.as_deref())?;
    convert_document(&document, config)
}

/// Blocking variant of [`convert_to_file`].
pub fn convert_file_sync(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    validate_dpi(config.dpi)?;
    let path = resolve_input(input)?;
    let pdfium = bind_engine()?;
    let document = PdfiumDocument::open(&pdfium, &path, config.password.as_deref())?;
    convert_document_to_file(&document, output, config)
}

/// Run the pipeline over an opened document into memory.
pub fn convert_document<D: PageSource + ?Sized>(
    document: &D,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let mut pipeline = Pipeline::new(config)?;
    pipeline.open(document)?;
    let (sink, stats) = pipeline.run(Cursor::new(Vec::new()))?;
    pipeline.close()?;
    Ok(ConversionOutput {
        package: sink.into_inner(),
        stats,
    })
}

/// Run the pipeline over an opened document and publish the package at
/// `output` atomically.
pub fn convert_document_to_file<D: PageSource + ?Sized>(
    document: &D,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let mut pipeline = Pipeline::new(config)?;
    pipeline.open(document)?;
    let mut staged = StagedPackage::create(output)?;

    let stats = {
        let (writer, stats) = pipeline.run(staged.writer())?;
        writer
            .into_inner()
            .map_err(|e| Pdf2PptxError::write(output.display().to_string(), e.into_error()))?;
        stats
    };

    let published = staged.publish()?;
    pipeline.close()?;
    info!(
        "{} slides written to {}",
        stats.slides,
        published.display()
    );
    Ok(stats)
}

/// Describe an opened document without converting it.
pub fn inspect_document<D: PageSource + ?Sized>(
    document: &D,
) -> Result<DocumentInfo, Pdf2PptxError> {
    let page_count = document.page_count();
    let first_page = match page_count {
        0 => None,
        _ => Some(document.page_size(0)?),
    };

    let mut mixed_page_sizes = false;
    if let Some(first) = first_page {
        for index in 1..page_count {
            if document.page_size(index)? != first {
                mixed_page_sizes = true;
                break;
            }
        }
    }

    Ok(DocumentInfo {
        page_count,
        first_page,
        mixed_page_sizes,
        title: document.title(),
        predicted_slides: PairingMode::ALL
            .iter()
            .map(|&mode| PredictedSlides {
                mode,
                slides: mode.slide_count(page_count),
            })
            .collect(),
    })
}

async fn run_blocking<T, F>(job: F) -> Result<T, Pdf2PptxError>
where
    F: FnOnce() -> Result<T, Pdf2PptxError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| Pdf2PptxError::Internal(format!("conversion worker failed: {e}")))?
}
