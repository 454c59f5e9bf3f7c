//! The package assembler: accumulates slides and writes the deck.
//!
//! Slide, notes and image parts are streamed into the zip as each slide
//! arrives, so only per-slide bookkeeping stays in memory. The manifest and
//! the fixed parts are written by [`PackageAssembler::finalize`].
//!
//! Every entry carries the same timestamp and entries are written in a fixed
//! order, so the same slides always produce the same bytes.

use crate::error::{zip_to_io, Pdf2PptxError};
use crate::package::layout::{Canvas, Placement, DEFAULT_CANVAS};
use crate::package::parts;
use crate::package::template::{self, part};
use crate::pipeline::document::PageSize;
use crate::pipeline::notes::normalize_single_line;
use std::io::{Cursor, Seek, Write};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// First id handed out to a slide. Ids below 256 are reserved.
const FIRST_SLIDE_ID: u32 = 256;

/// Largest slide id the format accepts.
const MAX_SLIDE_ID: u32 = 2_147_483_647;

/// Everything the assembler needs to know about one slide.
#[derive(Debug, Clone)]
pub struct SlideRecord {
    /// Dense 0-based position in the deck.
    pub ordinal: usize,
    /// PNG-encoded slide image.
    pub image_png: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Physical size of the source page.
    pub size: PageSize,
    /// Speaker notes, possibly empty.
    pub notes: String,
}

/// Hands out slide ids. Ids are never reused within one package.
#[derive(Debug)]
struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            next: FIRST_SLIDE_ID,
        }
    }

    fn allocate(&mut self) -> Result<u32, Pdf2PptxError> {
        if self.next > MAX_SLIDE_ID {
            return Err(Pdf2PptxError::InvalidState(
                "slide id space exhausted".into(),
            ));
        }
        let id = self.next;
        self.next += 1;
        Ok(id)
    }
}

#[derive(Debug, Clone, Copy)]
struct DeckEntry {
    slide_id: u32,
    has_notes: bool,
}

/// Deck-wide state: the canvas fixed by the first slide and one entry per
/// slide in ordinal order.
#[derive(Debug)]
struct Deck {
    canvas: Option<Canvas>,
    entries: Vec<DeckEntry>,
    ids: IdAllocator,
}

impl Deck {
    fn new() -> Self {
        Self {
            canvas: None,
            entries: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    fn slide_ids(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.slide_id).collect()
    }

    fn notes_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_notes).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    Open,
    Finalized,
    Failed,
}

/// Builds one presentation package into `W`.
pub struct PackageAssembler<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    deck: Deck,
    title: Option<String>,
    state: AssemblerState,
}

impl PackageAssembler<Cursor<Vec<u8>>> {
    /// An assembler that builds the package in memory.
    pub fn in_memory() -> Self {
        Self::begin(Cursor::new(Vec::new()))
    }
}

impl<W: Write + Seek> PackageAssembler<W> {
    /// Start a package in `sink`. Nothing is written until the first slide.
    pub fn begin(sink: W) -> Self {
        Self {
            zip: Some(ZipWriter::new(sink)),
            deck: Deck::new(),
            title: None,
            state: AssemblerState::Open,
        }
    }

    /// Set the document title carried in the core properties. Characters
    /// XML cannot carry are dropped.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title
            .map(|t| normalize_single_line(&t))
            .filter(|t| !t.is_empty());
        self
    }

    /// The deck canvas, once the first slide has fixed it.
    pub fn canvas(&self) -> Option<Canvas> {
        self.deck.canvas
    }

    pub fn slide_count(&self) -> usize {
        self.deck.entries.len()
    }

    /// Append one slide with its notes.
    ///
    /// The first slide fixes the canvas. A slide of a different size is
    /// scaled uniformly and centered. Ordinals must arrive as 0, 1, 2, …
    pub fn add_slide(&mut self, record: SlideRecord) -> Result<(), Pdf2PptxError> {
        self.ensure_open("add_slide")?;

        let expected = self.deck.entries.len();
        if record.ordinal != expected {
            return Err(Pdf2PptxError::InvalidState(format!(
                "slide ordinal {} out of order, expected {expected}",
                record.ordinal
            )));
        }
        if record.pixel_width == 0 || record.pixel_height == 0 {
            return Err(Pdf2PptxError::InvalidParameter(format!(
                "slide {} has an empty image",
                record.ordinal
            )));
        }

        let canvas = match self.deck.canvas {
            Some(canvas) => canvas,
            None => {
                let canvas = Canvas::from_page(record.size);
                if !canvas.in_slide_size_range() {
                    warn!(
                        "Deck canvas {}x{} EMU is outside the 1in to 56in slide size range; \
                         viewers may reject or resize the presentation",
                        canvas.cx, canvas.cy
                    );
                }
                self.deck.canvas = Some(canvas);
                canvas
            }
        };
        let placement = canvas.place(record.size);
        if !placement.fills(canvas) {
            warn!(
                "Slide {} is {:.1}x{:.1}pt, differs from the deck canvas; centering at ({}, {})",
                record.ordinal, record.size.width_pt, record.size.height_pt, placement.x, placement.y
            );
        }

        let slide_id = self.deck.ids.allocate()?;
        if let Err(e) = self.write_slide_parts(&record, placement) {
            self.state = AssemblerState::Failed;
            return Err(e);
        }

        debug!(
            "Added slide {} (id {}, {}x{} px, {} bytes of notes)",
            record.ordinal,
            slide_id,
            record.pixel_width,
            record.pixel_height,
            record.notes.len()
        );
        self.deck.entries.push(DeckEntry {
            slide_id,
            has_notes: !record.notes.is_empty(),
        });
        Ok(())
    }

    /// Write the manifest and the fixed parts, then close the package.
    ///
    /// Must be called exactly once; any later call on the assembler fails
    /// with [`Pdf2PptxError::InvalidState`].
    pub fn finalize(&mut self) -> Result<W, Pdf2PptxError> {
        self.ensure_open("finalize")?;
        self.state = AssemblerState::Failed;

        let mut zip = self
            .zip
            .take()
            .ok_or_else(|| Pdf2PptxError::Internal("zip writer missing".into()))?;

        let canvas = self.deck.canvas.unwrap_or(DEFAULT_CANVAS);
        let slide_count = self.deck.entries.len();

        let manifest: [(&str, String); 6] = [
            (part::CONTENT_TYPES, parts::content_types_xml(slide_count)),
            (part::ROOT_RELS, parts::root_rels_xml()),
            (part::CORE, parts::core_xml(self.title.as_deref())),
            (part::APP, parts::app_xml(slide_count, self.deck.notes_count())),
            (
                part::PRESENTATION,
                parts::presentation_xml(&self.deck.slide_ids(), canvas),
            ),
            (
                part::PRESENTATION_RELS,
                parts::presentation_rels_xml(slide_count),
            ),
        ];
        for (name, xml) in &manifest {
            write_part(&mut zip, name, xml.as_bytes(), xml_options())?;
        }

        let fixed: [(&str, String); 11] = [
            (part::SLIDE_MASTER, template::SLIDE_MASTER.to_string()),
            (part::SLIDE_MASTER_RELS, template::slide_master_rels()),
            (part::SLIDE_LAYOUT, template::SLIDE_LAYOUT.to_string()),
            (part::SLIDE_LAYOUT_RELS, template::slide_layout_rels()),
            (part::NOTES_MASTER, template::NOTES_MASTER.to_string()),
            (part::NOTES_MASTER_RELS, template::notes_master_rels()),
            (part::THEME1, template::THEME.to_string()),
            (part::THEME2, template::THEME.to_string()),
            (part::PRES_PROPS, template::PRES_PROPS.to_string()),
            (part::VIEW_PROPS, template::VIEW_PROPS.to_string()),
            (part::TABLE_STYLES, template::TABLE_STYLES.to_string()),
        ];
        for (name, xml) in &fixed {
            write_part(&mut zip, name, xml.as_bytes(), xml_options())?;
        }

        let sink = zip
            .finish()
            .map_err(|e| Pdf2PptxError::write("package", zip_to_io(e)))?;

        self.state = AssemblerState::Finalized;
        info!(
            "Package finalized: {} slides, canvas {}x{} EMU",
            slide_count, canvas.cx, canvas.cy
        );
        Ok(sink)
    }

    fn ensure_open(&self, op: &str) -> Result<(), Pdf2PptxError> {
        match self.state {
            AssemblerState::Open => Ok(()),
            AssemblerState::Finalized => Err(Pdf2PptxError::InvalidState(format!(
                "{op} called after finalize"
            ))),
            AssemblerState::Failed => Err(Pdf2PptxError::InvalidState(format!(
                "{op} called after the package failed"
            ))),
        }
    }

    fn write_slide_parts(
        &mut self,
        record: &SlideRecord,
        placement: Placement,
    ) -> Result<(), Pdf2PptxError> {
        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| Pdf2PptxError::Internal("zip writer missing".into()))?;
        let n = record.ordinal + 1;

        write_part(zip, &parts::image_part(n), &record.image_png, image_options())?;
        write_part(
            zip,
            &parts::slide_part(n),
            parts::slide_xml(n, placement).as_bytes(),
            xml_options(),
        )?;
        write_part(
            zip,
            &parts::slide_rels_part(n),
            parts::slide_rels_xml(n).as_bytes(),
            xml_options(),
        )?;
        write_part(
            zip,
            &parts::notes_part(n),
            parts::notes_xml(&record.notes).as_bytes(),
            xml_options(),
        )?;
        write_part(
            zip,
            &parts::notes_rels_part(n),
            parts::notes_rels_xml(n).as_bytes(),
            xml_options(),
        )
    }
}

/// PNG data is already compressed.
fn image_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
}

fn xml_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> Result<(), Pdf2PptxError> {
    zip.start_file(name, options)
        .map_err(|e| Pdf2PptxError::write(name, zip_to_io(e)))?;
    zip.write_all(bytes)
        .map_err(|e| Pdf2PptxError::write(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const PNG_STUB: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn record(ordinal: usize, size: PageSize, notes: &str) -> SlideRecord {
        SlideRecord {
            ordinal,
            image_png: PNG_STUB.to_vec(),
            pixel_width: 10,
            pixel_height: 10,
            size,
            notes: notes.to_string(),
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn first_slide_fixes_canvas() {
        let mut asm = PackageAssembler::in_memory();
        assert_eq!(asm.canvas(), None);
        asm.add_slide(record(0, PageSize::new(720.0, 540.0), ""))
            .unwrap();
        asm.add_slide(record(1, PageSize::new(540.0, 540.0), ""))
            .unwrap();
        assert_eq!(
            asm.canvas(),
            Some(Canvas {
                cx: 9_144_000,
                cy: 6_858_000
            })
        );
        let bytes = asm.finalize().unwrap().into_inner();
        let pres = read_part(&bytes, part::PRESENTATION);
        assert!(pres.contains("<p:sldSz cx=\"9144000\" cy=\"6858000\"/>"));
        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(second.contains("<a:off x=\"1143000\" y=\"0\"/>"));
    }

    #[test]
    fn out_of_order_ordinal_is_rejected() {
        let mut asm = PackageAssembler::in_memory();
        let err = asm
            .add_slide(record(1, PageSize::new(100.0, 100.0), ""))
            .unwrap_err();
        assert!(matches!(err, Pdf2PptxError::InvalidState(_)));
        assert_eq!(asm.slide_count(), 0);
    }

    #[test]
    fn add_after_finalize_is_invalid_state() {
        let mut asm = PackageAssembler::in_memory();
        asm.finalize().unwrap();
        let err = asm
            .add_slide(record(0, PageSize::new(100.0, 100.0), ""))
            .unwrap_err();
        assert!(matches!(err, Pdf2PptxError::InvalidState(_)));
    }

    #[test]
    fn second_finalize_is_invalid_state() {
        let mut asm = PackageAssembler::in_memory();
        asm.add_slide(record(0, PageSize::new(100.0, 100.0), "x"))
            .unwrap();
        asm.finalize().unwrap();
        assert!(matches!(
            asm.finalize().unwrap_err(),
            Pdf2PptxError::InvalidState(_)
        ));
    }

    #[test]
    fn empty_deck_uses_default_canvas() {
        let mut asm = PackageAssembler::in_memory();
        let bytes = asm.finalize().unwrap().into_inner();
        let pres = read_part(&bytes, part::PRESENTATION);
        assert!(pres.contains("<p:sldSz cx=\"9144000\" cy=\"6858000\"/>"));
        assert!(read_part(&bytes, part::APP).contains("<Slides>0</Slides>"));
    }

    #[test]
    fn slide_ids_are_unique_and_increasing() {
        let mut asm = PackageAssembler::in_memory();
        for i in 0..3 {
            asm.add_slide(record(i, PageSize::new(100.0, 100.0), ""))
                .unwrap();
        }
        let bytes = asm.finalize().unwrap().into_inner();
        let pres = read_part(&bytes, part::PRESENTATION);
        for (i, id) in [256, 257, 258].iter().enumerate() {
            assert!(pres.contains(&format!("<p:sldId id=\"{id}\" r:id=\"rId{}\"/>", 7 + i)));
        }
    }

    #[test]
    fn title_and_notes_count_reach_properties() {
        let mut asm = PackageAssembler::in_memory().with_title(Some("Quarterly review".into()));
        asm.add_slide(record(0, PageSize::new(100.0, 100.0), "speak"))
            .unwrap();
        asm.add_slide(record(1, PageSize::new(100.0, 100.0), ""))
            .unwrap();
        let bytes = asm.finalize().unwrap().into_inner();
        assert!(read_part(&bytes, part::CORE).contains("<dc:title>Quarterly review</dc:title>"));
        assert!(read_part(&bytes, part::APP).contains("<Notes>1</Notes>"));
    }

    #[test]
    fn out_of_range_canvas_is_kept_exact() {
        let mut asm = PackageAssembler::in_memory();
        asm.add_slide(record(0, PageSize::new(36.0, 36.0), "")).unwrap();
        let canvas = asm.canvas().unwrap();
        assert!(!canvas.in_slide_size_range());
        let bytes = asm.finalize().unwrap().into_inner();
        let pres = read_part(&bytes, part::PRESENTATION);
        assert!(pres.contains("<p:sldSz cx=\"457200\" cy=\"457200\"/>"));
    }

    #[test]
    fn control_characters_are_dropped_from_title() {
        let mut asm = PackageAssembler::in_memory().with_title(Some("Deck\u{1}\u{0}".into()));
        let bytes = asm.finalize().unwrap().into_inner();
        let core = read_part(&bytes, part::CORE);
        assert!(core.contains("<dc:title>Deck</dc:title>"), "{core}");
        assert!(!core.chars().any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t')));
    }

    #[test]
    fn title_of_only_control_characters_is_omitted() {
        let mut asm = PackageAssembler::in_memory().with_title(Some("\u{0}\u{0}".into()));
        let bytes = asm.finalize().unwrap().into_inner();
        assert!(!read_part(&bytes, part::CORE).contains("dc:title"));
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        let build = || {
            let mut asm = PackageAssembler::in_memory();
            asm.add_slide(record(0, PageSize::new(720.0, 405.0), "a\nb"))
                .unwrap();
            asm.finalize().unwrap().into_inner()
        };
        assert_eq!(build(), build());
    }
}
