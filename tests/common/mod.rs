//! Shared fixtures: an in-memory document and readers for the produced
//! package.

#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use pdf2pptx::{PageSize, PageSource, Pdf2PptxError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::cell::Cell;
use std::io::{Cursor, Read};

/// 10in × 7.5in, the common 4:3 slide size.
pub const SLIDE_4_3: PageSize = PageSize {
    width_pt: 720.0,
    height_pt: 540.0,
};

#[derive(Debug, Clone)]
pub struct FakePage {
    pub size: PageSize,
    pub text: String,
    pub annotations: Vec<String>,
    pub corrupt: bool,
}

/// A paginated document held in memory.
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
    pub title: Option<String>,
    pub rasterized: Cell<usize>,
}

impl FakeDocument {
    /// `count` blank pages of one size.
    pub fn uniform(count: usize, size: PageSize) -> Self {
        Self {
            pages: (0..count)
                .map(|_| FakePage {
                    size,
                    text: String::new(),
                    annotations: Vec::new(),
                    corrupt: false,
                })
                .collect(),
            title: None,
            rasterized: Cell::new(0),
        }
    }

    pub fn with_text(mut self, index: usize, text: &str) -> Self {
        self.pages[index].text = text.to_string();
        self
    }

    pub fn with_annotations(mut self, index: usize, notes: &[&str]) -> Self {
        self.pages[index].annotations = notes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_size(mut self, index: usize, size: PageSize) -> Self {
        self.pages[index].size = size;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn corrupt(mut self, index: usize) -> Self {
        self.pages[index].corrupt = true;
        self
    }

    fn page(&self, index: usize) -> Result<&FakePage, Pdf2PptxError> {
        self.pages.get(index).ok_or(Pdf2PptxError::RenderFailure {
            page: index,
            detail: "no such page".into(),
        })
    }
}

impl PageSource for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        Ok(self.page(index)?.size)
    }

    fn rasterize(&self, index: usize, w: u32, h: u32) -> Result<DynamicImage, Pdf2PptxError> {
        let page = self.page(index)?;
        if page.corrupt {
            return Err(Pdf2PptxError::RenderFailure {
                page: index,
                detail: "malformed content stream".into(),
            });
        }
        self.rasterized.set(self.rasterized.get() + 1);
        let shade = (index * 37 % 256) as u8;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            w,
            h,
            Rgb([shade, 255 - shade, 128]),
        )))
    }

    fn page_text(&self, index: usize) -> Result<String, Pdf2PptxError> {
        Ok(self.page(index)?.text.clone())
    }

    fn annotation_notes(&self, index: usize) -> Result<Vec<String>, Pdf2PptxError> {
        Ok(self.page(index)?.annotations.clone())
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}

// ── Package readers ──────────────────────────────────────────────────────────

pub fn part_names(package: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(package)).expect("valid zip");
    archive.file_names().map(str::to_string).collect()
}

pub fn read_bytes(package: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).expect("valid zip");
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {name}"));
    let mut out = Vec::new();
    file.read_to_end(&mut out).expect("readable part");
    out
}

pub fn read_part(package: &[u8], name: &str) -> String {
    String::from_utf8(read_bytes(package, name)).expect("utf-8 part")
}

/// Number of slides listed in the presentation manifest.
pub fn slide_count(package: &[u8]) -> usize {
    let xml = read_part(package, "ppt/presentation.xml");
    let mut reader = Reader::from_str(&xml);
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"p:sldId" => {
                count += 1
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("presentation.xml: {e}"),
            _ => {}
        }
    }
    count
}

/// The declared slide size `(cx, cy)` in EMU.
pub fn canvas_size(package: &[u8]) -> (i64, i64) {
    let xml = read_part(package, "ppt/presentation.xml");
    let mut reader = Reader::from_str(&xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"p:sldSz" => {
                return (attr_i64(&e, b"cx"), attr_i64(&e, b"cy"));
            }
            Ok(Event::Eof) => panic!("no p:sldSz"),
            Err(e) => panic!("presentation.xml: {e}"),
            _ => {}
        }
    }
}

/// Offset and extent `(x, y, cx, cy)` of the picture on slide `ordinal`.
pub fn picture_geometry(package: &[u8], ordinal: usize) -> (i64, i64, i64, i64) {
    let xml = read_part(package, &format!("ppt/slides/slide{}.xml", ordinal + 1));
    let mut reader = Reader::from_str(&xml);
    let mut in_pic = false;
    let (mut x, mut y, mut cx, mut cy) = (None, None, None, None);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"p:pic" => in_pic = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"p:pic" => in_pic = false,
            Ok(Event::Start(e) | Event::Empty(e)) if in_pic => match e.name().as_ref() {
                b"a:off" => {
                    x = Some(attr_i64(&e, b"x"));
                    y = Some(attr_i64(&e, b"y"));
                }
                b"a:ext" => {
                    cx = Some(attr_i64(&e, b"cx"));
                    cy = Some(attr_i64(&e, b"cy"));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => panic!("slide xml: {e}"),
            _ => {}
        }
    }
    (
        x.expect("a:off"),
        y.expect("a:off"),
        cx.expect("a:ext"),
        cy.expect("a:ext"),
    )
}

/// Notes text of slide `ordinal`: the body paragraphs joined with `\n`.
pub fn notes_text(package: &[u8], ordinal: usize) -> String {
    let xml = read_part(
        package,
        &format!("ppt/notesSlides/notesSlide{}.xml", ordinal + 1),
    );
    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"a:p" => paragraphs.push(String::new()),
                b"a:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) if e.name().as_ref() == b"a:t" => in_text = false,
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().expect("valid text");
                if let Some(last) = paragraphs.last_mut() {
                    last.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("notes xml: {e}"),
            _ => {}
        }
    }
    paragraphs.join("\n")
}

/// Pixel dimensions of the image embedded for slide `ordinal`.
pub fn image_dimensions(package: &[u8], ordinal: usize) -> (u32, u32) {
    let png = read_bytes(package, &format!("ppt/media/image{}.png", ordinal + 1));
    let img = image::load_from_memory(&png).expect("decodable png");
    (img.width(), img.height())
}

fn attr_i64(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> i64 {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse().ok())
        .unwrap_or_else(|| panic!("missing attribute {}", String::from_utf8_lossy(key)))
}
