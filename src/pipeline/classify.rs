//! Page classification: split the page sequence into (slide, notes) pairs.
//!
//! The pairing policy is chosen by the caller, never guessed from content.
//! A [`PairingStrategy`] decides, given a cursor into the document, which
//! page is the next slide, where its notes come from, and how many pages the
//! pair consumed. [`PagePairs`] drives a strategy lazily and forward-only, so
//! no page is touched before the pipeline asks for it.

use crate::error::Pdf2PptxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

/// Where the notes for a slide come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRef {
    /// The text layer of a dedicated note page.
    Page(usize),
    /// The comment annotations attached to the given (slide) page.
    Annotations(usize),
}

/// One unit of work produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePair {
    /// Dense 0-based slide position in the output deck.
    pub ordinal: usize,
    /// Index of the page to rasterise.
    pub slide: usize,
    /// Notes source, or `None` when the slide has no notes.
    pub note: Option<NoteRef>,
}

/// Role of a page under a pairing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRole {
    Slide,
    Note,
    /// A slide whose note page is missing (trailing page of an odd
    /// interleaved document).
    Unpaired,
}

/// A pairing policy. Implementations must consume at least one page per
/// pair and must never look past `page_count`.
pub trait PairingStrategy: Send + Sync {
    /// Pair starting at `cursor`, plus the number of pages it consumed.
    /// `None` once the document is exhausted.
    fn pair_at(&self, cursor: usize, page_count: usize) -> Option<(usize, Option<NoteRef>, usize)>;
}

/// Every page is a slide; there are no notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNotes;

impl PairingStrategy for NoNotes {
    fn pair_at(&self, cursor: usize, page_count: usize) -> Option<(usize, Option<NoteRef>, usize)> {
        (cursor < page_count).then_some((cursor, None, 1))
    }
}

/// Pages alternate slide, note, slide, note, …
#[derive(Debug, Clone, Copy, Default)]
pub struct Interleaved;

impl PairingStrategy for Interleaved {
    fn pair_at(&self, cursor: usize, page_count: usize) -> Option<(usize, Option<NoteRef>, usize)> {
        if cursor >= page_count {
            return None;
        }
        let note = cursor + 1;
        if note < page_count {
            Some((cursor, Some(NoteRef::Page(note)), 2))
        } else {
            Some((cursor, None, 1))
        }
    }
}

/// Every page is a slide; its notes are its own comment annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotated;

impl PairingStrategy for Annotated {
    fn pair_at(&self, cursor: usize, page_count: usize) -> Option<(usize, Option<NoteRef>, usize)> {
        (cursor < page_count).then_some((cursor, Some(NoteRef::Annotations(cursor)), 1))
    }
}

/// Built-in pairing modes, selected explicitly by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairingMode {
    /// Every page is a slide. (default)
    #[default]
    NoNotes,
    /// Slide pages alternate with note pages.
    Interleaved,
    /// Every page is a slide; notes come from its comment annotations.
    Annotations,
}

impl PairingMode {
    pub const ALL: [PairingMode; 3] = [
        PairingMode::NoNotes,
        PairingMode::Interleaved,
        PairingMode::Annotations,
    ];

    pub fn strategy(self) -> Box<dyn PairingStrategy> {
        match self {
            PairingMode::NoNotes => Box::new(NoNotes),
            PairingMode::Interleaved => Box::new(Interleaved),
            PairingMode::Annotations => Box::new(Annotated),
        }
    }

    /// Number of slides a document of `page_count` pages yields.
    pub fn slide_count(self, page_count: usize) -> usize {
        match self {
            PairingMode::Interleaved => page_count.div_ceil(2),
            PairingMode::NoNotes | PairingMode::Annotations => page_count,
        }
    }

    /// Role of page `index` in a document of `page_count` pages.
    pub fn role_of(self, index: usize, page_count: usize) -> PageRole {
        match self {
            PairingMode::Interleaved if index % 2 == 1 => PageRole::Note,
            PairingMode::Interleaved if index + 1 >= page_count => PageRole::Unpaired,
            _ => PageRole::Slide,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PairingMode::NoNotes => "none",
            PairingMode::Interleaved => "interleaved",
            PairingMode::Annotations => "annotations",
        }
    }
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PairingMode {
    type Err = Pdf2PptxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no-notes" | "nonotes" => Ok(PairingMode::NoNotes),
            "interleaved" | "alternate" => Ok(PairingMode::Interleaved),
            "annotations" | "comments" => Ok(PairingMode::Annotations),
            other => Err(Pdf2PptxError::InvalidParameter(format!(
                "unknown pairing mode '{other}' (expected none, interleaved or annotations)"
            ))),
        }
    }
}

/// Lazy, forward-only sequence of page pairs.
pub struct PagePairs {
    strategy: Box<dyn PairingStrategy>,
    page_count: usize,
    cursor: usize,
    ordinal: usize,
}

impl PagePairs {
    /// Pages not yet consumed.
    pub fn remaining_pages(&self) -> usize {
        self.page_count.saturating_sub(self.cursor)
    }
}

impl Iterator for PagePairs {
    type Item = PagePair;

    fn next(&mut self) -> Option<PagePair> {
        if self.cursor >= self.page_count {
            return None;
        }
        let (slide, note, consumed) = self.strategy.pair_at(self.cursor, self.page_count)?;
        // A strategy that consumes nothing would loop forever.
        self.cursor += consumed.max(1);
        let pair = PagePair {
            ordinal: self.ordinal,
            slide,
            note,
        };
        self.ordinal += 1;
        Some(pair)
    }
}

impl FusedIterator for PagePairs {}

/// Classify a document of `page_count` pages with a built-in mode.
pub fn classify(mode: PairingMode, page_count: usize) -> PagePairs {
    classify_with(mode.strategy(), page_count)
}

/// Classify with a caller-supplied strategy.
pub fn classify_with(strategy: Box<dyn PairingStrategy>, page_count: usize) -> PagePairs {
    PagePairs {
        strategy,
        page_count,
        cursor: 0,
        ordinal: 0,
    }
}

/// Number of pairs `strategy` yields for `page_count` pages.
///
/// Strategies work on indices only, so this touches no page.
pub fn count_pairs(strategy: &dyn PairingStrategy, page_count: usize) -> usize {
    let mut cursor = 0;
    let mut pairs = 0;
    while cursor < page_count {
        match strategy.pair_at(cursor, page_count) {
            Some((_, _, consumed)) => {
                cursor += consumed.max(1);
                pairs += 1;
            }
            None => break,
        }
    }
    pairs
}
