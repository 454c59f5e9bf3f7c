//! Note extraction: turn a note source into plain speaker-notes text.
//!
//! Layout and formatting are discarded; only readable text survives. A note
//! page that carries nothing but graphics yields an empty string, which is
//! the normal "no notes" case rather than an error.

use crate::error::Pdf2PptxError;
use crate::pipeline::classify::NoteRef;
use crate::pipeline::document::PageSource;
use tracing::debug;

/// Extract the notes text for one slide.
pub fn extract_notes<D: PageSource + ?Sized>(
    document: &D,
    note: NoteRef,
) -> Result<String, Pdf2PptxError> {
    let raw = match note {
        NoteRef::Page(index) => document.page_text(index)?,
        NoteRef::Annotations(index) => document.annotation_notes(index)?.join("\n"),
    };
    let text = normalize_notes(&raw);
    debug!("Extracted {} chars of notes from {:?}", text.len(), note);
    Ok(text)
}

/// Normalise extracted text for a notes body.
///
/// Line endings become `\n`, trailing whitespace is trimmed from each line,
/// leading and trailing blank lines are removed, and characters that XML 1.0
/// cannot carry are dropped.
pub fn normalize_notes(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = unified
        .split('\n')
        .map(|line| {
            line.chars()
                .filter(|&c| is_xml_char(c) && (c == '\t' || !c.is_control()))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();

    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Flatten a one-line property value such as a document title: line breaks
/// and tabs become spaces, other control and non-XML characters are dropped.
pub fn normalize_single_line(raw: &str) -> String {
    raw.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .filter(|&c| is_xml_char(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(normalize_notes("Remember to pause here"), "Remember to pause here");
    }

    #[test]
    fn line_endings_are_unified_and_trimmed() {
        assert_eq!(
            normalize_notes("\r\n  \r\nFirst point  \r\nSecond\rThird\n\n"),
            "First point\nSecond\nThird"
        );
    }

    #[test]
    fn inner_blank_lines_survive() {
        assert_eq!(normalize_notes("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn graphics_only_page_gives_empty_notes() {
        assert_eq!(normalize_notes(""), "");
        assert_eq!(normalize_notes(" \n\t\n "), "");
    }

    #[test]
    fn xml_illegal_characters_are_dropped() {
        assert_eq!(normalize_notes("a\u{0}b\u{2}c\u{FFFE}d"), "abcd");
        assert_eq!(normalize_notes("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn single_line_values_lose_control_characters() {
        assert_eq!(normalize_single_line("Deck\u{1}\u{0}"), "Deck");
        assert_eq!(normalize_single_line(" Q3\r\nreview\t"), "Q3  review");
        assert_eq!(normalize_single_line("\u{0}\u{0}"), "");
    }

    #[test]
    fn leading_indentation_is_kept() {
        assert_eq!(normalize_notes("  - sub point"), "  - sub point");
    }
}
