//! Slide geometry in EMU: the deck canvas and where a slide image sits on it.

use crate::pipeline::document::PageSize;
use std::ops::RangeInclusive;

/// Slide sizes PresentationML accepts on either axis: 1in to 56in.
pub const SLIDE_SIZE_RANGE: RangeInclusive<i64> = 914_400..=51_206_400;

/// Canvas used when a deck has no slides at all: 10in × 7.5in.
pub const DEFAULT_CANVAS: Canvas = Canvas {
    cx: 9_144_000,
    cy: 6_858_000,
};

/// Notes page size declared in the presentation part: 7.5in × 10in portrait.
pub const NOTES_SIZE: Canvas = Canvas {
    cx: 6_858_000,
    cy: 9_144_000,
};

/// The deck-wide slide size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub cx: i64,
    pub cy: i64,
}

impl Canvas {
    pub fn from_page(size: PageSize) -> Self {
        let (cx, cy) = size.to_emu();
        Self {
            cx: cx.max(1),
            cy: cy.max(1),
        }
    }

    /// Whether viewers will accept this canvas as a slide size.
    pub fn in_slide_size_range(&self) -> bool {
        SLIDE_SIZE_RANGE.contains(&self.cx) && SLIDE_SIZE_RANGE.contains(&self.cy)
    }

    /// Position of an image of physical size `page` on this canvas.
    ///
    /// A page matching the canvas fills it exactly. Any other page is scaled
    /// uniformly until it touches the canvas on one axis, then centered.
    pub fn place(&self, page: PageSize) -> Placement {
        let (w, h) = page.to_emu();
        if (w, h) == (self.cx, self.cy) || w <= 0 || h <= 0 {
            return Placement {
                x: 0,
                y: 0,
                cx: self.cx,
                cy: self.cy,
            };
        }

        let scale = (self.cx as f64 / w as f64).min(self.cy as f64 / h as f64);
        let cx = ((w as f64 * scale).round() as i64).clamp(1, self.cx);
        let cy = ((h as f64 * scale).round() as i64).clamp(1, self.cy);
        Placement {
            x: (self.cx - cx) / 2,
            y: (self.cy - cy) / 2,
            cx,
            cy,
        }
    }
}

/// Offset and extent of the slide picture, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Placement {
    pub fn fills(&self, canvas: Canvas) -> bool {
        self.x == 0 && self.y == 0 && self.cx == canvas.cx && self.cy == canvas.cy
    }
}
