//! Presentation package writing (OOXML PresentationML in a zip container).
//!
//! ```text
//! SlideRecord ─► PackageAssembler::add_slide ─► media/imageN.png
//!                                             ├► slides/slideN.xml (+rels)
//!                                             └► notesSlides/notesSlideN.xml (+rels)
//! finalize ─► presentation.xml, content types, properties, masters, themes
//! ```

pub mod assembler;
pub mod constants;
pub mod layout;
pub mod parts;
pub mod template;

pub use assembler::{PackageAssembler, SlideRecord};
pub use layout::{Canvas, Placement};
