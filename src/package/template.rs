//! Fixed parts shared by every deck: theme, masters, layout and properties.
//!
//! These never depend on the input document, so they are compiled in from
//! `resources/` and written byte-for-byte.

use crate::package::constants::{namespace, relationship_type, XML_HEADER};

pub const THEME: &str = include_str!("../../resources/theme.xml");
pub const SLIDE_MASTER: &str = include_str!("../../resources/slideMaster.xml");
pub const SLIDE_LAYOUT: &str = include_str!("../../resources/slideLayout.xml");
pub const NOTES_MASTER: &str = include_str!("../../resources/notesMaster.xml");
pub const PRES_PROPS: &str = include_str!("../../resources/presProps.xml");
pub const VIEW_PROPS: &str = include_str!("../../resources/viewProps.xml");
pub const TABLE_STYLES: &str = include_str!("../../resources/tableStyles.xml");

/// Part names of the fixed parts.
pub mod part {
    pub const THEME1: &str = "ppt/theme/theme1.xml";
    pub const THEME2: &str = "ppt/theme/theme2.xml";
    pub const SLIDE_MASTER: &str = "ppt/slideMasters/slideMaster1.xml";
    pub const SLIDE_MASTER_RELS: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
    pub const SLIDE_LAYOUT: &str = "ppt/slideLayouts/slideLayout1.xml";
    pub const SLIDE_LAYOUT_RELS: &str = "ppt/slideLayouts/_rels/slideLayout1.xml.rels";
    pub const NOTES_MASTER: &str = "ppt/notesMasters/notesMaster1.xml";
    pub const NOTES_MASTER_RELS: &str = "ppt/notesMasters/_rels/notesMaster1.xml.rels";
    pub const PRES_PROPS: &str = "ppt/presProps.xml";
    pub const VIEW_PROPS: &str = "ppt/viewProps.xml";
    pub const TABLE_STYLES: &str = "ppt/tableStyles.xml";
    pub const PRESENTATION: &str = "ppt/presentation.xml";
    pub const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const CORE: &str = "docProps/core.xml";
    pub const APP: &str = "docProps/app.xml";
}

/// A relationship entry: (id, type, target).
pub type Relationship<'a> = (&'a str, &'a str, &'a str);

/// Serialise a relationships part.
pub fn relationships(entries: &[Relationship<'_>]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 160);
    xml.push_str(XML_HEADER);
    xml.push_str("\n<Relationships xmlns=\"");
    xml.push_str(namespace::OPC_RELATIONSHIPS);
    xml.push_str("\">");
    for (id, rel_type, target) in entries {
        xml.push_str("<Relationship Id=\"");
        xml.push_str(id);
        xml.push_str("\" Type=\"");
        xml.push_str(rel_type);
        xml.push_str("\" Target=\"");
        xml.push_str(target);
        xml.push_str("\"/>");
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn slide_master_rels() -> String {
    relationships(&[
        ("rId1", relationship_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        ("rId2", relationship_type::THEME, "../theme/theme1.xml"),
    ])
}

pub fn slide_layout_rels() -> String {
    relationships(&[(
        "rId1",
        relationship_type::SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

pub fn notes_master_rels() -> String {
    relationships(&[("rId1", relationship_type::THEME, "../theme/theme2.xml")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_standalone_xml() {
        for xml in [
            THEME,
            SLIDE_MASTER,
            SLIDE_LAYOUT,
            NOTES_MASTER,
            PRES_PROPS,
            VIEW_PROPS,
            TABLE_STYLES,
        ] {
            assert!(xml.starts_with(XML_HEADER), "missing header: {}", &xml[..40]);
        }
    }

    #[test]
    fn layout_is_blank() {
        assert!(SLIDE_LAYOUT.contains("type=\"blank\""));
    }

    #[test]
    fn master_points_at_layout_and_theme() {
        let rels = slide_master_rels();
        assert!(rels.contains("Target=\"../slideLayouts/slideLayout1.xml\""));
        assert!(rels.contains("Target=\"../theme/theme1.xml\""));
        assert_eq!(rels.matches("<Relationship ").count(), 2);
    }

    #[test]
    fn notes_master_uses_second_theme() {
        assert!(notes_master_rels().contains("../theme/theme2.xml"));
    }
}
