//! XML for the parts that depend on the deck: slides, notes slides, the
//! presentation manifest, content types and document properties.

use crate::package::constants::{content_type, namespace, relationship_type, XML_HEADER};
use crate::package::layout::{Canvas, Placement, NOTES_SIZE};
use crate::package::template::{part, relationships};
use quick_xml::escape::escape;

/// Fixed relationship ids in `ppt/_rels/presentation.xml.rels`. Slides
/// follow from [`FIRST_SLIDE_REL`].
const PRESENTATION_RELS: [(&str, &str, &str); 6] = [
    ("rId1", relationship_type::SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
    ("rId2", relationship_type::NOTES_MASTER, "notesMasters/notesMaster1.xml"),
    ("rId3", relationship_type::PRES_PROPS, "presProps.xml"),
    ("rId4", relationship_type::VIEW_PROPS, "viewProps.xml"),
    ("rId5", relationship_type::THEME, "theme/theme1.xml"),
    ("rId6", relationship_type::TABLE_STYLES, "tableStyles.xml"),
];

pub const FIRST_SLIDE_REL: usize = PRESENTATION_RELS.len() + 1;

/// Master id; layout ids must be greater.
const SLIDE_MASTER_ID: u32 = 2_147_483_648;

/// Part names for slide number `n` (1-based).
pub fn slide_part(n: usize) -> String {
    format!("ppt/slides/slide{n}.xml")
}

pub fn slide_rels_part(n: usize) -> String {
    format!("ppt/slides/_rels/slide{n}.xml.rels")
}

pub fn notes_part(n: usize) -> String {
    format!("ppt/notesSlides/notesSlide{n}.xml")
}

pub fn notes_rels_part(n: usize) -> String {
    format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels")
}

pub fn image_part(n: usize) -> String {
    format!("ppt/media/image{n}.png")
}

fn open_pml_root(xml: &mut String, element: &str) {
    xml.push_str(XML_HEADER);
    xml.push_str(&format!(
        "\n<p:{element} xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">",
        namespace::DML,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML
    ));
}

fn open_shape_tree(xml: &mut String) {
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str("<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>");
    xml.push_str("<a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>");
}

/// Slide `n`: a single picture shape referencing the image through `rId2`.
pub fn slide_xml(n: usize, placement: Placement) -> String {
    let mut xml = String::with_capacity(1024);
    open_pml_root(&mut xml, "sld");
    open_shape_tree(&mut xml);

    xml.push_str("<p:pic><p:nvPicPr>");
    xml.push_str(&format!(
        "<p:cNvPr id=\"2\" name=\"Slide {n}\" descr=\"Slide {n}\"/>"
    ));
    xml.push_str("<p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>");
    xml.push_str("<p:blipFill><a:blip r:embed=\"rId2\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>");
    xml.push_str(&format!(
        "<p:spPr><a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        placement.x, placement.y, placement.cx, placement.cy
    ));
    xml.push_str("<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

pub fn slide_rels_xml(n: usize) -> String {
    let image = format!("../media/image{n}.png");
    let notes = format!("../notesSlides/notesSlide{n}.xml");
    relationships(&[
        ("rId1", relationship_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        ("rId2", relationship_type::IMAGE, &image),
        ("rId3", relationship_type::NOTES_SLIDE, &notes),
    ])
}

/// Notes slide with a slide-image placeholder and a body holding `notes`,
/// one paragraph per line. Empty notes produce one empty paragraph.
pub fn notes_xml(notes: &str) -> String {
    let mut xml = String::with_capacity(1024 + notes.len() * 2);
    open_pml_root(&mut xml, "notes");
    open_shape_tree(&mut xml);

    xml.push_str("<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Slide Image Placeholder 1\"/>");
    xml.push_str("<p:cNvSpPr><a:spLocks noGrp=\"1\" noRot=\"1\" noChangeAspect=\"1\"/></p:cNvSpPr>");
    xml.push_str("<p:nvPr><p:ph type=\"sldImg\"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>");

    xml.push_str("<p:sp><p:nvSpPr><p:cNvPr id=\"3\" name=\"Notes Placeholder 2\"/>");
    xml.push_str("<p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>");
    xml.push_str("<p:nvPr><p:ph type=\"body\" idx=\"1\"/></p:nvPr></p:nvSpPr><p:spPr/>");
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    if notes.is_empty() {
        xml.push_str("<a:p><a:endParaRPr lang=\"en-US\" dirty=\"0\"/></a:p>");
    } else {
        for line in notes.split('\n') {
            if line.is_empty() {
                xml.push_str("<a:p><a:endParaRPr lang=\"en-US\" dirty=\"0\"/></a:p>");
                continue;
            }
            xml.push_str("<a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>");
            xml.push_str(&escape(line));
            xml.push_str("</a:t></a:r></a:p>");
        }
    }
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
    xml
}

pub fn notes_rels_xml(n: usize) -> String {
    let slide = format!("../slides/slide{n}.xml");
    relationships(&[
        ("rId1", relationship_type::NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
        ("rId2", relationship_type::SLIDE, &slide),
    ])
}

/// The presentation manifest. `slide_ids[i]` is the id of slide `i + 1`.
pub fn presentation_xml(slide_ids: &[u32], canvas: Canvas) -> String {
    let mut xml = String::with_capacity(1024 + slide_ids.len() * 48);
    xml.push_str(XML_HEADER);
    xml.push_str(&format!(
        "\n<p:presentation xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\" saveSubsetFonts=\"1\">",
        namespace::DML,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML
    ));
    xml.push_str(&format!(
        "<p:sldMasterIdLst><p:sldMasterId id=\"{SLIDE_MASTER_ID}\" r:id=\"rId1\"/></p:sldMasterIdLst>"
    ));
    xml.push_str("<p:notesMasterIdLst><p:notesMasterId r:id=\"rId2\"/></p:notesMasterIdLst>");
    if !slide_ids.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (i, id) in slide_ids.iter().enumerate() {
            xml.push_str(&format!(
                "<p:sldId id=\"{id}\" r:id=\"rId{}\"/>",
                FIRST_SLIDE_REL + i
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        "<p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"{}\" cy=\"{}\"/>",
        canvas.cx, canvas.cy, NOTES_SIZE.cx, NOTES_SIZE.cy
    ));
    xml.push_str("</p:presentation>");
    xml
}

pub fn presentation_rels_xml(slide_count: usize) -> String {
    let targets: Vec<(String, String)> = (1..=slide_count)
        .map(|n| {
            (
                format!("rId{}", FIRST_SLIDE_REL + n - 1),
                format!("slides/slide{n}.xml"),
            )
        })
        .collect();

    let mut entries: Vec<(&str, &str, &str)> = PRESENTATION_RELS.to_vec();
    entries.extend(
        targets
            .iter()
            .map(|(id, target)| (id.as_str(), relationship_type::SLIDE, target.as_str())),
    );
    relationships(&entries)
}

pub fn root_rels_xml() -> String {
    relationships(&[
        ("rId1", relationship_type::OFFICE_DOCUMENT, part::PRESENTATION),
        ("rId2", relationship_type::CORE_PROPERTIES, part::CORE),
        ("rId3", relationship_type::EXTENDED_PROPERTIES, part::APP),
    ])
}

pub fn content_types_xml(slide_count: usize) -> String {
    let fixed = [
        (part::PRESENTATION, content_type::PRESENTATION),
        (part::SLIDE_MASTER, content_type::SLIDE_MASTER),
        (part::SLIDE_LAYOUT, content_type::SLIDE_LAYOUT),
        (part::NOTES_MASTER, content_type::NOTES_MASTER),
        (part::THEME1, content_type::THEME),
        (part::THEME2, content_type::THEME),
        (part::PRES_PROPS, content_type::PRES_PROPS),
        (part::VIEW_PROPS, content_type::VIEW_PROPS),
        (part::TABLE_STYLES, content_type::TABLE_STYLES),
        (part::CORE, content_type::CORE_PROPERTIES),
        (part::APP, content_type::EXTENDED_PROPERTIES),
    ];

    let mut xml = String::with_capacity(2048 + slide_count * 256);
    xml.push_str(XML_HEADER);
    xml.push_str(&format!("\n<Types xmlns=\"{}\">", namespace::OPC_CONTENT_TYPES));
    xml.push_str(&format!(
        "<Default Extension=\"rels\" ContentType=\"{}\"/>",
        content_type::RELATIONSHIPS
    ));
    xml.push_str(&format!(
        "<Default Extension=\"xml\" ContentType=\"{}\"/>",
        content_type::XML
    ));
    xml.push_str(&format!(
        "<Default Extension=\"png\" ContentType=\"{}\"/>",
        content_type::PNG
    ));
    for (name, ct) in fixed {
        xml.push_str(&format!("<Override PartName=\"/{name}\" ContentType=\"{ct}\"/>"));
    }
    for n in 1..=slide_count {
        xml.push_str(&format!(
            "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
            slide_part(n),
            content_type::SLIDE
        ));
        xml.push_str(&format!(
            "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
            notes_part(n),
            content_type::NOTES_SLIDE
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// Core properties. No timestamps are written so that output is reproducible.
pub fn core_xml(title: Option<&str>) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_HEADER);
    xml.push_str(
        "\n<cp:coreProperties \
xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
xmlns:dcterms=\"http://purl.org/dc/terms/\" \
xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
    );
    if let Some(title) = title {
        xml.push_str("<dc:title>");
        xml.push_str(&escape(title));
        xml.push_str("</dc:title>");
    }
    xml.push_str("<dc:creator>pdf2pptx</dc:creator>");
    xml.push_str("</cp:coreProperties>");
    xml
}

pub fn app_xml(slides: usize, notes: usize) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_HEADER);
    xml.push_str(
        "\n<Properties \
xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" \
xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">",
    );
    xml.push_str(&format!(
        "<Application>pdf2pptx</Application><PresentationFormat>Custom</PresentationFormat>\
<Slides>{slides}</Slides><Notes>{notes}</Notes><HiddenSlides>0</HiddenSlides>"
    ));
    xml.push_str(&format!("<AppVersion>{}</AppVersion>", app_version()));
    xml.push_str("</Properties>");
    xml
}

/// `AppVersion` must look like `XX.YYYY`.
fn app_version() -> String {
    let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    format!("{major:02}.{minor:04}")
}
