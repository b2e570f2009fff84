//! DOCX packaging for the two shapes PDF → DOCX produces: flowing text, or
//! one full-width picture per page.

use super::{CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, EMU_PER_INCH, PACKAGE_RELS_PART};
use crate::error::ConverterError;
use crate::pipeline::render::PageImage;
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Picture width in the image document: 8.5 in, the full US-Letter width.
pub const IMAGE_WIDTH_EMU: u64 = 17 * EMU_PER_INCH / 2;

/// Paragraph spacing for text documents, in twentieths of a point.
pub const SPACING_LINE: u32 = 240;
pub const SPACING_AFTER: u32 = 200;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// One paragraph of a text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordParagraph {
    pub text: String,
    /// Start the paragraph on a new page.
    pub page_break_before: bool,
    /// Apply [`SPACING_LINE`]/[`SPACING_AFTER`].
    pub spaced: bool,
}

impl WordParagraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_break_before: false,
            spaced: true,
        }
    }

    /// The placeholder written for a page without any text.
    pub fn empty_page(page_break_before: bool) -> Self {
        Self {
            text: String::new(),
            page_break_before,
            spaced: false,
        }
    }

    pub fn with_page_break(mut self, page_break_before: bool) -> Self {
        self.page_break_before = page_break_before;
        self
    }
}

/// Build a DOCX from text paragraphs on A4 with one-inch margins.
pub fn text_document(paragraphs: &[WordParagraph]) -> Result<Vec<u8>, ConverterError> {
    let mut body = String::new();
    for para in paragraphs {
        write_text_paragraph(&mut body, para);
    }
    let sect = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#;
    let document = format!(
        r#"{XML_DECL}<w:document xmlns:w="{NS_W}" xmlns:r="{NS_R}"><w:body>{body}{sect}</w:body></w:document>"#
    );
    package(&document, &[])
}

fn write_text_paragraph(out: &mut String, para: &WordParagraph) {
    out.push_str("<w:p>");
    if para.page_break_before || para.spaced {
        out.push_str("<w:pPr>");
        if para.page_break_before {
            out.push_str("<w:pageBreakBefore/>");
        }
        if para.spaced {
            let _ = write!(out, r#"<w:spacing w:line="{SPACING_LINE}" w:after="{SPACING_AFTER}"/>"#);
        }
        out.push_str("</w:pPr>");
    }
    out.push_str("<w:r>");
    for (i, chunk) in para.text.split('\t').enumerate() {
        if i > 0 {
            out.push_str("<w:tab/>");
        }
        let _ = write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(chunk));
    }
    out.push_str("</w:r></w:p>");
}

/// Build a DOCX with one inline picture per page on zero-margin US Letter.
///
/// Every picture is [`IMAGE_WIDTH_EMU`] wide with its height following the
/// page's aspect ratio; a page break precedes every picture but the first.
pub fn image_document(pages: &[PageImage]) -> Result<Vec<u8>, ConverterError> {
    let mut body = String::new();
    let mut media = Vec::with_capacity(pages.len());

    for (idx, page) in pages.iter().enumerate() {
        let n = idx + 1;
        let cx = IMAGE_WIDTH_EMU;
        let cy = (IMAGE_WIDTH_EMU as f64 * page.aspect_ratio()).round() as u64;
        let page_break = if idx > 0 { r#"<w:r><w:br w:type="page"/></w:r>"# } else { "" };
        let _ = write!(
            body,
            r#"<w:p>{page_break}<w:r><w:rPr/><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{n}" name="Image{n}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="{NS_PIC}"><pic:pic><pic:nvPicPr><pic:cNvPr id="{n}" name="image{n}.jpg"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId{n}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
        );
        media.push((format!("image{n}.jpg"), page.jpeg.as_slice()));
    }

    let sect = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="0" w:right="0" w:bottom="0" w:left="0" w:header="0" w:footer="0" w:gutter="0"/></w:sectPr>"#;
    let document = format!(
        r#"{XML_DECL}<w:document xmlns:w="{NS_W}" xmlns:r="{NS_R}" xmlns:wp="{NS_WP}" xmlns:a="{NS_A}" xmlns:pic="{NS_PIC}"><w:body>{body}{sect}</w:body></w:document>"#
    );
    package(&document, &media)
}

/// Zip up the document part, its relationships and the media files.
fn package(document_xml: &str, media: &[(String, &[u8])]) -> Result<Vec<u8>, ConverterError> {
    let jpeg_default = if media.is_empty() {
        ""
    } else {
        r#"<Default Extension="jpg" ContentType="image/jpeg"/>"#
    };
    let content_types = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{jpeg_default}<Override PartName="/{DOCUMENT_PART}" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#
    );
    let package_rels = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{NS_R}/officeDocument" Target="{DOCUMENT_PART}"/></Relationships>"#
    );
    let mut document_rels = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
    );
    for (i, (name, _)) in media.iter().enumerate() {
        let _ = write!(
            document_rels,
            r#"<Relationship Id="rId{}" Type="{NS_R}/image" Target="media/{name}"/>"#,
            i + 1
        );
    }
    document_rels.push_str("</Relationships>");

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut add = |name: &str, data: &[u8]| -> Result<(), ZipError> {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        Ok(())
    };
    add(CONTENT_TYPES_PART, content_types.as_bytes())?;
    add(PACKAGE_RELS_PART, package_rels.as_bytes())?;
    add(DOCUMENT_PART, document_xml.as_bytes())?;
    add(DOCUMENT_RELS_PART, document_rels.as_bytes())?;
    for (name, data) in media {
        add(&format!("word/media/{name}"), data)?;
    }
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn part(docx: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut s = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn text_document_has_mandatory_parts() {
        let docx = text_document(&[WordParagraph::new("Hello")]).unwrap();
        let archive = ZipArchive::new(Cursor::new(&docx)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for required in [CONTENT_TYPES_PART, PACKAGE_RELS_PART, DOCUMENT_PART, DOCUMENT_RELS_PART] {
            assert!(names.contains(&required), "missing {required}");
        }
    }

    #[test]
    fn text_is_escaped() {
        let docx = text_document(&[WordParagraph::new("a < b & \"c\"")]).unwrap();
        let xml = part(&docx, DOCUMENT_PART);
        assert!(xml.contains("a &lt; b &amp; &quot;c&quot;"), "{xml}");
    }

    #[test]
    fn page_breaks_and_spacing() {
        let paras = vec![
            WordParagraph::new("first"),
            WordParagraph::new("second").with_page_break(true),
            WordParagraph::empty_page(true),
        ];
        let xml = part(&text_document(&paras).unwrap(), DOCUMENT_PART);
        assert_eq!(xml.matches("<w:pageBreakBefore/>").count(), 2);
        assert_eq!(xml.matches(r#"w:line="240" w:after="200""#).count(), 2);
    }

    #[test]
    fn tabs_become_tab_elements() {
        let xml = part(&text_document(&[WordParagraph::new("a\tb")]).unwrap(), DOCUMENT_PART);
        assert!(xml.contains("<w:tab/>"));
    }

    #[test]
    fn image_document_embeds_media() {
        let pages = vec![
            PageImage { jpeg: vec![0xFF, 0xD8, 1], width_px: 100, height_px: 200 },
            PageImage { jpeg: vec![0xFF, 0xD8, 2], width_px: 100, height_px: 100 },
        ];
        let docx = image_document(&pages).unwrap();
        let xml = part(&docx, DOCUMENT_PART);
        assert!(xml.contains(r#"cx="7772400" cy="15544800""#));
        assert!(xml.contains(r#"cx="7772400" cy="7772400""#));
        assert_eq!(xml.matches(r#"<w:br w:type="page"/>"#).count(), 1);
        assert!(xml.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));

        let rels = part(&docx, DOCUMENT_RELS_PART);
        assert!(rels.contains(r#"Target="media/image2.jpg""#));

        let mut archive = ZipArchive::new(Cursor::new(&docx)).unwrap();
        let mut img = Vec::new();
        archive.by_name("word/media/image1.jpg").unwrap().read_to_end(&mut img).unwrap();
        assert_eq!(img, vec![0xFF, 0xD8, 1]);
    }
}
