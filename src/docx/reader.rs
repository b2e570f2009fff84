//! Paragraph text from `word/document.xml`.

use super::DOCUMENT_PART;
use crate::error::ConverterError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// A paragraph of a Word document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocxParagraph {
    /// Run text; `w:tab` becomes `\t` and `w:br`/`w:cr` become `\n`.
    pub text: String,
    /// 1 for `Title`/`Heading 1`, 2 for `Heading 2`, and so on.
    pub heading: Option<u8>,
}

fn local_name(q: &[u8]) -> &[u8] {
    match q.iter().position(|&b| b == b':') {
        Some(i) => &q[i + 1..],
        None => q,
    }
}

fn attr_val(e: &BytesStart<'_>, key_local: &[u8]) -> Option<String> {
    e.attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| local_name(attr.key.as_ref()) == key_local)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Heading level from a `w:pStyle` value such as `Heading1`, `heading 2` or `Title`.
fn heading_from_style(style: &str) -> Option<u8> {
    let lower = style.to_ascii_lowercase();
    if lower == "title" {
        return Some(1);
    }
    let rest = lower.strip_prefix("heading")?;
    let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u8>().ok().map(|n| n.max(1))
}

/// Open a DOCX and return its body paragraphs in document order, including
/// empty ones. Paragraphs nested inside others (text boxes) are emitted
/// before their container.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<DocxParagraph>, ConverterError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ConverterError::InvalidDocx(format!("not a ZIP container: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| ConverterError::InvalidDocx(format!("missing {DOCUMENT_PART}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ConverterError::InvalidDocx(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    let paragraphs = parse_document_xml(&xml)?;
    debug!(paragraphs = paragraphs.len(), "Read DOCX body");
    Ok(paragraphs)
}

/// Parse the main document part.
pub fn parse_document_xml(xml: &str) -> Result<Vec<DocxParagraph>, ConverterError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut out = Vec::new();
    // innermost paragraph last
    let mut open: Vec<DocxParagraph> = Vec::new();
    let mut in_t = false;
    let mut in_ppr = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"p" => open.push(DocxParagraph { text: String::new(), heading: None }),
                b"t" => in_t = true,
                b"pPr" => in_ppr = true,
                other => apply_marker(other, &e, in_ppr, &mut open),
            },
            Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"p" => out.push(DocxParagraph { text: String::new(), heading: None }),
                other => apply_marker(other, &e, in_ppr, &mut open),
            },
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"t" => in_t = false,
                b"pPr" => in_ppr = false,
                b"p" => {
                    if let Some(para) = open.pop() {
                        out.push(para);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_t => {
                let text = t
                    .unescape()
                    .map_err(|e| ConverterError::InvalidDocx(format!("bad text node: {e}")))?;
                if let Some(para) = open.last_mut() {
                    para.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConverterError::InvalidDocx(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Elements that change the current paragraph without carrying text.
/// Tab stops declared in paragraph properties are not tabs.
fn apply_marker(name: &[u8], e: &BytesStart<'_>, in_ppr: bool, open: &mut [DocxParagraph]) {
    let Some(para) = open.last_mut() else {
        return;
    };
    match name {
        b"pStyle" => {
            if let Some(level) = attr_val(e, b"val").as_deref().and_then(heading_from_style) {
                para.heading = Some(level);
            }
        }
        b"outlineLvl" => {
            // 9 means body text
            if let Some(n) = attr_val(e, b"val").and_then(|v| v.parse::<u8>().ok()) {
                if n < 9 && para.heading.is_none() {
                    para.heading = Some(n + 1);
                }
            }
        }
        b"tab" if !in_ppr => para.text.push('\t'),
        b"br" | b"cr" if !in_ppr => para.text.push('\n'),
        _ => {}
    }
}
