//! DOCX → PDF with a simple flowing layout.
//!
//! Positions are computed in millimetres from the top-left corner of an A4
//! page and converted to PDF points (origin bottom-left) when drawn.

use crate::docx::{read_paragraphs, DocxParagraph};
use crate::error::ConverterError;
use crate::pdf::fonts::{encode_win_ansi, BaseFont};
use crate::pdf::images::{A4_HEIGHT_PT, A4_WIDTH_PT};
use crate::pdf::DocumentBuilder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream, StringFormat};
use tracing::{debug, info};

const PT_PER_MM: f32 = 72.0 / 25.4;

const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MM: f32 = 15.0;
const LEFT_MM: f32 = 10.0;
const MAX_WIDTH_MM: f32 = 190.0;
const BOTTOM_MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const PARAGRAPH_GAP_MM: f32 = 3.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Lay out the paragraphs of a DOCX on A4 pages.
pub fn word_to_pdf(docx: &[u8]) -> Result<Vec<u8>, ConverterError> {
    let paragraphs = read_paragraphs(docx)?;
    layout_paragraphs(&paragraphs)
}

/// Lay out already-parsed paragraphs. Always produces at least one page.
pub fn layout_paragraphs(paragraphs: &[DocxParagraph]) -> Result<Vec<u8>, ConverterError> {
    let mut pages: Vec<Vec<Operation>> = vec![Vec::new()];
    let mut y = TOP_MM;

    for para in paragraphs.iter().filter(|p| !p.text.trim().is_empty()) {
        let size = font_size(para.heading);
        let font = if size > 11.0 { BaseFont::HelveticaBold } else { BaseFont::Helvetica };
        let resource = if font == BaseFont::HelveticaBold { BOLD } else { REGULAR };

        for line in wrap_text(para.text.trim(), font, size, MAX_WIDTH_MM * PT_PER_MM) {
            if y + LINE_HEIGHT_MM > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
                pages.push(Vec::new());
                y = TOP_MM;
            }
            if let Some(ops) = pages.last_mut() {
                ops.extend(text_line(resource, size, LEFT_MM * PT_PER_MM, A4_HEIGHT_PT - y * PT_PER_MM, &line));
            }
            y += LINE_HEIGHT_MM;
        }
        y += PARAGRAPH_GAP_MM;
    }

    let mut builder = DocumentBuilder::new();
    let doc = builder.document_mut();
    let regular_id = doc.add_object(BaseFont::Helvetica.dictionary());
    let bold_id = doc.add_object(BaseFont::HelveticaBold.dictionary());
    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([
            (REGULAR, Object::Reference(regular_id)),
            (BOLD, Object::Reference(bold_id)),
        ])),
    )]));

    let page_total = pages.len();
    for operations in pages {
        let content = Content { operations }.encode()?;
        let content_id = builder.document_mut().add_object(Stream::new(Dictionary::new(), content));
        builder.add_page(Dictionary::from_iter([
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()]),
            ),
            ("Resources", Object::Reference(resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
    }

    info!(paragraphs = paragraphs.len(), pages = page_total, "Laid out DOCX as PDF");
    builder.finish_bytes()
}

/// 16/14/12 pt for heading levels 1/2/3, 11 pt for body text.
fn font_size(heading: Option<u8>) -> f32 {
    match heading {
        Some(1) => 16.0,
        Some(2) => 14.0,
        Some(3) => 12.0,
        _ => 11.0,
    }
}

fn text_line(font: &str, size: f32, x: f32, y: f32, text: &str) -> [Operation; 5] {
    [
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font.into()), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::String(encode_win_ansi(text), StringFormat::Literal)]),
        Operation::new("ET", vec![]),
    ]
}

/// Greedy word wrap to `max_width` points. `\n` forces a break; a word
/// wider than a whole line is cut between characters.
pub(crate) fn wrap_text(text: &str, font: BaseFont, size: f32, max_width: f32) -> Vec<String> {
    let fits = |s: &str| font.text_width(s, size) <= max_width;
    let mut lines = Vec::new();

    for hard_line in text.split('\n') {
        let mut current = String::new();
        for word in hard_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
            } else {
                let mut pieces = split_word(word, &fits);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    debug!(lines = lines.len(), "Wrapped paragraph");
    lines
}

/// Cut `word` into the longest prefixes that fit. A single character
/// wider than the line still gets its own piece.
fn split_word(word: &str, fits: &impl Fn(&str) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if !fits(&piece) && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::replace(&mut piece, ch.to_string()));
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
