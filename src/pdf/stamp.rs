//! Drawing text on top of existing pages.
//!
//! A stamp never rewrites a page's own content. The existing content
//! streams are bracketed by a `q` stream in front and a `Q` at the start of
//! the overlay stream, so whatever graphics state the page leaves behind
//! (clipping, CTM, colours) is discarded before the overlay is drawn.

use super::fonts::{encode_win_ansi, BaseFont};
use super::{inherited_attribute, load, media_box, page_ids, resolve, save};
use crate::config::WatermarkOptions;
use crate::error::ConverterError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::info;

const WATERMARK_FONT: &str = "LcWmFont";
const WATERMARK_GSTATE: &str = "LcWmGs";
const NUMBER_FONT: &str = "LcPnFont";

/// Draw the watermark text on every page.
///
/// The baseline starts at a quarter of the page width and half its height
/// and is rotated by `options.angle_degrees` around that point.
pub fn watermark_pdf(bytes: &[u8], options: &WatermarkOptions) -> Result<Vec<u8>, ConverterError> {
    let mut doc = load(bytes)?;
    let font_id = doc.add_object(BaseFont::HelveticaBold.dictionary());
    let gs_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"ExtGState".to_vec())),
        ("ca", Object::Real(options.opacity)),
        ("CA", Object::Real(options.opacity)),
    ]));

    let (sin, cos) = options.angle_degrees.to_radians().sin_cos();
    let [r, g, b] = options.color;
    let text = encode_win_ansi(&options.text);

    let pages = page_ids(&doc);
    for &page_id in &pages {
        let [x0, y0, x1, y1] = media_box(&doc, page_id);
        let x = x0 + (x1 - x0) / 4.0;
        let y = y0 + (y1 - y0) / 2.0;
        let ops = vec![
            Operation::new("gs", vec![Object::Name(WATERMARK_GSTATE.into())]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(WATERMARK_FONT.into()), options.font_size.into()]),
            Operation::new("Tm", vec![cos.into(), sin.into(), (-sin).into(), cos.into(), x.into(), y.into()]),
            Operation::new("Tj", vec![Object::String(text.clone(), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ];
        add_resource(&mut doc, page_id, b"Font", WATERMARK_FONT, font_id)?;
        add_resource(&mut doc, page_id, b"ExtGState", WATERMARK_GSTATE, gs_id)?;
        overlay(&mut doc, page_id, ops)?;
    }

    info!(pages = pages.len(), text = %options.text, "Watermarked PDF");
    save(&mut doc)
}

/// Draw `Page i of n` near the bottom centre of every page.
pub fn add_page_numbers(bytes: &[u8]) -> Result<Vec<u8>, ConverterError> {
    let mut doc = load(bytes)?;
    let font_id = doc.add_object(BaseFont::Helvetica.dictionary());

    let pages = page_ids(&doc);
    let total = pages.len();
    for (i, &page_id) in pages.iter().enumerate() {
        let [x0, y0, x1, _] = media_box(&doc, page_id);
        let x = x0 + (x1 - x0) / 2.0 - 30.0;
        let y = y0 + 20.0;
        let label = format!("Page {} of {}", i + 1, total);
        let ops = vec![
            Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(NUMBER_FONT.into()), 10.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::String(encode_win_ansi(&label), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ];
        add_resource(&mut doc, page_id, b"Font", NUMBER_FONT, font_id)?;
        overlay(&mut doc, page_id, ops)?;
    }

    info!(pages = total, "Numbered pages");
    save(&mut doc)
}

/// Give the page its own resource dictionary (copied from the inherited or
/// shared one) and register `name` → `target` under `category`.
fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    target: ObjectId,
) -> Result<(), ConverterError> {
    let mut resources = inherited_attribute(doc, page_id, b"Resources")
        .and_then(|o| resolve(doc, &o).as_dict().ok().cloned())
        .unwrap_or_default();

    let mut entries = resources
        .get(category)
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok().cloned())
        .unwrap_or_default();
    entries.set(name, Object::Reference(target));
    resources.set(category, Object::Dictionary(entries));

    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Wrap the page's existing content in `q … Q` and append `ops` after it.
fn overlay(doc: &mut Document, page_id: ObjectId, ops: Vec<Operation>) -> Result<(), ConverterError> {
    let mut operations = Vec::with_capacity(ops.len() + 3);
    operations.push(Operation::new("Q", vec![]));
    operations.push(Operation::new("q", vec![]));
    operations.extend(ops);
    operations.push(Operation::new("Q", vec![]));
    let stamp = Content { operations }.encode()?;

    let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp));

    let existing: Vec<Object> = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(obj @ Object::Reference(_)) => match resolve(doc, obj) {
            Object::Array(items) => items.clone(),
            _ => vec![obj.clone()],
        },
        _ => Vec::new(),
    };

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(existing);
    contents.push(Object::Reference(stamp_id));
    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}
