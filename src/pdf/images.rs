//! Building a PDF out of raster images, one A4 page per image.

use super::DocumentBuilder;
use crate::error::ConverterError;
use crate::pipeline::encode::{encode_jpeg, DEFAULT_JPEG_QUALITY};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream};
use tracing::{debug, info};

/// A4 portrait in points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Image XObject name used on every page.
const IMAGE_NAME: &str = "Im0";

/// A JPEG ready to be embedded with `DCTDecode`.
struct JpegImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    components: u8,
}

/// One page per image, image at the top edge, full page width, height kept
/// in proportion. Baseline/progressive JPEGs in gray or RGB are embedded
/// byte for byte; every other input is decoded and re-encoded as JPEG.
pub fn images_to_pdf(images: &[&[u8]]) -> Result<Vec<u8>, ConverterError> {
    if images.is_empty() {
        return Err(ConverterError::InvalidInput("No images to convert".into()));
    }

    let mut builder = DocumentBuilder::new();
    for (i, bytes) in images.iter().enumerate() {
        let jpeg = prepare(bytes)?;
        debug!(image = i + 1, width = jpeg.width, height = jpeg.height, "Embedding image");

        let draw_w = A4_WIDTH_PT;
        let draw_h = A4_WIDTH_PT * jpeg.height as f32 / jpeg.width as f32;
        let colour_space = if jpeg.components == 1 { "DeviceGray" } else { "DeviceRGB" };

        let doc = builder.document_mut();
        let image_id = doc.add_object(Stream::new(
            Dictionary::from_iter([
                ("Type", Object::Name(b"XObject".to_vec())),
                ("Subtype", Object::Name(b"Image".to_vec())),
                ("Width", Object::Integer(i64::from(jpeg.width))),
                ("Height", Object::Integer(i64::from(jpeg.height))),
                ("ColorSpace", Object::Name(colour_space.into())),
                ("BitsPerComponent", Object::Integer(8)),
                ("Filter", Object::Name(b"DCTDecode".to_vec())),
            ]),
            jpeg.data,
        )
        .with_compression(false));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        draw_w.into(),
                        0.into(),
                        0.into(),
                        draw_h.into(),
                        0.into(),
                        (A4_HEIGHT_PT - draw_h).into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.into())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        builder.add_page(Dictionary::from_iter([
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()]),
            ),
            ("Contents", Object::Reference(content_id)),
            (
                "Resources",
                Object::Dictionary(Dictionary::from_iter([(
                    "XObject",
                    Object::Dictionary(Dictionary::from_iter([(IMAGE_NAME, Object::Reference(image_id))])),
                )])),
            ),
        ]));
    }

    info!(pages = builder.page_count(), "Built PDF from images");
    builder.finish_bytes()
}

fn prepare(bytes: &[u8]) -> Result<JpegImage, ConverterError> {
    if let Some((width, height, components)) = jpeg_header(bytes) {
        if matches!(components, 1 | 3) && width > 0 && height > 0 {
            return Ok(JpegImage {
                data: bytes.to_vec(),
                width,
                height,
                components,
            });
        }
    }
    let img = image::load_from_memory(bytes)?;
    Ok(JpegImage {
        data: encode_jpeg(&img, DEFAULT_JPEG_QUALITY)?,
        width: img.width(),
        height: img.height(),
        components: 3,
    })
}

/// Dimensions and component count from a JPEG's start-of-frame segment.
fn jpeg_header(bytes: &[u8]) -> Option<(u32, u32, u8)> {
    if bytes.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(pos + 1)?;
        match marker {
            // fill bytes
            0xFF => {
                pos += 1;
                continue;
            }
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }
        let len = u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]) as usize;
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let seg = bytes.get(pos + 4..pos + 2 + len)?;
            let height = u16::from_be_bytes([*seg.get(1)?, *seg.get(2)?]);
            let width = u16::from_be_bytes([*seg.get(3)?, *seg.get(4)?]);
            return Some((u32::from(width), u32::from(height), *seg.get(5)?));
        }
        if marker == 0xDA || len < 2 {
            return None;
        }
        pos += 2 + len;
    }
}
