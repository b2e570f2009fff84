//! Lossless size reduction.
//!
//! Nothing here touches image data; the savings come from Flate-compressing
//! streams that were stored raw and from dropping objects nobody references.

use super::{load, save};
use crate::config::CompressionLevel;
use crate::error::ConverterError;
use tracing::info;

pub fn compress_pdf(bytes: &[u8], level: CompressionLevel) -> Result<Vec<u8>, ConverterError> {
    let mut doc = load(bytes)?;
    let objects_before = doc.objects.len();

    match level {
        CompressionLevel::Low => {}
        CompressionLevel::Recommended => {
            doc.compress();
            doc.delete_zero_length_streams();
        }
        CompressionLevel::Extreme => {
            doc.compress();
            doc.delete_zero_length_streams();
            doc.prune_objects();
            doc.renumber_objects();
        }
    }

    let out = save(&mut doc)?;
    info!(
        ?level,
        objects_before,
        objects_after = doc.objects.len(),
        bytes_in = bytes.len(),
        bytes_out = out.len(),
        "Compressed PDF"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::page_count;
    use crate::pdf::test_support::sample_pdf;
    use lopdf::{Document, Object, Stream};

    #[test]
    fn every_level_keeps_the_page_count() {
        let input = sample_pdf(3);
        for level in [CompressionLevel::Low, CompressionLevel::Recommended, CompressionLevel::Extreme] {
            let out = compress_pdf(&input, level).unwrap();
            assert_eq!(page_count(&out).unwrap(), 3, "{level:?}");
        }
    }

    #[test]
    fn extreme_drops_unreferenced_objects() {
        let mut doc = Document::load_mem(&sample_pdf(1)).unwrap();
        doc.add_object(Object::string_literal("orphan"));
        doc.add_object(Stream::new(lopdf::Dictionary::new(), vec![b'x'; 4096]));
        let mut padded = Vec::new();
        doc.save_to(&mut padded).unwrap();

        let out = compress_pdf(&padded, CompressionLevel::Extreme).unwrap();
        assert!(out.len() < padded.len());
        let reloaded = Document::load_mem(&out).unwrap();
        assert!(reloaded.objects.len() < doc.objects.len());
    }
}
