//! Splitting a PDF into per-page or per-range documents.

use super::{load, page_ids, DocumentBuilder};
use crate::config::SplitOptions;
use crate::error::ConverterError;
use lopdf::ObjectId;
use tracing::{debug, info};

/// One single-page PDF per page, in page order.
pub fn split_pdf(bytes: &[u8]) -> Result<Vec<Vec<u8>>, ConverterError> {
    let source = load(bytes)?;
    let pages = page_ids(&source);
    info!(pages = pages.len(), "Splitting into single pages");
    pages
        .iter()
        .map(|&page| build(&source, &[page]))
        .collect()
}

/// Split according to `options`.
///
/// Returns one PDF per resolved range, or a single PDF holding every range
/// in order when `merge_ranges` is set. Ranges are clamped to the document
/// and ranges left empty by clamping are skipped; when nothing survives the
/// result is [`ConverterError::NoPagesSelected`].
pub fn split_pdf_with(bytes: &[u8], options: &SplitOptions) -> Result<Vec<Vec<u8>>, ConverterError> {
    let source = load(bytes)?;
    let pages = page_ids(&source);
    let ranges = options.resolve(pages.len());
    if ranges.is_empty() {
        return Err(ConverterError::NoPagesSelected { total: pages.len() });
    }
    debug!(?ranges, merge = options.merge_ranges, "Resolved split ranges");

    let selections: Vec<Vec<ObjectId>> = ranges
        .into_iter()
        .map(|range| pages[range].to_vec())
        .collect();

    let outputs = if options.merge_ranges {
        let all: Vec<ObjectId> = selections.concat();
        vec![build(&source, &all)?]
    } else {
        selections
            .iter()
            .map(|sel| build(&source, sel))
            .collect::<Result<Vec<_>, _>>()?
    };

    info!(outputs = outputs.len(), "Split complete");
    Ok(outputs)
}

fn build(source: &lopdf::Document, pages: &[ObjectId]) -> Result<Vec<u8>, ConverterError> {
    let mut builder = DocumentBuilder::new();
    builder.copy_pages(source, pages)?;
    builder.finish_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PageRange, PageSelection, SplitMode};
    use crate::pdf::page_count;
    use crate::pdf::test_support::{page_text, sample_pdf};

    fn first_page_text(bytes: &[u8]) -> String {
        let doc = load(bytes).unwrap();
        page_text(&doc, page_ids(&doc)[0])
    }

    #[test]
    fn split_gives_one_pdf_per_page() {
        let parts = split_pdf(&sample_pdf(3)).unwrap();
        assert_eq!(parts.len(), 3);
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(page_count(part).unwrap(), 1);
            assert!(first_page_text(part).contains(&format!("Page {}", i + 1)));
        }
    }

    #[test]
    fn ranges_are_clamped_and_inverted_ranges_skipped() {
        let opts = SplitOptions::ranges(
            vec![PageRange::new(2, 99), PageRange::new(3, 1), PageRange::new(1, 1)],
            false,
        );
        let parts = split_pdf_with(&sample_pdf(4), &opts).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(page_count(&parts[0]).unwrap(), 3);
        assert!(first_page_text(&parts[0]).contains("Page 2"));
        assert_eq!(page_count(&parts[1]).unwrap(), 1);
    }

    #[test]
    fn merged_ranges_form_one_document() {
        let opts = SplitOptions::ranges(vec![PageRange::new(3, 3), PageRange::new(1, 2)], true);
        let parts = split_pdf_with(&sample_pdf(3), &opts).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(page_count(&parts[0]).unwrap(), 3);
        assert!(first_page_text(&parts[0]).contains("Page 3"));
    }

    #[test]
    fn nothing_selected_is_an_error() {
        let opts = SplitOptions::ranges(vec![PageRange::new(5, 9)], false);
        let err = split_pdf_with(&sample_pdf(2), &opts).unwrap_err();
        assert!(matches!(err, ConverterError::NoPagesSelected { total: 2 }));
    }

    #[test]
    fn extract_mode_pulls_selected_pages() {
        let opts = SplitOptions {
            mode: SplitMode::Extract(PageSelection::Set(vec![4, 2])),
            merge_ranges: true,
        };
        let parts = split_pdf_with(&sample_pdf(4), &opts).unwrap();
        assert_eq!(page_count(&parts[0]).unwrap(), 2);
        assert!(first_page_text(&parts[0]).contains("Page 2"));
    }
}
