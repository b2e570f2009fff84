//! Merging several PDFs into one.

use super::{load, page_ids, DocumentBuilder};
use crate::error::ConverterError;
use tracing::{debug, info};

/// Concatenate every page of every input, in input order.
pub fn merge_pdfs(inputs: &[&[u8]]) -> Result<Vec<u8>, ConverterError> {
    if inputs.is_empty() {
        return Err(ConverterError::InvalidInput("No PDFs to merge".into()));
    }

    let mut builder = DocumentBuilder::new();
    for (i, bytes) in inputs.iter().enumerate() {
        let source = load(bytes)?;
        let pages = page_ids(&source);
        debug!(input = i + 1, pages = pages.len(), "Appending document");
        builder.copy_pages(&source, &pages)?;
    }

    info!(inputs = inputs.len(), pages = builder.page_count(), "Merged PDFs");
    builder.finish_bytes()
}
