//! PDF text extraction.

use tracing::debug;

/// Extract the text of every page, joined by newlines.
///
/// Returns `None` when the bytes are not a readable PDF.
pub(crate) fn extract(bytes: &[u8]) -> Option<String> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!("PDF parse error: {err}");
            None
        }
    }
}
