//! # Text extraction
//!
//! Converts raw file bytes plus a declared media type into plain text
//! for indexing. Extraction is deliberately fail-soft: a file the
//! system cannot read becomes an empty string, never an error. Binary
//! formats without a text representation are simply not indexable.
//!
//! Internally the dispatch keeps a tagged [`ExtractOutcome`] so tests
//! can tell a genuinely empty document from a parse failure; the public
//! boundary collapses both to the empty string.

mod docx;
mod pdf;

use tracing::warn;

/// Media type of PDF documents.
pub const MEDIA_TYPE_PDF: &str = "application/pdf";

/// Media type of OOXML word-processing documents.
pub const MEDIA_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extract plain text from `bytes` according to `media_type`.
///
/// Never fails: unsupported media types and unparseable documents both
/// yield an empty string.
pub fn extract_text(bytes: &[u8], media_type: &str) -> String {
    match extract(bytes, media_type) {
        ExtractOutcome::Extracted(text) => text,
        ExtractOutcome::Unsupported | ExtractOutcome::Failed => String::new(),
    }
}

/// Result of a single extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExtractOutcome {
    /// The format is supported and parsing succeeded (possibly with an
    /// empty document).
    Extracted(String),

    /// The media type has no text representation.
    Unsupported,

    /// The format is supported but the bytes could not be parsed.
    Failed,
}

pub(crate) fn extract(bytes: &[u8], media_type: &str) -> ExtractOutcome {
    // Strip any media type parameters ("text/plain; charset=utf-8").
    let media_type = media_type.split(';').next().unwrap_or("").trim();

    if media_type.starts_with("text/") {
        return ExtractOutcome::Extracted(String::from_utf8_lossy(bytes).into_owned());
    }

    if media_type == MEDIA_TYPE_PDF {
        return match pdf::extract(bytes) {
            Some(text) => ExtractOutcome::Extracted(text),
            None => {
                warn!("failed to parse PDF document");
                ExtractOutcome::Failed
            }
        };
    }

    if media_type == MEDIA_TYPE_DOCX {
        return match docx::extract(bytes) {
            Some(text) => ExtractOutcome::Extracted(text),
            None => {
                warn!("failed to parse word-processing document");
                ExtractOutcome::Failed
            }
        };
    }

    ExtractOutcome::Unsupported
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_decodes_utf8() {
        let text = extract_text("refund policy: 30 days".as_bytes(), "text/plain");
        assert_eq!(text, "refund policy: 30 days");
    }

    #[test]
    fn plain_text_replaces_invalid_bytes() {
        let bytes = b"refund \xff\xfe policy";
        let text = extract_text(bytes, "text/plain; charset=utf-8");
        assert_eq!(text, "refund \u{fffd}\u{fffd} policy");
    }

    #[test]
    fn unsupported_media_type_is_not_indexable() {
        assert_eq!(
            extract(b"\x00\x01\x02", "application/octet-stream"),
            ExtractOutcome::Unsupported
        );
        assert_eq!(extract_text(b"\x00\x01\x02", "application/octet-stream"), "");
    }

    #[test]
    fn empty_document_is_not_a_failure() {
        // An empty text file parses fine; the distinction matters for
        // tests even though both collapse to "" publicly.
        assert_eq!(
            extract(b"", "text/plain"),
            ExtractOutcome::Extracted(String::new())
        );
    }

    #[test]
    fn corrupt_pdf_fails_soft() {
        assert_eq!(extract(b"not a pdf", MEDIA_TYPE_PDF), ExtractOutcome::Failed);
        assert_eq!(extract_text(b"not a pdf", MEDIA_TYPE_PDF), "");
    }

    #[test]
    fn corrupt_docx_fails_soft() {
        assert_eq!(extract(b"not a zip", MEDIA_TYPE_DOCX), ExtractOutcome::Failed);
        assert_eq!(extract_text(b"not a zip", MEDIA_TYPE_DOCX), "");
    }
}
