//! OOXML word-processing document text extraction.
//!
//! A .docx file is a ZIP package whose main part, `word/document.xml`,
//! holds the paragraph list. Text lives in `<w:t>` runs; a full XML
//! parser is not needed to read them out.

use std::io::{Cursor, Read};

use tracing::debug;

/// Extract paragraph texts, joined by newlines.
///
/// Returns `None` when the bytes are not a readable OOXML package.
pub(crate) fn extract(bytes: &[u8]) -> Option<String> {
    let mut archive = match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(err) => {
            debug!("not a ZIP package: {err}");
            return None;
        }
    };

    let mut xml = String::new();
    match archive.by_name("word/document.xml") {
        Ok(mut part) => {
            if let Err(err) = part.read_to_string(&mut xml) {
                debug!("unreadable document part: {err}");
                return None;
            }
        }
        Err(err) => {
            debug!("missing document part: {err}");
            return None;
        }
    }

    Some(document_xml_to_text(&xml))
}

/// Walk the document XML, collecting `<w:t>` run texts into paragraphs.
fn document_xml_to_text(xml: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            break;
        };
        let tag = &after[..close];
        let body = &after[close + 1..];

        if tag == "w:t" || tag.starts_with("w:t ") {
            let Some(end) = body.find("</w:t>") else {
                break;
            };
            paragraph.push_str(&unescape(&body[..end]));
            rest = &body[end + "</w:t>".len()..];
            continue;
        }

        match tag {
            "w:tab/" => paragraph.push(' '),
            "w:br/" => paragraph.push('\n'),
            "/w:p" => paragraphs.push(std::mem::take(&mut paragraph)),
            _ => {}
        }

        rest = body;
    }

    paragraphs.join("\n")
}

/// Resolve the predefined XML entities.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
