//! Document-rendering boundary for the closure-notices project.
//!
//! This crate owns everything PDF: parsing the byte stream with `lopdf`,
//! walking page content through a text-state machine, and handing back
//! per-page lists of positioned text fragments.
//!
//! Coordinates cross two translations on the way out:
//!
//! 1. PDF's native space has the origin at the bottom-left of each page with
//!    y growing upward. The reconstruction engine wants top-down y, so each
//!    fragment's y is flipped against the page height.
//! 2. Pages are stacked into a single global space so that downstream
//!    geometry never needs a page-relative frame:
//!    `y_global = page_height - y_local + page_index * page_height`.
//!
//! Fragment text is normalized to Unicode NFC so that visually identical
//! strings decoded through different font encodings compare (and hash) equal
//! downstream.

use serde::Serialize;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub mod parser;

use parser::{extract_page_spans, LopdfSource, PageSource, RawSpan};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the rendering boundary.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parse error: {0}")]
    Parse(String),

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A positioned run of text in the global, top-down coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// All text extracted from one page, plus the page's dimensions.
#[derive(Debug, Clone, Serialize)]
pub struct PageText {
    /// 0-based page index within the document.
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub fragments: Vec<Fragment>,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Parse a PDF from memory and render every page into positioned text
/// fragments in the global coordinate space.
///
/// Pages come back in document order with 0-based indices. An encrypted or
/// unparseable document is an error; a page that merely contains no text
/// yields an empty fragment list.
pub fn render_pages(data: &[u8]) -> Result<Vec<PageText>, PdfError> {
    let source = LopdfSource::from_bytes(data)?;

    let mut pages = Vec::new();
    for (index, page_id) in source.pages().into_iter().enumerate() {
        let (width, height) = source.page_size(page_id)?;
        let spans = extract_page_spans(&source, page_id)?;
        pages.push(render_page(index, width, height, spans));
    }

    Ok(pages)
}

/// Translate one page's spans from page-local PDF coordinates into the
/// global space and normalize their text.
fn render_page(index: usize, width: f64, height: f64, spans: Vec<RawSpan>) -> PageText {
    let fragments = spans
        .into_iter()
        .map(|span| Fragment {
            text: span.text.nfc().collect(),
            x: span.x,
            y: global_y(span.y, height, index),
            width: span.width,
            height: span.height,
        })
        .collect();

    PageText {
        index,
        width,
        height,
        fragments,
    }
}

/// Flip a page-local bottom-up y into the top-down global space.
///
/// Page `i` occupies the band `[i * page_height, (i + 1) * page_height)`, so
/// fragments from different pages can never collide geometrically.
fn global_y(y_local: f64, page_height: f64, page_index: usize) -> f64 {
    page_height - y_local + page_index as f64 * page_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_y_flips_within_first_page() {
        // A fragment near the top of a 800pt page (high local y) lands near
        // the top of the global band (low global y).
        assert_eq!(global_y(700.0, 800.0, 0), 100.0);
        assert_eq!(global_y(100.0, 800.0, 0), 700.0);
    }

    #[test]
    fn global_y_offsets_later_pages_into_their_band() {
        assert_eq!(global_y(700.0, 800.0, 1), 900.0);
        assert_eq!(global_y(700.0, 800.0, 2), 1700.0);
    }

    #[test]
    fn global_y_bands_do_not_overlap() {
        // The lowest point of page 0 sits above the highest point of page 1.
        let page0_bottom = global_y(0.0, 800.0, 0);
        let page1_top = global_y(800.0, 800.0, 1);
        assert!(page0_bottom <= page1_top);
    }

    #[test]
    fn render_page_normalizes_to_nfc() {
        // "é" as 'e' + combining acute accent (NFD) becomes the single
        // precomposed code point under NFC.
        let spans = vec![RawSpan {
            text: "Caf\u{0065}\u{0301}".to_string(),
            x: 10.0,
            y: 790.0,
            width: 20.0,
            height: 10.0,
        }];
        let page = render_page(0, 600.0, 800.0, spans);
        assert_eq!(page.fragments[0].text, "Caf\u{00E9}");
    }

    #[test]
    fn render_page_translates_all_fragments() {
        let spans = vec![
            RawSpan {
                text: "No".to_string(),
                x: 40.0,
                y: 700.0,
                width: 10.0,
                height: 10.0,
            },
            RawSpan {
                text: "12".to_string(),
                x: 42.0,
                y: 650.0,
                width: 12.0,
                height: 10.0,
            },
        ];
        let page = render_page(1, 600.0, 800.0, spans);
        assert_eq!(page.index, 1);
        assert_eq!(page.fragments[0].y, 900.0);
        assert_eq!(page.fragments[1].y, 950.0);
        // x is untouched by the translation.
        assert_eq!(page.fragments[0].x, 40.0);
    }

    #[test]
    fn render_pages_rejects_garbage_bytes() {
        assert!(render_pages(b"definitely not a pdf").is_err());
    }
}
