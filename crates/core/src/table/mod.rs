//! The per-page reconstruction pipeline and the document driver.
//!
//! ```text
//! fragments -> ColumnRange[] -> ColumnFragments -> RowRange[] -> RawRow[]
//!                locate_columns   assign_columns    locate_rows   extract_rows
//!           -> Record[] (per page) -> Record[] (document, deduplicated)
//!                normalize_row          extract_document
//! ```
//!
//! Every stage is a pure transformation; the driver never returns an error.
//! Rows that fail normalization are dropped with a typed reason and counted,
//! so callers can watch data-quality drift without the pipeline halting.

pub mod columns;
pub mod normalize;
pub mod rows;

use crate::geometry::TextFragment;
use crate::record::{dedup_records, Record};

pub use columns::{assign_columns, locate_columns, Column, ColumnFragments, ColumnRange};
pub use columns::PageGeometry;
pub use normalize::{normalize_row, RowError};
pub use rows::{extract_rows, locate_rows, RawRow, RowRange};

/// One page of rendering-boundary output: dimensions plus the flat fragment
/// list, with `y` already translated into the global coordinate space.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based index within the document.
    pub index: usize,
    /// Page width in document points.
    pub width: f64,
    /// Page height in document points.
    pub height: f64,
    pub fragments: Vec<TextFragment>,
}

impl Page {
    fn geometry(&self) -> PageGeometry {
        PageGeometry {
            index: self.index,
            width: self.width,
            height: self.height,
        }
    }
}

/// A row rejected during normalization, kept as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 0-based page index the row came from.
    pub page: usize,
    pub reason: RowError,
}

/// Engine output: the surviving records in first-seen order, plus the rows
/// that were dropped for format failures.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub dropped: Vec<DroppedRow>,
}

/// Run the full reconstruction pipeline on a single page.
///
/// A page without the expected headers (or without a table at all) produces
/// zero records; nothing here is an error. The per-page deduplication pass
/// collapses adjacent duplicate rows manufactured by mis-split index
/// numerals.
pub fn extract_page(page: &Page) -> Extraction {
    let geometry = page.geometry();
    let ranges = locate_columns(&page.fragments, &geometry);
    let columns = assign_columns(&ranges, &page.fragments);
    let row_ranges = locate_rows(columns.get(Column::Index), &geometry);
    let raw_rows = extract_rows(&row_ranges, &columns);

    let mut records = Vec::with_capacity(raw_rows.len());
    let mut dropped = Vec::new();
    for raw in &raw_rows {
        match normalize_row(raw) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("dropping row on page {}: {reason}", page.index);
                dropped.push(DroppedRow {
                    page: page.index,
                    reason,
                });
            }
        }
    }

    Extraction {
        records: dedup_records(records),
        dropped,
    }
}

/// Run the pipeline over every page in order and merge the outputs.
///
/// Pages are independent of one another; the only cross-page step is the
/// final deduplication, which needs the full concatenated list because
/// first-occurrence semantics require a total order (page order, then
/// within-page row order).
pub fn extract_document(pages: &[Page]) -> Extraction {
    let mut records = Vec::new();
    let mut dropped = Vec::new();

    for page in pages {
        let extraction = extract_page(page);
        records.extend(extraction.records);
        dropped.extend(extraction.dropped);
    }

    Extraction {
        records: dedup_records(records),
        dropped,
    }
}
