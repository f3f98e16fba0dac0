//! Row location and per-row field extraction.
//!
//! Rows are anchored exclusively on non-blank entries in the Index column.
//! Each anchor yields a containment region that is open-ended to the page's
//! right edge (later columns may start well to the right) and padded
//! vertically to absorb sub-point baseline drift between fragments that
//! belong to the same logical row.

use crate::geometry::{fully_contains, Rect, TextFragment};
use crate::table::columns::{Column, ColumnFragments, PageGeometry};

/// Vertical padding in points applied above and below a row anchor. Shared
/// by all rows.
const ROW_BUFFER: f64 = 5.0;

/// A derived containment region for one table row.
#[derive(Debug, Clone)]
pub struct RowRange {
    pub rect: Rect,
}

/// Raw field text for one row, trimmed but not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub primary_name: String,
    pub start_date: String,
    pub end_date: String,
}

/// Derive one row region per non-blank Index-column fragment.
///
/// Row order follows the Index fragments' input order (top-to-bottom as
/// emitted by the renderer) and is preserved through to the final output.
pub fn locate_rows(index_fragments: &[&TextFragment], page: &PageGeometry) -> Vec<RowRange> {
    index_fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .map(|f| RowRange {
            rect: Rect::new(
                f.rect.x,
                f.rect.y - ROW_BUFFER,
                page.width - f.rect.x,
                f.rect.height + 2.0 * ROW_BUFFER,
            ),
        })
        .collect()
}

/// Extract the raw field text for every row.
///
/// For each row and each data column independently, the column's fragments
/// fully contained in the row region are concatenated in their original
/// column-list order -- never re-sorted by position, since coordinates are
/// unreliable at sub-point precision while the renderer already emits
/// fragments in reading order. The concatenation is then trimmed.
pub fn extract_rows(rows: &[RowRange], columns: &ColumnFragments<'_>) -> Vec<RawRow> {
    rows.iter()
        .map(|row| RawRow {
            primary_name: field_text(row, columns.get(Column::PrimaryName)),
            start_date: field_text(row, columns.get(Column::StartDate)),
            end_date: field_text(row, columns.get(Column::EndDate)),
        })
        .collect()
}

fn field_text(row: &RowRange, fragments: &[&TextFragment]) -> String {
    let mut text = String::new();
    for fragment in fragments {
        if fully_contains(&row.rect, &fragment.rect) {
            text.push_str(&fragment.text);
        }
    }
    text.trim().to_string()
}
