//! Column location and fragment-to-column assignment.
//!
//! Columns are located from header fragments, never guessed from data
//! positions: the i-th fragment whose text exactly matches one of the known
//! header labels becomes the i-th column in declaration order. Each located
//! column then serves as a containment region for bucketing the page's
//! fragments.

use crate::geometry::{fully_contains, Rect, TextFragment};

/// The four known table columns, in header-declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Index,
    PrimaryName,
    StartDate,
    EndDate,
}

impl Column {
    /// All columns, in header-declaration order.
    pub const ALL: [Column; 4] = [
        Column::Index,
        Column::PrimaryName,
        Column::StartDate,
        Column::EndDate,
    ];

    /// The exact header text this column is anchored on.
    pub fn label(self) -> &'static str {
        match self {
            Column::Index => "No",
            Column::PrimaryName => "Market / Hawker Centre",
            Column::StartDate => "Start Date",
            Column::EndDate => "End Date",
        }
    }

    /// Horizontal buffer in points applied on both sides of the header
    /// bounds. Tuned per column so that data cells wider or narrower than
    /// their header still fall inside, while adjacent column regions stay
    /// disjoint.
    fn horizontal_buffer(self) -> f64 {
        match self {
            Column::Index => 10.0,
            Column::PrimaryName => 40.0,
            Column::StartDate => 20.0,
            Column::EndDate => 20.0,
        }
    }

    fn as_usize(self) -> usize {
        match self {
            Column::Index => 0,
            Column::PrimaryName => 1,
            Column::StartDate => 2,
            Column::EndDate => 3,
        }
    }
}

/// A derived containment region for one column on one page.
#[derive(Debug, Clone)]
pub struct ColumnRange {
    pub column: Column,
    pub rect: Rect,
}

/// Page identity and dimensions, in document points.
///
/// `height * (index + 1)` is the bottom of this page's block in the global
/// coordinate space.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub index: usize,
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    fn block_bottom(&self) -> f64 {
        self.height * (self.index as f64 + 1.0)
    }
}

/// Locate column regions from header fragments.
///
/// Fragments whose text exactly equals any known header label are matched in
/// input order; the i-th match is paired with the i-th column in declaration
/// order. Headers are never matched by position. A page with fewer than four
/// matching labels yields a partial map -- downstream stages see empty
/// fragment sets for the missing columns and the page simply produces no
/// records for them.
pub fn locate_columns(fragments: &[TextFragment], page: &PageGeometry) -> Vec<ColumnRange> {
    let headers: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| Column::ALL.iter().any(|c| c.label() == f.text))
        .collect();

    Column::ALL
        .iter()
        .zip(headers)
        .map(|(&column, header)| {
            let buffer = column.horizontal_buffer();
            let rect = Rect::new(
                header.rect.x - buffer,
                header.rect.y,
                header.rect.width + 2.0 * buffer,
                page.block_bottom() - header.rect.y,
            );
            ColumnRange { column, rect }
        })
        .collect()
}

/// Per-column fragment sets for one page.
///
/// Missing columns are represented as empty sets, so lookups are total.
#[derive(Debug, Default)]
pub struct ColumnFragments<'a> {
    sets: [Vec<&'a TextFragment>; 4],
}

impl<'a> ColumnFragments<'a> {
    pub fn get(&self, column: Column) -> &[&'a TextFragment] {
        &self.sets[column.as_usize()]
    }
}

/// Bucket every fragment into at most one column by strict containment.
///
/// Exclusivity is a property of well-formed buffers, not enforced here.
/// Fragments matching no region (titles, footnotes, page numbers) are simply
/// absent from every set.
pub fn assign_columns<'a>(
    ranges: &[ColumnRange],
    fragments: &'a [TextFragment],
) -> ColumnFragments<'a> {
    let mut result = ColumnFragments::default();
    for range in ranges {
        result.sets[range.column.as_usize()] = fragments
            .iter()
            .filter(|f| fully_contains(&range.rect, &f.rect))
            .collect();
    }
    result
}
