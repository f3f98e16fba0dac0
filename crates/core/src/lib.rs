//! Core library for the closure-notices project.
//!
//! This crate implements the **Functional Core** of the project: the
//! geometric table-reconstruction engine that turns a flat list of
//! positioned text fragments per page into a deduplicated set of structured
//! closure records.
//!
//! # Architecture Overview
//!
//! The project uses a split-crate architecture to enforce separation of
//! concerns:
//!
//! - **`closures_core`** (this crate): pure transformation functions with
//!   zero I/O. Same input always produces the same output; no operation
//!   here touches the network, the filesystem, or a clock.
//! - **`pdf`**: the document-rendering collaborator. It owns all PDF
//!   parsing and hands this crate per-page fragment lists with coordinates
//!   already translated into a global, cross-page space.
//! - **`closures`**: the Imperative Shell -- CLI parsing, fetching, and
//!   output rendering.
//!
//! # Pipeline
//!
//! For each page, [`table::extract_page`] locates column regions from the
//! header fragments, buckets fragments into columns by strict rectangle
//! containment, anchors row regions on the index column, extracts raw field
//! text per row, normalizes it into [`record::Record`]s, and deduplicates by
//! content-addressed id. [`table::extract_document`] aggregates pages in
//! order and applies the cross-page deduplication pass.
//!
//! The engine never returns an error: missing headers, empty columns, and
//! malformed rows all degrade to "fewer records", with per-row drop reasons
//! surfaced in [`table::Extraction`] for data-quality monitoring.

pub mod geometry;
pub mod record;
pub mod table;

pub use geometry::{fully_contains, Rect, TextFragment};
pub use record::{dedup_records, record_id, Record};
pub use table::{extract_document, extract_page, Extraction, Page};
