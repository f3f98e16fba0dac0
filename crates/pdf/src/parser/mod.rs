//! PDF parsing internals: the lopdf reading layer and the text-state
//! machine that turns content streams into positioned spans.

pub mod backend;
pub mod spans;

pub use backend::{LopdfSource, PageId, PageSource};
pub use spans::{extract_page_spans, RawSpan};
