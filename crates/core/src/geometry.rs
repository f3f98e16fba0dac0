//! Geometric primitives for table reconstruction.
//!
//! Rectangles and text fragments are plain immutable data; the only
//! operation the engine needs is the strict-containment query used to bucket
//! fragments into column and row regions.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in the document's global coordinate space.
///
/// The Y axis grows downward and is already translated across pages, so
/// rectangles from different pages of the same render batch are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate (y grows downward).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One positioned run of text as reported by the rendering boundary.
///
/// Fragments are read-only inputs; the engine classifies them but never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub rect: Rect,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
        }
    }
}

/// Strict containment: every edge of `child` lies strictly inside `parent`.
///
/// All four comparisons are strict. A fragment whose edge exactly touches a
/// region boundary is *not* contained -- in particular, a header fragment
/// sitting at the top edge of its own column region must never be
/// re-captured as data. Zero-width or zero-height rectangles contain nothing
/// and are contained by nothing.
pub fn fully_contains(parent: &Rect, child: &Rect) -> bool {
    child.x > parent.x
        && child.y > parent.y
        && child.right() < parent.right()
        && child.bottom() < parent.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn contains_inner_rect() {
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let child = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(fully_contains(&parent, &child));
    }

    #[test]
    fn rect_never_contains_itself() {
        let r = Rect::new(5.0, 5.0, 50.0, 50.0);
        assert!(!fully_contains(&r, &r));
    }

    #[test]
    fn edge_touching_child_is_not_contained() {
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Top edge aligned with the parent's top edge.
        let top_aligned = Rect::new(10.0, 0.0, 20.0, 20.0);
        assert!(!fully_contains(&parent, &top_aligned));
        // Right edge aligned with the parent's right edge.
        let right_aligned = Rect::new(80.0, 10.0, 20.0, 20.0);
        assert!(!fully_contains(&parent, &right_aligned));
    }

    #[test]
    fn outside_rect_is_not_contained() {
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let child = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert!(!fully_contains(&parent, &child));
    }

    #[test]
    fn zero_size_rects_contain_nothing() {
        let empty = Rect::new(50.0, 50.0, 0.0, 0.0);
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 20.0, 20.0);
        // A zero-size parent contains nothing, not even itself.
        assert!(!fully_contains(&empty, &inner));
        assert!(!fully_contains(&empty, &empty));
        // A zero-size child sitting on the parent's corner is not contained.
        assert!(!fully_contains(&parent, &Rect::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn larger_child_is_not_contained() {
        let parent = Rect::new(10.0, 10.0, 20.0, 20.0);
        let child = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!fully_contains(&parent, &child));
    }
}
