//! Positioned-text extraction from page content streams.
//!
//! Implements a simplified PDF text-rendering state machine that walks a
//! page's content operations and emits one [`RawSpan`] per shown string run.
//! Spans are page-local (origin bottom-left, y grows upward, as PDF defines
//! them); the crate root translates them into the cross-page global space.

use super::backend::{Op, Operand, PageId, PageSource};
use crate::PdfError;

/// A single run of text at a specific position on the page, in page-local
/// PDF coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Effective (matrix-scaled) font size, used as the span's height.
    pub height: f64,
}

/// Approximate character width as a fraction of font size when no glyph
/// metrics are available. 0.5 is a reasonable default for proportional
/// fonts.
const APPROX_CHAR_WIDTH_RATIO: f64 = 0.5;

/// Identity text matrix, `[a, b, c, d, tx, ty]` form.
const IDENTITY_MATRIX: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Text-rendering parameters accumulated while replaying a content stream.
/// Field names follow the operators that set them.
#[derive(Debug, Clone)]
struct TextState {
    /// Font resource key (`/F1` style) and size, set by Tf.
    font_key: Vec<u8>,
    font_size: f64,
    /// Current text matrix and the line matrix it resets to on Td/TD/T*.
    text_matrix: [f64; 6],
    line_matrix: [f64; 6],
    /// Tz value divided by 100.
    horiz_scale: f64,
    char_spacing: f64,
    word_spacing: f64,
    text_rise: f64,
    leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Current pen position, read off the text matrix translation.
    fn x(&self) -> f64 {
        self.text_matrix[4]
    }

    fn y(&self) -> f64 {
        self.text_matrix[5]
    }

    /// Effective font size: the nominal size scaled by the vertical
    /// component of the text matrix.
    fn effective_font_size(&self) -> f64 {
        let [_, b, _, d, ..] = self.text_matrix;
        (self.font_size * b.hypot(d)).abs()
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f64) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Translate the line matrix and move the text matrix onto it (the
    /// shared effect of Td, TD, T* and the quote operators).
    fn translate_line(&mut self, tx: f64, ty: f64) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix[4] = a * tx + c * ty + e;
        self.line_matrix[5] = b * tx + d * ty + f;
        self.text_matrix = self.line_matrix;
    }
}

/// Approximate rendered width of `text`. Glyph metrics are not loaded, so
/// every character is assumed to be half an em wide.
fn estimate_text_width(text: &str, state: &TextState) -> f64 {
    let per_char = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
    text.chars().count() as f64 * per_char
}

/// Advance the text matrix after rendering `text`.
fn advance_after_show(text: &str, state: &mut TextState) {
    let per_char = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
    let dx: f64 = text
        .chars()
        .map(|ch| {
            let word_gap = if ch == ' ' { state.word_spacing } else { 0.0 };
            per_char + state.char_spacing + word_gap
        })
        .sum();
    state.advance_x(dx);
}

/// The i-th operand of `op` as a number, if present and numeric.
fn arg_f64(op: &Op, i: usize) -> Option<f64> {
    op.args.get(i).and_then(Operand::as_f64)
}

/// Decode a single [`Operand::Str`] into a `String`, using the source's
/// font-aware decoder.
fn decode_operand(
    val: &Operand,
    source: &dyn PageSource,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        Operand::Str(bytes) => source.decode_string(page_id, font_key, bytes),
        _ => String::new(),
    }
}

/// Replay one page's content operations and collect a flat list of
/// [`RawSpan`]s.
///
/// Recognizes the text operators `BT`, `ET`, `Tf`, `Tm`, `Td`, `TD`, `T*`,
/// `TL`, `Tc`, `Tw`, `Tz`, `Ts`, `Tj`, `TJ`, `'`, and `"`; everything else
/// is skipped.
pub fn extract_page_spans(
    source: &dyn PageSource,
    page_id: PageId,
) -> Result<Vec<RawSpan>, PdfError> {
    let ops = source.operations(page_id)?;

    let mut state = TextState::default();
    let mut spans: Vec<RawSpan> = Vec::new();

    for op in &ops {
        match op.name.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = state.text_matrix;
            }
            // ET intentionally leaves the state alone: font selection
            // persists across text objects.
            "ET" => {}

            "Tf" => {
                if let Some(Operand::Name(key) | Operand::Str(key)) = op.args.first() {
                    state.font_key = key.clone();
                }
                if let Some(size) = arg_f64(op, 1) {
                    state.font_size = size;
                }
            }

            "Tm" => {
                let m: Vec<f64> = op.args.iter().filter_map(Operand::as_f64).collect();
                if let Ok(matrix) = <[f64; 6]>::try_from(m) {
                    state.text_matrix = matrix;
                    state.line_matrix = matrix;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (arg_f64(op, 0), arg_f64(op, 1)) {
                    state.translate_line(tx, ty);
                }
            }
            // tx ty TD  is  -ty TL followed by  tx ty Td
            "TD" => {
                if let (Some(tx), Some(ty)) = (arg_f64(op, 0), arg_f64(op, 1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(l) = arg_f64(op, 0) {
                    state.leading = l;
                }
            }

            "Tc" => {
                if let Some(c) = arg_f64(op, 0) {
                    state.char_spacing = c;
                }
            }
            "Tw" => {
                if let Some(w) = arg_f64(op, 0) {
                    state.word_spacing = w;
                }
            }
            // Tz takes a percentage.
            "Tz" => {
                if let Some(z) = arg_f64(op, 0) {
                    state.horiz_scale = z / 100.0;
                }
            }
            "Ts" => {
                if let Some(rise) = arg_f64(op, 0) {
                    state.text_rise = rise;
                }
            }

            "Tj" => {
                if let Some(operand) = op.args.first() {
                    show_string(operand, source, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(arr)) = op.args.first() {
                    show_array(arr, source, page_id, &mut state, &mut spans);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(operand) = op.args.first() {
                    show_string(operand, source, page_id, &mut state, &mut spans);
                }
            }
            // aw ac string "  sets word and character spacing, then behaves
            // like the single-quote operator.
            "\"" => {
                if let [aw, ac, text] = op.args.as_slice() {
                    if let Some(w) = aw.as_f64() {
                        state.word_spacing = w;
                    }
                    if let Some(c) = ac.as_f64() {
                        state.char_spacing = c;
                    }
                    state.translate_line(0.0, -state.leading);
                    show_string(text, source, page_id, &mut state, &mut spans);
                }
            }

            // Graphics, path, and XObject operators carry no text.
            _ => {}
        }
    }

    Ok(spans)
}

/// Decode a string operand into a [`RawSpan`] at the current position and
/// advance the pen. Shared by the `Tj`, `'`, and `"` operators.
fn show_string(
    operand: &Operand,
    source: &dyn PageSource,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<RawSpan>,
) {
    let text = decode_operand(operand, source, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let span = RawSpan {
        x: state.x(),
        y: state.y() + state.text_rise,
        width: estimate_text_width(&text, state),
        height: state.effective_font_size(),
        text: text.clone(),
    };
    spans.push(span);
    advance_after_show(&text, state);
}

/// Show a `TJ` array, whose elements interleave strings with kerning
/// adjustments. The whole array accumulates into a single span; a kerning
/// displacement wide enough to read as a word gap becomes a space.
fn show_array(
    arr: &[Operand],
    source: &dyn PageSource,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<RawSpan>,
) {
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.y() + state.text_rise;

    for elem in arr {
        if let Operand::Str(_) = elem {
            let piece = decode_operand(elem, source, page_id, &state.font_key);
            if buf.is_empty() {
                span_x = state.x();
            }
            buf.push_str(&piece);
            advance_after_show(&piece, state);
        } else if let Some(adjustment) = elem.as_f64() {
            // Kerning adjustments are in thousandths of a text-space unit;
            // negative values move rightward.
            let dx = -adjustment / 1000.0 * state.font_size * state.horiz_scale;

            // A displacement wider than ~a third of a character is a word
            // gap the producer encoded as kerning instead of a space.
            let gap = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
            if dx > gap && !buf.is_empty() {
                buf.push(' ');
            }

            state.advance_x(dx);
        }
    }

    let trimmed = buf.trim_end();
    if trimmed.is_empty() {
        return;
    }
    spans.push(RawSpan {
        x: span_x,
        y: span_y,
        width: estimate_text_width(trimmed, state),
        height: state.effective_font_size(),
        text: trimmed.to_string(),
    });
}
