//! The lopdf reading layer, reduced to what span extraction needs: ordered
//! page ids, page sizes, decoded content operations, and string decoding.

use lopdf::{self, content::Content};

use crate::PdfError;

/// lopdf object identifier for a page: (object number, generation number).
pub type PageId = (u32, u16);

/// One content-stream operation.
#[derive(Debug, Clone)]
pub struct Op {
    pub name: String,
    pub args: Vec<Operand>,
}

/// Operand of a content-stream operation, reduced to the kinds the text
/// state machine inspects. Everything else (dictionaries, references,
/// booleans, nulls) collapses to [`Operand::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn from_object(obj: &lopdf::Object) -> Operand {
        match obj {
            lopdf::Object::Integer(i) => Operand::Number(*i as f64),
            lopdf::Object::Real(f) => Operand::Number(*f as f64),
            lopdf::Object::Name(name) => Operand::Name(name.clone()),
            lopdf::Object::String(bytes, _) => Operand::Str(bytes.clone()),
            lopdf::Object::Array(items) => {
                Operand::Array(items.iter().map(Operand::from_object).collect())
            }
            _ => Operand::Other,
        }
    }
}

/// Decode raw PDF string bytes without font information: UTF-16BE when the
/// byte-order mark is present, otherwise UTF-8, otherwise Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return utf16_be(payload);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Decode UTF-16BE bytes, ignoring a trailing odd byte.
fn utf16_be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Source of pages and their decoded content.
///
/// Implemented by [`LopdfSource`] in production and by canned fixtures in
/// the span-extraction tests.
pub trait PageSource {
    /// Page ids in document order.
    fn pages(&self) -> Vec<PageId>;

    /// Page size `(width, height)` in document points.
    fn page_size(&self, page: PageId) -> Result<(f64, f64), PdfError>;

    /// The page's content stream, decoded into operations.
    fn operations(&self, page: PageId) -> Result<Vec<Op>, PdfError>;

    /// Decode string bytes from a text-showing operator, using whatever
    /// encoding information is available for the given font.
    fn decode_string(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String;
}

/// [`PageSource`] backed by [`lopdf::Document`].
pub struct LopdfSource {
    doc: lopdf::Document,
}

impl LopdfSource {
    /// Parse a PDF from an in-memory byte slice. Encrypted documents are
    /// rejected up front.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Find the page's MediaBox `[llx, lly, urx, ury]`. MediaBox is
    /// inheritable, so the search walks up through `Parent` nodes.
    fn media_box(&self, page: PageId) -> Result<[f64; 4], PdfError> {
        let mut dict = self
            .doc
            .get_dictionary(page)
            .map_err(|e| PdfError::Parse(format!("page {page:?}: {e}")))?;

        loop {
            if let Some(values) = dict.get(b"MediaBox").ok().and_then(|obj| self.numbers(obj)) {
                return match values.as_slice() {
                    &[llx, lly, urx, ury, ..] => Ok([llx, lly, urx, ury]),
                    _ => Err(PdfError::Parse(format!(
                        "MediaBox has {} elements, expected 4",
                        values.len()
                    ))),
                };
            }
            dict = match dict.get(b"Parent").and_then(|p| p.as_reference()) {
                Ok(parent) => self
                    .doc
                    .get_dictionary(parent)
                    .map_err(|e| PdfError::Parse(e.to_string()))?,
                Err(_) => return Err(PdfError::Parse("MediaBox not found for page".into())),
            };
        }
    }

    /// Resolve an object (or a reference to one) into a list of numbers.
    /// Returns `None` when the object is not an array of numbers.
    fn numbers(&self, obj: &lopdf::Object) -> Option<Vec<f64>> {
        let items = match obj {
            lopdf::Object::Array(items) => items,
            lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
            _ => return None,
        };
        items
            .iter()
            .map(|item| {
                let item = match item {
                    lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?,
                    direct => direct,
                };
                match item {
                    lopdf::Object::Integer(i) => Some(*i as f64),
                    lopdf::Object::Real(f) => Some(*f as f64),
                    _ => None,
                }
            })
            .collect()
    }

    /// The declared `Encoding` name of a font on a page, if any.
    fn font_encoding(&self, page: PageId, font: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        match fonts.get(font)?.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

impl PageSource for LopdfSource {
    fn pages(&self) -> Vec<PageId> {
        // get_pages keys by 1-based page number, so values come out in
        // document order.
        self.doc.get_pages().into_values().collect()
    }

    fn page_size(&self, page: PageId) -> Result<(f64, f64), PdfError> {
        let [llx, lly, urx, ury] = self.media_box(page)?;
        Ok((urx - llx, ury - lly))
    }

    fn operations(&self, page: PageId) -> Result<Vec<Op>, PdfError> {
        let raw = self
            .doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("page content: {e}")))?;
        let content = Content::decode(&raw)
            .map_err(|e| PdfError::Parse(format!("content stream: {e}")))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| Op {
                name: op.operator,
                args: op.operands.iter().map(Operand::from_object).collect(),
            })
            .collect())
    }

    fn decode_string(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String {
        // Identity-H/V fonts carry 2-byte CID codes; when the producer maps
        // them straight to Unicode, UTF-16BE decoding recovers the text.
        let identity = self
            .font_encoding(page, font)
            .is_some_and(|enc| enc.contains("Identity"));
        if identity && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let decoded = utf16_be(bytes);
            if decoded.chars().any(|c| c != '\u{FFFD}' && c != '\0') {
                return decoded;
            }
        }
        decode_pdf_string(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_passes_through() {
        assert_eq!(decode_pdf_string(b"Market / Hawker Centre"), "Market / Hawker Centre");
        assert_eq!(decode_pdf_string(&[]), "");
    }

    #[test]
    fn bom_prefixed_bytes_decode_as_utf16be() {
        assert_eq!(
            decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]),
            "AB"
        );
        // A trailing odd byte is ignored.
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00]), "A");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // 0xE9 is U+00E9 in Latin-1 but not valid standalone UTF-8.
        assert_eq!(decode_pdf_string(&[0x63, 0x61, 0x66, 0xE9]), "caf\u{E9}");
    }

    #[test]
    fn operand_numbers() {
        assert_eq!(Operand::Number(2.5).as_f64(), Some(2.5));
        assert_eq!(Operand::Str(b"x".to_vec()).as_f64(), None);
        assert_eq!(Operand::Other.as_f64(), None);
    }

    #[test]
    fn objects_reduce_to_operands() {
        assert_eq!(
            Operand::from_object(&lopdf::Object::Integer(7)),
            Operand::Number(7.0)
        );
        assert_eq!(
            Operand::from_object(&lopdf::Object::Real(1.5)),
            Operand::Number(1.5)
        );
        assert_eq!(
            Operand::from_object(&lopdf::Object::Name(b"F1".to_vec())),
            Operand::Name(b"F1".to_vec())
        );
        // Kinds the state machine never reads collapse to Other.
        assert_eq!(
            Operand::from_object(&lopdf::Object::Boolean(true)),
            Operand::Other
        );
        assert_eq!(
            Operand::from_object(&lopdf::Object::Reference((3, 0))),
            Operand::Other
        );
    }

    #[test]
    fn nested_arrays_reduce_recursively() {
        let arr = lopdf::Object::Array(vec![
            lopdf::Object::String(b"End".to_vec(), lopdf::StringFormat::Literal),
            lopdf::Object::Integer(-2000),
        ]);
        assert_eq!(
            Operand::from_object(&arr),
            Operand::Array(vec![
                Operand::Str(b"End".to_vec()),
                Operand::Number(-2000.0)
            ])
        );
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(LopdfSource::from_bytes(&[]).is_err());
        assert!(LopdfSource::from_bytes(b"not a pdf").is_err());
    }
}
