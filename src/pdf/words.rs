//! Positioned-token extraction from PDF content streams.
//!
//! Walks each page's content stream tracking the text matrix, decodes
//! strings through the page's font encodings, and emits one token per text
//! operation with its approximate box. Coordinates are flipped to
//! top-down so the engine can sort lines naturally.

use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::Token;

use super::check_pdf_bytes;

/// Extracts positioned tokens from a PDF document.
pub struct TokenExtractor {
    doc: LopdfDocument,
    parallel: bool,
}

impl TokenExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_pdf_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self {
            doc,
            parallel: true,
        })
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Extract every page's tokens, pages in document order.
    ///
    /// A page whose content stream cannot be read contributes no tokens;
    /// the document as a whole still extracts.
    pub fn extract(&self) -> Result<Vec<Token>> {
        let pages: Vec<(u32, ObjectId)> = self
            .doc
            .get_pages()
            .iter()
            .map(|(num, id)| (*num, *id))
            .collect();

        let page_tokens: Vec<Vec<Token>> = if self.parallel {
            pages
                .par_iter()
                .map(|&(num, id)| self.page_tokens(num, id))
                .collect()
        } else {
            pages
                .iter()
                .map(|&(num, id)| self.page_tokens(num, id))
                .collect()
        };

        Ok(page_tokens.into_iter().flatten().collect())
    }

    /// Tokens of one page; `page_num` is lopdf's 1-based page number.
    fn page_tokens(&self, page_num: u32, page_id: ObjectId) -> Vec<Token> {
        match self.try_page_tokens(page_num, page_id) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("skipping page {}: {}", page_num, e);
                Vec::new()
            }
        }
    }

    fn try_page_tokens(&self, page_num: u32, page_id: ObjectId) -> Result<Vec<Token>> {
        let page_height = self.page_height(page_id);
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::TokenExtract(format!("page {}: {}", page_num, e)))?;

        let mut tokens = Vec::new();
        let mut matrix = TextMatrix::default();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_name = name.clone();
                        }
                        font_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        matrix.translate(
                            number(&op.operands[0]).unwrap_or(0.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                        );
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" => {
                    if !in_text {
                        continue;
                    }
                    let encoding = fonts
                        .get(&font_name)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    let decode = |bytes: &[u8]| -> String {
                        if let Some(ref enc) = encoding {
                            if let Ok(decoded) = LopdfDocument::decode_text(enc, bytes) {
                                return decoded;
                            }
                        }
                        decode_text_simple(bytes)
                    };

                    let text = if op.operator == "TJ" {
                        decode_tj_array(op.operands.first(), &decode)
                    } else {
                        match op.operands.first() {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        }
                    };

                    push_token(&mut tokens, text, &matrix, font_size, page_height, page_num);
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if !in_text {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = fonts
                            .get(&font_name)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());
                        let text = match encoding {
                            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|_| decode_text_simple(bytes)),
                            None => decode_text_simple(bytes),
                        };
                        push_token(&mut tokens, text, &matrix, font_size, page_height, page_num);
                    }
                }
                _ => {}
            }
        }

        Ok(tokens)
    }

    /// Page height from the MediaBox, defaulting to Letter.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[3].as_float().unwrap_or(792.0);
                    }
                }
            }
        }
        792.0
    }

    /// Concatenated, decompressed content stream of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }
}

/// Emit a token for decoded text at the current matrix position.
fn push_token(
    tokens: &mut Vec<Token>,
    text: String,
    matrix: &TextMatrix,
    font_size: f32,
    page_height: f32,
    page_num: u32,
) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    let size = font_size * matrix.scale();
    // Approximate width: half the font size per character.
    let width = text.chars().count() as f32 * size * 0.5;
    let top = page_height - y - size;
    tokens.push(Token::new(
        text,
        x,
        x + width,
        top,
        top + size,
        page_num.saturating_sub(1),
    ));
}

/// Decode a TJ array: strings interleaved with kerning adjustments. Large
/// negative adjustments stand in for word spaces.
fn decode_tj_array<F>(operand: Option<&Object>, decode: &F) -> String
where
    F: Fn(&[u8]) -> String,
{
    let arr = match operand {
        Some(Object::Array(arr)) => arr,
        _ => return String::new(),
    };

    let space_threshold = 200.0;
    let mut combined = String::new();

    for item in arr {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            Object::Integer(n) => {
                if -(*n as f32) > space_threshold && !combined.is_empty() && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > space_threshold && !combined.is_empty() && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }

    combined
}

/// Fallback decoding when no encoding is available: UTF-16BE with BOM,
/// then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Text matrix tracking position and scale through a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; the TL operator is rare in gazette output.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Numeric operand helper.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
