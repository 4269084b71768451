//! Sequential token consumption with savepoint rewind.
//!
//! [`TokenStream`] is a zero-copy cursor over tokenized text: scalar
//! extraction slices the source buffer, structural skip walks `size`
//! fields, and savepoints allow the same token range to be re-read by
//! independent consumers. No subtree is ever materialized standalone.

use crate::token::{tokenize, Token, TokenKind, TokenizeError};
use crate::value::{Color, Rect};

/// Saved cursor position for bounded rewind.
///
/// Plain value snapshot; any number may be live at once, and rewinding
/// to one does not invalidate the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint(usize);

/// Cursor over a document's flat token array.
pub struct TokenStream<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'a> TokenStream<'a> {
    /// Tokenize `text` and position the cursor at the first token.
    pub fn new(text: &'a str) -> Result<Self, TokenizeError> {
        Ok(TokenStream { text, tokens: tokenize(text)?, cursor: 0 })
    }

    /// Wrap an existing token array. The tokens must describe `text`:
    /// byte ranges out of bounds or off character boundaries will panic
    /// when sliced.
    pub fn with_tokens(text: &'a str, tokens: Vec<Token>) -> Self {
        TokenStream { text, tokens, cursor: 0 }
    }

    /// Check whether a token remains at the cursor.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    /// Return the token at the cursor and advance by one.
    ///
    /// Exhaustion yields `None`; consumers that obey the `size` contract
    /// never observe it on tokenizer-produced streams.
    pub fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(tok)
    }

    /// Current cursor position, in tokens.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total token count.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the stream holds no tokens at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Snapshot the cursor.
    #[inline]
    pub fn savepoint(&self) -> Savepoint {
        Savepoint(self.cursor)
    }

    /// Restore the cursor to a snapshot.
    #[inline]
    pub fn rewind(&mut self, sp: Savepoint) {
        self.cursor = sp.0;
    }

    /// Source text of a token's byte range.
    #[inline]
    pub fn text_of(&self, tok: Token) -> &'a str {
        &self.text[tok.start as usize..tok.end as usize]
    }

    /// True iff `tok` is a String (or, permissively, a Primitive) whose
    /// text equals `literal` exactly.
    pub fn token_eq(&self, tok: Token, literal: &str) -> bool {
        matches!(tok.kind, TokenKind::String | TokenKind::Primitive)
            && self.text_of(tok) == literal
    }

    /// Consume one scalar token and return its raw text.
    ///
    /// Strings are returned undecoded (escapes left as written). A
    /// container here consumes its whole subtree and yields `None`, so
    /// the cursor stays aligned either way.
    pub fn next_str(&mut self) -> Option<&'a str> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::String | TokenKind::Primitive => Some(self.text_of(tok)),
            _ => {
                self.skip_children(tok);
                None
            }
        }
    }

    /// Consume one scalar token and parse it as an integer.
    pub fn next_int(&mut self) -> Option<i64> {
        self.next_str()?.parse().ok()
    }

    /// Consume one token; `Some(true)` iff its literal text is `true`.
    pub fn next_bool(&mut self) -> Option<bool> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Object | TokenKind::Array => {
                self.skip_children(tok);
                None
            }
            kind => Some(kind == TokenKind::Primitive && self.text_of(tok) == "true"),
        }
    }

    /// Consume one scalar token and decode it as a hex color.
    pub fn next_color(&mut self) -> Option<Color> {
        Color::from_hex(self.next_str()?)
    }

    /// Consume a 4-element integer array as a rectangle.
    ///
    /// The array must declare exactly 4 elements and each must decode as
    /// an integer; on any mismatch the entire array subtree is consumed
    /// and `None` is returned.
    pub fn next_rect(&mut self) -> Option<Rect> {
        let tok = self.next()?;
        if tok.kind != TokenKind::Array || tok.size != 4 {
            self.skip_children(tok);
            return None;
        }
        let mut values = [0i32; 4];
        let mut ok = true;
        for v in &mut values {
            match self.next_int().and_then(|n| i32::try_from(n).ok()) {
                Some(n) => *v = n,
                None => ok = false,
            }
        }
        ok.then(|| Rect::new(values[0], values[1], values[2], values[3]))
    }

    /// Advance past the token at the cursor and its entire subtree
    /// without decoding any values.
    pub fn skip_subtree(&mut self) {
        if let Some(tok) = self.next() {
            self.skip_children(tok);
        }
    }

    /// Advance past the children of an already-consumed token. Object
    /// children are key/value pairs; Array children are elements;
    /// scalars have none.
    pub fn skip_children(&mut self, tok: Token) {
        match tok.kind {
            TokenKind::Array => {
                for _ in 0..tok.size {
                    self.skip_subtree();
                }
            }
            TokenKind::Object => {
                for _ in 0..tok.size {
                    self.next();
                    self.skip_subtree();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(text: &str) -> TokenStream<'_> {
        TokenStream::new(text).unwrap()
    }

    #[test]
    fn test_next_advances_by_one() {
        let mut s = stream("[1, 2]");
        assert!(s.has_next());
        assert_eq!(s.next().unwrap().kind, TokenKind::Array);
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_savepoint_rewind() {
        let mut s = stream("[1, 2, 3]");
        s.next();
        let sp = s.savepoint();
        let inner = s.savepoint();
        s.next();
        s.next();
        s.rewind(sp);
        assert_eq!(s.position(), 1);
        // Multiple savepoints stay valid independently.
        s.next();
        s.rewind(inner);
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_scalar_extraction() {
        let mut s = stream(r##"["hi", 42, true, false, "#ff8800"]"##);
        s.next();
        assert_eq!(s.next_str(), Some("hi"));
        assert_eq!(s.next_int(), Some(42));
        assert_eq!(s.next_bool(), Some(true));
        assert_eq!(s.next_bool(), Some(false));
        assert_eq!(s.next_color(), Some(Color::new(0xff, 0x88, 0x00)));
        assert!(!s.has_next());
    }

    #[test]
    fn test_bool_is_literal_true_only() {
        let mut s = stream(r#"[1, "true", yes]"#);
        s.next();
        assert_eq!(s.next_bool(), Some(false));
        // Quoted "true" is a String, not the primitive literal.
        assert_eq!(s.next_bool(), Some(false));
        assert_eq!(s.next_bool(), Some(false));
    }

    #[test]
    fn test_next_rect() {
        let mut s = stream("[10, 20, 30, 40]");
        assert_eq!(s.next_rect(), Some(Rect::new(10, 20, 30, 40)));
        assert!(!s.has_next());
    }

    #[test]
    fn test_rect_wrong_length_consumes_subtree() {
        let mut s = stream("[[1, 2, 3], 9]");
        s.next();
        assert_eq!(s.next_rect(), None);
        // The malformed array was consumed whole; the sibling is intact.
        assert_eq!(s.next_int(), Some(9));
    }

    #[test]
    fn test_rect_bad_element_consumes_subtree() {
        let mut s = stream(r#"[[1, "x", 3, {"a": 1}], 7]"#);
        s.next();
        assert_eq!(s.next_rect(), None);
        assert_eq!(s.next_int(), Some(7));
    }

    #[test]
    fn test_scalar_on_container_consumes_subtree() {
        let mut s = stream(r#"[{"a": [1, 2]}, 5]"#);
        s.next();
        assert_eq!(s.next_str(), None);
        assert_eq!(s.next_int(), Some(5));
    }

    #[test]
    fn test_skip_subtree_lands_past_nested_structure() {
        let mut s = stream(r#"[{"a": {"b": [1, 2, {"c": 3}]}}, "after"]"#);
        s.next();
        s.skip_subtree();
        assert_eq!(s.next_str(), Some("after"));
        assert!(!s.has_next());
    }

    #[test]
    fn test_token_eq() {
        let mut s = stream(r#"{"type": "text"}"#);
        s.next();
        let key = s.next().unwrap();
        assert!(s.token_eq(key, "type"));
        assert!(!s.token_eq(key, "typ"));
        let val = s.next().unwrap();
        assert!(s.token_eq(val, "text"));
    }
}
