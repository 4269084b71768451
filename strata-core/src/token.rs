//! Minimal single-pass JSON tokenizer.
//!
//! Produces a flat array of typed tokens in document order. Tokens carry
//! byte ranges into the source text and a count of immediate children;
//! no values are decoded and no tree is materialized. Decoding happens
//! lazily through [`TokenStream`](crate::stream::TokenStream).

use memchr::memchr2;

/// Marker for a container token whose closing bracket has not been seen.
const OPEN_END: u32 = u32::MAX;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unset/placeholder kind; never produced by [`tokenize`].
    Undefined,
    /// `{ ... }` - `size` counts key/value pairs.
    Object,
    /// `[ ... ]` - `size` counts elements.
    Array,
    /// Quoted string - the byte range excludes the quotes.
    String,
    /// Bare literal: number, `true`, `false`, `null`.
    Primitive,
}

/// A typed byte span with a child count.
///
/// `size` counts immediate children only: key/value pairs for an Object,
/// elements for an Array, and 1 for an object key whose value follows.
/// Child membership is purely positional - a consumer must consume or
/// skip exactly `size` logical children before its cursor is valid again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    pub size: u32,
}

impl Token {
    /// Length of the token's byte range.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Check if the byte range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Error returned when tokenizing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// Malformed byte at the given position.
    Invalid { pos: usize },
    /// Input ended inside a string or an unclosed container.
    Partial,
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizeError::Invalid { pos } => write!(f, "invalid character at byte {}", pos),
            TokenizeError::Partial => write!(f, "unexpected end of input"),
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenize JSON text into a flat token array.
///
/// Multiple top-level values are permitted; consumers decide how many
/// they read. Escapes inside strings are validated but not decoded.
pub fn tokenize(text: &str) -> Result<Vec<Token>, TokenizeError> {
    let bytes = text.as_bytes();
    let mut tokens: Vec<Token> = Vec::new();
    // Parent index per token, -1 for top level. Internal to this pass;
    // the public tokens carry positional structure only.
    let mut parents: Vec<i32> = Vec::new();
    let mut toksuper: i32 = -1;
    let mut open_count = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let c = bytes[pos];
        match c {
            b'{' | b'[' => {
                let kind = if c == b'{' { TokenKind::Object } else { TokenKind::Array };
                if toksuper >= 0 {
                    tokens[toksuper as usize].size += 1;
                }
                tokens.push(Token { kind, start: pos as u32, end: OPEN_END, size: 0 });
                parents.push(toksuper);
                toksuper = tokens.len() as i32 - 1;
                open_count += 1;
                pos += 1;
            }
            b'}' | b']' => {
                let kind = if c == b'}' { TokenKind::Object } else { TokenKind::Array };
                let mut i = toksuper;
                loop {
                    if i < 0 {
                        return Err(TokenizeError::Invalid { pos });
                    }
                    let idx = i as usize;
                    if tokens[idx].end == OPEN_END {
                        if tokens[idx].kind != kind {
                            return Err(TokenizeError::Invalid { pos });
                        }
                        tokens[idx].end = pos as u32 + 1;
                        toksuper = parents[idx];
                        open_count -= 1;
                        break;
                    }
                    i = parents[idx];
                }
                pos += 1;
            }
            b'"' => {
                let (start, end) = scan_string(bytes, pos)?;
                if toksuper >= 0 {
                    tokens[toksuper as usize].size += 1;
                }
                tokens.push(Token { kind: TokenKind::String, start, end, size: 0 });
                parents.push(toksuper);
                pos = end as usize + 1;
            }
            b':' => {
                toksuper = tokens.len() as i32 - 1;
                pos += 1;
            }
            b',' => {
                if toksuper >= 0 {
                    let kind = tokens[toksuper as usize].kind;
                    if kind != TokenKind::Object && kind != TokenKind::Array {
                        toksuper = parents[toksuper as usize];
                    }
                }
                pos += 1;
            }
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            _ => {
                if c < 0x20 {
                    return Err(TokenizeError::Invalid { pos });
                }
                let start = pos;
                while pos < bytes.len() && !is_delimiter(bytes[pos]) {
                    if bytes[pos] < 0x20 {
                        return Err(TokenizeError::Invalid { pos });
                    }
                    pos += 1;
                }
                if toksuper >= 0 {
                    tokens[toksuper as usize].size += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Primitive,
                    start: start as u32,
                    end: pos as u32,
                    size: 0,
                });
                parents.push(toksuper);
            }
        }
    }

    if open_count > 0 {
        return Err(TokenizeError::Partial);
    }
    Ok(tokens)
}

#[inline]
fn is_delimiter(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}' | b':')
}

/// Scan a string body starting at the opening quote. Returns the content
/// range, quotes excluded.
fn scan_string(bytes: &[u8], open: usize) -> Result<(u32, u32), TokenizeError> {
    let start = open + 1;
    let mut pos = start;
    loop {
        let Some(off) = memchr2(b'"', b'\\', &bytes[pos..]) else {
            return Err(TokenizeError::Partial);
        };
        pos += off;
        if bytes[pos] == b'"' {
            return Ok((start as u32, pos as u32));
        }
        // Escape sequence: validate, do not decode.
        let esc = pos + 1;
        match bytes.get(esc) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => pos = esc + 1,
            Some(b'u') => {
                let Some(hex) = bytes.get(esc + 1..esc + 5) else {
                    return Err(TokenizeError::Partial);
                };
                if !hex.iter().all(|b| b.is_ascii_hexdigit()) {
                    return Err(TokenizeError::Invalid { pos: esc });
                }
                pos = esc + 5;
            }
            Some(_) => return Err(TokenizeError::Invalid { pos: esc }),
            None => return Err(TokenizeError::Partial),
        }
    }
}
