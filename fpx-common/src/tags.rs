//! Tag list decoding
//!
//! The `tags` column stores each post's labels as a list literal, e.g.
//! `['Bots', "manque d'Identité de classe"]`. Only that grammar is accepted:
//! a bracketed, comma-separated list of quoted strings. Anything else is a
//! [`DecodeError`]; there is no general literal evaluation.

use thiserror::Error;

/// A `tags` cell that is not a valid list of string literals
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed tag list at byte {position}: {reason}")]
pub struct DecodeError {
    /// Byte offset into the raw cell where parsing stopped
    pub position: usize,
    pub reason: String,
}

/// A `tags` value, either as stored or already decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsField {
    Raw(String),
    Decoded(Vec<String>),
}

impl TagsField {
    /// Decode into a label sequence. Already-decoded values are returned as-is.
    pub fn decode(&self) -> Result<Vec<String>, DecodeError> {
        match self {
            TagsField::Raw(raw) => decode_tags(raw),
            TagsField::Decoded(labels) => Ok(labels.clone()),
        }
    }
}

/// Parse a serialized label list
///
/// Order and duplicates are preserved. A blank cell is a missing value and
/// yields an empty list.
pub fn decode_tags(raw: &str) -> Result<Vec<String>, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Parser { src: raw, pos: 0 }.list()
}

/// Render labels in the canonical list-literal form read by [`decode_tags`]
pub fn encode_tags(labels: &[String]) -> String {
    let parts: Vec<String> = labels.iter().map(|label| quote_literal(label)).collect();
    format!("[{}]", parts.join(", "))
}

/// Quote a single string literal
///
/// Single quotes unless the text contains `'` and no `"`.
pub fn quote_literal(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError {
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn list(&mut self) -> Result<Vec<String>, DecodeError> {
        self.skip_ws();
        match self.bump() {
            Some('[') => {}
            Some(c) => return Err(self.error(format!("expected '[', found '{}'", c))),
            None => return Err(self.error("expected '['")),
        }

        let mut labels = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\'') | Some('"') => {
                    labels.push(self.string()?);
                    self.skip_ws();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some(']') => {
                            self.bump();
                            break;
                        }
                        Some(c) => {
                            return Err(self.error(format!("expected ',' or ']', found '{}'", c)))
                        }
                        None => return Err(self.error("unterminated list")),
                    }
                }
                Some(c) => return Err(self.error(format!("expected string literal, found '{}'", c))),
                None => return Err(self.error("unterminated list")),
            }
        }

        self.skip_ws();
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected '{}' after list", c)));
        }
        Ok(labels)
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        let quote = self
            .bump()
            .ok_or_else(|| self.error("expected string literal"))?;

        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(DecodeError {
                position: start,
                reason: "unterminated string literal".to_string(),
            })?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => out.push(self.escape()?),
                '\n' | '\r' => return Err(self.error("line break inside string literal")),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, DecodeError> {
        let at = self.pos - 1;
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        match c {
            '\\' => Ok('\\'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'x' => self.hex_escape(2, at),
            'u' => self.hex_escape(4, at),
            other => Err(DecodeError {
                position: at,
                reason: format!("unsupported escape '\\{}'", other),
            }),
        }
    }

    fn hex_escape(&mut self, digits: usize, at: usize) -> Result<char, DecodeError> {
        let invalid = || DecodeError {
            position: at,
            reason: "invalid hex escape".to_string(),
        };

        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(invalid)?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        let ch = char::from_u32(code).ok_or_else(invalid)?;
        self.pos = end;
        Ok(ch)
    }
}
