//! Filter expression parser
//!
//! Parses LDAP-style prefix filters such as
//! `(&(requeststate=complete)(|(requesttype=enrollment)(subject=cn=a*)))`
//! and evaluates them against request records.
//!
//! Supported items: equality, presence (`attr=*`), substring (`attr=a*b*`),
//! and the `&`, `|`, `!` combinators. Values may contain `\XX` hex escapes.
//! Attribute names and values compare case-insensitively.

use crate::error::{Error, Result};
use crate::types::RequestRecord;
use std::collections::BTreeSet;

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// All sub-filters must match
    And(Vec<FilterExpr>),
    /// At least one sub-filter must match
    Or(Vec<FilterExpr>),
    /// Sub-filter must not match
    Not(Box<FilterExpr>),
    /// `attr=value`
    Equals { attr: String, value: String },
    /// `attr=*`
    Present { attr: String },
    /// `attr=a*b*c`, split at the wildcards
    Substring { attr: String, parts: Vec<String> },
}

impl FilterExpr {
    /// Parse a filter expression
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser::new(input);
        let expr = parser.filter()?;
        if parser.pos != parser.bytes.len() {
            return Err(parser.error("trailing characters after filter"));
        }
        Ok(expr)
    }

    /// Attribute names referenced anywhere in the expression (lower-case)
    pub fn attributes(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.collect_attributes(out);
                }
            }
            Self::Not(inner) => inner.collect_attributes(out),
            Self::Equals { attr, .. } | Self::Present { attr } | Self::Substring { attr, .. } => {
                out.insert(attr.clone());
            }
        }
    }

    /// Evaluate the expression against a record
    pub fn matches(&self, record: &RequestRecord) -> bool {
        match self {
            Self::And(items) => items.iter().all(|i| i.matches(record)),
            Self::Or(items) => items.iter().any(|i| i.matches(record)),
            Self::Not(inner) => !inner.matches(record),
            Self::Present { attr } => record.attribute(attr).is_some(),
            Self::Equals { attr, value } => record
                .attribute(attr)
                .is_some_and(|v| v.eq_ignore_ascii_case(value)),
            Self::Substring { attr, parts } => record
                .attribute(attr)
                .is_some_and(|v| substring_match(&v.to_ascii_lowercase(), parts)),
        }
    }
}

/// Match `value` against wildcard-separated `parts` (already lower-case)
fn substring_match(value: &str, parts: &[String]) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return true;
    };
    let Some(mut remaining) = value.strip_prefix(first.as_str()) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return remaining.is_empty();
    };
    for part in middle {
        match remaining.find(part.as_str()) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last.as_str())
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::invalid_filter(self.input, format!("{message} at position {}", self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn filter(&mut self) -> Result<FilterExpr> {
        self.expect(b'(')?;
        let expr = match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                FilterExpr::And(self.filter_list()?)
            }
            Some(b'|') => {
                self.pos += 1;
                FilterExpr::Or(self.filter_list()?)
            }
            Some(b'!') => {
                self.pos += 1;
                FilterExpr::Not(Box::new(self.filter()?))
            }
            Some(_) => self.item()?,
            None => return Err(self.error("unexpected end of filter")),
        };
        self.expect(b')')?;
        Ok(expr)
    }

    fn filter_list(&mut self) -> Result<Vec<FilterExpr>> {
        let mut items = Vec::new();
        while self.peek() == Some(b'(') {
            items.push(self.filter()?);
        }
        if items.is_empty() {
            return Err(self.error("empty filter list"));
        }
        Ok(items)
    }

    fn item(&mut self) -> Result<FilterExpr> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b';' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected attribute name"));
        }
        let attr = self.input[start..self.pos].to_ascii_lowercase();
        self.expect(b'=')?;

        let mut parts = vec![String::new()];
        let mut raw = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated filter item")),
                Some(b'(') => return Err(self.error("unescaped '(' in value")),
                Some(b')') => break,
                Some(b'*') => {
                    self.pos += 1;
                    let done = std::mem::take(&mut raw);
                    if let Some(last) = parts.last_mut() {
                        *last = self.decode(done)?;
                    }
                    parts.push(String::new());
                }
                Some(b'\\') => {
                    self.pos += 1;
                    raw.push(self.hex_byte()?);
                }
                Some(b) => {
                    self.pos += 1;
                    raw.push(b);
                }
            }
        }
        if let Some(last) = parts.last_mut() {
            *last = self.decode(raw)?;
        }

        if parts.len() == 1 {
            let value = parts.pop().unwrap_or_default();
            return Ok(FilterExpr::Equals { attr, value });
        }
        if parts.len() == 2 && parts.iter().all(String::is_empty) {
            return Ok(FilterExpr::Present { attr });
        }
        let parts = parts.into_iter().map(|p| p.to_ascii_lowercase()).collect();
        Ok(FilterExpr::Substring { attr, parts })
    }

    fn hex_byte(&mut self) -> Result<u8> {
        let digits = self
            .bytes
            .get(self.pos..self.pos + 2)
            .and_then(|d| std::str::from_utf8(d).ok())
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(|| self.error("invalid escape sequence"))?;
        self.pos += 2;
        Ok(digits)
    }

    fn decode(&self, raw: Vec<u8>) -> Result<String> {
        String::from_utf8(raw).map_err(|_| self.error("value is not valid UTF-8"))
    }
}
