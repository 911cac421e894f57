//! AccessorPath parsing and formatting.
//!
//! Grammar (mirrors the remote interpreter's attribute syntax):
//!   ident ( '.' ident | '[' index ']' | '["' key '"]' )*
//! - the first segment is always an identifier
//! - indices are unsigned decimal integers
//! - keys are double-quoted; `\"` and `\\` are the only escapes
//!   Examples:
//!   "obj.modifiers[0].width" -> [Attr(obj), Attr(modifiers), Index(0), Attr(width)]
//!   "data.objects[\"Cube\"]" -> [Attr(data), Attr(objects), Key(Cube)]
//!
//! Paths are plain values; two paths with the same segments address the same
//! remote node.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One step in an accessor path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Attribute access: `.name`
    Attr(String),
    /// Positional collection access: `[3]`
    Index(usize),
    /// Keyed collection access: `["name"]`
    Key(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty accessor path")]
    Empty,
    #[error("invalid identifier at byte {pos}")]
    InvalidIdentifier { pos: usize },
    #[error("unexpected character '{ch}' at byte {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("unterminated bracket starting at byte {pos}")]
    UnterminatedBracket { pos: usize },
    #[error("invalid index '{text}' at byte {pos}")]
    InvalidIndex { pos: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessorPath {
    segments: Vec<Segment>,
}

impl AccessorPath {
    /// Root path consisting of a single attribute, e.g. `bpy` or `obj`.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Attr(name.into())],
        }
    }

    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let bytes = s.as_bytes();
        let mut segments = Vec::new();
        let mut pos = 0;

        let (first, next) = read_ident(s, pos)?;
        segments.push(Segment::Attr(first));
        pos = next;

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    let (name, next) = read_ident(s, pos + 1)?;
                    segments.push(Segment::Attr(name));
                    pos = next;
                }
                b'[' => {
                    let (segment, next) = read_bracket(s, pos)?;
                    segments.push(segment);
                    pos = next;
                }
                _ => {
                    let ch = s[pos..].chars().next().unwrap_or('?');
                    return Err(PathError::UnexpectedChar { pos, ch });
                }
            }
        }

        Ok(Self { segments })
    }

    /// Extend with an attribute segment.
    pub fn attr(&self, name: impl Into<String>) -> Self {
        self.with(Segment::Attr(name.into()))
    }

    /// Extend with a positional index segment.
    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    /// Extend with a string key segment.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(Segment::Key(key.into()))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    /// Path with the last segment removed, or `None` for a root path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn last(&self) -> &Segment {
        // Constructors guarantee at least the root segment.
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True when `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &AccessorPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn read_ident(s: &str, start: usize) -> Result<(String, usize), PathError> {
    let bytes = s.as_bytes();
    if start >= bytes.len() || !is_ident_start(bytes[start]) {
        return Err(PathError::InvalidIdentifier { pos: start });
    }
    let mut end = start + 1;
    while end < bytes.len() && is_ident_continue(bytes[end]) {
        end += 1;
    }
    Ok((s[start..end].to_string(), end))
}

fn read_bracket(s: &str, open: usize) -> Result<(Segment, usize), PathError> {
    let bytes = s.as_bytes();
    let start = open + 1;
    if start >= bytes.len() {
        return Err(PathError::UnterminatedBracket { pos: open });
    }

    if bytes[start] == b'"' {
        let mut key = String::new();
        let mut chars = s[start + 1..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, escaped @ ('"' | '\\'))) => key.push(escaped),
                    Some((esc_offset, other)) => {
                        return Err(PathError::UnexpectedChar {
                            pos: start + 1 + esc_offset,
                            ch: other,
                        })
                    }
                    None => return Err(PathError::UnterminatedBracket { pos: open }),
                },
                '"' => {
                    let close = start + 1 + offset + 1;
                    if bytes.get(close) != Some(&b']') {
                        return Err(PathError::UnterminatedBracket { pos: open });
                    }
                    return Ok((Segment::Key(key), close + 1));
                }
                other => key.push(other),
            }
        }
        return Err(PathError::UnterminatedBracket { pos: open });
    }

    let close = s[start..]
        .find(']')
        .map(|rel| start + rel)
        .ok_or(PathError::UnterminatedBracket { pos: open })?;
    let text = &s[start..close];
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::InvalidIndex {
            pos: start,
            text: text.to_string(),
        });
    }
    let index = text.parse::<usize>().map_err(|_| PathError::InvalidIndex {
        pos: start,
        text: text.to_string(),
    })?;
    Ok((Segment::Index(index), close + 1))
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Attr(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Key(key) => {
                f.write_str("[\"")?;
                for ch in key.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{ch}")?;
                }
                f.write_str("\"]")
            }
        }
    }
}

impl fmt::Display for AccessorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Attr(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for AccessorPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessorPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for AccessorPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccessorPath {
    fn deserialize<D>(deserializer: D) -> Result<AccessorPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AccessorPath::parse(&s).map_err(de::Error::custom)
    }
}
