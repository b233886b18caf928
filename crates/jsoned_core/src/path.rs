use std::fmt;

use crate::core_api::{CoreError, CoreErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside a document.
///
/// The segment sequence is the identity used to key host widget state. The
/// `Display` form (`tags[2]`, `meta.x`, `["odd key"]`) is only a rendering of
/// it and can be read back with [`NodePath::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Short human label for the node: its key, `Item N` (1-based) for array
    /// elements, and `document` for the root.
    pub fn label(&self) -> String {
        match self.segments.last() {
            None => "document".to_string(),
            Some(PathSegment::Key(key)) => key.clone(),
            Some(PathSegment::Index(index)) => format!("Item {}", index + 1),
        }
    }

    pub fn parse(input: &str) -> Result<Self, CoreError> {
        parse_path(input).map_err(|message| {
            CoreError::new(
                CoreErrorCode::InvalidPath,
                format!("invalid node path '{input}': {message}"),
            )
        })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => {
                    f.write_str("[\"")?;
                    f.write_str(&key.replace('\\', "\\\\").replace('"', "\\\""))?;
                    f.write_str("\"]")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn parse_path(input: &str) -> Result<NodePath, String> {
    let raw = input.trim();
    let chars: Vec<char> = raw.chars().collect();
    let mut idx = 0usize;
    let mut out = Vec::new();

    while idx < chars.len() {
        match chars[idx] {
            '.' => {
                if out.is_empty() {
                    return Err("path cannot start with '.'".to_string());
                }
                idx += 1;
                out.push(PathSegment::Key(parse_bare_key(&chars, &mut idx)?));
            }
            '[' => out.push(parse_bracket_segment(&chars, &mut idx)?),
            _ if out.is_empty() => {
                out.push(PathSegment::Key(parse_bare_key(&chars, &mut idx)?));
            }
            ch => return Err(format!("unexpected character '{ch}' at position {idx}")),
        }
    }

    Ok(NodePath::new(out))
}

fn parse_bare_key(chars: &[char], idx: &mut usize) -> Result<String, String> {
    let start = *idx;
    while *idx < chars.len() && !matches!(chars[*idx], '.' | '[' | ']') {
        *idx += 1;
    }
    if *idx == start {
        return Err(format!("expected key at position {start}"));
    }
    Ok(chars[start..*idx].iter().collect())
}

fn parse_bracket_segment(chars: &[char], idx: &mut usize) -> Result<PathSegment, String> {
    // Caller guarantees chars[*idx] == '['.
    *idx += 1;
    match chars.get(*idx).copied() {
        None => Err("unterminated '[' segment".to_string()),
        Some(quote @ ('"' | '\'')) => {
            *idx += 1;
            let mut key = String::new();
            let mut closed = false;
            while let Some(&c) = chars.get(*idx) {
                *idx += 1;
                if c == '\\' {
                    let Some(&next) = chars.get(*idx) else {
                        return Err("unterminated escape in quoted key".to_string());
                    };
                    key.push(next);
                    *idx += 1;
                } else if c == quote {
                    closed = true;
                    break;
                } else {
                    key.push(c);
                }
            }
            if !closed {
                return Err("unterminated quoted key".to_string());
            }
            if chars.get(*idx).copied() != Some(']') {
                return Err("expected closing ']'".to_string());
            }
            *idx += 1;
            Ok(PathSegment::Key(key))
        }
        Some(_) => {
            let start = *idx;
            while *idx < chars.len() && chars[*idx] != ']' {
                *idx += 1;
            }
            if *idx >= chars.len() {
                return Err("unterminated '[' segment".to_string());
            }
            let raw: String = chars[start..*idx].iter().collect();
            *idx += 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err("empty bracket segment".to_string());
            }
            match trimmed.parse::<usize>() {
                Ok(index) => Ok(PathSegment::Index(index)),
                Err(_) => Ok(PathSegment::Key(trimmed.to_string())),
            }
        }
    }
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
