//! Path pointer parsing for addressing locations in a document tree
//!
//! A pointer compiles a `/`-separated path string into an ordered sequence of
//! traversal tokens. Segment forms:
//!
//! - `name` selects a mapping entry,
//! - a non-negative integer selects a sequence element (0-based),
//! - `-` marks insertion after the last sequence element (writes only),
//! - `field=value` scans a sequence for the first mapping element whose
//!   `field` entry equals `value`.
//!
//! The empty path (`""` or `/`) addresses the document root.

use crate::error::{OpsmithError, Result};
use std::fmt;
use std::str::FromStr;

/// One segment of a parsed pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Select the mapping entry with this key
    Key(String),
    /// Select the i-th sequence element
    Index(usize),
    /// Insert after the last sequence element
    AfterLastIndex,
    /// Select the first mapping element whose `key` entry equals `value`
    MatchingKey { key: String, value: String },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{}", k),
            Self::Index(i) => write!(f, "{}", i),
            Self::AfterLastIndex => write!(f, "-"),
            Self::MatchingKey { key, value } => write!(f, "{}={}", key, value),
        }
    }
}

/// A parsed path addressing one location in a document tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pointer {
    tokens: Vec<Token>,
}

impl Pointer {
    /// Create the root pointer
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a pointer from pre-built tokens
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Parse a pointer from a path string
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() || input == "/" {
            return Ok(Self::root());
        }

        let rest = input.strip_prefix('/').ok_or_else(|| {
            OpsmithError::invalid_path(input, "must start with a slash")
        })?;

        let mut tokens = Vec::new();
        for segment in rest.split('/') {
            tokens.push(parse_segment(input, segment)?);
        }

        Ok(Self { tokens })
    }

    /// Get the tokens of this pointer
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Check if this pointer addresses the document root
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return write!(f, "/");
        }
        for token in &self.tokens {
            write!(f, "/{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = OpsmithError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_segment(path: &str, segment: &str) -> Result<Token> {
    if segment.is_empty() {
        return Err(OpsmithError::invalid_path(path, "empty segment"));
    }

    if segment == "-" {
        return Ok(Token::AfterLastIndex);
    }

    if segment.bytes().all(|b| b.is_ascii_digit()) {
        let index = segment
            .parse::<usize>()
            .map_err(|_| OpsmithError::invalid_path(path, format!("index {:?} too large", segment)))?;
        return Ok(Token::Index(index));
    }

    if let Some((key, value)) = segment.split_once('=') {
        if key.is_empty() || value.is_empty() {
            return Err(OpsmithError::invalid_path(
                path,
                format!("segment {:?} has an empty field or value", segment),
            ));
        }
        return Ok(Token::MatchingKey {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(Token::Key(segment.to_string()))
}
