//! Evidence pointers into source text.
//!
//! Every extracted claim must be backed by at least one evidence entry that
//! quotes the source and locates the quote by character offsets, line
//! numbers, or both.

use serde::{Deserialize, Serialize};

use crate::types::integral;

/// A located excerpt from source text substantiating a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Short exact substring of the source
    pub quote: String,

    /// 0-based character offset of the first quoted character
    #[serde(
        default,
        deserialize_with = "integral::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub char_start: Option<i64>,

    /// 0-based exclusive character offset after the last quoted character
    #[serde(
        default,
        deserialize_with = "integral::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub char_end: Option<i64>,

    /// 1-based first line
    #[serde(
        default,
        deserialize_with = "integral::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_start: Option<i64>,

    /// 1-based last line
    #[serde(
        default,
        deserialize_with = "integral::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_end: Option<i64>,

    /// The quote comes from a table rather than running text
    #[serde(default)]
    pub is_table_like: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A fully present start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub fn is_ordered(&self) -> bool {
        self.end >= self.start
    }
}

impl Evidence {
    /// Create evidence located by character offsets.
    pub fn at_chars(quote: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            quote: quote.into(),
            char_start: Some(start),
            char_end: Some(end),
            line_start: None,
            line_end: None,
            is_table_like: false,
            notes: None,
        }
    }

    /// Create evidence located by line numbers.
    pub fn at_lines(quote: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            quote: quote.into(),
            char_start: None,
            char_end: None,
            line_start: Some(start),
            line_end: Some(end),
            is_table_like: false,
            notes: None,
        }
    }

    /// Mark the evidence as coming from a table.
    pub fn table_like(mut self) -> Self {
        self.is_table_like = true;
        self
    }

    /// Attach a free-text note.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Character span, if both offsets are present.
    pub fn char_span(&self) -> Option<Span> {
        Some(Span {
            start: self.char_start?,
            end: self.char_end?,
        })
    }

    /// Line span, if both line numbers are present.
    pub fn line_span(&self) -> Option<Span> {
        Some(Span {
            start: self.line_start?,
            end: self.line_end?,
        })
    }

    /// Whether at least one position pair is fully present.
    pub fn is_located(&self) -> bool {
        self.char_span().is_some() || self.line_span().is_some()
    }

    /// Quote length in characters.
    pub fn quote_len(&self) -> usize {
        self.quote.chars().count()
    }
}
