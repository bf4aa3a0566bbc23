//! Token types for the Muml tokenizer.

use std::borrow::Cow;
use std::fmt;

use crate::{SourceSpan, escape_char};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare identifier `name`, or a braced identifier `{"name"}`.
    Identifier,
    /// Any quoted, fenced or line string.
    String,
    /// `=`
    Equals,
    /// `[`
    BeginAttributes,
    /// `]`
    EndAttributes,
    /// `{`
    BeginMembers,
    /// `}`
    EndMembers,
    /// `# ...` and `## ...`
    LineComment,
    /// `### ... ###`
    FencedComment,
    /// `#[ ... #]`, which may nest.
    NestedBlockComment,
}

/// The three comment styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Line,
    Fenced,
    NestedBlock,
}

impl TokenKind {
    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        self.comment_kind().is_some()
    }

    pub fn comment_kind(&self) -> Option<CommentKind> {
        match self {
            TokenKind::LineComment => Some(CommentKind::Line),
            TokenKind::FencedComment => Some(CommentKind::Fenced),
            TokenKind::NestedBlockComment => Some(CommentKind::NestedBlock),
            _ => None,
        }
    }

    /// Whether this token carries an identifier or string payload.
    pub fn is_text(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::String)
    }
}

/// A token with its kind, span, and decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: SourceSpan,
    /// Decoded text. Borrowed from the source where no decoding was needed;
    /// `None` when a string literal could not be read.
    pub text: Option<Cow<'src, str>>,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: SourceSpan, text: Option<Cow<'src, str>>) -> Self {
        Self { kind, span, text }
    }

    /// Create a punctuation token whose text is its own source.
    pub fn punct(kind: TokenKind, span: SourceSpan, text: &'static str) -> Self {
        Self::new(kind, span, Some(Cow::Borrowed(text)))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn into_text(self) -> Option<String> {
        self.text.map(Cow::into_owned)
    }
}

/// Renders as `<span> <kind> "<text>"`, e.g. `L1:1..4 Identifier "abc"`.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.span, self.kind)?;
        let Some(text) = &self.text else {
            return Ok(());
        };
        f.write_str(" \"")?;
        for c in text.chars() {
            match escape_char(c, Some('"')) {
                Some(escaped) => f.write_str(escaped)?,
                None => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}
