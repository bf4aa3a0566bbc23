//! Source errors collected while tokenizing and parsing.

use std::fmt;

use tracing::debug;

use crate::{SourceLocation, SourceSpan};

/// Kinds of problems found in Muml source.
///
/// The declaration order doubles as the tie-break order when errors at the
/// same position are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
#[repr(u8)]
pub enum SourceErrorKind {
    /// A reserved metacharacter (`& ; ( )`).
    UnexpectedCharacter,
    UnexpectedOpenBracket,
    UnexpectedOpenBrace,
    UnexpectedCloseBracket,
    UnexpectedCloseBrace,
    UnexpectedEquals,
    /// A string where a member name was expected, e.g. `x { "text" }`.
    UnexpectedStringLiteral,
    UnexpectedNewlineInStringLiteral,
    UnterminatedStringLiteral,
    UnterminatedNestedBlockComment,
    UnterminatedAttributes,
    UnterminatedMembers,
    MalformedBracesIdentifier,
    MalformedStringEscapeSequence,
    ExpectedStringAfterFormatSpecifier,
    /// An `=` that was never followed by a value.
    ExpectedValueAfterEquals,
}

impl SourceErrorKind {
    /// Canonical name, as used in diagnostic strings.
    pub fn name(self) -> &'static str {
        match self {
            SourceErrorKind::UnexpectedCharacter => "UnexpectedCharacter",
            SourceErrorKind::UnexpectedOpenBracket => "UnexpectedOpenBracket",
            SourceErrorKind::UnexpectedOpenBrace => "UnexpectedOpenBrace",
            SourceErrorKind::UnexpectedCloseBracket => "UnexpectedCloseBracket",
            SourceErrorKind::UnexpectedCloseBrace => "UnexpectedCloseBrace",
            SourceErrorKind::UnexpectedEquals => "UnexpectedEquals",
            SourceErrorKind::UnexpectedStringLiteral => "UnexpectedStringLiteral",
            SourceErrorKind::UnexpectedNewlineInStringLiteral => {
                "UnexpectedNewlineInStringLiteral"
            }
            SourceErrorKind::UnterminatedStringLiteral => "UnterminatedStringLiteral",
            SourceErrorKind::UnterminatedNestedBlockComment => "UnterminatedNestedBlockComment",
            SourceErrorKind::UnterminatedAttributes => "UnterminatedAttributes",
            SourceErrorKind::UnterminatedMembers => "UnterminatedMembers",
            SourceErrorKind::MalformedBracesIdentifier => "MalformedBracesIdentifier",
            SourceErrorKind::MalformedStringEscapeSequence => "MalformedStringEscapeSequence",
            SourceErrorKind::ExpectedStringAfterFormatSpecifier => {
                "ExpectedStringAfterFormatSpecifier"
            }
            SourceErrorKind::ExpectedValueAfterEquals => "ExpectedValueAfterEquals",
        }
    }
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A problem found in the source, with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct SourceError {
    /// The kind of error.
    pub kind: SourceErrorKind,
    /// Source location.
    pub span: SourceSpan,
}

impl SourceError {
    /// Create a new source error.
    pub fn new(kind: SourceErrorKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// Create an error pointing at a single location.
    pub fn at(kind: SourceErrorKind, location: SourceLocation) -> Self {
        Self::new(kind, location.to_span())
    }
}

/// Renders as `<Kind> <span>`, e.g. `UnterminatedMembers L1:2`.
impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.span)
    }
}

impl std::error::Error for SourceError {}

/// Ordered list of source errors.
///
/// Errors are appended as they are found. The parser sorts the list once the
/// whole input has been consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct SourceErrors {
    errors: Vec<SourceError>,
    file_name: Option<String>,
}

impl SourceErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list whose errors belong to the named file.
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            file_name: Some(file_name.into()),
        }
    }

    /// File the errors refer to, if known.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    /// Append an error.
    pub fn push(&mut self, error: SourceError) {
        debug!("source error: {}", error);
        self.errors.push(error);
    }

    /// Append an error pointing at a single location.
    pub fn add(&mut self, kind: SourceErrorKind, location: SourceLocation) {
        self.push(SourceError::at(kind, location));
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[SourceError] {
        &self.errors
    }

    pub fn last(&self) -> Option<&SourceError> {
        self.errors.last()
    }

    /// Stable sort by start position, then by kind.
    pub fn sort_by_position(&mut self) {
        self.errors
            .sort_by_key(|error| (error.span.start.index, error.kind));
    }

    /// Diagnostic strings, one per error.
    pub fn to_strings(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for SourceErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
            if let Some(file_name) = &self.file_name {
                write!(f, " in {file_name}")?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SourceErrors {
    type Item = &'a SourceError;
    type IntoIter = std::slice::Iter<'a, SourceError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for SourceErrors {
    type Item = SourceError;
    type IntoIter = std::vec::IntoIter<SourceError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl Extend<SourceError> for SourceErrors {
    fn extend<T: IntoIterator<Item = SourceError>>(&mut self, iter: T) {
        for error in iter {
            self.push(error);
        }
    }
}
