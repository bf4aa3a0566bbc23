//! Diagnostic rendering for source errors.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use muml_tokenizer::{SourceError, SourceErrorKind, SourceSpan};

/// A source error ready to be rendered against its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    /// The kind of error.
    pub kind: SourceErrorKind,
    /// Source location.
    pub span: SourceSpan,
}

impl Diagnostic {
    pub fn new(kind: SourceErrorKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        if self.write_report(filename, source, &mut output).is_err() {
            return self.to_error().to_string();
        }
        String::from_utf8(output).unwrap_or_else(|_| self.to_error().to_string())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(
        &self,
        filename: &str,
        source: &str,
        writer: W,
    ) -> std::io::Result<()> {
        let range = label_range(self.span, source);
        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(message(self.kind))
            .with_label(
                Label::new((filename, range))
                    .with_message(label(self.kind))
                    .with_color(Color::Red),
            );
        if let Some(help) = help(self.kind) {
            report = report.with_help(help);
        }
        report
            .finish()
            .write((filename, Source::from(source)), writer)
    }

    fn to_error(self) -> SourceError {
        SourceError::new(self.kind, self.span)
    }
}

impl From<SourceError> for Diagnostic {
    fn from(error: SourceError) -> Self {
        Self::new(error.kind, error.span)
    }
}

impl From<&SourceError> for Diagnostic {
    fn from(error: &SourceError) -> Self {
        Self::new(error.kind, error.span)
    }
}

/// Byte range to underline. Errors at a single position cover the character
/// found there.
fn label_range(span: SourceSpan, source: &str) -> Range<usize> {
    let range: Range<usize> = span.into();
    if !range.is_empty() {
        return range;
    }
    let start = range.start.min(source.len());
    let width = source[start..].chars().next().map_or(0, char::len_utf8);
    start..start + width
}

fn message(kind: SourceErrorKind) -> &'static str {
    match kind {
        SourceErrorKind::UnexpectedCharacter => "unexpected character",
        SourceErrorKind::UnexpectedOpenBracket => "unexpected '['",
        SourceErrorKind::UnexpectedOpenBrace => "unexpected '{'",
        SourceErrorKind::UnexpectedCloseBracket => "unexpected ']'",
        SourceErrorKind::UnexpectedCloseBrace => "unexpected '}'",
        SourceErrorKind::UnexpectedEquals => "unexpected '='",
        SourceErrorKind::UnexpectedStringLiteral => "unexpected string literal",
        SourceErrorKind::UnexpectedNewlineInStringLiteral => "newline in string literal",
        SourceErrorKind::UnterminatedStringLiteral => "unterminated string literal",
        SourceErrorKind::UnterminatedNestedBlockComment => "unterminated block comment",
        SourceErrorKind::UnterminatedAttributes => "unterminated attribute list",
        SourceErrorKind::UnterminatedMembers => "unterminated member list",
        SourceErrorKind::MalformedBracesIdentifier => "malformed braced identifier",
        SourceErrorKind::MalformedStringEscapeSequence => "malformed escape sequence",
        SourceErrorKind::ExpectedStringAfterFormatSpecifier => {
            "expected a string after the format specifier"
        }
        SourceErrorKind::ExpectedValueAfterEquals => "expected a value after '='",
    }
}

fn label(kind: SourceErrorKind) -> &'static str {
    match kind {
        SourceErrorKind::UnterminatedStringLiteral => "string starts here",
        SourceErrorKind::UnterminatedNestedBlockComment => "comment starts here",
        SourceErrorKind::UnterminatedAttributes => "attribute list opened here",
        SourceErrorKind::UnterminatedMembers => "member list opened here",
        SourceErrorKind::UnexpectedNewlineInStringLiteral => "line ends here",
        SourceErrorKind::MalformedStringEscapeSequence => "invalid escape",
        SourceErrorKind::ExpectedValueAfterEquals => "nothing follows this '='",
        _ => "unexpected",
    }
}

fn help(kind: SourceErrorKind) -> Option<&'static str> {
    Some(match kind {
        SourceErrorKind::UnexpectedCharacter => {
            "'&', ';', '(' and ')' are reserved outside of strings"
        }
        SourceErrorKind::UnexpectedOpenBracket => {
            "attributes follow an element name and cannot nest"
        }
        SourceErrorKind::UnexpectedOpenBrace => "a member list must follow an element name",
        SourceErrorKind::UnexpectedCloseBracket => "remove the ']' or give the '=' a value",
        SourceErrorKind::UnexpectedCloseBrace => "this '}' has no matching '{'",
        SourceErrorKind::UnexpectedEquals => "a '=' must be followed by a value",
        SourceErrorKind::UnexpectedStringLiteral => {
            "a member list must start with an element name"
        }
        SourceErrorKind::UnexpectedNewlineInStringLiteral => {
            "use a fenced string (\"\"\") or a '|' line string for multi-line text"
        }
        SourceErrorKind::UnterminatedStringLiteral => "add the closing quote",
        SourceErrorKind::UnterminatedNestedBlockComment => "add a closing '#]'",
        SourceErrorKind::UnterminatedAttributes => "add a closing ']'",
        SourceErrorKind::UnterminatedMembers => "add a closing '}'",
        SourceErrorKind::MalformedBracesIdentifier => {
            "a braced name is a single string, like {\"name\"}"
        }
        SourceErrorKind::MalformedStringEscapeSequence => {
            "valid escapes are \\0 \\a \\b \\t \\n \\v \\f \\r \\e \\\\ \\' \\\" \\xHH \\uHHHH \\UHHHHHHHH"
        }
        SourceErrorKind::ExpectedStringAfterFormatSpecifier => {
            "a '|' specifier must be followed by a quoted string"
        }
        SourceErrorKind::ExpectedValueAfterEquals => return None,
    })
}
