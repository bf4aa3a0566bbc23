#![doc = include_str!("../README.md")]

use std::fmt;
use std::io::{self, Read};
use std::path::Path;

pub use muml_tokenizer::{SourceError, SourceErrorKind, SourceErrors, SourceSpan};
pub use muml_tree::Document;

mod diagnostic;
pub use diagnostic::Diagnostic;

mod parser;
pub use parser::Parser;

/// Parse Muml source into a document.
///
/// Syntax errors do not fail the parse; check [`Document::is_ok`] or
/// [`Document::errors`].
pub fn parse(source: &str) -> Document {
    Parser::new(source).parse()
}

/// Parse Muml source whose errors should mention `file_name`.
pub fn parse_named(file_name: impl Into<String>, source: &str) -> Document {
    Parser::new(source).with_file_name(file_name).parse()
}

/// Read a whole stream and parse it.
pub fn parse_reader(mut reader: impl Read) -> Result<Document, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let source = String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8)?;
    Ok(parse(&source))
}

/// Read and parse a file. The file name is attached to any errors.
pub fn load(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let source = String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8)?;
    Ok(parse_named(path.display().to_string(), &source))
}

/// Failure to obtain source text. Syntax errors are never reported this way.
#[derive(Debug)]
pub enum LoadError {
    /// The file or stream could not be read.
    Io(io::Error),
    /// The input is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read source: {e}"),
            LoadError::InvalidUtf8 => write!(f, "source is not valid UTF-8"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::InvalidUtf8 => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}
