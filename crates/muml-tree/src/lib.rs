#![doc = include_str!("../README.md")]
//! Document tree for the Muml format.
//!
//! The tree is plain data: the parser in `muml-parse` fills it in, the
//! writer in `muml-format` renders it back, and callers may build or edit
//! one by hand in between.

mod attribute;
mod document;
mod element;
mod text;
pub mod traverse;

pub use attribute::{Attribute, Attributes};
pub use document::Document;
pub use element::Element;
pub use muml_tokenizer::{SourceError, SourceErrorKind, SourceErrors, SourceLocation, SourceSpan};
pub use text::append_text;
pub use traverse::{BreadthFirst, DepthFirst};

#[cfg(test)]
mod tests;
