#![doc = include_str!("../README.md")]

mod options;
mod scalar;
mod writer;

use muml_tree::Document;

pub use options::{FormatOptions, TextType};
pub use scalar::{to_identifier_string, to_quoted_string};
pub use writer::MumlWriter;

/// Render a document with default options.
pub fn to_string(document: &Document) -> String {
    to_string_with_options(document, FormatOptions::default())
}

/// Render a document with the given options.
pub fn to_string_with_options(document: &Document, options: FormatOptions) -> String {
    let mut writer = MumlWriter::new(options);
    writer.write_document(document);
    writer.finish()
}
