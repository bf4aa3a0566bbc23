#![doc = include_str!("../README.md")]

mod span;
pub use span::{SourceLocation, SourceSpan};

mod error;
pub use error::{SourceError, SourceErrorKind, SourceErrors};

mod chars;
pub use chars::{
    is_identifier_char, is_identifier_str, is_meta_char, is_quote_char, is_whitespace_char,
    max_consecutive_chars,
};

mod escape;
pub use escape::{Unescaped, escape_char, unescape};

mod text_format;
pub use text_format::{BlockFormat, EndFormat, TextFormat};

mod token;
pub use token::{CommentKind, Token, TokenKind};

mod tokenizer;
pub use tokenizer::Tokenizer;
