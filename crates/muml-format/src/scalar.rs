//! String literal rendering.
//!
//! Decides whether a string can be written bare and, when it cannot, quotes
//! it in a chosen [`TextType`] so that the tokenizer reads back exactly the
//! same text.

use std::borrow::Cow;

use muml_tokenizer::{escape_char, is_identifier_str, is_whitespace_char, max_consecutive_chars};

use crate::TextType;

/// The text as-is when it is a valid identifier, otherwise a string literal.
pub fn to_identifier_string(text: &str, text_type: TextType) -> Cow<'_, str> {
    if is_identifier_str(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(to_quoted_string(text, text_type))
    }
}

/// Format text as a string literal of the given type.
pub fn to_quoted_string(text: &str, text_type: TextType) -> String {
    match text_type {
        TextType::DoubleQuote => quoted(text, '"'),
        TextType::SingleQuote => quoted(text, '\''),
        TextType::Backtick => backticked(text),
        TextType::DoubleQuoteFence => quote_fenced(text, '"'),
        TextType::SingleQuoteFence => quote_fenced(text, '\''),
        TextType::BacktickFence => backtick_fenced(text),
    }
}

/// `"..."`: every control character, backslash and the quote are escaped.
fn quoted(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    push_escaped(&mut out, text, quote, true);
    out.push(quote);
    out
}

/// `"""..."""`. Quotes inside are escaped, so a fence of three always
/// suffices. Line breaks and tabs are written as they are.
fn quote_fenced(text: &str, quote: char) -> String {
    if text.is_empty() {
        return quoted(text, quote);
    }
    let mut out = String::with_capacity(text.len() + 6);
    out.extend([quote; 3]);
    push_escaped(&mut out, text, quote, false);
    out.extend([quote; 3]);
    out
}

fn push_escaped(out: &mut String, text: &str, quote: char, escape_layout: bool) {
    for c in text.chars() {
        match escape_char(c, Some(quote)) {
            Some(escaped) if escape_layout || !matches!(c, '\n' | '\t') => out.push_str(escaped),
            _ => out.push(c),
        }
    }
}

/// `` `...` ``, raw except that a backtick is doubled.
///
/// A leading backtick would read as a fence, so such text is preceded by a
/// space that a `|;` specifier strips again.
fn backticked(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 6);
    if text.starts_with('`') {
        out.push_str(if text.ends_with(is_whitespace_char) {
            "|;*` "
        } else {
            "|;` "
        });
    } else {
        out.push('`');
    }
    out.push_str(&text.replace('`', "``"));
    out.push('`');
    out
}

/// ```` ```...``` ````, fully raw. The fence is one longer than the longest
/// run of backticks in the text. Text touching the fence with a backtick is
/// padded with a space, removed by a format specifier on reading.
fn backtick_fenced(text: &str) -> String {
    if text.is_empty() {
        return "``".to_string();
    }
    let fence = "`".repeat(3.max(1 + max_consecutive_chars(text, '`')));
    let starts = text.starts_with('`');
    let ends = text.ends_with('`');
    match (starts, ends) {
        (true, true) => format!("|;{fence} {text} {fence}"),
        (true, false) => {
            let specifier = if text.ends_with(is_whitespace_char) {
                "|;*"
            } else {
                "|;"
            };
            format!("{specifier}{fence} {text}{fence}")
        }
        (false, true) => {
            let specifier = if text.starts_with(is_whitespace_char) {
                "|^"
            } else {
                "|;"
            };
            format!("{specifier}{fence}{text} {fence}")
        }
        (false, false) => format!("{fence}{text}{fence}"),
    }
}
