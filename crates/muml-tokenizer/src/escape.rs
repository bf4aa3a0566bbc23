//! Backslash escape sequences in quoted strings.
//!
//! Recognized escapes:
//!
//! - `\0 \a \b \t \n \v \f \r \e \\ \' \"`
//! - `\xHH`: a single UTF-8 code unit. A lead byte of a multi-byte sequence
//!   must be followed by its continuation bytes as further `\xHH` escapes,
//!   e.g. `\xc3\xa9` for `é`.
//! - `\uHHHH`: a UTF-16 code unit. A high surrogate must be directly
//!   followed by a `\uHHHH` low surrogate.
//! - `\UHHHHHHHH`: a Unicode scalar value.
//!
//! Malformed escapes are kept verbatim in the output.

use std::borrow::Cow;

/// Result of [`unescape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unescaped<'a> {
    /// Decoded text.
    pub text: Cow<'a, str>,
    /// Byte offset of the first malformed escape sequence, if any.
    pub malformed_at: Option<usize>,
}

impl Unescaped<'_> {
    pub fn is_ok(&self) -> bool {
        self.malformed_at.is_none()
    }
}

/// Decode backslash escapes in `text`.
///
/// Scanning never stops at a malformed escape: the backslash is copied to
/// the output unchanged and the offset of the first such escape is
/// recorded.
pub fn unescape(text: &str) -> Unescaped<'_> {
    if !text.contains('\\') {
        return Unescaped {
            text: Cow::Borrowed(text),
            malformed_at: None,
        };
    }
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut malformed_at = None;
    // Start of the pending run of verbatim text.
    let mut run_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        match decode_escape(bytes, i) {
            Some((len, decoded)) => {
                out.push_str(&text[run_start..i]);
                out.push(decoded);
                i += len;
                run_start = i;
            }
            None => {
                malformed_at.get_or_insert(i);
                i += 1;
            }
        }
    }
    out.push_str(&text[run_start..]);
    Unescaped {
        text: Cow::Owned(out),
        malformed_at,
    }
}

/// Decode the escape sequence starting at `bytes[index]` (a backslash).
///
/// Returns the number of bytes consumed and the decoded character.
fn decode_escape(bytes: &[u8], index: usize) -> Option<(usize, char)> {
    let simple = match *bytes.get(index + 1)? {
        b'x' => return decode_utf8_escape(bytes, index),
        b'u' => return decode_utf16_escape(bytes, index),
        b'U' => {
            let value = hex_at(bytes, index + 2, 8)?;
            return char::from_u32(value).map(|c| (10, c));
        }
        b'0' => '\0',
        b'a' => '\x07',
        b'b' => '\x08',
        b't' => '\t',
        b'n' => '\n',
        b'v' => '\x0b',
        b'f' => '\x0c',
        b'r' => '\r',
        b'e' => '\x1b',
        b'\\' => '\\',
        b'\'' => '\'',
        b'"' => '"',
        _ => return None,
    };
    Some((2, simple))
}

/// `\xHH`, chained up to four times for a multi-byte UTF-8 sequence.
fn decode_utf8_escape(bytes: &[u8], index: usize) -> Option<(usize, char)> {
    let lead = hex_at(bytes, index + 2, 2)?;
    let len = utf8_sequence_len(lead)?;
    let mut value = match len {
        1 => lead,
        2 => lead & 0x1f,
        3 => lead & 0x0f,
        _ => lead & 0x07,
    };
    for n in 1..len {
        let at = index + 4 * n;
        if bytes.get(at) != Some(&b'\\') || bytes.get(at + 1) != Some(&b'x') {
            return None;
        }
        let unit = hex_at(bytes, at + 2, 2)?;
        value = (value << 6) | (unit & 0x3f);
    }
    char::from_u32(value).map(|c| (4 * len, c))
}

/// `\uHHHH`, or a `\uHHHH\uHHHH` surrogate pair.
fn decode_utf16_escape(bytes: &[u8], index: usize) -> Option<(usize, char)> {
    let unit = hex_at(bytes, index + 2, 4)?;
    match unit {
        0xd800..=0xdbff => {
            if bytes.get(index + 6) != Some(&b'\\') || bytes.get(index + 7) != Some(&b'u') {
                return None;
            }
            let low = hex_at(bytes, index + 8, 4)?;
            if !(0xdc00..=0xdfff).contains(&low) {
                return None;
            }
            let value = 0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00);
            char::from_u32(value).map(|c| (12, c))
        }
        0xdc00..=0xdfff => None,
        _ => char::from_u32(unit).map(|c| (6, c)),
    }
}

/// Total byte length of a UTF-8 sequence given its first byte.
fn utf8_sequence_len(lead: u32) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xe0 == 0xc0 {
        Some(2)
    } else if lead & 0xf0 == 0xe0 {
        Some(3)
    } else if lead & 0xf8 == 0xf0 {
        Some(4)
    } else {
        None
    }
}

/// Parse exactly `digits` hex digits starting at `bytes[start]`.
fn hex_at(bytes: &[u8], start: usize, digits: usize) -> Option<u32> {
    let slice = bytes.get(start..start + digits)?;
    slice.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char).to_digit(16)?;
        Some((acc << 4) | digit)
    })
}

static CONTROL_ESCAPES: [&str; 32] = [
    "\\0", "\\x01", "\\x02", "\\x03", "\\x04", "\\x05", "\\x06", "\\a", //
    "\\b", "\\t", "\\n", "\\v", "\\f", "\\r", "\\x0e", "\\x0f", //
    "\\x10", "\\x11", "\\x12", "\\x13", "\\x14", "\\x15", "\\x16", "\\x17", //
    "\\x18", "\\x19", "\\x1a", "\\e", "\\x1c", "\\x1d", "\\x1e", "\\x1f",
];

/// Escape sequence for `c` inside a backslash-escaped string, or `None`
/// when `c` can be written as itself.
///
/// `quote` is the delimiter of the surrounding literal; only that quote
/// character is escaped.
pub fn escape_char(c: char, quote: Option<char>) -> Option<&'static str> {
    match c {
        '\0'..='\x1f' => Some(CONTROL_ESCAPES[c as usize]),
        '\x7f' => Some("\\x7f"),
        '\\' => Some("\\\\"),
        '"' if quote == Some('"') => Some("\\\""),
        '\'' if quote == Some('\'') => Some("\\'"),
        _ => None,
    }
}
