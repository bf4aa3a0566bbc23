//! Text format specifiers for multi-line strings.
//!
//! A string literal may be prefixed with `|` and a specifier that controls
//! how its lines are post-processed, e.g. `||"""` to deindent a fenced
//! block or `|>'''` to fold it into paragraphs. The specifier grammar is
//! `|[=^;|>][+$*-]?\.*` followed by the opening quote.

use std::borrow::Cow;

use crate::is_whitespace_char;

/// How the lines of a string body are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
#[cfg_attr(feature = "facet", repr(u8))]
pub enum BlockFormat {
    /// Keep text as-is (`|=` and `|^`, and the default).
    #[default]
    Keep,
    /// Strip leading whitespace, including newlines (`|;`).
    Strip,
    /// Remove the indentation of the first non-blank line from every
    /// line (`||`).
    Deindent,
    /// Deindent, then join runs of lines into space-separated paragraphs (`|>`).
    Fold,
}

/// How trailing whitespace at the end of a string body is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
#[cfg_attr(feature = "facet", repr(u8))]
pub enum EndFormat {
    /// Keep everything (`*`).
    #[default]
    KeepAll,
    /// Keep at most one trailing line break (`$`).
    KeepOneLine,
    /// Keep line breaks, but trim spaces and tabs after the last one (`+`).
    KeepAllLines,
    /// Strip all trailing whitespace (`-`).
    Strip,
}

impl EndFormat {
    /// End format selected by a specifier character.
    pub fn from_char(c: char) -> Option<EndFormat> {
        match c {
            '+' => Some(EndFormat::KeepAllLines),
            '$' => Some(EndFormat::KeepOneLine),
            '*' => Some(EndFormat::KeepAll),
            '-' => Some(EndFormat::Strip),
            _ => None,
        }
    }
}

/// A parsed text format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct TextFormat {
    pub block: BlockFormat,
    pub end: EndFormat,
    /// Number of `.` characters: how much of the first line's indentation is
    /// kept when deindenting.
    pub first_line_indent: usize,
}

impl TextFormat {
    /// Format used when a string has no specifier.
    pub const DEFAULT: TextFormat = TextFormat::new(BlockFormat::Keep, EndFormat::KeepAll);

    pub const fn new(block: BlockFormat, end: EndFormat) -> Self {
        Self {
            block,
            end,
            first_line_indent: 0,
        }
    }

    /// Format selected by a block specifier character, with that block
    /// mode's default end format.
    pub fn from_block_char(c: char) -> Option<TextFormat> {
        let (block, end) = match c {
            '=' => (BlockFormat::Keep, EndFormat::KeepAll),
            '^' => (BlockFormat::Keep, EndFormat::Strip),
            ';' => (BlockFormat::Strip, EndFormat::Strip),
            '|' => (BlockFormat::Deindent, EndFormat::KeepOneLine),
            '>' => (BlockFormat::Fold, EndFormat::KeepOneLine),
            _ => return None,
        };
        Some(TextFormat::new(block, end))
    }

    /// Apply the block format, then the end format, to `text`.
    pub fn apply<'a>(&self, text: Cow<'a, str>) -> Cow<'a, str> {
        let text = match self.block {
            BlockFormat::Keep => text,
            BlockFormat::Strip => match text {
                Cow::Borrowed(s) => Cow::Borrowed(s.trim_start_matches(is_whitespace_char)),
                Cow::Owned(s) => Cow::Owned(s.trim_start_matches(is_whitespace_char).to_string()),
            },
            BlockFormat::Deindent => {
                Cow::Owned(deindented_lines(&text, self.first_line_indent).concat())
            }
            BlockFormat::Fold => Cow::Owned(fold(&text, self.first_line_indent)),
        };
        apply_end(self.end, text)
    }
}

fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Shorten `text` to the prefix `keep` returns.
fn truncate_cow<'a>(text: Cow<'a, str>, keep: impl Fn(&str) -> &str) -> Cow<'a, str> {
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(keep(s)),
        Cow::Owned(mut s) => {
            let len = keep(&s).len();
            s.truncate(len);
            Cow::Owned(s)
        }
    }
}

fn apply_end(end: EndFormat, text: Cow<'_, str>) -> Cow<'_, str> {
    match end {
        EndFormat::KeepAll => text,
        EndFormat::KeepAllLines => truncate_cow(text, |s| s.trim_end_matches(is_inline_space)),
        EndFormat::Strip => truncate_cow(text, |s| s.trim_end_matches(is_whitespace_char)),
        EndFormat::KeepOneLine => {
            let text = truncate_cow(text, |s| s.trim_end_matches(is_inline_space));
            let line_ending = if text.ends_with("\r\n") {
                "\r\n"
            } else if text.ends_with('\n') {
                "\n"
            } else {
                return text;
            };
            let mut text = truncate_cow(text, |s| s.trim_end_matches(is_whitespace_char)).into_owned();
            text.push_str(line_ending);
            Cow::Owned(text)
        }
    }
}

/// Lines of `text` with the common indentation removed. Each line keeps its
/// own line ending.
///
/// The indentation is taken from the first non-blank line, less
/// `first_line_indent` characters. Blank lines before it are dropped.
fn deindented_lines(text: &str, first_line_indent: usize) -> Vec<&str> {
    let mut indent: Option<&str> = None;
    let mut lines = Vec::new();
    for line in text.split_inclusive('\n') {
        match indent {
            None => {
                let leading = line.len() - line.trim_start_matches(is_whitespace_char).len();
                if leading == line.len() {
                    continue;
                }
                let cut = leading.saturating_sub(first_line_indent);
                indent = Some(&line[..cut]);
                lines.push(&line[cut..]);
            }
            Some(indent) => {
                let common = line
                    .bytes()
                    .zip(indent.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                lines.push(&line[common..]);
            }
        }
    }
    lines
}

/// Deindent, then join consecutive non-blank lines with single spaces.
///
/// A blank line ends the current paragraph. So does a line that is still
/// indented after deindenting, which starts a paragraph of its own. A
/// paragraph ends with the line ending of its last line.
fn fold(text: &str, first_line_indent: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut paragraph: Vec<&str> = Vec::new();
    let mut paragraph_end = "\n";

    fn flush(out: &mut String, paragraph: &mut Vec<&str>, end: &str) {
        out.push_str(&paragraph.join(" "));
        out.push_str(end);
        paragraph.clear();
    }

    for line in deindented_lines(text, first_line_indent) {
        let trimmed = line.trim_end_matches(is_whitespace_char);
        if trimmed.is_empty() {
            if paragraph.is_empty() {
                out.push_str(line);
            } else {
                flush(&mut out, &mut paragraph, paragraph_end);
            }
            continue;
        }
        if trimmed.starts_with(is_whitespace_char) && !paragraph.is_empty() {
            flush(&mut out, &mut paragraph, paragraph_end);
        }
        paragraph.push(trimmed);
        paragraph_end = &line[trimmed.len()..];
    }
    if !paragraph.is_empty() {
        flush(&mut out, &mut paragraph, paragraph_end);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn format(spec: &str, text: &str) -> String {
        let mut chars = spec.chars();
        let mut format = chars
            .next()
            .and_then(TextFormat::from_block_char)
            .unwrap_or(TextFormat::DEFAULT);
        for c in chars {
            if c == '.' {
                format.first_line_indent += 1;
            } else if let Some(end) = EndFormat::from_char(c) {
                format.end = end;
            }
        }
        format.apply(Cow::Borrowed(text)).into_owned()
    }

    #[test]
    fn test_keep() {
        assert_eq!(format("=", "  a \n\n"), "  a \n\n");
        assert_eq!(format("^", "  a \n\n"), "  a");
    }

    #[test]
    fn test_strip() {
        assert_eq!(format(";", "\n \t a b \n"), "a b");
        assert_eq!(format(";*", "\n  a \n"), "a \n");
    }

    #[test]
    fn test_deindent() {
        let text = "\n    first\n      nested\n\n    last\n  ";
        assert_eq!(format("|", text), "first\n  nested\n\nlast\n");
        assert_eq!(format("|-", text), "first\n  nested\n\nlast");
        assert_eq!(format("|*", text), "first\n  nested\n\nlast\n");
    }

    #[test]
    fn test_deindent_matches_indent_by_character() {
        // The tab does not match the space indent, so it is kept.
        assert_eq!(format("|", "\n  a\n\tb\n"), "a\n\tb\n");
    }

    #[test]
    fn test_deindent_first_line_indent() {
        assert_eq!(format("|.", "\n    a\n    b\n"), " a\n b\n");
        assert_eq!(format("|....", "\n  a\n"), "  a\n");
    }

    #[test]
    fn test_fold_paragraphs() {
        let text = "\n  one\n  two\n\n  three\n  four\n";
        assert_eq!(format(">", text), "one two\nthree four\n");
    }

    #[test]
    fn test_fold_indented_line_breaks_paragraph() {
        let text = "\n  one\n    two\n  three\n";
        assert_eq!(format(">", text), "one\n  two three\n");
    }

    #[test]
    fn test_fold_extra_blank_lines_are_kept() {
        let text = "  a\n\n\n  b\n";
        assert_eq!(format(">+", text), "a\n\nb\n");
    }

    #[test]
    fn test_keep_one_line_collapses_trailing_blank_lines() {
        assert_eq!(format("|", "a\n\n\n"), "a\n");
        assert_eq!(format("|", "a\r\n \r\n"), "a\r\n");
        assert_eq!(format("|", "a  "), "a");
    }

    #[test]
    fn test_keep_all_lines() {
        assert_eq!(format("=+", "a\n\n  \t"), "a\n\n");
    }
}
