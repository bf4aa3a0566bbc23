//! Character classes of the Muml grammar.

/// Whether `c` is a Muml metacharacter: ``# = | & ; ( ) [ ] { } ` ' "``.
#[inline]
pub fn is_meta_char(c: char) -> bool {
    matches!(
        c,
        '#' | '=' | '|' | '&' | ';' | '(' | ')' | '[' | ']' | '{' | '}' | '`' | '"' | '\''
    )
}

/// Whether `c` opens or closes a string literal.
#[inline]
pub fn is_quote_char(c: char) -> bool {
    matches!(c, '`' | '"' | '\'')
}

/// Whitespace as far as the grammar is concerned: space, tab, CR and LF.
#[inline]
pub fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Identifiers may contain anything except whitespace and metacharacters.
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    !is_meta_char(c) && !is_whitespace_char(c)
}

/// Whether `text` can be written as a bare identifier.
pub fn is_identifier_str(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_identifier_char)
}

/// Length of the longest run of `c` in `text`.
pub fn max_consecutive_chars(text: &str, c: char) -> usize {
    let mut run = 0;
    let mut max_run = 0;
    for ch in text.chars() {
        if ch == c {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }
    max_run
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_str("hello"));
        assert!(is_identifier_str("a.b-c/d:e"));
        assert!(is_identifier_str("héllo✓"));
        assert!(is_identifier_str("1.5e3"));
        assert!(!is_identifier_str(""));
        assert!(!is_identifier_str("a b"));
        assert!(!is_identifier_str("eq="));
        assert!(!is_identifier_str("x#"));
        assert!(!is_identifier_str("a;b"));
    }

    #[test]
    fn test_max_consecutive_chars() {
        assert_eq!(max_consecutive_chars("", '`'), 0);
        assert_eq!(max_consecutive_chars("a`b``c", '`'), 2);
        assert_eq!(max_consecutive_chars("```", '`'), 3);
        assert_eq!(max_consecutive_chars("''a'", '\''), 2);
    }
}
