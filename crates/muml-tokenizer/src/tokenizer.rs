//! Tokenizer for the Muml format.

use std::borrow::Cow;

use crate::{
    EndFormat, SourceErrorKind, SourceErrors, SourceLocation, TextFormat, Token, TokenKind,
    is_identifier_char, is_quote_char, is_whitespace_char, unescape,
};
use tracing::trace;

/// A tokenizer that produces tokens from Muml source text.
///
/// Whitespace is skipped. Malformed input never stops the tokenizer: the
/// problem is recorded in [`Tokenizer::errors`] and a best-effort token is
/// produced instead.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current position.
    location: SourceLocation,
    /// Where the token being scanned began.
    token_start: SourceLocation,
    /// Token to return before scanning any further. Set when a `{` followed
    /// by a string turns out not to be a braced identifier.
    queued: Option<Token<'src>>,
    errors: SourceErrors,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            location: SourceLocation::START,
            token_start: SourceLocation::START,
            queued: None,
            errors: SourceErrors::new(),
        }
    }

    /// Attach a file name to the reported errors.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.errors.set_file_name(Some(file_name.into()));
        self
    }

    /// Errors found so far.
    pub fn errors(&self) -> &SourceErrors {
        &self.errors
    }

    /// Errors found so far, for callers that report their own errors
    /// against the same list.
    pub fn errors_mut(&mut self) -> &mut SourceErrors {
        &mut self.errors
    }

    /// Consume the tokenizer and return its errors.
    pub fn into_errors(self) -> SourceErrors {
        self.errors
    }

    /// Whether no error has been found so far.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Current position in the source.
    #[inline]
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    #[inline]
    fn pos(&self) -> usize {
        self.location.index as usize
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        let len = c.len_utf8();
        self.location.index += len as u32;
        self.remaining = &self.remaining[len..];
        if c == '\n' {
            self.location.line += 1;
            self.location.line_start = self.location.index;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace_char) {
            self.advance();
        }
    }

    /// Skip spaces and tabs only.
    fn skip_inline_space(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
    }

    fn error(&mut self, kind: SourceErrorKind) {
        self.errors.add(kind, self.token_start);
    }

    /// Create a token spanning from the token start to the current position.
    fn token(&self, kind: TokenKind, text: Option<Cow<'src, str>>) -> Token<'src> {
        let span = self.token_start.span_to(self.location);
        trace!("Token {:?} at {}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Option<Token<'src>> {
        if let Some(token) = self.queued.take() {
            trace!("Queued token {:?} at {}", token.kind, token.span);
            return Some(token);
        }

        self.skip_whitespace();
        self.token_start = self.location;
        let mut c = self.advance();

        // Reserved metacharacters: one error per run.
        let mut reported = false;
        while let Some('&' | ';' | '(' | ')') = c {
            if !reported {
                reported = true;
                self.error(SourceErrorKind::UnexpectedCharacter);
            }
            self.skip_whitespace();
            self.token_start = self.location;
            c = self.advance();
        }

        let c = c?;
        let token = match c {
            '#' => self.tokenize_comment(),
            '|' | '`' | '\'' | '"' => {
                let text = self.string_literal_text(c);
                self.token(TokenKind::String, text)
            }
            '{' => self.tokenize_open_brace(),
            '}' => self.token(TokenKind::EndMembers, Some(Cow::Borrowed("}"))),
            '[' => self.token(TokenKind::BeginAttributes, Some(Cow::Borrowed("["))),
            ']' => self.token(TokenKind::EndAttributes, Some(Cow::Borrowed("]"))),
            '=' => self.token(TokenKind::Equals, Some(Cow::Borrowed("="))),
            _ => {
                debug_assert!(is_identifier_char(c));
                self.tokenize_identifier()
            }
        };
        Some(token)
    }

    fn tokenize_identifier(&mut self) -> Token<'src> {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }
        let text = &self.source[self.token_start.index as usize..self.pos()];
        self.token(TokenKind::Identifier, Some(Cow::Borrowed(text)))
    }

    /// After `{`: either a members block or a braced identifier `{"name"}`.
    fn tokenize_open_brace(&mut self) -> Token<'src> {
        let brace_end = self.location;
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == '|' || is_quote_char(c) => {}
            _ => {
                let span = self.token_start.span_to(brace_end);
                trace!("Token BeginMembers at {}", span);
                return Token::punct(TokenKind::BeginMembers, span, "{");
            }
        }

        let string_start = self.location;
        let text = self.advance().and_then(|c| self.string_literal_text(c));
        let string_end = self.location;
        self.skip_whitespace();

        if self.peek() == Some('}') {
            self.advance();
            let text = match text {
                Some(text) => text,
                None => {
                    self.error(SourceErrorKind::MalformedBracesIdentifier);
                    Cow::Borrowed("")
                }
            };
            return self.token(TokenKind::Identifier, Some(text));
        }

        // Not an identifier after all: the string becomes the first thing
        // inside a members block.
        let string = Token::new(TokenKind::String, string_start.span_to(string_end), text);
        trace!("Requeue {:?} at {}", string.kind, string.span);
        self.queued = Some(string);
        let span = self.token_start.span_to(string_start);
        trace!("Token BeginMembers at {}", span);
        Token::punct(TokenKind::BeginMembers, span, "{")
    }

    /// After `#`.
    fn tokenize_comment(&mut self) -> Token<'src> {
        match self.peek() {
            Some('#') => {
                self.advance();
                if self.peek() == Some('#') {
                    self.advance();
                    self.tokenize_fenced_comment()
                } else {
                    // `##` is a line comment whose text keeps the second `#`.
                    self.tokenize_line_comment(self.pos() - 1)
                }
            }
            Some('[') => {
                self.advance();
                self.tokenize_nested_block_comment()
            }
            _ => self.tokenize_line_comment(self.pos()),
        }
    }

    fn tokenize_line_comment(&mut self, text_start: usize) -> Token<'src> {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        let text = self.source[text_start..self.pos()].trim_end_matches('\r');
        self.token(TokenKind::LineComment, Some(Cow::Borrowed(text)))
    }

    /// `###...###`. The closing fence has as many `#` as the opening one.
    fn tokenize_fenced_comment(&mut self) -> Token<'src> {
        let mut fence = 3;
        while self.peek() == Some('#') {
            self.advance();
            fence += 1;
        }
        let text_start = self.pos();
        let mut run = 0;
        let text_end = loop {
            match self.advance() {
                None => break self.pos(),
                Some('#') => {
                    run += 1;
                    if run == fence {
                        break self.pos() - fence;
                    }
                }
                Some(_) => run = 0,
            }
        };
        let text = &self.source[text_start..text_end];
        self.token(TokenKind::FencedComment, Some(Cow::Borrowed(text)))
    }

    /// `#[ ... #]`, nesting tracked with a depth counter.
    fn tokenize_nested_block_comment(&mut self) -> Token<'src> {
        let text_start = self.pos();
        let mut depth = 1usize;
        let text_end = loop {
            match self.advance() {
                None => {
                    self.error(SourceErrorKind::UnterminatedNestedBlockComment);
                    break self.pos();
                }
                Some('#') => match self.peek() {
                    Some('[') => {
                        self.advance();
                        depth += 1;
                    }
                    Some(']') => {
                        self.advance();
                        depth -= 1;
                        if depth == 0 {
                            break self.pos() - 2;
                        }
                    }
                    _ => {}
                },
                Some(_) => {}
            }
        };
        let text = &self.source[text_start..text_end];
        self.token(TokenKind::NestedBlockComment, Some(Cow::Borrowed(text)))
    }

    /// Read a string literal whose opening character `open` has been
    /// consumed. Returns `None` when no text could be read.
    fn string_literal_text(&mut self, open: char) -> Option<Cow<'src, str>> {
        if open != '|' {
            return self.string_body(open);
        }
        if self.peek().is_none_or(is_whitespace_char) {
            return Some(self.line_string_text());
        }
        let format = self.format_specifier();
        self.skip_whitespace();
        match self.peek() {
            Some(quote) if is_quote_char(quote) => {
                self.advance();
                let body = self.string_body(quote)?;
                Some(format.apply(body))
            }
            _ => {
                self.error(SourceErrorKind::ExpectedStringAfterFormatSpecifier);
                None
            }
        }
    }

    /// `| text`: the rest of the line, without surrounding whitespace.
    fn line_string_text(&mut self) -> Cow<'src, str> {
        self.skip_inline_space();
        let start = self.pos();
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        Cow::Borrowed(self.source[start..self.pos()].trim_end_matches(is_whitespace_char))
    }

    /// `[=^;|>][+$*-]?\.*`
    fn format_specifier(&mut self) -> TextFormat {
        let mut format = TextFormat::DEFAULT;
        if let Some(block) = self.peek().and_then(TextFormat::from_block_char) {
            self.advance();
            format = block;
        }
        if let Some(end) = self.peek().and_then(EndFormat::from_char) {
            self.advance();
            format.end = end;
        }
        while self.peek() == Some('.') {
            self.advance();
            format.first_line_indent += 1;
        }
        format
    }

    /// String body after its opening quote: empty (`""`), fenced (`"""`)
    /// or a single-line literal.
    fn string_body(&mut self, quote: char) -> Option<Cow<'src, str>> {
        if self.peek() == Some(quote) {
            self.advance();
            if self.peek() != Some(quote) {
                return Some(Cow::Borrowed(""));
            }
            self.advance();
            let mut fence = 3;
            while self.peek() == Some(quote) {
                self.advance();
                fence += 1;
            }
            return self.fenced_body(quote, fence);
        }
        if quote == '`' {
            self.backtick_body()
        } else {
            self.quoted_body(quote)
        }
    }

    /// Body of a fenced string. Quote and double-quote fences honour
    /// backslash escapes; backtick fences are raw.
    fn fenced_body(&mut self, quote: char, fence: usize) -> Option<Cow<'src, str>> {
        let start = self.pos();
        let mut run = 0;
        let end = loop {
            match self.advance() {
                None => {
                    self.error(SourceErrorKind::UnterminatedStringLiteral);
                    return None;
                }
                Some('\\') if quote != '`' => {
                    run = 0;
                    self.advance();
                }
                Some(c) if c == quote => {
                    run += 1;
                    if run == fence {
                        break self.pos() - fence;
                    }
                }
                Some(_) => run = 0,
            }
        };
        let raw = &self.source[start..end];
        if quote == '`' {
            Some(Cow::Borrowed(raw))
        } else {
            Some(self.unescape_body(raw))
        }
    }

    /// Body of a `'...'` or `"..."` literal. A newline ends the literal
    /// with an error.
    fn quoted_body(&mut self, quote: char) -> Option<Cow<'src, str>> {
        let start = self.pos();
        let raw = loop {
            match self.peek() {
                None => {
                    self.error(SourceErrorKind::UnterminatedStringLiteral);
                    return None;
                }
                Some('\n') => {
                    self.error(SourceErrorKind::UnexpectedNewlineInStringLiteral);
                    break &self.source[start..self.pos()];
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(c) if c == quote => {
                    let raw = &self.source[start..self.pos()];
                    self.advance();
                    break raw;
                }
                Some(_) => {
                    self.advance();
                }
            }
        };
        Some(self.unescape_body(raw))
    }

    /// Body of a `` `...` `` literal, where ``` `` ``` stands for one backtick.
    fn backtick_body(&mut self) -> Option<Cow<'src, str>> {
        let start = self.pos();
        let mut doubled = false;
        loop {
            match self.advance() {
                None => {
                    self.error(SourceErrorKind::UnterminatedStringLiteral);
                    return None;
                }
                Some('`') if self.peek() == Some('`') => {
                    self.advance();
                    doubled = true;
                }
                Some('`') => break,
                Some(_) => {}
            }
        }
        let raw = &self.source[start..self.pos() - 1];
        if doubled {
            Some(Cow::Owned(raw.replace("``", "`")))
        } else {
            Some(Cow::Borrowed(raw))
        }
    }

    fn unescape_body(&mut self, raw: &'src str) -> Cow<'src, str> {
        let unescaped = unescape(raw);
        if unescaped.malformed_at.is_some() {
            self.error(SourceErrorKind::MalformedStringEscapeSequence);
        }
        unescaped.text
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
