//! Token-at-a-time parser for Muml.

use muml_tokenizer::{
    SourceErrorKind, SourceErrors, SourceLocation, SourceSpan, Token, TokenKind, Tokenizer,
};
use muml_tree::{Attribute, Document, Element};
use tracing::{debug, trace};

/// Sorting is skipped above this many errors.
const SORT_LIMIT: usize = 4096;

/// Builds a [`Document`] from Muml source, one token per step.
///
/// Open elements live on an explicit stack instead of the call stack. The
/// element on top of the stack is owned by the stack until it is closed or
/// replaced by a sibling, at which point it is moved into its parent (or
/// into the document when it has none).
pub struct Parser<'src> {
    tokenizer: Tokenizer<'src>,
    document: Document,
    stack: Vec<Element>,
    /// Inside `[...]`; holds the `[` location.
    attributes_start: Option<SourceLocation>,
    /// Directly after `{`, before the first member name.
    after_begin_members: bool,
    /// Every `{` not yet closed.
    open_braces: Vec<SourceSpan>,
    /// Directly after an attribute name inside `[...]`.
    after_attribute_name: bool,
    /// A `=` is waiting for its value; holds the `=` location.
    pending_equals: Option<SourceLocation>,
    /// Kind of the last reported structural error, for coalescing.
    last_error: Option<SourceErrorKind>,
    finished: bool,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            document: Document::new(),
            stack: Vec::new(),
            attributes_start: None,
            after_begin_members: false,
            open_braces: Vec::new(),
            after_attribute_name: false,
            pending_equals: None,
            last_error: None,
            finished: false,
        }
    }

    /// Tag errors and the resulting document with a file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        self.document.file_name = Some(file_name.clone());
        self.tokenizer = self.tokenizer.with_file_name(file_name);
        self
    }

    /// Errors found so far.
    pub fn errors(&self) -> &SourceErrors {
        self.tokenizer.errors()
    }

    pub fn is_ok(&self) -> bool {
        self.tokenizer.is_ok()
    }

    /// Parse the whole input.
    pub fn parse(mut self) -> Document {
        while self.parse_next_token() {}
        self.into_document()
    }

    /// The document built so far. Elements still open are closed first.
    pub fn into_document(mut self) -> Document {
        while let Some(element) = self.stack.pop() {
            self.attach(element);
        }
        let mut document = self.document;
        document.errors = self.tokenizer.into_errors();
        document
    }

    /// Consume one token. Returns `false` once the input is exhausted.
    pub fn parse_next_token(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let Some(token) = self.tokenizer.next_token() else {
            self.finished = true;
            self.handle_eof();
            return false;
        };
        trace!("Parsing {}", token);
        let start = token.span.start;
        let mut keep_coalescing = false;
        match token.kind {
            TokenKind::LineComment | TokenKind::FencedComment | TokenKind::NestedBlockComment => {
                return true;
            }
            TokenKind::Identifier => self.handle_string(true, token),
            TokenKind::String => {
                if self.after_begin_members {
                    self.errors_mut()
                        .add(SourceErrorKind::UnexpectedStringLiteral, start);
                    return true;
                }
                self.handle_string(false, token);
            }
            TokenKind::Equals => {
                if self.pending_equals.is_some() || self.after_begin_members {
                    self.error_coalesce(SourceErrorKind::UnexpectedEquals, start);
                    keep_coalescing = true;
                }
                self.pending_equals = Some(start);
                if self.attributes_start.is_some() && !self.after_attribute_name {
                    if let Some(top) = self.stack.last_mut() {
                        top.attributes.push(Attribute::default());
                    }
                }
                self.after_attribute_name = false;
            }
            TokenKind::BeginAttributes => {
                if self.attributes_start.is_some()
                    || self.after_begin_members
                    || self.stack.is_empty()
                {
                    self.error_coalesce(SourceErrorKind::UnexpectedOpenBracket, start);
                    return true;
                }
                self.leave_neutral();
                self.attributes_start = Some(start);
                self.after_attribute_name = false;
            }
            TokenKind::EndAttributes => {
                if self.attributes_start.is_none() || self.after_begin_members {
                    self.error_coalesce(SourceErrorKind::UnexpectedCloseBracket, start);
                    return true;
                }
                if self.pending_equals.is_some() && !self.last_attribute_has_content() {
                    self.error_coalesce(SourceErrorKind::UnexpectedCloseBracket, start);
                    keep_coalescing = true;
                }
                self.attributes_start = None;
                self.pending_equals = None;
            }
            TokenKind::BeginMembers => {
                if self.attributes_start.is_some()
                    || self.after_begin_members
                    || self.stack.is_empty()
                {
                    self.error_coalesce(SourceErrorKind::UnexpectedOpenBrace, start);
                    return true;
                }
                self.leave_neutral();
                self.after_begin_members = true;
                self.open_braces.push(token.span);
            }
            TokenKind::EndMembers => {
                if self.attributes_start.is_some() || self.stack.is_empty() {
                    self.error_coalesce(SourceErrorKind::UnexpectedCloseBrace, start);
                    return true;
                }
                self.leave_neutral();
                // `{}` opened no member, so there is nothing to close.
                if !self.after_begin_members {
                    self.pop();
                }
                self.open_braces.pop();
                self.after_begin_members = false;
            }
        }
        if !keep_coalescing {
            self.last_error = None;
        }
        true
    }

    fn errors_mut(&mut self) -> &mut SourceErrors {
        self.tokenizer.errors_mut()
    }

    /// Report an error unless the previous token reported one of the same
    /// kind.
    fn error_coalesce(&mut self, kind: SourceErrorKind, location: SourceLocation) {
        if self.last_error != Some(kind) {
            self.errors_mut().add(kind, location);
            self.last_error = Some(kind);
        }
    }

    /// Whether the current element's last attribute has a name or a value.
    fn last_attribute_has_content(&self) -> bool {
        self.stack
            .last()
            .and_then(|top| top.attributes.last())
            .is_some_and(|attr| attr.name.is_some() || attr.value.is_some())
    }

    /// Move a closed element into its parent.
    fn attach(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.push_member(element),
            None => self.document.push_member(element),
        }
    }

    fn pop(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.attach(element);
        }
    }

    /// Start a sibling of the current element.
    fn push_next(&mut self, element: Element) {
        self.pop();
        self.stack.push(element);
    }

    /// Start the first member of the current element.
    fn push_member(&mut self, element: Element) {
        self.stack.push(element);
    }

    /// A `=` followed by structure instead of a value.
    fn leave_neutral(&mut self) {
        if let Some(equals) = self.pending_equals.take() {
            self.errors_mut()
                .add(SourceErrorKind::ExpectedValueAfterEquals, equals);
        }
    }

    fn handle_string(&mut self, is_identifier: bool, token: Token<'src>) {
        let span = token.span;
        let text = token.into_text();

        if self.attributes_start.is_some() {
            if let Some(top) = self.stack.last_mut() {
                if self.pending_equals.take().is_some() {
                    self.after_attribute_name = false;
                    match top.attributes.last_mut() {
                        Some(last) => last.value = text,
                        None => top.attributes.push(Attribute {
                            name: None,
                            value: text,
                        }),
                    }
                } else {
                    top.attributes.push(Attribute {
                        name: text,
                        value: None,
                    });
                    self.after_attribute_name = true;
                }
                return;
            }
        }

        if self.pending_equals.take().is_some() {
            if let Some(value) = text {
                match self.stack.last_mut() {
                    Some(top) => top.push_value(value),
                    None => self.document.push_value(value),
                }
            }
        } else if !is_identifier {
            match self.stack.last_mut() {
                Some(top) => top.append_text(text.as_deref()),
                None => self.document.append_text(text.as_deref()),
            }
        } else {
            let element = Element::with_span(text.unwrap_or_default(), span);
            if self.after_begin_members {
                self.push_member(element);
                self.after_begin_members = false;
            } else {
                self.push_next(element);
            }
        }
    }

    fn handle_eof(&mut self) {
        match self.attributes_start {
            Some(start) => self
                .errors_mut()
                .add(SourceErrorKind::UnterminatedAttributes, start),
            None => self.leave_neutral(),
        }

        debug!(
            "End of input with {} open elements and {} open braces",
            self.stack.len(),
            self.open_braces.len()
        );
        for brace in std::mem::take(&mut self.open_braces) {
            self.errors_mut()
                .add(SourceErrorKind::UnterminatedMembers, brace.start);
        }

        let errors = self.errors_mut();
        if errors.len() < SORT_LIMIT {
            errors.sort_by_position();
        }
    }
}

#[cfg(test)]
mod tests;
