//! The root of a parsed Muml source.

use muml_tokenizer::SourceErrors;

use crate::{BreadthFirst, DepthFirst, Element, append_text, traverse};

/// A Muml document: top-level text, values and members, plus the errors
/// found while reading it.
///
/// A document with errors is still usable; the tree holds everything the
/// parser could recover.
#[derive(Debug, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Document {
    /// Free text outside of any element.
    pub text: Option<String>,
    /// Values attached with a top-level `=`.
    pub values: Vec<String>,
    /// Top-level elements.
    pub members: Vec<Element>,
    /// Problems found while parsing, sorted by position.
    pub errors: SourceErrors,
    /// Name of the file the document was read from, if any.
    pub file_name: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the document parsed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn push_member(&mut self, member: Element) {
        self.members.push(member);
    }

    /// Append a string literal to the document text.
    pub fn append_text(&mut self, text: Option<&str>) {
        append_text(&mut self.text, text);
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn has_members(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    pub fn last_value(&self) -> Option<&str> {
        self.values.last().map(String::as_str)
    }

    pub fn first_member(&self) -> Option<&Element> {
        self.members.first()
    }

    pub fn last_member(&self) -> Option<&Element> {
        self.members.last()
    }

    /// First top-level element called `name`.
    pub fn find_member(&self, name: &str) -> Option<&Element> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Every top-level element called `name`.
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.members.iter().filter(move |m| m.name == name)
    }

    /// Number of element levels; zero for a document without members.
    pub fn depth(&self) -> usize {
        traverse::depth(&self.members)
    }

    /// Every element, children before their parents.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst::new(&self.members)
    }

    /// Every element, level by level.
    pub fn iter_breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst::new(&self.members)
    }

    /// Compare text, values and members. Errors, file names and spans are
    /// ignored.
    pub fn content_eq(&self, other: &Document) -> bool {
        self.text == other.text
            && self.values == other.values
            && traverse::members_eq(&self.members, &other.members)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for Document {}
