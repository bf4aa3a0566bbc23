//! Elements, the nodes of a Muml document.

use muml_tokenizer::{SourceSpan, is_identifier_str};

use crate::{Attribute, Attributes, BreadthFirst, DepthFirst, append_text, traverse};

/// A named node: `name=value "text" [attr=value] {members}`.
///
/// Deep trees are dropped, compared and traversed without recursion.
#[derive(Debug, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Element {
    /// Element name. May be empty, e.g. for `{""}`.
    pub name: String,
    /// Location of the name in the source (None if programmatically constructed).
    pub span: Option<SourceSpan>,
    /// Free text. `None` and `Some("")` are distinct.
    pub text: Option<String>,
    /// Positional values, `name=a=b`.
    pub values: Vec<String>,
    pub attributes: Attributes,
    /// Child elements.
    pub members: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: None,
            text: None,
            values: Vec::new(),
            attributes: Attributes::new(),
            members: Vec::new(),
        }
    }

    /// Create an empty element named by a source token.
    pub fn with_span(name: impl Into<String>, span: SourceSpan) -> Self {
        let mut element = Self::new(name);
        element.span = Some(span);
        element
    }

    /// Builder-style: set the text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style: append a value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Builder-style: append an attribute.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Builder-style: append a member.
    pub fn member(mut self, member: Element) -> Self {
        self.members.push(member);
        self
    }

    pub fn push_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn push_member(&mut self, member: Element) {
        self.members.push(member);
    }

    /// Append a string literal to the text, the way consecutive literals in
    /// the source are joined.
    pub fn append_text(&mut self, text: Option<&str>) {
        append_text(&mut self.text, text);
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Whether the name can be written without quotes.
    pub fn has_identifier_name(&self) -> bool {
        is_identifier_str(&self.name)
    }

    /// Whether the element has non-empty text.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
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

    /// First direct member called `name`.
    pub fn find_member(&self, name: &str) -> Option<&Element> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Every direct member called `name`.
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.members.iter().filter(move |m| m.name == name)
    }

    /// Number of levels in the tree rooted at this element, itself included.
    pub fn depth(&self) -> usize {
        1 + traverse::depth(&self.members)
    }

    /// Every element under this one and then this element itself, children
    /// before their parents.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst::with_root(self)
    }

    /// This element, then its members level by level.
    pub fn iter_breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst::with_root(self)
    }

    /// Compare names, text, values, attributes and members, ignoring spans.
    pub fn content_eq(&self, other: &Element) -> bool {
        traverse::members_eq(std::slice::from_ref(self), std::slice::from_ref(other))
    }

    /// Compare everything but the members.
    pub(crate) fn shallow_eq(&self, other: &Element) -> bool {
        self.name == other.name
            && self.text == other.text
            && self.values == other.values
            && self.attributes == other.attributes
            && self.members.len() == other.members.len()
    }
}

/// Content equality; spans are ignored.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for Element {}

impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.members);
        while let Some(mut element) = pending.pop() {
            pending.append(&mut element.members);
        }
    }
}
