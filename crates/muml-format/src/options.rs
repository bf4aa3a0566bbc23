//! Formatting options for Muml output.

/// Literal style used for strings that cannot be written bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextType {
    /// `"text"`
    #[default]
    DoubleQuote,
    /// `'text'`
    SingleQuote,
    /// `` `text` ``
    Backtick,
    /// `"""text"""`
    DoubleQuoteFence,
    /// `'''text'''`
    SingleQuoteFence,
    /// ```` ```text``` ````
    BacktickFence,
}

impl TextType {
    pub const ALL: [TextType; 6] = [
        TextType::DoubleQuote,
        TextType::SingleQuote,
        TextType::Backtick,
        TextType::DoubleQuoteFence,
        TextType::SingleQuoteFence,
        TextType::BacktickFence,
    ];
}

/// Options for Muml output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indentation per member level (default: two spaces).
    pub indent: &'static str,
    /// Written between members and top-level items (default: `"\n"`).
    pub newline: &'static str,
    /// Drop optional spaces between the parts of an element.
    pub reduce_spaces: bool,
    /// Style for document text.
    pub document_text: TextType,
    /// Style for element names that are not identifiers.
    pub name: TextType,
    /// Style for values.
    pub value: TextType,
    /// Style for element text.
    pub text: TextType,
    pub attribute_name: TextType,
    pub attribute_value: TextType,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "  ",
            newline: "\n",
            reduce_spaces: false,
            document_text: TextType::default(),
            name: TextType::default(),
            value: TextType::default(),
            text: TextType::default(),
            attribute_name: TextType::default(),
            attribute_value: TextType::default(),
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything on one line, separated by single spaces.
    pub fn condensed() -> Self {
        Self::default().indent("").newline(" ")
    }

    /// The shortest output that reads back to the same tree.
    pub fn minimized() -> Self {
        Self::default().indent("").newline("").reduce_spaces(true)
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    pub fn newline(mut self, newline: &'static str) -> Self {
        self.newline = newline;
        self
    }

    pub fn reduce_spaces(mut self, reduce: bool) -> Self {
        self.reduce_spaces = reduce;
        self
    }

    /// Use one literal style everywhere.
    pub fn prefer(mut self, text_type: TextType) -> Self {
        self.document_text = text_type;
        self.name = text_type;
        self.value = text_type;
        self.text = text_type;
        self.attribute_name = text_type;
        self.attribute_value = text_type;
        self
    }
}
