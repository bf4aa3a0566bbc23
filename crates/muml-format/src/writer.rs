//! Muml output writer.
//!
//! Renders documents, elements and their parts as text that parses back to
//! a content-equal tree.

use std::slice;

use muml_tokenizer::is_identifier_char;
use muml_tree::{Attribute, Attributes, Document, Element};

use crate::options::FormatOptions;
use crate::scalar::{to_identifier_string, to_quoted_string};

/// Muml output writer.
///
/// Output accumulates across calls until [`MumlWriter::finish`].
pub struct MumlWriter {
    out: String,
    options: FormatOptions,
    /// Indentation of the current line, grown and shrunk one level at a time.
    indent: String,
}

impl MumlWriter {
    /// Create a new writer with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            options,
            indent: String::new(),
        }
    }

    /// Consume the writer and return the output.
    pub fn finish(self) -> String {
        self.out
    }

    /// Output written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Write document text, document values and then every top-level
    /// member, each followed by the configured newline.
    pub fn write_document(&mut self, document: &Document) {
        if let Some(text) = &document.text {
            let text = to_quoted_string(text, self.options.document_text);
            self.token(&text);
            self.newline();
        }
        for value in &document.values {
            self.write_value(value);
            self.newline();
        }
        for member in &document.members {
            self.write_element_at(member, 0);
            self.newline();
        }
    }

    /// Write an element and everything below it.
    pub fn write_element(&mut self, element: &Element) {
        self.write_element_at(element, 0);
    }

    /// Write `=value` for each value.
    pub fn write_values(&mut self, values: &[String]) {
        let spaced = values.len() > 1 && !self.options.reduce_spaces;
        for (i, value) in values.iter().enumerate() {
            if spaced && (i > 0 || !self.ends_with_space()) {
                self.out.push(' ');
            }
            self.write_value(value);
        }
    }

    /// Write an attribute list in brackets.
    ///
    /// A nameless attribute right after one with a name and no value would
    /// bind to it on re-parsing, so it starts a new bracket group.
    pub fn write_attributes(&mut self, attributes: &Attributes) {
        let mut previous: Option<&Attribute> = None;
        for attribute in attributes.iter() {
            match previous {
                None => self.token("["),
                Some(prev)
                    if prev.name.is_some() && prev.value.is_none() && attribute.name.is_none() =>
                {
                    self.token("][");
                }
                Some(_) => self.out.push(' '),
            }
            self.write_attribute(attribute);
            previous = Some(attribute);
        }
        if previous.is_some() {
            self.token("]");
        }
    }

    fn write_attribute(&mut self, attribute: &Attribute) {
        if let Some(name) = &attribute.name {
            let name = to_identifier_string(name, self.options.attribute_name);
            self.token(&name);
        }
        match &attribute.value {
            Some(value) => {
                self.token("=");
                let value = to_identifier_string(value, self.options.attribute_value);
                self.token(&value);
            }
            None if attribute.name.is_none() => self.token("="),
            None => {}
        }
    }

    fn write_value(&mut self, value: &str) {
        self.token("=");
        let value = to_identifier_string(value, self.options.value);
        self.token(&value);
    }

    /// Write `element` as if it were indented `level` times. Members are
    /// walked with an explicit stack.
    fn write_element_at(&mut self, element: &Element, level: usize) {
        self.write_head(element);
        if !element.has_members() {
            return;
        }
        self.open_members();
        let mut stack: Vec<slice::Iter<'_, Element>> = vec![element.members.iter()];
        while !stack.is_empty() {
            let depth = level + stack.len();
            match stack.last_mut().and_then(Iterator::next) {
                Some(member) => {
                    self.line(depth);
                    self.write_head(member);
                    if member.has_members() {
                        self.open_members();
                        stack.push(member.members.iter());
                    }
                }
                None => {
                    stack.pop();
                    self.line(depth - 1);
                    self.token("}");
                }
            }
        }
    }

    /// Everything of an element except its members.
    fn write_head(&mut self, element: &Element) {
        let name = to_identifier_string(&element.name, self.options.name);
        if element.has_identifier_name() {
            self.token(&name);
        } else {
            self.token("{");
            self.token(&name);
            self.token("}");
        }
        self.write_values(&element.values);
        if let Some(text) = &element.text {
            self.space();
            let text = to_quoted_string(text, self.options.text);
            self.token(&text);
        }
        if !element.attributes.is_empty() {
            self.space();
            self.write_attributes(&element.attributes);
        }
    }

    fn open_members(&mut self) {
        self.space();
        self.token("{");
    }

    fn line(&mut self, depth: usize) {
        self.newline();
        let unit = self.options.indent;
        if unit.is_empty() {
            return;
        }
        let width = depth * unit.len();
        while self.indent.len() < width {
            self.indent.push_str(unit);
        }
        self.indent.truncate(width);
        self.out.push_str(&self.indent);
    }

    fn newline(&mut self) {
        self.out.push_str(self.options.newline);
    }

    /// An optional space between the parts of an element.
    fn space(&mut self) {
        if !self.options.reduce_spaces {
            self.out.push(' ');
        }
    }

    fn ends_with_space(&self) -> bool {
        self.out.ends_with(' ')
    }

    /// Append a token, separated from the previous one when the two would
    /// otherwise read as one.
    fn token(&mut self, token: &str) {
        if let (Some(last), Some(first)) = (self.out.chars().next_back(), token.chars().next()) {
            let merges = (is_identifier_char(last) && is_identifier_char(first))
                || (last == first && matches!(last, '"' | '\'' | '`'));
            if merges {
                self.out.push(' ');
            }
        }
        self.out.push_str(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextType;
    use facet_testhelpers::test;

    fn write(element: &Element, options: FormatOptions) -> String {
        let mut writer = MumlWriter::new(options);
        writer.write_element(element);
        writer.finish()
    }

    fn sample() -> Element {
        Element::new("server")
            .value("main")
            .text("primary host")
            .attribute(Attribute::new("port", "8080"))
            .attribute(Attribute::named("tls"))
            .member(Element::new("route").value("/").member(Element::new("GET")))
            .member(Element::new("log level").value("debug"))
    }

    #[test]
    fn test_default_layout() {
        insta::assert_snapshot!(write(&sample(), FormatOptions::default()), @r#"
        server=main "primary host" [port=8080 tls] {
          route=/ {
            GET
          }
          {"log level"}=debug
        }
        "#);
    }

    #[test]
    fn test_condensed_layout() {
        insta::assert_snapshot!(
            write(&sample(), FormatOptions::condensed()),
            @r#"server=main "primary host" [port=8080 tls] { route=/ { GET } {"log level"}=debug }"#
        );
    }

    #[test]
    fn test_minimized_layout() {
        insta::assert_snapshot!(
            write(&sample(), FormatOptions::minimized()),
            @r#"server=main"primary host"[port=8080 tls]{route=/{GET}{"log level"}=debug}"#
        );
    }

    #[test]
    fn test_minimized_separates_words() {
        let doc = Document {
            members: vec![
                Element::new("a").value("1"),
                Element::new("b"),
                Element::new("c").text(""),
                Element::new("d").text("x"),
            ],
            ..Document::default()
        };
        let mut writer = MumlWriter::new(FormatOptions::minimized());
        writer.write_document(&doc);
        assert_eq!(writer.finish(), r#"a=1 b c""d"x""#);
    }

    #[test]
    fn test_minimized_separates_same_quotes() {
        let element = Element::new("a").value("").text("");
        assert_eq!(write(&element, FormatOptions::minimized()), r#"a="" """#);
        let element = Element::new("a").value("x y").text("z");
        let options = FormatOptions::minimized().prefer(TextType::Backtick);
        assert_eq!(write(&element, options), "a=`x y` `z`");
    }

    #[test]
    fn test_several_values_are_spaced() {
        let element = Element::new("a").value("1").value("2");
        assert_eq!(write(&element, FormatOptions::default()), "a =1 =2");
        assert_eq!(write(&element, FormatOptions::minimized()), "a=1=2");
    }

    #[test]
    fn test_attribute_groups() {
        let element = Element::new("a")
            .attribute(Attribute::named("flag"))
            .attribute(Attribute::nameless("on"))
            .attribute(Attribute::nameless("off"))
            .attribute(Attribute::new("k k", "v"));
        assert_eq!(
            write(&element, FormatOptions::default()),
            r#"a [flag][=on =off "k k"=v]"#
        );
    }

    #[test]
    fn test_document_parts() {
        let doc = Document {
            text: Some("intro".to_string()),
            values: vec!["v".to_string()],
            members: vec![Element::new("a")],
            ..Document::default()
        };
        let mut writer = MumlWriter::new(FormatOptions::default());
        writer.write_document(&doc);
        assert_eq!(writer.finish(), "\"intro\"\n=v\na\n");
    }

    #[test]
    fn test_deep_tree_is_written_iteratively() {
        let n = 100_000;
        let mut element = Element::new("x");
        for _ in 1..n {
            element = Element::new("x").member(element);
        }
        let out = write(&element, FormatOptions::minimized());
        assert_eq!(out.len(), n * 3 - 2);
        assert_eq!(out.matches('{').count(), n - 1);
        assert!(out.starts_with("x{x{"));
        let tail = out.trim_end_matches('}');
        assert_eq!(out.len() - tail.len(), n - 1);
        assert!(tail.ends_with("{x"));
    }

    #[test]
    fn test_deep_tree_indents_each_level() {
        let n = 2_000;
        let mut element = Element::new("x");
        for _ in 1..n {
            element = Element::new("x").member(element);
        }
        let out = write(&element, FormatOptions::default().indent(" "));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2 * n - 1);
        assert_eq!(lines[n - 1], format!("{}x", " ".repeat(n - 1)));
        assert_eq!(lines[n], format!("{}}}", " ".repeat(n - 2)));
        assert_eq!(lines[2 * n - 2], "}");
    }

    #[test]
    fn test_identifier_values_are_bare() {
        let element = Element::new("route").value("/").value("a b").value("");
        assert_eq!(
            write(&element, FormatOptions::default()),
            r#"route =/ ="a b" ="""#
        );
        let element = Element::new("a").attribute(Attribute::new("path", "/usr/bin"));
        assert_eq!(write(&element, FormatOptions::default()), "a [path=/usr/bin]");
    }
}
