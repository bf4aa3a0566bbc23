//! Written documents must parse back to the same tree.

use muml_format::{FormatOptions, TextType, to_string_with_options};
use muml_tree::{Attribute, Document, Element};
use proptest::prelude::*;

/// Characters that exercise every quoting path.
const CHARS: &str = r##"[a-z0-9 "'`\\\n\r\t=\[\]{}#|&;()é]{0,6}"##;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    values: Vec<String>,
    text: Option<String>,
    attributes: Vec<(Option<String>, Option<String>)>,
    members: Vec<Node>,
}

impl Node {
    fn build(&self) -> Element {
        let mut element = Element::new(self.name.clone());
        element.values = self.values.clone();
        element.text = self.text.clone();
        for (name, value) in &self.attributes {
            element.attributes.push(Attribute {
                name: name.clone(),
                value: value.clone(),
            });
        }
        element.members = self.members.iter().map(Node::build).collect();
        element
    }
}

fn string() -> impl Strategy<Value = String> {
    prop::string::string_regex(CHARS).unwrap()
}

fn attribute() -> impl Strategy<Value = (Option<String>, Option<String>)> {
    prop_oneof![
        (string(), string()).prop_map(|(name, value)| (Some(name), Some(value))),
        string().prop_map(|name| (Some(name), None)),
        string().prop_map(|value| (None, Some(value))),
    ]
}

fn leaf() -> impl Strategy<Value = Node> {
    (
        string(),
        prop::collection::vec(string(), 0..3),
        prop::option::of(string()),
        prop::collection::vec(attribute(), 0..4),
    )
        .prop_map(|(name, values, text, attributes)| Node {
            name,
            values,
            text,
            attributes,
            members: Vec::new(),
        })
}

fn node() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        (leaf(), prop::collection::vec(inner, 0..4)).prop_map(|(mut node, members)| {
            node.members = members;
            node
        })
    })
}

fn document() -> impl Strategy<Value = (Option<String>, Vec<String>, Vec<Node>)> {
    (
        prop::option::of(string()),
        prop::collection::vec(string(), 0..2),
        prop::collection::vec(node(), 0..4),
    )
}

fn options() -> impl Strategy<Value = FormatOptions> {
    let preset = prop_oneof![
        Just(FormatOptions::default()),
        Just(FormatOptions::condensed()),
        Just(FormatOptions::minimized()),
    ];
    (preset, prop::sample::select(TextType::ALL.to_vec()))
        .prop_map(|(options, text_type)| options.prefer(text_type))
}

proptest! {
    #[test]
    fn written_documents_parse_back((text, values, members) in document(), options in options()) {
        let document = Document {
            text,
            values,
            members: members.iter().map(Node::build).collect(),
            ..Document::default()
        };
        let written = to_string_with_options(&document, options);
        let reparsed = muml_parse::parse(&written);
        prop_assert!(reparsed.is_ok(), "{}\nwritten:\n{}", reparsed.errors, written);
        prop_assert_eq!(&reparsed, &document, "written:\n{}", written);
    }
}

#[test]
fn parsed_source_survives_every_text_type() {
    let source = r#"
        =version "notes for" 'the team'
        server=main "primary" [port=8080 tls ="anon" 'k k'=`v``v`] {
            route="/" |>"""
              folded
              text
            """ {
                GET [auth]
            }
            {"log level"}=debug
        }
    "#;
    let original = muml_parse::parse(source);
    assert!(original.is_ok(), "{}", original.errors);
    for text_type in TextType::ALL {
        for options in [
            FormatOptions::default(),
            FormatOptions::condensed(),
            FormatOptions::minimized(),
        ] {
            let written = to_string_with_options(&original, options.prefer(text_type));
            let reparsed = muml_parse::parse(&written);
            assert!(reparsed.is_ok(), "{text_type:?}: {}\n{written}", reparsed.errors);
            assert_eq!(reparsed, original, "{text_type:?}:\n{written}");
        }
    }
}
