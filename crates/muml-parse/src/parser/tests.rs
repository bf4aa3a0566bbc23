use super::*;
use facet_testhelpers::test;

fn parse(source: &str) -> Document {
    Parser::new(source).parse()
}

fn assert_errors(source: &str, expected: &[&str]) {
    let doc = parse(source);
    assert_eq!(doc.errors.to_strings(), expected, "source: {source:?}");
}

fn names(members: &[Element]) -> Vec<&str> {
    members.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn test_empty_document() {
    let doc = parse("");
    assert!(doc.is_ok());
    assert!(doc.members.is_empty());
    assert_eq!(doc.text, None);
}

#[test]
fn test_element_parts() {
    let doc = parse(r#"a=1=2 "text" [k=v =anon flag] { b c { d } }"#);
    assert!(doc.is_ok(), "{}", doc.errors);
    let a = &doc.members[0];
    assert_eq!(a.name, "a");
    assert_eq!(a.values, ["1", "2"]);
    assert_eq!(a.text.as_deref(), Some("text"));
    assert_eq!(
        a.attributes.as_slice(),
        [
            Attribute::new("k", "v"),
            Attribute::nameless("anon"),
            Attribute::named("flag"),
        ]
    );
    assert_eq!(names(&a.members), ["b", "c"]);
    assert_eq!(names(&a.members[1].members), ["d"]);
}

#[test]
fn test_attribute_value_binds_to_preceding_name() {
    let doc = parse("a [flag =on]");
    assert_eq!(doc.members[0].attributes.as_slice(), [Attribute::new("flag", "on")]);
}

#[test]
fn test_duplicate_attributes_keep_order() {
    let doc = parse("tag [a=1 b=2 a=3 b=4]");
    let attrs = &doc.members[0].attributes;
    assert_eq!(attrs.len(), 4);
    assert_eq!(attrs.index_of("a"), Some(0));
    assert_eq!(attrs.last_index_of("a"), Some(2));
    assert_eq!(attrs.get_all("a").collect::<Vec<_>>(), [Some("1"), Some("3")]);
    assert_eq!(attrs.get_all("b").collect::<Vec<_>>(), [Some("2"), Some("4")]);
}

#[test]
fn test_siblings_and_spans() {
    let doc = parse("abc\n  de");
    assert_eq!(names(&doc.members), ["abc", "de"]);
    assert_eq!(doc.members[0].span.map(|s| s.to_string()).as_deref(), Some("L1:1..4"));
    assert_eq!(doc.members[1].span.map(|s| s.to_string()).as_deref(), Some("L2:3..5"));
}

#[test]
fn test_document_values_and_text() {
    let doc = parse(r#"=top "hello" "world" a "inner" =v"#);
    assert!(doc.is_ok());
    assert_eq!(doc.values, ["top"]);
    assert_eq!(doc.text.as_deref(), Some("hello world"));
    assert_eq!(doc.members[0].text.as_deref(), Some("inner"));
    assert_eq!(doc.members[0].values, ["v"]);
}

#[test]
fn test_empty_literal_keeps_line_break() {
    let doc = parse(r#"a "x" "" "y""#);
    assert_eq!(doc.members[0].text.as_deref(), Some("x\ny"));
}

#[test]
fn test_string_value_may_be_quoted() {
    let doc = parse(r#"path="/usr/bin" name='x y'"#);
    assert_eq!(doc.members[0].values, ["/usr/bin"]);
    assert_eq!(doc.members[1].values, ["x y"]);
}

#[test]
fn test_braced_identifier() {
    let doc = parse(r#"{"eq="} =1"#);
    assert!(doc.is_ok());
    assert_eq!(doc.members.len(), 1);
    assert_eq!(doc.members[0].name, "eq=");
    assert_eq!(doc.members[0].values, ["1"]);
}

#[test]
fn test_string_opening_members_is_rejected() {
    let doc = parse(r#"tag { "x" y }"#);
    assert_eq!(doc.errors.to_strings(), ["UnexpectedStringLiteral L1:7"]);
    let tag = &doc.members[0];
    assert_eq!(names(&tag.members), ["y"]);
    assert_eq!(tag.text, None);
}

#[test]
fn test_empty_members_block() {
    let doc = parse("a {} b { }");
    assert!(doc.is_ok());
    assert_eq!(names(&doc.members), ["a", "b"]);
    assert!(doc.members[0].members.is_empty());
}

#[test]
fn test_comments_are_skipped() {
    let doc = parse("a # one\n#[ two #[ three #] #] b ### four ### c");
    assert!(doc.is_ok());
    assert_eq!(names(&doc.members), ["a", "b", "c"]);
}

#[test]
fn test_repeated_errors_are_coalesced() {
    assert_errors("a ]]]]", &["UnexpectedCloseBracket L1:3"]);
    assert_errors(
        "a ] b ]",
        &["UnexpectedCloseBracket L1:3", "UnexpectedCloseBracket L1:7"],
    );
    let doc = parse("a = = = 1");
    assert_eq!(doc.errors.to_strings(), ["UnexpectedEquals L1:5"]);
    assert_eq!(doc.members[0].values, ["1"]);
}

#[test]
fn test_comment_does_not_break_coalescing() {
    assert_errors("a ] # note\n ]", &["UnexpectedCloseBracket L1:3"]);
}

#[test]
fn test_dangling_equals() {
    assert_errors("a= [k]", &["ExpectedValueAfterEquals L1:2"]);
    assert_errors("a= { b }", &["ExpectedValueAfterEquals L1:2"]);
    assert_errors("a { b= }", &["ExpectedValueAfterEquals L1:6"]);
    assert_errors("a=", &["ExpectedValueAfterEquals L1:2"]);
    let doc = parse("a= [k]");
    assert!(doc.members[0].values.is_empty());
}

#[test]
fn test_close_bracket_after_equals() {
    assert_errors("a [=]", &["UnexpectedCloseBracket L1:5"]);
    assert_errors("a [ = ] b", &["UnexpectedCloseBracket L1:7"]);
    let doc = parse("a [k=]");
    assert!(doc.is_ok());
    assert_eq!(doc.members[0].attributes.as_slice(), [Attribute::named("k")]);
}

#[test]
fn test_structure_without_element() {
    let doc = parse("[a]");
    assert_eq!(
        doc.errors.to_strings(),
        ["UnexpectedOpenBracket L1:1", "UnexpectedCloseBracket L1:3"]
    );
    assert_eq!(names(&doc.members), ["a"]);

    let doc = parse("{ a }");
    assert_eq!(doc.errors.to_strings(), ["UnexpectedOpenBrace L1:1"]);
    assert_eq!(names(&doc.members), ["a"]);

    assert_errors("}", &["UnexpectedCloseBrace L1:1"]);
    assert_errors("a { = b }", &["UnexpectedEquals L1:5"]);
    assert_errors("a [ { ] ", &["UnexpectedOpenBrace L1:5"]);
}

#[test]
fn test_unterminated_blocks() {
    assert_errors("a [k=v", &["UnterminatedAttributes L1:3"]);
    assert_errors("a { b {\n c", &["UnterminatedMembers L1:3", "UnterminatedMembers L1:7"]);
    let doc = parse("a { b { c");
    assert_eq!(doc.depth(), 3);
}

#[test]
fn test_errors_are_sorted_by_position() {
    assert_errors(
        "a= [k &",
        &[
            "ExpectedValueAfterEquals L1:2",
            "UnterminatedAttributes L1:4",
            "UnexpectedCharacter L1:7",
        ],
    );
}

#[test]
fn test_malformed_braced_identifier() {
    let doc = parse("{|;}");
    assert_eq!(doc.errors.len(), 2);
    assert!(
        doc.errors
            .iter()
            .any(|e| e.kind == SourceErrorKind::MalformedBracesIdentifier)
    );
    assert_eq!(names(&doc.members), [""]);
}

#[test]
fn test_error_list_display() {
    let doc = Parser::new("x {{ y").with_file_name("deep.muml").parse();
    insta::assert_snapshot!(doc.errors.to_string(), @r"
    UnterminatedMembers L1:3 in deep.muml
    UnexpectedOpenBrace L1:4 in deep.muml
    ");
}

#[test]
fn test_step_by_step() {
    let mut parser = Parser::new("a ] b");
    assert!(parser.parse_next_token());
    assert!(parser.is_ok());
    assert!(parser.parse_next_token());
    assert_eq!(parser.errors().len(), 1);
    assert!(parser.parse_next_token());
    assert!(!parser.parse_next_token());
    assert!(!parser.parse_next_token());
    let doc = parser.into_document();
    assert_eq!(names(&doc.members), ["a", "b"]);
    assert_eq!(doc.errors.len(), 1);
}

#[test]
fn test_deep_nesting_closed() {
    let n = 10_000;
    let source = format!("{}{}", "x{".repeat(n), "}".repeat(n));
    let doc = parse(&source);
    assert!(doc.is_ok());
    assert_eq!(doc.depth(), n);
}

#[test]
fn test_deep_nesting_unclosed() {
    let n = 10_000;
    let doc = parse(&"x{".repeat(n));
    assert_eq!(doc.errors.len(), n);
    assert!(
        doc.errors
            .iter()
            .all(|e| e.kind == SourceErrorKind::UnterminatedMembers)
    );
    assert_eq!(doc.depth(), n);
}

#[test]
fn test_run_of_open_braces() {
    let doc = parse(&format!("x{}", "{".repeat(10_000)));
    assert_eq!(
        doc.errors.to_strings(),
        ["UnterminatedMembers L1:2", "UnexpectedOpenBrace L1:3"]
    );
}

#[test]
fn test_each_open_brace_is_reported() {
    assert_errors(
        "a { b { c {",
        &[
            "UnterminatedMembers L1:3",
            "UnterminatedMembers L1:7",
            "UnterminatedMembers L1:11",
        ],
    );
    assert_errors("a{b{", &["UnterminatedMembers L1:2", "UnterminatedMembers L1:4"]);
}

#[test]
fn test_deep_block_comments() {
    let doc = parse(&"#[".repeat(10_000));
    assert_eq!(
        doc.errors.to_strings(),
        ["UnterminatedNestedBlockComment L1:1"]
    );
    assert!(doc.members.is_empty());
}
