use super::*;
use facet_testhelpers::test;

fn sample() -> Document {
    let mut doc = Document::new();
    doc.push_value("top");
    doc.append_text(Some("hello"));
    doc.append_text(Some("world"));
    doc.push_member(
        Element::new("server")
            .value("main")
            .attribute(Attribute::new("port", "8080"))
            .member(Element::new("route").text("/"))
            .member(Element::new("route").text("/api")),
    );
    doc.push_member(Element::new("client"));
    doc
}

#[test]
fn test_document_queries() {
    let doc = sample();
    assert!(doc.is_ok());
    assert_eq!(doc.text.as_deref(), Some("hello world"));
    assert_eq!(doc.first_value(), Some("top"));
    assert_eq!(doc.last_member().map(|m| m.name.as_str()), Some("client"));
    let server = doc.find_member("server").expect("server element");
    assert_eq!(server.attributes.get("port"), Some("8080"));
    assert_eq!(server.members_named("route").count(), 2);
    assert_eq!(doc.members_named("missing").count(), 0);
}

#[test]
fn test_document_depth_and_walks() {
    let doc = sample();
    assert_eq!(doc.depth(), 2);
    assert_eq!(Document::new().depth(), 0);
    let post: Vec<_> = doc.iter_depth_first().map(|e| e.name.as_str()).collect();
    assert_eq!(post, vec!["route", "route", "server", "client"]);
    let level: Vec<_> = doc.iter_breadth_first().map(|e| e.name.as_str()).collect();
    assert_eq!(level, vec!["server", "client", "route", "route"]);
}

#[test]
fn test_document_equality_ignores_errors() {
    let mut a = sample();
    let b = sample();
    a.errors
        .add(SourceErrorKind::UnexpectedEquals, SourceLocation::START);
    a.file_name = Some("a.muml".to_string());
    assert!(!a.is_ok());
    assert_eq!(a, b);

    let mut c = sample();
    c.members[0].members[1].text = Some("/other".to_string());
    assert_ne!(b, c);
}
