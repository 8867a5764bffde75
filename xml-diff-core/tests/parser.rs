use std::path::PathBuf;

use xml_diff_core::schema::SchemaRegistry;
use xml_diff_core::{parse, XmlElement};

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(name);
    std::fs::read(path).expect("fixture should be readable")
}

fn always_true(_: &XmlElement) -> bool {
    true
}

#[test]
fn parses_attributes_and_nested_elements() {
    let mut registry = SchemaRegistry::new();
    let xml = fixture("simple_expected.xml");
    let info = parse(&xml, &always_true, &mut registry).expect("parse should succeed");

    assert_eq!(info.element.tag, "config");
    assert_eq!(info.element.attributes.get("version"), Some(&"1.0".to_string()));
    assert_eq!(info.children.len(), 2);

    let items = &info.children[1];
    assert_eq!(items.element.tag, "items");
    assert_eq!(items.children.len(), 3);
    assert_eq!(
        items.children[0].element.attributes.get("id"),
        Some(&"1".to_string())
    );
}

#[test]
fn parses_star_wars_fixtures() {
    let mut registry = SchemaRegistry::new();

    let expected = fixture("star_wars_expected.xml");
    let info = parse(&expected, &always_true, &mut registry).expect("expected fixture parse");
    assert_eq!(info.element.tag, "star_wars");
    assert_eq!(info.children.len(), 3);

    let actual = fixture("star_wars_actual.xml");
    let info = parse(&actual, &always_true, &mut registry).expect("actual fixture parse");
    assert_eq!(info.children.len(), 3);
}
