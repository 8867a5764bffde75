use std::path::PathBuf;

use xml_diff_core::{diff, format_json, format_summary, format_text, NodeEdit};

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(name);
    std::fs::read(path).expect("fixture should be readable")
}

#[test]
fn diff_detects_modifications_additions_and_removals() {
    let expected = fixture("simple_expected.xml");
    let actual = fixture("simple_actual.xml");

    let edits = diff(&expected, &actual).expect("diff should succeed");

    assert!(edits.iter().any(|e| matches!(e, NodeEdit::Modified { .. })));
    assert!(edits.iter().any(|e| matches!(e, NodeEdit::Added { .. })));
    assert!(edits.iter().any(|e| matches!(e, NodeEdit::Removed { .. })));

    // item id="2" moved and id="1" moved: pure reordering, no edits for those.
    let label_removed = edits.iter().any(|e| {
        matches!(e, NodeEdit::Removed { expected }
            if expected.tag == "label" && expected.text.as_deref() == Some("gamma"))
    });
    assert!(label_removed);

    let text = format_text(&edits);
    let json = format_json(&edits);
    let summary = format_summary(&edits);

    assert!(!text.is_empty());
    assert!(json.contains("\"op\""));
    assert!(summary.contains("modified="));
}

#[test]
fn reordered_items_produce_no_spurious_edits_for_unchanged_ones() {
    let expected = fixture("simple_expected.xml");
    let actual = fixture("simple_actual.xml");
    let edits = diff(&expected, &actual).expect("diff should succeed");

    let alpha_touched = edits.iter().any(|e| {
        [e.expected(), e.actual()]
            .into_iter()
            .flatten()
            .any(|el| el.text.as_deref() == Some("alpha"))
    });
    assert!(!alpha_touched);
}
