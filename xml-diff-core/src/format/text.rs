use crate::diff::NodeEdit;
use crate::tree::XmlElement;

fn render(element: &XmlElement) -> String {
    let attrs: String = element
        .attributes
        .iter()
        .map(|(k, v)| format!(" {k}=\"{v}\""))
        .collect();
    match &element.text {
        Some(text) => format!("<{}{attrs}>{text}</{}> (line {})", element.tag, element.tag, element.line),
        None => format!("<{}{attrs}/> (line {})", element.tag, element.line),
    }
}

/// Format edits as plain text, one or more lines per edit.
pub fn format_text(edits: &[NodeEdit]) -> String {
    let mut lines = Vec::with_capacity(edits.len());
    for edit in edits {
        match edit {
            NodeEdit::Added { actual } => {
                lines.push(format!("+ {}", render(actual)));
            }
            NodeEdit::Removed { expected } => {
                lines.push(format!("- {}", render(expected)));
            }
            NodeEdit::Modified { actual, expected } => {
                lines.push(format!("~ {}", render(expected)));
                lines.push(format!("  -> {}", render(actual)));
            }
        }
    }
    lines.join("\n")
}

/// Format a simple summary of edit counts.
pub fn format_summary(edits: &[NodeEdit]) -> String {
    let mut added = 0;
    let mut modified = 0;
    let mut removed = 0;

    for edit in edits {
        match edit {
            NodeEdit::Added { .. } => added += 1,
            NodeEdit::Modified { .. } => modified += 1,
            NodeEdit::Removed { .. } => removed += 1,
        }
    }

    format!("added={added} modified={modified} removed={removed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_op() {
        let edits = vec![
            NodeEdit::added(XmlElement::new("a", 1)),
            NodeEdit::removed(XmlElement::new("b", 2)),
            NodeEdit::modified(XmlElement::new("c", 3), XmlElement::new("c", 3)),
        ];
        assert_eq!(format_summary(&edits), "added=1 modified=1 removed=1");
    }

    #[test]
    fn text_marks_modified_with_both_sides() {
        let mut expected = XmlElement::new("title", 1);
        expected.text = Some("old".to_string());
        let mut actual = XmlElement::new("title", 1);
        actual.text = Some("new".to_string());
        let edits = vec![NodeEdit::modified(actual, expected)];
        let text = format_text(&edits);
        assert!(text.contains("~ "));
        assert!(text.contains("old"));
        assert!(text.contains("new"));
    }
}
