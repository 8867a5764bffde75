use colored::Colorize;
use xml_diff_core::{format_summary, format_text, NodeEdit};

/// Render edits for terminal output, colorizing by line prefix.
pub fn render_text(edits: &[NodeEdit]) -> String {
    let raw = format_text(edits);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('~') || line.starts_with("  ->") {
            line.yellow().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render summary counts for terminal output.
pub fn render_summary(edits: &[NodeEdit]) -> String {
    format_summary(edits).cyan().to_string()
}
