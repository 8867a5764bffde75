//! Structural XML tree diffing: compares two documents by schema-aware
//! similarity rather than textual or positional equality.

pub mod bigram;
pub mod counter;
pub mod diff;
pub mod format;
pub mod node;
pub mod parser;
pub mod schema;
pub mod tree;

pub use diff::{diff, diff_with_options, DiffError, DiffOptions, NodeEdit};
pub use format::{format_json, format_summary, format_text};
pub use parser::{parse, ParseError};
pub use tree::XmlElement;
