//! Core XML tree diffing: schema-bucketed, similarity-scored node matching.

pub mod comparer;
pub mod engine;
pub mod result;

pub use engine::{diff, diff_with_options, DiffOptions};
pub use result::{DiffError, NodeEdit};
