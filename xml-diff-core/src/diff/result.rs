use serde::Serialize;
use thiserror::Error;

use crate::parser::ParseError;
use crate::tree::XmlElement;

/// One edit: which element(s) it carries is determined by the variant, so
/// "exactly one of actual/expected may be absent" is enforced by the type
/// itself rather than by convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum NodeEdit {
    /// Present in actual, absent from expected.
    Added { actual: XmlElement },
    /// Present in expected, absent from actual.
    Removed { expected: XmlElement },
    /// Present in both, but not within the node-score epsilon of identical.
    Modified { actual: XmlElement, expected: XmlElement },
}

impl NodeEdit {
    pub fn added(actual: XmlElement) -> Self {
        Self::Added { actual }
    }

    pub fn removed(expected: XmlElement) -> Self {
        Self::Removed { expected }
    }

    pub fn modified(actual: XmlElement, expected: XmlElement) -> Self {
        Self::Modified { actual, expected }
    }

    /// The actual-side element, if this edit carries one.
    pub fn actual(&self) -> Option<&XmlElement> {
        match self {
            Self::Added { actual } | Self::Modified { actual, .. } => Some(actual),
            Self::Removed { .. } => None,
        }
    }

    /// The expected-side element, if this edit carries one.
    pub fn expected(&self) -> Option<&XmlElement> {
        match self {
            Self::Removed { expected } | Self::Modified { expected, .. } => Some(expected),
            Self::Added { .. } => None,
        }
    }
}

/// Failure modes of the top-level diff call. Carries no partial edit list:
/// either the full sequence is returned or an error is surfaced, per §7.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to parse expected document: {0}")]
    Expected(#[source] ParseError),
    #[error("failed to parse actual document: {0}")]
    Actual(#[source] ParseError),
}
