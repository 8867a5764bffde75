//! The node model: the lightweight element handle produced by parsing and
//! consumed by edit reporting, and the intermediate [`NodeInfo`] parse
//! product the [`crate::node`] module materializes into [`crate::node::Node`]s.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bigram::Bigram;
use crate::schema::SchemaRegistry;

/// Reserved property name under which inline text content is stored, chosen
/// so it cannot collide with any XML attribute name.
pub const TEXT_PROPERTY: &str = "&text";

/// A handle back to one parsed XML element: local name, attributes, inline
/// text, and source line (`-1` if unknown). Opaque to the core beyond this;
/// carried on emitted edits for the surrounding collaborator to report.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub line: i64,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>, line: i64) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: None,
            line,
        }
    }
}

/// Intermediate parse product for one element: its structural signature,
/// raw properties (attributes plus `&text`), and the children that survived
/// the caller's filter predicate.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub signature: String,
    pub properties: BTreeMap<String, Bigram>,
    pub element: XmlElement,
    pub children: Vec<NodeInfo>,
}

impl NodeInfo {
    /// Build the signature for an element named `tag` under `parent_signature`
    /// (`None` at the root).
    pub fn signature_for(parent_signature: Option<&str>, tag: &str) -> String {
        match parent_signature {
            Some(parent) => format!("{parent}.{tag}"),
            None => tag.to_string(),
        }
    }

    /// Derive the raw property map (attributes + optional `&text`) from an
    /// element handle, and register the property names at `signature` in the
    /// shared registry.
    pub fn from_element(
        element: XmlElement,
        signature: String,
        children: Vec<NodeInfo>,
        registry: &mut SchemaRegistry,
    ) -> Self {
        let mut properties = BTreeMap::new();
        for (name, value) in &element.attributes {
            properties.insert(name.clone(), Bigram::new(value));
        }
        if let Some(text) = &element.text {
            properties.insert(TEXT_PROPERTY.to_string(), Bigram::new(text));
        }

        registry.add_property_names(&signature, properties.keys().cloned());

        Self {
            signature,
            properties,
            element,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_chains_local_names_with_dots() {
        assert_eq!(NodeInfo::signature_for(None, "root"), "root");
        assert_eq!(
            NodeInfo::signature_for(Some("root"), "movie"),
            "root.movie"
        );
    }

    #[test]
    fn text_property_uses_reserved_name() {
        let mut registry = SchemaRegistry::new();
        let mut element = XmlElement::new("title", 3);
        element.text = Some("A New Hope".to_string());
        let info = NodeInfo::from_element(
            element,
            "root.movie.title".to_string(),
            Vec::new(),
            &mut registry,
        );
        assert!(info.properties.contains_key(TEXT_PROPERTY));
    }
}
