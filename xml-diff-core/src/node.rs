//! Materialized [`Node`] trees: dense arrays of [`NodeData`] indexed by
//! position, built from a [`NodeInfo`] tree with a shared [`SchemaRegistry`].
//!
//! The parent link is deliberately non-owning: rather than `Rc<RefCell<_>>`,
//! each document's nodes live in one flat `Vec` and parent/child links are
//! plain indices into it, per the design note that an index-based parent
//! reference is the natural fit for languages without ownership inference —
//! Rust included, since the arena already owns every node exactly once.

use std::cell::Cell;
use std::collections::HashMap;

use crate::bigram::Bigram;
use crate::counter::Counter;
use crate::schema::SchemaRegistry;
use crate::tree::{NodeInfo, XmlElement};

/// One materialized node. `matched` is the only mutable state after
/// construction and never reverts to `false` within a single diff call.
#[derive(Debug)]
pub struct NodeData {
    pub index: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub schema_id: i64,
    pub properties: Vec<Bigram>,
    pub element: XmlElement,
    matched: Cell<bool>,
}

impl NodeData {
    /// True when this node carries no properties, or every property it
    /// does carry is the empty bigram.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() || self.properties.iter().all(Bigram::is_empty)
    }

    pub fn is_matched(&self) -> bool {
        self.matched.get()
    }
}

/// One document's materialized tree: a dense node arena plus a schema-id ->
/// node-indices grouping.
#[derive(Debug)]
pub struct NodeTree {
    pub nodes: Vec<NodeData>,
    groups: HashMap<i64, Vec<usize>>,
}

impl NodeTree {
    /// Materialize `info` (and its already-filtered descendants) into a
    /// dense arena, assigning indices via a fresh per-document [`Counter`].
    /// `registry` must already hold the full union of property names for
    /// every signature appearing in *either* document being compared.
    pub fn build(info: &NodeInfo, registry: &SchemaRegistry) -> Self {
        let mut nodes = Vec::new();
        let mut counter = Counter::new();
        Self::build_node(info, None, registry, &mut counter, &mut nodes);

        let mut groups: HashMap<i64, Vec<usize>> = HashMap::new();
        for node in &nodes {
            groups.entry(node.schema_id).or_default().push(node.index);
        }

        Self { nodes, groups }
    }

    fn build_node(
        info: &NodeInfo,
        parent: Option<usize>,
        registry: &SchemaRegistry,
        counter: &mut Counter,
        nodes: &mut Vec<NodeData>,
    ) -> usize {
        let index = counter.next();
        let (schema_id, properties) = registry.format(&info.signature, &info.properties);
        if schema_id < 0 {
            unreachable!(
                "internal invariant violation: schema requested for unregistered signature {:?}",
                info.signature
            );
        }

        debug_assert_eq!(index, nodes.len());
        nodes.push(NodeData {
            index,
            parent,
            children: Vec::new(),
            schema_id,
            properties,
            element: info.element.clone(),
            matched: Cell::new(false),
        });

        let child_indices: Vec<usize> = info
            .children
            .iter()
            .map(|child| Self::build_node(child, Some(index), registry, counter, nodes))
            .collect();
        nodes[index].children = child_indices;

        index
    }

    /// Node indices sharing `schema_id`, in the order they were visited
    /// while building the arena.
    pub fn bucket(&self, schema_id: i64) -> Option<&[usize]> {
        self.groups.get(&schema_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Similarity of node `a` in `self` against node `b` in `other`: `0.0` if
    /// schemas differ, `1.0` if both have no properties at all, else the
    /// mean per-column bigram similarity (valid because matching schema ids
    /// guarantee equal-length, column-aligned property vectors).
    pub fn compare(&self, a: usize, other: &NodeTree, b: usize) -> f64 {
        let left = &self.nodes[a];
        let right = &other.nodes[b];
        if left.schema_id != right.schema_id {
            return 0.0;
        }
        if left.properties.is_empty() && right.properties.is_empty() {
            return 1.0;
        }
        let total: f64 = left
            .properties
            .iter()
            .zip(right.properties.iter())
            .map(|(a, b)| a.compare(b))
            .sum();
        total / left.properties.len() as f64
    }

    /// Attempt an exclusive match between node `a` in `self` and node `b` in
    /// `other`. Succeeds only if neither is yet matched, atomically within
    /// this single-threaded model.
    pub fn try_match(&self, a: usize, other: &NodeTree, b: usize) -> bool {
        let left = &self.nodes[a];
        let right = &other.nodes[b];
        if left.is_matched() || right.is_matched() {
            return false;
        }
        left.matched.set(true);
        right.matched.set(true);
        true
    }
}
