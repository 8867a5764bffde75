//! Drives parsing, schema-bucketed grouping, pairwise similarity scoring
//! with memoization, greedy exclusive matching, and edit emission.

use crate::diff::comparer::{NodeComparer, T1, T2};
use crate::diff::result::{DiffError, NodeEdit};
use crate::node::NodeTree;
use crate::parser::parse;
use crate::schema::SchemaRegistry;
use crate::tree::XmlElement;

/// Modified edits within this tolerance of a perfect node score are treated
/// as identical and do not appear in the output — this normalizes away
/// float noise from summing per-column bigram comparisons, not real
/// differences, since schema flattening already aligns property order.
const MODIFIED_EPSILON: f64 = 1e-5;

fn default_predicate(_: &XmlElement) -> bool {
    true
}

/// Configuration recognized by the surrounding collaborator, not the core
/// algorithm itself (§6): which child elements participate, and whether
/// Added/Removed edits on empty nodes are suppressed.
pub struct DiffOptions<'p> {
    pub exclude_empty_nodes: bool,
    pub predicate: &'p dyn Fn(&XmlElement) -> bool,
}

impl Default for DiffOptions<'static> {
    fn default() -> Self {
        Self {
            exclude_empty_nodes: false,
            predicate: &default_predicate,
        }
    }
}

/// Diff two XML documents with default options (always-true predicate, no
/// empty-node suppression).
pub fn diff(expected_xml: &[u8], actual_xml: &[u8]) -> Result<Vec<NodeEdit>, DiffError> {
    diff_with_options(expected_xml, actual_xml, &DiffOptions::default())
}

/// Diff two XML documents under `options`.
///
/// Parses both documents sharing one [`SchemaRegistry`] (so matching
/// structural signatures get identical schema ids on both sides) and two
/// independent per-document node-index counters, then walks every schema
/// id that appears in either side's grouping, in ascending id order — which
/// is also the order schema ids were first observed across the two parses.
pub fn diff_with_options(
    expected_xml: &[u8],
    actual_xml: &[u8],
    options: &DiffOptions<'_>,
) -> Result<Vec<NodeEdit>, DiffError> {
    let mut registry = SchemaRegistry::new();

    let expected_info =
        parse(expected_xml, options.predicate, &mut registry).map_err(DiffError::Expected)?;
    let actual_info =
        parse(actual_xml, options.predicate, &mut registry).map_err(DiffError::Actual)?;

    // Both documents are fully registered in `registry` before either tree
    // is materialized, so every `format` call below sees the complete
    // column set for its signature.
    let expected = NodeTree::build(&expected_info, &registry);
    let actual = NodeTree::build(&actual_info, &registry);

    let comparer = NodeComparer::new(&expected, &actual);
    let mut edits = Vec::new();

    for schema_id in 0..registry.schema_count() as i64 {
        let expected_bucket = expected.bucket(schema_id);
        let actual_bucket = actual.bucket(schema_id);

        match (expected_bucket, actual_bucket) {
            (Some(e_nodes), Some(a_nodes)) => {
                diff_bucket(
                    e_nodes,
                    a_nodes,
                    &expected,
                    &actual,
                    &comparer,
                    options.exclude_empty_nodes,
                    &mut edits,
                );
            }
            (Some(e_nodes), None) => {
                for &e in e_nodes {
                    emit_removed(&expected, e, options.exclude_empty_nodes, &mut edits);
                }
            }
            (None, Some(a_nodes)) => {
                for &a in a_nodes {
                    emit_added(&actual, a, options.exclude_empty_nodes, &mut edits);
                }
            }
            (None, None) => {}
        }
    }

    Ok(edits)
}

struct NodePair {
    e: usize,
    a: usize,
    node_score: f64,
    average_score: f64,
}

fn diff_bucket(
    e_nodes: &[usize],
    a_nodes: &[usize],
    expected: &NodeTree,
    actual: &NodeTree,
    comparer: &NodeComparer<'_>,
    exclude_empty: bool,
    edits: &mut Vec<NodeEdit>,
) {
    let mut pairs = Vec::new();
    for &e in e_nodes {
        for &a in a_nodes {
            let node_score = comparer.node_score(e, a);
            let children_score = comparer.children_score(e, a);
            let siblings_score = comparer.siblings_score(e, a);

            let candidate = (node_score > T1 && children_score > T1)
                || children_score > T2
                || siblings_score > T2;
            if !candidate {
                continue;
            }

            let average_score = (node_score + children_score + siblings_score) / 3.0;
            pairs.push(NodePair {
                e,
                a,
                node_score,
                average_score,
            });
        }
    }

    pairs.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let target = e_nodes.len().min(a_nodes.len());
    let mut matched_count = 0usize;

    for pair in &pairs {
        if matched_count >= target {
            break;
        }
        if !expected.try_match(pair.e, actual, pair.a) {
            continue;
        }
        matched_count += 1;
        if (pair.node_score - 1.0).abs() > MODIFIED_EPSILON {
            edits.push(NodeEdit::modified(
                actual.nodes[pair.a].element.clone(),
                expected.nodes[pair.e].element.clone(),
            ));
        }
    }

    for &e in e_nodes {
        if !expected.nodes[e].is_matched() {
            emit_removed(expected, e, exclude_empty, edits);
        }
    }
    for &a in a_nodes {
        if !actual.nodes[a].is_matched() {
            emit_added(actual, a, exclude_empty, edits);
        }
    }
}

fn emit_removed(expected: &NodeTree, e: usize, exclude_empty: bool, edits: &mut Vec<NodeEdit>) {
    let node = &expected.nodes[e];
    if exclude_empty && node.is_empty() {
        return;
    }
    edits.push(NodeEdit::removed(node.element.clone()));
}

fn emit_added(actual: &NodeTree, a: usize, exclude_empty: bool, edits: &mut Vec<NodeEdit>) {
    let node = &actual.nodes[a];
    if exclude_empty && node.is_empty() {
        return;
    }
    edits.push(NodeEdit::added(node.element.clone()));
}
