//! Memoized node/children/siblings similarity, and the bipartite-matching
//! heuristic `children_score` relies on.

use std::cell::RefCell;

use crate::node::NodeTree;

/// Direct node-similarity threshold used both as a candidate-pair predicate
/// input and as the edge threshold in [`NodeComparer::count_matches`].
pub const T1: f64 = 0.6;
/// Relative (children/siblings) similarity threshold for candidate pairs.
pub const T2: f64 = 0.8;

/// Scores pairs of nodes drawn from one expected tree and one actual tree.
/// Caches are sized by the *total* node count on each side (not bucket
/// size), since `siblings_score` looks up parents that can live outside the
/// bucket currently being compared.
pub struct NodeComparer<'a> {
    expected: &'a NodeTree,
    actual: &'a NodeTree,
    total_a: usize,
    node_scores: RefCell<Vec<Option<f64>>>,
    children_scores: RefCell<Vec<Option<f64>>>,
}

impl<'a> NodeComparer<'a> {
    pub fn new(expected: &'a NodeTree, actual: &'a NodeTree) -> Self {
        let total_e = expected.len();
        let total_a = actual.len();
        Self {
            expected,
            actual,
            total_a,
            node_scores: RefCell::new(vec![None; total_e * total_a]),
            children_scores: RefCell::new(vec![None; total_e * total_a]),
        }
    }

    fn key(&self, e: usize, a: usize) -> usize {
        e * self.total_a + a
    }

    /// `e.compare_to(a)`, memoized.
    pub fn node_score(&self, e: usize, a: usize) -> f64 {
        let key = self.key(e, a);
        if let Some(v) = self.node_scores.borrow()[key] {
            return v;
        }
        let v = self.expected.compare(e, self.actual, a);
        self.node_scores.borrow_mut()[key] = v.into();
        v
    }

    /// Children-set similarity of `e` and `a`, memoized.
    pub fn children_score(&self, e: usize, a: usize) -> f64 {
        let key = self.key(e, a);
        if let Some(v) = self.children_scores.borrow()[key] {
            return v;
        }

        let e_children = &self.expected.nodes[e].children;
        let a_children = &self.actual.nodes[a].children;

        let v = match (e_children.is_empty(), a_children.is_empty()) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.0,
            (false, false) => {
                let matches = self.count_matches(e_children, a_children);
                matches as f64 / e_children.len().max(a_children.len()) as f64
            }
        };

        self.children_scores.borrow_mut()[key] = v.into();
        v
    }

    /// Similarity of `e`'s siblings (viewed via its parent's children) to
    /// `a`'s. Both-root is a perfect match; one-root-one-not is zero;
    /// otherwise it reuses the parents' children score.
    pub fn siblings_score(&self, e: usize, a: usize) -> f64 {
        match (self.expected.nodes[e].parent, self.actual.nodes[a].parent) {
            (None, None) => 1.0,
            (Some(_), None) | (None, Some(_)) => 0.0,
            (Some(ep), Some(ap)) => self.children_score(ep, ap),
        }
    }

    /// Approximate maximum matching over the threshold graph "node_score >
    /// T1" between `e_children` and `a_children`, via an augmenting-path
    /// sweep that retains each row's candidate stack across the run instead
    /// of recomputing it when a row is displaced.
    ///
    /// Not a proven maximum matching — a heuristic tuned to approximate a
    /// similarity fraction cheaply. See the design notes for why this
    /// trade-off is acceptable here.
    fn count_matches(&self, e_children: &[usize], a_children: &[usize]) -> usize {
        let mut assigned: Vec<Option<usize>> = vec![None; a_children.len()];
        let mut candidate_stacks: Vec<Vec<usize>> = Vec::with_capacity(e_children.len());
        let mut count = 0usize;

        for x in 0..e_children.len() {
            // Candidates for row x, computed once and retained so a later
            // displacement resumes the same (already-consumed) stack.
            let stack: Vec<usize> = (0..a_children.len())
                .rev()
                .filter(|&y| self.node_score(e_children[x], a_children[y]) > T1)
                .collect();
            candidate_stacks.push(stack);

            let mut current_x = x;
            loop {
                let y = match candidate_stacks[current_x].pop() {
                    Some(y) => y,
                    None => break,
                };
                match assigned[y] {
                    None => {
                        assigned[y] = Some(current_x);
                        count += 1;
                        break;
                    }
                    Some(prev) => {
                        if candidate_stacks[prev].is_empty() {
                            break;
                        }
                        assigned[y] = Some(current_x);
                        current_x = prev;
                    }
                }
            }
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeTree;
    use crate::parser::parse;
    use crate::schema::SchemaRegistry;
    use crate::tree::XmlElement;

    fn always_true(_: &XmlElement) -> bool {
        true
    }

    fn build_pair(expected_xml: &[u8], actual_xml: &[u8]) -> (NodeTree, NodeTree) {
        let mut registry = SchemaRegistry::new();
        let expected_info = parse(expected_xml, &always_true, &mut registry).unwrap();
        let actual_info = parse(actual_xml, &always_true, &mut registry).unwrap();
        let expected = NodeTree::build(&expected_info, &registry);
        let actual = NodeTree::build(&actual_info, &registry);
        (expected, actual)
    }

    #[test]
    fn identical_trees_score_one_everywhere() {
        let xml = br#"<root><a x="1">text</a></root>"#;
        let (expected, actual) = build_pair(xml, xml);
        let comparer = NodeComparer::new(&expected, &actual);
        assert_eq!(comparer.node_score(0, 0), 1.0);
        assert_eq!(comparer.children_score(0, 0), 1.0);
        assert_eq!(comparer.siblings_score(1, 1), 1.0);
    }

    #[test]
    fn reordered_children_score_perfectly() {
        let expected_xml = br#"<root><a>1</a><b>2</b><c>3</c></root>"#;
        let actual_xml = br#"<root><c>3</c><a>1</a><b>2</b></root>"#;
        let (expected, actual) = build_pair(expected_xml, actual_xml);
        let comparer = NodeComparer::new(&expected, &actual);
        assert_eq!(comparer.children_score(0, 0), 1.0);
    }

    #[test]
    fn disjoint_children_score_zero() {
        let expected_xml = br#"<root><a>1</a></root>"#;
        let actual_xml = br#"<root><b>2</b></root>"#;
        let (expected, actual) = build_pair(expected_xml, actual_xml);
        let comparer = NodeComparer::new(&expected, &actual);
        assert_eq!(comparer.children_score(0, 0), 0.0);
    }

    #[test]
    fn siblings_score_both_root_is_one() {
        let xml = br#"<root/>"#;
        let (expected, actual) = build_pair(xml, xml);
        let comparer = NodeComparer::new(&expected, &actual);
        assert_eq!(comparer.siblings_score(0, 0), 1.0);
    }
}
