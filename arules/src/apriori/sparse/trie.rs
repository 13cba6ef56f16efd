use std::collections::BTreeMap;

use crate::itemsets::FrequentItemsets;
use crate::rules::Item;

pub type NodeId = usize;

/// The root is always the first node of the arena.
pub const ROOT: NodeId = 0;

/// A trie node stands for the itemset spelled by the path from the root.
#[derive(Debug, Clone)]
pub struct TrieNode {
    /// The last item of the path; `None` for the root.
    pub item: Option<usize>,
    pub support: f64,
    pub parent: Option<NodeId>,
    pub children: BTreeMap<usize, NodeId>,
    /// Rows containing the itemset, filled only when rows are stored.
    pub rows: Vec<usize>,
}

impl TrieNode {
    fn new(item: Option<usize>, parent: Option<NodeId>) -> Self {
        Self {
            item,
            support: 0.0,
            parent,
            children: BTreeMap::new(),
            rows: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Frequent itemsets of sparse data as a prefix tree over sorted item ids.
///
/// Nodes live in an arena. Pruned nodes are detached from their parent and
/// become unreachable; they are freed together with the trie.
#[derive(Debug, Clone)]
pub struct ItemsetTrie {
    pub(crate) nodes: Vec<TrieNode>,
    pub(crate) n_examples: f64,
    pub(crate) min_support: f64,
}

impl ItemsetTrie {
    pub(crate) fn new(n_examples: f64, min_support: f64) -> Self {
        Self {
            nodes: vec![TrieNode::new(None, None)],
            n_examples,
            min_support,
        }
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, item: usize) -> NodeId {
        if let Some(&id) = self.nodes[parent].children.get(&item) {
            return id;
        }
        self.nodes.push(TrieNode::new(Some(item), Some(parent)));
        let id = self.nodes.len() - 1;
        self.nodes[parent].children.insert(item, id);
        id
    }

    pub fn root(&self) -> &TrieNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    pub fn child(&self, id: NodeId, item: usize) -> Option<NodeId> {
        self.nodes[id].children.get(&item).copied()
    }

    /// Children of a node by ascending item id.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.nodes[id].children.iter().map(|(&item, &child)| (item, child))
    }

    /// Total weight of the rows the trie was built from.
    pub fn n_examples(&self) -> f64 {
        self.n_examples
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Follows `items`, which must be sorted, from the root.
    pub fn find_path(&self, items: &[usize]) -> Option<NodeId> {
        items
            .iter()
            .try_fold(ROOT, |node, &item| self.child(node, item))
    }

    pub fn support_of(&self, items: &[usize]) -> Option<f64> {
        self.find_path(items).map(|id| self.nodes[id].support)
    }

    fn reachable(&self) -> Vec<(NodeId, usize)> {
        let mut found = Vec::new();
        let mut stack = vec![(ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            found.push((id, depth));
            stack.extend(self.nodes[id].children.values().map(|&c| (c, depth + 1)));
        }
        found
    }

    /// Number of itemsets in the trie.
    pub fn len(&self) -> usize {
        self.reachable().len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root().is_leaf()
    }

    /// Size of the largest itemset.
    pub fn depth(&self) -> usize {
        self.reachable()
            .into_iter()
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or_default()
    }

    /// Lists all itemsets in pre-order, by ascending item ids.
    pub fn itemsets(&self, store_rows: bool) -> FrequentItemsets {
        let mut result = FrequentItemsets::new();
        let mut path = Vec::new();
        self.gather(ROOT, &mut path, store_rows, &mut result);
        result
    }

    fn gather(
        &self,
        id: NodeId,
        path: &mut Vec<usize>,
        store_rows: bool,
        result: &mut FrequentItemsets,
    ) {
        let node = &self.nodes[id];
        if !path.is_empty() {
            let items = path.iter().map(|&i| Item::Id(i)).collect();
            result.add(items, node.support, store_rows.then(|| node.rows.clone()));
        }
        for (&item, &child) in &node.children {
            path.push(item);
            self.gather(child, path, store_rows, result);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_and_detached_nodes() {
        let mut trie = ItemsetTrie::new(4.0, 2.0);
        let a = trie.add_child(ROOT, 1);
        let b = trie.add_child(ROOT, 2);
        let ab = trie.add_child(a, 2);
        assert_eq!(trie.add_child(ROOT, 1), a);
        trie.nodes[ab].support = 3.0;

        assert_eq!(trie.find_path(&[1, 2]), Some(ab));
        assert_eq!(trie.find_path(&[2, 1]), None);
        assert_eq!(trie.support_of(&[1, 2]), Some(3.0));
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.depth(), 2);

        trie.nodes[a].children.remove(&2);
        assert_eq!(trie.find_path(&[1, 2]), None);
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.children(ROOT).collect::<Vec<_>>(), vec![(1, a), (2, b)]);
    }
}
