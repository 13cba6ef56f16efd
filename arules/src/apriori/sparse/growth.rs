use std::ops::Bound;

use log::{debug, warn};

use super::trie::{ItemsetTrie, NodeId, ROOT};
use crate::config::InducerConfig;
use crate::data::SparseDataset;
use crate::error::{MiningError, Result};

/// Grows the trie level by level: count the candidates of the current size,
/// drop the unsupported ones, then propose candidates one item longer.
pub(crate) fn build_trie(data: &SparseDataset, config: &InducerConfig) -> Result<ItemsetTrie> {
    let n_examples = data.total_weight();
    let min_support = config.support * n_examples;
    let mut trie = ItemsetTrie::new(n_examples, min_support);

    let mut new_itemsets = trie.build_level_one(data.universe());
    let mut depth = 1;
    while new_itemsets > 0 {
        trie.consider_examples(data, depth);
        let pruned = trie.prune_below_support(min_support);
        let current = trie.count_leaf_nodes();
        new_itemsets = trie.extend_frontier(depth, config.max_itemsets.saturating_sub(current));
        debug!(
            "depth {}: {} candidates pruned, {} leaves, {} new candidates",
            depth, pruned, current, new_itemsets
        );
        if new_itemsets + current >= config.max_itemsets {
            warn!(
                "aborting: {} itemsets reach the limit of {}",
                new_itemsets + current,
                config.max_itemsets
            );
            return Err(MiningError::TooManyItemsets {
                count: new_itemsets + current,
                limit: config.max_itemsets,
            });
        }
        depth += 1;
    }

    if config.store_examples {
        trie.assign_examples(data);
    }
    Ok(trie)
}

impl ItemsetTrie {
    /// Adds every item of the universe under the root, without counting.
    pub(crate) fn build_level_one(&mut self, universe: &[usize]) -> usize {
        for &item in universe {
            self.add_child(ROOT, item);
        }
        universe.len()
    }

    /// Adds the weight of every row to the candidates of size `aim` it contains.
    pub(crate) fn consider_examples(&mut self, data: &SparseDataset, aim: usize) {
        for (row, items) in data.rows().iter().enumerate() {
            if items.len() >= aim {
                self.count_row(ROOT, items, 0, 0, aim, data.weight(row));
            }
        }
    }

    /// Follows only the paths that exist in the trie. The item at trie depth
    /// `depth` can only come from positions that leave enough items for the
    /// rest of the path.
    fn count_row(
        &mut self,
        node: NodeId,
        items: &[usize],
        from: usize,
        depth: usize,
        aim: usize,
        weight: f64,
    ) {
        if depth == aim {
            self.nodes[node].support += weight;
            return;
        }
        if self.nodes[node].is_leaf() {
            return;
        }
        let last = depth + items.len() - aim;
        for i in from..=last {
            if let Some(child) = self.child(node, items[i]) {
                self.count_row(child, items, i + 1, depth + 1, aim, weight);
            }
        }
    }

    /// Detaches every leaf with support below `min_support` and returns how
    /// many were detached.
    pub(crate) fn prune_below_support(&mut self, min_support: f64) -> usize {
        let doomed: Vec<NodeId> = self
            .leaves()
            .into_iter()
            .filter(|&id| self.nodes[id].support < min_support)
            .collect();
        for &id in &doomed {
            let node = &self.nodes[id];
            if let (Some(parent), Some(item)) = (node.parent, node.item) {
                self.nodes[parent].children.remove(&item);
            }
        }
        doomed.len()
    }

    pub(crate) fn count_leaf_nodes(&self) -> usize {
        self.leaves().len()
    }

    fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[ROOT].children.values().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.values().copied());
            }
        }
        leaves
    }

    /// Extends the nodes at `depth` with every later item whose addition
    /// keeps all subsets frequent. Stops as soon as more than `budget`
    /// candidates were added.
    pub(crate) fn extend_frontier(&mut self, depth: usize, budget: usize) -> usize {
        let mut frontier = Vec::new();
        let mut path = Vec::new();
        self.collect_at_depth(ROOT, depth, &mut path, &mut frontier);

        let mut count = 0;
        for (node, mut candidate) in frontier {
            let Some(&last) = candidate.last() else { continue };
            let later: Vec<usize> = self.nodes[ROOT]
                .children
                .range((Bound::Excluded(last), Bound::Unbounded))
                .map(|(&item, _)| item)
                .collect();
            for item in later {
                candidate.push(item);
                if self.allow_extend(&candidate) {
                    self.add_child(node, item);
                    count += 1;
                    if count > budget {
                        return count;
                    }
                }
                candidate.pop();
            }
        }
        count
    }

    fn collect_at_depth(
        &self,
        id: NodeId,
        depth: usize,
        path: &mut Vec<usize>,
        frontier: &mut Vec<(NodeId, Vec<usize>)>,
    ) {
        if path.len() == depth {
            frontier.push((id, path.clone()));
            return;
        }
        for (&item, &child) in &self.nodes[id].children {
            path.push(item);
            self.collect_at_depth(child, depth, path, frontier);
            path.pop();
        }
    }

    /// A candidate may be added only if each of its subsets one item shorter
    /// is already in the trie.
    fn allow_extend(&self, candidate: &[usize]) -> bool {
        let mut subset = Vec::with_capacity(candidate.len());
        (0..candidate.len()).all(|skip| {
            subset.clear();
            subset.extend(
                candidate
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip)
                    .map(|(_, &item)| item),
            );
            self.find_path(&subset).is_some()
        })
    }

    /// Records, in every node, the rows that contain its itemset.
    pub(crate) fn assign_examples(&mut self, data: &SparseDataset) {
        for (row, items) in data.rows().iter().enumerate() {
            self.assign_row(ROOT, items, row);
        }
    }

    fn assign_row(&mut self, node: NodeId, items: &[usize], row: usize) {
        self.nodes[node].rows.push(row);
        if self.nodes[node].is_leaf() {
            return;
        }
        for (i, &item) in items.iter().enumerate() {
            if let Some(child) = self.child(node, item) {
                self.assign_row(child, &items[i + 1..], row);
            }
        }
    }
}
