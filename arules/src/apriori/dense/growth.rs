use log::{debug, warn};

use super::tree::{AttributeNode, ItemsetTree, NodeId, ValueNode};
use crate::config::InducerConfig;
use crate::data::DenseDataset;
use crate::error::{MiningError, Result};

/// Builds the complete tree of frequent itemsets, growing it one itemset
/// size at a time until no new itemsets appear.
pub(crate) fn build_tree(data: &DenseDataset, config: &InducerConfig) -> Result<ItemsetTree> {
    let (mut tree, mut new_itemsets) = build_level_one(data, config)?;
    let min_support = tree.min_support;

    let mut total = 0;
    let mut depth = 1;
    while new_itemsets > 0 {
        total += new_itemsets;
        debug!("itemsets of size {}: {} (total {})", depth, new_itemsets, total);
        if total > config.max_itemsets {
            warn!("aborting: {} itemsets exceed the limit of {}", total, config.max_itemsets);
            return Err(MiningError::TooManyItemsets {
                count: total,
                limit: config.max_itemsets,
            });
        }
        depth += 1;
        new_itemsets = tree.extend(depth, min_support);
    }
    tree.depth = depth - 1;
    Ok(tree)
}

/// Builds the chain of frequent 1-itemsets and returns it together with
/// their number.
pub(crate) fn build_level_one(
    data: &DenseDataset,
    config: &InducerConfig,
) -> Result<(ItemsetTree, usize)> {
    let domain = data.domain();
    let n_variables = data.n_variables();
    let mut tree = ItemsetTree::new(n_variables);

    for var in domain.variables() {
        let n_values = var.n_values().ok_or_else(|| {
            MiningError::invalid(format!(
                "cannot induce rules from continuous variables ('{}')",
                var.name
            ))
        })?;
        let index = tree.nodes.len();
        tree.push(AttributeNode::with_values(index, n_values));
    }

    let class_index = if config.classification_rules {
        let index = domain.class_index().ok_or_else(|| {
            MiningError::invalid("cannot induce classification rules on classless data")
        })?;
        tree.class_distribution = Some(vec![0.0; tree.nodes[index].values.len()]);
        Some(index)
    } else {
        None
    };

    let mut n_examples = 0.0;
    for row in 0..data.n_rows() {
        let class_value = match class_index {
            Some(index) => match data.value(row, index) {
                Some(value) => Some(value),
                None => continue,
            },
            None => None,
        };
        let weight = data.weight(row);
        n_examples += weight;
        for (var, value) in data.row(row).enumerate() {
            let Some(value) = value else { continue };
            let node = &mut tree.nodes[var];
            if value >= node.values.len() {
                return Err(MiningError::invalid(format!(
                    "invalid value {} of attribute '{}'",
                    value,
                    domain.variable(var).map_or("?", |v| v.name.as_str())
                )));
            }
            node.values[value].rows.push(row, weight);
        }
        if let (Some(value), Some(dist)) = (class_value, tree.class_distribution.as_mut()) {
            dist[value] += weight;
        }
    }

    let min_support = config.support * n_examples;
    tree.n_examples = n_examples;
    tree.min_support = min_support;

    // Attribute nodes left without values are spliced out of the chain.
    let mut itemsets = 0;
    let mut last: Option<NodeId> = None;
    for id in 0..tree.nodes.len() {
        let node = &mut tree.nodes[id];
        for value in node.values.iter_mut() {
            value.support = value.rows.total_weight();
        }
        node.values.retain(|value| !value.rows.is_empty() && value.support >= min_support);
        if node.values.is_empty() {
            continue;
        }
        itemsets += node.values.len();
        match last {
            Some(prev) => tree.nodes[prev].next = Some(id),
            None => tree.root = Some(id),
        }
        last = Some(id);
    }

    Ok((tree, itemsets))
}

impl ItemsetTree {
    /// Adds the itemsets of size `k` to a tree holding those of size `k - 1`,
    /// returning how many were added.
    pub(crate) fn extend(&mut self, k: usize, min_support: f64) -> usize {
        match self.root {
            Some(root) if k >= 2 => self.extend_below(root, k, min_support),
            _ => 0,
        }
    }

    /// Descends `k - 2` levels, adding one item at each, then joins pairs.
    fn extend_below(&mut self, start: NodeId, k: usize, min_support: f64) -> usize {
        if k == 2 {
            return self.make_pairs(start, min_support);
        }
        let branches: Vec<NodeId> = self
            .chain(Some(start))
            .flat_map(|id| self.nodes[id].values.iter().filter_map(|v| v.branch))
            .collect();
        branches
            .into_iter()
            .map(|branch| self.extend_below(branch, k - 1, min_support))
            .sum()
    }

    /// Joins every value of every attribute in the chain with the values of
    /// the attributes that follow it. Supported joins become children of the
    /// first value.
    fn make_pairs(&mut self, start: NodeId, min_support: f64) -> usize {
        let mut itemsets = 0;
        let mut p1 = Some(start);
        while let Some(n1) = p1 {
            for v1 in 0..self.nodes[n1].values.len() {
                let mut tail = self.nodes[n1].values[v1].branch;
                debug_assert!(tail.is_none());
                let mut p2 = self.nodes[n1].next;
                while let Some(n2) = p2 {
                    for v2 in 0..self.nodes[n2].values.len() {
                        let (rows, support) = self.nodes[n1].values[v1]
                            .rows
                            .intersect(&self.nodes[n2].values[v2].rows);
                        // support may be zero, so the intersection is checked as well
                        if rows.is_empty() || support < min_support {
                            continue;
                        }
                        let attribute = self.nodes[n2].attribute;
                        let target = match tail {
                            Some(t) if self.nodes[t].attribute == attribute => t,
                            _ => {
                                let id = self.push(AttributeNode::new(attribute));
                                match tail {
                                    Some(t) => self.nodes[t].next = Some(id),
                                    None => self.nodes[n1].values[v1].branch = Some(id),
                                }
                                tail = Some(id);
                                id
                            }
                        };
                        let value = self.nodes[n2].values[v2].value;
                        self.nodes[target]
                            .values
                            .push(ValueNode::with_rows(value, rows, support));
                        itemsets += 1;
                    }
                    p2 = self.nodes[n2].next;
                }
            }
            p1 = self.nodes[n1].next;
        }
        itemsets
    }
}
