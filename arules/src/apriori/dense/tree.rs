use crate::apriori::rowset::WeightedRowSet;
use crate::itemsets::FrequentItemsets;
use crate::rules::Item;

pub type NodeId = usize;

/// An itemset pattern over a dense domain: `pattern[attribute]` is the value
/// the itemset requires, or `None` when the attribute is not in it.
pub type Pattern = [Option<usize>];

/// One value of an attribute node. It stands for the itemset made of this
/// value and the values on the path above it.
#[derive(Debug, Clone)]
pub struct ValueNode {
    pub value: usize,
    /// Attributes (with greater indices) that extend this itemset.
    pub branch: Option<NodeId>,
    pub support: f64,
    pub rows: WeightedRowSet,
}

impl ValueNode {
    pub(crate) fn new(value: usize) -> Self {
        Self {
            value,
            branch: None,
            support: 0.0,
            rows: WeightedRowSet::new(),
        }
    }

    pub(crate) fn with_rows(value: usize, rows: WeightedRowSet, support: f64) -> Self {
        Self {
            value,
            branch: None,
            support,
            rows,
        }
    }
}

/// Splits itemsets by the value of `attribute`. Itemsets in which the
/// attribute is not defined continue along `next`, which always points to an
/// attribute with a greater index.
#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub attribute: usize,
    pub next: Option<NodeId>,
    pub values: Vec<ValueNode>,
}

impl AttributeNode {
    pub(crate) fn new(attribute: usize) -> Self {
        Self {
            attribute,
            next: None,
            values: Vec::new(),
        }
    }

    pub(crate) fn with_values(attribute: usize, n_values: usize) -> Self {
        Self {
            attribute,
            next: None,
            values: (0..n_values).map(ValueNode::new).collect(),
        }
    }
}

/// Frequent itemsets of a dense dataset. Attribute nodes live in an arena
/// and refer to each other by index; spliced-out nodes stay in the arena
/// unreachable until the tree is dropped.
#[derive(Debug, Clone)]
pub struct ItemsetTree {
    pub(crate) nodes: Vec<AttributeNode>,
    pub(crate) root: Option<NodeId>,
    pub(crate) n_variables: usize,
    pub(crate) depth: usize,
    pub(crate) n_examples: f64,
    pub(crate) min_support: f64,
    pub(crate) class_distribution: Option<Vec<f64>>,
}

/// Iterator over the attribute nodes of a chain.
pub struct Chain<'a> {
    tree: &'a ItemsetTree,
    next: Option<NodeId>,
}

impl Iterator for Chain<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.nodes[id].next;
        Some(id)
    }
}

impl ItemsetTree {
    pub(crate) fn new(n_variables: usize) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            n_variables,
            depth: 0,
            n_examples: 0.0,
            min_support: 0.0,
            class_distribution: None,
        }
    }

    pub(crate) fn push(&mut self, node: AttributeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AttributeNode {
        &self.nodes[id]
    }

    pub fn chain(&self, start: Option<NodeId>) -> Chain<'_> {
        Chain {
            tree: self,
            next: start,
        }
    }

    /// Size of the largest frequent itemset.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total weight of the rows the tree was built from.
    pub fn n_examples(&self) -> f64 {
        self.n_examples
    }

    /// Absolute support threshold used for pruning.
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn n_variables(&self) -> usize {
        self.n_variables
    }

    /// Weighted class counts, when the tree was built for classification rules.
    pub fn class_distribution(&self) -> Option<&[f64]> {
        self.class_distribution.as_deref()
    }

    /// Finds the value node representing exactly the itemset `pattern`.
    pub fn find(&self, pattern: &Pattern) -> Option<&ValueNode> {
        let mut chain = self.root;
        let mut found = None;
        for (attribute, value) in defined(pattern) {
            let mut node = chain?;
            while self.nodes[node].attribute != attribute {
                node = self.nodes[node].next?;
            }
            let value_node = self.nodes[node].values.iter().find(|v| v.value == value)?;
            chain = value_node.branch;
            found = Some(value_node);
        }
        found
    }

    /// Support of `pattern`; zero when it is not a frequent itemset.
    pub fn support(&self, pattern: &Pattern) -> f64 {
        self.find(pattern).map_or(0.0, |node| node.support)
    }

    /// The 1-itemset `attribute = value`.
    pub fn find_item(&self, attribute: usize, value: usize) -> Option<&ValueNode> {
        self.chain(self.root)
            .find(|&id| self.nodes[id].attribute == attribute)
            .and_then(|id| self.nodes[id].values.iter().find(|v| v.value == value))
    }

    /// Number of itemsets stored in the tree.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            count += node.values.len();
            stack.extend(node.next);
            stack.extend(node.values.iter().filter_map(|v| v.branch));
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Lists all itemsets, depth first.
    pub fn itemsets(&self, store_rows: bool) -> FrequentItemsets {
        let mut result = FrequentItemsets::new();
        let mut so_far = Vec::new();
        self.gather(self.root, &mut so_far, store_rows, &mut result);
        result
    }

    fn gather(
        &self,
        start: Option<NodeId>,
        so_far: &mut Vec<Item>,
        store_rows: bool,
        result: &mut FrequentItemsets,
    ) {
        for id in self.chain(start) {
            let node = &self.nodes[id];
            for value in &node.values {
                so_far.push(Item::Attribute {
                    index: node.attribute,
                    value: value.value,
                });
                let rows = store_rows.then(|| value.rows.row_ids());
                result.add(so_far.clone(), value.support, rows);
                self.gather(value.branch, so_far, store_rows, result);
                so_far.pop();
            }
        }
    }
}

/// Defined `(attribute, value)` pairs of a pattern, by increasing attribute.
pub(crate) fn defined(pattern: &Pattern) -> impl Iterator<Item = (usize, usize)> + '_ {
    pattern
        .iter()
        .enumerate()
        .filter_map(|(attribute, value)| value.map(|value| (attribute, value)))
}

pub(crate) fn pattern_items(pattern: &Pattern) -> Vec<Item> {
    defined(pattern)
        .map(|(index, value)| Item::Attribute { index, value })
        .collect()
}
