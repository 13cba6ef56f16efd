use super::tree::{defined, pattern_items, ItemsetTree, NodeId, Pattern, ValueNode};
use crate::apriori::rowset::WeightedRowSet;
use crate::config::InducerConfig;
use crate::error::{MiningError, Result};
use crate::rules::{Item, Rule, RuleSet};

/// A node of a rule tree. A rule tree holds the right-hand sides tried for a
/// single itemset; a node stands for the right side made of its own item and
/// the items on the path above it.
#[derive(Debug, Clone)]
struct RuleTreeNode {
    attribute: usize,
    value: usize,
    rows: WeightedRowSet,
    next: Option<usize>,
    has_value: Option<usize>,
}

#[derive(Debug, Default)]
struct RuleTree {
    nodes: Vec<RuleTreeNode>,
    root: Option<usize>,
}

impl RuleTree {
    fn push(&mut self, node: RuleTreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

/// Derives association rules from a complete itemset tree.
pub(crate) struct RuleGenerator<'a> {
    tree: &'a ItemsetTree,
    confidence: f64,
    store_examples: bool,
    rules: RuleSet,
}

impl<'a> RuleGenerator<'a> {
    pub(crate) fn new(tree: &'a ItemsetTree, config: &InducerConfig) -> Self {
        Self {
            tree,
            confidence: config.confidence,
            store_examples: config.store_examples,
            rules: RuleSet::new(),
        }
    }

    /// Emits rules from itemsets of size 2 and more, smaller itemsets first.
    pub(crate) fn generate(mut self) -> Result<RuleSet> {
        let mut pattern = vec![None; self.tree.n_variables()];
        for k in 2..=self.tree.depth() {
            self.descend(self.tree.root(), k, k, &mut pattern)?;
        }
        Ok(self.rules)
    }

    /// Walks down `k - 1` levels, so that `pattern` holds an itemset of size
    /// `n_both` when the bottom is reached.
    fn descend(
        &mut self,
        start: Option<NodeId>,
        k: usize,
        n_both: usize,
        pattern: &mut Vec<Option<usize>>,
    ) -> Result<()> {
        let tree = self.tree;
        for id in tree.chain(start) {
            let node = tree.node(id);
            for value in &node.values {
                pattern[node.attribute] = Some(value.value);
                if k > 1 {
                    if let Some(branch) = value.branch {
                        self.descend(Some(branch), k - 1, n_both, pattern)?;
                    }
                } else {
                    self.find_1_rules(pattern, value)?;
                    if n_both > 2 {
                        self.find_longer_rules(pattern, value, n_both)?;
                    }
                }
            }
            pattern[node.attribute] = None;
        }
        Ok(())
    }

    /// Rules with a single item on the right.
    fn find_1_rules(&mut self, pattern: &mut [Option<usize>], both: &'a ValueNode) -> Result<()> {
        for attribute in 0..pattern.len() {
            let Some(value) = pattern[attribute] else { continue };
            pattern[attribute] = None;
            let left = self.lookup(pattern);
            let left_items = pattern_items(pattern);
            pattern[attribute] = Some(value);
            let left = left?;

            if both.support / left.support >= self.confidence {
                let right_support = self
                    .tree
                    .find_item(attribute, value)
                    .map_or(0.0, |node| node.support);
                let right = vec![Item::Attribute {
                    index: attribute,
                    value,
                }];
                self.push_rule(left_items, right, left, right_support, both);
            }
        }
        Ok(())
    }

    /// Rules with two or more items on the right. Right sides grow one item
    /// at a time for as long as the previous size produced more than two
    /// confident splits.
    fn find_longer_rules(
        &mut self,
        whole: &Pattern,
        both: &'a ValueNode,
        n_both: usize,
    ) -> Result<()> {
        let mut rule_tree = self.rule_tree(whole)?;
        let mut right = vec![None; whole.len()];
        let mut m = 2;
        while m < n_both {
            let root = rule_tree.root;
            let created = self.generate_next(&mut rule_tree, root, &mut right, m, whole, both)?;
            if created <= 2 {
                break;
            }
            m += 1;
        }
        Ok(())
    }

    /// A chain of the single items of `whole`, with their rows.
    fn rule_tree(&self, whole: &Pattern) -> Result<RuleTree> {
        let mut rule_tree = RuleTree::default();
        let mut last: Option<usize> = None;
        for (attribute, value) in defined(whole) {
            let item = self.tree.find_item(attribute, value).ok_or_else(|| {
                MiningError::inconsistency(format!(
                    "item {} is missing from the itemset tree",
                    Item::Attribute {
                        index: attribute,
                        value
                    }
                ))
            })?;
            let id = rule_tree.push(RuleTreeNode {
                attribute,
                value,
                rows: item.rows.clone(),
                next: None,
                has_value: None,
            });
            match last {
                Some(prev) => rule_tree.nodes[prev].next = Some(id),
                None => rule_tree.root = Some(id),
            }
            last = Some(id);
        }
        Ok(rule_tree)
    }

    fn generate_next(
        &mut self,
        rule_tree: &mut RuleTree,
        start: Option<usize>,
        right: &mut [Option<usize>],
        k: usize,
        whole: &Pattern,
        both: &'a ValueNode,
    ) -> Result<usize> {
        if k == 2 {
            return self.generate_pairs(rule_tree, start, right, whole, both);
        }
        let mut created = 0;
        let mut cursor = start;
        while let Some(id) = cursor {
            let node = &rule_tree.nodes[id];
            if let Some(child) = node.has_value {
                let (attribute, value) = (node.attribute, node.value);
                right[attribute] = Some(value);
                created += self.generate_next(rule_tree, Some(child), right, k - 1, whole, both)?;
                right[attribute] = None;
            }
            cursor = rule_tree.nodes[id].next;
        }
        Ok(created)
    }

    /// Tries every pair of the chain as the last two items of the right side.
    /// Confident right sides are added to the rule tree, so that the next
    /// size extends only those.
    fn generate_pairs(
        &mut self,
        rule_tree: &mut RuleTree,
        start: Option<usize>,
        right: &mut [Option<usize>],
        whole: &Pattern,
        both: &'a ValueNode,
    ) -> Result<usize> {
        let mut created = 0;
        let mut p1 = start;
        while let Some(n1) = p1 {
            let (a1, v1) = (rule_tree.nodes[n1].attribute, rule_tree.nodes[n1].value);
            right[a1] = Some(v1);
            let mut tail: Option<usize> = None;
            let mut p2 = rule_tree.nodes[n1].next;
            while let Some(n2) = p2 {
                let (a2, v2) = (rule_tree.nodes[n2].attribute, rule_tree.nodes[n2].value);
                right[a2] = Some(v2);

                let left_pattern: Vec<Option<usize>> = whole
                    .iter()
                    .zip(right.iter())
                    .map(|(w, r)| if r.is_some() { None } else { *w })
                    .collect();
                let left = self.lookup(&left_pattern)?;
                if both.support / left.support >= self.confidence {
                    let (rows, right_support) =
                        rule_tree.nodes[n1].rows.intersect(&rule_tree.nodes[n2].rows);
                    if !rows.is_empty() {
                        let id = rule_tree.push(RuleTreeNode {
                            attribute: a2,
                            value: v2,
                            rows,
                            next: None,
                            has_value: None,
                        });
                        match tail {
                            Some(t) => rule_tree.nodes[t].next = Some(id),
                            None => rule_tree.nodes[n1].has_value = Some(id),
                        }
                        tail = Some(id);
                        created += 1;
                    }
                    self.push_rule(
                        pattern_items(&left_pattern),
                        pattern_items(right),
                        left,
                        right_support,
                        both,
                    );
                }

                right[a2] = None;
                p2 = rule_tree.nodes[n2].next;
            }
            right[a1] = None;
            p1 = rule_tree.nodes[n1].next;
        }
        Ok(created)
    }

    /// The node of a left-hand side. Every subset of a frequent itemset is in
    /// the tree, so a miss means the tree is broken.
    fn lookup(&self, pattern: &Pattern) -> Result<&'a ValueNode> {
        let tree: &'a ItemsetTree = self.tree;
        tree.find(pattern).ok_or_else(|| {
            let items: Vec<String> = pattern_items(pattern).iter().map(Item::to_string).collect();
            MiningError::inconsistency(format!(
                "itemset {{{}}} is missing from the itemset tree",
                items.join(", ")
            ))
        })
    }

    fn push_rule(
        &mut self,
        left: Vec<Item>,
        right: Vec<Item>,
        left_node: &ValueNode,
        right_support: f64,
        both: &ValueNode,
    ) {
        let mut rule = Rule::new(
            left,
            right,
            left_node.support,
            right_support,
            both.support,
            self.tree.n_examples(),
        );
        if self.store_examples {
            rule = rule.with_matches(left_node.rows.row_ids(), both.rows.row_ids());
        }
        self.rules.push(rule);
    }
}
