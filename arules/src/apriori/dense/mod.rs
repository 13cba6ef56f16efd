//! Itemset mining over attribute/value data.
//!
//! Frequent itemsets are kept in an [`ItemsetTree`]: a chain of attribute
//! nodes, each splitting its itemsets by value, with every value branching
//! into a chain of attributes of greater index. The tree grows one level per
//! itemset size by joining sibling values.

mod classification;
mod growth;
mod rules;
mod tree;

pub use tree::{AttributeNode, Chain, ItemsetTree, NodeId, Pattern, ValueNode};

pub(crate) use classification::ClassificationRuleGenerator;
pub(crate) use growth::build_tree;
pub(crate) use rules::RuleGenerator;
