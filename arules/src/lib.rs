//! Frequent itemsets and association rules.
//!
//! Two engines share one rule type:
//!
//! * [`AssociationRulesInducer`] mines attribute/value data ([`DenseDataset`])
//!   with a tree of itemsets grown by joining row sets, and can restrict the
//!   right-hand side to the class ([`InducerConfig::classification_rules`]).
//! * [`SparseAssociationRulesInducer`] mines rows of item ids
//!   ([`SparseDataset`]) Apriori style, with a trie of candidates.
//!
//! Mining is deterministic and single threaded; it either completes or fails
//! with a [`MiningError`].

pub mod apriori;
pub mod config;
pub mod data;
pub mod error;
pub mod inducer;
pub mod itemsets;
pub mod rules;

#[cfg(feature = "python")]
mod python;

pub use apriori::dense::ItemsetTree;
pub use apriori::rowset::WeightedRowSet;
pub use apriori::sparse::ItemsetTrie;
pub use config::{InducerConfig, DEFAULT_MAX_ITEMSETS};
pub use data::{Dataset, DenseDataset, Domain, SparseDataset, VarKind, Variable};
pub use error::{MiningError, Result};
pub use inducer::{
    induce_rules, AssociationRulesInducer, SparseAssociationRulesInducer, SparseItemsetsInducer,
};
pub use itemsets::{FrequentItemsets, FrequentLevel};
pub use rules::{Item, Rule, RuleSet};
