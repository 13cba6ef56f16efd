//! Itemset mining over rows of item ids, in the manner of Apriori: a trie
//! of candidates is counted against the data, pruned, and extended one
//! item at a time.

mod growth;
mod rules;
mod trie;

pub use trie::{ItemsetTrie, NodeId, TrieNode, ROOT};

pub(crate) use growth::build_trie;
pub(crate) use rules::SparseRuleGenerator;
