use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::Domain;

/// A single item of an itemset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    /// `attribute = value`, as mined from dense data.
    Attribute { index: usize, value: usize },
    /// A bare item id, as mined from sparse data.
    Id(usize),
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Attribute { index, value } => write!(f, "{}={}", index, value),
            Item::Id(id) => write!(f, "{}", id),
        }
    }
}

/// An association rule `left -> right` together with the weighted counts it
/// was built from. Every other measure is derived from these counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub left: Vec<Item>,
    pub right: Vec<Item>,
    pub n_applies_left: f64,
    pub n_applies_right: f64,
    pub n_applies_both: f64,
    pub n_examples: f64,
    pub n_left: usize,
    pub n_right: usize,
    /// Ids of rows matching the left side, when rows are stored.
    pub match_left: Option<Vec<usize>>,
    /// Ids of rows matching both sides, when rows are stored.
    pub match_both: Option<Vec<usize>>,
}

impl Rule {
    pub fn new(
        left: Vec<Item>,
        right: Vec<Item>,
        n_applies_left: f64,
        n_applies_right: f64,
        n_applies_both: f64,
        n_examples: f64,
    ) -> Self {
        Self {
            n_left: left.len(),
            n_right: right.len(),
            left,
            right,
            n_applies_left,
            n_applies_right,
            n_applies_both,
            n_examples,
            match_left: None,
            match_both: None,
        }
    }

    pub fn with_matches(mut self, left: Vec<usize>, both: Vec<usize>) -> Self {
        self.match_left = Some(left);
        self.match_both = Some(both);
        self
    }

    pub fn support(&self) -> f64 {
        self.n_applies_both / self.n_examples
    }

    pub fn confidence(&self) -> f64 {
        self.n_applies_both / self.n_applies_left
    }

    pub fn coverage(&self) -> f64 {
        self.n_applies_left / self.n_examples
    }

    pub fn strength(&self) -> f64 {
        self.n_applies_right / self.n_applies_left
    }

    pub fn lift(&self) -> f64 {
        self.n_examples * self.n_applies_both / self.n_applies_left / self.n_applies_right
    }

    pub fn leverage(&self) -> f64 {
        (self.n_applies_both * self.n_examples - self.n_applies_left * self.n_applies_right)
            / self.n_examples
            / self.n_examples
    }

    /// Whether every item of `side` is among `row_items`.
    pub fn applies(side: &[Item], row_items: &[Item]) -> bool {
        side.iter().all(|item| row_items.contains(item))
    }

    pub fn applies_left(&self, row_items: &[Item]) -> bool {
        Self::applies(&self.left, row_items)
    }

    pub fn applies_right(&self, row_items: &[Item]) -> bool {
        Self::applies(&self.right, row_items)
    }

    pub fn applies_both(&self, row_items: &[Item]) -> bool {
        self.applies_left(row_items) && self.applies_right(row_items)
    }

    /// Renders the rule with variable and value names, e.g. `hair=0 -> aquatic=1`.
    pub fn to_string_with(&self, domain: &Domain) -> String {
        let side = |items: &[Item]| {
            items
                .iter()
                .map(|item| domain.item_name(item))
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{} -> {}", side(&self.left), side(&self.right))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |items: &[Item]| {
            items
                .iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(f, "{} -> {}", side(&self.left), side(&self.right))
    }
}

/// Rules in the order the inducer produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_vec(self) -> Vec<Rule> {
        self.rules
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
