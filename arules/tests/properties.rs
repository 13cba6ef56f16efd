//! Property-based tests for itemset mining and rule induction.

use std::collections::HashSet;

use arules::{
    AssociationRulesInducer, DenseDataset, Domain, FrequentItemsets, InducerConfig, Item, Rule,
    SparseAssociationRulesInducer, SparseDataset, Variable, WeightedRowSet,
};
use ndarray::Array2;
use proptest::prelude::*;

const N_VALUES: usize = 3;

/// Rows of up to four attributes with three values each; -1 is missing.
fn dense_strategy() -> impl Strategy<Value = DenseDataset> {
    (1usize..5, 1usize..14)
        .prop_flat_map(|(n_attributes, n_rows)| {
            (
                Just(n_attributes),
                prop::collection::vec(-1i32..N_VALUES as i32, n_attributes * n_rows),
                prop::collection::vec(0u8..4, n_rows),
            )
        })
        .prop_map(|(n_attributes, values, weights)| {
            let n_rows = weights.len();
            let attributes = (0..n_attributes)
                .map(|i| Variable::discrete(format!("x{}", i), ["a", "b", "c"]))
                .collect();
            let values = Array2::from_shape_vec((n_rows, n_attributes), values).unwrap();
            DenseDataset::new(Domain::new(attributes, None), values)
                .unwrap()
                .with_weights(weights.into_iter().map(f64::from).collect())
                .unwrap()
        })
}

/// Baskets over at most six items, some of them with weight zero.
fn sparse_strategy() -> impl Strategy<Value = SparseDataset> {
    prop::collection::vec((prop::collection::vec(0usize..6, 0..6), 0u8..3), 1..16).prop_map(|rows| {
        let (rows, weights): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        SparseDataset::new(rows)
            .with_weights(weights.into_iter().map(f64::from).collect())
            .unwrap()
    })
}

fn config_strategy() -> impl Strategy<Value = InducerConfig> {
    (prop_oneof![Just(0.0), 0.1f64..0.7], 0.0f64..1.0)
        .prop_map(|(support, confidence)| InducerConfig::new(support, confidence))
}

fn weighted_support(items: &[Item], rows: impl Iterator<Item = (Vec<Item>, f64)>) -> f64 {
    rows.filter(|(row, _)| Rule::applies(items, row))
        .map(|(_, weight)| weight)
        .sum()
}

fn all_itemsets(itemsets: &FrequentItemsets) -> Vec<(Vec<Item>, f64)> {
    itemsets
        .levels()
        .iter()
        .flat_map(|level| level.iter().map(|(items, support)| (items.to_vec(), support)))
        .collect()
}

fn check_rule(rule: &Rule, config: &InducerConfig) -> Result<(), TestCaseError> {
    prop_assert!(rule.n_applies_left > 0.0);
    prop_assert!(rule.confidence() >= config.confidence - 1e-9);
    prop_assert!(rule.n_applies_both <= rule.n_applies_left + 1e-9);
    prop_assert!(rule.n_applies_both <= rule.n_applies_right + 1e-9);
    prop_assert!(!rule.left.is_empty() && !rule.right.is_empty());
    prop_assert!(rule.left.iter().all(|item| !rule.right.contains(item)));
    Ok(())
}

proptest! {
    #[test]
    fn prop_intersection_is_symmetric(
        weights in prop::collection::vec(1u8..5, 30),
        in_a in prop::collection::vec(any::<bool>(), 30),
        in_b in prop::collection::vec(any::<bool>(), 30),
    ) {
        let set = |member: &[bool]| -> WeightedRowSet {
            (0..30)
                .filter(|&row| member[row])
                .map(|row| (row, f64::from(weights[row])))
                .collect()
        };
        let (a, b) = (set(&in_a), set(&in_b));
        let (ab, support_ab) = a.intersect(&b);
        let (ba, support_ba) = b.intersect(&a);

        prop_assert_eq!(&ab, &ba);
        prop_assert_eq!(support_ab, support_ba);
        let expected: f64 = (0..30)
            .filter(|&row| in_a[row] && in_b[row])
            .map(|row| f64::from(weights[row]))
            .sum();
        prop_assert_eq!(support_ab, expected);
        prop_assert_eq!(ab.total_weight(), expected);
    }

    #[test]
    fn prop_dense_supports_are_exact_and_monotone(
        data in dense_strategy(),
        config in config_strategy(),
    ) {
        let itemsets = AssociationRulesInducer::new(config.clone()).itemsets(&data).unwrap();
        let rows = || (0..data.n_rows()).map(|row| (data.row_items(row), data.weight(row)));
        let min_support = config.support * data.total_weight();

        let listed = all_itemsets(&itemsets);
        let distinct: HashSet<&Vec<Item>> = listed.iter().map(|(items, _)| items).collect();
        prop_assert_eq!(distinct.len(), listed.len());

        for (items, support) in &listed {
            prop_assert_eq!(*support, weighted_support(items, rows()));
            prop_assert!(*support >= min_support);
            for skip in 0..items.len() {
                let mut subset = items.clone();
                subset.remove(skip);
                if let Some(parent) = itemsets.support_of(&subset) {
                    prop_assert!(parent >= *support);
                } else {
                    prop_assert!(subset.is_empty());
                }
            }
        }
    }

    #[test]
    fn prop_dense_rules_are_confident(data in dense_strategy(), config in config_strategy()) {
        let inducer = AssociationRulesInducer::new(config.clone());
        let rules = inducer.induce(&data).unwrap();
        for rule in &rules {
            check_rule(rule, &config)?;
        }
        prop_assert_eq!(rules, inducer.induce(&data).unwrap());
    }

    #[test]
    fn prop_sparse_itemsets_are_complete(data in sparse_strategy(), config in config_strategy()) {
        let itemsets = SparseAssociationRulesInducer::new(config.clone()).itemsets(&data).unwrap();
        let rows = || (0..data.n_rows()).map(|row| (data.row_items(row), data.weight(row)));
        let min_support = config.support * data.total_weight();

        let listed = all_itemsets(&itemsets);
        let distinct: HashSet<&Vec<Item>> = listed.iter().map(|(items, _)| items).collect();
        prop_assert_eq!(distinct.len(), listed.len());

        // every subset of the six items is listed exactly when it is frequent
        for mask in 1u32..64 {
            let items: Vec<Item> = (0..6).filter(|i| mask & (1 << i) != 0).map(Item::Id).collect();
            let support = weighted_support(&items, rows());
            let frequent = items
                .iter()
                .all(|item| matches!(item, Item::Id(id) if data.universe().contains(id)))
                && support >= min_support;
            prop_assert_eq!(itemsets.support_of(&items), frequent.then_some(support));
        }
    }

    #[test]
    fn prop_sparse_rules_are_confident(data in sparse_strategy(), config in config_strategy()) {
        let inducer = SparseAssociationRulesInducer::new(config.clone());
        let rules = inducer.induce(&data).unwrap();
        for rule in &rules {
            check_rule(rule, &config)?;
            prop_assert_eq!(rule.left.len() + rule.right.len(), rule.n_left + rule.n_right);
        }
        prop_assert_eq!(rules, inducer.induce(&data).unwrap());
    }
}
