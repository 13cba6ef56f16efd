use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PySystemError, PyValueError};
use pyo3::prelude::*;

use crate::config::{InducerConfig, DEFAULT_MAX_ITEMSETS};
use crate::data::{DenseDataset, Domain, SparseDataset, Variable};
use crate::error::MiningError;
use crate::inducer::{AssociationRulesInducer, SparseAssociationRulesInducer};
use crate::itemsets::FrequentLevel;
use crate::rules::{Item, Rule};

impl From<MiningError> for PyErr {
    fn from(err: MiningError) -> PyErr {
        match err {
            MiningError::InvalidInput(_) => PyValueError::new_err(err.to_string()),
            MiningError::TooManyItemsets { .. } => PyRuntimeError::new_err(err.to_string()),
            MiningError::Inconsistency(_) => PySystemError::new_err(err.to_string()),
        }
    }
}

/// `(left, right, support, confidence, coverage, strength, lift, leverage)`
type RuleTuple<T> = (Vec<T>, Vec<T>, f64, f64, f64, f64, f64, f64);

fn rule_tuple<T>(rule: &Rule, item: impl Fn(&Item) -> T) -> RuleTuple<T> {
    (
        rule.left.iter().map(&item).collect(),
        rule.right.iter().map(&item).collect(),
        rule.support(),
        rule.confidence(),
        rule.coverage(),
        rule.strength(),
        rule.lift(),
        rule.leverage(),
    )
}

fn level_to_array(py: Python<'_>, level: &FrequentLevel) -> PyResult<Bound<'_, PyArray2<usize>>> {
    let itemset_size = level.itemset_size;
    let num_itemsets = level.len();
    let mut data = vec![0usize; num_itemsets * itemset_size];

    for (i, itemset) in level.iter_itemsets().enumerate() {
        for (j, item) in itemset.iter().enumerate() {
            if let Item::Id(id) = *item {
                data[i * itemset_size + j] = id;
            }
        }
    }

    let array = Array2::from_shape_vec((num_itemsets, itemset_size), data)
        .map_err(|_| PyValueError::new_err("Failed to create array"))?;
    Ok(array.into_pyarray(py))
}

/// Rules from a matrix of discrete values. Column `j` holds indices into
/// `n_values[j]` values; negative entries are missing. With `has_class`, the
/// last column is the class.
#[pyfunction]
#[pyo3(signature = (
    values,
    n_values,
    names=None,
    has_class=false,
    support=0.3,
    confidence=0.5,
    max_itemsets=DEFAULT_MAX_ITEMSETS,
    classification_rules=false,
))]
#[allow(clippy::too_many_arguments)]
fn association_rules_dense(
    values: PyReadonlyArray2<'_, i32>,
    n_values: Vec<usize>,
    names: Option<Vec<String>>,
    has_class: bool,
    support: f64,
    confidence: f64,
    max_itemsets: usize,
    classification_rules: bool,
) -> PyResult<Vec<RuleTuple<String>>> {
    let names = names.unwrap_or_else(|| (0..n_values.len()).map(|i| i.to_string()).collect());
    if names.len() != n_values.len() {
        return Err(PyValueError::new_err("'names' and 'n_values' differ in length"));
    }
    let mut variables: Vec<Variable> = names
        .into_iter()
        .zip(&n_values)
        .map(|(name, &n)| Variable::discrete(name, (0..n).map(|v| v.to_string())))
        .collect();
    let class_var = if has_class { variables.pop() } else { None };
    let domain = Domain::new(variables, class_var);

    let data = DenseDataset::new(domain, values.as_array().to_owned())?;
    let config = InducerConfig::new(support, confidence)
        .with_max_itemsets(max_itemsets)
        .with_classification_rules(classification_rules);
    let rules = AssociationRulesInducer::new(config).induce(&data)?;

    let domain = data.domain();
    Ok(rules
        .iter()
        .map(|rule| rule_tuple(rule, |item| domain.item_name(item)))
        .collect())
}

/// Rules from a binary transaction matrix; items are column indices.
#[pyfunction]
#[pyo3(signature = (transactions, support=0.3, confidence=0.0, max_itemsets=DEFAULT_MAX_ITEMSETS))]
fn association_rules_sparse(
    transactions: PyReadonlyArray2<'_, i32>,
    support: f64,
    confidence: f64,
    max_itemsets: usize,
) -> PyResult<Vec<RuleTuple<usize>>> {
    let data = SparseDataset::from_matrix(transactions.as_array());
    let config = InducerConfig::new(support, confidence).with_max_itemsets(max_itemsets);
    let rules = SparseAssociationRulesInducer::new(config).induce(&data)?;
    Ok(rules
        .iter()
        .map(|rule| {
            rule_tuple(rule, |item| match *item {
                Item::Id(id) => id,
                Item::Attribute { index, .. } => index,
            })
        })
        .collect())
}

/// Frequent itemsets of a binary transaction matrix, one array per size.
#[pyfunction]
#[pyo3(signature = (transactions, support=0.3, max_itemsets=DEFAULT_MAX_ITEMSETS))]
fn frequent_itemsets_sparse<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    support: f64,
    max_itemsets: usize,
) -> PyResult<Vec<Bound<'py, PyArray2<usize>>>> {
    let data = SparseDataset::from_matrix(transactions.as_array());
    let config = InducerConfig::new(support, 0.0).with_max_itemsets(max_itemsets);
    let itemsets = SparseAssociationRulesInducer::new(config).itemsets(&data)?;

    let mut result = Vec::new();
    for level in itemsets.levels() {
        if level.is_empty() {
            continue;
        }
        result.push(level_to_array(py, level)?);
    }
    Ok(result)
}

#[pymodule]
fn arules(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(association_rules_dense, m)?)?;
    m.add_function(wrap_pyfunction!(association_rules_sparse, m)?)?;
    m.add_function(wrap_pyfunction!(frequent_itemsets_sparse, m)?)?;
    Ok(())
}
