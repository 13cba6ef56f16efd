use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};
use crate::rules::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarKind {
    Discrete { values: Vec<String> },
    Continuous,
}

/// A column of a dense dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
}

impl Variable {
    pub fn discrete<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Discrete {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self.kind, VarKind::Continuous)
    }

    /// Number of values of a discrete variable; `None` for continuous ones.
    pub fn n_values(&self) -> Option<usize> {
        match &self.kind {
            VarKind::Discrete { values } => Some(values.len()),
            VarKind::Continuous => None,
        }
    }

    pub fn value_name(&self, value: usize) -> String {
        match &self.kind {
            VarKind::Discrete { values } => values
                .get(value)
                .cloned()
                .unwrap_or_else(|| value.to_string()),
            VarKind::Continuous => value.to_string(),
        }
    }
}

/// Attributes followed by an optional class variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    attributes: Vec<Variable>,
    class_var: Option<Variable>,
}

impl Domain {
    pub fn new(attributes: Vec<Variable>, class_var: Option<Variable>) -> Self {
        Self {
            attributes,
            class_var,
        }
    }

    pub fn attributes(&self) -> &[Variable] {
        &self.attributes
    }

    pub fn class_var(&self) -> Option<&Variable> {
        self.class_var.as_ref()
    }

    /// The class is always the last variable.
    pub fn class_index(&self) -> Option<usize> {
        self.class_var.as_ref().map(|_| self.attributes.len())
    }

    pub fn n_variables(&self) -> usize {
        self.attributes.len() + usize::from(self.class_var.is_some())
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.attributes.iter().chain(self.class_var.iter())
    }

    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables().nth(index)
    }

    pub fn first_continuous(&self) -> Option<&Variable> {
        self.variables().find(|var| var.is_continuous())
    }

    pub fn item_name(&self, item: &Item) -> String {
        match *item {
            Item::Attribute { index, value } => match self.variable(index) {
                Some(var) => format!("{}={}", var.name, var.value_name(value)),
                None => item.to_string(),
            },
            Item::Id(_) => item.to_string(),
        }
    }
}

fn check_weights(weights: &[f64], n_rows: usize) -> Result<()> {
    if weights.len() != n_rows {
        return Err(MiningError::invalid(format!(
            "expected {} weights, got {}",
            n_rows,
            weights.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(MiningError::invalid(format!("invalid row weight {}", w)));
    }
    Ok(())
}

/// Rows of discrete values: `values[[row, var]]` is the index of the
/// variable's value, any negative number marks an absent value.
#[derive(Debug, Clone)]
pub struct DenseDataset {
    domain: Domain,
    values: Array2<i32>,
    weights: Option<Vec<f64>>,
}

impl DenseDataset {
    pub fn new(domain: Domain, values: Array2<i32>) -> Result<Self> {
        if values.ncols() != domain.n_variables() {
            return Err(MiningError::invalid(format!(
                "domain has {} variables but data has {} columns",
                domain.n_variables(),
                values.ncols()
            )));
        }
        Ok(Self {
            domain,
            values,
            weights: None,
        })
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        check_weights(&weights, self.n_rows())?;
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_variables(&self) -> usize {
        self.values.ncols()
    }

    pub fn weight(&self, row: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[row])
    }

    pub fn total_weight(&self) -> f64 {
        self.weights
            .as_ref()
            .map_or(self.n_rows() as f64, |w| w.iter().sum())
    }

    pub fn value(&self, row: usize, var: usize) -> Option<usize> {
        let v = self.values[[row, var]];
        (v >= 0).then_some(v as usize)
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<usize>> + '_ {
        (0..self.n_variables()).map(move |var| self.value(row, var))
    }

    pub fn row_items(&self, row: usize) -> Vec<Item> {
        self.row(row)
            .enumerate()
            .filter_map(|(index, value)| value.map(|value| Item::Attribute { index, value }))
            .collect()
    }
}

/// Rows of item ids, each sorted ascending without duplicates.
#[derive(Debug, Clone)]
pub struct SparseDataset {
    rows: Vec<Vec<usize>>,
    weights: Option<Vec<f64>>,
    universe: Vec<usize>,
}

impl SparseDataset {
    pub fn new(mut rows: Vec<Vec<usize>>) -> Self {
        rows.par_iter_mut().for_each(|row| {
            row.sort_unstable();
            row.dedup();
        });
        let mut universe: Vec<usize> = rows.iter().flatten().copied().collect();
        universe.par_sort_unstable();
        universe.dedup();
        Self {
            rows,
            weights: None,
            universe,
        }
    }

    /// Converts a binary transaction matrix; every column is an item,
    /// present in a row when its entry is non-zero.
    pub fn from_matrix(transactions: ArrayView2<i32>) -> Self {
        let num_items = transactions.ncols();
        let rows: Vec<Vec<usize>> = (0..transactions.nrows())
            .into_par_iter()
            .map(|i| {
                (0..num_items)
                    .filter(|&j| transactions[[i, j]] != 0)
                    .collect::<Vec<usize>>()
            })
            .collect();
        Self {
            rows,
            weights: None,
            universe: (0..num_items).collect(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        check_weights(&weights, self.rows.len())?;
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn weight(&self, row: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[row])
    }

    pub fn total_weight(&self) -> f64 {
        self.weights
            .as_ref()
            .map_or(self.rows.len() as f64, |w| w.iter().sum())
    }

    /// All item ids, ascending.
    pub fn universe(&self) -> &[usize] {
        &self.universe
    }

    pub fn row_items(&self, row: usize) -> Vec<Item> {
        self.rows[row].iter().map(|&id| Item::Id(id)).collect()
    }
}

/// The two data shapes the miners understand.
#[derive(Debug, Clone)]
pub enum Dataset {
    Dense(DenseDataset),
    Sparse(SparseDataset),
}

impl From<DenseDataset> for Dataset {
    fn from(data: DenseDataset) -> Self {
        Dataset::Dense(data)
    }
}

impl From<SparseDataset> for Dataset {
    fn from(data: SparseDataset) -> Self {
        Dataset::Sparse(data)
    }
}
