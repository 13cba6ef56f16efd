/// A row that supports an itemset, with the row's weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowWeight {
    pub row: usize,
    pub weight: f64,
}

/// Rows supporting an itemset, strictly ascending by row id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedRowSet {
    rows: Vec<RowWeight>,
}

impl WeightedRowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row; rows must be pushed in ascending order.
    pub fn push(&mut self, row: usize, weight: f64) {
        debug_assert!(self.rows.last().map_or(true, |last| last.row < row));
        self.rows.push(RowWeight { row, weight });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowWeight> {
        self.rows.iter()
    }

    pub fn row_ids(&self) -> Vec<usize> {
        self.rows.iter().map(|rw| rw.row).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.rows.iter().map(|rw| rw.weight).sum()
    }

    /// Merge-intersects two row sets, returning the common rows and the sum
    /// of their weights. Runs in `O(|self| + |other|)`.
    pub fn intersect(&self, other: &WeightedRowSet) -> (WeightedRowSet, f64) {
        let mut intersection = WeightedRowSet::new();
        let mut support = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.rows.len() && j < other.rows.len() {
            let (a, b) = (self.rows[i], other.rows[j]);
            if a.row < b.row {
                i += 1;
            } else if a.row > b.row {
                j += 1;
            } else {
                intersection.rows.push(a);
                support += a.weight;
                i += 1;
                j += 1;
            }
        }
        (intersection, support)
    }
}

impl FromIterator<(usize, f64)> for WeightedRowSet {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        let mut set = WeightedRowSet::new();
        for (row, weight) in iter {
            set.push(row, weight);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_and_sums_weights() {
        let a: WeightedRowSet = [(0, 1.0), (2, 0.5), (5, 2.0), (9, 1.0)].into_iter().collect();
        let b: WeightedRowSet = [(1, 3.0), (2, 0.5), (9, 1.0)].into_iter().collect();

        let (both, support) = a.intersect(&b);
        assert_eq!(both.row_ids(), vec![2, 9]);
        assert_eq!(support, 1.5);
        assert_eq!(both.total_weight(), support);
    }

    #[test]
    fn empty_intersection() {
        let a: WeightedRowSet = [(0, 1.0), (2, 1.0)].into_iter().collect();
        let b: WeightedRowSet = [(1, 1.0), (3, 1.0)].into_iter().collect();
        let (both, support) = a.intersect(&b);
        assert!(both.is_empty());
        assert_eq!(support, 0.0);

        let (none, _) = a.intersect(&WeightedRowSet::new());
        assert!(none.is_empty());
    }
}
