use arules::{
    AssociationRulesInducer, DenseDataset, Domain, InducerConfig, SparseAssociationRulesInducer,
    SparseDataset, Variable,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate synthetic transaction data
///
/// Parameters:
/// - num_transactions: Number of transactions
/// - num_items: Total number of possible items
/// - avg_transaction_size: Average items per transaction
/// - density: How dense the data is (0.0-1.0)
fn generate_transactions(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
    density: f64,
) -> Array2<i32> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = vec![0i32; num_transactions * num_items];

    for tx_idx in 0..num_transactions {
        let random_factor: f64 = rng.r#gen();
        let num_items_in_tx = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;
        let num_items_in_tx = num_items_in_tx.min(num_items);

        for _ in 0..num_items_in_tx {
            let density_check: f64 = rng.r#gen();
            if density_check < density {
                let item = rng.gen_range(0..num_items);
                data[tx_idx * num_items + item] = 1;
            }
        }
    }

    Array2::from_shape_vec((num_transactions, num_items), data).unwrap()
}

/// Attribute/value rows where value 0 dominates, so that longer itemsets
/// stay frequent.
fn generate_table(num_rows: usize, num_attributes: usize, num_values: usize) -> DenseDataset {
    let mut rng = StdRng::seed_from_u64(7);
    let values = Array2::from_shape_fn((num_rows, num_attributes), |_| {
        if rng.gen_bool(0.6) {
            0
        } else {
            rng.gen_range(0..num_values as i32)
        }
    });
    let attributes = (0..num_attributes)
        .map(|i| Variable::discrete(format!("a{}", i), (0..num_values).map(|v| v.to_string())))
        .collect();
    DenseDataset::new(Domain::new(attributes, None), values).unwrap()
}

/// Benchmark the sparse inducer with different dataset sizes
fn bench_sparse_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_scaling");
    let config = InducerConfig::new(0.1, 0.5).with_max_itemsets(1_000_000);

    let configs = vec![
        ("small_100tx", 100, 20, 5),
        ("medium_500tx", 500, 50, 10),
        ("large_1000tx", 1000, 100, 15),
    ];

    for (name, num_tx, num_items, avg_size) in configs {
        let data = SparseDataset::from_matrix(generate_transactions(num_tx, num_items, avg_size, 0.7).view());
        let inducer = SparseAssociationRulesInducer::new(config.clone());

        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| inducer.induce(black_box(data)));
        });
    }

    group.finish();
}

/// Benchmark both inducers with different support thresholds
fn bench_min_support(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_support");

    let sparse = SparseDataset::from_matrix(generate_transactions(1000, 50, 10, 0.7).view());
    let dense = generate_table(1000, 10, 4);

    for &min_sup in &[0.1, 0.2, 0.3, 0.5] {
        let config = InducerConfig::new(min_sup, 0.5).with_max_itemsets(1_000_000);

        let inducer = SparseAssociationRulesInducer::new(config.clone());
        group.bench_with_input(BenchmarkId::new("sparse", min_sup), &sparse, |b, data| {
            b.iter(|| inducer.induce(black_box(data)));
        });

        let inducer = AssociationRulesInducer::new(config);
        group.bench_with_input(BenchmarkId::new("dense", min_sup), &dense, |b, data| {
            b.iter(|| inducer.induce(black_box(data)));
        });
    }

    group.finish();
}

/// Benchmark the dense inducer with and without stored rows
fn bench_dense_store_examples(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_store_examples");
    let dense = generate_table(2000, 8, 3);

    for store in [false, true] {
        let config = InducerConfig::new(0.2, 0.6).with_stored_examples(store);
        let inducer = AssociationRulesInducer::new(config);
        group.bench_with_input(BenchmarkId::from_parameter(store), &dense, |b, data| {
            b.iter(|| inducer.induce(black_box(data)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sparse_scaling,
    bench_min_support,
    bench_dense_store_examples
);
criterion_main!(benches);
