//! Criterion benchmarks for PhishGuard.
//!
//! Covers feature extraction, single and batch prediction, and forest fitting.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use phishguard::config::ClassifierConfig;
use phishguard::dataset::{Label, default_training_set};
use phishguard::detector::UrlClassifier;
use phishguard::features::{LAYOUT_VERSION, FeatureLayout, UrlFeatureExtractor};
use phishguard::ml::{BinaryClassifier, ForestConfig, RandomForest};

/// Benchmark feature extraction.
fn bench_feature_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_extraction");

    let extractor = UrlFeatureExtractor::new();
    let urls: Vec<String> = default_training_set()
        .into_iter()
        .map(|example| example.url)
        .collect();

    group.bench_function("extract_single_url", |b| {
        b.iter(|| {
            let result = extractor.extract(black_box("http://secure-update-7.tk/signin?id=42"));
            black_box(result)
        })
    });

    group.throughput(Throughput::Elements(urls.len() as u64));
    group.bench_function("extract_corpus", |b| {
        b.iter(|| {
            for url in &urls {
                let _ = black_box(extractor.extract(black_box(url)));
            }
        })
    });

    group.finish();
}

/// Benchmark prediction through the classifier.
fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let dir = tempfile::tempdir().expect("temp dir");
    let classifier =
        UrlClassifier::new(ClassifierConfig::with_model_path(dir.path().join("model.json")));
    classifier.train(None).expect("training on built-in corpus");

    let extractor = UrlFeatureExtractor::new();
    let features = extractor
        .extract("http://192.168.1.1/paypal-login")
        .expect("valid URL");

    group.bench_function("predict_features", |b| {
        b.iter(|| black_box(classifier.predict(black_box(&features))))
    });

    group.bench_function("classify_url", |b| {
        b.iter(|| black_box(classifier.classify_url(black_box("https://www.wikipedia.org"))))
    });

    group.finish();
}

/// Benchmark random forest fitting.
fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);

    let extractor = UrlFeatureExtractor::new();
    let mut rows = Vec::new();
    let mut labels: Vec<Label> = Vec::new();
    let mut layout = None;
    for example in default_training_set() {
        let vector = extractor.extract(&example.url).expect("corpus URLs are valid");
        let layout = layout.get_or_insert_with(|| FeatureLayout::from_vector(LAYOUT_VERSION, &vector));
        rows.push(layout.project(&vector).expect("same layout"));
        labels.push(example.label);
    }

    for n_estimators in [10, 100] {
        group.bench_function(format!("fit_{n_estimators}_trees"), |b| {
            b.iter(|| {
                let mut forest = RandomForest::new(ForestConfig {
                    n_estimators,
                    ..ForestConfig::default()
                });
                forest.fit(black_box(&rows), black_box(&labels)).expect("fit");
                black_box(forest)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_feature_extraction, bench_prediction, bench_forest_fit);

criterion_main!(benches);
