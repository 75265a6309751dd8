//! Criterion benchmarks for the Lectio classifier.
//!
//! Covers the hot paths of an experiment:
//! - Text normalization
//! - TF-IDF fitting and transformation
//! - SGD training
//! - A small cross-validated grid search

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lectio::analysis::analyzer::TextNormalizer;
use lectio::analysis::morphology::FunctionWordAnalyzer;
use lectio::corpus::Label;
use lectio::ml::{
    CvConfig, Estimator, GridSearch, ParameterGrid, PipelineParams, SgdClassifier, TfIdfParams,
    TfIdfVectorizer,
};

/// Generate labeled test documents for benchmarking.
fn generate_test_documents(count: usize) -> (Vec<String>, Vec<Label>) {
    let interesting = [
        "компилятор", "ядро", "протокол", "парсер", "алгоритм", "compiler", "kernel", "rust",
    ];
    let boring = [
        "погода", "пробки", "гороскоп", "сплетни", "скидки", "weather", "traffic", "sale",
    ];
    let shared = ["и", "в", "новости", "сегодня", "the", "of", "report", "город"];

    let mut documents = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    for i in 0..count {
        let positive = i % 2 == 0;
        let topic = if positive { &interesting } else { &boring };
        let doc_length = 40 + (i % 60);
        let mut words = Vec::with_capacity(doc_length);
        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % 8; // Pseudo-random distribution
            words.push(if j % 3 == 0 { topic[word_idx] } else { shared[word_idx] });
        }
        documents.push(words.join(" "));
        labels.push(Label::from_positive(positive));
    }
    (documents, labels)
}

/// Benchmark text normalization.
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    let normalizer = TextNormalizer::new(Arc::new(FunctionWordAnalyzer::new())).unwrap();
    let (texts, _) = generate_test_documents(100);

    group.throughput(Throughput::Elements(100));
    group.bench_function("normalize_batch_documents", |b| {
        b.iter(|| {
            for text in &texts {
                let result = normalizer.normalize(black_box(text));
                let _ = black_box(result);
            }
        })
    });

    group.finish();
}

/// Benchmark TF-IDF fitting and transformation.
fn bench_tfidf(c: &mut Criterion) {
    let mut group = c.benchmark_group("tfidf");

    let (texts, _) = generate_test_documents(500);

    group.bench_function("fit_500_documents", |b| {
        b.iter(|| {
            let mut vectorizer = TfIdfVectorizer::new(TfIdfParams::default()).unwrap();
            vectorizer.fit(black_box(&texts)).unwrap();
            black_box(vectorizer)
        })
    });

    let mut vectorizer = TfIdfVectorizer::new(TfIdfParams::default()).unwrap();
    vectorizer.fit(&texts).unwrap();
    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("transform_500_documents", |b| {
        b.iter(|| black_box(vectorizer.transform_all(black_box(&texts)).unwrap()))
    });

    group.finish();
}

/// Benchmark SGD training.
fn bench_sgd(c: &mut Criterion) {
    let mut group = c.benchmark_group("sgd");

    let (texts, labels) = generate_test_documents(500);
    let mut vectorizer = TfIdfVectorizer::new(TfIdfParams::default()).unwrap();
    let vectors = vectorizer.fit_transform(&texts).unwrap();

    group.bench_function("train_500_documents", |b| {
        b.iter(|| {
            let mut classifier = SgdClassifier::default();
            classifier.fit(black_box(&vectors), &labels).unwrap();
            black_box(classifier)
        })
    });

    group.finish();
}

/// Benchmark a small grid search, sequential and parallel.
fn bench_grid_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_search");
    group.sample_size(10);

    let (texts, labels) = generate_test_documents(100);
    let grid = ParameterGrid::new()
        .add("classifier__penalty", ["elasticnet"])
        .add("classifier__alpha", [1e-3, 1e-5])
        .add("classifier__l1_ratio", [0.0, 0.15])
        .add("tfidf__min_df", [0.01, 0.1]);
    let search = GridSearch::new(PipelineParams::default(), grid).with_cv(CvConfig::new(5));

    group.bench_function("sequential_8_combinations", |b| {
        b.iter(|| black_box(search.fit(&texts, &labels).unwrap().best_score))
    });

    let parallel = search.clone().parallel(true);
    group.bench_function("parallel_8_combinations", |b| {
        b.iter(|| black_box(parallel.fit(&texts, &labels).unwrap().best_score))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalization,
    bench_tfidf,
    bench_sgd,
    bench_grid_search
);

criterion_main!(benches);
