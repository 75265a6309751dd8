//! End-to-end experiment tests over on-disk document lists.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lectio::analysis::morphology::FunctionWordAnalyzer;
use lectio::error::{LectioError, Result};
use lectio::experiment::{Experiment, ExperimentConfig};
use tempfile::TempDir;

const INTERESTING: &[&str] = &[
    "Новый компилятор Rust ускоряет сборку ядра",
    "Протокол QUIC и новый парсер для ядра",
    "Алгоритм сжатия для распределённого хранилища",
    "Как устроен планировщик ядра Linux",
    "Компилятор научился векторизовать циклы",
    "Распределённое хранилище на Rust без блокировок",
    "Парсер протокола с нулевым копированием",
    "Алгоритм консенсуса для хранилища",
    "Ядро получило новый планировщик",
    "Векторизация циклов в компиляторе",
    "Хранилище с журналом упреждающей записи",
    "Протокол репликации и алгоритм выборов",
];

const BORING: &[&str] = &[
    "Погода на выходные: дождь и ветер",
    "Пробки в центре города к вечеру",
    "Гороскоп на неделю для всех знаков",
    "Скидки в магазинах города до конца недели",
    "Погода испортится к вечеру",
    "Гороскоп обещает удачную неделю",
    "Пробки на выезде из города",
    "Скидки на зимнюю одежду",
    "Ветер и дождь в выходные",
    "Магазины города работают до вечера",
    "Знаки зодиака и удачная неделя",
    "Одежда со скидками в центре",
];

fn write_corpus(dir: &Path, prefix: &str, texts: &[&str]) -> PathBuf {
    let mut list = String::new();
    for (i, text) in texts.iter().enumerate() {
        let path = dir.join(format!("{prefix}_{i}.txt"));
        fs::write(&path, text).unwrap();
        // Blank lines and padding in list files are ignored.
        list.push_str(&format!("  {}\n\n", path.display()));
    }
    let list_path = dir.join(format!("{prefix}.list"));
    fs::write(&list_path, list).unwrap();
    list_path
}

fn config_file(dir: &Path, interesting: &Path, boring: &Path) -> PathBuf {
    let config = serde_json::json!({
        "interesting_list": interesting,
        "boring_list": boring,
        "border": 16,
        "seed": 3,
        "cv": {"n_splits": 2},
        "grid": {
            "classifier__penalty": ["elasticnet"],
            "classifier__alpha": [0.001, 0.00001],
            "classifier__l1_ratio": [0.0, 0.15],
            "tfidf__min_df": [1],
            "tfidf__max_df": [1.0]
        }
    });
    let path = dir.join("experiment.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn experiment_in(dir: &TempDir) -> Result<Experiment> {
    let interesting = write_corpus(dir.path(), "interesting", INTERESTING);
    let boring = write_corpus(dir.path(), "boring", BORING);
    let config = ExperimentConfig::load(config_file(dir.path(), &interesting, &boring))?;
    Experiment::new(config, Arc::new(FunctionWordAnalyzer::new()))
}

#[test]
fn test_experiment_from_config_file() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let experiment = experiment_in(&dir)?;

    let corpus = experiment.load_corpus()?;
    assert_eq!(corpus.len(), 24);
    // "и" is a conjunction and "на" a preposition; both are removed.
    assert!(corpus.iter().all(|doc| !doc.text().split(' ').any(|w| w == "и" || w == "на")));

    let report = experiment.run()?;
    assert_eq!(report.n_documents, 24);
    assert_eq!(report.n_train, 16);
    assert_eq!(report.n_test, 8);
    assert_eq!(report.combinations_evaluated, 4);
    assert_eq!(report.combinations_failed, 0);
    assert!(report.vocabulary_size > 0);
    for score in [report.baseline_score, report.best_cv_score, report.test_score] {
        assert!((0.0..=1.0).contains(&score));
    }
    assert_eq!(report.best_params.len(), 5);
    Ok(())
}

#[test]
fn test_experiment_is_reproducible() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let first = experiment_in(&dir)?.run()?;
    let second = experiment_in(&dir)?.run()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_missing_document_is_fatal() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let experiment = experiment_in(&dir)?;
    fs::remove_file(dir.path().join("boring_3.txt")).unwrap();

    let result = experiment.run();
    assert!(matches!(result, Err(LectioError::Io(_))));
    Ok(())
}

#[test]
fn test_missing_config_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = ExperimentConfig::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(LectioError::Io(_))));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(ExperimentConfig::load(&bad), Err(LectioError::Json(_))));
}
