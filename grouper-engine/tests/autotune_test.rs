//! Grid-search behavior over a small two-group fixture.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use grouper_core::events::{GrouperEventHandler, TrialCompleteEvent, TuneCompleteEvent};
use grouper_core::traits::EmbeddingProvider;
use grouper_core::types::{ArticleRecord, EmbeddingSet};
use grouper_core::TuneError;
use grouper_engine::{
    autotune, AutotuneEngine, HashEmbedder, ParamGrid, TrialFailurePolicy, TuneOptions,
};

fn fixture_articles() -> Vec<ArticleRecord> {
    let specs = [
        ("g0.pdf", "Community Detection in Graphs", "graphs, modularity"),
        ("g1.pdf", "Scalable Graph Clustering", "graphs, clustering"),
        ("g2.pdf", "Resolution Limits of Modularity", "graphs, resolution"),
        ("n0.pdf", "Neural Text Embeddings", "embeddings, neural"),
        ("n1.pdf", "Contrastive Sentence Embeddings", "embeddings, contrastive"),
        ("n2.pdf", "Evaluating Embedding Quality", "embeddings, evaluation"),
    ];
    specs
        .iter()
        .map(|(id, title, keywords)| {
            ArticleRecord::new(*id, format!("/data/{id}"), *title, "", *keywords, None)
        })
        .collect()
}

fn fixture_embeddings() -> EmbeddingSet {
    let pairs = vec![
        ("g0.pdf".to_string(), vec![1.0, 0.0, 0.0, 0.0]),
        ("g1.pdf".to_string(), vec![0.9, 0.1, 0.0, 0.0]),
        ("g2.pdf".to_string(), vec![0.95, 0.05, 0.0, 0.0]),
        ("n0.pdf".to_string(), vec![0.0, 0.0, 1.0, 0.0]),
        ("n1.pdf".to_string(), vec![0.0, 0.0, 0.9, 0.1]),
        ("n2.pdf".to_string(), vec![0.0, 0.0, 0.95, 0.05]),
    ];
    EmbeddingSet::from_pairs(pairs).unwrap()
}

fn fixture_grid() -> ParamGrid {
    ParamGrid {
        k_values: vec![2, 3],
        resolution_values: vec![0.8, 1.2],
        min_cluster_size_values: vec![2, 3],
    }
}

#[test]
fn test_every_grid_point_produces_a_trial() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let outcome = autotune(
        &articles,
        &embeddings,
        &fixture_grid(),
        &TuneOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.trials.len(), 8);
    assert!(outcome.trials.iter().all(|t| t.error.is_none()));
}

#[test]
fn test_best_dominates_every_trial() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let grid = fixture_grid();
    let outcome = autotune(&articles, &embeddings, &grid, &TuneOptions::default()).unwrap();

    let best_score = outcome.best.score_final;
    for trial in &outcome.trials {
        let score = trial.score().unwrap();
        assert!(score <= best_score, "{score} beats winner {best_score}");
    }
    assert!(grid.configs().contains(&outcome.best_config));
}

#[test]
fn test_single_worker_matches_parallel_selection() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let grid = fixture_grid();

    let serial = TuneOptions {
        max_workers: 1,
        ..TuneOptions::default()
    };
    let a = autotune(&articles, &embeddings, &grid, &serial).unwrap();
    let b = autotune(&articles, &embeddings, &grid, &TuneOptions::default()).unwrap();

    // Completion order may differ, but the optimum does not.
    assert_eq!(a.best.score_final, b.best.score_final);
    assert_eq!(a.best.assignment, b.best.assignment);
}

#[test]
fn test_failed_trial_is_recorded_and_search_continues() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    // k = 0 is invalid, so half the grid fails.
    let grid = ParamGrid {
        k_values: vec![0, 2],
        resolution_values: vec![1.0],
        min_cluster_size_values: vec![2],
    };
    let outcome = autotune(&articles, &embeddings, &grid, &TuneOptions::default()).unwrap();

    assert_eq!(outcome.trials.len(), 2);
    let failed: Vec<_> = outcome.trials.iter().filter(|t| t.error.is_some()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].config.k, 0);
    assert!(failed[0].score().is_none());
    assert_eq!(outcome.best_config.k, 2);
}

#[test]
fn test_propagate_policy_aborts_on_failure() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let grid = ParamGrid {
        k_values: vec![0],
        resolution_values: vec![1.0],
        min_cluster_size_values: vec![2],
    };
    let options = TuneOptions {
        failure_policy: TrialFailurePolicy::Propagate,
        ..TuneOptions::default()
    };
    let err = autotune(&articles, &embeddings, &grid, &options).unwrap_err();
    assert!(matches!(err, TuneError::Trial { .. }));
}

#[test]
fn test_all_trials_failing_yields_no_successful_trial() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let grid = ParamGrid {
        k_values: vec![0],
        resolution_values: vec![1.0],
        min_cluster_size_values: vec![2, 3],
    };
    let err = autotune(&articles, &embeddings, &grid, &TuneOptions::default()).unwrap_err();
    assert!(matches!(err, TuneError::NoSuccessfulTrial));
}

#[test]
fn test_empty_grid_is_rejected_before_any_work() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let grid = ParamGrid {
        k_values: vec![],
        resolution_values: vec![1.0],
        min_cluster_size_values: vec![2],
    };
    let err = autotune(&articles, &embeddings, &grid, &TuneOptions::default()).unwrap_err();
    assert!(matches!(err, TuneError::EmptyGrid));
}

struct StreamTimingHandler {
    start: Instant,
    first_complete_us: AtomicU64,
}

impl GrouperEventHandler for StreamTimingHandler {
    fn on_trial_complete(&self, _event: &TrialCompleteEvent) {
        let elapsed = self.start.elapsed().as_micros() as u64;
        let _ = self.first_complete_us.compare_exchange(
            u64::MAX,
            elapsed,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

#[test]
fn test_completion_events_stream_during_search() {
    // Corpus large enough that each trial takes measurable time. Six
    // trials over two workers: the first completion should land around
    // a third of the way through the run, never at the very end.
    let articles: Vec<ArticleRecord> = (0..400)
        .map(|i| {
            ArticleRecord::new(
                format!("p{i}.pdf"),
                format!("/data/p{i}.pdf"),
                format!("study number {i}"),
                format!("a longer abstract body for article {i}"),
                "keywords",
                None,
            )
        })
        .collect();
    let embeddings = HashEmbedder::new(32).embed(&articles).unwrap();
    let grid = ParamGrid {
        k_values: vec![4],
        resolution_values: vec![0.8, 1.0, 1.2],
        min_cluster_size_values: vec![2, 3],
    };
    let options = TuneOptions {
        max_workers: 2,
        ..TuneOptions::default()
    };

    let handler = Arc::new(StreamTimingHandler {
        start: Instant::now(),
        first_complete_us: AtomicU64::new(u64::MAX),
    });
    let mut engine = AutotuneEngine::new(options);
    engine.events_mut().register(handler.clone());
    engine.run(&articles, &embeddings, &grid).unwrap();

    let total_us = handler.start.elapsed().as_micros() as u64;
    let first_us = handler.first_complete_us.load(Ordering::SeqCst);
    assert_ne!(first_us, u64::MAX);
    assert!(
        first_us * 5 < total_us * 4,
        "first completion at {first_us}us of {total_us}us arrived with the batch"
    );
}

#[test]
fn test_outcome_round_trips_through_json() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let outcome = autotune(
        &articles,
        &embeddings,
        &fixture_grid(),
        &TuneOptions::default(),
    )
    .unwrap();

    let json = serde_json::to_string(&outcome).unwrap();
    let restored: grouper_engine::TuneOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.best_config, outcome.best_config);
    assert_eq!(restored.trials.len(), outcome.trials.len());
    assert_eq!(restored.best.assignment, outcome.best.assignment);
}

struct ProgressHandler {
    trials_seen: AtomicUsize,
    tune_complete: AtomicUsize,
    last_total: AtomicUsize,
    failed_count: AtomicUsize,
}

// Dispatcher swallows handler panics, so the handler only counts;
// all assertions happen back on the test thread.
impl GrouperEventHandler for ProgressHandler {
    fn on_trial_complete(&self, event: &TrialCompleteEvent) {
        self.trials_seen.fetch_add(1, Ordering::Relaxed);
        self.last_total.store(event.total, Ordering::Relaxed);
    }

    fn on_tune_complete(&self, event: &TuneCompleteEvent) {
        self.tune_complete.fetch_add(1, Ordering::Relaxed);
        self.failed_count.store(event.failed_count, Ordering::Relaxed);
    }
}

#[test]
fn test_progress_events_fire_once_per_trial() {
    let articles = fixture_articles();
    let embeddings = fixture_embeddings();
    let handler = Arc::new(ProgressHandler {
        trials_seen: AtomicUsize::new(0),
        tune_complete: AtomicUsize::new(0),
        last_total: AtomicUsize::new(0),
        failed_count: AtomicUsize::new(usize::MAX),
    });

    let mut engine = AutotuneEngine::new(TuneOptions::default());
    engine.events_mut().register(handler.clone());
    engine
        .run(&articles, &embeddings, &fixture_grid())
        .unwrap();

    assert_eq!(handler.trials_seen.load(Ordering::Relaxed), 8);
    assert_eq!(handler.last_total.load(Ordering::Relaxed), 8);
    assert_eq!(handler.tune_complete.load(Ordering::Relaxed), 1);
    assert_eq!(handler.failed_count.load(Ordering::Relaxed), 0);
}
