// Unit tests for the mapping aggregator: max-pooling fine scores into coarse
// topics, cross-topic softmax, and construction-time mapping checks.

mod common;

use std::sync::Arc;

use common::{strings, StubModel};
use nlitopic::classify::aggregator::MappingAggregator;
use nlitopic::classify::mapping::TopicMapping;
use nlitopic::classify::report::{RankedTopic, Ranking, ReportOptions, TopicId};
use nlitopic::classify::traits::TopicClassifier;
use nlitopic::error::ConfigError;

const QUERY: &str = "The domain of the sentence is about";

fn sports_mapping() -> TopicMapping {
    TopicMapping::new([("football", "sport"), ("rugby", "sport"), ("law", "law")]).unwrap()
}

fn scripted(topic: &str) -> f32 {
    match topic {
        "football" => 0.2,
        "rugby" => 0.9,
        "law" => 0.1,
        _ => 0.5,
    }
}

fn aggregator(model: Arc<StubModel>) -> MappingAggregator {
    MappingAggregator::new(
        model,
        strings(&["sport", "law"]),
        sports_mapping(),
        QUERY,
        2,
    )
    .unwrap()
}

// ============================================================
// Worked example: football/rugby -> sport, law -> law
// ============================================================

#[test]
fn worked_example_pooled_values() {
    let agg = aggregator(Arc::new(StubModel::new(|_, t| scripted(t))));
    let fine = agg
        .fine_scorer()
        .score(&strings(&["Rugby final tonight."]), 1)
        .unwrap();
    let pooled = agg.max_pool(&fine).unwrap();

    assert!((pooled.row(0)[0] - 0.9).abs() < 1e-5, "sport = max(0.2, 0.9)");
    assert!((pooled.row(0)[1] - 0.1).abs() < 1e-5, "law = 0.1");
}

#[test]
fn worked_example_softmax_and_top_label() {
    let agg = aggregator(Arc::new(StubModel::new(|_, t| scripted(t))));
    let texts = strings(&["Rugby final tonight."]);

    let m = agg.score(&texts, 1).unwrap();
    let sport = 0.9f64.exp() / (0.9f64.exp() + 0.1f64.exp());
    assert!((m.row(0)[0] - sport).abs() < 1e-5);
    assert!((m.row(0)[1] - (1.0 - sport)).abs() < 1e-5);
    assert!((m.row(0)[0] - 0.689).abs() < 1e-3);

    let top = agg
        .predict_topics(&texts, 1, &ReportOptions::default())
        .unwrap();
    assert_eq!(
        top,
        vec![Ranking::Single(RankedTopic {
            topic: TopicId::Label("sport".to_string()),
            confidence: None,
        })]
    );
}

// ============================================================
// Max-pool and normalization properties
// ============================================================

#[test]
fn coarse_value_is_max_of_its_fine_columns() {
    // Fine columns 2, 5, 7 -> "x"; the rest -> "y"
    let fine = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let mapping = TopicMapping::new(fine.iter().enumerate().map(|(j, f)| {
        let coarse = if [2, 5, 7].contains(&j) { "x" } else { "y" };
        (*f, coarse)
    }))
    .unwrap();

    let model = Arc::new(StubModel::new(|premise, topic| {
        // Varies with both text and topic
        ((premise.len() * 31 + topic.as_bytes()[0] as usize * 17) % 89) as f32 / 100.0 + 0.01
    }));
    let agg = MappingAggregator::new(model, strings(&["y", "x"]), mapping, QUERY, 2).unwrap();
    assert_eq!(agg.columns_for("x"), Some(&[2, 5, 7][..]));

    let texts = strings(&["one", "three", "seventeen", "a much longer sentence here"]);
    let fine_m = agg.fine_scorer().score(&texts, 3).unwrap();
    let pooled = agg.max_pool(&fine_m).unwrap();

    for i in 0..texts.len() {
        let f = fine_m.row(i);
        assert_eq!(pooled.row(i)[1], f[2].max(f[5]).max(f[7]));
        let y_max = [0, 1, 3, 4, 6]
            .iter()
            .map(|&j| f[j])
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(pooled.row(i)[0], y_max);
    }
}

#[test]
fn coarse_rows_sum_to_one() {
    let agg = aggregator(Arc::new(StubModel::new(|p, t| {
        ((p.len() + t.len()) % 10) as f32 / 10.0 + 0.05
    })));
    let m = agg
        .score(&strings(&["a", "bb", "ccc", "dddd", "eeeee"]), 2)
        .unwrap();
    assert_eq!(m.num_rows(), 5);
    for row in m.rows() {
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn coarse_results_do_not_depend_on_batch_size() {
    let texts = strings(&["a", "bb", "ccc", "dddd", "eeeee"]);
    let run = |bs| {
        let agg = aggregator(Arc::new(StubModel::new(|p, t| {
            ((p.len() * 3 + t.len()) % 10) as f32 / 10.0 + 0.05
        })));
        agg.score(&texts, bs).unwrap()
    };
    let reference = run(1);
    assert_eq!(run(2), reference);
    assert_eq!(run(texts.len()), reference);
}

#[test]
fn scoring_is_deterministic() {
    let agg = aggregator(Arc::new(StubModel::new(|_, t| scripted(t))));
    let texts = strings(&["first", "second"]);
    assert_eq!(agg.score(&texts, 1).unwrap(), agg.score(&texts, 1).unwrap());
}

#[test]
fn empty_input_has_coarse_width() {
    let model = Arc::new(StubModel::new(|_, t| scripted(t)));
    let agg = aggregator(model.clone());
    let m = agg.score(&[], 8).unwrap();
    assert_eq!(m.num_rows(), 0);
    assert_eq!(m.num_cols(), 2);
    assert_eq!(model.infer_calls(), 0);
}

#[test]
fn topics_are_coarse_and_fine_scorer_keeps_mapping_order() {
    let agg = aggregator(Arc::new(StubModel::new(|_, t| scripted(t))));
    assert_eq!(agg.topics(), &strings(&["sport", "law"])[..]);
    assert_eq!(
        agg.fine_scorer().topics(),
        &strings(&["football", "rugby", "law"])[..]
    );
}

// ============================================================
// Configuration errors raised before any inference
// ============================================================

#[test]
fn coarse_topic_without_fine_topics_fails_at_construction() {
    let model = Arc::new(StubModel::new(|_, t| scripted(t)));
    let err = MappingAggregator::new(
        model.clone(),
        strings(&["sport", "law", "politics"]),
        sports_mapping(),
        QUERY,
        2,
    )
    .err()
    .unwrap();

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::UnmappedCoarseTopic {
            topic: "politics".to_string()
        })
    );
    assert_eq!(model.infer_calls(), 0);
}

#[test]
fn fine_topic_mapped_outside_coarse_vocabulary_fails() {
    let model = Arc::new(StubModel::new(|_, t| scripted(t)));
    let err = MappingAggregator::new(model, strings(&["sport"]), sports_mapping(), QUERY, 2)
        .err()
        .unwrap();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownCoarseTopic { fine, coarse }) if fine == "law" && coarse == "law"
    ));
}

#[test]
fn duplicate_coarse_topic_fails() {
    let model = Arc::new(StubModel::new(|_, t| scripted(t)));
    let err = MappingAggregator::new(
        model,
        strings(&["sport", "law", "sport"]),
        sports_mapping(),
        QUERY,
        2,
    )
    .err()
    .unwrap();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::DuplicateTopic { .. })
    ));
}

#[test]
fn max_pool_rejects_wrong_width() {
    let agg = aggregator(Arc::new(StubModel::new(|_, t| scripted(t))));
    let wrong = nlitopic::classify::matrix::ScoreMatrix::from_rows(2, vec![vec![0.1, 0.2]]).unwrap();
    assert!(agg.max_pool(&wrong).is_err());
}
