// Mapping aggregator: coarse topics on the outside, fine topics on the inside.
//
// The model is queried with the fine vocabulary (every key of the mapping).
// Each coarse topic then takes the max over its fine columns: a coarse topic
// applies if any of its senses is entailed. The pooled row is softmaxed
// across coarse topics, so unlike the fine scores the output is a
// distribution over mutually exclusive topics.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use super::mapping::TopicMapping;
use super::matrix::ScoreMatrix;
use super::scorer::NliTopicScorer;
use super::traits::TopicClassifier;
use crate::nli::traits::NliModel;

pub struct MappingAggregator {
    fine: NliTopicScorer,
    mapping: TopicMapping,
    coarse_topics: Vec<String>,
    /// `columns[k]` = fine columns pooled into coarse topic `k`
    columns: Vec<Vec<usize>>,
}

impl MappingAggregator {
    /// Build an aggregator reporting `coarse_topics`.
    ///
    /// All mapping checks happen here, before any inference: every coarse
    /// topic needs at least one fine topic and every fine topic must land
    /// in `coarse_topics`.
    pub fn new(
        model: Arc<dyn NliModel>,
        coarse_topics: Vec<String>,
        mapping: TopicMapping,
        query_phrase: impl Into<String>,
        entailment_position: usize,
    ) -> Result<Self> {
        let columns = mapping.inverse_index(&coarse_topics)?;
        let fine = NliTopicScorer::new(
            model,
            mapping.fine_topics(),
            query_phrase,
            entailment_position,
        )?;

        debug!(
            fine = mapping.len(),
            coarse = coarse_topics.len(),
            "Built topic mapping head"
        );

        Ok(Self {
            fine,
            mapping,
            coarse_topics,
            columns,
        })
    }

    /// The scorer over the fine vocabulary.
    pub fn fine_scorer(&self) -> &NliTopicScorer {
        &self.fine
    }

    pub fn mapping(&self) -> &TopicMapping {
        &self.mapping
    }

    /// Fine column indices pooled into `coarse`, if it is a known topic.
    pub fn columns_for(&self, coarse: &str) -> Option<&[usize]> {
        self.coarse_topics
            .iter()
            .position(|t| t == coarse)
            .map(|k| self.columns[k].as_slice())
    }

    /// Max-pool a fine score matrix into coarse columns (no normalization).
    pub fn max_pool(&self, fine: &ScoreMatrix) -> Result<ScoreMatrix> {
        if fine.num_cols() != self.mapping.len() {
            anyhow::bail!(
                "Aggregation: expected {} fine columns, got {}",
                self.mapping.len(),
                fine.num_cols()
            );
        }

        let mut pooled = ScoreMatrix::empty(self.coarse_topics.len());
        for row in fine.rows() {
            let coarse_row: Vec<f64> = self
                .columns
                .iter()
                .map(|cols| {
                    cols.iter()
                        .map(|&j| row[j])
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .collect();
            pooled.push_row(&coarse_row)?;
        }
        Ok(pooled)
    }
}

impl TopicClassifier for MappingAggregator {
    fn topics(&self) -> &[String] {
        &self.coarse_topics
    }

    fn score(&self, texts: &[String], batch_size: usize) -> Result<ScoreMatrix> {
        let fine = self.fine.score(texts, batch_size)?;
        let pooled = self.max_pool(&fine).context("Pooling fine topic scores")?;
        Ok(pooled.softmax_rows())
    }
}
