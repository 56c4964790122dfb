// NLI topic scorer: one entailment probability per (text, topic) pair.
//
// Each text becomes the premise of `topics.len()` hypotheses:
//
//   "<text> <sep> The domain of the sentence is about \"<topic>\"."
//
// The model's 3-way logits for each hypothesis are softmaxed on their own,
// and the entailment column is the pair's score. Scores in a row are
// independent: they don't sum to 1 across topics.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use super::batcher;
use super::matrix::{softmax, ScoreMatrix};
use super::traits::TopicClassifier;
use crate::error::ConfigError;
use crate::nli::traits::{NliModel, NLI_CLASSES};

/// Placeholder for the topic inside a query phrase.
const TOPIC_SLOT: &str = "{}";

/// Scores texts against a fixed, ordered topic vocabulary.
pub struct NliTopicScorer {
    model: Arc<dyn NliModel>,
    topics: Vec<String>,
    query_phrase: String,
    entailment_position: usize,
}

impl NliTopicScorer {
    /// Build a scorer over `topics`.
    ///
    /// `query_phrase` may contain `{}` where the topic goes; otherwise the
    /// topic is appended in quotes. `entailment_position` is the index of the
    /// entailment class in the model's logits.
    pub fn new(
        model: Arc<dyn NliModel>,
        topics: Vec<String>,
        query_phrase: impl Into<String>,
        entailment_position: usize,
    ) -> Result<Self> {
        if topics.is_empty() {
            return Err(ConfigError::EmptyVocabulary.into());
        }
        let mut seen = HashSet::with_capacity(topics.len());
        for topic in &topics {
            if !seen.insert(topic.as_str()) {
                return Err(ConfigError::DuplicateTopic {
                    topic: topic.clone(),
                }
                .into());
            }
        }
        if entailment_position >= NLI_CLASSES {
            return Err(ConfigError::EntailmentPosition {
                position: entailment_position,
                classes: NLI_CLASSES,
            }
            .into());
        }

        Ok(Self {
            model,
            topics,
            query_phrase: query_phrase.into(),
            entailment_position,
        })
    }

    /// The full premise + hypothesis sentence sent to the model.
    pub fn hypothesis(&self, text: &str, topic: &str) -> String {
        let claim = if self.query_phrase.contains(TOPIC_SLOT) {
            self.query_phrase.replacen(TOPIC_SLOT, topic, 1)
        } else {
            format!("{} \"{}\".", self.query_phrase, topic)
        };
        format!("{} {} {}", text, self.model.separator(), claim)
    }

    /// Encode + infer one chunk and reduce each logits row to P(entailment).
    fn entailment_probabilities(&self, sentences: &[String]) -> Result<Vec<f64>> {
        let token_ids = self
            .model
            .encode(sentences)
            .context("Tokenizing hypotheses")?;
        let logits = self.model.infer(&token_ids).context("Running NLI model")?;

        logits
            .iter()
            .map(|row| {
                if row.len() != NLI_CLASSES {
                    anyhow::bail!(
                        "Scoring: expected {} NLI logits per hypothesis, got {}",
                        NLI_CLASSES,
                        row.len()
                    );
                }
                if row.iter().any(|l| !l.is_finite()) {
                    anyhow::bail!("Scoring: model returned non-finite logits {:?}", row);
                }
                let row: Vec<f64> = row.iter().map(|&l| l as f64).collect();
                Ok(softmax(&row)[self.entailment_position])
            })
            .collect()
    }
}

impl TopicClassifier for NliTopicScorer {
    fn topics(&self) -> &[String] {
        &self.topics
    }

    fn score(&self, texts: &[String], batch_size: usize) -> Result<ScoreMatrix> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize.into());
        }

        let hypotheses: Vec<String> = texts
            .iter()
            .flat_map(|text| {
                self.topics
                    .iter()
                    .map(move |topic| self.hypothesis(text, topic))
            })
            .collect();

        debug!(
            texts = texts.len(),
            topics = self.topics.len(),
            hypotheses = hypotheses.len(),
            batch_size,
            "Scoring texts against topic vocabulary"
        );

        batcher::run(&hypotheses, batch_size, self.topics.len(), |chunk| {
            self.entailment_probabilities(chunk)
        })
    }
}
