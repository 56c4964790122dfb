// Top-k reporting: turns a finalized score matrix into ranked topics per text.
//
// Columns are ordered by descending score with a stable sort, so equal scores
// keep their vocabulary order. `top_k == 1` yields a single entry per text
// rather than a one-element list.

use serde::Serialize;

use super::matrix::ScoreMatrix;
use crate::error::ConfigError;

/// What to emit for each ranked topic.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub top_k: usize,
    /// Emit topic names instead of column indices
    pub return_labels: bool,
    /// Emit the score alongside each topic
    pub return_confidences: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_k: 1,
            return_labels: true,
            return_confidences: false,
        }
    }
}

impl ReportOptions {
    /// Reject a `top_k` that can't be satisfied by `num_topics` columns.
    pub fn validate(&self, num_topics: usize) -> Result<(), ConfigError> {
        if self.top_k == 0 || self.top_k > num_topics {
            return Err(ConfigError::TopK {
                top_k: self.top_k,
                topics: num_topics,
            });
        }
        Ok(())
    }
}

/// A topic identified by name or by column index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TopicId {
    Label(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTopic {
    pub topic: TopicId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Ranked topics for one text: a single entry when `top_k == 1`,
/// otherwise `top_k` entries in descending confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ranking {
    Single(RankedTopic),
    Many(Vec<RankedTopic>),
}

impl Ranking {
    /// View either shape as a slice.
    pub fn as_slice(&self) -> &[RankedTopic] {
        match self {
            Ranking::Single(t) => std::slice::from_ref(t),
            Ranking::Many(ts) => ts,
        }
    }

    pub fn best(&self) -> Option<&RankedTopic> {
        self.as_slice().first()
    }
}

/// Column indices of `row` sorted by descending score; ties keep index order.
pub fn rank_columns(row: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| row[b].total_cmp(&row[a]));
    order
}

/// Rank every row of `scores` and keep the best `options.top_k` topics.
///
/// `topics` names the columns of `scores` and must match its width.
pub fn top_k(
    scores: &ScoreMatrix,
    topics: &[String],
    options: &ReportOptions,
) -> anyhow::Result<Vec<Ranking>> {
    options.validate(topics.len())?;
    if scores.num_cols() != topics.len() {
        anyhow::bail!(
            "Reporting: score matrix has {} columns but {} topic names were given",
            scores.num_cols(),
            topics.len()
        );
    }

    let rankings = scores
        .rows()
        .map(|row| {
            let mut ranked: Vec<RankedTopic> = rank_columns(row)
                .into_iter()
                .take(options.top_k)
                .map(|col| RankedTopic {
                    topic: if options.return_labels {
                        TopicId::Label(topics[col].clone())
                    } else {
                        TopicId::Index(col)
                    },
                    confidence: options.return_confidences.then_some(row[col]),
                })
                .collect();

            if options.top_k == 1 {
                Ranking::Single(ranked.remove(0))
            } else {
                Ranking::Many(ranked)
            }
        })
        .collect();

    Ok(rankings)
}
