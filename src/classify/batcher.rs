// Inference batching: slices a flat list of hypothesis sentences into
// fixed-size model calls and stacks the results back into one matrix.
//
// Every input text expands into exactly `topics_per_item` consecutive
// hypotheses, so a chunk of `chunk_size` texts is `chunk_size * topics_per_item`
// sentences. The last chunk may be short. A failed chunk aborts the whole
// run: a missing chunk would shift every later row onto the wrong text.

use anyhow::{Context, Result};
use tracing::debug;

use super::matrix::ScoreMatrix;
use crate::error::ConfigError;

/// Run `infer` over `hypotheses` in chunks of `chunk_size` texts and reshape
/// the per-sentence scores into a `[texts × topics_per_item]` matrix.
///
/// `infer` receives one chunk of sentences and must return exactly one score
/// per sentence, in order.
pub fn run<F>(
    hypotheses: &[String],
    chunk_size: usize,
    topics_per_item: usize,
    mut infer: F,
) -> Result<ScoreMatrix>
where
    F: FnMut(&[String]) -> Result<Vec<f64>>,
{
    if chunk_size == 0 {
        return Err(ConfigError::ZeroBatchSize.into());
    }
    if topics_per_item == 0 {
        return Err(ConfigError::EmptyVocabulary.into());
    }
    if hypotheses.len() % topics_per_item != 0 {
        anyhow::bail!(
            "Batching: {} hypotheses is not a whole number of {}-topic texts",
            hypotheses.len(),
            topics_per_item
        );
    }

    let sentences_per_chunk = chunk_size * topics_per_item;
    let total_texts = hypotheses.len() / topics_per_item;
    let mut matrix = ScoreMatrix::empty(topics_per_item);

    for (i, chunk) in hypotheses.chunks(sentences_per_chunk).enumerate() {
        let first_text = i * chunk_size;
        let chunk_texts = chunk.len() / topics_per_item;

        let scores = infer(chunk).with_context(|| {
            format!(
                "Inference failed for texts {}..{} of {}",
                first_text,
                first_text + chunk_texts,
                total_texts
            )
        })?;

        if scores.len() != chunk.len() {
            anyhow::bail!(
                "Batching: model returned {} scores for {} hypotheses (texts {}..{})",
                scores.len(),
                chunk.len(),
                first_text,
                first_text + chunk_texts
            );
        }

        for row in scores.chunks(topics_per_item) {
            matrix.push_row(row)?;
        }

        debug!(chunk = i, texts = chunk_texts, total_texts, "Scored chunk");
    }

    Ok(matrix)
}
