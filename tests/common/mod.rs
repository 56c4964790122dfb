// Deterministic NLI stand-in for integration tests.
//
// Token ids are the sentence's bytes, so `infer` can recover each hypothesis,
// split it back into premise and topic, and look up a scripted entailment
// probability. No model files, no network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use nlitopic::nli::traits::NliModel;

pub const SEP: &str = "</s>";

type ScoreFn = Box<dyn Fn(&str, &str) -> f32 + Send + Sync>;

pub struct StubModel {
    score: ScoreFn,
    entailment_position: usize,
    infer_calls: AtomicUsize,
    chunk_sizes: Mutex<Vec<usize>>,
    fail_on_call: Option<usize>,
}

impl StubModel {
    /// `score(premise, topic)` is the entailment probability the model
    /// should produce for that pair (entailment at logit position 2).
    pub fn new(score: impl Fn(&str, &str) -> f32 + Send + Sync + 'static) -> Self {
        Self {
            score: Box::new(score),
            entailment_position: 2,
            infer_calls: AtomicUsize::new(0),
            chunk_sizes: Mutex::new(Vec::new()),
            fail_on_call: None,
        }
    }

    /// Put the entailment logit at `position` instead of 2.
    pub fn with_entailment_position(mut self, position: usize) -> Self {
        self.entailment_position = position;
        self
    }

    /// Make the `n`th inference call (1-based) fail.
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn infer_calls(&self) -> usize {
        self.infer_calls.load(Ordering::SeqCst)
    }

    /// Number of hypotheses in each inference call so far.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunk_sizes.lock().unwrap().clone()
    }
}

/// Logits whose 3-way softmax puts exactly `p` on `position`.
pub fn logits_for(p: f32, position: usize) -> Vec<f32> {
    let rest = ((1.0 - p) / 2.0).ln();
    let mut row = vec![rest; 3];
    row[position] = p.ln();
    row
}

/// Split `"<premise> </s> ... \"<topic>\"."` back into its parts.
pub fn split_hypothesis(sentence: &str) -> (&str, &str) {
    let (premise, claim) = sentence
        .split_once(&format!(" {SEP} "))
        .expect("hypothesis should contain the separator");
    let start = claim.find('"').expect("topic should be quoted") + 1;
    let end = claim.rfind('"').expect("topic should be quoted");
    (premise, &claim[start..end])
}

impl NliModel for StubModel {
    fn separator(&self) -> &str {
        SEP
    }

    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<u32>>> {
        Ok(sentences
            .iter()
            .map(|s| s.bytes().map(u32::from).collect())
            .collect())
    }

    fn infer(&self, token_ids: &[Vec<u32>]) -> Result<Vec<Vec<f32>>> {
        let call = self.infer_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.chunk_sizes.lock().unwrap().push(token_ids.len());
        if self.fail_on_call == Some(call) {
            anyhow::bail!("CUDA out of memory");
        }

        token_ids
            .iter()
            .map(|ids| {
                let bytes: Vec<u8> = ids.iter().map(|&id| id as u8).collect();
                let sentence = String::from_utf8(bytes)?;
                let (premise, topic) = split_hypothesis(&sentence);
                Ok(logits_for((self.score)(premise, topic), self.entailment_position))
            })
            .collect()
    }
}

pub fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}
