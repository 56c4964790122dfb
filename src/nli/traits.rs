// NLI model trait: the one external capability the classifier needs.
//
// The default implementation runs a RoBERTa MNLI export through ONNX Runtime.
// Tests plug in deterministic stubs. Nothing above this seam knows which
// model, tokenizer, or device is behind it.

use anyhow::Result;

/// Number of classes an NLI head produces (contradiction / neutral / entailment,
/// in a model-specific order).
pub const NLI_CLASSES: usize = 3;

/// A pretrained natural-language-inference model plus its tokenizer.
///
/// Calls are blocking. Implementations must be safe to call from several
/// threads at once; the ONNX implementation serializes through a mutex.
pub trait NliModel: Send + Sync {
    /// Separator placed between premise and hypothesis when both are packed
    /// into one sentence (`</s>` for RoBERTa, `[SEP]` for BERT).
    fn separator(&self) -> &str;

    /// Tokenize sentences into token-id sequences, one per sentence.
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<u32>>>;

    /// Run the classification head. Returns one row of raw logits per input
    /// sequence, in input order.
    fn infer(&self, token_ids: &[Vec<u32>]) -> Result<Vec<Vec<f32>>>;
}
