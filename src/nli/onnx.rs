// Local ONNX NLI model (RoBERTa fine-tuned on MultiNLI by default).
//
// Inference runs entirely on the local machine through ONNX Runtime. The
// model takes `input_ids` + `attention_mask` and returns one row of three
// class logits per sequence. Premise and hypothesis are packed into a single
// sentence around the tokenizer's separator token before encoding.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::download::{MODEL_FILE, TOKENIZER_FILE};
use super::traits::NliModel;
use crate::config::Device;

/// ONNX Runtime session plus the HuggingFace tokenizer that matches it.
pub struct OnnxNliModel {
    // ort::Session::run takes &mut self; the mutex also makes the model
    // Sync so one handle can be shared across blocking tasks.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    separator: String,
    pad_id: u32,
}

impl OnnxNliModel {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json` to exist in `model_dir`.
    /// Call `download::download_model()` first if they don't.
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `nlitopic download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `nlitopic download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let mut builder = Session::builder().context("Failed to create ONNX session builder")?;
        if *device == Device::Cuda {
            // ONNX Runtime falls back to CPU when CUDA can't be registered.
            builder = builder
                .with_execution_providers([CUDAExecutionProvider::default().build()])
                .map_err(|e| anyhow::anyhow!("Failed to configure CUDA execution provider: {e}"))?;
        }
        let session = builder
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let separator = ["</s>", "[SEP]"]
            .into_iter()
            .find(|tok| tokenizer.token_to_id(tok).is_some())
            .unwrap_or("</s>")
            .to_string();

        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(1);

        debug!(
            model_dir = %model_dir.display(),
            separator = %separator,
            pad_id,
            ?device,
            "Loaded ONNX NLI model"
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            separator,
            pad_id,
        })
    }
}

impl NliModel for OnnxNliModel {
    fn separator(&self) -> &str {
        &self.separator
    }

    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<u32>>> {
        sentences
            .iter()
            .map(|s| {
                self.tokenizer
                    .encode(s.as_str(), true)
                    .map(|enc| enc.get_ids().to_vec())
                    .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
            })
            .collect()
    }

    fn infer(&self, token_ids: &[Vec<u32>]) -> Result<Vec<Vec<f32>>> {
        if token_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (input_ids, attention_mask, max_len) = pad_batch(token_ids, self.pad_id);
        let batch_size = token_ids.len();
        let shape = [batch_size as i64, max_len as i64];

        let input_ids_tensor = Tensor::from_array((shape, input_ids))
            .context("Failed to create input_ids tensor")?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask))
            .context("Failed to create attention_mask tensor")?;

        let logits = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! {
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor
                })
                .context("ONNX inference failed")?;

            // Output shape: [batch_size, classes], raw logits
            let (_out_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .context("Failed to extract output tensor")?;

            data.to_vec()
        };

        if logits.is_empty() || logits.len() % batch_size != 0 {
            anyhow::bail!(
                "Model returned {} logits for a batch of {}",
                logits.len(),
                batch_size
            );
        }
        let classes = logits.len() / batch_size;

        debug!(batch_size, max_len, classes, "ONNX NLI inference");

        Ok(logits.chunks(classes).map(<[f32]>::to_vec).collect())
    }
}

/// Right-pad every sequence to the longest one in the batch.
///
/// Returns flat `input_ids` and `attention_mask` buffers of shape
/// `[batch, max_len]` plus `max_len` itself.
fn pad_batch(token_ids: &[Vec<u32>], pad_id: u32) -> (Vec<i64>, Vec<i64>, usize) {
    let max_len = token_ids.iter().map(Vec::len).max().unwrap_or(0);
    let mut input_ids = Vec::with_capacity(token_ids.len() * max_len);
    let mut attention_mask = Vec::with_capacity(token_ids.len() * max_len);

    for ids in token_ids {
        let pad_len = max_len - ids.len();
        input_ids.extend(ids.iter().map(|&id| id as i64));
        attention_mask.extend(std::iter::repeat_n(1i64, ids.len()));
        input_ids.extend(std::iter::repeat_n(pad_id as i64, pad_len));
        attention_mask.extend(std::iter::repeat_n(0i64, pad_len));
    }

    (input_ids, attention_mask, max_len)
}
