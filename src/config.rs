use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::nli::download;

/// Default query phrase placed before the quoted topic in each hypothesis.
pub const DEFAULT_QUERY_PHRASE: &str = "The domain of the sentence is about";

/// Entailment column for MNLI heads ordered contradiction / neutral / entailment.
pub const DEFAULT_ENTAILMENT_POSITION: usize = 2;

/// Where the NLI model runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    /// CPU execution (default)
    Cpu,
    /// CUDA execution provider, falling back to CPU when unavailable
    Cuda,
}

impl FromStr for Device {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" => Ok(Device::Cuda),
            other => anyhow::bail!("NLITOPIC_DEVICE must be cpu or cuda, got {other}"),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
/// Everything here is fixed once loaded; CLI flags may override
/// batch size and verbosity before the classifier is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pretrained model identifier on the HuggingFace hub
    pub model_id: String,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    pub device: Device,
    /// Hypothesis template; `{}` marks where the topic goes
    pub query_phrase: String,
    /// Index of the entailment class in the model's logits
    pub entailment_position: usize,
    pub batch_size: usize,
    /// When false, model setup and download output is suppressed
    pub verbose: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default; malformed device, numeric or boolean
    /// values are an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        let model_id =
            env::var("NLITOPIC_MODEL").unwrap_or_else(|_| download::DEFAULT_MODEL_ID.to_string());

        let model_dir = env::var("NLITOPIC_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir(&model_id));

        let device = match env::var("NLITOPIC_DEVICE") {
            Ok(v) => v.parse()?,
            Err(_) => Device::Cpu,
        };

        let entailment_position = match env::var("NLITOPIC_ENTAILMENT_POSITION") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("NLITOPIC_ENTAILMENT_POSITION is not an index: {v}"))?,
            Err(_) => DEFAULT_ENTAILMENT_POSITION,
        };

        let batch_size = match env::var("NLITOPIC_BATCH_SIZE") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("NLITOPIC_BATCH_SIZE is not a number: {v}"))?,
            Err(_) => 1,
        };

        let verbose = match env::var("NLITOPIC_VERBOSE").as_deref() {
            Ok("0") | Ok("false") | Ok("no") => false,
            Ok("1") | Ok("true") | Ok("yes") | Err(_) => true,
            Ok(other) => anyhow::bail!("NLITOPIC_VERBOSE must be true or false, got {other}"),
        };

        Ok(Self {
            model_id,
            model_dir,
            device,
            query_phrase: env::var("NLITOPIC_QUERY_PHRASE")
                .unwrap_or_else(|_| DEFAULT_QUERY_PHRASE.to_string()),
            entailment_position,
            batch_size,
            verbose,
        })
    }

    /// Check that the model files have been downloaded.
    /// Call this before loading the model.
    pub fn require_model(&self) -> Result<()> {
        if !download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "ONNX model files not found in {}\n\
                 Run `nlitopic download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
