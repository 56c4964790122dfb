// Model download helper for ONNX NLI models.
//
// Fetches an ONNX export and its tokenizer from the HuggingFace hub. The
// default is Xenova/roberta-large-mnli, whose label order is
// contradiction / neutral / entailment (entailment at position 2).
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/nlitopic/models/<model>/ on Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

/// Default pretrained model identifier on the HuggingFace hub.
pub const DEFAULT_MODEL_ID: &str = "Xenova/roberta-large-mnli";

const HF_BASE_URL: &str = "https://huggingface.co";

/// Local file names inside a model directory.
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Remote path of the ONNX graph within the hub repo.
const REMOTE_MODEL_FILE: &str = "onnx/model.onnx";

/// Returns the default directory for storing a model's files.
/// Uses the platform data directory: ~/.local/share/nlitopic/models/ on Linux,
/// with one subdirectory per model id (`/` replaced by `--`).
pub fn default_model_dir(model_id: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nlitopic")
        .join("models")
        .join(model_id.replace('/', "--"))
}

/// Check whether both required model files exist.
pub fn model_files_present(dir: &Path) -> bool {
    dir.join(MODEL_FILE).exists() && dir.join(TOKENIZER_FILE).exists()
}

fn resolve_url(model_id: &str, file: &str) -> String {
    format!("{HF_BASE_URL}/{model_id}/resolve/main/{file}")
}

/// Download the ONNX model and tokenizer for `model_id` into `dir`.
///
/// Skips files that already exist. Creates the directory as needed.
/// Progress bars are only drawn when `verbose` is set.
pub async fn download_model(model_id: &str, dir: &Path, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let files = [
        (TOKENIZER_FILE, TOKENIZER_FILE, false),
        (REMOTE_MODEL_FILE, MODEL_FILE, true),
    ];

    for (remote, local, large) in files {
        let dest = dir.join(local);
        if dest.exists() {
            info!(file = local, "Model file already exists, skipping");
            continue;
        }
        info!(file = local, model = model_id, "Downloading");
        download_file(&resolve_url(model_id, remote), &dest, large && verbose).await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .context("Invalid progress bar template")?
                    .progress_chars("=> "),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };
    if !show_progress {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    // Accumulate chunks so the bar advances while the body streams in.
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        pb.set_position(bytes.len() as u64);
    }
    pb.finish_and_clear();

    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_per_model() {
        let dir = default_model_dir("Xenova/roberta-large-mnli");
        let path_str = dir.to_string_lossy();
        assert!(
            path_str.contains("nlitopic") && path_str.ends_with("Xenova--roberta-large-mnli"),
            "Expected a per-model directory under nlitopic, got: {path_str}"
        );
    }

    #[test]
    fn test_resolve_url_points_at_main_revision() {
        assert_eq!(
            resolve_url("org/model", "onnx/model.onnx"),
            "https://huggingface.co/org/model/resolve/main/onnx/model.onnx"
        );
    }

    #[test]
    fn test_model_files_present_false_when_empty() {
        let dir = std::env::temp_dir().join("nlitopic-test-nonexistent");
        assert!(!model_files_present(&dir));
    }

    #[test]
    fn test_model_files_present_true_when_files_exist() {
        let dir = std::env::temp_dir().join("nlitopic-model-files-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODEL_FILE), b"fake").unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), b"fake").unwrap();

        assert!(model_files_present(&dir));

        // Cleanup
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
