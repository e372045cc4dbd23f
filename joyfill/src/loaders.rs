use std::path::PathBuf;
use std::time::Duration;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use serde::de::DeserializeOwned;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    /// Resolve the file in the local hub cache, downloading it on a miss.
    pub fn load(&self) -> Result<PathBuf> {
        let api = Api::new()?;
        let repo = api.repo(Repo::new(self.repo.clone(), RepoType::Model));

        for attempt in 0..MAX_RETRIES {
            match repo.get(&self.filename) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    if error_msg.contains("Lock acquisition failed") && attempt < MAX_RETRIES - 1 {
                        let wait_time = Duration::from_millis(100 * (1 << attempt));
                        tracing::debug!(
                            repo = %self.repo,
                            file = %self.filename,
                            ?wait_time,
                            "hub cache locked, retrying"
                        );
                        std::thread::sleep(wait_time);
                        continue;
                    }
                    return Err(PipelineError::Download(format!(
                        "Failed to download '{}' from '{}': {}",
                        self.filename, self.repo, error_msg
                    )));
                }
            }
        }

        Err(PipelineError::Download(format!(
            "Gave up on '{}' from '{}' after {} attempt(s)",
            self.filename, self.repo, MAX_RETRIES
        )))
    }
}

#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, "tokenizer.json"),
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;
        let path_str = tokenizer_file_path.display().to_string();

        Tokenizer::from_file(&tokenizer_file_path).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Failed to load tokenizer from '{}': {}",
                path_str, e
            ))
        })
    }
}

/// Loads `config.json` plus the weights of an encoder checkpoint.
#[derive(Debug, Clone)]
pub struct EncoderWeightsLoader {
    pub repo: String,
}

impl EncoderWeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    /// Raw `config.json` text, for callers that read extra fields off it.
    pub fn load_config_str(&self) -> Result<String> {
        let config_path = HfLoader::new(&self.repo, "config.json").load()?;
        Ok(std::fs::read_to_string(config_path)?)
    }

    pub fn load_config<C: DeserializeOwned>(&self) -> Result<C> {
        Ok(serde_json::from_str(&self.load_config_str()?)?)
    }

    pub fn load_weights(&self, device: &Device) -> Result<VarBuilder<'static>> {
        let weights_path = HfLoader::new(&self.repo, "model.safetensors")
            .load()
            .or_else(|_| HfLoader::new(&self.repo, "pytorch_model.bin").load())?;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, device)?
        };

        Ok(vb)
    }
}
