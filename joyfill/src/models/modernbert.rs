use candle_core::{Device, IndexOp, Tensor, D};
use candle_nn::ops::softmax;
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config,
    ModernBertForMaskedLM as CandleModernBertForMaskedLM,
    ModernBertForSequenceClassification as CandleModernBertForSequenceClassification,
};
use serde::Deserialize;
use std::collections::HashMap;
use tokenizers::{Encoding, Tokenizer};

use crate::error::{PipelineError, Result};
use crate::loaders::{EncoderWeightsLoader, TokenizerLoader};
use crate::pipelines::suggestion::model::{
    CandidatePredictor, SentimentClassifier, SentimentLabel,
};

/// Mask sentinel of every ModernBERT tokenizer.
const MASK_TOKEN: &str = "[MASK]";

/// Available ModernBERT model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModernBertSize {
    /// Base model (~150M parameters).
    Base,
    /// Large model (~400M parameters).
    Large,
}

impl ModernBertSize {
    fn fill_mask_repo(self) -> &'static str {
        match self {
            ModernBertSize::Base => "answerdotai/ModernBERT-base",
            ModernBertSize::Large => "answerdotai/ModernBERT-large",
        }
    }

    fn sentiment_repo(self) -> &'static str {
        match self {
            ModernBertSize::Base => "clapAI/modernBERT-base-multilingual-sentiment",
            ModernBertSize::Large => "clapAI/modernBERT-large-multilingual-sentiment",
        }
    }
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-base",
            ModernBertSize::Large => "modernbert-large",
        };
        write!(f, "{name}")
    }
}

impl crate::pipelines::cache::ModelOptions for ModernBertSize {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

fn encode(tokenizer: &Tokenizer, text: &str) -> Result<Encoding> {
    tokenizer.encode(text, true).map_err(|e| {
        PipelineError::Tokenization(format!(
            "Tokenization failed on '{}': {}",
            &text.chars().take(50).collect::<String>(),
            e
        ))
    })
}

fn model_inputs(encoding: &Encoding, device: &Device) -> Result<(Tensor, Tensor)> {
    let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;
    Ok((input_ids, attention_mask))
}

// ============ Fill-mask predictor ============

/// ModernBERT masked-LM proposing words for `[MASK]`.
pub(crate) struct ModernBertFillMask {
    model: CandleModernBertForMaskedLM,
    tokenizer: Tokenizer,
    mask_id: u32,
    device: Device,
}

impl ModernBertFillMask {
    pub fn new(size: ModernBertSize, device: Device) -> Result<Self> {
        let repo = size.fill_mask_repo();
        let tokenizer = TokenizerLoader::new(repo).load()?;
        let mask_id = tokenizer.token_to_id(MASK_TOKEN).ok_or_else(|| {
            PipelineError::Tokenization(format!("Tokenizer of '{repo}' has no {MASK_TOKEN} token"))
        })?;

        let weights = EncoderWeightsLoader::new(repo);
        let config: Config = weights.load_config()?;
        let model = CandleModernBertForMaskedLM::load(weights.load_weights(&device)?, &config)?;

        Ok(Self {
            model,
            tokenizer,
            mask_id,
            device,
        })
    }
}

impl CandidatePredictor for ModernBertFillMask {
    fn mask_token(&self) -> &str {
        MASK_TOKEN
    }

    fn predict(&self, masked_text: &str, top_k: usize) -> Result<Vec<String>> {
        if top_k == 0 {
            return Ok(vec![]);
        }

        let encoding = encode(&self.tokenizer, masked_text)?;
        let mask_index = encoding
            .get_ids()
            .iter()
            .position(|&id| id == self.mask_id)
            .ok_or_else(|| {
                let preview: String = masked_text.chars().take(50).collect();
                PipelineError::Inference(format!("No {MASK_TOKEN} token in input '{preview}'"))
            })?;

        let (input_ids, attention_mask) = model_inputs(&encoding, &self.device)?;
        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let logits = logits.squeeze(0)?.i((mask_index, ..))?;
        let probs = softmax(&logits, D::Minus1)?.to_vec1::<f32>()?;

        let mut idxs: Vec<usize> = (0..probs.len()).collect();
        idxs.sort_by(|&i, &j| probs[j].total_cmp(&probs[i]));
        idxs.truncate(top_k);

        let mut words = Vec::with_capacity(idxs.len());
        for idx in idxs {
            let token = self
                .tokenizer
                .decode(&[idx as u32], true)
                .map_err(|e| PipelineError::Tokenization(format!("Decoding token {idx}: {e}")))?;
            let token = token.trim();
            // Special tokens decode to nothing with skip_special_tokens.
            if !token.is_empty() {
                words.push(token.to_string());
            }
        }

        Ok(words)
    }
}

// ============ Sentiment classifier ============

/// ModernBERT sequence classifier labelling a word positive, negative or neutral.
///
/// Labels are lowercased so checkpoints that say `POSITIVE` still match.
pub(crate) struct ModernBertSentiment {
    model: CandleModernBertForSequenceClassification,
    tokenizer: Tokenizer,
    id2label: HashMap<String, String>,
    device: Device,
}

impl ModernBertSentiment {
    pub fn new(size: ModernBertSize, device: Device) -> Result<Self> {
        let repo = size.sentiment_repo();
        let tokenizer = TokenizerLoader::new(repo).load()?;

        let weights = EncoderWeightsLoader::new(repo);
        let config_str = weights.load_config_str()?;
        let mut config: Config = serde_json::from_str(&config_str)?;
        let labels: ClassifierConfigJson = serde_json::from_str(&config_str)?;
        if labels.id2label.is_empty() {
            return Err(PipelineError::Unexpected(format!(
                "'{repo}' config.json has no id2label map"
            )));
        }
        patch_classifier_config(&mut config, &labels.id2label);

        let model =
            CandleModernBertForSequenceClassification::load(weights.load_weights(&device)?, &config)?;

        Ok(Self {
            model,
            tokenizer,
            id2label: labels.id2label,
            device,
        })
    }
}

impl SentimentClassifier for ModernBertSentiment {
    fn classify(&self, word: &str) -> Result<SentimentLabel> {
        let encoding = encode(&self.tokenizer, word)?;
        let (input_ids, attention_mask) = model_inputs(&encoding, &self.device)?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;

        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs.get(pred_id as usize).copied().unwrap_or(0.0);

        let label = self.id2label.get(&pred_id.to_string()).ok_or_else(|| {
            let available: Vec<&str> = self.id2label.values().map(String::as_str).collect();
            PipelineError::Inference(format!(
                "Predicted label ID {} not in id2label. Available: {}",
                pred_id,
                available.join(", ")
            ))
        })?;

        Ok(SentimentLabel::new(label.to_lowercase(), score))
    }
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Make the classifier head match the checkpoint's label count.
fn patch_classifier_config(config: &mut Config, id2label: &HashMap<String, String>) {
    let matches = config
        .classifier_config
        .as_ref()
        .is_some_and(|c| c.id2label.len() == id2label.len());
    if matches {
        return;
    }

    let label2id = id2label
        .iter()
        .map(|(id, label)| (label.clone(), id.clone()))
        .collect();
    config.classifier_config = Some(ClassifierConfig {
        id2label: id2label.clone(),
        label2id,
        classifier_pooling: ClassifierPooling::default(),
    });
}
