// Copyright 2019-2020 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Common blocks for translation pipelines
//! Interfaces to the pretrained tokenizer and sequence-to-sequence model used by a `Translator`,
//! the loading seam used by the `TranslatorFactory`, and device selection.
//!
//! The translator owns the input normalization and forced target token resolution; everything
//! else (sub-word tokenization, the network itself and its decoding algorithm) is provided by an
//! implementation of these traits. The production implementation is `nllb::NLLBBackend`.
use crate::common::error::TranslatorError;
use crate::pipelines::encoding::EncodedResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tch::{Cuda, Device, Tensor};

/// # Tokenizer configured for a fixed source language
pub trait TranslationTokenizer: Send {
    /// Encodes a single input text. Implementations may return either shape of `EncodedResult`.
    fn encode(&self, text: &str) -> Result<EncodedResult, TranslatorError>;

    /// Decodes generated token id sequences back to text, one string per sequence.
    fn decode(&self, sequences: &[Vec<i64>], skip_special_tokens: bool) -> Vec<String>;

    /// Looks up the token id of a model language tag (e.g. `eng_Latn`).
    ///
    /// # Errors
    ///
    /// * `TranslatorError::LanguageTagUnknownError` if the tag is not part of the vocabulary
    fn language_tag_id(&self, tag: &str) -> Result<i64, TranslatorError>;

    /// Padding token id, used to align rows of a batched encoding.
    fn pad_id(&self) -> i64;
}

/// # Sequence-to-sequence model placed on a device
pub trait TranslationGenerator: Send {
    /// Generates output token ids for a batch.
    ///
    /// # Arguments
    ///
    /// * `input_ids` - `Tensor` of shape (*batch size*, *source_sequence_length*)
    /// * `attention_mask` - `Tensor` of shape (*batch size*, *source_sequence_length*)
    /// * `forced_bos_token_id` - token forced as first generated token (target language tag)
    /// * `max_length` - maximum length of the generated sequences
    ///
    /// # Returns
    ///
    /// * `Vec<Vec<i64>>` generated token ids, one sequence per batch row
    fn generate(
        &self,
        input_ids: Tensor,
        attention_mask: Tensor,
        forced_bos_token_id: i64,
        max_length: i64,
    ) -> Result<Vec<Vec<i64>>, TranslatorError>;
}

/// # Loader for a tokenizer/model pair
pub trait TranslationBackend {
    /// Resolves and loads the tokenizer for `source_tag` (a model language tag).
    fn load_tokenizer(
        &self,
        model: &ModelSource,
        source_tag: &str,
    ) -> Result<Box<dyn TranslationTokenizer>, TranslatorError>;

    /// Resolves and loads the model weights on `device`.
    fn load_model(
        &self,
        model: &ModelSource,
        device: Device,
    ) -> Result<Box<dyn TranslationGenerator>, TranslatorError>;
}

/// # Location of the pretrained tokenizer and model files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSource {
    /// Pretrained model identifier (e.g. `facebook/nllb-200-distilled-600M`)
    Pretrained(String),
    /// Files available on the local file system
    Local {
        weights: PathBuf,
        config: PathBuf,
        vocab: PathBuf,
        merges: PathBuf,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::Pretrained(crate::nllb::NLLB_600M_DISTILLED_ID.to_string())
    }
}

impl ModelSource {
    pub fn name(&self) -> String {
        match self {
            ModelSource::Pretrained(id) => id.clone(),
            ModelSource::Local { weights, .. } => weights.display().to_string(),
        }
    }
}

/// Parses a device selector.
///
/// Accepted values are `cpu`, `cuda` (first CUDA device), `cuda:N`, `mps` and `auto` (CUDA when
/// available, CPU otherwise). Matching is case-insensitive.
///
/// # Errors
///
/// * `TranslatorError::ModelLoadError` for unknown selectors or when a CUDA device is requested
/// but not available.
///
/// # Example
///
/// ```
/// use nllb_translator::pipelines::common::parse_device;
/// use tch::Device;
/// # fn main() -> Result<(), nllb_translator::TranslatorError> {
/// assert_eq!(parse_device("cpu")?, Device::Cpu);
/// # Ok(())
/// # }
/// ```
pub fn parse_device(device: &str) -> Result<Device, TranslatorError> {
    let selector = device.trim().to_lowercase();
    let parsed = match selector.as_str() {
        "cpu" => Device::Cpu,
        "mps" => Device::Mps,
        "auto" => Device::cuda_if_available(),
        "cuda" => Device::Cuda(0),
        other => match other.strip_prefix("cuda:") {
            Some(index) => Device::Cuda(index.parse::<usize>().map_err(|_| {
                TranslatorError::ModelLoadError(format!("invalid CUDA device index in `{}`", device))
            })?),
            None => {
                return Err(TranslatorError::ModelLoadError(format!(
                    "unknown device `{}` (expected cpu, cuda, cuda:N, mps or auto)",
                    device
                )))
            }
        },
    };

    if let Device::Cuda(index) = parsed {
        let available = Cuda::device_count();
        if (index as i64) >= available {
            return Err(TranslatorError::ModelLoadError(format!(
                "CUDA device {} requested but {} device(s) available",
                index, available
            )));
        }
    }
    Ok(parsed)
}
