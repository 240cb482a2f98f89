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

use crate::common::error::TranslatorError;
use crate::pipelines::common::{TranslationGenerator, TranslationTokenizer};
use crate::pipelines::translation::LanguageAliases;
use std::sync::Arc;
use tch::Device;
use tracing::debug;

/// Default maximum length of the generated translation, in tokens.
pub const DEFAULT_MAX_LENGTH: i64 = 128;

/// # Translator bound to a loaded model, tokenizer and device
/// Created by `TranslatorFactory::load`. The source language is fixed by the tokenizer; the
/// target language is selected per call through the language alias table.
pub struct Translator {
    model: Box<dyn TranslationGenerator>,
    tokenizer: Box<dyn TranslationTokenizer>,
    device: Device,
    language_aliases: Arc<LanguageAliases>,
    max_length: i64,
}

impl Translator {
    /// Build a new `Translator` from already loaded components.
    ///
    /// # Arguments
    ///
    /// * `model` - sequence-to-sequence model placed on `device`
    /// * `tokenizer` - tokenizer configured for the source language
    /// * `device` - `Device` the input tensors are moved to before generation
    /// * `language_aliases` - table resolving target language codes to model language tags
    pub fn new(
        model: Box<dyn TranslationGenerator>,
        tokenizer: Box<dyn TranslationTokenizer>,
        device: Device,
        language_aliases: Arc<LanguageAliases>,
    ) -> Translator {
        Translator {
            model,
            tokenizer,
            device,
            language_aliases,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the maximum length of generated sequences (default: 128).
    pub fn with_max_length(mut self, max_length: i64) -> Translator {
        self.max_length = max_length;
        self
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn max_length(&self) -> i64 {
        self.max_length
    }

    pub fn language_aliases(&self) -> &LanguageAliases {
        &self.language_aliases
    }

    /// Resolves the token forced as first generated token for `target_language`.
    ///
    /// The language code is first mapped to a model language tag through the alias table, the tag
    /// is then looked up in the tokenizer vocabulary.
    ///
    /// # Errors
    ///
    /// * `TranslatorError::LanguageNotSupportedError` if the code is absent from the alias table
    /// * `TranslatorError::LanguageTagUnknownError` if the model does not know the resolved tag
    pub fn forced_bos_token_id(&self, target_language: &str) -> Result<i64, TranslatorError> {
        let tag = self.language_aliases.resolve(target_language)?;
        self.tokenizer.language_tag_id(tag).map_err(|error| match error {
            TranslatorError::LanguageTagUnknownError { tag, .. } => {
                TranslatorError::LanguageTagUnknownError {
                    language: target_language.to_string(),
                    tag,
                }
            }
            other => other,
        })
    }

    /// Translates a text from the source language into `target_language`
    ///
    /// # Arguments
    ///
    /// * `text` - text in the source language the factory was configured with
    /// * `target_language` - language code, key of the language alias table (e.g. `"en"`)
    ///
    /// # Returns
    ///
    /// * `Vec<String>` decoded translations, one per encoded input (a single element)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
    ///
    /// let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
    /// let translator = TranslatorFactory::new("translation", "ko", aliases).load("cpu")?;
    ///
    /// let output = translator.predict("안녕하세요", "en")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslatorError> {
        let forced_bos_token_id = self.forced_bos_token_id(target_language)?;

        let encoded = self.tokenizer.encode(text)?;
        let batched = encoded.is_batched();
        let batch = encoded.normalize(self.tokenizer.pad_id())?;
        debug!(
            target_language,
            forced_bos_token_id,
            batched,
            batch_size = batch.batch_size(),
            sequence_length = batch.sequence_length(),
            "encoded translation input"
        );

        let (input_ids, attention_mask) = batch.to_tensors(self.device);
        let generated = self
            .model
            .generate(
                input_ids,
                attention_mask,
                forced_bos_token_id,
                self.max_length,
            )
            .map_err(|error| match error {
                TranslatorError::GenerationError(message) => {
                    TranslatorError::GenerationError(format!(
                        "translating {} characters into `{}`: {}",
                        text.chars().count(),
                        target_language,
                        message
                    ))
                }
                other => other,
            })?;
        debug!(
            sequences = generated.len(),
            output_length = generated.first().map_or(0, Vec::len),
            "generated translation"
        );

        Ok(self.tokenizer.decode(&generated, true))
    }
}
