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
use crate::nllb::NLLBBackend;
use crate::pipelines::common::{parse_device, ModelSource, TranslationBackend};
use crate::pipelines::translation::translator::DEFAULT_MAX_LENGTH;
use crate::pipelines::translation::{LanguageAliases, Translator};
use crate::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// # Configuration for a translator
/// Can be deserialized from a JSON file with `Config::from_file`:
///
/// ```json
/// {
///   "task": "translation",
///   "src": "ko",
///   "lang_aliases": {"en": "eng_Latn", "ko": "kor_Hang"},
///   "model": "facebook/nllb-200-distilled-600M",
///   "max_length": 128
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Task name, descriptive only
    pub task: String,
    /// Source language, either a key of `lang_aliases` or a model language tag
    pub src: String,
    /// Language alias table
    #[serde(alias = "LANG_ALIASES")]
    pub lang_aliases: LanguageAliases,
    /// Pretrained model identifier or local model files (default: NLLB-200 distilled 600M)
    #[serde(default)]
    pub model: ModelSource,
    /// Maximum length of the generated translation (default: 128)
    #[serde(default = "default_max_length")]
    pub max_length: i64,
}

fn default_max_length() -> i64 {
    DEFAULT_MAX_LENGTH
}

impl Config for TranslatorConfig {}

/// # Factory holding the translation configuration and loading `Translator`s
pub struct TranslatorFactory {
    task: String,
    source_language: String,
    language_aliases: Arc<LanguageAliases>,
    model: ModelSource,
    max_length: i64,
}

impl TranslatorFactory {
    /// Creates a new factory. No validation or resource access takes place until `load`.
    ///
    /// # Arguments
    ///
    /// * `task` - task name (e.g. `"translation"`)
    /// * `source_language` - language of the input texts, key of `language_aliases` or model tag
    /// * `language_aliases` - table resolving language codes to model language tags
    ///
    /// # Example
    ///
    /// ```
    /// use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
    ///
    /// let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
    /// let factory = TranslatorFactory::new("translation", "ko", aliases);
    /// assert_eq!(factory.source_language(), "ko");
    /// ```
    pub fn new(
        task: impl Into<String>,
        source_language: impl Into<String>,
        language_aliases: impl Into<LanguageAliases>,
    ) -> TranslatorFactory {
        TranslatorFactory {
            task: task.into(),
            source_language: source_language.into(),
            language_aliases: Arc::new(language_aliases.into()),
            model: ModelSource::default(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Selects the pretrained model or local files to load.
    pub fn with_model(mut self, model: ModelSource) -> TranslatorFactory {
        self.model = model;
        self
    }

    pub fn with_max_length(mut self, max_length: i64) -> TranslatorFactory {
        self.max_length = max_length;
        self
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn model(&self) -> &ModelSource {
        &self.model
    }

    pub fn language_aliases(&self) -> &LanguageAliases {
        &self.language_aliases
    }

    /// Model language tag of the source language: the alias of `source_language` if the table
    /// contains it, `source_language` itself otherwise.
    pub fn source_tag(&self) -> &str {
        self.language_aliases
            .get(&self.source_language)
            .unwrap_or(&self.source_language)
    }

    /// Loads the pretrained NLLB tokenizer and model on `device` and returns a `Translator`.
    ///
    /// # Arguments
    ///
    /// * `device` - device selector: `cpu`, `cuda`, `cuda:N`, `mps` or `auto`
    ///
    /// # Errors
    ///
    /// * `TranslatorError::ModelLoadError` if the device is unavailable or the model artifacts
    /// cannot be fetched or instantiated
    /// * `TranslatorError::LanguageTagUnknownError` if the source language is unknown to the model
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
    ///
    /// let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
    /// let translator = TranslatorFactory::new("translation", "ko", aliases).load("auto")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(&self, device: &str) -> Result<Translator, TranslatorError> {
        self.load_with(&NLLBBackend, device)
    }

    /// Loads a `Translator` using a custom tokenizer/model backend.
    pub fn load_with<B: TranslationBackend>(
        &self,
        backend: &B,
        device: &str,
    ) -> Result<Translator, TranslatorError> {
        let device = parse_device(device)?;
        let source_tag = self.source_tag();
        let start = Instant::now();
        info!(
            task = %self.task,
            model = %self.model.name(),
            source_language = %self.source_language,
            source_tag,
            ?device,
            "loading translator"
        );

        let tokenizer = backend.load_tokenizer(&self.model, source_tag)?;
        let model = backend.load_model(&self.model, device)?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "translator loaded"
        );
        Ok(Translator::new(
            model,
            tokenizer,
            device,
            Arc::clone(&self.language_aliases),
        )
        .with_max_length(self.max_length))
    }
}

impl From<TranslatorConfig> for TranslatorFactory {
    fn from(config: TranslatorConfig) -> TranslatorFactory {
        TranslatorFactory::new(config.task, config.src, config.lang_aliases)
            .with_model(config.model)
            .with_max_length(config.max_length)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn source_language_resolves_through_aliases() {
        let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);

        let factory = TranslatorFactory::new("translation", "ko", aliases.clone());
        assert_eq!(factory.source_tag(), "kor_Hang");

        let factory = TranslatorFactory::new("translation", "jpn_Jpan", aliases);
        assert_eq!(factory.source_tag(), "jpn_Jpan");
    }

    #[test]
    fn config_accepts_uppercase_alias_key() -> anyhow::Result<()> {
        let config: TranslatorConfig = serde_json::from_str(
            r#"{"task": "translation", "src": "ko",
                "LANG_ALIASES": {"en": "eng_Latn", "ko": "kor_Hang"}}"#,
        )?;

        assert_eq!(config.model, ModelSource::default());
        assert_eq!(config.max_length, 128);
        assert_eq!(config.lang_aliases.resolve("en")?, "eng_Latn");

        let factory = TranslatorFactory::from(config);
        assert_eq!(factory.task(), "translation");
        assert_eq!(factory.source_tag(), "kor_Hang");
        Ok(())
    }
}
