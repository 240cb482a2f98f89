use crate::common::error::TranslatorError;
use crate::nllb::NLLB_LANGUAGE_TAGS;
use crate::pipelines::common::TranslationTokenizer;
use crate::pipelines::encoding::EncodedResult;
use lazy_static::lazy_static;
use rust_tokenizers::tokenizer::{NLLBTokenizer, Tokenizer};
use std::collections::HashSet;
use std::path::Path;

const EOS_TOKEN: &str = "</s>";
const PAD_TOKEN: &str = "<pad>";
const UNK_TOKEN: &str = "<unk>";
const SPECIAL_TOKENS: [&str; 5] = ["<s>", EOS_TOKEN, PAD_TOKEN, UNK_TOKEN, "<mask>"];

lazy_static! {
    static ref LANGUAGE_TAGS: HashSet<&'static str> = NLLB_LANGUAGE_TAGS.iter().copied().collect();
}

/// # NLLB tokenizer bound to a source language
/// Inputs are encoded as `[source_tag] tokens </s>`.
pub struct NLLBSourceTokenizer {
    tokenizer: NLLBTokenizer,
    source_tag_id: i64,
    eos_id: i64,
    pad_id: i64,
    unk_id: i64,
    special_ids: HashSet<i64>,
}

impl NLLBSourceTokenizer {
    /// Loads the SentencePiece NLLB tokenizer and binds it to `source_tag`.
    ///
    /// # Arguments
    ///
    /// * `vocab_path` - path to the `tokenizer.json` vocabulary
    /// * `merges_path` - path to the `sentencepiece.bpe.model` file
    /// * `source_tag` - FLORES-200 tag of the source language (e.g. `kor_Hang`)
    ///
    /// # Errors
    ///
    /// * `TranslatorError::ModelLoadError` if the files cannot be read
    /// * `TranslatorError::LanguageTagUnknownError` if `source_tag` is not an NLLB language tag
    pub fn from_files<V: AsRef<Path>, M: AsRef<Path>>(
        vocab_path: V,
        merges_path: M,
        source_tag: &str,
    ) -> Result<NLLBSourceTokenizer, TranslatorError> {
        let tokenizer = NLLBTokenizer::from_files(vocab_path.as_ref(), merges_path.as_ref())
            .map_err(|e| {
                TranslatorError::ModelLoadError(format!("could not load NLLB tokenizer: {}", e))
            })?;
        Self::new(tokenizer, source_tag)
    }

    fn new(tokenizer: NLLBTokenizer, source_tag: &str) -> Result<Self, TranslatorError> {
        let special_ids = tokenizer
            .convert_tokens_to_ids(
                &SPECIAL_TOKENS
                    .iter()
                    .chain(NLLB_LANGUAGE_TAGS.iter())
                    .map(|token| token.to_string())
                    .collect::<Vec<_>>(),
            )
            .into_iter()
            .collect::<HashSet<_>>();
        let special_token_ids = tokenizer.convert_tokens_to_ids(
            &SPECIAL_TOKENS[1..4]
                .iter()
                .map(|token| token.to_string())
                .collect::<Vec<_>>(),
        );

        let mut source_tokenizer = NLLBSourceTokenizer {
            tokenizer,
            source_tag_id: 0,
            eos_id: special_token_ids[0],
            pad_id: special_token_ids[1],
            unk_id: special_token_ids[2],
            special_ids,
        };
        source_tokenizer.source_tag_id = source_tokenizer.language_tag_id(source_tag)?;
        Ok(source_tokenizer)
    }

    pub fn source_tag_id(&self) -> i64 {
        self.source_tag_id
    }
}

impl TranslationTokenizer for NLLBSourceTokenizer {
    fn encode(&self, text: &str) -> Result<EncodedResult, TranslatorError> {
        // The language code splitter of rust_tokenizers panics on leading whitespace.
        let text = text.trim_start();
        let tokens = if text.is_empty() {
            Vec::new()
        } else {
            self.tokenizer.tokenize(text)
        };
        let mut input_ids = Vec::with_capacity(tokens.len() + 2);
        input_ids.push(self.source_tag_id);
        input_ids.extend(self.tokenizer.convert_tokens_to_ids(&tokens));
        input_ids.push(self.eos_id);
        Ok(EncodedResult::from_ids(input_ids))
    }

    fn decode(&self, sequences: &[Vec<i64>], skip_special_tokens: bool) -> Vec<String> {
        sequences
            .iter()
            .map(|sequence| {
                let token_ids = if skip_special_tokens {
                    sequence
                        .iter()
                        .copied()
                        .filter(|token_id| !self.special_ids.contains(token_id))
                        .collect::<Vec<_>>()
                } else {
                    sequence.clone()
                };
                self.tokenizer
                    .decode(&token_ids, skip_special_tokens, true)
                    .trim()
                    .to_string()
            })
            .collect()
    }

    fn language_tag_id(&self, tag: &str) -> Result<i64, TranslatorError> {
        let unknown_tag = || TranslatorError::LanguageTagUnknownError {
            language: tag.to_string(),
            tag: tag.to_string(),
        };
        if !LANGUAGE_TAGS.contains(&tag) {
            return Err(unknown_tag());
        }
        let token_id = self.tokenizer.convert_tokens_to_ids(&[tag.to_string()])[0];
        if token_id == self.unk_id {
            Err(unknown_tag())
        } else {
            Ok(token_id)
        }
    }

    fn pad_id(&self) -> i64 {
        self.pad_id
    }
}
