//! # Ready-to-use translation pipeline
//!
//! - `translation`: `TranslatorFactory` and `Translator`, translating a text from a fixed source
//! language into a target language selected per call through a language alias table.
//! - `encoding`: normalization of tokenizer outputs (flat or batched) into a padded batch.
//! - `common`: interfaces to the tokenizer and model implementations and device selection.
//!
//! #### Translation
//! ```no_run
//! use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
//!
//! # fn main() -> anyhow::Result<()> {
//! let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
//! let translator = TranslatorFactory::new("translation", "ko", aliases).load("cpu")?;
//! let output = translator.predict("오늘 날씨가 좋네요.", "en")?;
//! # Ok(())
//! # }
//! ```
//! Output: \
//! `["The weather is nice today."]`

pub mod common;
pub mod encoding;
pub mod translation;
