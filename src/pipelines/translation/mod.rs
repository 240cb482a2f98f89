//! # Translation pipeline
//!
//! Translation from a fixed source language into any target language supported by a multilingual
//! NLLB-200 model. The pipeline is configured with:
//! - a task name (descriptive)
//! - the source language of the input texts
//! - a language alias table mapping short language codes (e.g. `en`) to the language tags used
//! by the model vocabulary (e.g. `eng_Latn`)
//! - the pretrained model to load (default: `facebook/nllb-200-distilled-600M`)
//!
//! A `TranslatorFactory` holds this configuration and loads a `Translator` on a device. The
//! target language is given for each call to `Translator::predict`: its code is resolved through
//! the alias table and the matching language tag token is forced as the first generated token.
//!
//! ```no_run
//! use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
//!
//! fn main() -> anyhow::Result<()> {
//!     let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
//!     let factory = TranslatorFactory::new("translation", "ko", aliases);
//!     let translator = factory.load("auto")?;
//!
//!     let output = translator.predict("안녕하세요", "en")?;
//!     for sentence in output {
//!         println!("{}", sentence);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The configuration may also be read from a JSON file:
//!
//! ```no_run
//! use nllb_translator::pipelines::translation::{TranslatorConfig, TranslatorFactory};
//! use nllb_translator::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TranslatorConfig::from_file("path/to/translator.json")?;
//!     let translator = TranslatorFactory::from(config).load("cpu")?;
//!     Ok(())
//! }
//! ```

mod factory;
mod languages;
mod translator;

pub use factory::{TranslatorConfig, TranslatorFactory};
pub use languages::LanguageAliases;
pub use translator::{Translator, DEFAULT_MAX_LENGTH};
