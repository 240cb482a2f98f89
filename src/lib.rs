//! Ready-to-use multilingual translation based on the NLLB-200 family of pretrained models
//! ([No Language Left Behind](https://arxiv.org/abs/2207.04672)).
//!
//! The crate exposes a two-step surface: a `TranslatorFactory` holding the configuration (task
//! name, source language and a language alias table) loads a `Translator` on a device, which then
//! translates texts into any language of the alias table.
//!
//! The pretrained network, its tokenizer and the decoding algorithm are provided by
//! [rust-bert](https://crates.io/crates/rust-bert), [rust_tokenizers](https://crates.io/crates/rust_tokenizers)
//! and [tch](https://crates.io/crates/tch) (Rust bindings to `libtorch`). The crate contributes:
//! - normalization of the tokenizer output into a padded batch, whether the tokenizer returned a
//! flat sequence of ids or an already batched structure
//! - the resolution of a short target language code (e.g. `en`) through the alias table into the
//! model language tag (`eng_Latn`) forced as the first generated token
//!
//! # Loading pre-trained models
//!
//! Model weights, configuration and tokenizer files are downloaded on first use through the
//! `rust-bert` resource cache, in `$XDG_CACHE_HOME/.rustbert` (or the `RUSTBERT_CACHE` environment
//! variable when set). Local files can be used instead with `ModelSource::Local`.
//!
//! # Example
//!
//! ```no_run
//! use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
//!
//! # fn main() -> anyhow::Result<()> {
//! let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
//! let factory = TranslatorFactory::new("translation", "ko", aliases);
//! let translator = factory.load("cuda")?;
//!
//! let output = translator.predict("안녕하세요", "en")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Model loading and the stages of each prediction are reported through
//! [tracing](https://crates.io/crates/tracing). No subscriber is installed by this crate.

mod common;
pub mod nllb;
pub mod pipelines;

pub use common::error::TranslatorError;
pub use common::Config;
