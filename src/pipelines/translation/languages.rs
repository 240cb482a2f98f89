use crate::common::error::TranslatorError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// # Mapping from caller-facing language codes to model language tags
/// For NLLB models the tags are FLORES-200 codes, e.g. `"en" -> "eng_Latn"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageAliases(HashMap<String, String>);

impl LanguageAliases {
    /// Resolves a language code to the model language tag.
    ///
    /// # Errors
    ///
    /// * `TranslatorError::LanguageNotSupportedError` if `language` is not a key of the table
    ///
    /// # Example
    ///
    /// ```
    /// use nllb_translator::pipelines::translation::LanguageAliases;
    /// # fn main() -> Result<(), nllb_translator::TranslatorError> {
    /// let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
    /// assert_eq!(aliases.resolve("ko")?, "kor_Hang");
    /// assert!(aliases.resolve("fr").is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn resolve(&self, language: &str) -> Result<&str, TranslatorError> {
        self.get(language).ok_or_else(|| {
            let mut supported = self.0.keys().map(String::as_str).collect::<Vec<_>>();
            supported.sort_unstable();
            TranslatorError::LanguageNotSupportedError(format!(
                "`{}` not in list of supported languages: {:?}",
                language, supported
            ))
        })
    }

    /// Model language tag of `language`, if the table contains it.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for LanguageAliases {
    fn from(aliases: HashMap<String, String>) -> Self {
        Self(aliases)
    }
}

impl<K, V> FromIterator<(K, V)> for LanguageAliases
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, tag)| (code.into(), tag.into()))
                .collect(),
        )
    }
}
