use rust_tokenizers::error::TokenizerError;
use tch::TchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Language not supported: {0}")]
    LanguageNotSupportedError(String),

    #[error("Language tag `{tag}` (resolved from `{language}`) is not in the model vocabulary")]
    LanguageTagUnknownError { language: String, tag: String },

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    #[error("Tch tensor error: {0}")]
    TchError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Invalid configuration error: {0}")]
    InvalidConfigurationError(String),

    #[error("Value error: {0}")]
    ValueError(String),
}

impl From<std::io::Error> for TranslatorError {
    fn from(error: std::io::Error) -> Self {
        TranslatorError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslatorError {
    fn from(error: serde_json::Error) -> Self {
        TranslatorError::InvalidConfigurationError(error.to_string())
    }
}

impl From<TokenizerError> for TranslatorError {
    fn from(error: TokenizerError) -> Self {
        TranslatorError::TokenizerError(error.to_string())
    }
}

impl From<TchError> for TranslatorError {
    fn from(error: TchError) -> Self {
        TranslatorError::TchError(error.to_string())
    }
}
