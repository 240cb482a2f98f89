use crate::common::error::TranslatorError;
use crate::nllb::NLLBModelFiles;
use crate::pipelines::common::TranslationGenerator;
use crate::pipelines::translation::DEFAULT_MAX_LENGTH;
use rust_bert::m2m_100::M2M100Generator;
use rust_bert::pipelines::common::{ModelResource, ModelType, TokenizerOption};
use rust_bert::pipelines::generation_utils::{GenerateConfig, GenerateOptions, LanguageGenerator};
use rust_bert::resources::LocalResource;
use std::path::Path;
use tch::{Device, Tensor};

/// # NLLB conditional generation model
/// M2M100 encoder-decoder with greedy decoding (`num_beams = 1`, no sampling), so identical
/// inputs always produce identical translations.
pub struct NLLBGenerator {
    model: M2M100Generator,
}

fn path_str(path: &Path) -> Result<&str, TranslatorError> {
    path.to_str().ok_or_else(|| {
        TranslatorError::ModelLoadError(format!("non UTF-8 resource path {}", path.display()))
    })
}

impl NLLBGenerator {
    /// Loads the model weights from local files and places them on `device`.
    ///
    /// `M2M100Generator` takes ownership of a `TokenizerOption`, which it uses for its special
    /// token ids, so the vocabulary is loaded here a second time next to the `NLLBSourceTokenizer`
    /// returned by `NLLBBackend::load_tokenizer`.
    pub fn new(files: &NLLBModelFiles, device: Device) -> Result<NLLBGenerator, TranslatorError> {
        let tokenizer = TokenizerOption::from_file(
            ModelType::NLLB,
            path_str(&files.vocab)?,
            Some(path_str(&files.merges)?),
            false,
            None,
            None,
        )
        .map_err(|e| {
            TranslatorError::ModelLoadError(format!("could not load NLLB tokenizer: {}", e))
        })?;

        let generate_config = GenerateConfig {
            model_type: ModelType::NLLB,
            model_resource: ModelResource::Torch(Box::new(LocalResource {
                local_path: files.weights.clone(),
            })),
            config_resource: Box::new(LocalResource {
                local_path: files.config.clone(),
            }),
            vocab_resource: Box::new(LocalResource {
                local_path: files.vocab.clone(),
            }),
            merges_resource: Some(Box::new(LocalResource {
                local_path: files.merges.clone(),
            })),
            max_length: Some(DEFAULT_MAX_LENGTH),
            do_sample: false,
            num_beams: 1,
            device,
            ..Default::default()
        };

        let model = M2M100Generator::new_with_tokenizer(generate_config, tokenizer).map_err(|e| {
            TranslatorError::ModelLoadError(format!(
                "could not load NLLB model from {}: {}",
                files.weights.display(),
                e
            ))
        })?;
        Ok(NLLBGenerator { model })
    }
}

impl TranslationGenerator for NLLBGenerator {
    fn generate(
        &self,
        input_ids: Tensor,
        attention_mask: Tensor,
        forced_bos_token_id: i64,
        max_length: i64,
    ) -> Result<Vec<Vec<i64>>, TranslatorError> {
        let generate_options = GenerateOptions {
            forced_bos_token_id: Some(forced_bos_token_id),
            max_length: Some(max_length),
            ..Default::default()
        };
        let output = self
            .model
            .generate_from_ids_and_past(input_ids, Some(attention_mask), Some(generate_options))
            .map_err(|e| TranslatorError::GenerationError(e.to_string()))?;
        Ok(output.into_iter().map(|output| output.indices).collect())
    }
}
