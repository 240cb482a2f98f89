//! # NLLB-200 (No Language Left Behind)
//!
//! Implementation of the translation backend for the NLLB-200 models
//! ([No Language Left Behind: Scaling Human-Centered Machine Translation](https://arxiv.org/abs/2207.04672), NLLB Team, 2022).
//! The network is the M2M100 architecture provided by `rust-bert`; tokenization uses the
//! SentencePiece BPE NLLB tokenizer from `rust_tokenizers`.
//!
//! Target languages are selected by forcing the FLORES-200 language tag (e.g. `eng_Latn`) as the
//! first generated token. Pretrained weights are registered for:
//! - `facebook/nllb-200-distilled-600M`
//! - `facebook/nllb-200-1.3B`
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use nllb_translator::nllb::NLLBLanguageAliases;
//! use nllb_translator::pipelines::translation::TranslatorFactory;
//!
//! let translator =
//!     TranslatorFactory::new("translation", "en", NLLBLanguageAliases::default_aliases())
//!         .load("cpu")?;
//! let output = translator.predict("The weather is nice today.", "fr")?;
//! # Ok(())
//! # }
//! ```

mod generator;
mod tokenizer;

pub use generator::NLLBGenerator;
pub use tokenizer::NLLBSourceTokenizer;

use crate::common::error::TranslatorError;
use crate::pipelines::common::{
    ModelSource, TranslationBackend, TranslationGenerator, TranslationTokenizer,
};
use crate::pipelines::translation::LanguageAliases;
use rust_bert::resources::{LocalResource, RemoteResource, ResourceProvider};
use std::path::PathBuf;
use tch::Device;

pub use rust_bert::nllb::{
    NLLBConfigResources, NLLBMergeResources, NLLBResources, NLLBVocabResources,
};

/// Pretrained identifier of the distilled 600M parameters NLLB-200 model.
pub const NLLB_600M_DISTILLED_ID: &str = "facebook/nllb-200-distilled-600M";
/// Pretrained identifier of the 1.3B parameters NLLB-200 model.
pub const NLLB_1_3B_ID: &str = "facebook/nllb-200-1.3B";

/// # FLORES-200 language tags known to the NLLB-200 vocabulary
#[rustfmt::skip]
pub const NLLB_LANGUAGE_TAGS: &[&str] = &[
    "ace_Arab", "ace_Latn", "acm_Arab", "acq_Arab", "aeb_Arab", "afr_Latn", "ajp_Arab", "aka_Latn",
    "amh_Ethi", "apc_Arab", "arb_Arab", "ars_Arab", "ary_Arab", "arz_Arab", "asm_Beng", "ast_Latn",
    "awa_Deva", "ayr_Latn", "azb_Arab", "azj_Latn", "bak_Cyrl", "bam_Latn", "ban_Latn", "bel_Cyrl",
    "bem_Latn", "ben_Beng", "bho_Deva", "bjn_Arab", "bjn_Latn", "bod_Tibt", "bos_Latn", "bug_Latn",
    "bul_Cyrl", "cat_Latn", "ceb_Latn", "ces_Latn", "cjk_Latn", "ckb_Arab", "crh_Latn", "cym_Latn",
    "dan_Latn", "deu_Latn", "dik_Latn", "dyu_Latn", "dzo_Tibt", "ell_Grek", "eng_Latn", "epo_Latn",
    "est_Latn", "eus_Latn", "ewe_Latn", "fao_Latn", "pes_Arab", "fij_Latn", "fin_Latn", "fon_Latn",
    "fra_Latn", "fur_Latn", "fuv_Latn", "gla_Latn", "gle_Latn", "glg_Latn", "grn_Latn", "guj_Gujr",
    "hat_Latn", "hau_Latn", "heb_Hebr", "hin_Deva", "hne_Deva", "hrv_Latn", "hun_Latn", "hye_Armn",
    "ibo_Latn", "ilo_Latn", "ind_Latn", "isl_Latn", "ita_Latn", "jav_Latn", "jpn_Jpan", "kab_Latn",
    "kac_Latn", "kam_Latn", "kan_Knda", "kas_Arab", "kas_Deva", "kat_Geor", "knc_Arab", "knc_Latn",
    "kaz_Cyrl", "kbp_Latn", "kea_Latn", "khm_Khmr", "kik_Latn", "kin_Latn", "kir_Cyrl", "kmb_Latn",
    "kon_Latn", "kor_Hang", "kmr_Latn", "lao_Laoo", "lvs_Latn", "lij_Latn", "lim_Latn", "lin_Latn",
    "lit_Latn", "lmo_Latn", "ltg_Latn", "ltz_Latn", "lua_Latn", "lug_Latn", "luo_Latn", "lus_Latn",
    "mag_Deva", "mai_Deva", "mal_Mlym", "mar_Deva", "min_Latn", "mkd_Cyrl", "plt_Latn", "mlt_Latn",
    "mni_Beng", "khk_Cyrl", "mos_Latn", "mri_Latn", "zsm_Latn", "mya_Mymr", "nld_Latn", "nno_Latn",
    "nob_Latn", "npi_Deva", "nso_Latn", "nus_Latn", "nya_Latn", "oci_Latn", "gaz_Latn", "ory_Orya",
    "pag_Latn", "pan_Guru", "pap_Latn", "pol_Latn", "por_Latn", "prs_Arab", "pbt_Arab", "quy_Latn",
    "ron_Latn", "run_Latn", "rus_Cyrl", "sag_Latn", "san_Deva", "sat_Beng", "scn_Latn", "shn_Mymr",
    "sin_Sinh", "slk_Latn", "slv_Latn", "smo_Latn", "sna_Latn", "snd_Arab", "som_Latn", "sot_Latn",
    "spa_Latn", "als_Latn", "srd_Latn", "srp_Cyrl", "ssw_Latn", "sun_Latn", "swe_Latn", "swh_Latn",
    "szl_Latn", "tam_Taml", "tat_Cyrl", "tel_Telu", "tgk_Cyrl", "tgl_Latn", "tha_Thai", "tir_Ethi",
    "taq_Latn", "taq_Tfng", "tpi_Latn", "tsn_Latn", "tso_Latn", "tuk_Latn", "tum_Latn", "tur_Latn",
    "twi_Latn", "tzm_Tfng", "uig_Arab", "ukr_Cyrl", "umb_Latn", "urd_Arab", "uzn_Latn", "vec_Latn",
    "vie_Latn", "war_Latn", "wol_Latn", "xho_Latn", "ydd_Hebr", "yor_Latn", "yue_Hant", "zho_Hans",
    "zho_Hant", "zul_Latn",
];

pub struct NLLBLanguageAliases;

impl NLLBLanguageAliases {
    /// ISO 639-1 codes of widely used languages and their FLORES-200 tag
    #[rustfmt::skip]
    pub const DEFAULT: [(&'static str, &'static str); 36] = [
        ("ar", "arb_Arab"), ("bn", "ben_Beng"), ("cs", "ces_Latn"), ("da", "dan_Latn"),
        ("de", "deu_Latn"), ("el", "ell_Grek"), ("en", "eng_Latn"), ("es", "spa_Latn"),
        ("fa", "pes_Arab"), ("fi", "fin_Latn"), ("fr", "fra_Latn"), ("he", "heb_Hebr"),
        ("hi", "hin_Deva"), ("hu", "hun_Latn"), ("id", "ind_Latn"), ("it", "ita_Latn"),
        ("ja", "jpn_Jpan"), ("ko", "kor_Hang"), ("ms", "zsm_Latn"), ("nl", "nld_Latn"),
        ("no", "nob_Latn"), ("pl", "pol_Latn"), ("pt", "por_Latn"), ("ro", "ron_Latn"),
        ("ru", "rus_Cyrl"), ("sk", "slk_Latn"), ("sv", "swe_Latn"), ("sw", "swh_Latn"),
        ("ta", "tam_Taml"), ("th", "tha_Thai"), ("tl", "tgl_Latn"), ("tr", "tur_Latn"),
        ("uk", "ukr_Cyrl"), ("ur", "urd_Arab"), ("vi", "vie_Latn"), ("zh", "zho_Hans"),
    ];

    pub fn default_aliases() -> LanguageAliases {
        LanguageAliases::from_iter(Self::DEFAULT)
    }
}

/// # Local paths of the files making up an NLLB model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NLLBModelFiles {
    pub weights: PathBuf,
    pub config: PathBuf,
    pub vocab: PathBuf,
    pub merges: PathBuf,
}

struct NLLBModelResources {
    weights: Box<dyn ResourceProvider + Send>,
    config: Box<dyn ResourceProvider + Send>,
    vocab: Box<dyn ResourceProvider + Send>,
    merges: Box<dyn ResourceProvider + Send>,
}

impl NLLBModelResources {
    fn from_source(model: &ModelSource) -> Result<NLLBModelResources, TranslatorError> {
        Ok(match model {
            ModelSource::Pretrained(id) => match id.as_str() {
                NLLB_600M_DISTILLED_ID => NLLBModelResources {
                    weights: Box::new(RemoteResource::from_pretrained(
                        NLLBResources::NLLB_600M_DISTILLED,
                    )),
                    config: Box::new(RemoteResource::from_pretrained(
                        NLLBConfigResources::NLLB_600M_DISTILLED,
                    )),
                    vocab: Box::new(RemoteResource::from_pretrained(
                        NLLBVocabResources::NLLB_600M_DISTILLED,
                    )),
                    merges: Box::new(RemoteResource::from_pretrained(
                        NLLBMergeResources::NLLB_600M_DISTILLED,
                    )),
                },
                NLLB_1_3B_ID => NLLBModelResources {
                    weights: Box::new(RemoteResource::from_pretrained(NLLBResources::NLLB_1_3B)),
                    config: Box::new(RemoteResource::from_pretrained(
                        NLLBConfigResources::NLLB_1_3B,
                    )),
                    vocab: Box::new(RemoteResource::from_pretrained(
                        NLLBVocabResources::NLLB_1_3B,
                    )),
                    merges: Box::new(RemoteResource::from_pretrained(
                        NLLBMergeResources::NLLB_1_3B,
                    )),
                },
                other => {
                    return Err(TranslatorError::ModelLoadError(format!(
                        "unknown pretrained model `{}` (available: {}, {})",
                        other, NLLB_600M_DISTILLED_ID, NLLB_1_3B_ID
                    )))
                }
            },
            ModelSource::Local {
                weights,
                config,
                vocab,
                merges,
            } => NLLBModelResources {
                weights: Box::new(LocalResource {
                    local_path: weights.clone(),
                }),
                config: Box::new(LocalResource {
                    local_path: config.clone(),
                }),
                vocab: Box::new(LocalResource {
                    local_path: vocab.clone(),
                }),
                merges: Box::new(LocalResource {
                    local_path: merges.clone(),
                }),
            },
        })
    }

    fn tokenizer_files(&self) -> Result<(PathBuf, PathBuf), TranslatorError> {
        Ok((
            local_file(&*self.vocab)?,
            local_file(&*self.merges)?,
        ))
    }

    fn model_files(&self) -> Result<NLLBModelFiles, TranslatorError> {
        let (vocab, merges) = self.tokenizer_files()?;
        Ok(NLLBModelFiles {
            weights: local_file(&*self.weights)?,
            config: local_file(&*self.config)?,
            vocab,
            merges,
        })
    }
}

/// Downloads remote resources to the rust-bert cache (`RUSTBERT_CACHE`) and checks that the
/// resolved file exists.
fn local_file(resource: &(dyn ResourceProvider + Send)) -> Result<PathBuf, TranslatorError> {
    let path = resource.get_local_path().map_err(|e| {
        TranslatorError::ModelLoadError(format!("could not fetch model resource: {}", e))
    })?;
    if path.is_file() {
        Ok(path)
    } else {
        Err(TranslatorError::ModelLoadError(format!(
            "model resource {} not found",
            path.display()
        )))
    }
}

/// # Backend loading pretrained NLLB-200 tokenizers and models
/// Remote artifacts are downloaded on first use to the rust-bert cache directory
/// (`RUSTBERT_CACHE`, defaulting to `~/.cache/.rustbert`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NLLBBackend;

impl TranslationBackend for NLLBBackend {
    fn load_tokenizer(
        &self,
        model: &ModelSource,
        source_tag: &str,
    ) -> Result<Box<dyn TranslationTokenizer>, TranslatorError> {
        let (vocab_path, merges_path) = NLLBModelResources::from_source(model)?.tokenizer_files()?;
        Ok(Box::new(NLLBSourceTokenizer::from_files(
            vocab_path,
            merges_path,
            source_tag,
        )?))
    }

    fn load_model(
        &self,
        model: &ModelSource,
        device: Device,
    ) -> Result<Box<dyn TranslationGenerator>, TranslatorError> {
        let files = NLLBModelResources::from_source(model)?.model_files()?;
        Ok(Box::new(NLLBGenerator::new(&files, device)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_aliases_point_to_known_tags() {
        let tags = NLLB_LANGUAGE_TAGS.iter().collect::<HashSet<_>>();
        for (_, tag) in NLLBLanguageAliases::DEFAULT.iter() {
            assert!(tags.contains(tag), "{} is not an NLLB language tag", tag);
        }
    }

    #[test]
    fn language_tags_are_unique() {
        let tags = NLLB_LANGUAGE_TAGS.iter().collect::<HashSet<_>>();
        assert_eq!(tags.len(), NLLB_LANGUAGE_TAGS.len());
    }

    #[test]
    fn unknown_pretrained_model_is_a_load_error() {
        let backend = NLLBBackend;
        let source = ModelSource::Pretrained("facebook/m2m100_418M".to_string());

        assert!(matches!(
            backend.load_model(&source, Device::Cpu),
            Err(TranslatorError::ModelLoadError(_))
        ));
    }

    #[test]
    fn missing_local_files_are_a_load_error() {
        let backend = NLLBBackend;
        let source = ModelSource::Local {
            weights: PathBuf::from("/nonexistent/rust_model.ot"),
            config: PathBuf::from("/nonexistent/config.json"),
            vocab: PathBuf::from("/nonexistent/tokenizer.json"),
            merges: PathBuf::from("/nonexistent/sentencepiece.bpe.model"),
        };

        assert!(matches!(
            backend.load_tokenizer(&source, "kor_Hang"),
            Err(TranslatorError::ModelLoadError(_))
        ));
        assert!(matches!(
            backend.load_model(&source, Device::Cpu),
            Err(TranslatorError::ModelLoadError(_))
        ));
    }
}
