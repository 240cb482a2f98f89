use nllb_translator::nllb::{
    NLLBLanguageAliases, NLLBMergeResources, NLLBSourceTokenizer, NLLBVocabResources,
};
use nllb_translator::pipelines::common::TranslationTokenizer;
use nllb_translator::pipelines::encoding::EncodedResult;
use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
use nllb_translator::TranslatorError;
use rust_bert::resources::{RemoteResource, ResourceProvider};

fn korean_tokenizer() -> anyhow::Result<NLLBSourceTokenizer> {
    let vocab_path =
        RemoteResource::from_pretrained(NLLBVocabResources::NLLB_600M_DISTILLED).get_local_path()?;
    let merges_path =
        RemoteResource::from_pretrained(NLLBMergeResources::NLLB_600M_DISTILLED).get_local_path()?;
    Ok(NLLBSourceTokenizer::from_files(vocab_path, merges_path, "kor_Hang")?)
}

#[test]
#[cfg_attr(not(feature = "all-tests"), ignore)]
fn nllb_tokenizer_frames_source_language() -> anyhow::Result<()> {
    let tokenizer = korean_tokenizer()?;

    let encoded = tokenizer.encode("안녕하세요")?;
    let batch = encoded.normalize(tokenizer.pad_id())?;

    assert_eq!(batch.batch_size(), 1);
    assert_eq!(batch.input_ids[0][0], tokenizer.source_tag_id());
    assert_eq!(batch.input_ids[0].len(), batch.attention_mask[0].len());
    assert!(batch.input_ids[0].len() > 2);

    let empty = tokenizer.encode("")?;
    assert!(matches!(
        empty,
        EncodedResult::Unbatched { ref input_ids, .. } if input_ids.len() == 2
    ));

    assert!(tokenizer.language_tag_id("eng_Latn")? > 0);
    assert!(matches!(
        tokenizer.language_tag_id("xxx_Xxxx"),
        Err(TranslatorError::LanguageTagUnknownError { .. })
    ));
    Ok(())
}

#[test]
#[cfg_attr(not(feature = "all-tests"), ignore)]
fn nllb_translation() -> anyhow::Result<()> {
    let aliases = LanguageAliases::from_iter([("en", "eng_Latn"), ("ko", "kor_Hang")]);
    let translator = TranslatorFactory::new("translation", "ko", aliases).load("cpu")?;

    let output = translator.predict("안녕하세요", "en")?;

    assert_eq!(output.len(), 1);
    assert!(!output[0].is_empty());
    assert!(!output[0].contains("eng_Latn"));
    assert!(!output[0].contains("</s>"));

    let repeated = translator.predict("안녕하세요", "en")?;
    assert_eq!(output, repeated);
    Ok(())
}

#[test]
#[cfg_attr(not(feature = "all-tests"), ignore)]
fn nllb_translation_multiple_targets() -> anyhow::Result<()> {
    let translator =
        TranslatorFactory::new("translation", "en", NLLBLanguageAliases::default_aliases())
            .load("cpu")?;

    let source_sentence = "This sentence will be translated in multiple languages.";

    let mut outputs = Vec::new();
    outputs.extend(translator.predict(source_sentence, "fr")?);
    outputs.extend(translator.predict(source_sentence, "es")?);
    outputs.extend(translator.predict(source_sentence, "hi")?);

    assert_eq!(outputs.len(), 3);
    assert!(outputs.iter().all(|output| !output.is_empty()));
    assert!(matches!(
        translator.predict(source_sentence, "tlh"),
        Err(TranslatorError::LanguageNotSupportedError(_))
    ));
    Ok(())
}
