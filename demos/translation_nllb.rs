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

use nllb_translator::pipelines::translation::{LanguageAliases, TranslatorFactory};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let device = std::env::args().nth(1).unwrap_or_else(|| "auto".to_string());
    let aliases = LanguageAliases::from_iter([
        ("en", "eng_Latn"),
        ("ko", "kor_Hang"),
        ("ja", "jpn_Jpan"),
        ("fr", "fra_Latn"),
    ]);
    let translator = TranslatorFactory::new("translation", "ko", aliases).load(&device)?;

    let source_sentence = "이 문장은 여러 언어로 번역될 것입니다.";

    let mut outputs = Vec::new();
    outputs.extend(translator.predict(source_sentence, "en")?);
    outputs.extend(translator.predict(source_sentence, "ja")?);
    outputs.extend(translator.predict(source_sentence, "fr")?);

    for sentence in outputs {
        println!("{sentence}");
    }
    Ok(())
}
