//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

use isolang::Language;
use serde::{Deserialize, Serialize};
use whatlang::{Info, Script};

/// Converts the detection result of whatlang to an isolang language.
pub trait ToIsoLang {
    fn to_isolang(&self) -> Language;
}

impl ToIsoLang for whatlang::Lang {
    fn to_isolang(&self) -> Language {
        Language::from_639_3(self.code()).unwrap_or(Language::Und)
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct LanguageInformation {
    script: Script,
    lang: Language,
    confidence: f64,
}

impl LanguageInformation {
    pub const fn new(script: Script, lang: Language, confidence: f64) -> Self {
        Self {
            script,
            lang,
            confidence,
        }
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl Eq for LanguageInformation {}

impl PartialEq for LanguageInformation {
    fn eq(&self, other: &Self) -> bool {
        self.lang == other.lang && self.script == other.script
    }
}

impl From<Info> for LanguageInformation {
    fn from(value: Info) -> Self {
        Self {
            script: value.script(),
            lang: value.lang().to_isolang(),
            confidence: value.confidence(),
        }
    }
}

/// Runs the language heuristic over some raw text.
/// Guesses whatlang itself does not consider reliable are discarded.
/// Empty or ambiguous inputs yield [None] instead of an error, a record
/// without a detected language simply drops out of language filtered subsets.
pub fn detect_language(text: &str) -> Option<LanguageInformation> {
    whatlang::detect(text)
        .filter(Info::is_reliable)
        .map(From::from)
}

#[cfg(test)]
mod test {
    use super::*;
    use isolang::Language;

    #[test]
    fn detects_english() {
        let info = detect_language("The quick brown fox jumps over the lazy dog, again and again.")
            .expect("detection should succeed on a full sentence");
        assert_eq!(Language::Eng, info.lang());
    }

    #[test]
    fn empty_text_yields_none() {
        assert!(detect_language("").is_none());
    }

    #[test]
    fn unreliable_guesses_are_discarded() {
        // Short fandom interjections trip whatlang into low confidence
        // guesses at unrelated languages, those must not count.
        for fragment in ["omg", "stan loona", "first"] {
            assert!(
                detect_language(fragment).is_none(),
                "expected no language for {fragment:?}"
            );
        }
    }

    #[test]
    fn whatlang_codes_map_to_isolang() {
        assert_eq!(Language::Kor, whatlang::Lang::Kor.to_isolang());
        assert_eq!(Language::Spa, whatlang::Lang::Spa.to_isolang());
    }
}
