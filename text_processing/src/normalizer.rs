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

use crate::lemma::Lemmatizer;
use crate::stopwords::StopWordList;
use itertools::Itertools;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Multi token spellings that are merged into a single token before cleanup.
const DEFAULT_MERGES: &[(&str, &str)] = &[("k-pop", "kpop"), ("k pop", "kpop")];

/// Colloquial contractions rewritten after the tokens are rejoined.
const DEFAULT_REWRITES: &[(&str, &str)] = &[
    ("gon na ", "go "),
    ("wan na ", "want "),
    ("gonna", "go"),
    ("wanna", "want"),
];

/// Turns raw comment text into a normalized token string.
///
/// The steps are applied in a fixed order: lowercase, domain term merges,
/// stripping everything outside the ascii letter set, dropping one letter
/// tokens and stop words, lemmatization, rejoining and a final pass of
/// contraction rewrites. Deterministic for a given stop word set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: Option<Arc<StopWordList>>,
    lemmatizer: Lemmatizer,
    stemmer: Option<Algorithm>,
    merges: Vec<(String, String)>,
    rewrites: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Some(Arc::new(StopWordList::english())), None)
    }
}

impl Normalizer {
    pub fn new(stop_words: Option<Arc<StopWordList>>, stemmer: Option<Algorithm>) -> Self {
        Self {
            stop_words,
            lemmatizer: Lemmatizer::new(),
            stemmer,
            merges: DEFAULT_MERGES
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            rewrites: DEFAULT_REWRITES
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    /// Replaces the literal substitution tables.
    pub fn with_substitutions(
        mut self,
        merges: Vec<(String, String)>,
        rewrites: Vec<(String, String)>,
    ) -> Self {
        self.merges = merges;
        self.rewrites = rewrites;
        self
    }

    pub fn stop_words(&self) -> Option<&Arc<StopWordList>> {
        self.stop_words.as_ref()
    }

    fn keep(&self, token: &str) -> bool {
        if token.chars().count() <= 1 {
            return false;
        }
        match &self.stop_words {
            Some(stop_words) => !stop_words.contains_both(token),
            None => true,
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut text = text.nfc().collect::<String>().to_lowercase();
        for (from, to) in &self.merges {
            text = text.replace(from.as_str(), to);
        }
        let text = text
            .chars()
            .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
            .collect::<String>();

        let stemmer = self.stemmer.map(Stemmer::create);
        let mut text = text
            .split_whitespace()
            .filter(|token| self.keep(token))
            .map(|token| self.lemmatizer.lemmatize(token))
            .map(|token| match &stemmer {
                Some(stemmer) => stemmer.stem(&token).to_string(),
                None => token.to_string(),
            })
            .join(" ");

        for (from, to) in &self.rewrites {
            text = text.replace(from.as_str(), to);
        }
        text
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merges_domain_terms_before_cleanup() {
        let normalizer = Normalizer::default();
        assert_eq!("kpop", normalizer.normalize("K-Pop"));
        assert_eq!("kpop", normalizer.normalize("k pop"));
        assert_eq!("love kpop", normalizer.normalize("I LOVE K-POP!!!"));
    }

    #[test]
    fn strips_stop_words_and_short_tokens() {
        let normalizer = Normalizer::default();
        assert_eq!(
            "song voice great",
            normalizer.normalize("the songs and the voices are great")
        );
    }

    #[test]
    fn removes_non_ascii_letters() {
        let normalizer = Normalizer::default();
        assert_eq!("best group", normalizer.normalize("best group 123 <3 사랑해"));
    }

    #[test]
    fn rewrites_contractions_last() {
        let normalizer = Normalizer::default();
        assert_eq!("go watch", normalizer.normalize("gonna watch"));
        assert_eq!("want dance", normalizer.normalize("wanna dance"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let normalizer = Normalizer::default();
        for text in [
            "The songs and the voices are great!",
            "I'm gonna stan this K-Pop group forever <3",
            "Their dances, their choreographies... flawless",
            "",
        ] {
            let once = normalizer.normalize(text);
            assert_eq!(once, normalizer.normalize(&once), "unstable for {text:?}");
        }
    }
}
