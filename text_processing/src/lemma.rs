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

use compact_str::CompactString;
use std::collections::HashMap;

/// Irregular noun forms that no detachment rule covers.
const IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("wives", "wife"),
    ("lives", "life"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("selves", "self"),
    ("wolves", "wolf"),
];

/// Suffix detachment rules, tried longest first.
/// The pairs mirror the morphological substitutions for nouns.
const RULES: &[(&str, &str)] = &[
    ("ches", "ch"),
    ("shes", "sh"),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("s", ""),
];

/// A small dictionary lemmatizer for nouns.
///
/// Applies an irregular form table first and falls back to suffix detachment.
/// Reapplying it to its own output is a no-op, which keeps the whole
/// normalization idempotent.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
        }
    }

    pub fn lemmatize(&self, word: &str) -> CompactString {
        if let Some(found) = self.irregular.get(word) {
            return CompactString::from(*found);
        }
        for (suffix, replacement) in RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                // words like "bus", "kiss" or "this" carry no plural marker
                if *suffix == "s" && (stem.ends_with('s') || stem.ends_with('u') || stem.ends_with('i')) {
                    break;
                }
                if stem.len() + replacement.len() < 2 {
                    break;
                }
                let mut lemma = CompactString::from(stem);
                lemma.push_str(replacement);
                return lemma;
            }
        }
        CompactString::from(word)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn regular_plurals() {
        let lemma = Lemmatizer::new();
        assert_eq!("song", lemma.lemmatize("songs"));
        assert_eq!("party", lemma.lemmatize("parties"));
        assert_eq!("box", lemma.lemmatize("boxes"));
        assert_eq!("match", lemma.lemmatize("matches"));
    }

    #[test]
    fn irregular_plurals() {
        let lemma = Lemmatizer::new();
        assert_eq!("woman", lemma.lemmatize("women"));
        assert_eq!("child", lemma.lemmatize("children"));
        assert_eq!("life", lemma.lemmatize("lives"));
    }

    #[test]
    fn keeps_non_plurals() {
        let lemma = Lemmatizer::new();
        assert_eq!("bus", lemma.lemmatize("bus"));
        assert_eq!("kiss", lemma.lemmatize("kiss"));
        assert_eq!("this", lemma.lemmatize("this"));
        assert_eq!("go", lemma.lemmatize("go"));
    }

    #[test]
    fn lemmatizing_twice_is_a_noop() {
        let lemma = Lemmatizer::new();
        for word in ["songs", "parties", "women", "voices", "bus", "dance"] {
            let once = lemma.lemmatize(word);
            assert_eq!(once, lemma.lemmatize(&once), "unstable lemma for {word}");
        }
    }
}
