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

use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Dampening factor applied to a valence in the scope of a negation.
const NEGATION_SCALAR: f64 = -0.74;
/// Boost applied by an intensifying adverb, decaying with distance.
const BOOSTER_SCALAR: f64 = 0.293;
/// Normalization constant for the compound score.
const NORMALIZATION_ALPHA: f64 = 15.0;
/// How many preceding tokens are inspected for negations and boosters.
const LOOKBACK: usize = 3;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nothing", "nobody", "cannot", "cant", "dont",
    "doesnt", "didnt", "wont", "wouldnt", "couldnt", "shouldnt", "isnt", "arent", "wasnt",
    "werent", "aint",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_SCALAR),
    ("completely", BOOSTER_SCALAR),
    ("extremely", BOOSTER_SCALAR),
    ("incredibly", BOOSTER_SCALAR),
    ("really", BOOSTER_SCALAR),
    ("so", BOOSTER_SCALAR),
    ("super", BOOSTER_SCALAR),
    ("totally", BOOSTER_SCALAR),
    ("very", BOOSTER_SCALAR),
    ("barely", -BOOSTER_SCALAR),
    ("hardly", -BOOSTER_SCALAR),
    ("kinda", -BOOSTER_SCALAR),
    ("slightly", -BOOSTER_SCALAR),
    ("somewhat", -BOOSTER_SCALAR),
];

/// The predicted polarity of a sentence.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    #[strum(serialize = "pos")]
    Positive,
    #[strum(serialize = "neu")]
    Neutral,
    #[strum(serialize = "neg")]
    Negative,
}

/// Lexicon based polarity scorer.
///
/// Sums the valences of all scored tokens, damping negated terms and
/// boosting intensified ones, and squashes the sum into (-1, 1).
#[derive(Debug, Clone, Default)]
pub struct SentimentIntensityAnalyzer {
    lexicon: Lexicon,
}

impl SentimentIntensityAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn tokenize(sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
            .filter(|token| !token.is_empty())
            .map(|token| token.to_lowercase().replace('\'', ""))
            .collect()
    }

    /// The compound score of a sentence in (-1, 1).
    /// 0.0 for sentences without any scored token.
    pub fn compound(&self, sentence: &str) -> f64 {
        let tokens = Self::tokenize(sentence);
        let mut sum = 0.0;

        for (position, token) in tokens.iter().enumerate() {
            let Some(valence) = self.lexicon.valence(token) else {
                continue;
            };
            let mut valence = valence;
            let lookback_start = position.saturating_sub(LOOKBACK);
            for (distance, preceding) in tokens[lookback_start..position].iter().rev().enumerate() {
                if NEGATIONS.contains(&preceding.as_str()) {
                    valence *= NEGATION_SCALAR;
                    continue;
                }
                if let Some((_, boost)) = BOOSTERS
                    .iter()
                    .find(|(booster, _)| booster == &preceding.as_str())
                {
                    // boosts further away weigh a little less
                    let decay = 1.0 - 0.05 * distance as f64;
                    valence += valence.signum() * boost * decay;
                }
            }
            sum += valence;
        }

        if sum == 0.0 {
            return 0.0;
        }
        let compound = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
        compound.clamp(-1.0, 1.0)
    }

    /// Positive above zero, negative below, neutral at exactly zero.
    pub fn classify_sentence(&self, sentence: &str) -> Polarity {
        let score = self.compound(sentence);
        if score > 0.0 {
            Polarity::Positive
        } else if score < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn analyzer() -> SentimentIntensityAnalyzer {
        SentimentIntensityAnalyzer::default()
    }

    #[test]
    fn positive_negative_neutral() {
        let analyzer = analyzer();
        assert_eq!(
            Polarity::Positive,
            analyzer.classify_sentence("the song is great")
        );
        assert_eq!(
            Polarity::Negative,
            analyzer.classify_sentence("the dance was terrible")
        );
        assert_eq!(
            Polarity::Neutral,
            analyzer.classify_sentence("this was uploaded on a tuesday")
        );
    }

    #[test]
    fn negation_flips_the_sign() {
        let analyzer = analyzer();
        assert_eq!(
            Polarity::Negative,
            analyzer.classify_sentence("the song is not good")
        );
        assert_eq!(
            Polarity::Positive,
            analyzer.classify_sentence("not bad at all")
        );
    }

    #[test]
    fn boosters_amplify() {
        let analyzer = analyzer();
        let plain = analyzer.compound("the voice is good");
        let boosted = analyzer.compound("the voice is really good");
        assert!(boosted > plain);
    }

    #[test]
    fn compound_stays_in_the_open_interval() {
        let analyzer = analyzer();
        let score = analyzer.compound("best best best best best best best best");
        assert!(score > 0.9 && score < 1.0);
    }

    #[test]
    fn overrides_change_the_outcome() {
        let custom = SentimentIntensityAnalyzer::new(
            Lexicon::default().with_overrides([("fighting", 2.0), ("koreaboo", -2.0)]),
        );
        assert_eq!(Polarity::Positive, custom.classify_sentence("fighting!"));
        assert_eq!(
            Polarity::Negative,
            custom.classify_sentence("such a koreaboo")
        );
        assert_eq!(
            Polarity::Neutral,
            analyzer().classify_sentence("fighting!")
        );
    }
}
