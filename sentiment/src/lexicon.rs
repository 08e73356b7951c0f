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

/// Default term valences on the usual -4.0 to 4.0 scale.
/// A trimmed general purpose list plus the vocabulary that actually shows up
/// in music video comment sections.
const DEFAULT_VALENCES: &[(&str, f64)] = &[
    // positive
    ("adore", 2.7),
    ("amazing", 2.8),
    ("angel", 2.0),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("bless", 2.1),
    ("bop", 2.2),
    ("brilliant", 2.8),
    ("catchy", 1.9),
    ("charming", 2.2),
    ("clean", 1.5),
    ("cool", 1.3),
    ("cute", 2.0),
    ("dope", 2.3),
    ("elegant", 2.1),
    ("energetic", 1.9),
    ("enjoy", 1.9),
    ("epic", 2.5),
    ("excellent", 2.7),
    ("fabulous", 2.3),
    ("fan", 1.3),
    ("fantastic", 2.6),
    ("fav", 2.0),
    ("favorite", 2.0),
    ("favourite", 2.0),
    ("fire", 2.2),
    ("flawless", 2.7),
    ("fresh", 1.3),
    ("fun", 2.3),
    ("genius", 2.6),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 2.6),
    ("great", 3.1),
    ("happy", 2.7),
    ("hope", 1.9),
    ("iconic", 2.4),
    ("impressive", 2.3),
    ("incredible", 2.8),
    ("inspiring", 2.4),
    ("legend", 2.4),
    ("legendary", 2.6),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("masterpiece", 3.0),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("perfection", 2.9),
    ("powerful", 1.8),
    ("pretty", 2.2),
    ("proud", 2.2),
    ("queen", 1.9),
    ("slay", 2.3),
    ("smooth", 1.5),
    ("stunning", 2.7),
    ("sweet", 2.0),
    ("talent", 2.1),
    ("talented", 2.4),
    ("unique", 1.6),
    ("win", 2.6),
    ("wonderful", 2.7),
    ("wow", 2.1),
    // negative
    ("annoying", -1.8),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("cheap", -1.2),
    ("copy", -0.9),
    ("cringe", -1.4),
    ("disappointed", -2.1),
    ("disappointing", -2.1),
    ("disgusting", -2.9),
    ("dislike", -1.6),
    ("embarrassing", -1.9),
    ("fail", -2.3),
    ("fake", -1.9),
    ("flop", -2.0),
    ("garbage", -2.5),
    ("hate", -2.7),
    ("hated", -2.6),
    ("horrible", -2.5),
    ("lame", -1.7),
    ("mess", -1.5),
    ("mid", -1.0),
    ("off-key", -1.6),
    ("offensive", -2.2),
    ("overrated", -1.6),
    ("pathetic", -2.5),
    ("poor", -1.9),
    ("racist", -3.0),
    ("ruin", -2.1),
    ("ruined", -2.2),
    ("sad", -2.1),
    ("shame", -2.1),
    ("stupid", -2.4),
    ("terrible", -2.1),
    ("trash", -2.2),
    ("ugly", -2.6),
    ("untalented", -2.3),
    ("weak", -1.8),
    ("weird", -0.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// The valence lexicon backing the polarity scorer.
/// The default table can be extended or corrected with named overrides,
/// e.g. boosting slang the general list scores wrong.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<CompactString, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            valences: DEFAULT_VALENCES
                .iter()
                .map(|(word, valence)| (CompactString::from(*word), *valence))
                .collect(),
        }
    }
}

impl Lexicon {
    /// Applies named term weight overrides on top of the default table.
    /// Existing entries are replaced, unknown terms are added.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        for (term, valence) in overrides {
            self.valences
                .insert(CompactString::from(term.as_ref()), valence);
        }
        self
    }

    pub fn valence(&self, term: &str) -> Option<f64> {
        self.valences.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn default_lexicon_scores_plain_terms() {
        let lexicon = Lexicon::default();
        assert_approx_eq!(f64, 3.1, lexicon.valence("great").unwrap());
        assert_approx_eq!(f64, -2.7, lexicon.valence("hate").unwrap());
        assert!(lexicon.valence("koreaboo").is_none());
    }

    #[test]
    fn overrides_add_and_replace() {
        let lexicon = Lexicon::default().with_overrides([
            ("fighting", 2.0),
            ("koreaboo", -2.0),
            ("cringe", -2.0),
        ]);
        assert_approx_eq!(f64, 2.0, lexicon.valence("fighting").unwrap());
        assert_approx_eq!(f64, -2.0, lexicon.valence("koreaboo").unwrap());
        // replaced, not duplicated
        assert_approx_eq!(f64, -2.0, lexicon.valence("cringe").unwrap());
    }
}
