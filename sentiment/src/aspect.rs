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

use crate::analyzer::{Polarity, SentimentIntensityAnalyzer};
use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use text_processing::sentences::split_sentences;

/// Maps an aspect name to the trigger substrings that mark a sentence as
/// talking about it. Static configuration, not learned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectLexicon {
    aspects: IndexMap<CompactString, Vec<CompactString>>,
}

impl AspectLexicon {
    pub fn new(aspects: IndexMap<CompactString, Vec<CompactString>>) -> Self {
        Self { aspects }
    }

    pub fn from_entries<'a, I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, T)>,
        T: IntoIterator<Item = &'a str>,
    {
        Self {
            aspects: entries
                .into_iter()
                .map(|(aspect, triggers)| {
                    (
                        CompactString::from(aspect),
                        triggers.into_iter().map(CompactString::from).collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn aspects(&self) -> impl Iterator<Item = &str> {
        self.aspects.keys().map(CompactString::as_str)
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&CompactString, &Vec<CompactString>)> {
        self.aspects.iter()
    }
}

/// One piece of sentiment evidence, a polarity observed for an aspect in a
/// sentence of a comment belonging to a group.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub polarity: Polarity,
    pub group: CompactString,
}

/// Per aspect evidence lists, append only during a scan and read only after.
/// Entries keep the record then sentence traversal order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AspectAggregate {
    entries: IndexMap<CompactString, Vec<SentimentRecord>>,
}

impl AspectAggregate {
    fn for_lexicon(lexicon: &AspectLexicon) -> Self {
        Self {
            entries: lexicon
                .aspects()
                .map(|aspect| (CompactString::from(aspect), Vec::new()))
                .collect(),
        }
    }

    fn push(&mut self, aspect: &str, record: SentimentRecord) {
        if let Some(found) = self.entries.get_mut(aspect) {
            found.push(record);
        }
    }

    pub fn records(&self, aspect: &str) -> &[SentimentRecord] {
        self.entries
            .get(aspect)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SentimentRecord])> {
        self.entries
            .iter()
            .map(|(aspect, records)| (aspect.as_str(), records.as_slice()))
    }

    pub fn total_records(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// The polarity shares for one aspect within one group.
    /// An empty subset yields NaN rates instead of dividing by zero.
    pub fn rates_for(&self, aspect: &str, group: &str) -> PolarityRates {
        let mut rates = PolarityRates::empty(aspect, group);
        for record in self.records(aspect) {
            if record.group == group {
                rates.observations += 1;
                match record.polarity {
                    Polarity::Positive => rates.positive += 1,
                    Polarity::Neutral => rates.neutral += 1,
                    Polarity::Negative => rates.negative += 1,
                }
            }
        }
        rates
    }

    /// Rate rows for every (aspect, group) combination, groups in the given
    /// order. Combinations without evidence are kept as NaN rows so a report
    /// shows them as unknown rather than dropping them.
    pub fn rates(&self, groups: &[&str]) -> Vec<PolarityRates> {
        self.entries
            .keys()
            .flat_map(|aspect| {
                groups
                    .iter()
                    .map(|group| self.rates_for(aspect, group))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Polarity percentages of an aspect within a group.
#[derive(Debug, Clone, Serialize)]
pub struct PolarityRates {
    pub aspect: CompactString,
    pub group: CompactString,
    pub observations: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
}

impl PolarityRates {
    fn empty(aspect: &str, group: &str) -> Self {
        Self {
            aspect: CompactString::from(aspect),
            group: CompactString::from(group),
            observations: 0,
            positive: 0,
            neutral: 0,
            negative: 0,
        }
    }

    fn share(&self, count: usize) -> f64 {
        if self.observations == 0 {
            f64::NAN
        } else {
            count as f64 * 100.0 / self.observations as f64
        }
    }

    pub fn positive_pct(&self) -> f64 {
        self.share(self.positive)
    }

    pub fn neutral_pct(&self) -> f64 {
        self.share(self.neutral)
    }

    pub fn negative_pct(&self) -> f64 {
        self.share(self.negative)
    }
}

impl Display for PolarityRates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.observations == 0 {
            write!(f, "{}/{}: no observations", self.aspect, self.group)
        } else {
            write!(
                f,
                "{}/{}: pos {:.1}% neu {:.1}% neg {:.1}% (n={})",
                self.aspect,
                self.group,
                self.positive_pct(),
                self.neutral_pct(),
                self.negative_pct(),
                self.observations
            )
        }
    }
}

/// Scans sentences for aspect lexicon membership and aggregates one polarity
/// per (aspect, sentence) match.
#[derive(Debug, Clone, Default)]
pub struct AspectSentimentEngine {
    analyzer: SentimentIntensityAnalyzer,
    lexicon: AspectLexicon,
}

impl AspectSentimentEngine {
    pub fn new(analyzer: SentimentIntensityAnalyzer, lexicon: AspectLexicon) -> Self {
        Self { analyzer, lexicon }
    }

    pub fn lexicon(&self) -> &AspectLexicon {
        &self.lexicon
    }

    /// All aspects triggered by the sentence, each with the sentence polarity.
    /// The polarity is computed at most once, no matter how many triggers or
    /// aspects match.
    pub fn scan(&self, sentence: &str) -> IndexMap<&str, Polarity> {
        let sentence = sentence.to_lowercase();
        let mut polarity = None;
        let mut result = IndexMap::new();

        for (aspect, triggers) in self.lexicon.iter() {
            if triggers
                .iter()
                .any(|trigger| sentence.contains(trigger.as_str()))
            {
                let polarity =
                    *polarity.get_or_insert_with(|| self.analyzer.classify_sentence(&sentence));
                result.insert(aspect.as_str(), polarity);
            }
        }
        result
    }

    /// Splits every comment into sentences, scans each and appends the
    /// evidence under the matched aspects, preserving traversal order.
    pub fn aggregate<'a, I>(&self, comments: I) -> AspectAggregate
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut aggregate = AspectAggregate::for_lexicon(&self.lexicon);
        for (text, group) in comments {
            for sentence in split_sentences(text) {
                for (aspect, polarity) in self.scan(sentence) {
                    aggregate.push(
                        aspect,
                        SentimentRecord {
                            polarity,
                            group: CompactString::from(group),
                        },
                    );
                }
            }
        }
        log::debug!(
            "aggregated {} sentiment records over {} aspects",
            aggregate.total_records(),
            self.lexicon.len()
        );
        aggregate
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn engine() -> AspectSentimentEngine {
        AspectSentimentEngine::new(
            SentimentIntensityAnalyzer::default(),
            AspectLexicon::from_entries([
                ("quality", vec!["song", "voice"]),
                ("dance", vec!["dance", "choreo"]),
            ]),
        )
    }

    #[test]
    fn multiple_triggers_score_an_aspect_once() {
        let engine = engine();
        let result = engine.scan("the song and voice are great");
        assert_eq!(1, result.len());
        assert_eq!(Some(&Polarity::Positive), result.get("quality"));
    }

    #[test]
    fn a_sentence_may_match_several_aspects() {
        let engine = engine();
        let result = engine.scan("the song is great but the choreo is weak");
        assert_eq!(2, result.len());
        // one polarity per sentence, recorded under both aspects
        assert_eq!(result.get("quality"), result.get("dance"));
    }

    #[test]
    fn unrelated_sentences_match_nothing() {
        let engine = engine();
        assert!(engine.scan("first comment!").is_empty());
    }

    #[test]
    fn aggregate_preserves_record_then_sentence_order() {
        let engine = engine();
        let aggregate = engine.aggregate([
            ("the song is great", "groupA"),
            ("the song is bad", "groupB"),
        ]);
        assert_eq!(2, aggregate.total_records());
        let records = aggregate.records("quality");
        assert_eq!(
            vec![
                SentimentRecord {
                    polarity: Polarity::Positive,
                    group: CompactString::from("groupA"),
                },
                SentimentRecord {
                    polarity: Polarity::Negative,
                    group: CompactString::from("groupB"),
                },
            ],
            records.to_vec()
        );
    }

    #[test]
    fn rates_guard_empty_subsets() {
        let engine = engine();
        let aggregate = engine.aggregate([("the song is great", "groupA")]);
        let present = aggregate.rates_for("quality", "groupA");
        assert_eq!(1, present.observations);
        assert_eq!(100.0, present.positive_pct());

        let absent = aggregate.rates_for("quality", "groupB");
        assert_eq!(0, absent.observations);
        assert!(absent.positive_pct().is_nan());
        assert!(absent.negative_pct().is_nan());
    }

    #[test]
    fn rates_enumerate_all_combinations() {
        let engine = engine();
        let aggregate = engine.aggregate([("the song is great", "groupA")]);
        let rows = aggregate.rates(&["groupA", "groupB"]);
        assert_eq!(4, rows.len());
    }
}
