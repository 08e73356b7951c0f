// Copyright 2024. Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Plain text summary tables over a prepared corpus and a sentiment
//! aggregate.

use crate::corpus::Corpus;
use indexmap::IndexMap;
use isolang::Language;
use itertools::Itertools;
use sentiment::aspect::AspectAggregate;
use std::fmt::Write;

/// The language share of one group, strongest languages first.
#[derive(Debug, Clone)]
pub struct LanguageDistribution {
    pub group: String,
    pub total: usize,
    /// (language, count) for the `top_n` strongest languages.
    pub top: Vec<(Language, usize)>,
    /// Everything outside `top`, detection failures included.
    pub others: usize,
}

impl LanguageDistribution {
    pub fn share(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }
}

/// Counts detected languages per group, keeping the `top_n` strongest per
/// group and folding the rest into `others`. Groups keep their corpus
/// order.
pub fn language_distribution(corpus: &Corpus, top_n: usize) -> Vec<LanguageDistribution> {
    let mut per_group: IndexMap<&str, IndexMap<Option<Language>, usize>> = IndexMap::new();
    for record in corpus.records() {
        *per_group
            .entry(record.group.as_str())
            .or_default()
            .entry(record.language)
            .or_default() += 1;
    }

    per_group
        .into_iter()
        .map(|(group, counts)| {
            let total = counts.values().sum::<usize>();
            let top = counts
                .iter()
                .filter_map(|(language, count)| language.map(|language| (language, *count)))
                .sorted_by(|(_, a), (_, b)| b.cmp(a))
                .take(top_n)
                .collect::<Vec<_>>();
            let others = total - top.iter().map(|(_, count)| count).sum::<usize>();
            LanguageDistribution {
                group: group.to_string(),
                total,
                top,
                others,
            }
        })
        .collect()
}

pub fn render_language_distribution(distributions: &[LanguageDistribution]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "language distribution per group");
    for distribution in distributions {
        let _ = writeln!(
            out,
            "  {} ({} comments)",
            distribution.group, distribution.total
        );
        for (language, count) in &distribution.top {
            let _ = writeln!(
                out,
                "    {:<12} {:>5} ({:.1}%)",
                language.to_name(),
                count,
                distribution.share(*count)
            );
        }
        if distribution.others > 0 {
            let _ = writeln!(
                out,
                "    {:<12} {:>5} ({:.1}%)",
                "others",
                distribution.others,
                distribution.share(distribution.others)
            );
        }
    }
    out
}

/// One row per (aspect, group) combination with the polarity shares.
/// Combinations without evidence read as a dash instead of NaN noise.
pub fn render_polarity_table(aggregate: &AspectAggregate, groups: &[&str]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<12} {:>6} {:>8} {:>8} {:>8}",
        "aspect", "group", "n", "pos%", "neu%", "neg%"
    );
    for rates in aggregate.rates(groups) {
        if rates.observations == 0 {
            let _ = writeln!(
                out,
                "{:<12} {:<12} {:>6} {:>8} {:>8} {:>8}",
                rates.aspect, rates.group, 0, "-", "-", "-"
            );
        } else {
            let _ = writeln!(
                out,
                "{:<12} {:<12} {:>6} {:>8.1} {:>8.1} {:>8.1}",
                rates.aspect,
                rates.group,
                rates.observations,
                rates.positive_pct(),
                rates.neutral_pct(),
                rates.negative_pct()
            );
        }
    }
    out
}

/// The per class vocabulary rankings as a readable block.
pub fn render_class_features(category: &str, ranked: &[(u8, Vec<(String, f64)>)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "strongest features for {category:?}");
    for (class, features) in ranked {
        let _ = writeln!(out, "  class {class}");
        for (name, weight) in features {
            let _ = writeln!(out, "    {name:<20} {weight:.4}");
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::corpus::test_corpus;

    #[test]
    fn distribution_counts_and_folds_others() {
        let mut corpus = test_corpus(&[
            ("a", "kaachi"),
            ("b", "kaachi"),
            ("c", "kaachi"),
            ("d", "blackswan"),
        ]);
        corpus.record_mut(0).language = Some(Language::Eng);
        corpus.record_mut(1).language = Some(Language::Eng);
        corpus.record_mut(2).language = Some(Language::Kor);
        // record 3 stays undetected

        let distributions = language_distribution(&corpus, 1);
        assert_eq!(2, distributions.len());

        let kaachi = &distributions[0];
        assert_eq!("kaachi", kaachi.group);
        assert_eq!(3, kaachi.total);
        assert_eq!(vec![(Language::Eng, 2)], kaachi.top);
        assert_eq!(1, kaachi.others);

        let blackswan = &distributions[1];
        assert_eq!(1, blackswan.total);
        assert!(blackswan.top.is_empty());
        assert_eq!(1, blackswan.others);
    }

    #[test]
    fn empty_group_share_is_zero_not_nan() {
        let distribution = LanguageDistribution {
            group: "empty".to_string(),
            total: 0,
            top: Vec::new(),
            others: 0,
        };
        assert_eq!(0.0, distribution.share(0));
    }

    #[test]
    fn rendered_distribution_lists_groups_and_others() {
        let mut corpus = test_corpus(&[("a", "kaachi"), ("b", "kaachi")]);
        corpus.record_mut(0).language = Some(Language::Eng);
        let rendered = render_language_distribution(&language_distribution(&corpus, 3));
        assert!(rendered.contains("kaachi (2 comments)"));
        assert!(rendered.contains("English"));
        assert!(rendered.contains("others"));
        assert!(rendered.contains("50.0%"));
    }

    #[test]
    fn polarity_table_shows_dashes_for_missing_evidence() {
        let aggregate = AspectAggregate::default();
        let rendered = render_polarity_table(&aggregate, &["kaachi"]);
        assert!(rendered.starts_with("aspect"));
        // no aspects, so only the header line
        assert_eq!(1, rendered.lines().count());
    }

    #[test]
    fn class_features_render_per_class() {
        let ranked = vec![
            (0u8, vec![("terrible".to_string(), 0.4)]),
            (1u8, vec![("great".to_string(), 0.6)]),
        ];
        let rendered = render_class_features("kpop", &ranked);
        assert!(rendered.contains("class 0"));
        assert!(rendered.contains("terrible"));
        assert!(rendered.contains("class 1"));
        assert!(rendered.contains("0.6000"));
    }
}
