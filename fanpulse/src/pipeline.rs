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

//! The stages from raw comments to labeled corpus, trained classifiers and
//! aspect sentiment tables.

use crate::corpus::Corpus;
use crate::labeling::{LabelingSession, LabelPort, SessionError};
use bayes::inspect::{top_features_by_class, InspectError};
use bayes::{train_with_rng, DocumentClassifier, TrainError, TrainerConfig};
use rand::Rng;
use sentiment::aspect::{AspectAggregate, AspectSentimentEngine};
use text_processing::detect_language;
use text_processing::normalizer::Normalizer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("training the {category:?} classifier failed: {source}")]
    Train {
        category: String,
        #[source]
        source: TrainError,
    },
    #[error(transparent)]
    Inspect(#[from] InspectError),
}

/// What [prepare] did to the corpus.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PrepareStats {
    pub total: usize,
    pub detected: usize,
    pub english: usize,
    pub normalized: usize,
}

/// Detects the language of every record once and normalizes the english
/// subset once. Calling it again is a no-op for records already prepared.
pub fn prepare(corpus: &mut Corpus, normalizer: &Normalizer) -> PrepareStats {
    let mut stats = PrepareStats::default();
    for record in corpus.records_mut() {
        stats.total += 1;
        if record.language.is_none() {
            record.language = detect_language(&record.text).map(|info| info.lang());
            stats.detected += 1;
        }
        if record.language == Some(isolang::Language::Eng) {
            stats.english += 1;
            if record.normalized.is_none() {
                record.normalized = Some(normalizer.normalize(&record.text));
                stats.normalized += 1;
            }
        }
    }
    log::info!(
        "prepared {} records, {} english, normalized {}",
        stats.total,
        stats.english,
        stats.normalized
    );
    stats
}

/// Runs a labeling session over the english subset of the corpus.
pub fn label<P, R>(
    corpus: &mut Corpus,
    session: &LabelingSession,
    port: &mut P,
    rng: &mut R,
) -> Result<crate::labeling::SessionOutcome, PipelineError>
where
    P: LabelPort + ?Sized,
    R: Rng + ?Sized,
{
    let view = corpus.english_indices();
    Ok(session.run(corpus, &view, port, rng)?)
}

/// The (label, normalized text) pairs backing one category, in corpus order.
/// Records labeled for the category but not yet normalized are skipped with
/// a warning.
fn training_entries<'a>(corpus: &'a Corpus, category: &str) -> Vec<(u8, &'a str)> {
    let mut entries = Vec::new();
    for index in corpus.labeled_indices(category) {
        let record = corpus.record(index);
        match (&record.normalized, record.label(category)) {
            (Some(text), Some(label)) => entries.push((label, text.as_str())),
            _ => log::warn!(
                "record {} is labeled for {category:?} but has no normalized text, skipped",
                record.id
            ),
        }
    }
    entries
}

/// Trains one classifier per the acceptance gate over the hand labeled
/// english records of `category`.
pub fn train_category<R: Rng + ?Sized>(
    corpus: &Corpus,
    category: &str,
    cfg: &TrainerConfig,
    rng: &mut R,
) -> Result<DocumentClassifier, PipelineError> {
    let entries = training_entries(corpus, category);
    let stop_words = text_processing::StopWordList::english();
    train_with_rng(category, &entries, Some(&stop_words), cfg, rng).map_err(|source| {
        PipelineError::Train {
            category: category.to_string(),
            source,
        }
    })
}

/// Predicts the classifier's category over every normalized english record,
/// overwriting any previous value including the hand labels.
pub fn apply_category(corpus: &mut Corpus, classifier: &DocumentClassifier) -> usize {
    let indices = corpus.english_indices();
    let mut applied = 0;
    for index in indices {
        let record = corpus.record_mut(index);
        if let Some(text) = record.normalized.clone() {
            let label = classifier.predict(&text);
            record.set_label(classifier.category(), label);
            applied += 1;
        }
    }
    log::info!(
        "applied the {:?} classifier to {applied} records",
        classifier.category()
    );
    applied
}

/// The heaviest vocabulary per predicted class of one category, computed
/// over the normalized english records.
pub fn inspect_category(
    corpus: &Corpus,
    classifier: &DocumentClassifier,
    min_weight: f64,
    top_n: usize,
) -> Result<Vec<(u8, Vec<(String, f64)>)>, PipelineError> {
    let mut matrix = Vec::new();
    let mut labels = Vec::new();
    for index in corpus.english_indices() {
        let record = corpus.record(index);
        if let (Some(text), Some(label)) = (&record.normalized, record.label(classifier.category()))
        {
            matrix.push(classifier.vectorize(text));
            labels.push(label);
        }
    }
    let ranked = top_features_by_class(
        &matrix,
        &labels,
        classifier.vectorizer().feature_names(),
        min_weight,
        top_n,
    )?;
    Ok(ranked
        .into_iter()
        .map(|(class, features)| {
            (
                class,
                features
                    .into_iter()
                    .map(|(name, weight)| (name.to_string(), weight))
                    .collect(),
            )
        })
        .collect())
}

/// Aggregates aspect sentiment over the raw text of records predicted
/// relevant by `filter_category`, or over all english records when no
/// filter is given.
pub fn sentiment_aggregate(
    corpus: &Corpus,
    engine: &AspectSentimentEngine,
    filter_category: Option<&str>,
) -> AspectAggregate {
    let comments = corpus
        .english_indices()
        .into_iter()
        .map(|index| corpus.record(index))
        .filter(|record| match filter_category {
            Some(category) => record.label(category) == Some(1),
            None => true,
        })
        .map(|record| (record.text.as_str(), record.group.as_str()))
        .collect::<Vec<_>>();
    engine.aggregate(comments)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::corpus::test_corpus;
    use crate::labeling::LabelSpec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sentiment::analyzer::SentimentIntensityAnalyzer;
    use sentiment::aspect::AspectLexicon;
    use sentiment::lexicon::Lexicon;
    use std::io;

    fn english_corpus() -> Corpus {
        test_corpus(&[
            (
                "The vocals on this song are absolutely amazing and beautiful",
                "kaachi",
            ),
            (
                "I really hate the terrible dance moves in this horrible video",
                "kaachi",
            ),
            (
                "Such a great performance, the choreography is wonderful to watch",
                "blackswan",
            ),
        ])
    }

    #[test]
    fn prepare_is_idempotent() {
        let mut corpus = english_corpus();
        let normalizer = Normalizer::default();
        let first = prepare(&mut corpus, &normalizer);
        assert_eq!(3, first.total);
        assert_eq!(3, first.detected);
        assert_eq!(first.english, first.normalized);

        let again = prepare(&mut corpus, &normalizer);
        assert_eq!(0, again.detected);
        assert_eq!(0, again.normalized);
        assert_eq!(first.english, again.english);
    }

    #[test]
    fn prepare_leaves_unreliable_fragments_undetected() {
        let mut corpus = test_corpus(&[
            ("omg", "kaachi"),
            ("stan loona", "kaachi"),
            ("first", "blackswan"),
            ("This is a very beautiful song and I like it a lot", "blackswan"),
        ]);
        prepare(&mut corpus, &Normalizer::default());
        for record in corpus.records().iter().take(3) {
            assert_eq!(None, record.language, "fragment {:?}", record.text);
            assert!(record.normalized.is_none());
        }
        assert_eq!(vec![3], corpus.english_indices());
    }

    #[test]
    fn prepare_skips_non_english_normalization() {
        let mut corpus = test_corpus(&[
            ("Das ist ein sehr schönes Lied und ich mag es wirklich gerne", "kaachi"),
            ("This is a very beautiful song and I like it a lot", "kaachi"),
        ]);
        prepare(&mut corpus, &Normalizer::default());
        let non_english = corpus
            .records()
            .iter()
            .filter(|record| record.language != Some(isolang::Language::Eng))
            .collect::<Vec<_>>();
        for record in non_english {
            assert!(record.normalized.is_none());
        }
    }

    #[test]
    fn training_entries_skip_unnormalized_records() {
        let mut corpus = english_corpus();
        corpus.ensure_categories(["kpop"]);
        corpus.record_mut(0).set_label("kpop", 1);
        corpus.record_mut(1).set_label("kpop", 0);
        corpus.record_mut(0).normalized = Some("vocal song amazing beautiful".to_string());

        let entries = training_entries(&corpus, "kpop");
        // record 1 is labeled but not normalized
        assert_eq!(vec![(1, "vocal song amazing beautiful")], entries);
    }

    #[test]
    fn apply_overwrites_hand_labels() {
        // enough separable records for the gate
        let mut records = Vec::new();
        for i in 0..20 {
            records.push((format!("great amazing wonderful song number {i}"), 1u8));
            records.push((format!("terrible horrible awful noise number {i}"), 0u8));
        }
        let pairs = records
            .iter()
            .map(|(text, _)| (text.as_str(), "kaachi"))
            .collect::<Vec<_>>();
        let mut corpus = test_corpus(&pairs);
        // deterministic preparation, detection is not under test here
        let normalizer = Normalizer::default();
        for record in corpus.records_mut() {
            record.language = Some(isolang::Language::Eng);
            record.normalized = Some(normalizer.normalize(&record.text));
        }
        corpus.ensure_categories(["kpop"]);
        for (index, (_, label)) in records.iter().enumerate() {
            corpus.record_mut(index).set_label("kpop", *label);
        }

        let classifier = train_category(
            &corpus,
            "kpop",
            &TrainerConfig::default(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        // force a wrong hand label, apply must overwrite it
        corpus.record_mut(0).set_label("kpop", 0);
        let applied = apply_category(&mut corpus, &classifier);
        assert_eq!(40, applied);
        assert_eq!(Some(1), corpus.record(0).label("kpop"));

        let ranked = inspect_category(&corpus, &classifier, 0.1, 5).unwrap();
        assert_eq!(2, ranked.len());
        assert_eq!(0, ranked[0].0);
        assert_eq!(1, ranked[1].0);
        assert!(ranked[1].1.iter().any(|(name, _)| name == "great"));
    }

    #[test]
    fn train_error_names_the_category() {
        let corpus = english_corpus();
        let err = train_category(
            &corpus,
            "kpop",
            &TrainerConfig::default(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Train { ref category, .. } if category == "kpop"
        ));
    }

    fn prepare_as_english(corpus: &mut Corpus) {
        let normalizer = Normalizer::default();
        for record in corpus.records_mut() {
            record.language = Some(isolang::Language::Eng);
            record.normalized = Some(normalizer.normalize(&record.text));
        }
    }

    #[test]
    fn sentiment_respects_the_relevance_filter() {
        let mut corpus = english_corpus();
        prepare_as_english(&mut corpus);
        corpus.ensure_categories(["kpop"]);
        corpus.record_mut(0).set_label("kpop", 1);
        corpus.record_mut(1).set_label("kpop", 0);
        corpus.record_mut(2).set_label("kpop", 1);

        let engine = AspectSentimentEngine::new(
            SentimentIntensityAnalyzer::new(Lexicon::default()),
            AspectLexicon::from_entries([
                ("vocal", ["voice", "vocal"]),
                ("dance", ["dance", "choreography"]),
            ]),
        );

        let all = sentiment_aggregate(&corpus, &engine, None);
        let relevant = sentiment_aggregate(&corpus, &engine, Some("kpop"));
        // record 1 carries the only "dance moves" evidence and is filtered out
        assert!(all.total_records() > relevant.total_records());
    }

    #[test]
    fn label_runs_over_the_english_view() {
        struct OnePort;
        impl LabelPort for OnePort {
            fn present(&mut self, _text: &str) -> io::Result<()> {
                Ok(())
            }
            fn request(&mut self, _categories: &[String]) -> io::Result<String> {
                Ok("1".to_string())
            }
        }

        let mut corpus = english_corpus();
        prepare_as_english(&mut corpus);
        let session = LabelingSession::new(LabelSpec::new(["kpop"]).unwrap(), 2, true);
        let outcome = label(
            &mut corpus,
            &session,
            &mut OnePort,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(2, outcome.sampled);
        assert_eq!(2, outcome.committed);
    }
}
