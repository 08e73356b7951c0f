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

use crate::classifier::{DocumentClassifier, TrainDataEntry};
use crate::error::TrainError;
use crate::metrics::{accuracy, classification_report, distinct_classes};
use crate::model::BernoulliNb;
use crate::split::train_test_indices;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use text_processing::stopwords::StopWordList;
use text_processing::tf_idf::defaults::TERM_FREQUENCY_INVERSE;
use text_processing::vectorizer::create_vectorizer;

/// The knobs of the acceptance gated training loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainerConfig {
    /// Share of the labeled records held out for scoring.
    pub test_fraction: f64,
    /// Held out accuracy a candidate must exceed.
    pub min_accuracy: f64,
    /// Minimum positive class instances required in the held out labels.
    pub min_positive_holdout: usize,
    /// Hard cap on attempts; reaching it surfaces the gate as unmet
    /// instead of spinning forever.
    pub max_attempts: usize,
    /// Laplace smoothing of the model.
    pub alpha: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            min_accuracy: 0.80,
            min_positive_holdout: 5,
            max_attempts: 200,
            alpha: BernoulliNb::DEFAULT_ALPHA,
        }
    }
}

/// The gate relevant scores of a single training attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AcceptanceMetrics {
    pub accuracy: f64,
    pub positive_holdout: usize,
    pub distinct_predicted: usize,
    pub attempt: usize,
}

impl AcceptanceMetrics {
    fn clears(&self, cfg: &TrainerConfig) -> bool {
        self.accuracy > cfg.min_accuracy
            && self.positive_holdout >= cfg.min_positive_holdout
            && self.distinct_predicted == 2
    }
}

impl Display for AcceptanceMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "accuracy {:.3}, {} positive held out, {} predicted classes (attempt {})",
            self.accuracy, self.positive_holdout, self.distinct_predicted, self.attempt
        )
    }
}

/// Trains a classifier for `category`, retrying fresh random splits until one
/// clears the acceptance gate or the attempt cap is reached.
pub fn train<T: TrainDataEntry>(
    category: &str,
    data: &[T],
    stop_words: Option<&StopWordList>,
    cfg: &TrainerConfig,
) -> Result<DocumentClassifier, TrainError> {
    train_with_rng(category, data, stop_words, cfg, &mut StdRng::from_entropy())
}

pub fn train_with_rng<T: TrainDataEntry, R: Rng + ?Sized>(
    category: &str,
    data: &[T],
    stop_words: Option<&StopWordList>,
    cfg: &TrainerConfig,
    rng: &mut R,
) -> Result<DocumentClassifier, TrainError> {
    if data.is_empty() {
        return Err(TrainError::EmptyCorpus);
    }
    let test_len = ((data.len() as f64) * cfg.test_fraction).ceil() as usize;
    if test_len == 0 || test_len >= data.len() {
        return Err(TrainError::CorpusTooSmall { len: data.len() });
    }

    log::info!(
        "training category {category} on {} labeled records",
        data.len()
    );

    let mut best: Option<AcceptanceMetrics> = None;
    for attempt in 1..=cfg.max_attempts {
        let (train_idx, test_idx) = train_test_indices(data.len(), cfg.test_fraction, rng);

        let vectorizer = create_vectorizer(
            train_idx.iter().map(|i| data[*i].get_text()),
            stop_words.cloned(),
            TERM_FREQUENCY_INVERSE,
        )?;

        let x_train = train_idx
            .iter()
            .map(|i| vectorizer.vectorize_document(data[*i].get_text(), true))
            .collect::<Vec<_>>();
        let y_train = train_idx.iter().map(|i| data[*i].get_label()).collect::<Vec<_>>();

        let model = BernoulliNb::fit(&x_train, &y_train, vectorizer.n_features(), cfg.alpha)?;

        let x_test = test_idx
            .iter()
            .map(|i| vectorizer.vectorize_document(data[*i].get_text(), true))
            .collect::<Vec<_>>();
        let y_test = test_idx.iter().map(|i| data[*i].get_label()).collect::<Vec<_>>();
        let predicted = model.predict_many(&x_test);

        let metrics = AcceptanceMetrics {
            accuracy: accuracy(&y_test, &predicted),
            positive_holdout: y_test.iter().filter(|label| **label == 1).count(),
            distinct_predicted: distinct_classes(&predicted),
            attempt,
        };

        if metrics.clears(cfg) {
            log::info!(
                "classification report of {category}:\n{}",
                classification_report(&y_test, &predicted)
            );
            return Ok(DocumentClassifier::new(
                category.to_string(),
                vectorizer,
                model,
                metrics,
            ));
        }

        log::debug!("attempt {attempt} for {category} rejected: {metrics}");
        let better = match &best {
            Some(seen) => metrics.accuracy > seen.accuracy,
            None => true,
        };
        if better {
            best = Some(metrics);
        }
    }

    Err(TrainError::AcceptanceGateUnmet {
        attempts: cfg.max_attempts,
        best: best.unwrap_or(AcceptanceMetrics {
            accuracy: 0.0,
            positive_holdout: 0,
            distinct_predicted: 0,
            attempt: 0,
        }),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Clearly separable vocabulary, ten records per class so the held out
    /// quarter reliably carries five positives within a few attempts.
    fn separable_data() -> Vec<(u8, String)> {
        let mut data = Vec::new();
        for i in 0..20 {
            data.push((1, format!("kpop stan fan bias comeback number{i}")));
            data.push((0, format!("politics economy election budget number{i}")));
        }
        data
    }

    #[test]
    fn accepts_a_separable_corpus() {
        let data = separable_data();
        let mut rng = StdRng::seed_from_u64(3);
        let classifier = train_with_rng(
            "kpop",
            &data,
            None,
            &TrainerConfig::default(),
            &mut rng,
        )
        .expect("gate should be reachable");

        assert_eq!("kpop", classifier.category());
        let metrics = classifier.metrics();
        assert!(metrics.accuracy > 0.80);
        assert!(metrics.positive_holdout >= 5);
        assert_eq!(2, metrics.distinct_predicted);
        assert_eq!(1, classifier.predict("kpop comeback"));
        assert_eq!(0, classifier.predict("election budget"));
    }

    #[test]
    fn unreachable_gate_terminates_with_best_metrics() {
        // ten records, five positive: the held out quarter has three rows,
        // it can never contain the five positives the gate demands
        let data = (0..10)
            .map(|i| {
                (
                    u8::from(i < 5),
                    format!("token{} token{} filler", i, i % 3),
                )
            })
            .collect::<Vec<_>>();

        let cfg = TrainerConfig {
            max_attempts: 25,
            ..TrainerConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let err = train_with_rng("kpop", &data, None, &cfg, &mut rng).unwrap_err();

        match err {
            TrainError::AcceptanceGateUnmet { attempts, best } => {
                assert_eq!(25, attempts);
                assert!(best.positive_holdout <= 3);
            }
            other => panic!("expected AcceptanceGateUnmet, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_tiny_corpora_are_rejected_upfront() {
        let empty: Vec<(u8, String)> = Vec::new();
        assert!(matches!(
            train("kpop", &empty, None, &TrainerConfig::default()),
            Err(TrainError::EmptyCorpus)
        ));

        let tiny = vec![(1u8, "one record".to_string())];
        assert!(matches!(
            train("kpop", &tiny, None, &TrainerConfig::default()),
            Err(TrainError::CorpusTooSmall { len: 1 })
        ));
    }
}
