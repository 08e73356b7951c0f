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

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use text_processing::vectorizer::SparseVector;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot fit a model on an empty training set")]
    EmptyTrainingSet,
    #[error("got {labels} labels for {rows} feature rows")]
    LabelRowMismatch { labels: usize, rows: usize },
}

/// Bernoulli Naive Bayes over binarized tf-idf features.
///
/// Every feature with a weight above zero counts as present. Smoothed
/// per class presence probabilities, prediction by log posterior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BernoulliNb {
    alpha: f64,
    classes: Vec<u8>,
    /// class log prior plus the sum of all absent-feature log probabilities,
    /// the starting point of every prediction
    base: Vec<f64>,
    /// log p(present | class) - log p(absent | class) per class and feature
    delta: Vec<Vec<f64>>,
    n_features: usize,
}

impl BernoulliNb {
    pub const DEFAULT_ALPHA: f64 = 1.0;

    pub fn fit(
        rows: &[SparseVector],
        labels: &[u8],
        n_features: usize,
        alpha: f64,
    ) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ModelError::LabelRowMismatch {
                labels: labels.len(),
                rows: rows.len(),
            });
        }

        let classes = labels.iter().copied().sorted_unstable().dedup().collect_vec();

        let mut base = Vec::with_capacity(classes.len());
        let mut delta = Vec::with_capacity(classes.len());
        for class in &classes {
            let member_rows = rows
                .iter()
                .zip(labels)
                .filter(|(_, label)| **label == *class)
                .map(|(row, _)| row)
                .collect_vec();
            let count = member_rows.len() as f64;

            let mut present = vec![0.0f64; n_features];
            for row in &member_rows {
                for (index, weight) in row.sparse_features() {
                    if *weight > 0.0 {
                        present[*index] += 1.0;
                    }
                }
            }

            let prior = (count / rows.len() as f64).ln();
            let mut class_base = prior;
            let mut class_delta = Vec::with_capacity(n_features);
            for feature_count in present {
                let p = (feature_count + alpha) / (count + 2.0 * alpha);
                class_base += (1.0 - p).ln();
                class_delta.push(p.ln() - (1.0 - p).ln());
            }
            base.push(class_base);
            delta.push(class_delta);
        }

        Ok(Self {
            alpha,
            classes,
            base,
            delta,
            n_features,
        })
    }

    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The most probable class for a vectorized document.
    pub fn predict(&self, row: &SparseVector) -> u8 {
        let mut best = (self.classes[0], f64::NEG_INFINITY);
        for (class_index, class) in self.classes.iter().enumerate() {
            let mut posterior = self.base[class_index];
            for (index, weight) in row.sparse_features() {
                if *weight > 0.0 && *index < self.n_features {
                    posterior += self.delta[class_index][*index];
                }
            }
            if posterior > best.1 {
                best = (*class, posterior);
            }
        }
        best.0
    }

    pub fn predict_many(&self, rows: &[SparseVector]) -> Vec<u8> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(features: &[(usize, f64)]) -> SparseVector {
        SparseVector::new(features.to_vec())
    }

    fn toy_model() -> BernoulliNb {
        // feature 0 marks class 1, feature 1 marks class 0
        let rows = vec![
            row(&[(0, 0.9)]),
            row(&[(0, 0.7)]),
            row(&[(0, 0.8), (2, 0.1)]),
            row(&[(1, 0.9)]),
            row(&[(1, 0.6)]),
            row(&[(1, 0.8), (2, 0.2)]),
        ];
        let labels = vec![1, 1, 1, 0, 0, 0];
        BernoulliNb::fit(&rows, &labels, 3, BernoulliNb::DEFAULT_ALPHA).unwrap()
    }

    #[test]
    fn learns_separable_classes() {
        let model = toy_model();
        assert_eq!(vec![0, 1], model.classes().to_vec());
        assert_eq!(1, model.predict(&row(&[(0, 0.5)])));
        assert_eq!(0, model.predict(&row(&[(1, 0.5)])));
    }

    #[test]
    fn empty_documents_get_the_majority_prior() {
        // balanced classes, all-absent likelihoods decide; must not panic
        let model = toy_model();
        let prediction = model.predict(&row(&[]));
        assert!(model.classes().contains(&prediction));
    }

    #[test]
    fn rejects_empty_training_set() {
        assert!(matches!(
            BernoulliNb::fit(&[], &[], 3, 1.0),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn rejects_mismatched_labels() {
        assert!(matches!(
            BernoulliNb::fit(&[row(&[(0, 1.0)])], &[1, 0], 1, 1.0),
            Err(ModelError::LabelRowMismatch { labels: 2, rows: 1 })
        ));
    }
}
