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
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub fn accuracy(truth: &[u8], predicted: &[u8]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth
        .iter()
        .zip(predicted)
        .filter(|(a, b)| a == b)
        .count();
    hits as f64 / truth.len() as f64
}

pub fn distinct_classes(values: &[u8]) -> usize {
    values.iter().copied().sorted_unstable().dedup().count()
}

/// Precision, recall, f1 and support of a single class.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassMetrics {
    pub class: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// The held out evaluation emitted when a trained model is accepted.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub total: usize,
}

/// Computes the per class report over a held out split.
/// Classes without predicted (or true) members get zeroed metrics instead
/// of a division by zero.
pub fn classification_report(truth: &[u8], predicted: &[u8]) -> ClassificationReport {
    let classes = truth
        .iter()
        .chain(predicted)
        .copied()
        .sorted_unstable()
        .dedup()
        .collect_vec();

    let per_class = classes
        .into_iter()
        .map(|class| {
            let true_positive = truth
                .iter()
                .zip(predicted)
                .filter(|(t, p)| **t == class && **p == class)
                .count() as f64;
            let predicted_positive = predicted.iter().filter(|p| **p == class).count() as f64;
            let support = truth.iter().filter(|t| **t == class).count();

            let precision = if predicted_positive > 0.0 {
                true_positive / predicted_positive
            } else {
                0.0
            };
            let recall = if support > 0 {
                true_positive / support as f64
            } else {
                0.0
            };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                class,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect_vec();

    ClassificationReport {
        classes: per_class,
        accuracy: accuracy(truth, predicted),
        total: truth.len(),
    }
}

impl Display for ClassificationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>8} {:>10} {:>8} {:>8} {:>8}",
            "class", "precision", "recall", "f1", "support"
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>8} {:>10.2} {:>8.2} {:>8.2} {:>8}",
                class.class, class.precision, class.recall, class.f1, class.support
            )?;
        }
        write!(f, "accuracy {:.2} on {} samples", self.accuracy, self.total)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn accuracy_counts_hits() {
        assert_approx_eq!(f64, 0.75, accuracy(&[1, 0, 1, 0], &[1, 0, 0, 0]));
        assert_approx_eq!(f64, 0.0, accuracy(&[], &[]));
    }

    #[test]
    fn distinct_classes_deduplicates() {
        assert_eq!(2, distinct_classes(&[1, 0, 1, 1, 0]));
        assert_eq!(1, distinct_classes(&[1, 1]));
        assert_eq!(0, distinct_classes(&[]));
    }

    #[test]
    fn report_on_perfect_predictions() {
        let report = classification_report(&[1, 1, 0, 0], &[1, 1, 0, 0]);
        assert_approx_eq!(f64, 1.0, report.accuracy);
        for class in &report.classes {
            assert_approx_eq!(f64, 1.0, class.precision);
            assert_approx_eq!(f64, 1.0, class.recall);
            assert_approx_eq!(f64, 1.0, class.f1);
            assert_eq!(2, class.support);
        }
    }

    #[test]
    fn report_guards_absent_classes() {
        // model never predicts class 1
        let report = classification_report(&[1, 0, 0], &[0, 0, 0]);
        let positive = report.classes.iter().find(|c| c.class == 1).unwrap();
        assert_approx_eq!(f64, 0.0, positive.precision);
        assert_approx_eq!(f64, 0.0, positive.recall);
        assert_approx_eq!(f64, 0.0, positive.f1);
        assert_eq!(1, positive.support);
    }

    #[test]
    fn report_renders_a_table() {
        let rendered = classification_report(&[1, 0], &[1, 0]).to_string();
        assert!(rendered.contains("precision"));
        assert!(rendered.contains("support"));
        assert!(rendered.contains("accuracy 1.00 on 2 samples"));
    }
}
