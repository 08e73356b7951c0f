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

//! Post hoc ranking of vectorizer features by weight, the diagnostic behind
//! the per class vocabulary figures.

use itertools::Itertools;
use text_processing::vectorizer::SparseVector;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("per class feature ranking needs exactly 2 distinct labels, found {found}")]
    ClassCountMismatch { found: usize },
}

/// The `top_n` features of a weight row, heaviest first.
/// The sort is stable, ties keep the original feature order.
pub fn top_features<'a, S: AsRef<str>>(
    row: &[f64],
    feature_names: &'a [S],
    top_n: usize,
) -> Vec<(&'a str, f64)> {
    row.iter()
        .zip(feature_names)
        .map(|(weight, name)| (name.as_ref(), *weight))
        .sorted_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal))
        .take(top_n)
        .collect()
}

/// Column means over a row subset, entries below `min_weight` zeroed first.
/// An empty subset means all rows.
pub fn top_mean_features<'a, S: AsRef<str>>(
    matrix: &[SparseVector],
    feature_names: &'a [S],
    row_subset: &[usize],
    min_weight: f64,
    top_n: usize,
) -> Vec<(&'a str, f64)> {
    let rows = if row_subset.is_empty() {
        (0..matrix.len()).collect_vec()
    } else {
        row_subset.to_vec()
    };

    let mut sums = vec![0.0f64; feature_names.len()];
    for row in &rows {
        for (index, weight) in matrix[*row].sparse_features() {
            if *weight >= min_weight {
                sums[*index] += weight;
            }
        }
    }
    if !rows.is_empty() {
        for sum in sums.iter_mut() {
            *sum /= rows.len() as f64;
        }
    }
    top_features(&sums, feature_names, top_n)
}

/// One ranked list per class over a binary labeled matrix.
/// Returns the rankings in ascending class order.
pub fn top_features_by_class<'a, S: AsRef<str>>(
    matrix: &[SparseVector],
    labels: &[u8],
    feature_names: &'a [S],
    min_weight: f64,
    top_n: usize,
) -> Result<Vec<(u8, Vec<(&'a str, f64)>)>, InspectError> {
    let classes = labels.iter().copied().sorted_unstable().dedup().collect_vec();
    if classes.len() != 2 {
        return Err(InspectError::ClassCountMismatch {
            found: classes.len(),
        });
    }

    Ok(classes
        .into_iter()
        .map(|class| {
            let rows = labels
                .iter()
                .enumerate()
                .filter(|(_, label)| **label == class)
                .map(|(index, _)| index)
                .collect_vec();
            (
                class,
                top_mean_features(matrix, feature_names, &rows, min_weight, top_n),
            )
        })
        .collect())
}
