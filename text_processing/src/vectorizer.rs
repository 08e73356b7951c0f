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

use crate::stopwords::StopWordList;
use crate::tf_idf::{IdfAlgorithm, TfAlgorithm, TfIdf};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tf-idf weighted document, sparse over the vectorizer vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    features: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new(mut features: Vec<(usize, f64)>) -> Self {
        features.sort_by_key(|(index, _)| *index);
        Self { features }
    }

    /// The number of non zero features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn sparse_features(&self) -> &[(usize, f64)] {
        &self.features
    }

    pub fn to_dense(&self, n_features: usize) -> Vec<f64> {
        let mut dense = vec![0.0; n_features];
        for (index, weight) in &self.features {
            dense[*index] = *weight;
        }
        dense
    }

    fn l2_normalize(&mut self) {
        let norm = self
            .features
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for (_, weight) in self.features.iter_mut() {
                *weight /= norm;
            }
        }
    }
}

/// Vocabulary and idf weights fit on a specific training slice.
/// Texts handed to it are expected to be normalized already, tokens are
/// the whitespace separated words surviving the stop word filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVectorizer<TF, IDF> {
    vocabulary: HashMap<CompactString, usize>,
    feature_names: Vec<CompactString>,
    idf: Vec<f64>,
    tf_idf: TfIdf<TF, IDF>,
    stop_words: Option<StopWordList>,
    doc_count: usize,
}

/// Fits a vectorizer on the given documents.
pub fn create_vectorizer<I, TF, IDF>(
    docs: I,
    stop_words: Option<StopWordList>,
    tf_idf: TfIdf<TF, IDF>,
) -> Result<DocumentVectorizer<TF, IDF>, IDF::Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    TF: TfAlgorithm,
    IDF: IdfAlgorithm,
{
    let keep = |token: &str| match &stop_words {
        Some(list) => !list.contains_both(token),
        None => true,
    };

    let mut doc_frequency: HashMap<CompactString, usize> = HashMap::new();
    let mut doc_count = 0usize;
    for doc in docs {
        doc_count += 1;
        let mut seen: Vec<&str> = doc
            .as_ref()
            .split_whitespace()
            .filter(|token| keep(token))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        for token in seen {
            *doc_frequency.entry(CompactString::from(token)).or_insert(0) += 1;
        }
    }

    // vocabulary index follows the sorted term order, which keeps feature
    // order deterministic across runs
    let mut feature_names = doc_frequency.keys().cloned().collect::<Vec<_>>();
    feature_names.sort_unstable();

    let mut vocabulary = HashMap::with_capacity(feature_names.len());
    let mut idf = Vec::with_capacity(feature_names.len());
    for (index, name) in feature_names.iter().enumerate() {
        vocabulary.insert(name.clone(), index);
        idf.push(tf_idf.idf.calculate_idf(doc_count, doc_frequency[name])?);
    }

    log::debug!(
        "fitted a vocabulary of {} terms over {doc_count} documents",
        feature_names.len()
    );

    Ok(DocumentVectorizer {
        vocabulary,
        feature_names,
        idf,
        tf_idf,
        stop_words,
        doc_count,
    })
}

impl<TF, IDF> DocumentVectorizer<TF, IDF> {
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[CompactString] {
        &self.feature_names
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }
}

impl<TF, IDF> DocumentVectorizer<TF, IDF>
where
    TF: TfAlgorithm,
    IDF: IdfAlgorithm,
{
    /// Transforms a document into its tf-idf weights.
    /// Tokens outside the fitted vocabulary are dropped silently.
    pub fn vectorize_document(&self, doc: &str, l2_normalize: bool) -> SparseVector {
        let keep = |token: &str| match &self.stop_words {
            Some(list) => !list.contains_both(token),
            None => true,
        };

        let mut counts: HashMap<usize, usize> = HashMap::new();
        let mut doc_length = 0usize;
        for token in doc.split_whitespace().filter(|token| keep(token)) {
            doc_length += 1;
            if let Some(index) = self.vocabulary.get(token) {
                *counts.entry(*index).or_insert(0) += 1;
            }
        }

        let mut vector = SparseVector::new(
            counts
                .into_iter()
                .map(|(index, count)| {
                    let tf = self.tf_idf.tf.calculate_tf(count, doc_length);
                    (index, tf * self.idf[index])
                })
                .collect(),
        );
        if l2_normalize {
            vector.l2_normalize();
        }
        vector
    }
}
