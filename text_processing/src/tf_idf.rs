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

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calculates the term frequency part of a tf-idf weight.
pub trait TfAlgorithm {
    fn calculate_tf(&self, term_count: usize, doc_length: usize) -> f64;
}

/// Calculates the inverse document frequency part of a tf-idf weight.
pub trait IdfAlgorithm {
    type Error: std::error::Error + Send + Sync + 'static;

    fn calculate_idf(&self, doc_count: usize, doc_frequency: usize) -> Result<f64, Self::Error>;
}

#[derive(Debug, Error)]
pub enum IdfError {
    #[error("the idf of a term without any document occurrence is undefined")]
    ZeroDocumentFrequency,
    #[error("the idf over an empty document collection is undefined")]
    NoDocuments,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Tf {
    /// The raw number of occurrences in the document.
    RawCount,
    /// Occurrences relative to the document length.
    TermFrequency,
    /// 1.0 if the term occurs at all.
    Binary,
}

impl TfAlgorithm for Tf {
    fn calculate_tf(&self, term_count: usize, doc_length: usize) -> f64 {
        match self {
            Tf::RawCount => term_count as f64,
            Tf::TermFrequency => {
                if doc_length == 0 {
                    0.0
                } else {
                    term_count as f64 / doc_length as f64
                }
            }
            Tf::Binary => {
                if term_count == 0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Idf {
    /// ln(N / df)
    InverseDocumentFrequency,
    /// ln((1 + N) / (1 + df)) + 1, never divides by zero and keeps
    /// vocabulary terms of unseen documents finite.
    InverseDocumentFrequencySmooth,
}

impl IdfAlgorithm for Idf {
    type Error = IdfError;

    fn calculate_idf(&self, doc_count: usize, doc_frequency: usize) -> Result<f64, IdfError> {
        if doc_count == 0 {
            return Err(IdfError::NoDocuments);
        }
        match self {
            Idf::InverseDocumentFrequency => {
                if doc_frequency == 0 {
                    Err(IdfError::ZeroDocumentFrequency)
                } else {
                    Ok((doc_count as f64 / doc_frequency as f64).ln())
                }
            }
            Idf::InverseDocumentFrequencySmooth => {
                Ok(((1.0 + doc_count as f64) / (1.0 + doc_frequency as f64)).ln() + 1.0)
            }
        }
    }
}

/// A tf and an idf algorithm combined to a single weighting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TfIdf<TF, IDF> {
    pub tf: TF,
    pub idf: IDF,
}

impl<TF, IDF> TfIdf<TF, IDF> {
    pub const fn new(tf: TF, idf: IDF) -> Self {
        Self { tf, idf }
    }
}

pub mod defaults {
    use super::{Idf, Tf, TfIdf};

    /// Raw counts weighted with the smooth inverse document frequency,
    /// the weighting the rest of the pipeline assumes.
    pub const TERM_FREQUENCY_INVERSE: TfIdf<Tf, Idf> =
        TfIdf::new(Tf::RawCount, Idf::InverseDocumentFrequencySmooth);
}
