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

use crate::model::BernoulliNb;
use crate::trainer::AcceptanceMetrics;
use serde::{Deserialize, Serialize};
use text_processing::tf_idf::{Idf, Tf};
use text_processing::vectorizer::{DocumentVectorizer, SparseVector};

/// A struct implementing this is used as train data.
pub trait TrainDataEntry {
    /// The binary label of the entry
    fn get_label(&self) -> u8;

    /// The normalized text of the entry
    fn get_text(&self) -> &str;
}

impl<Text> TrainDataEntry for (u8, Text)
where
    Text: AsRef<str>,
{
    fn get_label(&self) -> u8 {
        self.0
    }

    fn get_text(&self) -> &str {
        self.1.as_ref()
    }
}

/// An accepted vectorizer and model pair for one category.
/// Produced fresh by every training attempt and immutable once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentClassifier {
    category: String,
    vectorizer: DocumentVectorizer<Tf, Idf>,
    model: BernoulliNb,
    metrics: AcceptanceMetrics,
}

impl DocumentClassifier {
    pub(crate) fn new(
        category: String,
        vectorizer: DocumentVectorizer<Tf, Idf>,
        model: BernoulliNb,
        metrics: AcceptanceMetrics,
    ) -> Self {
        Self {
            category,
            vectorizer,
            model,
            metrics,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn vectorizer(&self) -> &DocumentVectorizer<Tf, Idf> {
        &self.vectorizer
    }

    pub fn model(&self) -> &BernoulliNb {
        &self.model
    }

    /// The held out metrics of the accepted attempt.
    pub fn metrics(&self) -> &AcceptanceMetrics {
        &self.metrics
    }

    pub fn vectorize(&self, doc: &str) -> SparseVector {
        self.vectorizer.vectorize_document(doc, true)
    }

    pub fn predict(&self, doc: &str) -> u8 {
        self.model.predict(&self.vectorize(doc))
    }

    /// Predicts a label for every document, in input order.
    /// Used by the pipeline to overwrite a category over the whole corpus.
    pub fn predict_all<'a, I>(&self, docs: I) -> Vec<u8>
    where
        I: IntoIterator<Item = &'a str>,
    {
        docs.into_iter().map(|doc| self.predict(doc)).collect()
    }

    /// Vectorizes every document, the matrix consumed by feature inspection.
    pub fn vectorize_all<'a, I>(&self, docs: I) -> Vec<SparseVector>
    where
        I: IntoIterator<Item = &'a str>,
    {
        docs.into_iter().map(|doc| self.vectorize(doc)).collect()
    }
}
