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

use crate::ingest::{CsvProvider, IngestError, RawComment};
use indexmap::IndexMap;
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io;

/// Stable unique identifier of a record, assigned at ingestion and kept
/// across every pipeline stage.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RecordId(u64);

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One comment with its cached derivations and label columns.
///
/// `language` and `normalized` start empty and are computed once by the
/// preparation stage; label values move from [None] to hand entered or
/// predicted values and never back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub text: String,
    pub group: String,
    pub song: String,
    pub author: String,
    pub date: String,
    pub language: Option<Language>,
    pub normalized: Option<String>,
    labels: IndexMap<String, Option<u8>>,
}

impl Record {
    pub fn label(&self, category: &str) -> Option<u8> {
        self.labels.get(category).copied().flatten()
    }

    pub fn set_label(&mut self, category: &str, value: u8) {
        self.labels.insert(category.to_string(), Some(value));
    }

    pub fn clear_label(&mut self, category: &str) {
        self.labels.insert(category.to_string(), None);
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.labels.contains_key(category)
    }
}

/// The working dataset, the single owner of every record.
/// Views are index lists into it, so a mutation through one view is seen
/// by every other view of the same record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    pub fn from_comments<I: IntoIterator<Item = RawComment>>(comments: I) -> Self {
        let records = comments
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Record {
                id: RecordId(index as u64),
                text: raw.text,
                group: raw.group,
                song: raw.song,
                author: raw.author,
                date: raw.date,
                language: None,
                normalized: None,
                labels: IndexMap::new(),
            })
            .collect();
        Self { records }
    }

    /// Reads a corpus from comment csv data.
    /// Malformed rows are skipped, like the rest of the ingestion glue does.
    pub fn from_csv_read<R: io::Read>(read: R) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new();
        reader.has_headers(true);
        let provider: CsvProvider<RawComment, R> = CsvProvider::new(reader.from_reader(read))?;
        Ok(Self::from_comments(provider))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn record(&self, index: usize) -> &Record {
        &self.records[index]
    }

    pub fn record_mut(&mut self, index: usize) -> &mut Record {
        &mut self.records[index]
    }

    /// Adds the label columns to every record, keeping existing values.
    pub fn ensure_categories<'a, I: IntoIterator<Item = &'a str> + Clone>(&mut self, categories: I) {
        for record in self.records.iter_mut() {
            for category in categories.clone() {
                record
                    .labels
                    .entry(category.to_string())
                    .or_insert(None);
            }
        }
    }

    /// Indices of the records detected as the given language.
    pub fn language_indices(&self, language: Language) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.language == Some(language))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn english_indices(&self) -> Vec<usize> {
        self.language_indices(Language::Eng)
    }

    /// Indices of the records carrying a value for the given category,
    /// the train/test view of the labeling stage.
    pub fn labeled_indices(&self, category: &str) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.label(category).is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// The distinct group labels in first occurrence order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.group.as_str()) {
                seen.push(record.group.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
pub(crate) fn test_corpus(comments: &[(&str, &str)]) -> Corpus {
    Corpus::from_comments(comments.iter().map(|(text, group)| RawComment {
        text: text.to_string(),
        group: group.to_string(),
        song: "song".to_string(),
        author: "author".to_string(),
        date: "2021-01-01".to_string(),
    }))
}
