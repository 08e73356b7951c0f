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

use csv::{Reader, StringRecord, StringRecordsIntoIter};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io;
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A comment as delivered by the collection collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    #[serde(alias = "comment")]
    pub text: String,
    pub group: String,
    pub date: String,
    pub song: String,
    pub author: String,
}

/// Iterates typed entries out of a csv reader, skipping rows that do not
/// deserialize instead of failing the whole ingestion.
pub struct CsvProvider<T, R> {
    header: StringRecord,
    string_records_iter: StringRecordsIntoIter<R>,
    _produces: PhantomData<T>,
}

impl<T, R> CsvProvider<T, R>
where
    R: io::Read,
{
    pub fn new(mut reader: Reader<R>) -> Result<Self, csv::Error> {
        let header = reader.headers()?.clone();
        Ok(Self {
            header,
            string_records_iter: reader.into_records(),
            _produces: PhantomData,
        })
    }
}

impl<T, R> Iterator for CsvProvider<T, R>
where
    T: DeserializeOwned,
    R: io::Read,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.string_records_iter.next()?;
            let Ok(record) = next else {
                log::warn!("skipping an unreadable csv row");
                continue;
            };
            match record.deserialize(Some(&self.header)) {
                Ok(value) => return Some(value),
                Err(error) => {
                    log::warn!("skipping a csv row that does not fit the schema: {error}");
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn provides_typed_rows() {
        let data = "\
text,group,date,song,author
hello,kaachi,2020-05-05,yourturn,a
world,prisma,2020-10-31,breakout,b
";
        let reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let provider: CsvProvider<RawComment, _> = CsvProvider::new(reader).unwrap();
        let rows = provider.collect::<Vec<_>>();
        assert_eq!(2, rows.len());
        assert_eq!("hello", rows[0].text);
        assert_eq!("breakout", rows[1].song);
    }

    #[test]
    fn accepts_the_comment_alias() {
        let data = "\
comment,group,date,song,author
aliased,kaachi,2020-05-05,yourturn,a
";
        let reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let provider: CsvProvider<RawComment, _> = CsvProvider::new(reader).unwrap();
        let rows = provider.collect::<Vec<_>>();
        assert_eq!(1, rows.len());
        assert_eq!("aliased", rows[0].text);
    }
}
