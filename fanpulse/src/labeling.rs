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

use crate::corpus::Corpus;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a labeling session needs at least one category")]
    EmptySpec,
    #[error("duplicate category {0:?} in the label spec")]
    DuplicateCategory(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The ordered category names solicited jointly per record.
#[derive(Debug, Clone)]
pub struct LabelSpec {
    categories: Vec<String>,
}

impl LabelSpec {
    pub fn new<I, S>(categories: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = categories
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>();
        if categories.is_empty() {
            return Err(SessionError::EmptySpec);
        }
        for (index, category) in categories.iter().enumerate() {
            if categories[..index].contains(category) {
                return Err(SessionError::DuplicateCategory(category.clone()));
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The category whose presence marks a record as labeled.
    pub fn first(&self) -> &str {
        &self.categories[0]
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The prompt/response channel of a labeling session.
/// The console implementation drives an operator, tests substitute a
/// scripted source.
#[cfg_attr(test, mockall::automock)]
pub trait LabelPort {
    /// Shows the raw text of the sampled record.
    fn present(&mut self, text: &str) -> io::Result<()>;

    /// Asks for one delimited response covering all categories.
    fn request(&mut self, categories: &[String]) -> io::Result<String>;
}

/// A [LabelPort] over arbitrary read/write pairs, stdin and stdout in the
/// binary.
pub struct ConsolePort<R, W> {
    input: R,
    output: W,
}

impl ConsolePort<io::BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: io::BufReader::new(io::stdin()),
            output: io::stdout(),
        }
    }
}

impl<R, W> ConsolePort<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> LabelPort for ConsolePort<R, W> {
    fn present(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn request(&mut self, categories: &[String]) -> io::Result<String> {
        write!(
            self.output,
            "input accordingly with positions separated by a comma {categories:?}: "
        )?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// The phases of a labeling session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SessionState {
    Sampling,
    AwaitingInput,
    Committing,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOutcome {
    /// How many records were sampled and presented.
    pub sampled: usize,
    /// How many responses were committed.
    pub committed: usize,
    /// How many responses were discarded as unparseable.
    pub discarded: usize,
}

/// Interactive hand labeling of a random sample.
///
/// Samples `sample_size` records uniformly without replacement from the
/// given view, presents each one through the port and commits the delimited
/// response. A commit is atomic per record: either every category of the
/// spec gets its value, or all of them are nulled.
///
/// The session blocks on the port and is paced by the operator; there is no
/// timeout and no resume. Labels committed before an interruption stay on
/// the corpus.
#[derive(Debug, Clone)]
pub struct LabelingSession {
    spec: LabelSpec,
    sample_size: usize,
    allow_relabel: bool,
}

impl LabelingSession {
    pub fn new(spec: LabelSpec, sample_size: usize, allow_relabel: bool) -> Self {
        Self {
            spec,
            sample_size,
            allow_relabel,
        }
    }

    pub fn spec(&self) -> &LabelSpec {
        &self.spec
    }

    fn sample<R: Rng + ?Sized>(&self, corpus: &Corpus, view: &[usize], rng: &mut R) -> VecDeque<usize> {
        let mut pool = if self.allow_relabel {
            view.to_vec()
        } else {
            view.iter()
                .copied()
                .filter(|index| corpus.record(*index).label(self.spec.first()).is_none())
                .collect()
        };
        if self.sample_size < pool.len() {
            pool.shuffle(rng);
            pool.truncate(self.sample_size);
        } else if self.sample_size > pool.len() {
            log::warn!(
                "sample size {} exceeds the {} available records, labeling all of them",
                self.sample_size,
                pool.len()
            );
        }
        pool.into()
    }

    /// Runs the session to completion over the given corpus view.
    pub fn run<P, R>(
        &self,
        corpus: &mut Corpus,
        view: &[usize],
        port: &mut P,
        rng: &mut R,
    ) -> Result<SessionOutcome, SessionError>
    where
        P: LabelPort + ?Sized,
        R: Rng + ?Sized,
    {
        let mut state = SessionState::Sampling;
        let mut queue = VecDeque::new();
        let mut current: Option<(usize, String)> = None;
        let mut outcome = SessionOutcome::default();

        while state != SessionState::Done {
            state = match state {
                SessionState::Sampling => {
                    corpus.ensure_categories(
                        self.spec.categories().iter().map(String::as_str),
                    );
                    queue = self.sample(corpus, view, rng);
                    SessionState::AwaitingInput
                }
                SessionState::AwaitingInput => match queue.pop_front() {
                    None => SessionState::Done,
                    Some(index) => {
                        port.present(&corpus.record(index).text)?;
                        let response = port.request(self.spec.categories())?;
                        current = Some((index, response));
                        outcome.sampled += 1;
                        SessionState::Committing
                    }
                },
                SessionState::Committing => match current.take() {
                    None => SessionState::Done,
                    Some((index, response)) => {
                        if self.commit(corpus, index, &response) {
                            outcome.committed += 1;
                        } else {
                            outcome.discarded += 1;
                            log::warn!(
                                "discarded the response for record {}: expected {} comma separated values",
                                corpus.record(index).id,
                                self.spec.len()
                            );
                        }
                        log::info!(
                            "encoded {} of {} sampled texts",
                            outcome.sampled,
                            outcome.sampled + queue.len()
                        );
                        SessionState::AwaitingInput
                    }
                },
                SessionState::Done => SessionState::Done,
            };
        }

        Ok(outcome)
    }

    /// All or nothing per record: a response only counts if it splits into
    /// exactly one valid value per category.
    fn commit(&self, corpus: &mut Corpus, index: usize, response: &str) -> bool {
        let values = response
            .split(',')
            .map(|token| token.trim().parse::<u8>().ok().filter(|value| *value <= 1))
            .collect::<Vec<_>>();

        let parsed = if values.len() == self.spec.len() {
            values.into_iter().collect::<Option<Vec<u8>>>()
        } else {
            None
        };

        let record = corpus.record_mut(index);
        match parsed {
            Some(values) => {
                for (category, value) in self.spec.categories().iter().zip(values) {
                    record.set_label(category, value);
                }
                true
            }
            None => {
                for category in self.spec.categories() {
                    record.clear_label(category);
                }
                false
            }
        }
    }
}
