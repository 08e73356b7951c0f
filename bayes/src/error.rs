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

use crate::model::ModelError;
use crate::trainer::AcceptanceMetrics;
use text_processing::tf_idf::IdfError;
use thiserror::Error;

/// An error from training a category classifier.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("the labeled corpus is empty")]
    EmptyCorpus,
    #[error("a corpus of {len} records leaves an empty train or test split")]
    CorpusTooSmall { len: usize },
    #[error(
        "no attempt out of {attempts} cleared the acceptance gate, best seen: {best}"
    )]
    AcceptanceGateUnmet {
        attempts: usize,
        best: AcceptanceMetrics,
    },
    #[error(transparent)]
    Idf(#[from] IdfError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
