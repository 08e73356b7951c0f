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

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_SIZE: usize = 300;

/// Config of the hand labeling stage.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename(serialize = "Labeling"))]
pub struct LabelingConfig {
    /// How many records one session samples
    #[serde(default = "_default_sample_size")]
    pub sample_size: usize,

    /// The categories solicited jointly per record, in prompt order
    #[serde(default = "_default_categories")]
    pub categories: Vec<String>,

    /// May a session sample records that already carry labels?
    #[serde(default = "_default_allow_relabel")]
    pub allow_relabel: bool,
}

const fn _default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn _default_categories() -> Vec<String> {
    vec![
        "quality".to_string(),
        "nationalist_ethnicist".to_string(),
        "kpop".to_string(),
    ]
}

const fn _default_allow_relabel() -> bool {
    true
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            sample_size: _default_sample_size(),
            categories: _default_categories(),
            allow_relabel: _default_allow_relabel(),
        }
    }
}
