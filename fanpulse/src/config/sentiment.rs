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

use indexmap::IndexMap;
use sentiment::aspect::AspectLexicon;
use sentiment::{AspectSentimentEngine, Lexicon, SentimentIntensityAnalyzer};
use serde::{Deserialize, Serialize};

/// Config of the aspect sentiment stage, the aspect trigger table plus the
/// fandom slang valence overrides.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename(serialize = "Sentiment"))]
pub struct SentimentConfig {
    /// aspect name to the substrings that trigger it
    #[serde(default = "_default_aspects")]
    pub aspects: IndexMap<String, Vec<String>>,

    /// extra or replacement lexicon valences on the -4..4 scale
    #[serde(default = "_default_overrides")]
    pub overrides: IndexMap<String, f64>,
}

fn _default_aspects() -> IndexMap<String, Vec<String>> {
    let entries = [
        ("song", &["song", "music"][..]),
        ("vocal", &["voice", "vocal"][..]),
        ("dance", &["dance", "choreography", "choreo"][..]),
        ("korean", &["language", "pronunciation"][..]),
    ];
    entries
        .into_iter()
        .map(|(aspect, triggers)| {
            (
                aspect.to_string(),
                triggers.iter().map(|value| value.to_string()).collect(),
            )
        })
        .collect()
}

fn _default_overrides() -> IndexMap<String, f64> {
    IndexMap::from([
        ("fighting".to_string(), 2.0),
        ("koreaboo".to_string(), -2.0),
        ("cringe".to_string(), -2.0),
    ])
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            aspects: _default_aspects(),
            overrides: _default_overrides(),
        }
    }
}

impl SentimentConfig {
    /// Builds the runtime engine for this config.
    pub fn build_engine(&self) -> AspectSentimentEngine {
        let lexicon = Lexicon::default().with_overrides(
            self.overrides
                .iter()
                .map(|(term, valence)| (term.as_str(), *valence)),
        );
        let aspects = AspectLexicon::from_entries(self.aspects.iter().map(|(aspect, triggers)| {
            (
                aspect.as_str(),
                triggers.iter().map(String::as_str).collect::<Vec<_>>(),
            )
        }));
        AspectSentimentEngine::new(SentimentIntensityAnalyzer::new(lexicon), aspects)
    }
}
