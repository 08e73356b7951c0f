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

use crate::config::labeling::LabelingConfig;
use crate::config::sentiment::SentimentConfig;
use crate::config::SystemConfig;
use bayes::TrainerConfig;
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

/// A collection of all config used in a pipeline run.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename(serialize = "Config"), default)]
pub struct Configs {
    pub system: SystemConfig,
    pub labeling: LabelingConfig,
    pub training: TrainerConfig,
    pub sentiment: SentimentConfig,
}

impl Configs {
    pub fn load_from<P: AsRef<Path>>(folder: P) -> Result<Self, config::ConfigError> {
        let folder = folder.as_ref();
        let join = |name: &str| -> String {
            let mut path = PathBuf::from(folder);
            path.push(name);
            path.to_string_lossy().into_owned()
        };
        Config::builder()
            .add_source(config::File::with_name("./config").required(false))
            .add_source(config::File::with_name("./fanpulse").required(false))
            .add_source(config::File::with_name(&join("fanpulse")).required(false))
            .add_source(config::File::with_name(&join("config")))
            .add_source(config::Environment::with_prefix("FANPULSE").separator("."))
            .build()?
            .try_deserialize()
    }

    pub fn discover_or_default() -> Result<Self, config::ConfigError> {
        match Config::builder()
            .add_source(config::File::with_name("./fanpulse"))
            .add_source(config::File::with_name("./config").required(false))
            .add_source(config::Environment::with_prefix("FANPULSE").separator("."))
            .build()
        {
            Ok(value) => value.try_deserialize(),
            Err(_) => Ok(Default::default()),
        }
    }

    /// The default config as commented yaml, what `init` writes to disk.
    pub fn example_yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a_round_trip_through_yaml_is_lossless() {
        let config = Configs::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Configs = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_sources_fall_back_to_defaults() {
        let yaml = "labeling:\n  sample_size: 25\n";
        let parsed: Configs = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(25, parsed.labeling.sample_size);
        assert_eq!(Configs::default().training, parsed.training);
        assert_eq!(Configs::default().sentiment, parsed.sentiment);
    }

    #[test]
    fn json_serialization_for_diagnostics_round_trips() {
        let mut config = Configs::default();
        config.labeling.sample_size = 50;
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Configs = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn the_example_yaml_parses_back() {
        let yaml = Configs::example_yaml().unwrap();
        let parsed: Configs = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(Configs::default(), parsed);
    }
}
