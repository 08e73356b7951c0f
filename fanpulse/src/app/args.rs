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

use crate::config::Configs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
/// Welcome to Fanpulse
pub struct FanpulseArgs {
    /// A command to initialize an exemplary config
    #[arg(long)]
    pub generate_example_config: bool,

    /// The mode of Fanpulse
    #[command(subcommand)]
    pub mode: Option<RunMode>,
}

#[derive(Subcommand, Debug)]
pub enum RunMode {
    /// Detects languages, normalizes the english subset and prints the
    /// language distribution per group.
    PREPARE {
        /// The comment csv to prepare.
        corpus: PathBuf,
        /// The log level of Fanpulse
        #[arg(long, default_value_t = log::LevelFilter::Info)]
        log_level: log::LevelFilter,
        /// Log to file
        #[arg(long)]
        log_to_file: bool,
    },
    /// The full interactive pipeline, labeling through the sentiment table.
    RUN {
        /// The comment csv to analyze.
        corpus: PathBuf,
        /// The folder containing the required configs.
        #[arg(short, long)]
        config: Option<String>,
        /// overrides the log level from the config.
        #[arg(long)]
        override_log_level: Option<log::LevelFilter>,
        /// Log to file
        #[arg(long)]
        log_to_file: bool,
    },
    /// Initializes Fanpulse by creating the default config file.
    INIT,
}

#[derive(Debug)]
pub enum ConsumedArgs {
    Prepare(PathBuf, Configs),
    Run(PathBuf, Configs),
    Nothing,
}

/// Consumes the args and returns everything necessary to execute Fanpulse
pub(crate) fn consume_args(args: FanpulseArgs) -> ConsumedArgs {
    if args.generate_example_config {
        return match super::write_example_config() {
            Ok(path) => {
                println!("wrote the example config to {}", path.display());
                ConsumedArgs::Nothing
            }
            Err(err) => {
                eprintln!("failed to write the example config: {err}");
                ConsumedArgs::Nothing
            }
        };
    }

    match args.mode {
        Some(RunMode::PREPARE {
            corpus,
            log_level,
            log_to_file,
        }) => {
            let mut configs = Configs::discover_or_default().unwrap_or_default();
            configs.system.log_level = log_level;
            configs.system.log_to_file = log_to_file;
            ConsumedArgs::Prepare(corpus, configs)
        }
        Some(RunMode::RUN {
            corpus,
            config,
            override_log_level,
            log_to_file,
        }) => {
            let mut configs = match config {
                Some(folder) => match Configs::load_from(&folder) {
                    Ok(configs) => configs,
                    Err(err) => {
                        eprintln!("failed to load the config from {folder:?}: {err}");
                        return ConsumedArgs::Nothing;
                    }
                },
                None => Configs::discover_or_default().unwrap_or_default(),
            };
            if let Some(level) = override_log_level {
                configs.system.log_level = level;
            }
            configs.system.log_to_file |= log_to_file;
            ConsumedArgs::Run(corpus, configs)
        }
        Some(RunMode::INIT) => match super::write_example_config() {
            Ok(path) => {
                println!("initialized {}", path.display());
                ConsumedArgs::Nothing
            }
            Err(err) => {
                eprintln!("failed to initialize the config: {err}");
                ConsumedArgs::Nothing
            }
        },
        None => ConsumedArgs::Nothing,
    }
}
