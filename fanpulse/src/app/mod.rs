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
use crate::corpus::Corpus;
use crate::labeling::{ConsolePort, LabelSpec, LabelingSession};
use crate::pipeline;
use crate::report;
use anyhow::Context;
use log::info;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use text_processing::normalizer::Normalizer;

mod args;
mod logging;

pub use args::{FanpulseArgs, RunMode};

use args::{consume_args, ConsumedArgs};
use logging::configure_logging;

/// The weight floor and list length of the per class vocabulary report.
const INSPECT_MIN_WEIGHT: f64 = 0.1;
const INSPECT_TOP_N: usize = 25;

pub fn exec_args(args: FanpulseArgs) -> anyhow::Result<()> {
    match consume_args(args) {
        ConsumedArgs::Prepare(corpus, configs) => {
            configure_logging(&configs)?;
            run_prepare(&corpus)
        }
        ConsumedArgs::Run(corpus, configs) => {
            configure_logging(&configs)?;
            run_pipeline(&corpus, configs)
        }
        ConsumedArgs::Nothing => Ok(()),
    }
}

fn write_example_config() -> anyhow::Result<PathBuf> {
    let path = PathBuf::from("./fanpulse.yaml");
    let mut file = File::create(&path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    file.write_all(Configs::example_yaml()?.as_bytes())?;
    Ok(path)
}

fn load_corpus(path: &Path) -> anyhow::Result<Corpus> {
    let file =
        File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    let corpus = Corpus::from_csv_read(BufReader::new(file))?;
    info!("loaded {} comments from {}", corpus.records().len(), path.display());
    Ok(corpus)
}

fn run_prepare(path: &Path) -> anyhow::Result<()> {
    let mut corpus = load_corpus(path)?;
    pipeline::prepare(&mut corpus, &Normalizer::default());
    print!(
        "{}",
        report::render_language_distribution(&report::language_distribution(&corpus, 5))
    );
    Ok(())
}

fn run_pipeline(path: &Path, configs: Configs) -> anyhow::Result<()> {
    let mut corpus = load_corpus(path)?;
    pipeline::prepare(&mut corpus, &Normalizer::default());
    print!(
        "{}",
        report::render_language_distribution(&report::language_distribution(&corpus, 5))
    );

    let spec = LabelSpec::new(configs.labeling.categories.iter().cloned())?;
    let session = LabelingSession::new(
        spec.clone(),
        configs.labeling.sample_size,
        configs.labeling.allow_relabel,
    );
    let outcome = pipeline::label(
        &mut corpus,
        &session,
        &mut ConsolePort::stdio(),
        &mut rand::thread_rng(),
    )?;
    info!(
        "labeling done, {} committed, {} discarded",
        outcome.committed, outcome.discarded
    );

    for category in spec.categories() {
        let classifier = pipeline::train_category(
            &corpus,
            category,
            &configs.training,
            &mut rand::thread_rng(),
        )?;
        info!("accepted the {category:?} classifier, {}", classifier.metrics());
        pipeline::apply_category(&mut corpus, &classifier);
        let ranked =
            pipeline::inspect_category(&corpus, &classifier, INSPECT_MIN_WEIGHT, INSPECT_TOP_N)?;
        print!("{}", report::render_class_features(category, &ranked));
    }

    let engine = configs.sentiment.build_engine();
    let filter = spec
        .categories()
        .iter()
        .find(|category| category.as_str() == "kpop")
        .map(String::as_str);
    let aggregate = pipeline::sentiment_aggregate(&corpus, &engine, filter);
    let groups = corpus.groups();
    print!("{}", report::render_polarity_table(&aggregate, &groups));
    Ok(())
}
