use std::fs;
use std::path::{Path, PathBuf};

use clap::{App, Arg, ArgMatches};
use failure::Fallible;
use log::{info, warn};
use stdinout::OrExit;
use thatpos::config::{EvaluationConfig, TaggerConfig};
use thatpos::eval::{Evaluator, ReportWriter};
use thatpos::TreeTagger;

use crate::progress::SentenceProgress;
use crate::traits::{ThatposApp, ThatposConfigApp};

static MODELS: &str = "MODELS";

pub struct EvaluateApp {
    config: String,
    models: Option<String>,
}

impl EvaluateApp {
    fn evaluate(
        &self,
        tagger: &TreeTagger,
        tagger_config: &TaggerConfig,
        config: &EvaluationConfig,
        prefix: &str,
    ) {
        let evaluator = Evaluator::new(
            tagger,
            config.target.clone(),
            tagger_config.batch_size.max(1),
        );

        let progress = SentenceProgress::new().with_prefix(prefix);
        let evaluation = evaluator
            .evaluate(&config.files, Path::new(&config.data_dir), |id, n| {
                progress.set_message(id);
                progress.count_sentences(n);
            })
            .or_exit("Cannot evaluate tagger", 1);
        drop(progress);

        let writer = ReportWriter::new(&config.output_dir, prefix)
            .or_exit("Cannot write evaluation reports", 1);
        let written = writer
            .write_all(&evaluation, config.labels.as_deref())
            .or_exit("Cannot write evaluation reports", 1);
        for path in written {
            info!("Saved {}", path.display());
        }

        info!(
            "Accuracy: {:.2}%",
            evaluation.classification_report().accuracy() * 100.
        );
    }
}

/// Parameter files in a directory, sorted by name.
fn model_files(dir: &Path) -> Fallible<Vec<PathBuf>> {
    let mut models = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|ext| ext == "par").unwrap_or(false) {
            models.push(path);
        }
    }

    models.sort();

    Ok(models)
}

impl ThatposConfigApp for EvaluateApp {}

impl ThatposApp for EvaluateApp {
    fn app() -> App<'static, 'static> {
        Self::config_app("evaluate")
            .about("Evaluate the tags that a tagger assigns to the target word")
            .arg(
                Arg::with_name(MODELS)
                    .help("Evaluate every parameter file (*.par) in this directory")
                    .long("models")
                    .takes_value(true),
            )
    }

    fn parse(matches: &ArgMatches) -> Self {
        let config = matches.value_of(Self::CONFIG).unwrap().into();
        let models = matches.value_of(MODELS).map(ToOwned::to_owned);

        EvaluateApp { config, models }
    }

    fn run(&self) {
        let config = Self::load_config(&self.config);
        let tagger_config = config.tagger().or_exit("Cannot evaluate tagger", 1);
        let evaluation_config = config.evaluation().or_exit("Cannot evaluate tagger", 1);

        let tagger = TreeTagger::from_config(tagger_config);

        let models_dir = match self.models {
            Some(ref models_dir) => models_dir,
            None => {
                self.evaluate(
                    &tagger,
                    tagger_config,
                    evaluation_config,
                    &evaluation_config.prefix,
                );
                return;
            }
        };

        let models = model_files(Path::new(models_dir))
            .or_exit(format!("Cannot list models in '{}'", models_dir), 1);
        if models.is_empty() {
            warn!("No parameter files found in '{}'", models_dir);
        }

        for model in models {
            let name = model
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Evaluating model: {}", name);

            let prefix = format!("{}{}_", evaluation_config.prefix, name);
            let tagger = tagger.clone().with_parameters(&model);
            self.evaluate(&tagger, tagger_config, evaluation_config, &prefix);
        }
    }
}
