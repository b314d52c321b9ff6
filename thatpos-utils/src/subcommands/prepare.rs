use std::fs::File;
use std::io::BufReader;

use clap::{App, ArgMatches};
use log::info;
use stdinout::OrExit;
use thatpos::lemma::LemmaTable;
use thatpos::prepare::TrainingDataBuilder;
use thatpos::TreeTagger;

use crate::progress::SentenceProgress;
use crate::traits::{ThatposApp, ThatposConfigApp};

pub struct PrepareApp {
    config: String,
}

impl ThatposConfigApp for PrepareApp {}

impl ThatposApp for PrepareApp {
    fn app() -> App<'static, 'static> {
        Self::config_app("prepare")
            .about("Prepare tagger training data: formatted files, lexicon and open class tags")
    }

    fn parse(matches: &ArgMatches) -> Self {
        let config = matches.value_of(Self::CONFIG).unwrap().into();
        PrepareApp { config }
    }

    fn run(&self) {
        let config = Self::load_config(&self.config);
        let tagger_config = config
            .tagger()
            .or_exit("Cannot prepare training data", 1);
        let prepare_config = config
            .prepare()
            .or_exit("Cannot prepare training data", 1);

        let lemmas = match prepare_config.lemmas {
            Some(ref path) => {
                let f = File::open(path)
                    .or_exit(format!("Cannot open lemma table '{}'", path), 1);
                LemmaTable::from_buf_read(BufReader::new(f))
                    .or_exit(format!("Cannot read lemma table '{}'", path), 1)
            }
            None => LemmaTable::new(),
        };
        info!("Lemma table with {} entries", lemmas.len());

        let tagger = TreeTagger::from_config(tagger_config);
        let builder = TrainingDataBuilder::new(
            &tagger,
            &lemmas,
            prepare_config.tag_map(),
            prepare_config.target.clone(),
            tagger_config.batch_size.max(1),
        );

        let progress = SentenceProgress::new();
        builder
            .build(prepare_config, |file, n| {
                progress.set_message(file);
                progress.count_sentences(n);
            })
            .or_exit("Cannot prepare training data", 1);
    }
}
