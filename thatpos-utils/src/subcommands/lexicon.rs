use std::fs::File;
use std::io::{BufReader, BufWriter};

use clap::{App, Arg, ArgMatches};
use log::info;
use stdinout::{OrExit, Output};
use thatpos::io::{ReadSentence, Reader};
use thatpos::lemma::LemmaTable;
use thatpos::lexicon::Lexicon;

use crate::traits::{simple_app, ThatposApp};

static INPUTS: &str = "INPUTS";
static LEMMAS: &str = "LEMMAS";
static OUTPUT: &str = "OUTPUT";

pub struct LexiconApp {
    inputs: Vec<String>,
    lemmas: Option<String>,
    output: Option<String>,
}

impl LexiconApp {
    fn lemma_table(&self) -> LemmaTable {
        match self.lemmas {
            Some(ref path) => {
                let f = File::open(path).or_exit(format!("Cannot open lemma table '{}'", path), 1);
                LemmaTable::from_buf_read(BufReader::new(f))
                    .or_exit(format!("Cannot read lemma table '{}'", path), 1)
            }
            None => LemmaTable::new(),
        }
    }
}

impl ThatposApp for LexiconApp {
    fn app() -> App<'static, 'static> {
        simple_app("lexicon")
            .about("Build a tagger lexicon from files in the vertical format")
            .arg(
                Arg::with_name(INPUTS)
                    .help("Tagged corpus files")
                    .min_values(1)
                    .required(true),
            )
            .arg(
                Arg::with_name(LEMMAS)
                    .help("Lemma table")
                    .long("lemmas")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name(OUTPUT)
                    .help("Output lexicon")
                    .long("output")
                    .takes_value(true),
            )
    }

    fn parse(matches: &ArgMatches) -> Self {
        let inputs = matches
            .values_of(INPUTS)
            .unwrap()
            .map(ToOwned::to_owned)
            .collect();
        let lemmas = matches.value_of(LEMMAS).map(ToOwned::to_owned);
        let output = matches.value_of(OUTPUT).map(ToOwned::to_owned);

        LexiconApp {
            inputs,
            lemmas,
            output,
        }
    }

    fn run(&self) {
        let lemmas = self.lemma_table();
        let mut lexicon = Lexicon::new();

        for input in &self.inputs {
            let f = File::open(input).or_exit(format!("Cannot open '{}'", input), 1);
            for sentence in Reader::new(BufReader::new(f)).sentences() {
                let sentence = sentence.or_exit(format!("Cannot read sentence from '{}'", input), 1);
                lexicon.add_lemmatized(&sentence, &lemmas);
            }
        }

        let output = Output::from(self.output.as_ref());
        let write = BufWriter::new(output.write().or_exit("Cannot open output for writing", 1));
        lexicon
            .write(write)
            .or_exit("Cannot write lexicon", 1);

        info!("Lexicon with {} words", lexicon.len());
    }
}
