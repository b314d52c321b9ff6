use std::io::{BufRead, BufWriter};
use std::process;

use clap::{App, Arg, ArgMatches};
use stdinout::{Input, OrExit, Output};
use thatpos::io::Writer;
use thatpos::tokenizer::sentence_from_text;
use thatpos::TreeTagger;

use crate::sent_proc::SentProcessor;
use crate::traits::{ThatposApp, ThatposConfigApp};

static BATCH_SIZE: &str = "BATCH_SIZE";
static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";
static PARAMETERS: &str = "PARAMETERS";

pub struct TagApp {
    batch_size: Option<usize>,
    config: String,
    input: Option<String>,
    output: Option<String>,
    parameters: Option<String>,
}

impl ThatposConfigApp for TagApp {}

impl ThatposApp for TagApp {
    fn app() -> App<'static, 'static> {
        Self::config_app("tag")
            .about("Tag plain sentences, one sentence per line")
            .arg(
                Arg::with_name(INPUT)
                    .help("Input data")
                    .long("input")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name(OUTPUT)
                    .help("Output data")
                    .long("output")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name(PARAMETERS)
                    .help("Tagger parameter file, overrides the configuration")
                    .long("parameters")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name(BATCH_SIZE)
                    .help("Batch size, overrides the configuration")
                    .long("batchsize")
                    .takes_value(true),
            )
    }

    fn parse(matches: &ArgMatches) -> Self {
        let batch_size = matches
            .value_of(BATCH_SIZE)
            .map(|v| v.parse().or_exit("Cannot parse batch size", 1));
        let config = matches.value_of(Self::CONFIG).unwrap().into();
        let input = matches.value_of(INPUT).map(ToOwned::to_owned);
        let output = matches.value_of(OUTPUT).map(ToOwned::to_owned);
        let parameters = matches.value_of(PARAMETERS).map(ToOwned::to_owned);

        TagApp {
            batch_size,
            config,
            input,
            output,
            parameters,
        }
    }

    fn run(&self) {
        let config = Self::load_config(&self.config);
        let tagger_config = config.tagger().or_exit("Cannot tag", 1);

        let mut tagger = TreeTagger::from_config(tagger_config);
        if let Some(ref parameters) = self.parameters {
            tagger = tagger.with_parameters(parameters);
        }
        let batch_size = self.batch_size.unwrap_or(tagger_config.batch_size);
        if batch_size == 0 {
            eprintln!("Batch size should at least be 1");
            process::exit(1);
        }

        let input = Input::from(self.input.as_ref());
        let read = input.buf_read().or_exit("Cannot open input for reading", 1);

        let output = Output::from(self.output.as_ref());
        let writer = Writer::with_lemmas(BufWriter::new(
            output.write().or_exit("Cannot open output for writing", 1),
        ));

        let mut sent_proc = SentProcessor::new(&tagger, writer, batch_size);
        for line in read.lines() {
            let line = line.or_exit("Cannot read line", 1);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            sent_proc
                .process(sentence_from_text(line))
                .or_exit("Error processing sentence", 1);
        }

        sent_proc.finish().or_exit("Error processing sentence", 1);
    }
}
