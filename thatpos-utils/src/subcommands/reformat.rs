use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};

use clap::{App, Arg, ArgMatches};
use log::info;
use stdinout::OrExit;
use thatpos::io::{formatted_file_name, reformat_pairs, Writer};

use crate::traits::{simple_app, ThatposApp};

static INPUTS: &str = "INPUTS";
static OUTPUT_DIR: &str = "OUTPUT_DIR";

pub struct ReformatApp {
    inputs: Vec<String>,
    output_dir: String,
}

impl ThatposApp for ReformatApp {
    fn app() -> App<'static, 'static> {
        simple_app("reformat")
            .about("Convert 'token tag token tag ...' lines to the vertical format")
            .arg(
                Arg::with_name(INPUTS)
                    .help("Pre-tagged corpus files")
                    .min_values(1)
                    .required(true),
            )
            .arg(
                Arg::with_name(OUTPUT_DIR)
                    .help("Output directory")
                    .long("output-dir")
                    .takes_value(true)
                    .default_value("."),
            )
    }

    fn parse(matches: &ArgMatches) -> Self {
        let inputs = matches
            .values_of(INPUTS)
            .unwrap()
            .map(ToOwned::to_owned)
            .collect();
        let output_dir = matches.value_of(OUTPUT_DIR).unwrap().into();

        ReformatApp { inputs, output_dir }
    }

    fn run(&self) {
        fs::create_dir_all(&self.output_dir).or_exit(
            format!("Cannot create output directory '{}'", self.output_dir),
            1,
        );

        for input in &self.inputs {
            let output = formatted_file_name(input, &self.output_dir)
                .or_exit("Cannot determine output file name", 1);

            let read = File::open(input).or_exit(format!("Cannot open '{}'", input), 1);
            let write = File::create(&output)
                .or_exit(format!("Cannot create '{}'", output.display()), 1);

            let mut writer = Writer::new(BufWriter::new(write));
            let summary = reformat_pairs(BufReader::new(read), &mut writer)
                .or_exit(format!("Cannot reformat '{}'", input), 1);
            writer
                .into_inner()
                .flush()
                .or_exit(format!("Cannot write '{}'", output.display()), 1);

            info!(
                "Output written to: {} ({} sentences, {} malformed lines skipped)",
                output.display(),
                summary.sentences,
                summary.skipped
            );
        }
    }
}
