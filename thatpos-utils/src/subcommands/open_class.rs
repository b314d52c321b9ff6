use std::io::BufWriter;

use clap::{App, Arg, ArgMatches};
use stdinout::{Input, OrExit, Output};
use thatpos::lexicon::{write_tag_list, Lexicon};

use crate::traits::{simple_app, ThatposApp};

static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";

pub struct OpenClassApp {
    input: Option<String>,
    output: Option<String>,
}

impl ThatposApp for OpenClassApp {
    fn app() -> App<'static, 'static> {
        simple_app("open-class")
            .about("List the tags of a lexicon, one tag per line")
            .arg(Arg::with_name(INPUT).help("Lexicon").index(1))
            .arg(Arg::with_name(OUTPUT).help("Tag list").index(2))
    }

    fn parse(matches: &ArgMatches) -> Self {
        let input = matches.value_of(INPUT).map(ToOwned::to_owned);
        let output = matches.value_of(OUTPUT).map(ToOwned::to_owned);

        OpenClassApp { input, output }
    }

    fn run(&self) {
        let input = Input::from(self.input.as_ref());
        let lexicon = Lexicon::from_buf_read(
            input
                .buf_read()
                .or_exit("Cannot open lexicon for reading", 1),
        )
        .or_exit("Cannot read lexicon", 1);

        let output = Output::from(self.output.as_ref());
        let write = BufWriter::new(output.write().or_exit("Cannot open output for writing", 1));
        write_tag_list(lexicon.tags(), write).or_exit("Cannot write tags", 1);
    }
}
