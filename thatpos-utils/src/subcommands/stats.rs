use std::path::Path;

use clap::{App, ArgMatches};
use stdinout::OrExit;
use thatpos::stats::CorpusStatistics;

use crate::traits::{ThatposApp, ThatposConfigApp};

pub struct StatsApp {
    config: String,
}

impl ThatposConfigApp for StatsApp {}

impl ThatposApp for StatsApp {
    fn app() -> App<'static, 'static> {
        Self::config_app("stats")
            .about("Sentence length and word frequency statistics of corpus categories")
    }

    fn parse(matches: &ArgMatches) -> Self {
        let config = matches.value_of(Self::CONFIG).unwrap().into();
        StatsApp { config }
    }

    fn run(&self) {
        let config = Self::load_config(&self.config);
        let statistics_config = config
            .statistics()
            .or_exit("Cannot compute statistics", 1);

        let statistics =
            CorpusStatistics::analyze(statistics_config).or_exit("Cannot compute statistics", 1);
        statistics
            .write_all(Path::new(&statistics_config.output_dir))
            .or_exit("Cannot write statistics", 1);
    }
}
