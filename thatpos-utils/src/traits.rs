use std::fs::File;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches};
use stdinout::OrExit;
use thatpos::config::Config;
use thatpos::serialization::TomlRead;

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

pub trait ThatposApp {
    fn app() -> App<'static, 'static>;

    fn parse(matches: &ArgMatches) -> Self;

    fn run(&self);
}

/// Subcommands that are driven by a configuration file.
pub trait ThatposConfigApp: ThatposApp {
    const CONFIG: &'static str = "CONFIG";

    fn config_app<'a, 'b>(name: &str) -> App<'a, 'b> {
        App::new(name)
            .settings(DEFAULT_CLAP_SETTINGS)
            .version(crate_version!())
            .arg(
                Arg::with_name(Self::CONFIG)
                    .help("thatpos configuration")
                    .index(1)
                    .required(true),
            )
    }

    /// Read the configuration, with paths relative to the configuration
    /// file.
    fn load_config(config_path: &str) -> Config {
        let config_file = File::open(config_path).or_exit(
            format!("Cannot open configuration file '{}'", config_path),
            1,
        );
        let mut config =
            Config::from_toml_read(config_file).or_exit("Cannot parse configuration", 1);
        config
            .relativize_paths(config_path)
            .or_exit("Cannot relativize paths in configuration", 1);
        config
    }
}

/// Plain subcommands.
pub fn simple_app<'a, 'b>(name: &str) -> App<'a, 'b> {
    App::new(name)
        .settings(DEFAULT_CLAP_SETTINGS)
        .version(crate_version!())
}
