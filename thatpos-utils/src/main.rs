use std::io::stdout;

use clap::{crate_version, App, AppSettings, Arg, Shell, SubCommand};
use env_logger::Env;

mod progress;

mod sent_proc;

mod subcommands;

mod traits;
pub use self::traits::{ThatposApp, ThatposConfigApp};

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
    AppSettings::SubcommandRequiredElseHelp,
];

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Known subapplications.
    let apps = vec![
        subcommands::EvaluateApp::app(),
        subcommands::LexiconApp::app(),
        subcommands::OpenClassApp::app(),
        subcommands::PrepareApp::app(),
        subcommands::ReformatApp::app(),
        subcommands::StatsApp::app(),
        subcommands::TagApp::app(),
    ];

    let cli = App::new("thatpos")
        .settings(DEFAULT_CLAP_SETTINGS)
        .about("Training data, evaluation and statistics for tagging uses of 'that'")
        .version(crate_version!())
        .subcommands(apps)
        .subcommand(
            SubCommand::with_name("completions")
                .about("Generate completion scripts for your shell")
                .setting(AppSettings::ArgRequiredElseHelp)
                .arg(Arg::with_name("shell").possible_values(&Shell::variants())),
        );
    let matches = cli.clone().get_matches();

    match matches.subcommand_name().unwrap() {
        "completions" => {
            let shell = matches
                .subcommand_matches("completions")
                .unwrap()
                .value_of("shell")
                .unwrap();
            write_completion_script(cli, shell.parse::<Shell>().unwrap());
        }
        "evaluate" => {
            subcommands::EvaluateApp::parse(matches.subcommand_matches("evaluate").unwrap()).run()
        }
        "lexicon" => {
            subcommands::LexiconApp::parse(matches.subcommand_matches("lexicon").unwrap()).run()
        }
        "open-class" => subcommands::OpenClassApp::parse(
            matches.subcommand_matches("open-class").unwrap(),
        )
        .run(),
        "prepare" => {
            subcommands::PrepareApp::parse(matches.subcommand_matches("prepare").unwrap()).run()
        }
        "reformat" => {
            subcommands::ReformatApp::parse(matches.subcommand_matches("reformat").unwrap()).run()
        }
        "stats" => subcommands::StatsApp::parse(matches.subcommand_matches("stats").unwrap()).run(),
        "tag" => subcommands::TagApp::parse(matches.subcommand_matches("tag").unwrap()).run(),
        _unknown => unreachable!(),
    }
}

fn write_completion_script(mut cli: App, shell: Shell) {
    cli.gen_completions_to("thatpos", shell, &mut stdout());
}
