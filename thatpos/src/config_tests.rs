use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use lazy_static::lazy_static;

use crate::config::{
    CategoryFile, Config, EvaluationConfig, FileConfig, PrepareConfig, StatisticsConfig,
    TaggerConfig, TrainFile,
};
use crate::serialization::TomlRead;

lazy_static! {
    static ref BASIC_CONFIG_CHECK: Config = Config {
        tagger: Some(TaggerConfig {
            binary: "tree-tagger".to_owned(),
            parameters: "Training/that.par".to_owned(),
            args: crate::treetagger::default_args(),
            strip_tag_details: true,
            batch_size: 128,
        }),
        prepare: Some(PrepareConfig {
            input_dir: "Data/Train".to_owned(),
            output_dir: "Training".to_owned(),
            target: "that".to_owned(),
            lemmas: Some("lemmas.tsv".to_owned()),
            tag_map: vec![("IN".to_owned(), "II21".to_owned())]
                .into_iter()
                .collect::<BTreeMap<_, _>>(),
            replace_tag_map: false,
            files: vec![
                TrainFile {
                    input: "that_as_adverb.txt".to_owned(),
                    output: "adverb_formatted.txt".to_owned(),
                    target_tag: "RA".to_owned(),
                },
                TrainFile {
                    input: "that_pronoun.txt".to_owned(),
                    output: "pronoun_formatted.txt".to_owned(),
                    target_tag: "WPR".to_owned(),
                },
            ],
        }),
        evaluation: Some(EvaluationConfig {
            data_dir: "Data/Test".to_owned(),
            output_dir: "Results".to_owned(),
            prefix: "bnc_".to_owned(),
            target: "that".to_owned(),
            labels: Some(vec!["CJT".to_owned(), "DD1".to_owned(), "RA".to_owned()]),
            files: vec![
                FileConfig {
                    id: "that_adv".to_owned(),
                    expected_label: "RA".to_owned(),
                    filename: "that_adv.txt".to_owned(),
                },
                FileConfig {
                    id: "that_conjunction".to_owned(),
                    expected_label: "CJT".to_owned(),
                    filename: "that_conjunction.txt".to_owned(),
                },
            ],
        }),
        statistics: Some(StatisticsConfig {
            data_dir: "Data/Test".to_owned(),
            output_dir: "statistical_results".to_owned(),
            files: vec![CategoryFile {
                filename: "that_adv.txt".to_owned(),
                label: "That as an Adverb".to_owned(),
            }],
        }),
    };
}

#[test]
fn test_parse_config() {
    let f = File::open("testdata/thatpos.conf").unwrap();
    let config = Config::from_toml_read(f).unwrap();
    assert_eq!(*BASIC_CONFIG_CHECK, config);
}

#[test]
fn test_tag_map_extends_builtin() {
    let config = BASIC_CONFIG_CHECK.prepare().unwrap();
    let tag_map = config.tag_map();
    assert_eq!(tag_map.map("IN"), "II21");
    assert_eq!(tag_map.map("NNS"), "NN2");

    let replaced = PrepareConfig {
        replace_tag_map: true,
        ..config.clone()
    };
    assert_eq!(replaced.tag_map().map("NNS"), "NNS");
}

#[test]
fn test_missing_sections() {
    let f = File::open("testdata/tagger-only.conf").unwrap();
    let config = Config::from_toml_read(f).unwrap();

    let tagger = config.tagger().unwrap();
    assert_eq!(tagger.args, vec!["-token", "-lemma"]);
    assert_eq!(tagger.batch_size, 256);
    assert!(!tagger.strip_tag_details);

    assert!(config.prepare().is_err());
    assert!(config.evaluation().is_err());
    assert!(config.statistics().is_err());
}

#[test]
fn test_unknown_field() {
    let config = "[tagger]\nbinary = \"tree-tagger\"\nparameters = \"x.par\"\nthreads = 4\n";
    assert!(Config::from_toml_read(config.as_bytes()).is_err());
}

#[test]
fn test_relativize_paths() {
    let config_path = Path::new("testdata/thatpos.conf");
    let mut config = BASIC_CONFIG_CHECK.clone();
    config.relativize_paths(config_path).unwrap();

    let base = config_path.canonicalize().unwrap();
    let base = base.parent().unwrap();

    let tagger = config.tagger().unwrap();
    // Bare binary names are resolved through PATH.
    assert_eq!(tagger.binary, "tree-tagger");
    assert_eq!(
        Path::new(&tagger.parameters),
        base.join("Training/that.par").as_path()
    );

    let evaluation = config.evaluation().unwrap();
    assert_eq!(Path::new(&evaluation.data_dir), base.join("Data/Test").as_path());
    assert_eq!(
        Path::new(config.prepare().unwrap().lemmas.as_ref().unwrap()),
        base.join("lemmas.tsv").as_path()
    );
}
