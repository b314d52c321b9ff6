use std::collections::BTreeMap;
use std::path::Path;

use failure::{format_err, Error, Fallible};
use serde_derive::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::tagset::TagMap;

/// Configuration of the tools.
///
/// Every subcommand requires its own section.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub tagger: Option<TaggerConfig>,
    pub prepare: Option<PrepareConfig>,
    pub evaluation: Option<EvaluationConfig>,
    pub statistics: Option<StatisticsConfig>,
}

impl Config {
    /// Make configuration paths relative to the configuration file.
    pub fn relativize_paths<P>(&mut self, config_path: P) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let config_path = config_path.as_ref();

        if let Some(ref mut tagger) = self.tagger {
            // A bare binary name is looked up in PATH.
            if tagger.binary.contains('/') {
                tagger.binary = relativize_path(config_path, &tagger.binary)?;
            }
            tagger.parameters = relativize_path(config_path, &tagger.parameters)?;
        }

        if let Some(ref mut prepare) = self.prepare {
            prepare.input_dir = relativize_path(config_path, &prepare.input_dir)?;
            prepare.output_dir = relativize_path(config_path, &prepare.output_dir)?;
            if let Some(ref mut lemmas) = prepare.lemmas {
                *lemmas = relativize_path(config_path, lemmas)?;
            }
        }

        if let Some(ref mut evaluation) = self.evaluation {
            evaluation.data_dir = relativize_path(config_path, &evaluation.data_dir)?;
            evaluation.output_dir = relativize_path(config_path, &evaluation.output_dir)?;
        }

        if let Some(ref mut statistics) = self.statistics {
            statistics.data_dir = relativize_path(config_path, &statistics.data_dir)?;
            statistics.output_dir = relativize_path(config_path, &statistics.output_dir)?;
        }

        Ok(())
    }

    pub fn tagger(&self) -> Fallible<&TaggerConfig> {
        section(self.tagger.as_ref(), "tagger")
    }

    pub fn prepare(&self) -> Fallible<&PrepareConfig> {
        section(self.prepare.as_ref(), "prepare")
    }

    pub fn evaluation(&self) -> Fallible<&EvaluationConfig> {
        section(self.evaluation.as_ref(), "evaluation")
    }

    pub fn statistics(&self) -> Fallible<&StatisticsConfig> {
        section(self.statistics.as_ref(), "statistics")
    }
}

fn section<'a, T>(section: Option<&'a T>, name: &str) -> Fallible<&'a T> {
    section.ok_or_else(|| {
        ConfigError::MissingSection {
            section: name.to_owned(),
        }
        .into()
    })
}

/// External tagger.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaggerConfig {
    /// TreeTagger binary.
    pub binary: String,

    /// Parameter (model) file.
    pub parameters: String,

    /// Arguments before the parameter file.
    #[serde(default = "crate::treetagger::default_args")]
    pub args: Vec<String>,

    /// Strip tag details after a slash (`IN/that` becomes `IN`).
    #[serde(default)]
    pub strip_tag_details: bool,

    /// Number of sentences per tagger invocation.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    256
}

fn default_target() -> String {
    "that".to_owned()
}

/// Training data preparation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrepareConfig {
    pub input_dir: String,
    pub output_dir: String,

    /// The word whose tag is overridden.
    #[serde(default = "default_target")]
    pub target: String,

    /// Lemma table with `form<TAB>class<TAB>lemma` lines.
    pub lemmas: Option<String>,

    /// Additional tag mappings, applied over the Penn to CLAWS mapping.
    #[serde(default)]
    pub tag_map: BTreeMap<String, String>,

    /// Use only `tag_map`, without the Penn to CLAWS mapping.
    #[serde(default)]
    pub replace_tag_map: bool,

    pub files: Vec<TrainFile>,
}

impl PrepareConfig {
    /// The tag mapping for the tagger output.
    pub fn tag_map(&self) -> TagMap {
        let mut tag_map = if self.replace_tag_map {
            TagMap::new()
        } else {
            TagMap::penn_to_claws()
        };
        tag_map.extend(self.tag_map.clone());
        tag_map
    }
}

/// A training file with the tag of the target word in this file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrainFile {
    pub input: String,
    pub output: String,
    pub target_tag: String,
}

/// Tagger evaluation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    pub data_dir: String,
    pub output_dir: String,

    /// Prefix of output file names.
    #[serde(default)]
    pub prefix: String,

    /// The word whose tag is evaluated.
    #[serde(default = "default_target")]
    pub target: String,

    /// Fixed rows and columns of the label confusion matrix.
    pub labels: Option<Vec<String>>,

    pub files: Vec<FileConfig>,
}

/// A test file in which every sentence has the same expected label.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub id: String,
    pub expected_label: String,
    pub filename: String,
}

/// Corpus statistics.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatisticsConfig {
    pub data_dir: String,
    pub output_dir: String,
    pub files: Vec<CategoryFile>,
}

/// A corpus file with the label of its category.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryFile {
    pub filename: String,
    pub label: String,
}

fn relativize_path(config_path: &Path, filename: &str) -> Result<String, Error> {
    if filename.is_empty() {
        return Ok(filename.to_owned());
    }

    let path = Path::new(&filename);

    // Don't touch absolute paths.
    if path.is_absolute() {
        return Ok(filename.to_owned());
    }

    let abs_config_path = config_path.canonicalize()?;
    Ok(abs_config_path
        .parent()
        .ok_or_else(|| {
            format_err!(
                "Cannot get parent path of the configuration file: {}",
                abs_config_path.to_string_lossy()
            )
        })?
        .join(path)
        .to_str()
        .ok_or_else(|| {
            format_err!(
                "Cannot convert parent path to string: {}",
                abs_config_path.to_string_lossy()
            )
        })?
        .to_owned())
}
