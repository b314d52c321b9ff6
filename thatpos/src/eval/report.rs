use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use failure::{Fallible, ResultExt};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_derive::Serialize;

use super::harness::{Evaluation, FileResults};
use super::metrics::prediction_label;
use crate::serialization::JsonWrite;

/// Accuracy of a test file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FileAccuracy {
    pub accuracy: f64,
    pub num_sentences: usize,
}

/// Accuracies of test files, in evaluation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccuracyReport {
    files: Vec<(String, FileAccuracy)>,
}

impl AccuracyReport {
    pub fn new(evaluation: &Evaluation) -> Self {
        AccuracyReport {
            files: evaluation
                .files()
                .iter()
                .map(|file| {
                    (
                        file.id.clone(),
                        FileAccuracy {
                            accuracy: file.accuracy(),
                            num_sentences: file.results.len(),
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&FileAccuracy> {
        self.files
            .iter()
            .find(|(file_id, _)| file_id == id)
            .map(|(_, accuracy)| accuracy)
    }
}

impl Serialize for AccuracyReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (id, accuracy) in &self.files {
            map.serialize_entry(id, accuracy)?;
        }
        map.end()
    }
}

/// Write the per-sentence results of a test file.
pub fn write_file_results<W>(results: &FileResults, mut write: W) -> Fallible<()>
where
    W: Write,
{
    writeln!(write, "Sentence | True Label | Predicted Tag")?;
    writeln!(write, "{}", "-".repeat(60))?;
    for result in &results.results {
        writeln!(
            write,
            "{} | {} | {}",
            result.sentence,
            result.expected,
            prediction_label(result.predicted.as_deref())
        )?;
    }

    Ok(())
}

/// Writes evaluation reports to a directory.
///
/// All file names start with the configured prefix.
pub struct ReportWriter {
    output_dir: PathBuf,
    prefix: String,
}

impl ReportWriter {
    /// Construct a report writer, creating the output directory if
    /// necessary.
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Fallible<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).with_context(|_| {
            format!(
                "Cannot create output directory '{}'",
                output_dir.display()
            )
        })?;

        Ok(ReportWriter {
            output_dir,
            prefix: prefix.into(),
        })
    }

    /// Path of an output file.
    pub fn path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", self.prefix, name))
    }

    fn create(&self, name: &str) -> Fallible<(PathBuf, BufWriter<File>)> {
        let path = self.path(name);
        let file = File::create(&path)
            .with_context(|_| format!("Cannot create '{}'", path.display()))?;
        Ok((path, BufWriter::new(file)))
    }

    /// Write all reports, returning the paths of the written files.
    ///
    /// When `labels` is given, the rows and columns of the label
    /// confusion matrix are exactly these labels.
    pub fn write_all(
        &self,
        evaluation: &Evaluation,
        labels: Option<&[String]>,
    ) -> Fallible<Vec<PathBuf>> {
        let mut written = Vec::new();

        for results in evaluation.files() {
            let (path, mut write) = self.create(&format!("results_{}.txt", results.id))?;
            write_file_results(results, &mut write)?;
            write.flush()?;
            written.push(path);
        }

        written.push(self.write_per_file_matrix(evaluation)?);
        written.push(self.write_label_matrix(evaluation, labels)?);

        let (path, mut write) = self.create("classification_report.json")?;
        evaluation.classification_report().to_json_write(&mut write)?;
        write.flush()?;
        written.push(path);

        let (path, mut write) = self.create("accuracy_report.json")?;
        AccuracyReport::new(evaluation).to_json_write(&mut write)?;
        write.flush()?;
        written.push(path);

        Ok(written)
    }

    /// Confusion matrix with test files as rows and predicted tags as
    /// columns.
    pub fn write_per_file_matrix(&self, evaluation: &Evaluation) -> Fallible<PathBuf> {
        let table = evaluation.per_file();
        let (path, write) = self.create("confusion_matrix.csv")?;
        table.write_csv(write, "", table.rows(), &table.sorted_columns())?;
        Ok(path)
    }

    /// Confusion matrix with expected labels as rows and predicted labels
    /// as columns.
    pub fn write_label_matrix(
        &self,
        evaluation: &Evaluation,
        labels: Option<&[String]>,
    ) -> Fallible<PathBuf> {
        let table = evaluation.labels();
        let (path, write) = self.create("confusion_matrix_2.csv")?;
        match labels {
            Some(labels) => table.write_csv(write, "True", labels, labels)?,
            None => table.write_csv(
                write,
                "True",
                &table.sorted_rows(),
                &table.sorted_columns(),
            )?,
        }
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
