use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use failure::{Fallible, ResultExt};
use log::{info, warn};

use super::metrics::{prediction_label, ClassificationReport, Crosstab};
use crate::config::FileConfig;
use crate::io::read_plain_sentences;
use crate::tokenizer::sentence_from_text;
use crate::{Sentence, Tag, Token};

/// Outcome for a single test sentence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentenceResult {
    pub sentence: String,
    pub expected: String,
    pub predicted: Option<String>,
}

impl SentenceResult {
    pub fn is_correct(&self) -> bool {
        self.predicted.as_ref() == Some(&self.expected)
    }
}

/// Outcomes for a test file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileResults {
    pub id: String,
    pub expected_label: String,
    pub results: Vec<SentenceResult>,
}

impl FileResults {
    pub fn correct(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct()).count()
    }

    /// Accuracy in percent, 0 for a file without sentences.
    pub fn accuracy(&self) -> f64 {
        if self.results.is_empty() {
            0.
        } else {
            self.correct() as f64 / self.results.len() as f64 * 100.
        }
    }
}

/// Results of evaluating a tagger on a set of test files.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    files: Vec<FileResults>,
    per_file: Crosstab,
    labels: Crosstab,
    gold: Vec<String>,
    predicted: Vec<String>,
}

impl Evaluation {
    pub fn new() -> Self {
        Evaluation::default()
    }

    /// Record the results of a test file.
    pub fn add_file(&mut self, file: FileResults) {
        self.per_file.add_row(&file.id);

        for result in &file.results {
            let predicted = prediction_label(result.predicted.as_deref());
            self.per_file.add(&file.id, predicted);
            self.labels.add(&result.expected, predicted);
            self.gold.push(result.expected.clone());
            self.predicted.push(predicted.to_owned());
        }

        self.files.push(file);
    }

    /// Record a test file that could not be found.
    ///
    /// The file gets an empty row in the per-file confusion matrix.
    pub fn add_missing_file(&mut self, id: &str) {
        self.per_file.add_row(id);
    }

    /// Results of the test files that were found.
    pub fn files(&self) -> &[FileResults] {
        &self.files
    }

    /// Confusion matrix of test files and predicted tags.
    pub fn per_file(&self) -> &Crosstab {
        &self.per_file
    }

    /// Confusion matrix of expected and predicted labels.
    pub fn labels(&self) -> &Crosstab {
        &self.labels
    }

    pub fn classification_report(&self) -> ClassificationReport {
        ClassificationReport::new(&self.gold, &self.predicted)
    }
}

/// Evaluates the tag that a tagger assigns to a target word.
pub struct Evaluator<'a, T> {
    tagger: &'a T,
    target: String,
    batch_size: usize,
}

impl<'a, T> Evaluator<'a, T>
where
    T: Tag,
{
    pub fn new(tagger: &'a T, target: impl Into<String>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "Batch size should at least be 1.");

        Evaluator {
            tagger,
            target: target.into(),
            batch_size,
        }
    }

    /// Predict the tag of the target word in each sentence.
    ///
    /// The prediction is the tag of the first occurrence of the target
    /// word, `None` if the target word does not occur.
    pub fn predict<F>(
        &self,
        sentences: &[String],
        mut progress: F,
    ) -> Fallible<Vec<Option<String>>>
    where
        F: FnMut(usize),
    {
        let mut predictions = Vec::with_capacity(sentences.len());

        for batch in sentences.chunks(self.batch_size) {
            let mut tokenized: Vec<Sentence> =
                batch.iter().map(|s| sentence_from_text(s)).collect();
            self.tagger.tag_sentences(&mut tokenized)?;

            predictions.extend(tokenized.iter().map(|sentence| {
                sentence
                    .find_word(&self.target)
                    .and_then(Token::tag)
                    .map(ToOwned::to_owned)
            }));

            progress(batch.len());
        }

        Ok(predictions)
    }

    /// Evaluate the sentences of a test file.
    pub fn evaluate_file<F>(
        &self,
        config: &FileConfig,
        sentences: Vec<String>,
        progress: F,
    ) -> Fallible<FileResults>
    where
        F: FnMut(usize),
    {
        let predictions = self.predict(&sentences, progress)?;

        let results = sentences
            .into_iter()
            .zip(predictions)
            .map(|(sentence, predicted)| SentenceResult {
                sentence,
                expected: config.expected_label.clone(),
                predicted,
            })
            .collect();

        Ok(FileResults {
            id: config.id.clone(),
            expected_label: config.expected_label.clone(),
            results,
        })
    }

    /// Evaluate a set of test files in `data_dir`.
    ///
    /// Test files that do not exist are skipped with a warning.
    /// `progress` is called with the file identifier and the number of
    /// sentences processed.
    pub fn evaluate<F>(
        &self,
        files: &[FileConfig],
        data_dir: &Path,
        mut progress: F,
    ) -> Fallible<Evaluation>
    where
        F: FnMut(&str, usize),
    {
        let mut evaluation = Evaluation::new();

        for file in files {
            let path = data_dir.join(&file.filename);
            if !path.exists() {
                warn!("File {} not found.", path.display());
                evaluation.add_missing_file(&file.id);
                continue;
            }

            let read = File::open(&path)
                .with_context(|_| format!("Cannot open test file '{}'", path.display()))?;
            let sentences = read_plain_sentences(BufReader::new(read))?;

            let results = self.evaluate_file(file, sentences, |n| progress(&file.id, n))?;
            info!(
                "{}: {:.2}% of {} sentences correct",
                file.id,
                results.accuracy(),
                results.results.len()
            );
            evaluation.add_file(results);
        }

        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::BorrowMut;
    use std::collections::HashMap;
    use std::fs;

    use approx::assert_relative_eq;
    use failure::Fallible;

    use super::{Evaluation, Evaluator, FileResults, SentenceResult};
    use crate::config::FileConfig;
    use crate::{Sentence, Tag};

    /// Tags every token with a fixed tag, except for words in a lookup
    /// table.
    struct LookupTagger {
        tags: HashMap<String, String>,
    }

    impl LookupTagger {
        fn new(tags: &[(&str, &str)]) -> Self {
            LookupTagger {
                tags: tags
                    .iter()
                    .map(|&(word, tag)| (word.to_owned(), tag.to_owned()))
                    .collect(),
            }
        }
    }

    impl Tag for LookupTagger {
        fn tag_sentences(&self, sentences: &mut [impl BorrowMut<Sentence>]) -> Fallible<()> {
            for sentence in sentences {
                let sentence: &mut Sentence = sentence.borrow_mut();
                let next_words: Vec<Option<String>> = (0..sentence.len())
                    .map(|idx| sentence.get(idx + 1).map(|t| t.form().to_lowercase()))
                    .collect();

                for (token, next) in sentence.iter_mut().zip(next_words) {
                    let key = format!(
                        "{} {}",
                        token.form().to_lowercase(),
                        next.unwrap_or_default()
                    );
                    let tag = self
                        .tags
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(|| "NN".to_owned());
                    token.set_tag(Some(tag));
                }
            }

            Ok(())
        }
    }

    fn tagger() -> LookupTagger {
        LookupTagger::new(&[("that dog", "DT"), ("that he", "IN"), ("that cold", "RB")])
    }

    fn file_config(id: &str, label: &str) -> FileConfig {
        FileConfig {
            id: id.to_owned(),
            expected_label: label.to_owned(),
            filename: format!("{}.txt", id),
        }
    }

    #[test]
    fn predicts_first_occurrence() {
        let tagger = tagger();
        let evaluator = Evaluator::new(&tagger, "that", 2);
        let sentences = vec![
            "That dog barks.".to_owned(),
            "I knew that he left that dog.".to_owned(),
            "No target here.".to_owned(),
        ];

        let mut progress = Vec::new();
        let predictions = evaluator
            .predict(&sentences, |n| progress.push(n))
            .unwrap();

        assert_eq!(
            predictions,
            vec![Some("DT".to_owned()), Some("IN".to_owned()), None]
        );
        assert_eq!(progress, vec![2, 1]);
    }

    #[test]
    fn predicts_target_before_clitic() {
        let tagger = LookupTagger::new(&[("that 's", "WPR"), ("that \u{2019}s", "WPR")]);
        let evaluator = Evaluator::new(&tagger, "that", 8);
        let sentences = vec![
            "That's the book I wanted.".to_owned(),
            "I know that\u{2019}s true.".to_owned(),
        ];

        let predictions = evaluator.predict(&sentences, |_| ()).unwrap();
        assert_eq!(
            predictions,
            vec![Some("WPR".to_owned()), Some("WPR".to_owned())]
        );
    }

    #[test]
    fn file_accuracy() {
        let results = FileResults {
            id: "that_adv".to_owned(),
            expected_label: "RB".to_owned(),
            results: vec![
                SentenceResult {
                    sentence: "It was that cold.".to_owned(),
                    expected: "RB".to_owned(),
                    predicted: Some("RB".to_owned()),
                },
                SentenceResult {
                    sentence: "Not that.".to_owned(),
                    expected: "RB".to_owned(),
                    predicted: None,
                },
            ],
        };

        assert_eq!(results.correct(), 1);
        assert_relative_eq!(results.accuracy(), 50.);

        let empty = FileResults {
            results: Vec::new(),
            ..results
        };
        assert_relative_eq!(empty.accuracy(), 0.);
    }

    #[test]
    fn evaluate_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("that_adv.txt"),
            "It was that cold.\n\nThat dog is not that cold.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("that_conjunction.txt"),
            "She said that he left.\nHe knew that dog.\nNothing.\n",
        )
        .unwrap();

        let files = vec![
            file_config("that_adv", "RB"),
            file_config("that_missing", "WDT"),
            file_config("that_conjunction", "IN"),
        ];

        let tagger = tagger();
        let evaluator = Evaluator::new(&tagger, "that", 256);
        let mut seen = Vec::new();
        let evaluation = evaluator
            .evaluate(&files, dir.path(), |id, n| seen.push((id.to_owned(), n)))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                ("that_adv".to_owned(), 2),
                ("that_conjunction".to_owned(), 3)
            ]
        );

        let found: Vec<_> = evaluation.files().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(found, vec!["that_adv", "that_conjunction"]);
        assert_relative_eq!(evaluation.files()[0].accuracy(), 50.);
        assert_relative_eq!(evaluation.files()[1].accuracy(), 100. / 3.);

        let per_file = evaluation.per_file();
        assert_eq!(
            per_file.rows(),
            &["that_adv", "that_missing", "that_conjunction"]
        );
        assert_eq!(per_file.sorted_columns(), vec!["DT", "IN", "None", "RB"]);
        assert_eq!(per_file.count("that_adv", "DT"), 1);
        assert_eq!(per_file.count("that_conjunction", "None"), 1);

        let labels = evaluation.labels();
        assert_eq!(labels.sorted_rows(), vec!["IN", "RB"]);
        assert_eq!(labels.count("IN", "DT"), 1);
        assert_eq!(labels.count("RB", "RB"), 1);

        let report = evaluation.classification_report();
        assert_relative_eq!(report.accuracy(), 2. / 5.);
    }

    #[test]
    fn empty_evaluation() {
        let evaluation = Evaluation::new();
        assert!(evaluation.files().is_empty());
        assert!(evaluation.per_file().rows().is_empty());
        assert_relative_eq!(evaluation.classification_report().accuracy(), 0.);
    }
}
