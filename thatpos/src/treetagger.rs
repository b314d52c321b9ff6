//! TreeTagger driver.
//!
//! Sentences are tagged by running the TreeTagger binary on a batch of
//! pre-tokenized sentences. Sentences are separated by an SGML marker
//! line, which TreeTagger copies to its output unchanged when it runs
//! with `-sgml`.

use std::borrow::BorrowMut;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use failure::{format_err, Fallible, ResultExt};
use log::debug;

use crate::config::TaggerConfig;
use crate::errors::TaggerError;
use crate::tagset::main_tag;
use crate::{Sentence, Tag};

/// Marker line between sentences in the tagger input and output.
pub static SENTENCE_MARKER: &str = "<thatpos-sentence/>";

/// Arguments passed before the parameter file by default.
pub fn default_args() -> Vec<String> {
    ["-token", "-lemma", "-sgml", "-no-unknown"]
        .iter()
        .map(|&arg| arg.to_owned())
        .collect()
}

/// TreeTagger wrapper.
#[derive(Clone, Debug)]
pub struct TreeTagger {
    binary: PathBuf,
    parameters: PathBuf,
    args: Vec<String>,
    strip_tag_details: bool,
}

impl TreeTagger {
    /// Construct a tagger with the default arguments.
    pub fn new(binary: impl Into<PathBuf>, parameters: impl Into<PathBuf>) -> Self {
        TreeTagger {
            binary: binary.into(),
            parameters: parameters.into(),
            args: default_args(),
            strip_tag_details: false,
        }
    }

    /// Construct a tagger from its configuration.
    pub fn from_config(config: &TaggerConfig) -> Self {
        TreeTagger {
            binary: config.binary.clone().into(),
            parameters: config.parameters.clone().into(),
            args: config.args.clone(),
            strip_tag_details: config.strip_tag_details,
        }
    }

    /// Use another parameter (model) file.
    pub fn with_parameters(mut self, parameters: impl Into<PathBuf>) -> Self {
        self.parameters = parameters.into();
        self
    }

    /// Replace the arguments passed before the parameter file.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Strip tag details after a slash, e.g. `IN/that` becomes `IN`.
    pub fn strip_tag_details(mut self, strip: bool) -> Self {
        self.strip_tag_details = strip;
        self
    }

    pub fn parameters(&self) -> &Path {
        &self.parameters
    }

    fn run(&self, input: String) -> Fallible<String> {
        debug!(
            "Running {} with {}",
            self.binary.display(),
            self.parameters.display()
        );

        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .arg(&self.parameters)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|_| format!("Cannot start tagger '{}'", self.binary.display()))?;

        // Feed the input from another thread, the tagger may fill the
        // output pipe before it has consumed all input.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| format_err!("Cannot open tagger input"))?;
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| format_err!("Tagger input thread panicked"))?;

        if !output.status.success() {
            return Err(TaggerError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            }
            .into());
        }

        written.context("Cannot write tagger input")?;

        Ok(String::from_utf8(output.stdout)?)
    }
}

impl Tag for TreeTagger {
    fn tag_sentences(&self, sentences: &mut [impl BorrowMut<Sentence>]) -> Fallible<()> {
        if sentences.is_empty() {
            return Ok(());
        }

        let input = tagger_input(&*sentences);
        let output = self.run(input)?;
        apply_tagger_output(&output, sentences, self.strip_tag_details)
    }
}

/// Build the tagger input: one token per line, a marker after every
/// sentence.
pub fn tagger_input(sentences: &[impl BorrowMut<Sentence>]) -> String {
    let mut input = String::new();
    for sentence in sentences {
        let sentence: &Sentence = sentence.borrow();
        for token in sentence.iter() {
            input.push_str(token.form());
            input.push('\n');
        }
        input.push_str(SENTENCE_MARKER);
        input.push('\n');
    }

    input
}

/// Copy tags and lemmas from tagger output to the sentences.
///
/// The output has `form<TAB>tag[<TAB>lemma]` lines and the sentence
/// markers of the input.
pub fn apply_tagger_output(
    output: &str,
    sentences: &mut [impl BorrowMut<Sentence>],
    strip_tag_details: bool,
) -> Fallible<()> {
    let mut tagged = Vec::with_capacity(sentences.len());
    let mut current = Vec::new();

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim() == SENTENCE_MARKER {
            tagged.push(std::mem::replace(&mut current, Vec::new()));
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let tag = fields
            .nth(1)
            .filter(|tag| !tag.is_empty())
            .ok_or_else(|| TaggerError::MalformedOutput {
                line: line.to_owned(),
            })?;
        let lemma = fields.next();

        let tag = if strip_tag_details { main_tag(tag) } else { tag };
        current.push((tag.to_owned(), lemma.map(ToOwned::to_owned)));
    }

    if tagged.len() != sentences.len() {
        return Err(TaggerError::SentenceCountMismatch {
            expected: sentences.len(),
            returned: tagged.len(),
        }
        .into());
    }

    for (idx, (sentence, annotations)) in sentences.iter_mut().zip(tagged).enumerate() {
        let sentence: &mut Sentence = sentence.borrow_mut();
        if sentence.len() != annotations.len() {
            return Err(TaggerError::TokenCountMismatch {
                sentence: idx,
                expected: sentence.len(),
                returned: annotations.len(),
            }
            .into());
        }

        for (token, (tag, lemma)) in sentence.iter_mut().zip(annotations) {
            token.set_tag(Some(tag));
            token.set_lemma(lemma);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{apply_tagger_output, tagger_input, TreeTagger, SENTENCE_MARKER};
    use crate::errors::TaggerError;
    use crate::tokenizer::sentence_from_text;
    use crate::{Sentence, Tag};

    /// Tags every token as NN with the form as its lemma and copies
    /// sentence markers.
    static ECHO_TAGGER: &str = r#"while IFS= read -r line; do
  case "$line" in
    "<thatpos-sentence/>") printf '%s\n' "$line" ;;
    *) printf '%s\tNN\t%s\n' "$line" "$line" ;;
  esac
done
"#;

    static FAILING_TAGGER: &str = "echo 'cannot open parameter file' >&2\nexit 1\n";

    /// A tagger that runs a shell script. The script gets the parameter
    /// file as its argument.
    fn script_tagger(dir: &Path, script: &str) -> TreeTagger {
        let path: PathBuf = dir.join("tree-tagger.sh");
        fs::write(&path, script).unwrap();
        TreeTagger::new("/bin/sh", "english.par")
            .with_args(vec![path.to_string_lossy().into_owned()])
    }

    fn sentences() -> Vec<Sentence> {
        vec![
            sentence_from_text("I know that ."),
            sentence_from_text("That dog"),
        ]
    }

    #[test]
    fn input_has_markers() {
        assert_eq!(
            tagger_input(&sentences()),
            format!(
                "I\nknow\nthat\n.\n{m}\nThat\ndog\n{m}\n",
                m = SENTENCE_MARKER
            )
        );
    }

    #[test]
    fn output_is_applied() {
        let output = format!(
            "I\tPP\tI\nknow\tVVP\tknow\nthat\tIN/that\tthat\n.\tSENT\t.\n{m}\n\
             That\tDT\tthat\ndog\tNN\tdog\n{m}\n",
            m = SENTENCE_MARKER
        );

        let mut sentences = sentences();
        apply_tagger_output(&output, &mut sentences, true).unwrap();

        let tags: Vec<_> = sentences[0].iter().map(|t| t.tag().unwrap()).collect();
        assert_eq!(tags, vec!["PP", "VVP", "IN", "SENT"]);
        assert_eq!(sentences[1][1].lemma(), Some("dog"));
        assert_eq!(sentences[1].find_word("that").unwrap().tag(), Some("DT"));
    }

    #[test]
    fn keeps_tag_details() {
        let output = format!("that\tIN/that\n{}\n", SENTENCE_MARKER);
        let mut sentences = vec![sentence_from_text("that")];
        apply_tagger_output(&output, &mut sentences, false).unwrap();
        assert_eq!(sentences[0][0].tag(), Some("IN/that"));
        assert_eq!(sentences[0][0].lemma(), None);
    }

    #[test]
    fn count_mismatches() {
        let mut sentences = sentences();
        let missing_sentence = format!("I\tPP\tI\n{}\n", SENTENCE_MARKER);
        assert!(apply_tagger_output(&missing_sentence, &mut sentences, false).is_err());

        let missing_token = format!("I\tPP\tI\n{m}\nThat\tDT\tthat\n{m}\n", m = SENTENCE_MARKER);
        let mut sentences = vec![sentence_from_text("I"), sentence_from_text("That dog")];
        assert!(apply_tagger_output(&missing_token, &mut sentences, false).is_err());
    }

    #[test]
    fn malformed_output() {
        let mut sentences = vec![sentence_from_text("that")];
        let output = format!("that\n{}\n", SENTENCE_MARKER);
        assert!(apply_tagger_output(&output, &mut sentences, false).is_err());
    }

    #[test]
    fn missing_binary() {
        let tagger = TreeTagger::new("/nonexistent/tree-tagger", "english.par");
        let mut sentences = sentences();
        assert!(tagger.tag_sentences(&mut sentences).is_err());
    }

    #[test]
    fn no_sentences() {
        let tagger = TreeTagger::new("/nonexistent/tree-tagger", "english.par");
        let mut sentences: Vec<Sentence> = Vec::new();
        assert!(tagger.tag_sentences(&mut sentences).is_ok());
    }

    #[test]
    fn tags_through_process() {
        let dir = tempfile::tempdir().unwrap();
        let tagger = script_tagger(dir.path(), ECHO_TAGGER);

        let mut sentences = sentences();
        tagger.tag_sentences(&mut sentences).unwrap();

        let tags: Vec<_> = sentences[0].iter().map(|t| t.tag().unwrap()).collect();
        assert_eq!(tags, vec!["NN", "NN", "NN", "NN"]);
        assert_eq!(sentences[1][0].lemma(), Some("That"));
    }

    #[test]
    fn tags_large_batch() {
        let dir = tempfile::tempdir().unwrap();
        let tagger = script_tagger(dir.path(), ECHO_TAGGER);

        let mut sentences: Vec<Sentence> = (0..5000)
            .map(|idx| sentence_from_text(&format!("Sentence {} says that it works.", idx)))
            .collect();
        tagger.tag_sentences(&mut sentences).unwrap();

        assert!(sentences
            .iter()
            .all(|sentence| sentence.iter().all(|token| token.tag() == Some("NN"))));
        assert_eq!(sentences[4999][1].lemma(), Some("4999"));
    }

    #[test]
    fn failing_process() {
        let dir = tempfile::tempdir().unwrap();
        let tagger = script_tagger(dir.path(), FAILING_TAGGER);

        let err = tagger.tag_sentences(&mut sentences()).unwrap_err();
        match err.downcast_ref::<TaggerError>() {
            Some(TaggerError::ExitStatus { stderr, .. }) => {
                assert_eq!(stderr, "cannot open parameter file")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
