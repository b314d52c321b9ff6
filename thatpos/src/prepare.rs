//! Training data for TreeTagger.
//!
//! Plain sentences are tagged with an existing tagger, the tags are
//! mapped to the training tagset and the tag of the target word is
//! replaced by the tag of the use that the input file exemplifies.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use failure::{Fallible, ResultExt};
use log::info;

use crate::config::{PrepareConfig, TrainFile};
use crate::errors::TaggerError;
use crate::io::{read_plain_sentences, WriteSentence, Writer};
use crate::lemma::Lemmatize;
use crate::lexicon::{write_open_class, Lexicon};
use crate::tagset::TagMap;
use crate::tokenizer::sentence_from_text;
use crate::{Sentence, Tag};

/// File with the open class tags.
pub static OPEN_CLASS_FILE: &str = "openCLs.txt";

/// File with the lexicon.
pub static LEXICON_FILE: &str = "lexicon.txt";

/// Concatenation of all formatted training files.
pub static TRAIN_FILE: &str = "train.txt";

/// Builds training data from plain sentences.
pub struct TrainingDataBuilder<'a, T, L> {
    tagger: &'a T,
    lemmatizer: &'a L,
    tag_map: TagMap,
    target: String,
    batch_size: usize,
}

impl<'a, T, L> TrainingDataBuilder<'a, T, L>
where
    T: Tag,
    L: Lemmatize,
{
    pub fn new(
        tagger: &'a T,
        lemmatizer: &'a L,
        tag_map: TagMap,
        target: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        assert!(batch_size > 0, "Batch size should at least be 1.");

        TrainingDataBuilder {
            tagger,
            lemmatizer,
            tag_map,
            target: target.into(),
            batch_size,
        }
    }

    /// Tag sentences for training.
    ///
    /// Every token gets the mapped tag, or `target_tag` if it is the
    /// target word, and a lemma.
    pub fn annotate<F>(
        &self,
        sentences: &[String],
        target_tag: &str,
        mut progress: F,
    ) -> Fallible<Vec<Sentence>>
    where
        F: FnMut(usize),
    {
        let mut annotated = Vec::with_capacity(sentences.len());

        for batch in sentences.chunks(self.batch_size) {
            let mut tokenized: Vec<Sentence> =
                batch.iter().map(|s| sentence_from_text(s)).collect();
            self.tagger.tag_sentences(&mut tokenized)?;

            for sentence in &mut tokenized {
                self.relabel(sentence, target_tag)?;
            }

            annotated.extend(tokenized);
            progress(batch.len());
        }

        Ok(annotated)
    }

    fn relabel(&self, sentence: &mut Sentence, target_tag: &str) -> Fallible<()> {
        for token in sentence.iter_mut() {
            let tag = if token.is_word(&self.target) {
                target_tag.to_owned()
            } else {
                let tag = token.tag().ok_or_else(|| TaggerError::MissingTag {
                    form: token.form().to_owned(),
                })?;
                self.tag_map.map(tag).to_owned()
            };

            let lemma = self
                .lemmatizer
                .lemmatize(token.form(), &tag, token.lemma());
            token.set_tag(Some(tag));
            token.set_lemma(Some(lemma));
        }

        Ok(())
    }

    /// Annotate a training file and write it in the vertical format.
    ///
    /// The annotated tokens are added to `lexicon`. Returns the number
    /// of sentences.
    pub fn build_file<W, F>(
        &self,
        sentences: &[String],
        target_tag: &str,
        writer: &mut W,
        lexicon: &mut Lexicon,
        progress: F,
    ) -> Fallible<usize>
    where
        W: WriteSentence,
        F: FnMut(usize),
    {
        let annotated = self.annotate(sentences, target_tag, progress)?;
        for sentence in &annotated {
            writer.write_sentence(sentence)?;
            lexicon.add_sentence(sentence);
        }

        Ok(annotated.len())
    }

    /// Build all training files of a configuration.
    ///
    /// Writes the formatted files, the open class tags, the lexicon and
    /// the concatenated training file to the output directory. Returns
    /// the lexicon. `progress` is called with the input file name and
    /// the number of sentences processed.
    pub fn build<F>(&self, config: &PrepareConfig, mut progress: F) -> Fallible<Lexicon>
    where
        F: FnMut(&str, usize),
    {
        let output_dir = Path::new(&config.output_dir);
        fs::create_dir_all(output_dir).with_context(|_| {
            format!(
                "Cannot create output directory '{}'",
                output_dir.display()
            )
        })?;

        let mut lexicon = Lexicon::new();
        let mut formatted = Vec::with_capacity(config.files.len());

        for file in &config.files {
            let output = self.build_train_file(config, file, &mut lexicon, &mut progress)?;
            formatted.push(output);
        }

        let mut open_class = create(&output_dir.join(OPEN_CLASS_FILE))?;
        write_open_class(lexicon.tags(), &mut open_class)?;
        open_class.flush()?;

        let mut lexicon_write = create(&output_dir.join(LEXICON_FILE))?;
        lexicon.write(&mut lexicon_write)?;
        lexicon_write.flush()?;

        concatenate(&formatted, &output_dir.join(TRAIN_FILE))?;

        info!(
            "Wrote training data for {} files, lexicon with {} words",
            formatted.len(),
            lexicon.len()
        );

        Ok(lexicon)
    }

    fn build_train_file<F>(
        &self,
        config: &PrepareConfig,
        file: &TrainFile,
        lexicon: &mut Lexicon,
        progress: &mut F,
    ) -> Fallible<PathBuf>
    where
        F: FnMut(&str, usize),
    {
        let input = Path::new(&config.input_dir).join(&file.input);
        let output = Path::new(&config.output_dir).join(&file.output);

        let read = File::open(&input)
            .with_context(|_| format!("Cannot open training file '{}'", input.display()))?;
        let sentences = read_plain_sentences(BufReader::new(read))?;

        let mut writer = Writer::new(create(&output)?);
        let n_sentences = self.build_file(
            &sentences,
            &file.target_tag,
            &mut writer,
            lexicon,
            |n| progress(&file.input, n),
        )?;
        writer.into_inner().flush()?;

        info!(
            "{}: {} sentences, '{}' tagged as {}",
            file.input, n_sentences, self.target, file.target_tag
        );

        Ok(output)
    }
}

fn create(path: &Path) -> Fallible<BufWriter<File>> {
    let file =
        File::create(path).with_context(|_| format!("Cannot create '{}'", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Concatenate files.
///
/// Every formatted file ends with an empty line, so the sentences of
/// consecutive files stay separated.
fn concatenate(inputs: &[PathBuf], output: &Path) -> Fallible<()> {
    let mut write = create(output)?;
    for input in inputs {
        let mut read = File::open(input)
            .with_context(|_| format!("Cannot open '{}'", input.display()))?;
        std::io::copy(&mut read, &mut write)?;
    }
    write.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::borrow::BorrowMut;
    use std::collections::BTreeMap;
    use std::fs;

    use failure::Fallible;

    use super::TrainingDataBuilder;
    use crate::config::{PrepareConfig, TrainFile};
    use crate::io::Writer;
    use crate::lemma::LemmaTable;
    use crate::lexicon::Lexicon;
    use crate::tagset::TagMap;
    use crate::{Sentence, Tag};

    /// Tags with a Penn tag derived from the word shape.
    struct ShapeTagger;

    impl Tag for ShapeTagger {
        fn tag_sentences(&self, sentences: &mut [impl BorrowMut<Sentence>]) -> Fallible<()> {
            for sentence in sentences {
                let sentence: &mut Sentence = sentence.borrow_mut();
                for token in sentence.iter_mut() {
                    let form = token.form().to_owned();
                    let (tag, lemma) = if form.chars().all(|c| c.is_ascii_punctuation()) {
                        (".", form.clone())
                    } else if form.ends_with("ed") {
                        ("VBD", form.trim_end_matches("ed").to_owned())
                    } else if form.ends_with('s') {
                        ("NNS", form.trim_end_matches('s').to_owned())
                    } else {
                        ("DT", "<unknown>".to_owned())
                    };
                    token.set_tag(Some(tag.to_owned()));
                    token.set_lemma(Some(lemma));
                }
            }

            Ok(())
        }
    }

    struct Untagger;

    impl Tag for Untagger {
        fn tag_sentences(&self, _sentences: &mut [impl BorrowMut<Sentence>]) -> Fallible<()> {
            Ok(())
        }
    }

    #[test]
    fn annotate_overrides_target() {
        let lemmas = LemmaTable::new();
        let builder =
            TrainingDataBuilder::new(&ShapeTagger, &lemmas, TagMap::penn_to_claws(), "that", 1);

        let mut seen = Vec::new();
        let sentences = builder
            .annotate(
                &["That dogs barked.".to_owned(), "THAT".to_owned()],
                "DD1",
                |n| seen.push(n),
            )
            .unwrap();

        assert_eq!(seen, vec![1, 1]);
        let annotations: Vec<_> = sentences[0]
            .iter()
            .map(|t| (t.form(), t.tag().unwrap(), t.lemma().unwrap()))
            .collect();
        assert_eq!(
            annotations,
            vec![
                ("That", "DD1", "that"),
                ("dogs", "NN2", "dog"),
                ("barked", "VVD", "bark"),
                (".", ".", "."),
            ]
        );
        assert_eq!(sentences[1][0].tag(), Some("DD1"));
    }

    #[test]
    fn annotate_target_before_clitic() {
        let lemmas = LemmaTable::new();
        let builder =
            TrainingDataBuilder::new(&ShapeTagger, &lemmas, TagMap::penn_to_claws(), "that", 8);

        let sentences = builder
            .annotate(&["That's true".to_owned()], "WPR", |_| ())
            .unwrap();
        let tags: Vec<_> = sentences[0]
            .iter()
            .map(|t| (t.form(), t.tag().unwrap()))
            .collect();
        assert_eq!(tags, vec![("That", "WPR"), ("'s", "NN2"), ("true", "AT0")]);
    }

    #[test]
    fn missing_tag_is_an_error() {
        let lemmas = LemmaTable::new();
        let builder = TrainingDataBuilder::new(&Untagger, &lemmas, TagMap::new(), "that", 8);
        assert!(builder
            .annotate(&["That dog".to_owned()], "DD1", |_| ())
            .is_err());
    }

    #[test]
    fn build_file() {
        let lemmas = LemmaTable::new();
        let builder =
            TrainingDataBuilder::new(&ShapeTagger, &lemmas, TagMap::penn_to_claws(), "that", 4);

        let mut writer = Writer::new(Vec::new());
        let mut lexicon = Lexicon::new();
        let n = builder
            .build_file(
                &["that dogs".to_owned()],
                "CJT",
                &mut writer,
                &mut lexicon,
                |_| (),
            )
            .unwrap();

        assert_eq!(n, 1);
        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "that\tCJT\ndogs\tNN2\n\n"
        );
        assert_eq!(lexicon.len(), 2);
    }

    #[test]
    fn build_training_data() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("Train");
        let output_dir = dir.path().join("Training");
        fs::create_dir(&input_dir).unwrap();
        fs::write(input_dir.join("that_as_adverb.txt"), "that far\n\n").unwrap();
        fs::write(input_dir.join("that_pronoun.txt"), "Dogs did that.\n").unwrap();

        let config = PrepareConfig {
            input_dir: input_dir.to_string_lossy().into_owned(),
            output_dir: output_dir.to_string_lossy().into_owned(),
            target: "that".to_owned(),
            lemmas: None,
            tag_map: BTreeMap::new(),
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
        };

        let lemmas = LemmaTable::new();
        let builder = TrainingDataBuilder::new(&ShapeTagger, &lemmas, config.tag_map(), "that", 8);
        let mut seen = Vec::new();
        let lexicon = builder
            .build(&config, |file, n| seen.push((file.to_owned(), n)))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                ("that_as_adverb.txt".to_owned(), 1),
                ("that_pronoun.txt".to_owned(), 1)
            ]
        );
        assert_eq!(lexicon.len(), 5);

        let read = |name: &str| fs::read_to_string(output_dir.join(name)).unwrap();
        assert_eq!(read("adverb_formatted.txt"), "that\tRA\nfar\tAT0\n\n");
        assert_eq!(
            read("pronoun_formatted.txt"),
            "Dogs\tNN2\ndid\tAT0\nthat\tWPR\n.\t.\n\n"
        );
        assert_eq!(read("openCLs.txt"), ". AT0 NN2 RA WPR");
        assert_eq!(
            read("train.txt"),
            "that\tRA\nfar\tAT0\n\nDogs\tNN2\ndid\tAT0\nthat\tWPR\n.\t.\n\n"
        );
        assert_eq!(
            read("lexicon.txt"),
            ".\t.\t.\n\
             did\tAT0\tdid\n\
             Dogs\tNN2\tdog\n\
             far\tAT0\tfar\n\
             that\tRA\tthat\tWPR\tthat\n\
             .\tSENT\t.\n"
        );
    }

    #[test]
    fn missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PrepareConfig {
            input_dir: dir.path().to_string_lossy().into_owned(),
            output_dir: dir.path().join("out").to_string_lossy().into_owned(),
            target: "that".to_owned(),
            lemmas: None,
            tag_map: BTreeMap::new(),
            replace_tag_map: false,
            files: vec![TrainFile {
                input: "missing.txt".to_owned(),
                output: "missing_formatted.txt".to_owned(),
                target_tag: "CJT".to_owned(),
            }],
        };

        let lemmas = LemmaTable::new();
        let builder = TrainingDataBuilder::new(&ShapeTagger, &lemmas, config.tag_map(), "that", 8);
        assert!(builder.build(&config, |_, _| ()).is_err());
    }
}
