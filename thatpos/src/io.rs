//! Corpus formats.
//!
//! Tagged corpora use the vertical format that TreeTagger is trained
//! on: one token per line, with the form, the tag and optionally the
//! lemma separated by whitespace. Every sentence is followed by an
//! empty line.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use failure::{Error, Fallible};
use log::warn;

use crate::errors::FormatError;
use crate::{Sentence, Token};

/// Read sentences from a corpus.
pub trait ReadSentence {
    /// Read the next sentence, `None` at the end of the input.
    fn read_sentence(&mut self) -> Fallible<Option<Sentence>>;

    /// Iterate over the remaining sentences.
    fn sentences(self) -> Sentences<Self>
    where
        Self: Sized,
    {
        Sentences { reader: self }
    }
}

/// Iterator over the sentences of a `ReadSentence`.
pub struct Sentences<R> {
    reader: R,
}

impl<R> Iterator for Sentences<R>
where
    R: ReadSentence,
{
    type Item = Result<Sentence, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_sentence().transpose()
    }
}

/// Reader for the vertical format.
///
/// Runs of empty lines and a missing empty line after the last
/// sentence are accepted. A line with only a form gives an untagged
/// token.
pub struct Reader<R> {
    read: R,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(read: R) -> Self {
        Reader { read }
    }
}

impl<R> ReadSentence for Reader<R>
where
    R: BufRead,
{
    fn read_sentence(&mut self) -> Fallible<Option<Sentence>> {
        let mut sentence = Sentence::new();
        let mut line = String::new();

        loop {
            line.clear();
            if self.read.read_line(&mut line)? == 0 {
                break;
            }

            let mut fields = line.split_whitespace();
            let form = match fields.next() {
                Some(form) => form,
                None if sentence.is_empty() => continue,
                None => break,
            };

            let mut token = Token::new(form);
            token.set_tag(fields.next().map(ToOwned::to_owned));
            token.set_lemma(fields.next().map(ToOwned::to_owned));
            sentence.push(token);
        }

        if sentence.is_empty() {
            Ok(None)
        } else {
            Ok(Some(sentence))
        }
    }
}

/// Write sentences to a corpus.
pub trait WriteSentence {
    fn write_sentence(&mut self, sentence: &Sentence) -> Fallible<()>;
}

/// Writer for the vertical format.
pub struct Writer<W> {
    write: W,
    lemmas: bool,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Construct a writer for `form<TAB>tag` lines.
    pub fn new(write: W) -> Self {
        Writer {
            write,
            lemmas: false,
        }
    }

    /// Construct a writer for `form<TAB>tag<TAB>lemma` lines.
    pub fn with_lemmas(write: W) -> Self {
        Writer {
            write,
            lemmas: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<W> WriteSentence for Writer<W>
where
    W: Write,
{
    fn write_sentence(&mut self, sentence: &Sentence) -> Fallible<()> {
        for token in sentence.iter() {
            write!(self.write, "{}", token.form())?;
            if let Some(tag) = token.tag() {
                write!(self.write, "\t{}", tag)?;
            }
            if self.lemmas {
                if let Some(lemma) = token.lemma() {
                    write!(self.write, "\t{}", lemma)?;
                }
            }
            writeln!(self.write)?;
        }

        writeln!(self.write)?;

        Ok(())
    }
}

/// Summary of a pair-line conversion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReformatSummary {
    pub sentences: usize,
    pub skipped: usize,
}

/// Convert pair-line sentences to the vertical format.
///
/// Every input line is a sentence `tok tag tok tag ...`. Empty lines are
/// ignored, lines with an odd number of fields are skipped.
pub fn reformat_pairs<R, W>(read: R, writer: &mut W) -> Fallible<ReformatSummary>
where
    R: BufRead,
    W: WriteSentence,
{
    let mut summary = ReformatSummary::default();

    for line in read.lines() {
        let line = line?;
        let fields: Vec<_> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        if fields.len() % 2 != 0 {
            warn!(
                "Skipping malformed line (odd number of elements): {}",
                line.trim()
            );
            summary.skipped += 1;
            continue;
        }

        let sentence: Sentence = fields
            .chunks(2)
            .map(|pair| Token::with_tag(pair[0], pair[1]))
            .collect::<Vec<_>>()
            .into();
        writer.write_sentence(&sentence)?;
        summary.sentences += 1;
    }

    Ok(summary)
}

/// Read plain sentences, one per non-empty line.
pub fn read_plain_sentences<R>(read: R) -> Fallible<Vec<String>>
where
    R: BufRead,
{
    let mut sentences = Vec::new();
    for line in read.lines() {
        let line = line?;
        let sentence = line.trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_owned());
        }
    }

    Ok(sentences)
}

/// Output path of a reformatted corpus file.
///
/// `.txt` in the file name of `input` is replaced by `_formatted.txt`
/// and the result is placed in `output_dir`.
pub fn formatted_file_name(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Fallible<PathBuf> {
    let input = input.as_ref();
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| FormatError::InvalidFileName {
            path: input.to_string_lossy().into_owned(),
        })?;

    Ok(output_dir
        .as_ref()
        .join(file_name.replace(".txt", "_formatted.txt")))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::{
        formatted_file_name, read_plain_sentences, reformat_pairs, ReadSentence, Reader,
        ReformatSummary, WriteSentence, Writer,
    };
    use crate::{Sentence, Token};

    fn forms_tags(sentence: &Sentence) -> Vec<(&str, Option<&str>)> {
        sentence.iter().map(|t| (t.form(), t.tag())).collect()
    }

    #[test]
    fn read_vertical() {
        let data = "\n\nThat\tDD1\nis\tVBZ\n\n\n\nso\tRG\nthat\tRA\tthat\n";
        let sentences = Reader::new(Cursor::new(data))
            .sentences()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(
            forms_tags(&sentences[0]),
            vec![("That", Some("DD1")), ("is", Some("VBZ"))]
        );
        assert_eq!(
            forms_tags(&sentences[1]),
            vec![("so", Some("RG")), ("that", Some("RA"))]
        );
        assert_eq!(sentences[1][1].lemma(), Some("that"));
    }

    #[test]
    fn read_untagged_line() {
        let mut reader = Reader::new(Cursor::new("lonely\n"));
        let sentence = reader.read_sentence().unwrap().unwrap();
        assert_eq!(forms_tags(&sentence), vec![("lonely", None)]);
        assert!(reader.read_sentence().unwrap().is_none());
    }

    #[test]
    fn write_vertical() {
        let sentence: Sentence = vec![
            Token::with_tag("that", "CJT"),
            Token::with_tag(".", "SENT"),
        ]
        .into();

        let mut writer = Writer::new(Vec::new());
        writer.write_sentence(&sentence).unwrap();
        writer.write_sentence(&sentence).unwrap();

        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "that\tCJT\n.\tSENT\n\nthat\tCJT\n.\tSENT\n\n"
        );
    }

    #[test]
    fn write_lemmas() {
        let mut token = Token::with_tag("said", "VVD");
        token.set_lemma(Some("say".to_owned()));
        let sentence: Sentence = vec![token, Token::new("x")].into();

        let mut writer = Writer::with_lemmas(Vec::new());
        writer.write_sentence(&sentence).unwrap();

        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "said\tVVD\tsay\nx\n\n"
        );
    }

    #[test]
    fn reformat_skips_malformed_lines() {
        let input = "That DD1 dog NN1\n\nthat CJT odd\nso RG that RA\n";
        let mut writer = Writer::new(Vec::new());
        let summary = reformat_pairs(Cursor::new(input), &mut writer).unwrap();

        assert_eq!(
            summary,
            ReformatSummary {
                sentences: 2,
                skipped: 1
            }
        );
        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "That\tDD1\ndog\tNN1\n\nso\tRG\nthat\tRA\n\n"
        );
    }

    #[test]
    fn plain_sentences() {
        let input = "  First sentence.  \n\n \t\nSecond one\n";
        assert_eq!(
            read_plain_sentences(Cursor::new(input)).unwrap(),
            vec!["First sentence.", "Second one"]
        );
    }

    #[test]
    fn formatted_name() {
        assert_eq!(
            formatted_file_name("dataset/claws8/adverb.txt", "out").unwrap(),
            PathBuf::from("out/adverb_formatted.txt")
        );
        assert!(formatted_file_name("..", "out").is_err());
    }
}
