//! Tag lexicons.
//!
//! A lexicon maps every word form to the set of (tag, lemma) pairs it
//! was observed with. The serialized form is TreeTagger's lexicon
//! format: `word<TAB>tag<TAB>lemma[<TAB>tag<TAB>lemma]...`.

use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, Write};

use failure::Fallible;
use itertools::Itertools;
use log::warn;

use crate::errors::FormatError;
use crate::lemma::Lemmatize;
use crate::Sentence;

/// Line appended to every written lexicon, the entry for the sentence
/// boundary tag.
pub static SENTENCE_END_ENTRY: &str = ".\tSENT\t.";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Lexicon {
    entries: HashMap<String, BTreeSet<(String, String)>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Lexicon::default()
    }

    /// Read a lexicon.
    ///
    /// Fields are separated by tabs or spaces. The sentence boundary
    /// entry is skipped.
    pub fn from_buf_read<R>(read: R) -> Fallible<Self>
    where
        R: BufRead,
    {
        let mut lexicon = Lexicon::new();

        for line in read.lines() {
            let line = line?;
            let fields: Vec<_> = line.split_whitespace().collect();
            let (word, pairs) = match fields.split_first() {
                Some((&word, pairs)) => (word, pairs),
                None => continue,
            };

            if word == "." && pairs == ["SENT", "."] {
                continue;
            }

            if pairs.is_empty() {
                warn!("Lexicon entry without tags: '{}'", line.trim());
                continue;
            }

            if pairs.len() % 2 != 0 {
                return Err(FormatError::IncompleteLexiconEntry {
                    line: line.trim().to_owned(),
                }
                .into());
            }

            for pair in pairs.chunks(2) {
                lexicon.add(word, pair[0], pair[1]);
            }
        }

        Ok(lexicon)
    }

    /// Add a (tag, lemma) pair for a word.
    pub fn add(&mut self, word: &str, tag: &str, lemma: &str) {
        self.entries
            .entry(word.to_owned())
            .or_insert_with(BTreeSet::new)
            .insert((tag.to_owned(), lemma.to_owned()));
    }

    /// Add the tagged tokens of a sentence.
    ///
    /// Untagged tokens are skipped. Tokens without a lemma use their
    /// lowercased form as the lemma.
    pub fn add_sentence(&mut self, sentence: &Sentence) {
        for token in sentence.iter() {
            let tag = match token.tag() {
                Some(tag) => tag,
                None => continue,
            };

            match token.lemma() {
                Some(lemma) => self.add(token.form(), tag, lemma),
                None => self.add(token.form(), tag, &token.form().to_lowercase()),
            }
        }
    }

    /// Add the tagged tokens of a sentence, resolving lemmas with
    /// `lemmatizer`.
    ///
    /// Untagged tokens are skipped.
    pub fn add_lemmatized<L>(&mut self, sentence: &Sentence, lemmatizer: &L)
    where
        L: Lemmatize,
    {
        for token in sentence.iter() {
            if let Some(tag) = token.tag() {
                let lemma = lemmatizer.lemmatize(token.form(), tag, token.lemma());
                self.add(token.form(), tag, &lemma);
            }
        }
    }

    /// Get the (tag, lemma) pairs of a word.
    pub fn get(&self, word: &str) -> Option<&BTreeSet<(String, String)>> {
        self.entries.get(word)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All tags in the lexicon, sorted.
    pub fn tags(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .flat_map(|pairs| pairs.iter().map(|(tag, _)| tag.as_str()))
            .collect()
    }

    /// Write the lexicon.
    ///
    /// Words are sorted case-insensitively, the pairs of a word are
    /// sorted by tag and lemma. The sentence boundary entry is written
    /// last.
    pub fn write<W>(&self, mut write: W) -> Fallible<()>
    where
        W: Write,
    {
        let words = self.entries.keys().sorted_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        for word in words {
            let pairs = self.entries[word]
                .iter()
                .map(|(tag, lemma)| format!("{}\t{}", tag, lemma))
                .join("\t");
            writeln!(write, "{}\t{}", word, pairs)?;
        }

        writeln!(write, "{}", SENTENCE_END_ENTRY)?;

        Ok(())
    }
}

/// Write tags separated by spaces, the form of TreeTagger's open class
/// file.
pub fn write_open_class<'a, W>(
    tags: impl IntoIterator<Item = &'a str>,
    mut write: W,
) -> Fallible<()>
where
    W: Write,
{
    write!(write, "{}", tags.into_iter().join(" "))?;
    Ok(())
}

/// Write tags, one per line.
pub fn write_tag_list<'a, W>(
    tags: impl IntoIterator<Item = &'a str>,
    mut write: W,
) -> Fallible<()>
where
    W: Write,
{
    for tag in tags {
        writeln!(write, "{}", tag)?;
    }

    Ok(())
}
