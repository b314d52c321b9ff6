//! Lemma resolution.

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use failure::{Error, Fallible};

use crate::errors::FormatError;

/// Coarse word class used to look up lemmas.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordClass {
    /// Derive the word class from a part-of-speech tag.
    ///
    /// Pronouns and determiners are treated as nouns, prepositions as
    /// adverbs. Anything unrecognized is a noun.
    pub fn from_tag(tag: &str) -> Self {
        if tag.starts_with("VV") || tag.starts_with("VB") {
            WordClass::Verb
        } else if tag.starts_with("JJ") {
            WordClass::Adjective
        } else if tag.starts_with("NN") {
            WordClass::Noun
        } else if tag.starts_with("RB") || tag.starts_with("IN") {
            WordClass::Adverb
        } else {
            WordClass::Noun
        }
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            WordClass::Noun => "noun",
            WordClass::Verb => "verb",
            WordClass::Adjective => "adj",
            WordClass::Adverb => "adv",
        };

        f.write_str(name)
    }
}

impl FromStr for WordClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" | "noun" => Ok(WordClass::Noun),
            "v" | "verb" => Ok(WordClass::Verb),
            "a" | "s" | "adj" => Ok(WordClass::Adjective),
            "r" | "adv" => Ok(WordClass::Adverb),
            _ => Err(FormatError::UnknownWordClass {
                class: s.to_owned(),
            }
            .into()),
        }
    }
}

/// Lemmatizers.
pub trait Lemmatize {
    /// Get the lemma of `form` with tag `tag`.
    ///
    /// `tagger_lemma` is the lemma proposed by the tagger, if any.
    fn lemmatize(&self, form: &str, tag: &str, tagger_lemma: Option<&str>) -> String;
}

/// Placeholder lemmas that TreeTagger emits instead of a real lemma.
fn is_placeholder(lemma: &str) -> bool {
    lemma.is_empty() || lemma == "<unknown>" || (lemma.starts_with('@') && lemma.ends_with('@'))
}

/// Dictionary-based lemmatizer.
///
/// Lemmas are looked up by lowercased form and word class. Words that
/// are not in the table get the tagger's lemma, or the lowercased form
/// when the tagger did not provide a usable lemma.
#[derive(Clone, Debug, Default)]
pub struct LemmaTable {
    lemmas: HashMap<(String, WordClass), String>,
}

impl LemmaTable {
    pub fn new() -> Self {
        LemmaTable::default()
    }

    /// Read a table with `form<TAB>class<TAB>lemma` lines.
    ///
    /// Empty lines and lines starting with `#` are ignored.
    pub fn from_buf_read<R>(read: R) -> Fallible<Self>
    where
        R: BufRead,
    {
        let mut table = LemmaTable::new();

        for line in read.lines() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<_> = line.split('\t').collect();
            if parts.len() != 3 {
                return Err(FormatError::MalformedLemmaEntry { line }.into());
            }

            table.insert(parts[0], parts[1].parse()?, parts[2]);
        }

        Ok(table)
    }

    pub fn insert(&mut self, form: &str, class: WordClass, lemma: impl Into<String>) {
        self.lemmas
            .insert((form.to_lowercase(), class), lemma.into());
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

impl Lemmatize for LemmaTable {
    fn lemmatize(&self, form: &str, tag: &str, tagger_lemma: Option<&str>) -> String {
        let lower = form.to_lowercase();
        if let Some(lemma) = self.lemmas.get(&(lower.clone(), WordClass::from_tag(tag))) {
            return lemma.clone();
        }

        match tagger_lemma
            .and_then(|lemma| lemma.split('|').next())
            .filter(|lemma| !is_placeholder(lemma))
        {
            Some(lemma) => lemma.to_lowercase(),
            None => lower,
        }
    }
}
