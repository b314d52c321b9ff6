use std::borrow::BorrowMut;
use std::ops::{Deref, DerefMut};

use failure::Fallible;

/// A token with optional tag and lemma annotations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    form: String,
    tag: Option<String>,
    lemma: Option<String>,
}

impl Token {
    /// Construct an unannotated token.
    pub fn new(form: impl Into<String>) -> Self {
        Token {
            form: form.into(),
            tag: None,
            lemma: None,
        }
    }

    /// Construct a token with a part-of-speech tag.
    pub fn with_tag(form: impl Into<String>, tag: impl Into<String>) -> Self {
        Token {
            form: form.into(),
            tag: Some(tag.into()),
            lemma: None,
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref()
    }

    pub fn set_tag(&mut self, tag: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.tag, tag)
    }

    pub fn set_lemma(&mut self, lemma: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.lemma, lemma)
    }

    /// Check whether the form equals `word`, ignoring case.
    pub fn is_word(&self, word: &str) -> bool {
        self.form.to_lowercase() == word.to_lowercase()
    }
}

/// A sentence is a sequence of tokens.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new() -> Self {
        Sentence::default()
    }

    /// Get the first token whose form is `word`, ignoring case.
    pub fn find_word(&self, word: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.is_word(word))
    }
}

impl Deref for Sentence {
    type Target = Vec<Token>;

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

impl DerefMut for Sentence {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tokens
    }
}

impl From<Vec<Token>> for Sentence {
    fn from(tokens: Vec<Token>) -> Self {
        Sentence { tokens }
    }
}

impl<S> std::iter::FromIterator<S> for Sentence
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Sentence {
            tokens: iter.into_iter().map(Token::new).collect(),
        }
    }
}

/// Trait for part-of-speech taggers.
///
/// Implementations set the tag and, where available, the lemma of
/// every token in the given sentences.
pub trait Tag {
    fn tag_sentences(&self, sentences: &mut [impl BorrowMut<Sentence>]) -> Fallible<()>;
}
