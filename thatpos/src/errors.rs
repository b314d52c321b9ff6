use failure::Fail;

/// Errors in corpus and lexicon files.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum FormatError {
    /// A lexicon line has a tag without a lemma.
    #[fail(display = "incomplete tag/lemma pair in lexicon line: '{}'", line)]
    IncompleteLexiconEntry { line: String },

    /// A lemma table line does not have three fields.
    #[fail(display = "lemma table line should have three fields: '{}'", line)]
    MalformedLemmaEntry { line: String },

    /// Unknown word class.
    #[fail(display = "unknown word class: '{}'", class)]
    UnknownWordClass { class: String },

    /// The file name cannot be used to derive an output name.
    #[fail(display = "cannot derive output file name from: '{}'", path)]
    InvalidFileName { path: String },
}

/// Errors from the external tagger.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum TaggerError {
    /// The tagger process exited unsuccessfully.
    #[fail(display = "tagger exited with {}: {}", status, stderr)]
    ExitStatus { status: String, stderr: String },

    /// The tagger output does not have a tag column.
    #[fail(display = "malformed tagger output line: '{}'", line)]
    MalformedOutput { line: String },

    /// The tagger returned a different number of sentences.
    #[fail(
        display = "tagger returned {} sentences, expected {}",
        returned, expected
    )]
    SentenceCountMismatch { expected: usize, returned: usize },

    /// The tagger returned a different number of tokens for a sentence.
    #[fail(
        display = "tagger returned {} tokens for sentence {}, expected {}",
        returned, sentence, expected
    )]
    TokenCountMismatch {
        sentence: usize,
        expected: usize,
        returned: usize,
    },

    /// A token was not assigned a tag.
    #[fail(display = "token without a tag: '{}'", form)]
    MissingTag { form: String },
}

/// Configuration errors.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum ConfigError {
    /// A required configuration section is absent.
    #[fail(display = "configuration does not have a [{}] section", section)]
    MissingSection { section: String },
}
