//! Corpus preparation and tagger evaluation for the uses of "that".

pub mod config;

#[cfg(test)]
mod config_tests;

pub mod errors;

pub mod eval;

pub mod io;

pub mod lemma;

pub mod lexicon;

mod numberer;
pub use crate::numberer::Numberer;

pub mod prepare;

pub mod serialization;

pub mod stats;

mod tag;
pub use crate::tag::{Sentence, Tag, Token};

pub mod tagset;

pub mod tokenizer;

pub mod treetagger;
pub use crate::treetagger::TreeTagger;
