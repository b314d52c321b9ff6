//! Tag set conversion.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref PENN_TO_CLAWS: Vec<(&'static str, &'static str)> = vec![
        ("CC", "CC"),
        ("CD", "CD"),
        ("DT", "AT0"),
        ("EX", "EX"),
        ("FW", "FW"),
        ("IN", "II"),
        ("JJ", "AJ0"),
        ("JJR", "AJC"),
        ("JJS", "AJS"),
        ("LS", "LS"),
        ("MD", "MD"),
        ("NN", "NN1"),
        ("NNS", "NN2"),
        ("NNP", "NP"),
        ("NNPS", "NPS"),
        ("PDT", "DD0"),
        ("POS", "POS"),
        ("PRP", "PP"),
        ("PRP$", "PP$"),
        ("RB", "RG0"),
        ("RBR", "RGC"),
        ("RBS", "RGS"),
        ("RP", "RP"),
        ("SYM", "SYM"),
        ("TO", "TO"),
        ("UH", "UH"),
        ("VB", "VVB"),
        ("VBD", "VVD"),
        ("VBG", "VVG"),
        ("VBN", "VVN"),
        ("VBP", "VVP"),
        ("VBZ", "VVZ"),
        ("WDT", "WDT"),
        ("WP", "WP"),
        ("WP$", "WPS"),
        ("WRB", "WRB"),
    ];
}

/// Mapping from tagger tags to the tags of the training lexicon.
///
/// Tags without a mapping are passed through unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagMap {
    mapping: HashMap<String, String>,
}

impl TagMap {
    /// Construct an empty mapping (identity).
    pub fn new() -> Self {
        TagMap::default()
    }

    /// Mapping from Penn Treebank tags to CLAWS8-like tags.
    pub fn penn_to_claws() -> Self {
        PENN_TO_CLAWS
            .iter()
            .map(|&(from, to)| (from.to_owned(), to.to_owned()))
            .collect()
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) -> Option<String> {
        self.mapping.insert(from.into(), to.into())
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Map a tag.
    pub fn map<'a>(&'a self, tag: &'a str) -> &'a str {
        self.mapping.get(tag).map(String::as_str).unwrap_or(tag)
    }
}

impl Extend<(String, String)> for TagMap {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.mapping.extend(iter)
    }
}

impl std::iter::FromIterator<(String, String)> for TagMap {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        TagMap {
            mapping: iter.into_iter().collect(),
        }
    }
}

/// Strip tag details after the first slash.
///
/// TreeTagger's English Penn model emits tags such as `IN/that`.
pub fn main_tag(tag: &str) -> &str {
    tag.split('/').next().unwrap_or(tag)
}
