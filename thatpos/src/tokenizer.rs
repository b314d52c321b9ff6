//! Word tokenization.

use unicode_segmentation::UnicodeSegmentation;

use crate::Sentence;

/// Clitics after an apostrophe that become separate tokens.
static CLITICS: &[&str] = &["s", "re", "ve", "ll", "d", "m"];

/// Split text into word tokens.
///
/// Tokens are Unicode word-boundary segments (UAX #29). Whitespace
/// segments are dropped, punctuation is kept as separate tokens.
/// English clitics are split off as in the Penn Treebank, so
/// `that's` becomes `that` and `'s`, `don't` becomes `do` and `n't`.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();

    for segment in text.split_word_bounds() {
        if segment.trim().is_empty() {
            continue;
        }

        match clitic_offset(segment) {
            Some(offset) => {
                tokens.push(&segment[..offset]);
                tokens.push(&segment[offset..]);
            }
            None => tokens.push(segment),
        }
    }

    tokens
}

/// Byte offset where a clitic starts in a word.
fn clitic_offset(word: &str) -> Option<usize> {
    let (idx, apostrophe) = word
        .char_indices()
        .rev()
        .find(|&(_, c)| c == '\'' || c == '\u{2019}')?;
    let rest = &word[idx + apostrophe.len_utf8()..];

    let offset = if CLITICS.iter().any(|clitic| rest.eq_ignore_ascii_case(clitic)) {
        idx
    } else if rest.eq_ignore_ascii_case("t") && word[..idx].ends_with(&['n', 'N'][..]) {
        idx - 1
    } else {
        return None;
    };

    // A bare clitic, such as a quoted 's, stays intact.
    if offset == 0 {
        None
    } else {
        Some(offset)
    }
}

/// Tokenize text into an unannotated sentence.
pub fn sentence_from_text(text: &str) -> Sentence {
    tokenize(text).into_iter().collect()
}
