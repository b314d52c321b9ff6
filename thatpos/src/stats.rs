//! Descriptive corpus statistics.
//!
//! Statistics are computed per category, where a category is a file
//! with sentences that exemplify one use of the target word.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use failure::{Fallible, ResultExt};
use lazy_static::lazy_static;
use log::{info, warn};
use serde_derive::Serialize;

use crate::config::StatisticsConfig;
use crate::Numberer;

/// Number of histogram bins.
pub const HISTOGRAM_BINS: usize = 10;

/// Number of most frequent words that are reported.
pub const TOP_WORDS: usize = 10;

/// Name of the text report.
pub static REPORT_FILE: &str = "statistical_analysis.txt";

lazy_static! {
    /// English stopwords.
    static ref STOPWORDS: HashSet<&'static str> = [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
        "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
        "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
        "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
        "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
        "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
        "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
        "against", "between", "into", "through", "during", "before", "after", "above",
        "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
        "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
        "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
        "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
        "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
        "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
        "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
        "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .iter()
    .cloned()
    .collect();
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Split text into sentences at `.`, `!` and `?`.
///
/// Sentences are trimmed, empty sentences are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(|c| c == '.' || c == '!' || c == '?')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Remove the `That as a ` and `That as an ` prefixes from a category
/// label.
pub fn display_label(label: &str) -> String {
    label.replace("That as a ", "").replace("That as an ", "")
}

/// Form of a display label that is used in file names.
pub fn file_label(display_label: &str) -> String {
    display_label.replace(' ', "_")
}

/// Sentence lengths in words.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentenceStats {
    lengths: Vec<usize>,
}

impl SentenceStats {
    pub fn from_text(text: &str) -> Self {
        SentenceStats {
            lengths: split_sentences(text)
                .into_iter()
                .map(|sentence| sentence.split_whitespace().count())
                .collect(),
        }
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn num_sentences(&self) -> usize {
        self.lengths.len()
    }

    /// Average sentence length, 0 without sentences.
    pub fn average_length(&self) -> f64 {
        if self.lengths.is_empty() {
            0.
        } else {
            self.lengths.iter().sum::<usize>() as f64 / self.lengths.len() as f64
        }
    }

    pub fn histogram(&self) -> Histogram {
        Histogram::new(&self.lengths, HISTOGRAM_BINS)
    }
}

/// Histogram with equal-width bins.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Construct a histogram of `values`.
    ///
    /// The bins span the range of the values, the last bin includes its
    /// upper edge. If all values are equal, the range is extended by 0.5
    /// in both directions. Without values, the range is 0 to 1.
    pub fn new(values: &[usize], bins: usize) -> Self {
        assert!(bins > 0, "Histogram should at least have one bin.");

        let (lo, hi) = match (values.iter().min(), values.iter().max()) {
            (Some(&min), Some(&max)) if min == max => (min as f64 - 0.5, max as f64 + 0.5),
            (Some(&min), Some(&max)) => (min as f64, max as f64),
            _ => (0., 1.),
        };

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|idx| lo + idx as f64 * width).collect();

        let mut counts = vec![0; bins];
        for &value in values {
            let bin = ((value as f64 - lo) / width) as usize;
            counts[bin.min(bins - 1)] += 1;
        }

        Histogram { edges, counts }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Bin edges, one more than the number of bins.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn write_csv<W>(&self, write: W) -> Fallible<()>
    where
        W: Write,
    {
        let mut writer = csv::Writer::from_writer(write);
        for (bounds, &count) in self.edges.windows(2).zip(&self.counts) {
            writer.serialize(HistogramRow {
                bin_start: bounds[0],
                bin_end: bounds[1],
                count,
            })?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct HistogramRow {
    bin_start: f64,
    bin_end: f64,
    count: usize,
}

/// Word frequencies, without punctuation and stopwords.
#[derive(Clone, Debug, Default)]
pub struct WordStats {
    words: Numberer<String>,
    counts: Vec<usize>,
}

impl WordStats {
    /// Count the words of a text.
    ///
    /// ASCII punctuation is removed and the text is lowercased before
    /// it is split at whitespace.
    pub fn from_text(text: &str) -> Self {
        let clean: String = text
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .to_lowercase();

        let mut stats = WordStats::default();
        for word in clean.split_whitespace().filter(|word| !is_stopword(word)) {
            let idx = stats.words.add(word.to_owned());
            if idx == stats.counts.len() {
                stats.counts.push(0);
            }
            stats.counts[idx] += 1;
        }

        stats
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn unique(&self) -> usize {
        self.words.len()
    }

    /// Ratio of unique words to all words, 0 without words.
    pub fn lexical_diversity(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.
        } else {
            self.unique() as f64 / total as f64
        }
    }

    /// The `n` most frequent words.
    ///
    /// Words with the same frequency are ordered by first occurrence.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut indices: Vec<usize> = (0..self.counts.len()).collect();
        indices.sort_by(|&a, &b| self.counts[b].cmp(&self.counts[a]));

        indices
            .into_iter()
            .take(n)
            .filter_map(|idx| {
                self.words
                    .value(idx)
                    .map(|word| (word.as_str(), self.counts[idx]))
            })
            .collect()
    }
}

/// Statistics of a category.
#[derive(Clone, Debug)]
pub struct CategoryStats {
    pub label: String,
    pub sentences: SentenceStats,
    pub words: WordStats,
}

impl CategoryStats {
    pub fn from_text(label: impl Into<String>, text: &str) -> Self {
        CategoryStats {
            label: label.into(),
            sentences: SentenceStats::from_text(text),
            words: WordStats::from_text(text),
        }
    }

    pub fn display_label(&self) -> String {
        display_label(&self.label)
    }
}

#[derive(Serialize)]
struct WordRow<'a> {
    word: &'a str,
    frequency: usize,
}

#[derive(Serialize)]
struct AverageLengthRow {
    category: String,
    average_sentence_length: f64,
}

#[derive(Serialize)]
struct DiversityRow {
    category: String,
    lexical_diversity: f64,
}

/// Statistics of all categories.
#[derive(Clone, Debug, Default)]
pub struct CorpusStatistics {
    categories: Vec<CategoryStats>,
}

impl CorpusStatistics {
    pub fn new() -> Self {
        CorpusStatistics::default()
    }

    /// Compute the statistics of the configured files.
    ///
    /// Files that do not exist are skipped with a warning.
    pub fn analyze(config: &StatisticsConfig) -> Fallible<Self> {
        let mut statistics = CorpusStatistics::new();

        for file in &config.files {
            let path = Path::new(&config.data_dir).join(&file.filename);
            if !path.exists() {
                warn!("File {} not found.", path.display());
                continue;
            }

            let text = fs::read_to_string(&path)
                .with_context(|_| format!("Cannot read '{}'", path.display()))?;
            statistics.add(CategoryStats::from_text(file.label.clone(), &text));
        }

        Ok(statistics)
    }

    pub fn add(&mut self, category: CategoryStats) {
        self.categories.push(category);
    }

    pub fn categories(&self) -> &[CategoryStats] {
        &self.categories
    }

    /// Write the text report.
    pub fn write_report<W>(&self, mut write: W) -> Fallible<()>
    where
        W: Write,
    {
        let rule = "-".repeat(40);

        for category in &self.categories {
            writeln!(write, "Category: {}", category.label)?;
            writeln!(
                write,
                "Number of sentences: {}",
                category.sentences.num_sentences()
            )?;
            writeln!(
                write,
                "Average sentence length: {:.2} words",
                category.sentences.average_length()
            )?;
            writeln!(write, "{}", rule)?;
        }

        writeln!(write, "\nFurther Analysis:")?;
        writeln!(write, "{}", "=".repeat(40))?;
        for category in &self.categories {
            writeln!(write, "{}:", category.label)?;
            writeln!(
                write,
                "Lexical Diversity (Unique/Total words): {:.2}",
                category.words.lexical_diversity()
            )?;
            writeln!(write, "Top {} words:", TOP_WORDS)?;
            for (word, freq) in category.words.most_common(TOP_WORDS) {
                writeln!(write, "  {}: {}", word, freq)?;
            }
            writeln!(write, "{}", rule)?;
        }

        Ok(())
    }

    /// Write the report and the data tables to `output_dir`.
    ///
    /// Returns the paths of the written files.
    pub fn write_all(&self, output_dir: &Path) -> Fallible<Vec<PathBuf>> {
        fs::create_dir_all(output_dir).with_context(|_| {
            format!(
                "Cannot create output directory '{}'",
                output_dir.display()
            )
        })?;

        let mut written = Vec::new();

        let path = output_dir.join(REPORT_FILE);
        let mut write = create(&path)?;
        self.write_report(&mut write)?;
        write.flush()?;
        written.push(path);

        for category in &self.categories {
            let name = file_label(&category.display_label());

            let path = output_dir.join(format!("{}_histogram.csv", name));
            category.sentences.histogram().write_csv(create(&path)?)?;
            written.push(path);

            let path = output_dir.join(format!("top_{}_words_{}.csv", TOP_WORDS, name));
            let mut writer = csv::Writer::from_writer(create(&path)?);
            for (word, frequency) in category.words.most_common(TOP_WORDS) {
                writer.serialize(WordRow { word, frequency })?;
            }
            writer.flush()?;
            written.push(path);
        }

        let path = output_dir.join("average_sentence_length_comparison.csv");
        let mut writer = csv::Writer::from_writer(create(&path)?);
        for category in &self.categories {
            writer.serialize(AverageLengthRow {
                category: category.display_label(),
                average_sentence_length: category.sentences.average_length(),
            })?;
        }
        writer.flush()?;
        written.push(path);

        let path = output_dir.join("lexical_diversity_comparison.csv");
        let mut writer = csv::Writer::from_writer(create(&path)?);
        for category in &self.categories {
            writer.serialize(DiversityRow {
                category: category.display_label(),
                lexical_diversity: category.words.lexical_diversity(),
            })?;
        }
        writer.flush()?;
        written.push(path);

        info!(
            "Wrote statistics of {} categories to {}",
            self.categories.len(),
            output_dir.display()
        );

        Ok(written)
    }
}

fn create(path: &Path) -> Fallible<BufWriter<File>> {
    let file =
        File::create(path).with_context(|_| format!("Cannot create '{}'", path.display()))?;
    Ok(BufWriter::new(file))
}
