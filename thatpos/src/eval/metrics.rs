use std::collections::{BTreeSet, HashMap};
use std::io::Write;

use failure::Fallible;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_derive::Serialize;

use crate::Numberer;

/// Label used for sentences where the tagger did not find the target
/// word.
pub static NO_PREDICTION: &str = "None";

/// The label of a prediction.
pub fn prediction_label(prediction: Option<&str>) -> &str {
    prediction.unwrap_or(NO_PREDICTION)
}

/// Contingency table of row and column labels.
#[derive(Clone, Debug, Default)]
pub struct Crosstab {
    rows: Numberer<String>,
    columns: Numberer<String>,
    counts: HashMap<(usize, usize), usize>,
}

impl Crosstab {
    pub fn new() -> Self {
        Crosstab::default()
    }

    /// Count an observation.
    pub fn add(&mut self, row: &str, column: &str) {
        let row = self.rows.add(row.to_owned());
        let column = self.columns.add(column.to_owned());
        *self.counts.entry((row, column)).or_insert(0) += 1;
    }

    /// Add a row without observations.
    pub fn add_row(&mut self, row: &str) {
        self.rows.add(row.to_owned());
    }

    /// Number of observations for a row and a column.
    pub fn count(&self, row: &str, column: &str) -> usize {
        match (
            self.rows.number(&row.to_owned()),
            self.columns.number(&column.to_owned()),
        ) {
            (Some(row), Some(column)) => self.counts.get(&(row, column)).cloned().unwrap_or(0),
            _ => 0,
        }
    }

    /// Row labels in order of appearance.
    pub fn rows(&self) -> &[String] {
        self.rows.values()
    }

    pub fn sorted_rows(&self) -> Vec<String> {
        self.rows.sorted_values()
    }

    pub fn sorted_columns(&self) -> Vec<String> {
        self.columns.sorted_values()
    }

    /// Write the table as CSV with the given rows and columns.
    ///
    /// Labels that were not observed have zero counts.
    pub fn write_csv<W>(
        &self,
        write: W,
        corner: &str,
        rows: &[String],
        columns: &[String],
    ) -> Fallible<()>
    where
        W: Write,
    {
        let mut writer = csv::Writer::from_writer(write);

        let mut header = vec![corner.to_owned()];
        header.extend(columns.iter().cloned());
        writer.write_record(&header)?;

        for row in rows {
            let mut record = vec![row.clone()];
            record.extend(columns.iter().map(|column| self.count(row, column).to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;

        Ok(())
    }
}

/// Precision, recall and F1 of a label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LabelScores {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

impl LabelScores {
    fn new(true_positives: usize, predicted: usize, support: usize) -> Self {
        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, support);
        let f1_score = if precision + recall > 0. {
            2. * precision * recall / (precision + recall)
        } else {
            0.
        };

        LabelScores {
            precision,
            recall,
            f1_score,
            support,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Per-label scores with accuracy and averages.
///
/// Labels are the sorted union of gold and predicted labels. Scores
/// with a zero denominator are 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationReport {
    labels: Vec<(String, LabelScores)>,
    accuracy: f64,
    macro_avg: LabelScores,
    weighted_avg: LabelScores,
}

impl ClassificationReport {
    pub fn new<S>(gold: &[S], predicted: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        assert_eq!(
            gold.len(),
            predicted.len(),
            "Gold and predicted labels length mismatch"
        );

        let mut true_positives = HashMap::new();
        let mut predicted_counts = HashMap::new();
        let mut support = HashMap::new();

        for (gold, predicted) in gold.iter().zip(predicted) {
            let (gold, predicted) = (gold.as_ref(), predicted.as_ref());
            *support.entry(gold).or_insert(0) += 1;
            *predicted_counts.entry(predicted).or_insert(0) += 1;
            if gold == predicted {
                *true_positives.entry(gold).or_insert(0) += 1;
            }
        }

        let label_set: BTreeSet<&str> = support
            .keys()
            .chain(predicted_counts.keys())
            .cloned()
            .collect();
        let labels: Vec<_> = label_set
            .into_iter()
            .map(|label| {
                let count =
                    |counts: &HashMap<&str, usize>| counts.get(label).cloned().unwrap_or(0);
                let scores = LabelScores::new(
                    count(&true_positives),
                    count(&predicted_counts),
                    count(&support),
                );
                (label.to_owned(), scores)
            })
            .collect();

        let total = gold.len();
        let correct: usize = true_positives.values().sum();

        ClassificationReport {
            accuracy: ratio(correct, total),
            macro_avg: average(&labels, total, |_| 1.),
            weighted_avg: average(&labels, total, |scores| scores.support as f64),
            labels,
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Scores of a label.
    pub fn label(&self, label: &str) -> Option<&LabelScores> {
        self.labels
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, scores)| scores)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|(label, _)| label.as_str())
    }

    pub fn macro_avg(&self) -> &LabelScores {
        &self.macro_avg
    }

    pub fn weighted_avg(&self) -> &LabelScores {
        &self.weighted_avg
    }
}

fn average<F>(labels: &[(String, LabelScores)], total: usize, weight: F) -> LabelScores
where
    F: Fn(&LabelScores) -> f64,
{
    let weight_sum: f64 = labels.iter().map(|(_, scores)| weight(scores)).sum();
    let weighted = |score: fn(&LabelScores) -> f64| {
        if weight_sum == 0. {
            return 0.;
        }

        labels
            .iter()
            .map(|(_, scores)| weight(scores) * score(scores))
            .sum::<f64>()
            / weight_sum
    };

    LabelScores {
        precision: weighted(|s| s.precision),
        recall: weighted(|s| s.recall),
        f1_score: weighted(|s| s.f1_score),
        support: total,
    }
}

impl Serialize for ClassificationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.labels.len() + 3))?;
        for (label, scores) in &self.labels {
            map.serialize_entry(label, scores)?;
        }
        map.serialize_entry("accuracy", &self.accuracy)?;
        map.serialize_entry("macro avg", &self.macro_avg)?;
        map.serialize_entry("weighted avg", &self.weighted_avg)?;
        map.end()
    }
}
