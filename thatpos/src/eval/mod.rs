//! Evaluation of target word tagging.

mod harness;
pub use self::harness::{Evaluation, Evaluator, FileResults, SentenceResult};

mod metrics;
pub use self::metrics::{
    prediction_label, ClassificationReport, Crosstab, LabelScores, NO_PREDICTION,
};

mod report;
pub use self::report::{write_file_results, AccuracyReport, FileAccuracy, ReportWriter};
