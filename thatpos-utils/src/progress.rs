use indicatif::{ProgressBar, ProgressStyle};

/// Progress of sentence processing.
///
/// This wrapper of `indicatif`'s `ProgressBar` shows the number of
/// processed sentences and the processing speed. The bar is finished
/// when the wrapper is dropped.
pub struct SentenceProgress {
    progress: ProgressBar,
}

impl SentenceProgress {
    pub fn new() -> Self {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {prefix} {pos} sentences ({per_sec}) {msg}"),
        );

        SentenceProgress { progress }
    }

    /// Prefix the progress with a label, e.g. a model name.
    pub fn with_prefix(self, prefix: &str) -> Self {
        self.progress.set_prefix(prefix);
        self
    }

    /// Show what is currently processed.
    pub fn set_message(&self, message: &str) {
        self.progress.set_message(message);
    }

    pub fn count_sentences(&self, n: usize) {
        self.progress.inc(n as u64);
    }
}

impl Drop for SentenceProgress {
    fn drop(&mut self) {
        self.progress.finish();
    }
}
