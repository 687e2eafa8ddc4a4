//! Progress display over the variants of one rebuild

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static VARIANT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar advanced once per rendered variant
///
/// Failed variants are counted separately and shown in the final message.
pub struct VariantProgress {
    bar: ProgressBar,
    failed: usize,
}

impl VariantProgress {
    /// Create a bar over `variant_count` variants of the named job
    pub fn new(job: &str, variant_count: usize) -> Self {
        let bar = ProgressBar::new(variant_count as u64);
        bar.set_style(VARIANT_STYLE.clone());
        bar.set_prefix(job.to_string());
        Self { bar, failed: 0 }
    }

    /// Create a bar that draws nothing, for quiet runs and tests
    pub fn hidden(variant_count: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(variant_count as u64);
        Self { bar, failed: 0 }
    }

    /// Record one finished variant
    pub fn variant_done(&mut self, label: &str, succeeded: bool) {
        if !succeeded {
            self.failed += 1;
        }
        self.bar.set_message(label.to_string());
        self.bar.inc(1);
    }

    /// Number of variants recorded so far
    pub fn completed(&self) -> u64 {
        self.bar.position()
    }

    /// Number of recorded variants that failed
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Close the bar with a summary line
    pub fn finish(&self) {
        let message = if self.failed == 0 {
            "done".to_string()
        } else {
            format!("done, {} failed", self.failed)
        };
        self.bar.finish_with_message(message);
    }
}
