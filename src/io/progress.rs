//! Terminal progress bars for the corpus scan and the assembly pass

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix:>10} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates one progress bar per pipeline phase
///
/// Bars are safe to advance from worker threads.
pub struct ProgressManager {
    multi_progress: MultiProgress,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager drawing to stderr
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
        }
    }

    /// Create a manager that never draws
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        }
    }

    /// Start a bar for a phase with a known amount of work
    pub fn start_phase(&self, label: &'static str, total: usize) -> ProgressBar {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(PHASE_STYLE.clone());
        bar.set_prefix(label);
        self.multi_progress.add(bar)
    }

    /// Close a phase bar, leaving a completion message
    pub fn finish_phase(bar: &ProgressBar, message: impl Into<String>) {
        bar.finish_with_message(message.into());
    }

    /// Remove all progress displays
    pub fn clear(&self) {
        let _ = self.multi_progress.clear();
    }
}
