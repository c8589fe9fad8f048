//! Terminal progress over the pipeline stages

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::io::error::Stage;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{prefix:>13}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single bar advancing once per completed pipeline step
///
/// A hidden bar is used when progress is suppressed, so callers never
/// branch on visibility.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    /// Create a bar for `steps` steps, drawn only when `visible`
    pub fn new(steps: usize, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(steps as u64)
        } else {
            ProgressBar::with_draw_target(Some(steps as u64), ProgressDrawTarget::hidden())
        };
        bar.set_style(STAGE_STYLE.clone());
        Self { bar }
    }

    /// Announce the step about to run
    pub fn start(&self, stage: Stage, detail: &str) {
        self.bar.set_prefix(stage.to_string());
        self.bar.set_message(detail.to_string());
    }

    /// Mark the current step complete
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    /// Completed steps
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Total steps
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    /// Leave the bar with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
