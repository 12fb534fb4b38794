//! Progress reporting and cooperative cancellation

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Receives percentage increments while a batch runs. Increments are
/// fractions of 100, so a batch of N members reports 100/N per member.
pub trait Progress: Send + Sync {
    fn report(&self, increment: f64, message: &str);
}

/// Discards all progress.
pub struct NullProgress;

impl Progress for NullProgress {
    fn report(&self, _increment: f64, _message: &str) {}
}

/// Shared flag polled by the orchestrator between members.
#[derive(Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Terminal progress bar. Tracks hundredths of a percent so fractional
/// per-member increments do not drift on long batches.
pub struct BarProgress {
    bar: ProgressBar,
    hundredths: AtomicU64,
}

impl BarProgress {
    pub fn new() -> BarProgress {
        let bar = ProgressBar::new(10_000);
        let style = ProgressStyle::with_template("[{bar:40.cyan/blue}] {percent}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        BarProgress {
            bar,
            hundredths: AtomicU64::new(0),
        }
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        BarProgress::new()
    }
}

impl Progress for BarProgress {
    fn report(&self, increment: f64, message: &str) {
        let add = (increment * 100.0).round().max(0.0) as u64;
        let position = self.hundredths.fetch_add(add, Ordering::SeqCst) + add;
        self.bar.set_position(position.min(10_000));
        self.bar.set_message(message.to_string());
    }
}
