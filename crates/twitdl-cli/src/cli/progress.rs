//! Terminal rendering of download progress with `indicatif`.
//!
//! A byte bar when the total size is known, a spinner with a running byte
//! count otherwise.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use twitdl_core::progress::ProgressDisplay;

const TICK: Duration = Duration::from_millis(120);

pub struct TerminalDisplay {
    bar: Option<ProgressBar>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressDisplay for TerminalDisplay {
    fn start(&mut self, total: Option<u64>) {
        let bar = ProgressBar::with_draw_target(total, ProgressDrawTarget::stderr());
        match total {
            Some(_) => bar.set_style(Self::bar_style()),
            None => {
                bar.set_style(Self::spinner_style());
                bar.set_message("downloading");
            }
        }
        bar.enable_steady_tick(TICK);
        self.bar = Some(bar);
    }

    fn set_total(&mut self, total: u64) {
        if let Some(bar) = &self.bar {
            if bar.length().is_none() {
                bar.set_style(Self::bar_style());
            }
            bar.set_length(total);
        }
    }

    fn advance(&mut self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    fn notice(&mut self, message: &str) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => println!("{message}"),
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }

    fn abandon(&mut self, reason: &str) {
        if let Some(bar) = self.bar.take() {
            bar.abandon_with_message(format!("failed: {reason}"));
        }
    }
}
