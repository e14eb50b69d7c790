//! Console progress for plan runs
//!
//! A spinner animates while a step runs; when it finishes the spinner is
//! replaced by a one-line status.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use provisioner::{Error, ProgressCallback, RunSummary, StepOutcome};
use std::time::Duration;

use crate::ui;

/// Create a spinner with a message
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Renders plan progress on the terminal
///
/// In verbose mode each step's description stays on screen above its
/// status line instead of only showing in the spinner.
pub struct ConsoleProgress {
    quiet: bool,
    verbose: bool,
    spinner: Option<ProgressBar>,
    prefix: String,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            verbose: false,
            spinner: None,
            prefix: String::new(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether step descriptions are printed as permanent lines
    fn shows_descriptions(&self) -> bool {
        self.verbose && !self.quiet
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_plan_start(&mut self, plan: &str, steps: usize) {
        if !self.quiet {
            ui::header(&format!("{plan} ({steps} steps)"));
        }
    }

    fn on_empty_plan(&mut self, plan: &str) {
        if !self.quiet {
            ui::info(&format!("{plan}: nothing to do"));
        }
    }

    fn on_step_start(&mut self, index: usize, total: usize, _name: &str, description: &str) {
        self.prefix = ui::step_prefix(index, total);
        if self.shows_descriptions() {
            ui::dim(&format!("{} {}", self.prefix, description));
        }
        if !self.quiet {
            self.spinner = Some(spinner(&format!("{} {}", self.prefix, description)));
        }
    }

    fn on_step_complete(&mut self, name: &str, outcome: &StepOutcome) {
        self.clear_spinner();
        if self.quiet {
            return;
        }
        match outcome {
            StepOutcome::Performed { message } => {
                println!("{} {} {} {}", self.prefix, "✓".green(), name.bold(), message);
            }
            StepOutcome::Skipped { reason } => {
                println!(
                    "{} {}",
                    self.prefix,
                    format!("⊘ {name} skipped ({reason})").dimmed()
                );
            }
            StepOutcome::WouldApply => {
                println!("{} {} would run {}", self.prefix, "→".cyan(), name.bold());
            }
            StepOutcome::Failed { error } => {
                println!("{} {} {} failed: {}", self.prefix, "✗".red(), name.bold(), error);
            }
        }
    }

    fn on_step_error(&mut self, name: &str, error: &Error) {
        self.clear_spinner();
        ui::error(&format!("{name} failed: {error}"));
        let category = error.category();
        eprintln!("  {} {}", category.description().dimmed(), category.advice().dimmed());
    }

    fn on_plan_complete(&mut self, _plan: &str, summary: &RunSummary) {
        self.clear_spinner();
        if self.quiet {
            return;
        }
        ui::header("Summary");
        ui::kv("Performed", &summary.performed.to_string());
        ui::kv("Skipped", &summary.skipped.to_string());
        if summary.planned > 0 {
            ui::kv("Would run", &summary.planned.to_string());
        }
        if !summary.failures.is_empty() {
            ui::kv("Failed", &summary.failures.len().to_string());
        }
    }
}
