//! Astral-style CLI output formatting.
//!
//! Human output uses colored symbols and indented fields. In JSON mode each
//! line on stdout is one JSON value: either a command's own document or a
//! `{"type", "payload"}` record. Spinners never write in JSON mode.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::json;

/// Output settings taken from the global CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress status lines; command results still print.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn status_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Global verbosity level from `-v` flags.
#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

/// Print a labeled value, e.g. the discovery URL of a new cluster.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if status_suppressed(config) {
        return;
    }

    println!("  {:<12} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if status_suppressed(config) {
        return;
    }

    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line. Shown in quiet mode too.
pub fn warning(message: &str) {
    if is_json() {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", "⚠".yellow(), message);
}

/// Warn about one host that failed while the rest of the run went on.
pub fn host_failure(host: &str, reason: impl Display) {
    if is_json() {
        warning(&format!("{host}: {reason}"));
        return;
    }
    warning(&format!("{}: {reason}", host.bold()));
}

/// Print an error line on stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!(
            "{}",
            json!({ "type": "error", "payload": { "message": message } })
        );
        return;
    }

    eprintln!("  {} {}", "×".red(), message);
}

/// Print a section header, one per host in multi-host reports.
pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if status_suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.bold());
}

const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a braille spinner on stderr.
///
/// Returns a hidden progress bar in JSON or quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let config = read_config();
    if config.json || config.quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_strings(BRAILLE_SPINNER));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success checkmark.
pub fn spinner_success(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "✓".green(), message));
}

/// Finish a spinner with a failure mark.
pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "×".red(), message));
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}

/// Print a dimmed note.
pub fn note(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if status_suppressed(config) {
        return;
    }

    println!("  {}", message.dimmed());
}

/// Print a bare data line, e.g. `host address`.
///
/// Not suppressed by quiet mode: the line is the command's result.
pub fn plain(line: &str) {
    if is_json() {
        emit_json_line("line", json!({ "content": line }));
        return;
    }
    println!("{line}");
}

/// Render rows as a rounded table, indented like the other status lines.
pub fn table<T: tabled::Tabled>(rows: Vec<T>) {
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    for line in table.to_string().lines() {
        println!("  {line}");
    }
}

/// Print a command's JSON document.
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}
