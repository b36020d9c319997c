//! Terminal output for photo results.
//!
//! Results can be shown as a numbered plain-text summary, a table or pretty
//! JSON. Status lines and progress indicators go to stderr so stdout carries
//! only the results.

use clap::ValueEnum;
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use std::fmt::Write as _;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::Photo;

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain summary on a terminal, JSON otherwise
    Auto,
    /// Numbered plain-text summary
    Plain,
    /// Table format
    Table,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    /// Resolve `Auto` against whether stdout is a terminal
    pub fn resolve(self, stdout_is_tty: bool) -> OutputFormat {
        match self {
            OutputFormat::Auto if stdout_is_tty => OutputFormat::Plain,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Download,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Download => "↓",
    }
}

/// Print a styled status line to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Download => eprintln!("{} {}", icon.magenta(), msg),
    }
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Numbered summary of every photo.
pub fn render_plain(photos: &[Photo]) -> String {
    let mut out = String::new();
    for (i, photo) in photos.iter().enumerate() {
        let _ = writeln!(out, "*****************");
        let _ = writeln!(out, "Result {} out of {}:", i + 1, photos.len());
        let _ = writeln!(out, "ID: {}", photo.id);
        let _ = writeln!(
            out,
            "Description: {}",
            photo.display_description().unwrap_or("(none)")
        );
        let _ = writeln!(out, "Size: {} x {}", photo.width, photo.height);
        let _ = writeln!(out, "Number of likes: {}", photo.likes);
    }
    out
}

/// Photos as a table.
pub fn render_table(photos: &[Photo]) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["#", "ID", "Description", "Size", "Likes"]);

    for (i, photo) in photos.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&photo.id).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(
                photo.display_description().unwrap_or(""),
                50,
            )),
            Cell::new(format!("{} x {}", photo.width, photo.height)),
            Cell::new(format_number(photo.likes)),
        ]);
    }
    table.to_string()
}

/// Photos as pretty-printed JSON, unknown API fields included.
pub fn render_json(photos: &[Photo]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(photos)
}

/// Print `photos` to stdout in `format`.
pub fn output_photos(photos: &[Photo], format: OutputFormat) -> Result<(), serde_json::Error> {
    match format.resolve(is_terminal()) {
        OutputFormat::Json => println!("{}", render_json(photos)?),
        OutputFormat::Table => println!("{}", render_table(photos)),
        OutputFormat::Plain | OutputFormat::Auto => print!("{}", render_plain(photos)),
    }
    Ok(())
}

/// Format a number with commas.
pub fn format_number(n: u64) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width - 3 {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

fn style(template: &str, fallback: indicatif::ProgressStyle) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template).unwrap_or(fallback)
}

/// Loading spinner shown while a command runs.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a spinner; `visible == false` gives a no-op spinner.
    pub fn new(msg: &str, visible: bool) -> Self {
        if !visible {
            return Self {
                pb: indicatif::ProgressBar::hidden(),
            };
        }

        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            style("{spinner:.cyan} {msg}", indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.finish_with_message(format!("{} {}", status_icon(Status::Success), msg));
    }

    /// Remove the spinner from the terminal.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

/// Create a progress bar for downloads; `visible == false` gives a hidden bar.
pub fn create_progress_bar(len: u64, msg: &str, visible: bool) -> indicatif::ProgressBar {
    if !visible {
        return indicatif::ProgressBar::hidden();
    }

    let pb = indicatif::ProgressBar::new(len);
    pb.set_style(
        style(
            "{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%)",
            indicatif::ProgressStyle::default_bar(),
        )
        .progress_chars("█▓▒░ "),
    );
    pb.set_message(msg.to_string());
    pb
}
