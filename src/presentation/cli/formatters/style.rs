use colored::Colorize;

use crate::domain::value_objects::output_mode::OutputMode;
use crate::domain::value_objects::status::CheckStatus;

/// Strips ANSI/OSC escape sequences from a string to prevent terminal injection.
#[must_use]
pub fn sanitize_terminal(input: &str) -> String {
    input.chars().filter(|c| *c != '\x1b').collect()
}

/// Status label: `[WARNING]` in plain mode, emoji plus colored label otherwise.
#[must_use]
pub fn status_badge(status: CheckStatus, mode: OutputMode) -> String {
    if !mode.is_colored() {
        return format!("[{status}]");
    }
    format!("{} {}", status.emoji(), status_label(status, mode))
}

/// Bare status word, colored unless plain.
#[must_use]
pub fn status_label(status: CheckStatus, mode: OutputMode) -> String {
    let label = status.to_string();
    if !mode.is_colored() {
        return label;
    }
    match status {
        CheckStatus::Pass => label.green().bold(),
        CheckStatus::Info => label.blue(),
        CheckStatus::Warning => label.yellow().bold(),
        CheckStatus::Fail => label.red().bold(),
    }
    .to_string()
}

/// Section title underlined to its own width.
#[must_use]
pub fn section_header(title: &str, mode: OutputMode) -> String {
    let rule = "─".repeat(title.chars().count());
    if mode.is_colored() {
        format!("{}\n{}", title.bold().cyan(), rule.cyan())
    } else {
        format!("{title}\n{rule}")
    }
}

#[must_use]
pub fn dimmed(text: &str, mode: OutputMode) -> String {
    if mode.is_colored() {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}
