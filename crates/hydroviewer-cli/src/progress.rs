use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
///
/// Hidden in JSON mode so stdout carries only the result document.
pub fn create_spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Run a step behind a spinner, finishing it with the outcome
pub fn with_spinner<T, E>(
    message: &str,
    hidden: bool,
    done: impl FnOnce(&T) -> String,
    step: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let pb = create_spinner(message, hidden);
    let result = step();
    match &result {
        Ok(value) => finish_success(&pb, &done(value)),
        Err(_) => finish_error(&pb, message.trim_end_matches("...")),
    }
    result
}
