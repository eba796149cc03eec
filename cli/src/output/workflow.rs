//! GitHub Actions workflow commands.
//!
//! See "Workflow commands for GitHub Actions": command data must have `%`,
//! `\r` and `\n` percent-encoded or the runner truncates the message.

/// Escapes a message for use as workflow command data.
#[must_use]
pub fn escape_data(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error::<msg>` — fails the step with an annotation.
#[must_use]
pub fn error_command(msg: &str) -> String {
    format!("::error::{}", escape_data(msg))
}
