//! Output formatting module

pub mod reporter;
pub mod styles;
pub mod workflow;

use std::io::Write;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    ///
    /// Runner logs are not a TTY but render ANSI colors, so colors are on
    /// under GitHub Actions as well as on a terminal.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let in_actions = std::env::var_os("GITHUB_ACTIONS").is_some();
        let use_colors = !no_color && (is_tty || in_actions) && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line("✓", self.styles.success, msg));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line("⚠", self.styles.warning, msg));
        }
    }

    /// Report a fatal error: a workflow `::error::` command on stdout, which
    /// marks the job failed in the runner UI, plus a styled line on stderr.
    /// Never suppressed.
    pub fn fail(&self, msg: &str) {
        let _ = self.write_failure(&mut std::io::stdout(), &mut std::io::stderr(), msg);
    }

    /// Writes the two failure lines to the given streams.
    ///
    /// # Errors
    ///
    /// Returns an error if either stream cannot be written.
    pub fn write_failure(
        &self,
        out: &mut impl Write,
        err: &mut impl Write,
        msg: &str,
    ) -> std::io::Result<()> {
        writeln!(out, "{}", workflow::error_command(msg))?;
        writeln!(err, "{}", self.line("✗", self.styles.error, msg))
    }

    /// One indented status line: `  <symbol> <msg>`.
    #[must_use]
    pub fn line(&self, symbol: &str, style: Style, msg: &str) -> String {
        format!("  {} {msg}", symbol.style(style))
    }
}
