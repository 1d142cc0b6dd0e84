//! Output control module with structured, verbosity-aware logging

use crate::engine::CommandOutput;
use std::time::{Duration, Instant};

/// Placeholder printed in place of secrets
pub const REDACTED: &str = "****";

#[derive(Clone, Debug)]
pub struct OutputManager {
    pub verbose: bool,
    quiet: bool,
    /// Send progress to stderr, keeping stdout for machine-readable output
    diagnostics_to_stderr: bool,
    start_time: Option<Instant>,
}

impl OutputManager {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            diagnostics_to_stderr: false,
            start_time: Some(Instant::now()),
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            diagnostics_to_stderr: false,
            start_time: Some(Instant::now()),
        }
    }

    /// Route everything except explicit reports to stderr
    pub fn with_diagnostics_to_stderr(mut self) -> Self {
        self.diagnostics_to_stderr = true;
        self
    }

    fn emit(&self, line: &str) {
        if self.diagnostics_to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Machine-readable report; the only output that always goes to stdout
    pub fn report(&self, body: &str) {
        println!("{}", body);
    }

    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_with_timestamp("DEBUG", message);
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.print_with_timestamp("INFO", message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("INFO", message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("SUCCESS", message);
        }
    }

    /// Errors always go to stderr, quiet or not
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.decorate("ERROR", &format!("Error: {}", message)));
    }

    /// Section banner, e.g. `=== Success! ===`
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.emit(&format!("=== {} ===", title));
        }
    }

    pub fn blank(&self) {
        if !self.quiet {
            self.emit("");
        }
    }

    pub fn step(&self, step: &str) {
        if self.verbose {
            self.emit(&format!("    🔸 {}", step));
        }
    }

    pub fn detail(&self, detail: &str) {
        if self.verbose {
            self.emit(&format!("      📝 {}", detail));
        }
    }

    /// Echo an engine invocation before it runs, hiding `secret` if given
    pub fn command(&self, program: &str, args: &[String], secret: Option<&str>) {
        if self.quiet {
            return;
        }
        let line = format!("{} {}", program, args.join(" "));
        self.emit(&format!("Running: {}", redact(&line, secret)));
    }

    /// Forward captured engine output: stdout to stdout, stderr to stderr
    pub fn command_output(&self, output: &CommandOutput, secret: Option<&str>) {
        if self.quiet {
            return;
        }
        if !output.stdout.trim().is_empty() {
            self.emit(&redact(output.stdout.trim_end(), secret));
        }
        if !output.stderr.trim().is_empty() {
            eprintln!("{}", redact(output.stderr.trim_end(), secret));
        }
    }

    fn decorate(&self, level: &str, message: &str) -> String {
        match (self.verbose, self.start_time) {
            (true, Some(start_time)) => format!(
                "[{:8.3}s] {} {}",
                start_time.elapsed().as_secs_f64(),
                level,
                message
            ),
            _ => message.to_string(),
        }
    }

    fn print_with_timestamp(&self, level: &str, message: &str) {
        self.emit(&self.decorate(level, message));
    }

    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }

    pub fn summary(&self, title: &str, items: &[(&str, String)]) {
        if self.quiet {
            return;
        }

        self.emit(&format!("\n📊 {}", title));
        for (key, value) in items {
            self.emit(&format!("  • {}: {}", key, value));
        }
    }

    pub fn elapsed_time(&self) -> String {
        if let Some(start_time) = self.start_time {
            self.format_duration(start_time.elapsed())
        } else {
            "Unknown".to_string()
        }
    }
}

/// Replace each occurrence of `secret` in `text` that stands as a whole word,
/// so a short token does not mask parts of unrelated words
pub fn redact(text: &str, secret: Option<&str>) -> String {
    let secret = match secret {
        Some(secret) if !secret.is_empty() => secret,
        _ => return text.to_string(),
    };

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in text.match_indices(secret) {
        if start < last {
            continue;
        }
        let end = start + secret.len();
        let bounded_before = !text[..start].chars().next_back().is_some_and(is_word);
        let bounded_after = !text[end..].chars().next().is_some_and(is_word);
        if bounded_before && bounded_after {
            result.push_str(&text[last..start]);
            result.push_str(REDACTED);
            last = end;
        }
    }
    result.push_str(&text[last..]);
    result
}
