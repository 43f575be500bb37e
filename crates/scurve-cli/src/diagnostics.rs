//! Diagnostic formatting for CLI output
//!
//! This module implements diagnostic emitters for different output formats:
//! - `TerminalEmitter`: rustc-style output to stderr
//! - `JsonEmitter`: machine-readable JSON output
//!
//! Both emitters support:
//! - `--strict` mode: escalates warnings to errors, hints to warnings
//! - `--quiet` mode: suppresses all output except errors
//! - Path normalization for reproducible test output
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings/hints/info allowed) |
//! | 1 | Failure: one or more errors emitted, or invalid input |
//!
//! ### Policy Effects
//!
//! - **Default mode**: exit code determined by native errors only
//! - **`--strict` mode**: warnings escalate to errors, hints to warnings.
//!   Every schedule has root activities (W001), so strict runs fail unless
//!   `report_roots = false` is set in `scurve.toml`.
//! - **`--quiet` mode**: does NOT affect exit code, only output visibility
//! - **`--format json`**: exit code semantics identical to text mode

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use scurve_core::{Diagnostic, DiagnosticEmitter, Severity};
use serde::Serialize;

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: no errors (warnings/hints/info allowed)
    Success = 0,
    /// Failure: one or more errors emitted
    Failure = 1,
}

impl ExitCode {
    /// Determine exit code from an error count that already reflects policy
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, ExitCode::Failure)
    }

    /// Get the numeric value
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Diagnostic Config
// ============================================================================

/// Configuration for diagnostic output
#[derive(Debug, Clone, Default)]
pub struct DiagnosticConfig {
    /// Escalate severities: warnings become errors, hints become warnings
    pub strict: bool,
    /// Suppress all output except errors
    pub quiet: bool,
    /// Base path to strip from file paths
    pub base_path: Option<PathBuf>,
}

impl DiagnosticConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Default::default()
        }
    }

    /// Set the base path for path normalization
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Escalate severity according to strict mode rules
    pub fn effective_severity(&self, severity: Severity) -> Severity {
        if self.strict {
            match severity {
                Severity::Warning => Severity::Error,
                Severity::Hint => Severity::Warning,
                s => s,
            }
        } else {
            severity
        }
    }

    /// Quiet mode shows errors only
    pub fn should_show(&self, severity: Severity) -> bool {
        !self.quiet || self.effective_severity(severity) == Severity::Error
    }

    /// Normalize a file path for output
    pub fn normalize_path(&self, path: &Path) -> String {
        if let Some(base) = &self.base_path {
            if let Ok(stripped) = path.strip_prefix(base) {
                return stripped.display().to_string();
            }
        }
        path.display().to_string()
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// Terminal emitter that writes rustc-style diagnostics
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    source: Option<PathBuf>,
    error_count: usize,
    warning_count: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            source: None,
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Schedule file that row numbers refer to
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Exit code based on the diagnostics emitted so far, after policy
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        let effective_severity = self.config.effective_severity(diagnostic.severity);

        // Counted even when quiet hides the output
        match effective_severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            _ => {}
        }

        if !self.config.should_show(diagnostic.severity) {
            return Ok(());
        }

        // Header line: severity[CODE]: message
        writeln!(
            self.writer,
            "{}[{}]: {}",
            effective_severity.as_str(),
            diagnostic.code.as_str(),
            diagnostic.message
        )?;

        // Source location: --> file:line
        if let Some(file) = &self.source {
            let normalized_path = self.config.normalize_path(file);
            match diagnostic.line {
                Some(line) => writeln!(self.writer, "  --> {normalized_path}:{line}")?,
                None => writeln!(self.writer, "  --> {normalized_path}")?,
            }
        }

        if !diagnostic.notes.is_empty() || diagnostic.task.is_some() {
            writeln!(self.writer, "   |")?;
            if let Some(task) = &diagnostic.task {
                writeln!(self.writer, "   = task: {task}")?;
            }
            for note in &diagnostic.notes {
                writeln!(self.writer, "   = {note}")?;
            }
        }

        for hint in &diagnostic.hints {
            writeln!(self.writer, "   = hint: {hint}")?;
        }

        writeln!(self.writer)?;

        Ok(())
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        // stderr may be closed
        let _ = self.write_diagnostic(&diagnostic);
    }
}

// ============================================================================
// JSON
// ============================================================================

/// JSON emitter that collects diagnostics in machine-readable form
pub struct JsonEmitter {
    diagnostics: Vec<JsonDiagnostic>,
    config: DiagnosticConfig,
    source: Option<PathBuf>,
    error_count: usize,
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub code: String,
    pub severity: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl JsonEmitter {
    pub fn new(config: DiagnosticConfig) -> Self {
        Self {
            diagnostics: Vec::new(),
            config,
            source: None,
            error_count: 0,
        }
    }

    /// Schedule file that row numbers refer to
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Get collected diagnostics
    pub fn diagnostics(&self) -> &[JsonDiagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Exit code based on the diagnostics collected so far, after policy
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    /// Convert to a JSON value for inclusion in command output
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.diagnostics).unwrap_or(serde_json::Value::Null)
    }
}

impl DiagnosticEmitter for JsonEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let effective_severity = self.config.effective_severity(diagnostic.severity);
        if effective_severity == Severity::Error {
            self.error_count += 1;
        }

        if !self.config.should_show(diagnostic.severity) {
            return;
        }

        let json_diagnostic = JsonDiagnostic {
            code: diagnostic.code.as_str().to_string(),
            severity: effective_severity.as_str().to_string(),
            message: diagnostic.message,
            file: self.source.as_ref().map(|p| self.config.normalize_path(p)),
            line: diagnostic.line,
            task: diagnostic.task,
            notes: diagnostic.notes,
            hints: diagnostic.hints,
        };

        self.diagnostics.push(json_diagnostic);
    }
}
