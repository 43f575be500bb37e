//! scurve CLI - Schedule Analytics
//!
//! Command-line interface for checking schedule exports, analyzing them and
//! exporting workbooks, charts and printable reports.

mod config;
mod diagnostics;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scurve_core::{
    parse_user_date, Analysis, AnalysisConfig, DateWindow, Diagnostic, DiagnosticEmitter,
    Distribution, InputError, Renderer,
};
use scurve_render::{ExcelRenderer, HtmlReportRenderer, SvgCurveRenderer, TextRenderer};
use scurve_solver::{resolve_window, Analyzer, CriticalPathEngine};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::diagnostics::{DiagnosticConfig, ExitCode, JsonEmitter, TerminalEmitter};

#[derive(Parser)]
#[command(name = "scurve")]
#[command(author, version, about = "Schedule analytics: critical path, S-curve and activity windows", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./scurve.toml when present)
    #[arg(short, long, global = true, env = "SCURVE_CONFIG")]
    config: Option<PathBuf>,

    /// Escalate warnings to errors and hints to warnings
    #[arg(long, global = true)]
    strict: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schedule and validate its dependencies
    Check {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute the critical path, S-curve and activity windows
    Analyze {
        #[command(flatten)]
        args: AnalysisArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a workbook, a chart and/or a printable report
    Export {
        #[command(flatten)]
        args: AnalysisArgs,

        #[command(flatten)]
        targets: ExportTargets,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DistributionArg {
    Weekly,
    Daily,
}

impl From<DistributionArg> for Distribution {
    fn from(arg: DistributionArg) -> Self {
        match arg {
            DistributionArg::Weekly => Distribution::Weekly,
            DistributionArg::Daily => Distribution::Daily,
        }
    }
}

/// Input file and user parameters shared by `analyze` and `export`
#[derive(Args)]
struct AnalysisArgs {
    /// Input file path
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Start of the reporting window (dd/mm/yyyy)
    #[arg(short, long)]
    start: String,

    /// End of the reporting window (dd/mm/yyyy); defaults to the latest end date
    #[arg(short, long)]
    end: Option<String>,

    /// Status date for the activity filters (dd/mm/yyyy); defaults to today
    #[arg(short, long)]
    today: Option<String>,

    /// How task progress is spread over the weeks (overrides scurve.toml)
    #[arg(long, value_enum)]
    distribution: Option<DistributionArg>,

    /// Resolve numeric predecessors to the task on that row
    #[arg(long)]
    resolve_row_numbers: bool,
}

/// Validated user dates
struct UserDates {
    start: NaiveDate,
    end: Option<NaiveDate>,
    today: NaiveDate,
}

impl AnalysisArgs {
    /// Validate the user dates before touching the schedule
    fn dates(&self) -> Result<UserDates, InputError> {
        let start = parse_user_date(&self.start)?;
        let end = self.end.as_deref().map(parse_user_date).transpose()?;
        if let Some(end) = end {
            DateWindow::new(start, end)?;
        }
        let today = match self.today.as_deref() {
            Some(text) => parse_user_date(text)?,
            None => chrono::Local::now().date_naive(),
        };
        Ok(UserDates { start, end, today })
    }

    /// Apply command-line overrides on top of the file configuration
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(distribution) = self.distribution {
            config.progress.distribution = distribution.into();
        }
        if self.resolve_row_numbers {
            config.parser.resolve_row_numbers = true;
        }
    }
}

#[derive(Args)]
struct ExportTargets {
    /// Excel workbook output path
    #[arg(long, value_name = "PATH")]
    xlsx: Option<PathBuf>,

    /// Printable HTML report output path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// S-curve chart (SVG) output path
    #[arg(long, value_name = "PATH")]
    svg: Option<PathBuf>,

    /// Report title (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,
}

impl ExportTargets {
    fn is_empty(&self) -> bool {
        self.xlsx.is_none() && self.report.is_none() && self.svg.is_none()
    }
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let diagnostic_config = DiagnosticConfig {
        strict: cli.strict,
        quiet: cli.quiet,
        base_path: None,
    };

    let Some(command) = cli.command else {
        println!("scurve - Schedule Analytics");
        println!("Run with --help for usage information");
        return Ok(ExitCode::Success);
    };

    let mut config = config::load(cli.config.as_deref())?;

    match command {
        Commands::Check { file, format } => cmd_check(&file, format, &config, diagnostic_config),
        Commands::Analyze {
            args,
            format,
            output,
        } => {
            args.apply(&mut config);
            cmd_analyze(&args, format, output.as_deref(), &config, diagnostic_config)
        }
        Commands::Export { args, targets } => {
            args.apply(&mut config);
            cmd_export(&args, &targets, &config, diagnostic_config)
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_check(
    file: &Path,
    format: OutputFormat,
    config: &AnalysisConfig,
    diagnostic_config: DiagnosticConfig,
) -> Result<ExitCode> {
    let quiet = diagnostic_config.quiet;
    let engine = CriticalPathEngine::new();

    match format {
        OutputFormat::Text => {
            let mut emitter =
                TerminalEmitter::new(std::io::stderr(), diagnostic_config).with_source(file);
            let schedule = scurve_parser::parse_file(file, config, &mut emitter)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            let critical_path = engine.compute(&schedule, &mut emitter);

            if !quiet {
                println!(
                    "{}: {} tasks, {} root activities, critical path of {} tasks",
                    file.display(),
                    schedule.len(),
                    critical_path.roots.len(),
                    critical_path.path.len(),
                );
            }
            Ok(emitter.exit_code())
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(diagnostic_config).with_source(file);
            let schedule = scurve_parser::parse_file(file, config, &mut emitter)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            let critical_path = engine.compute(&schedule, &mut emitter);

            let value = serde_json::json!({
                "file": file.display().to_string(),
                "tasks": schedule.len(),
                "critical_path": critical_path,
                "diagnostics": emitter.to_json_value(),
            });
            write_output(None, &serde_json::to_string_pretty(&value)?)?;
            Ok(emitter.exit_code())
        }
    }
}

fn cmd_analyze(
    args: &AnalysisArgs,
    format: OutputFormat,
    output: Option<&Path>,
    config: &AnalysisConfig,
    diagnostic_config: DiagnosticConfig,
) -> Result<ExitCode> {
    let (rendered, exit_code) = match format {
        OutputFormat::Text => {
            let mut emitter =
                TerminalEmitter::new(std::io::stderr(), diagnostic_config).with_source(&args.file);
            let analysis = run_analysis(args, config, &mut emitter)?;
            (TextRenderer.render(&analysis)?, emitter.exit_code())
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(diagnostic_config).with_source(&args.file);
            let analysis = run_analysis(args, config, &mut emitter)?;
            let value = serde_json::json!({
                "file": args.file.display().to_string(),
                "tasks": analysis.schedule.len(),
                "window": analysis.window,
                "critical_path": analysis.critical_path,
                "timeline": analysis.timeline,
                "activities": analysis.activities,
                "diagnostics": emitter.to_json_value(),
            });
            (serde_json::to_string_pretty(&value)?, emitter.exit_code())
        }
    };

    write_output(output, &rendered)?;
    Ok(exit_code)
}

fn cmd_export(
    args: &AnalysisArgs,
    targets: &ExportTargets,
    config: &AnalysisConfig,
    diagnostic_config: DiagnosticConfig,
) -> Result<ExitCode> {
    if targets.is_empty() {
        bail!("nothing to export: pass --xlsx, --report or --svg");
    }
    let quiet = diagnostic_config.quiet;

    let mut emitter =
        TerminalEmitter::new(std::io::stderr(), diagnostic_config).with_source(&args.file);
    let analysis = run_analysis(args, config, &mut emitter)?;

    let title = targets.title.clone().unwrap_or_else(|| {
        args.file
            .file_stem()
            .map_or_else(|| "Cronograma".to_string(), |s| s.to_string_lossy().into_owned())
    });

    // A failed target does not skip the remaining ones
    let mut failed = false;
    let mut outputs: Vec<(&Path, Result<Vec<u8>>)> = Vec::new();

    if let Some(path) = &targets.xlsx {
        outputs.push((path.as_path(), ExcelRenderer::new().render(&analysis).map_err(Into::into)));
    }
    if let Some(path) = &targets.svg {
        let svg = SvgCurveRenderer::new().render(&analysis);
        outputs.push((path.as_path(), svg.map(String::into_bytes).map_err(Into::into)));
    }
    if let Some(path) = &targets.report {
        let html = HtmlReportRenderer::new(title).render(&analysis);
        outputs.push((path.as_path(), html.map(String::into_bytes).map_err(Into::into)));
    }

    for (path, rendered) in outputs {
        match rendered.and_then(|bytes| write_file(path, &bytes)) {
            Ok(()) if !quiet => println!("Wrote {}", path.display()),
            Ok(()) => {}
            Err(err) => {
                eprintln!("error: cannot export {}: {err:#}", path.display());
                failed = true;
            }
        }
    }

    if failed {
        return Ok(ExitCode::Failure);
    }
    Ok(emitter.exit_code())
}

// ============================================================================
// Helpers
// ============================================================================

/// Validate the user dates, parse the schedule and analyze it.
///
/// Parse diagnostics are merged in front of the analysis diagnostics so the
/// exported views list every condition found.
fn run_analysis(
    args: &AnalysisArgs,
    config: &AnalysisConfig,
    emitter: &mut impl DiagnosticEmitter,
) -> Result<Analysis> {
    let dates = args.dates()?;

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut sink = (&mut diagnostics, &mut *emitter);
    let schedule = scurve_parser::parse_file(&args.file, config, &mut sink)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let window = resolve_window(&schedule, dates.start, dates.end)?;
    debug!(start = %window.start, end = %window.end, today = %dates.today, "reporting window");

    let mut analysis = Analyzer::new(config).analyze(schedule, window, dates.today, emitter);
    diagnostics.append(&mut analysis.diagnostics);
    analysis.diagnostics = diagnostics;

    Ok(analysis)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => write_file(path, content.as_bytes()),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
            Ok(())
        }
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: &str, end: Option<&str>, today: Option<&str>) -> AnalysisArgs {
        AnalysisArgs {
            file: PathBuf::from("cronograma.csv"),
            start: start.to_string(),
            end: end.map(str::to_string),
            today: today.map(str::to_string),
            distribution: None,
            resolve_row_numbers: false,
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn dates_are_validated_before_parsing() {
        let dates = args("04/03/2024", Some("18/03/2024"), Some("11/03/2024"))
            .dates()
            .unwrap();
        assert_eq!(dates.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(dates.end, NaiveDate::from_ymd_opt(2024, 3, 18));

        assert!(matches!(
            args("18/03/2024", Some("04/03/2024"), None).dates(),
            Err(InputError::EndNotAfterStart { .. })
        ));
        assert!(matches!(
            args("04/03/2024", Some("04/03/2024"), None).dates(),
            Err(InputError::EndNotAfterStart { .. })
        ));
        assert!(matches!(
            args("31/02/2024", None, None).dates(),
            Err(InputError::InvalidDate(_))
        ));
        assert!(matches!(
            args("04/03/2024", None, Some("amanhã")).dates(),
            Err(InputError::InvalidDate(_))
        ));
    }

    #[test]
    fn overrides_apply_on_top_of_file_config() {
        let mut config = AnalysisConfig::default();
        let mut cli_args = args("04/03/2024", None, None);
        cli_args.distribution = Some(DistributionArg::Daily);
        cli_args.resolve_row_numbers = true;

        cli_args.apply(&mut config);

        assert_eq!(config.progress.distribution, Distribution::Daily);
        assert!(config.parser.resolve_row_numbers);
    }

    #[test]
    fn export_needs_a_target() {
        let targets = ExportTargets {
            xlsx: None,
            report: None,
            svg: None,
            title: Some("Obra".into()),
        };
        assert!(targets.is_empty());
    }
}
