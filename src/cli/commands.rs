use crate::config::GeneratorConfig;
use crate::error::WireError;
use crate::generator::{clean, expand_inputs};
use crate::linter::{has_errors, print_lint_issues, LintIssue, LintSeverity};
use crate::logging::{init_logging, LogConfig};
use crate::metadata::{Middleware, ModuleMetadata, ParserDefinition};
use crate::pipeline::Pipeline;
use crate::validator::print_violations;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Command-line interface for brrtwire
///
/// Scans doc-comment directives in Rust modules and generates the wiring
/// code that connects controllers, services, middleware and route parsers.
#[derive(Parser)]
#[command(name = "brrtwire-gen", version)]
#[command(about = "brrtwire wiring generator", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for brrtwire
#[derive(Subcommand)]
pub enum Commands {
    /// Generate `*.wire.rs` files for the given modules
    Generate {
        /// Module files, directories, or recursive patterns (`src/...`)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Crate the modules live under (default: read from Cargo.toml)
        #[arg(long)]
        root_import: Option<String>,

        /// Validation worker threads (default: BRRTWIRE_JOBS or CPU count)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Perform a dry run: show what would be written without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Do not run rustfmt over generated files
        #[arg(long, default_value_t = false)]
        no_format: bool,
    },
    /// Remove every generated file below a directory
    ///
    /// Dot-directories, `target/` and `vendor/` are never entered.
    Clean {
        /// Directory to clean
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// List the files that would be removed without removing them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Lint directives without generating anything
    ///
    /// Reports every unresolved parser or middleware reference as an error,
    /// plus advisory warnings:
    /// - handler casing (must be snake_case)
    /// - path parameters without a handler argument
    /// - controllers without routes
    /// - middleware `-Priority` without `-Global`
    /// - transient services injected without a factory
    Lint {
        /// Module files, directories, or recursive patterns (`src/...`)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Crate the modules live under (default: read from Cargo.toml)
        #[arg(long)]
        root_import: Option<String>,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Print scanned metadata and registries as JSON
    Inspect {
        /// Module files, directories, or recursive patterns (`src/...`)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Crate the modules live under (default: read from Cargo.toml)
        #[arg(long)]
        root_import: Option<String>,

        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    modules: &'a [ModuleMetadata],
    parsers: Vec<&'a ParserDefinition>,
    middleware: Vec<&'a Middleware>,
}

/// Parse process arguments, set up logging and execute the command.
///
/// # Errors
///
/// Returns an error if:
/// - An input path does not exist or is not a Rust module
/// - Scanning, registration, validation or emission fails
/// - `lint --fail-on-error` finds error-level issues
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_env().with_verbosity(cli.verbose);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: {e}");
    }
    run(cli)
}

/// Execute an already parsed command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            paths,
            root_import,
            jobs,
            dry_run,
            no_format,
        } => {
            let config = GeneratorConfig {
                dry_run,
                format: !no_format,
                ..GeneratorConfig::from_env().with_overrides(root_import, jobs)
            };
            let modules = expand_inputs(&paths)?;
            let mut pipeline = Pipeline::with_template_emitter(config);
            let report = pipeline.run(&modules)?;

            for path in &report.emitted {
                if dry_run {
                    println!("📝 Would write: {}", path.display());
                } else {
                    println!("✅ Generated: {}", path.display());
                }
            }
            println!(
                "{} module(s) scanned, {} file(s) {}, {} skipped, {} warning(s)",
                report.modules_scanned,
                report.emitted.len(),
                if dry_run { "planned" } else { "written" },
                report.skipped.len(),
                report.warnings.len()
            );
            Ok(())
        }
        Commands::Clean { dir, dry_run } => {
            let removed = clean(&dir, dry_run)?;
            for path in &removed {
                if dry_run {
                    println!("🧹 Would remove: {}", path.display());
                } else {
                    println!("🧹 Removed: {}", path.display());
                }
            }
            println!("{} generated file(s) {}", removed.len(), if dry_run { "found" } else { "removed" });
            Ok(())
        }
        Commands::Lint {
            paths,
            root_import,
            fail_on_error,
            errors_only,
        } => {
            let config = GeneratorConfig::from_env().with_overrides(root_import, None);
            let modules = expand_inputs(&paths)?;
            let mut pipeline = Pipeline::with_template_emitter(config);
            let mut issues = match pipeline.discover(&modules) {
                Ok(()) => pipeline.lint_issues()?,
                Err(err) => {
                    let mut issues = vec![LintIssue::from_error(&err)];
                    issues.extend(pipeline.warnings().iter().cloned());
                    issues
                }
            };

            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);
            if fail_on_error && has_errors(&issues) {
                anyhow::bail!(
                    "lint found {} error(s)",
                    issues.iter().filter(|i| i.severity == LintSeverity::Error).count()
                );
            }
            Ok(())
        }
        Commands::Inspect {
            paths,
            root_import,
            pretty,
        } => {
            let config = GeneratorConfig::from_env().with_overrides(root_import, None);
            let modules = expand_inputs(&paths)?;
            let mut pipeline = Pipeline::with_template_emitter(config);
            pipeline.discover(&modules)?;
            let registries = pipeline.registries();
            let output = InspectOutput {
                modules: pipeline.modules(),
                parsers: registries.parsers.iter().collect(),
                middleware: registries.middlewares.iter().collect(),
            };
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{json}");
            Ok(())
        }
    }
}

/// Print a command failure to stderr, with diagnostics for wiring errors.
pub fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<WireError>() {
        Some(wire) => print_violations(std::slice::from_ref(wire)),
        None => eprintln!("Error: {err:#}"),
    }
}
