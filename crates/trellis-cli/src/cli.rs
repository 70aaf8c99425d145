//! Command-line interface for the trellis utility
//!
//! Inspects the containment model: lists node kinds, runs the worked
//! translate-and-duplicate scenario, and checks snapshot files.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::colorize_tree;
use trellis::builder::{BuilderConfig, DiagramBuilder};
use trellis::core::logging::init_logging;
use trellis::{
    sample_diagram, validate, DiagramElement, DiagramSnapshot, NodeKind, NodeSnapshot, Violation,
};

/// Trellis - inspect diagram containment trees
#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Inspect and check diagram node containment trees")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show node kinds and how they nest
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Build a package holding a class, translate the package and duplicate it
    Scenario {
        /// Emit the resulting snapshots as JSON
        #[arg(long)]
        json: bool,

        /// Horizontal translation applied to the package
        #[arg(long, default_value_t = 5, allow_hyphen_values = true)]
        dx: i32,

        /// Vertical translation applied to the package
        #[arg(long, default_value_t = 5, allow_hyphen_values = true)]
        dy: i32,

        /// Output file for the report (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Restore a JSON diagram snapshot and report whether it is consistent
    Check {
        /// Input file containing the snapshot (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Skip the diagram type's nesting rules
        #[arg(long)]
        lenient: bool,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Result of the translate-and-duplicate scenario
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub diagram: DiagramSnapshot,
    pub duplicate: NodeSnapshot,
    pub duplicate_attached: bool,
    pub violations: Vec<String>,
}

impl ScenarioReport {
    /// Run the scenario: package at (0, 0) holding a class at (10, 10),
    /// translate the package by `(dx, dy)`, then duplicate it
    pub fn run(dx: i32, dy: i32) -> Result<Self> {
        let (builder, package, _class) = sample_diagram()?;
        package.translate(dx, dy);
        let copy = package.duplicate();

        let violations: Vec<Violation> = validate(builder.diagram());
        Ok(Self {
            diagram: builder.diagram().snapshot(),
            duplicate: copy.snapshot(),
            duplicate_attached: copy.diagram().is_some(),
            violations: violations.iter().map(ToString::to_string).collect(),
        })
    }

    pub fn to_text(&self) -> String {
        let mut text = self.diagram.to_string();
        text.push_str(if self.duplicate_attached {
            "duplicate (attached):\n"
        } else {
            "duplicate (detached):\n"
        });
        text.push_str(&self.duplicate.to_string());
        if self.violations.is_empty() {
            text.push_str("no violations\n");
        } else {
            for violation in &self.violations {
                text.push_str(&format!("violation: {}\n", violation));
            }
        }
        text
    }
}

/// Main CLI application
pub struct TrellisApp {
    config: BuilderConfig,
}

impl TrellisApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create a new application instance with a builder config
    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("TRELLIS_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("TRELLIS_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Trellis v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Types { json } => self.types_command(json, cli.verbose),
            Commands::Scenario {
                json,
                dx,
                dy,
                output,
                color,
            } => self.scenario_command(json, dx, dy, output, color, cli.verbose),
            Commands::Check { input, lenient } => {
                self.check_command(input, lenient, cli.verbose).map(|_| ())
            }
        }
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing node kinds");
        }

        if json {
            let kinds: Vec<serde_json::Value> = NodeKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "name": kind.as_str(),
                        "container": kind.is_container(),
                        "requires_parent": kind.requires_parent(),
                    })
                })
                .collect();
            let types = serde_json::json!({
                "node_kinds": kinds,
                "total": NodeKind::ALL.len(),
            });
            println!("{}", serde_json::to_string_pretty(&types)?);
        } else {
            println!("Node kinds:");
            for kind in NodeKind::ALL {
                let role = if kind.is_container() {
                    "container"
                } else if kind.requires_parent() {
                    "requires parent"
                } else {
                    "leaf"
                };
                println!("  {:<20} {}", kind.as_str(), role);
            }
            println!();
            println!("Total: {} node kinds", NodeKind::ALL.len());
        }

        Ok(())
    }

    /// Handle the scenario command
    fn scenario_command(
        &self,
        json: bool,
        dx: i32,
        dy: i32,
        output: Option<PathBuf>,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let report = ScenarioReport::run(dx, dy)?;
        info!(dx, dy, violations = report.violations.len(), "Ran scenario");

        if verbose {
            eprintln!(
                "Scenario produced {} nodes and {} violations",
                report.diagram.node_count(),
                report.violations.len()
            );
        }

        let rendered = if json {
            serde_json::to_string_pretty(&report)?
        } else if self.should_colorize(&output, color) {
            colorize_tree(&report.to_text())
        } else {
            report.to_text()
        };
        self.write_output(output, &rendered)?;

        if report.violations.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Scenario left {} violations", report.violations.len()))
        }
    }

    /// Handle the check command, returning the restored builder on success
    fn check_command(
        &self,
        input: Option<PathBuf>,
        lenient: bool,
        verbose: bool,
    ) -> Result<DiagramBuilder> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let snapshot: DiagramSnapshot = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse diagram snapshot: {}", e))?;
        debug!(
            diagram_type = %snapshot.diagram_type,
            nodes = snapshot.node_count(),
            lenient,
            "Parsed snapshot"
        );

        let config = BuilderConfig {
            enforce_kind_policy: self.config.enforce_kind_policy && !lenient,
            ..self.config
        };
        match DiagramBuilder::restore(&snapshot, config) {
            Ok(builder) => {
                builder.diagram().check()?;
                println!(
                    "✓ Valid {} diagram ({} nodes)",
                    snapshot.diagram_type,
                    builder.diagram().node_count()
                );
                Ok(builder)
            }
            Err(e) => {
                println!("✗ Invalid {} diagram: {}", snapshot.diagram_type, e);
                Err(e.into())
            }
        }
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for TrellisApp {
    fn default() -> Self {
        Self::new()
    }
}
