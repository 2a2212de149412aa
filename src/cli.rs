//! CLI definition for Stackforge.
//!
//! Argument parsing lives here; command implementations live in `main.rs`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

/// Stackforge - declarative infrastructure definitions
///
/// Builds typed cloud resource declarations, validates their reference
/// graph, and synthesizes a CloudFormation template for a provisioning
/// engine to apply.
#[derive(Parser, Debug, Clone)]
#[command(name = "stackforge")]
#[command(author = "Stackforge Contributors")]
#[command(version)]
#[command(about = "Synthesize declarative infrastructure into CloudFormation templates", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "STACKFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the stack and write the cloud assembly
    Synth(SynthArgs),
    /// Check that every reference resolves and the graph is acyclic
    Validate,
    /// List resource declarations with their dependencies
    List,
    /// Show the provisioning order, or the graph in Graphviz form
    Graph(GraphArgs),
}

/// Arguments for `synth`.
#[derive(clap::Args, Debug, Clone)]
pub struct SynthArgs {
    /// Assembly output directory (overrides config)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Print the template as JSON to stdout instead of writing files
    #[arg(long)]
    pub json: bool,

    /// Print the template as YAML to stdout instead of writing files
    #[arg(long, conflicts_with = "json")]
    pub yaml: bool,
}

/// Arguments for `graph`.
#[derive(clap::Args, Debug, Clone)]
pub struct GraphArgs {
    /// Emit Graphviz dot instead of the provisioning order
    #[arg(long)]
    pub dot: bool,
}

/// Prints a success line.
pub fn success(message: &str) {
    println!("{} {}", "ok:".green().bold(), message);
}

/// Prints an informational line.
pub fn info(message: &str) {
    println!("{}", message);
}

/// Prints an error line to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}
