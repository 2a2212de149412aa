//! Stackforge - declarative infrastructure definitions in Rust
//!
//! This is the main entry point for the Stackforge CLI.

mod cli;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, GraphArgs, SynthArgs};
use config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stackforge::blueprints;
use stackforge::graph::ResourceGraph;
use stackforge::stack::Stack;
use stackforge::synth::Synthesizer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_ref()).unwrap_or_else(|e| {
        if cli.verbose >= 1 {
            eprintln!("Warning: Failed to load config: {e}");
        }
        Config::default()
    });

    let stack = match blueprints::wordpress(&config.wordpress_params()) {
        Ok(stack) => stack,
        Err(e) => {
            cli::error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    };

    let exit_code = match &cli.command {
        Commands::Synth(args) => synth(args, &config, &stack)?,
        Commands::Validate => validate(&stack),
        Commands::List => list(&stack),
        Commands::Graph(args) => graph(args, &stack),
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn synth(args: &SynthArgs, config: &Config, stack: &Stack) -> Result<i32> {
    if args.json || args.yaml {
        let template = match Synthesizer::render(stack) {
            Ok(template) => template,
            Err(e) => {
                cli::error(&e.to_string());
                return Ok(e.exit_code());
            }
        };
        let rendered = if args.json {
            template.to_json()
        } else {
            template.to_yaml()
        };
        match rendered {
            Ok(text) => {
                println!("{text}");
                Ok(0)
            }
            Err(e) => {
                cli::error(&e.to_string());
                Ok(e.exit_code())
            }
        }
    } else {
        let out_dir = args
            .output
            .clone()
            .unwrap_or_else(|| config.synth.output_dir.clone());
        let mut synthesizer = Synthesizer::new(out_dir);
        if let Some(region) = &config.synth.region {
            synthesizer = synthesizer.with_region(region.as_str());
        }
        match synthesizer.synthesize(stack) {
            Ok(assembly) => {
                cli::success(&format!(
                    "synthesized stack '{}' ({} resources) to {}",
                    stack.name(),
                    stack.len(),
                    assembly.template_path.display()
                ));
                Ok(0)
            }
            Err(e) => {
                cli::error(&e.to_string());
                Ok(e.exit_code())
            }
        }
    }
}

fn validate(stack: &Stack) -> i32 {
    match Synthesizer::validate(stack) {
        Ok(()) => {
            cli::success(&format!(
                "stack '{}' is valid: {} resources, all references resolve, no cycles",
                stack.name(),
                stack.len()
            ));
            0
        }
        Err(e) => {
            cli::error(&e.to_string());
            e.exit_code()
        }
    }
}

fn list(stack: &Stack) -> i32 {
    let graph = ResourceGraph::from_stack(stack);
    for resource in stack.resources() {
        let deps = graph.dependencies_of(&resource.logical_id);
        cli::info(&format!(
            "{:<40} {:<45} deps: {}",
            resource.logical_id,
            resource.resource_type,
            deps.len()
        ));
    }
    0
}

fn graph(args: &GraphArgs, stack: &Stack) -> i32 {
    let graph = ResourceGraph::from_stack(stack);
    if args.dot {
        cli::info(&graph.to_dot());
        return 0;
    }
    match graph.provisioning_order() {
        Ok(order) => {
            for (index, id) in order.iter().enumerate() {
                cli::info(&format!("{:>3}. {id}", index + 1));
            }
            0
        }
        Err(e) => {
            cli::error(&e.to_string());
            e.exit_code()
        }
    }
}
