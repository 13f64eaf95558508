//! protoc-gen-pubsub-schema
//!
//! Without arguments this is a `protoc` plugin:
//!
//! ```text
//! protoc --pubsub-schema_out=schema-syntax=proto3,message-encoding=json:out/ user.proto
//! ```
//!
//! The `compile` subcommand runs the same generator over a descriptor set on
//! disk, without `protoc`.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

mod compile;

#[derive(Parser)]
#[command(name = "protoc-gen-pubsub-schema")]
#[command(
    author,
    version,
    about = "Generate single-type Pub/Sub schemas from protobuf definitions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate `.pps` schemas from a descriptor set file.
    Compile(compile::CompileArgs),
}

fn main() -> Result<()> {
    // stdout carries the plugin response; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::WARN)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        None => run_plugin(),
        Some(Commands::Compile(args)) => compile::cmd_compile(&args),
    }
}

fn run_plugin() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("failed to read CodeGeneratorRequest from stdin")?;

    let output = pubsub_schema::plugin::process(&input)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&output)
        .context("failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush()?;
    Ok(())
}
