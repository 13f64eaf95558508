//! Offline generation from a descriptor set on disk.
//!
//! Accepts either a binary `FileDescriptorSet` (`protoc --descriptor_set_out`,
//! `buf build -o set.binpb`) or Buf's JSON rendering (`buf build -o set.json`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use pubsub_schema::descriptor;
use pubsub_schema::{assemble, CodeGenRequest, CompilerOptions, Encoding, ProtoFile, Syntax};

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Descriptor set to read (`.json` for Buf JSON, anything else is binary).
    #[arg(long)]
    pub descriptor_set: PathBuf,
    /// File in the set to generate a schema for (repeatable).
    #[arg(long = "file", required = true)]
    pub files: Vec<String>,
    /// Syntax of the generated schemas.
    #[arg(long, default_value = "proto2")]
    pub syntax: Syntax,
    /// Message encoding of the topic (`json` maps well-known wrappers to scalars).
    #[arg(long, default_value = "binary")]
    pub encoding: Encoding,
    /// Output directory.
    #[arg(short, long)]
    pub out: PathBuf,
}

pub fn cmd_compile(args: &CompileArgs) -> Result<()> {
    println!(
        "{} {}",
        "Compiling Pub/Sub schemas from".green().bold(),
        args.descriptor_set.display()
    );

    let files = read_descriptor_set(&args.descriptor_set)?;
    let request = CodeGenRequest {
        files,
        file_to_generate: args.files.clone(),
        options: CompilerOptions::new(args.syntax, args.encoding),
    };

    let response = assemble(&request)?;
    if let Some(error) = response.error {
        bail!(error);
    }

    for file in &response.files {
        let path = args.out.join(&file.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  {} {}", "→".cyan(), path.display());
    }

    Ok(())
}

fn read_descriptor_set(path: &Path) -> Result<Vec<ProtoFile>> {
    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let files = if is_json {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor json: {}", path.display()))?;
        descriptor::parse_descriptor_set_json(&text)?
    } else {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read descriptor set: {}", path.display()))?;
        descriptor::decode_descriptor_set(&bytes)?
    };

    tracing::debug!(path = %path.display(), files = files.len(), "loaded descriptor set");
    Ok(files)
}
