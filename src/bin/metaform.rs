//! metaform CLI - inspect and validate YAML declaration files
//!
//! Declaration files attach prefixes and field aliases to classes without
//! touching code. This tool checks them before they are loaded by a program.

use clap::{Parser, Subcommand};
use metaform::DeclarationFile;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metaform")]
#[command(version, about = "Inspect metaform declaration files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a declaration file and print its data keys
    Check {
        /// Path to the YAML declaration file
        #[arg(short, long, default_value = "metaform.yaml")]
        file: PathBuf,
    },

    /// Print the data key each declared field maps to
    Keys {
        /// Path to the YAML declaration file
        #[arg(short, long, default_value = "metaform.yaml")]
        file: PathBuf,

        /// Only show this class
        #[arg(short, long)]
        class: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => check(file),
        Commands::Keys { file, class } => keys(file, class),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load(file: &PathBuf) -> Result<DeclarationFile, String> {
    let declarations = DeclarationFile::load_from_file(file).map_err(|e| e.to_string())?;
    declarations.validate().map_err(|e| e.to_string())?;
    Ok(declarations)
}

/// Validate a declaration file and print the data key of every declared field
fn check(file: PathBuf) -> Result<(), String> {
    println!("🔍 Validating {}...", file.display());

    let declarations = load(&file)?;

    for line in declarations.key_report(None) {
        println!("  {}", line);
    }

    println!("✅ {} classes validated", declarations.classes.len());
    Ok(())
}

fn keys(file: PathBuf, only: Option<String>) -> Result<(), String> {
    let declarations = load(&file)?;

    if let Some(name) = &only {
        if !declarations.classes.contains_key(name) {
            return Err(format!("Class '{}' is not declared in {}", name, file.display()));
        }
    }

    for line in declarations.key_report(only.as_deref()) {
        println!("{}", line);
    }

    Ok(())
}
