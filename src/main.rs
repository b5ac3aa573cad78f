//! Widget Binder CLI
//!
//! Usage:
//!   widget-binder [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML format)
//!   --emit <KIND>        Output generated code or rewritten markup
//!   --placeholders       Print the placeholder table and exit
//!   -v, --verbose        Debug logging on stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use widget_binder::{compile_with_config, BinderConfig};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Emit {
    /// Field declarations and init statements
    #[default]
    Code,
    /// Template markup with widgets replaced by placeholders
    Markup,
}

#[derive(Parser)]
#[command(name = "widget-binder")]
#[command(about = "Compile declarative UI templates into widget construction code")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Code)]
    emit: Emit,

    /// Print the active placeholder table and exit
    #[arg(long)]
    placeholders: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match BinderConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BinderConfig::default(),
    };

    if cli.placeholders {
        for (parent, child) in config.policy.rules() {
            println!("{} -> {}", parent, child);
        }
        println!("* -> {}", config.policy.default_tag());
        return;
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match compile_with_config(&source, &config) {
        Ok(binder) => match cli.emit {
            Emit::Code => print!("{}", binder.render()),
            Emit::Markup => println!("{}", binder.markup),
        },
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}
