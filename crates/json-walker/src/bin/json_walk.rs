//! `json-walk`: query a JSON document (stdin) by path or value pattern.
//!
//! Usage:
//!   json-walk [--separator SEP] [--wildcard CHAR] find <path>
//!   json-walk search <pattern> [-i]
//!   json-walk flatten
//!   json-walk keys [path]
//!
//! Log output goes to stderr and is controlled by `JSON_WALK_LOG`
//! (e.g. `JSON_WALK_LOG=debug`).

use std::io::{self, Read, Write};

use clap::{Parser, Subcommand};
use json_walker::{cli, PathConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "json-walk")]
#[command(about = "Navigate and search JSON documents by path", long_about = None)]
#[command(version)]
struct Cli {
    /// Path segment separator
    #[arg(short, long, global = true, default_value = "/")]
    separator: String,

    /// Wildcard character for paths and search patterns
    #[arg(short, long, global = true, default_value_t = '*')]
    wildcard: char,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path (wildcards collect into an array)
    Find {
        path: String,
    },

    /// Print every leaf whose value matches a glob pattern
    Search {
        /// JSON value or plain string; the wildcard matches any run of characters
        pattern: String,

        /// Match case-insensitively
        #[arg(short = 'i', long)]
        ignore_case: bool,
    },

    /// Print every leaf keyed by its path
    Flatten,

    /// Print the keys of the container at a path (the root by default)
    Keys {
        #[arg(default_value = "")]
        path: String,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("JSON_WALK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let args = Cli::parse();
    init_logging();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let config = PathConfig::new(args.separator, args.wildcard);
    let result = match &args.command {
        Commands::Find { path } => cli::find(&buf, path, &config),
        Commands::Search {
            pattern,
            ignore_case,
        } => cli::search(&buf, pattern, *ignore_case, &config),
        Commands::Flatten => cli::flatten(&buf, &config),
        Commands::Keys { path } => cli::keys(&buf, path, &config),
    };

    match result {
        Ok(out) => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{out}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
