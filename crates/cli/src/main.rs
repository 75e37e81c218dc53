//! Shelfgate CLI - offline validation with the gateway's schemas.
//!
//! # Usage
//!
//! ```bash
//! # Validate a product document
//! shelfgate-cli validate product product.json
//!
//! # Validate an order from stdin, sanitizing notes first
//! cat order.json | shelfgate-cli validate order --sanitize notes
//!
//! # Validate query-string style values
//! shelfgate-cli validate search query.json --coerce --pretty
//! ```
//!
//! Prints the normalized document on success, or the gateway's error body
//! and exit status 1 on failure.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::validate::{Kind, Options, Outcome};

#[derive(Parser)]
#[command(name = "shelfgate-cli")]
#[command(author, version, about = "Shelfgate CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document
    Validate {
        /// Document kind
        #[arg(value_enum)]
        kind: Kind,

        /// Input file (`-` or omitted for stdin)
        file: Option<PathBuf>,

        /// Comma-separated top-level fields to sanitize first
        #[arg(short, long, value_delimiter = ',')]
        sanitize: Vec<String>,

        /// Accept textual numbers and booleans, as for query strings
        #[arg(long)]
        coerce: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Run the command; `Ok(false)` means the document was rejected.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate {
            kind,
            file,
            sanitize,
            coerce,
            pretty,
        } => {
            let input = commands::validate::read_input(file.as_deref())?;
            let options = Options { sanitize, coerce };
            let (accepted, output) = match commands::validate::validate(kind, &input, &options)? {
                Outcome::Valid(value) => (true, value),
                Outcome::Invalid(err) => (false, serde_json::to_value(err)?),
            };

            let rendered = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            writeln!(std::io::stdout().lock(), "{rendered}")?;
            Ok(accepted)
        }
    }
}
