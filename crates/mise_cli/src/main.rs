//! MISE CLI
//!
//! Validate, dry-run, and total up recipe graphs exported by the editor.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::bail;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mise")]
#[command(
    about = "MISE - recipe graphs: validation, dry runs, and nutrition totals",
    long_about = None
)]
struct Cli {
    /// Raise log verbosity
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the recipe structure
    Validate {
        /// Path to recipe file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Narrate a dry run of the recipe
    Simulate {
        /// Path to recipe file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show macro totals per node
    Macros {
        /// Path to recipe file
        #[arg(short, long)]
        file: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Re-export the recipe in canonical form
    Export {
        /// Path to recipe file
        #[arg(short, long)]
        file: PathBuf,
        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Attach nutrition from a product catalog
    Enrich {
        /// Path to recipe file
        #[arg(short, long)]
        file: PathBuf,
        /// Product catalog (Open Food Facts JSON)
        #[arg(short, long)]
        catalog: PathBuf,
        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8, json: bool) {
    let default = match verbose {
        0 => "mise=info",
        1 => "mise=debug",
        _ => "mise=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Validate { file } => {
            let problems = commands::validate(&file)?;
            if problems.is_empty() {
                println!("Recipe is valid.");
                return Ok(());
            }
            for problem in &problems {
                println!("- {}", problem);
            }
            bail!("{} problem(s) found in {}", problems.len(), file.display());
        }
        Commands::Simulate { file } => {
            println!("{}", commands::simulate(&file)?);
            Ok(())
        }
        Commands::Macros { file, json } => {
            println!("{}", commands::macros(&file, json)?);
            Ok(())
        }
        Commands::Export { file, output } => {
            let document = commands::export(&file)?;
            commands::emit(&document, output.as_deref())
        }
        Commands::Enrich { file, catalog, output } => {
            let (document, summary) = commands::enrich(&file, &catalog)?;
            for line in &summary {
                eprintln!("{}", line);
            }
            commands::emit(&document, output.as_deref())
        }
    }
}
