//! SourceDocs CLI - Markdown reference documentation for Swift modules

use anyhow::Result;
use clap::{Parser, Subcommand};
use sourcedocs_core::AccessLevel;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod clean;
mod generate;

/// Default location of the generated reference.
const DEFAULT_OUTPUT: &str = "Documentation/Reference";

#[derive(Parser)]
#[command(name = "sourcedocs")]
#[command(version = sourcedocs_core::VERSION)]
#[command(about = "Generate Markdown reference documentation from a Swift declaration inventory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Markdown documentation from a declaration inventory
    Generate {
        /// Path to the JSON declaration inventory
        #[arg(long)]
        input: PathBuf,

        /// Output directory
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output_folder: PathBuf,

        /// Module name shown in the index title
        #[arg(long)]
        module_name: Option<String>,

        /// Write into a subfolder named after the module
        #[arg(short = 'm', long)]
        include_module_name: bool,

        /// Minimum access level to document (open, public, internal, fileprivate, private)
        #[arg(long)]
        min_acl: Option<AccessLevel>,

        /// Generate one file per category instead of one per declaration
        #[arg(long)]
        collapse: bool,

        /// Add a contents list of members to each page
        #[arg(long)]
        table_of_contents: bool,

        /// Wrap member details in collapsible blocks
        #[arg(long)]
        collapsible: bool,

        /// Prefix for every generated link
        #[arg(long)]
        link_beginning: Option<String>,

        /// Suffix for every generated link
        #[arg(long)]
        link_ending: Option<String>,

        /// Omit the generation timestamp so output is reproducible
        #[arg(short = 'r', long)]
        reproducible_docs: bool,

        /// Delete the output folder before writing
        #[arg(long)]
        clean: bool,

        /// Path to a sourcedocs.toml (defaults to ./sourcedocs.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete generated documentation
    Clean {
        /// Output directory to delete
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output_folder: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output_folder,
            module_name,
            include_module_name,
            min_acl,
            collapse,
            table_of_contents,
            collapsible,
            link_beginning,
            link_ending,
            reproducible_docs,
            clean,
            config,
        } => {
            let options = generate::GenerateOptions {
                input,
                output_folder,
                include_module_name,
                reproducible: reproducible_docs,
                clean,
                config,
                overrides: generate::Overrides {
                    module_name,
                    min_acl,
                    collapse,
                    table_of_contents,
                    collapsible,
                    link_beginning,
                    link_ending,
                },
            };
            generate::generate_docs(options)?;
        }

        Commands::Clean { output_folder } => {
            clean::clean_docs(&output_folder)?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG`; stdout carries progress lines only
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
