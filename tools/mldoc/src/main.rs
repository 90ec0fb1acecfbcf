//! mldoc: documentation site generator for resolved module interfaces.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mldoc::build::{self, BuildConfig};
use mldoc::config::Config;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mldoc")]
#[command(author, version, about = "Documentation site generator for module interfaces", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Interface files or directories
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<Utf8PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    /// Expand includes that carry neither @open nor @closed
    #[arg(long)]
    open_details: bool,

    /// Link to directories instead of index.html files
    #[arg(long)]
    semantic_uris: bool,

    /// Assign a root module to a package (repeatable)
    #[arg(long = "package", value_name = "ROOT=PKG")]
    packages: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render interfaces and write the site
    Build {
        #[command(flatten)]
        args: RenderArgs,

        /// Output directory
        #[arg(short, long, default_value = "_html")]
        output: Utf8PathBuf,
    },

    /// Print the page tree without writing files
    Tree {
        #[command(flatten)]
        args: RenderArgs,
    },
}

fn build_config(args: RenderArgs, output: Utf8PathBuf) -> Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.add_packages(args.packages.iter().map(String::as_str))?;
    if args.open_details {
        config.render.default_open = true;
    }
    if args.semantic_uris {
        config.render.semantic_uris = true;
    }

    Ok(BuildConfig {
        inputs: args.inputs,
        output,
        packages: config.package_table(),
        render: config.render,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { args, output } => {
            let config = build_config(args, output)?;
            let summary = build::run(&config)?;
            if summary.failed > 0 {
                anyhow::bail!("{} units failed to render", summary.failed);
            }
        }

        Commands::Tree { args } => {
            let config = build_config(args, Utf8PathBuf::new())?;
            let listing = build::tree(&config)?;
            print!("{}", listing.text);
            if listing.failed > 0 {
                anyhow::bail!("{} units failed to render", listing.failed);
            }
        }
    }

    Ok(())
}
