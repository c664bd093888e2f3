use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;

use product_matrix::config::load_overlay;
use product_matrix::logging::init_logging;
use product_matrix::matrix::ProductRegistry;
use product_matrix::matrix::catalog::default_registry;
use product_matrix::render::{display, render_markdown};

#[derive(Parser)]
#[command(name = "product-matrix")]
#[command(version, about = "Version-aware product packaging metadata")]
struct Cli {
    /// Catalog overlay file registered on top of the built-in products
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List product keys in registration order
    List,
    /// Show every property of a product at a version
    Show {
        key: String,
        #[arg(long, default_value = "latest")]
        version: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List every omnibus project name a product has used
    OmnibusProjects { key: String },
    /// List products with a public download page
    Downloads,
    /// Render the catalog as a Markdown table
    Matrix,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref())?;

    let registry = build_registry(&cli)?;

    match cli.command {
        Command::List => {
            for key in registry.keys() {
                println!("{key}");
            }
        }
        Command::Show { key, version, json } => {
            let view = registry.lookup(&key, &version)?;
            let properties = view.properties()?;
            if json {
                let map: IndexMap<&str, _> = properties
                    .iter()
                    .map(|(name, value)| (name.as_str(), value))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                println!("{} @ {}", view.key(), view.version());
                for (name, value) in &properties {
                    println!("  {:<28}{}", name.as_str(), display(value.as_ref()));
                }
            }
        }
        Command::OmnibusProjects { key } => {
            let view = registry.lookup_latest(&key)?;
            for name in view.known_omnibus_project_names()? {
                println!("{name}");
            }
        }
        Command::Downloads => {
            for key in registry.available_on_downloads_site()?.keys() {
                println!("{key}");
            }
        }
        Command::Matrix => print!("{}", render_markdown(&registry)?),
    }

    Ok(())
}

fn build_registry(cli: &Cli) -> anyhow::Result<ProductRegistry> {
    let mut registry = default_registry()?;
    if let Some(overlay) =
        load_overlay(cli.catalog.as_deref()).context("Failed to load catalog overlay")?
    {
        overlay.apply(&mut registry)?;
    }
    Ok(registry)
}
