//! # Forestal CLI (`forestal`)
//!
//! Build-time exports for the static site, quick inspection of search and
//! shop behavior, and the storefront HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! forestal --config ./config/forestal.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `forestal search "<query>"` | Rank products like the header autocomplete |
//! | `forestal shop` | Apply shop grid filters and print the visible page |
//! | `forestal export search-index` | Write the autocomplete index |
//! | `forestal export shop` | Write shop summaries, price bounds, and counts |
//! | `forestal export jsonld` | Write every page, product, and shop graph |
//! | `forestal graph page <slug>` | Print one content page graph |
//! | `forestal graph product <handler>` | Print one product graph (`shop` for the listing) |
//! | `forestal serve` | Start the HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! # Accent-insensitive search
//! forestal search "bataná"
//!
//! # In-stock batana oils under $40, two pages
//! forestal shop --catalog batana-oil --max 40 --in-stock --pages 2
//!
//! # Full static export
//! forestal export search-index && forestal export shop && forestal export jsonld
//! ```

use clap::{Parser, Subcommand};
use forestal::{config, export, graph, logging, search, server, shop};
use std::path::PathBuf;

/// Forestal storefront CLI.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/forestal.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "forestal",
    about = "Forestal MT storefront tooling: search, shop filtering, JSON-LD export, and HTTP API",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/forestal.toml")]
    config: PathBuf,

    /// Log level when `RUST_LOG` is unset (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank products against a query.
    ///
    /// Matching ignores case and accents. Name prefix matches rank above
    /// name substring matches, which rank above botanical/common-name matches.
    Search {
        query: String,

        /// Maximum number of results (defaults to `[search].max_results`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Filter the shop grid.
    Shop {
        /// Catalog slug to include. Repeat for several; none means all.
        #[arg(long = "catalog")]
        catalogs: Vec<String>,

        /// Lower price bound (clamped to the catalog range).
        #[arg(long)]
        min: Option<f64>,

        /// Upper price bound (clamped to the catalog range).
        #[arg(long)]
        max: Option<f64>,

        /// Only products with at least one variant in stock.
        #[arg(long)]
        in_stock: bool,

        /// Number of pages to reveal.
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Write static-site data files.
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },

    /// Print one JSON-LD graph.
    Graph {
        #[command(subcommand)]
        target: GraphTarget,
    },

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

#[derive(Subcommand)]
enum ExportTarget {
    /// Autocomplete index (`-` for stdout).
    SearchIndex {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Shop summaries with price bounds and catalog counts (`-` for stdout).
    Shop {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// One graph per page manifest and product, plus the shop page.
    Jsonld,
}

#[derive(Subcommand)]
enum GraphTarget {
    /// A content page, by manifest slug.
    Page {
        slug: String,
        #[arg(long)]
        pretty: bool,
    },
    /// A product page, by handler. Use `shop` for the listing page.
    Product {
        handler: String,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &query, limit)?;
        }
        Commands::Shop {
            catalogs,
            min,
            max,
            in_stock,
            pages,
        } => {
            let args = shop::ShopArgs {
                catalogs,
                min,
                max,
                in_stock,
                pages,
            };
            shop::run_shop(&cfg, &args)?;
        }
        Commands::Export { target } => match target {
            ExportTarget::SearchIndex { output } => {
                export::run_export_search_index(&cfg, output.as_deref())?;
            }
            ExportTarget::Shop { output } => {
                export::run_export_shop(&cfg, output.as_deref())?;
            }
            ExportTarget::Jsonld => {
                export::run_export_jsonld(&cfg)?;
            }
        },
        Commands::Graph { target } => match target {
            GraphTarget::Page { slug, pretty } => {
                graph::run_page_graph(&cfg, &slug, pretty)?;
            }
            GraphTarget::Product { handler, pretty } => {
                graph::run_product_graph(&cfg, &handler, pretty)?;
            }
        },
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
