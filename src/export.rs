//! Build-time exports consumed by the static site.
//!
//! | Export | Default path | Consumer |
//! |--------|--------------|----------|
//! | search index | `{output_dir}/search-index.json` | header autocomplete |
//! | shop | `{output_dir}/shop.json` | shop grid (products, bounds, counts) |
//! | JSON-LD | `{output_dir}/jsonld/{pages,products}/*.json`, `shop.json` | page `<head>` |
//!
//! Without an explicit `--output`, files land under `[data].output_dir`.
//! Passing `-` writes to stdout for piping.

use anyhow::{Context, Result};
use forestal_core::catalog::{catalog_counts, PriceBounds, ShopProduct};
use forestal_core::search::{build_search_index, SearchEntry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::data;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShopExport<'a> {
    bounds: PriceBounds,
    catalog_counts: BTreeMap<String, usize>,
    page_size: usize,
    products: &'a [ShopProduct],
}

/// Files written by [`run_export_jsonld`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JsonLdSummary {
    pub pages: usize,
    pub skipped_pages: usize,
    pub products: usize,
}

pub fn run_export_search_index(config: &Config, output: Option<&Path>) -> Result<()> {
    let products = data::load_products(config)?;
    let index: Vec<SearchEntry> = build_search_index(&products);
    let json = serde_json::to_string(&index)?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data.output_dir.join("search-index.json"));
    if let Some(path) = write_or_print(&path, &json)? {
        eprintln!("Exported {} search entries to {}", index.len(), path.display());
    }
    Ok(())
}

pub fn run_export_shop(config: &Config, output: Option<&Path>) -> Result<()> {
    let records = data::load_products(config)?;
    let products: Vec<ShopProduct> = records.iter().map(ShopProduct::from).collect();
    let export = ShopExport {
        bounds: PriceBounds::from_products(&products),
        catalog_counts: catalog_counts(&products),
        page_size: config.shop.page_size,
        products: &products,
    };
    let json = serde_json::to_string_pretty(&export)?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data.output_dir.join("shop.json"));
    if let Some(path) = write_or_print(&path, &json)? {
        eprintln!("Exported {} shop products to {}", products.len(), path.display());
    }
    Ok(())
}

/// Write one graph per page manifest and per product, plus the shop page.
///
/// Pages whose graph is empty are skipped, not written as empty files.
/// A product in an unknown catalog fails the whole export.
pub fn run_export_jsonld(config: &Config) -> Result<JsonLdSummary> {
    let builder = data::graph_builder(config)?;
    let pages = data::load_pages(config)?;
    let products = data::load_products(config)?;
    let root = config.data.output_dir.join("jsonld");

    let mut summary = JsonLdSummary::default();

    for page in &pages {
        match builder.page_graph(&page.schemas, &page.context()) {
            Some(doc) => {
                write_file(&root.join("pages").join(format!("{}.json", page.slug)), &doc)?;
                summary.pages += 1;
            }
            None => {
                debug!(slug = %page.slug, "empty page graph skipped");
                summary.skipped_pages += 1;
            }
        }
    }

    for product in &products {
        let doc = builder
            .product_graph(product)
            .with_context(|| format!("Failed to build graph for product {}", product.handler))?;
        write_file(&root.join("products").join(format!("{}.json", product.handler)), &doc)?;
        summary.products += 1;
    }

    let shop: Vec<ShopProduct> = products.iter().map(ShopProduct::from).collect();
    write_file(&root.join("shop.json"), &builder.shop_graph(&shop))?;

    info!(
        pages = summary.pages,
        skipped = summary.skipped_pages,
        products = summary.products,
        dir = %root.display(),
        "json-ld export complete"
    );
    eprintln!(
        "Exported {} page graphs ({} skipped), {} product graphs, and the shop graph to {}",
        summary.pages,
        summary.skipped_pages,
        summary.products,
        root.display()
    );
    Ok(summary)
}

/// Returns the written path, or `None` when printed to stdout.
fn write_or_print(path: &Path, contents: &str) -> Result<Option<PathBuf>> {
    if path == Path::new("-") {
        println!("{}", contents);
        return Ok(None);
    }
    write_file(path, contents)?;
    Ok(Some(path.to_path_buf()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
