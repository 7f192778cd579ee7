//! `forestal graph`: print a single JSON-LD document.

use anyhow::{anyhow, Result};
use forestal_core::catalog::ShopProduct;
use tracing::info;

use crate::config::Config;
use crate::data;

pub fn run_page_graph(config: &Config, slug: &str, pretty: bool) -> Result<()> {
    let pages = data::load_pages(config)?;
    let page = pages
        .iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| anyhow!("No page manifest with slug: {}", slug))?;
    let builder = data::graph_builder(config)?;

    match builder.page_graph(&page.schemas, &page.context()) {
        Some(doc) => println!("{}", render(&doc, pretty)?),
        None => info!(slug, "page declares no resolvable schema; nothing emitted"),
    }
    Ok(())
}

/// `handler` may also be `shop` for the listing page graph.
pub fn run_product_graph(config: &Config, handler: &str, pretty: bool) -> Result<()> {
    let products = data::load_products(config)?;
    let builder = data::graph_builder(config)?;

    let doc = if handler == "shop" {
        let summaries: Vec<ShopProduct> = products.iter().map(ShopProduct::from).collect();
        builder.shop_graph(&summaries)
    } else {
        let product = products
            .iter()
            .find(|p| p.handler == handler)
            .ok_or_else(|| anyhow!("No product with handler: {}", handler))?;
        builder.product_graph(product)?
    };

    println!("{}", render(&doc, pretty)?);
    Ok(())
}

fn render(doc: &str, pretty: bool) -> Result<String> {
    if !pretty {
        return Ok(doc.to_string());
    }
    let value: serde_json::Value = serde_json::from_str(doc)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
