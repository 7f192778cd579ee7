//! `forestal shop`: apply the shop grid filter from the command line.

use anyhow::{bail, Result};
use forestal_core::catalog::{catalog_counts, catalog_label, CatalogFilter, ShopProduct};

use crate::config::Config;
use crate::data;

/// Filter options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ShopArgs {
    pub catalogs: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub in_stock: bool,
    /// Pages to reveal (1 = initial view).
    pub pages: usize,
}

/// Summaries for every product, in data-file order.
pub fn shop_products(config: &Config) -> Result<Vec<ShopProduct>> {
    Ok(data::load_products(config)?
        .iter()
        .map(ShopProduct::from)
        .collect())
}

/// Apply `args` the same way the grid applies user input.
///
/// Unknown catalog slugs are rejected rather than silently matching nothing.
pub fn apply_args(filter: &mut CatalogFilter, args: &ShopArgs) -> Result<()> {
    for slug in &args.catalogs {
        if catalog_label(slug).is_none() {
            bail!("Unknown catalog \"{}\"", slug);
        }
        if !filter.selected_catalogs().contains(slug) {
            filter.toggle_catalog(slug);
        }
    }
    if let Some(max) = args.max {
        filter.set_price_max(max);
    }
    if let Some(min) = args.min {
        filter.set_price_min(min);
    }
    filter.set_in_stock_only(args.in_stock);
    filter.show_pages(args.pages);
    Ok(())
}

pub fn run_shop(config: &Config, args: &ShopArgs) -> Result<()> {
    let products = shop_products(config)?;
    let mut filter = CatalogFilter::for_products(&products, config.shop.page_size);
    apply_args(&mut filter, args)?;

    let counts = catalog_counts(&products);
    let bounds = filter.global_bounds();
    println!(
        "Price range: ${:.2} - ${:.2} (showing ${:.2} - ${:.2})",
        bounds.min,
        bounds.max,
        filter.price_min(),
        filter.price_max()
    );
    let catalogs: Vec<String> = counts
        .iter()
        .map(|(slug, n)| format!("{} ({})", catalog_label(slug).unwrap_or(slug.as_str()), n))
        .collect();
    println!("Catalogs: {}", catalogs.join(", "));
    println!("Active filters: {}", filter.active_filter_count());
    println!();

    let view = filter.view(&products);
    if view.visible.is_empty() {
        println!("No products match these filters.");
        return Ok(());
    }

    for p in &view.visible {
        let price = if p.min_price == p.max_price {
            format!("${:.2}", p.min_price)
        } else {
            format!("${:.2} - ${:.2}", p.min_price, p.max_price)
        };
        let stock = match p.availability {
            forestal_core::models::Availability::InStock => "in stock",
            forestal_core::models::Availability::OutOfStock => "out of stock",
        };
        println!("- {} [{}] {} ({})", p.name, p.catalog, price, stock);
    }
    println!();
    println!(
        "Showing {} of {} products{}",
        view.visible.len(),
        view.total_matches,
        if view.has_more { " (more available)" } else { "" }
    );

    Ok(())
}
