//! `forestal search`: rank the product index from the command line.
//!
//! Uses the same index and ranking the site's autocomplete uses, so a query
//! here returns exactly what a shopper sees in the header search box.

use anyhow::Result;
use forestal_core::search::{build_search_index, highlight_match, rank, SearchEntry};

use crate::config::Config;
use crate::data;

/// Load products, build the index, and print ranked results.
///
/// `limit` overrides `[search].max_results`.
pub fn run_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let products = data::load_products(config)?;
    let index = build_search_index(&products);
    let max_results = limit.unwrap_or(config.search.max_results).max(1);

    let results = rank(&index, query, max_results);
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, scored) in results.iter().enumerate() {
        let entry = scored.entry;
        println!(
            "{}. [{}] {} / {}",
            i + 1,
            scored.score,
            entry.catalog,
            marked_name(entry, query)
        );
        println!("    url: {}{}", config.site.url.trim_end_matches('/'), entry.url);
        println!("    priority: {}", entry.priority);
        if scored.score == 1 && !entry.keywords.is_empty() {
            println!("    keywords: {}", entry.keywords.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Name with the matched span wrapped in brackets, e.g. `[Raw] Batana Oil`.
fn marked_name(entry: &SearchEntry, query: &str) -> String {
    match highlight_match(&entry.name, query) {
        Some(range) => format!(
            "{}[{}]{}",
            &entry.name[..range.start],
            &entry.name[range.clone()],
            &entry.name[range.end..]
        ),
        None => entry.name.clone(),
    }
}
