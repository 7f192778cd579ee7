//! Loading product data, JSON-LD fixtures, and page manifests from disk.
//!
//! Fixture directory layout:
//!
//! | File | Required | Contents |
//! |------|----------|----------|
//! | `Organization.json` | yes | Full Organization, with `hasMerchantReturnPolicy` |
//! | `Brand.json` | yes | Full Brand |
//! | `WebSite.json` | yes | WebSite with embedded SearchAction |
//! | `OnlineStore.json` | yes | OnlineStore with `hasOfferCatalog` |
//! | `OfferShippingDetails.json` | no | Array of shipping policies |
//! | `Service-*.json` | no | Service objects or arrays |
//! | `VideoObject-*.json` | no | One hero video per file |
//!
//! Page manifests are TOML files under `[data].pages_dir` matching
//! `[data].page_glob`:
//!
//! ```toml
//! slug = "about"
//! page_name = "About"
//! canonical_url = "https://forestal-mt.com/about/"
//!
//! [[schemas]]
//! type = "Organization"
//! id = "https://forestal-mt.com/#organization"
//! mode = "compact"
//! ```

use anyhow::{bail, Context, Result};
use forestal_core::jsonld::{Fixtures, GraphBuilder, PageContext, RawFixtures, SchemaRef};
use forestal_core::models::ProductRecord;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;

#[derive(Deserialize)]
struct ProductsFile {
    products: Vec<ProductRecord>,
}

/// One content page and the schema entities it declares.
#[derive(Debug, Clone, Deserialize)]
pub struct PageManifest {
    pub slug: String,
    #[serde(alias = "pageName")]
    pub page_name: String,
    #[serde(alias = "canonicalUrl")]
    pub canonical_url: String,
    #[serde(default)]
    pub schemas: Vec<SchemaRef>,
}

impl PageManifest {
    pub fn context(&self) -> PageContext {
        PageContext {
            page_name: self.page_name.clone(),
            canonical_url: self.canonical_url.clone(),
        }
    }
}

pub fn load_products(config: &Config) -> Result<Vec<ProductRecord>> {
    let path = &config.data.products;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read products file: {}", path.display()))?;
    let file: ProductsFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse products file: {}", path.display()))?;
    debug!(count = file.products.len(), path = %path.display(), "products loaded");
    Ok(file.products)
}

pub fn load_fixtures(config: &Config) -> Result<Fixtures> {
    let dir = &config.data.fixtures_dir;
    if !dir.is_dir() {
        bail!("Fixtures directory does not exist: {}", dir.display());
    }

    let raw = RawFixtures {
        organization: read_json(&dir.join("Organization.json"))?,
        brand: read_json(&dir.join("Brand.json"))?,
        website: read_json(&dir.join("WebSite.json"))?,
        online_store: read_json(&dir.join("OnlineStore.json"))?,
        hero_videos: read_prefixed(dir, "VideoObject-")?,
        services: Value::Array(
            read_prefixed(dir, "Service-")?
                .into_iter()
                .flat_map(|v| match v {
                    Value::Array(items) => items,
                    other => vec![other],
                })
                .collect(),
        ),
        shipping_details: read_optional_json(&dir.join("OfferShippingDetails.json"))?,
    };

    Fixtures::from_raw(raw).with_context(|| format!("Invalid fixtures in {}", dir.display()))
}

pub fn graph_builder(config: &Config) -> Result<GraphBuilder> {
    Ok(GraphBuilder::new(config.site.to_site(), load_fixtures(config)?))
}

/// Every manifest under the pages directory, sorted by slug.
pub fn load_pages(config: &Config) -> Result<Vec<PageManifest>> {
    let root = &config.data.pages_dir;
    if !root.exists() {
        bail!("Pages directory does not exist: {}", root.display());
    }
    let include = build_globset(&[config.data.page_glob.clone()])?;

    let mut pages = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !include.is_match(relative) {
            continue;
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page manifest: {}", path.display()))?;
        let page: PageManifest = toml::from_str(&content)
            .with_context(|| format!("Failed to parse page manifest: {}", path.display()))?;
        pages.push(page);
    }

    pages.sort_by(|a, b| a.slug.cmp(&b.slug));
    if let Some(pair) = pages.windows(2).find(|w| w[0].slug == w[1].slug) {
        bail!("Duplicate page slug: {}", pair[0].slug);
    }
    debug!(count = pages.len(), "page manifests loaded");
    Ok(pages)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse fixture: {}", path.display()))
}

fn read_optional_json(path: &Path) -> Result<Value> {
    if path.exists() {
        read_json(path)
    } else {
        Ok(Value::Null)
    }
}

/// `{prefix}*.json` files in `dir`, in file-name order.
fn read_prefixed(dir: &Path, prefix: &str) -> Result<Vec<Value>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".json"))
        })
        .collect();
    paths.sort();
    paths.iter().map(|p| read_json(p)).collect()
}
