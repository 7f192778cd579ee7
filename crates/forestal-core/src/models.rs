//! Product records shared by the search indexer, the shop grid, and the
//! product-page JSON-LD builder.
//!
//! A [`ProductRecord`] is one product group as authored in `products.json`:
//! identity, editorial content, media, price list, and per-SKU inventory.

use serde::{Deserialize, Serialize};

/// Stock state of a product or variant.
///
/// `InStock` is the sentinel the shop filter's "in stock only" toggle keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    InStock,
    OutOfStock,
}

impl Availability {
    /// The schema.org enumeration URL for this availability.
    pub fn schema_url(self) -> &'static str {
        match self {
            Availability::InStock => "https://schema.org/InStock",
            Availability::OutOfStock => "https://schema.org/OutOfStock",
        }
    }
}

/// One product group with everything needed to index, list, and describe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// URL slug, e.g. `raw-batana-oil`.
    pub handler: String,
    /// Stable group identifier, e.g. `FMT-BO-RBO`.
    pub product_group_id: String,
    pub name: String,
    /// Catalog display name, e.g. `Batana Oil`.
    pub catalog: String,
    /// Catalog slug, e.g. `batana-oil`.
    pub catalog_slug: String,
    #[serde(default)]
    pub botanical_name: Option<String>,
    #[serde(default)]
    pub common_names: Vec<String>,
    /// Author-assigned search weight, 0–10.
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub wholesale_available: bool,
    pub content: ContentData,
    pub media: MediaData,
    /// Price list in display order (smallest size first).
    pub pricing: Vec<PricingVariant>,
    /// Per-SKU inventory. SKUs missing here are treated as in stock.
    #[serde(default)]
    pub variants: Vec<ProductVariantData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentData {
    pub category: String,
    pub short_description: String,
    #[serde(default)]
    pub how_to_use: Vec<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub quality_badge: Option<String>,
    #[serde(default)]
    pub audience: Option<Audience>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    #[serde(default)]
    pub suggested_gender: Option<String>,
    #[serde(default)]
    pub suggested_min_age: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaData {
    pub image: ImageData,
    #[serde(default)]
    pub variant_images: Vec<VariantImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub url: String,
    pub alt: String,
    #[serde(default)]
    pub caption: String,
    pub width: u32,
    pub height: u32,
    pub encoding_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    pub sku: String,
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingVariant {
    pub sku: String,
    pub sku_name: String,
    pub price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantData {
    pub sku: String,
    pub size: String,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl ProductRecord {
    /// Canonical site-relative URL of the product detail page.
    pub fn path(&self) -> String {
        format!("/products/{}/", self.handler)
    }

    /// Inventory entry for `sku`, if one was authored.
    pub fn variant(&self, sku: &str) -> Option<&ProductVariantData> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    /// `InStock` when any priced SKU is in stock (or has no inventory entry).
    pub fn availability(&self) -> Availability {
        let any_in_stock = self.pricing.iter().any(|pv| {
            self.variant(&pv.sku)
                .map_or(true, |v| v.availability == Availability::InStock)
        });
        if any_in_stock {
            Availability::InStock
        } else {
            Availability::OutOfStock
        }
    }

    /// Lowest and highest price across the price list, or `(0, 0)` if empty.
    pub fn price_range(&self) -> (f64, f64) {
        let mut prices = self.pricing.iter().map(|pv| pv.price);
        let Some(first) = prices.next() else {
            return (0.0, 0.0);
        };
        prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)))
    }
}
