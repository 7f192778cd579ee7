//! Shop grid filtering and pagination.
//!
//! [`CatalogFilter`] is the grid's whole client-local state: selected
//! catalogs, a price window, the in-stock toggle, and how many products are
//! visible. Setters enforce the invariants, so no invalid state can be
//! observed:
//!
//! - `global.min <= price_min <= price_max <= global.max` at all times.
//! - Any change to the filter resets the visible window to one page.
//! - An empty catalog selection means "all catalogs".

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::{Availability, ProductRecord};

/// Products revealed per "load more".
pub const PAGE_SIZE: usize = 24;

/// Catalogs with a landing page, as `(slug, label)` in display order.
pub const CATALOGS: &[(&str, &str)] = &[
    ("batana-oil", "Batana Oil"),
    ("stingless-bee-honey", "Stingless Bee Honey"),
    ("traditional-herbs", "Traditional Herbs"),
];

/// Display label for a catalog slug.
pub fn catalog_label(slug: &str) -> Option<&'static str> {
    CATALOGS
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, label)| *label)
}

/// Landing page URL for a catalog slug, e.g. `https://forestal-mt.com/batana-oil/`.
pub fn resolve_catalog_url(site_url: &str, slug: &str) -> Result<String> {
    catalog_label(slug)
        .map(|_| format!("{}/{}/", site_url.trim_end_matches('/'), slug))
        .ok_or_else(|| CoreError::UnknownCatalog(slug.to_string()))
}

/// Summary of one product group as shown in the shop grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProduct {
    pub handler: String,
    pub product_group_id: String,
    pub name: String,
    pub catalog: String,
    pub catalog_slug: String,
    pub min_price: f64,
    pub max_price: f64,
    pub quality_badge: String,
    pub availability: Availability,
    pub image_url: String,
    pub image_alt: String,
    pub variant_count: usize,
    pub wholesale_available: bool,
}

impl From<&ProductRecord> for ShopProduct {
    fn from(p: &ProductRecord) -> Self {
        let (min_price, max_price) = p.price_range();
        Self {
            handler: p.handler.clone(),
            product_group_id: p.product_group_id.clone(),
            name: p.name.clone(),
            catalog: p.catalog.clone(),
            catalog_slug: p.catalog_slug.clone(),
            min_price,
            max_price,
            quality_badge: p.content.quality_badge.clone().unwrap_or_default(),
            availability: p.availability(),
            image_url: p.media.image.url.clone(),
            image_alt: p.media.image.alt.clone(),
            variant_count: p.pricing.len(),
            wholesale_available: p.wholesale_available,
        }
    }
}

/// Catalog-wide price bounds the price controls are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// Smallest `min_price` and largest `max_price` across `products`.
    /// An empty list yields `0..0`.
    pub fn from_products(products: &[ShopProduct]) -> Self {
        if products.is_empty() {
            return Self { min: 0.0, max: 0.0 };
        }
        products.iter().fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |b, p| Self {
                min: b.min.min(p.min_price),
                max: b.max.max(p.max_price),
            },
        )
    }
}

/// Number of products per catalog slug, before filtering.
pub fn catalog_counts(products: &[ShopProduct]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for p in products {
        *counts.entry(p.catalog_slug.clone()).or_insert(0) += 1;
    }
    counts
}

/// The visible slice of a filtered product list.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView<'a> {
    pub visible: Vec<&'a ShopProduct>,
    /// Products passing the filter, visible or not.
    pub total_matches: usize,
    pub has_more: bool,
}

/// Filter and pagination state for the shop grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    global: PriceBounds,
    selected: BTreeSet<String>,
    price_min: f64,
    price_max: f64,
    in_stock_only: bool,
    page_size: usize,
    show_count: usize,
}

impl CatalogFilter {
    /// A cleared filter over `global`, showing the first page.
    pub fn new(global: PriceBounds, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            global,
            selected: BTreeSet::new(),
            price_min: global.min,
            price_max: global.max,
            in_stock_only: false,
            page_size,
            show_count: page_size,
        }
    }

    /// A cleared filter with bounds taken from `products`.
    pub fn for_products(products: &[ShopProduct], page_size: usize) -> Self {
        Self::new(PriceBounds::from_products(products), page_size)
    }

    pub fn global_bounds(&self) -> PriceBounds {
        self.global
    }

    pub fn price_min(&self) -> f64 {
        self.price_min
    }

    pub fn price_max(&self) -> f64 {
        self.price_max
    }

    pub fn in_stock_only(&self) -> bool {
        self.in_stock_only
    }

    pub fn selected_catalogs(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn show_count(&self) -> usize {
        self.show_count
    }

    /// Add `slug` to the selection, or remove it if already selected.
    pub fn toggle_catalog(&mut self, slug: &str) {
        if !self.selected.remove(slug) {
            self.selected.insert(slug.to_string());
        }
        self.reset_page();
    }

    /// Set the lower price bound, clamped to `[global.min, price_max]`.
    pub fn set_price_min(&mut self, value: f64) {
        let clamped = value.min(self.price_max).max(self.global.min);
        self.update(|f| f.price_min = clamped);
    }

    /// Set the upper price bound, clamped to `[price_min, global.max]`.
    pub fn set_price_max(&mut self, value: f64) {
        let clamped = value.max(self.price_min).min(self.global.max);
        self.update(|f| f.price_max = clamped);
    }

    pub fn set_in_stock_only(&mut self, in_stock_only: bool) {
        self.update(|f| f.in_stock_only = in_stock_only);
    }

    /// Reset every filter to its default. Page size is kept.
    pub fn clear(&mut self) {
        *self = Self::new(self.global, self.page_size);
    }

    /// Reveal one more page of the filtered list.
    pub fn load_more(&mut self) {
        self.show_count = self.show_count.saturating_add(self.page_size);
    }

    /// Show the first `pages` pages (at least one). Filters are untouched.
    pub fn show_pages(&mut self, pages: usize) {
        self.show_count = self.page_size.saturating_mul(pages.max(1));
    }

    /// Filters in effect: each selected catalog, the in-stock toggle, and
    /// one for a narrowed price window.
    pub fn active_filter_count(&self) -> usize {
        let price_narrowed =
            self.price_min != self.global.min || self.price_max != self.global.max;
        self.selected.len() + usize::from(self.in_stock_only) + usize::from(price_narrowed)
    }

    /// Whether `product` passes every active filter.
    pub fn matches(&self, product: &ShopProduct) -> bool {
        if !self.selected.is_empty() && !self.selected.contains(&product.catalog_slug) {
            return false;
        }
        if product.min_price > self.price_max || product.max_price < self.price_min {
            return false;
        }
        if self.in_stock_only && product.availability != Availability::InStock {
            return false;
        }
        true
    }

    /// Every product passing the filter, in input order.
    pub fn filtered<'a>(&self, products: &'a [ShopProduct]) -> Vec<&'a ShopProduct> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// The current page window over the filtered products.
    pub fn view<'a>(&self, products: &'a [ShopProduct]) -> CatalogView<'a> {
        let mut visible = self.filtered(products);
        let total_matches = visible.len();
        visible.truncate(self.show_count);
        CatalogView {
            visible,
            total_matches,
            has_more: total_matches > self.show_count,
        }
    }

    fn update(&mut self, change: impl FnOnce(&mut Self)) {
        let before = (self.price_min, self.price_max, self.in_stock_only);
        change(self);
        if before != (self.price_min, self.price_max, self.in_stock_only) {
            self.reset_page();
        }
    }

    fn reset_page(&mut self) {
        self.show_count = self.page_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop(handler: &str, slug: &str, min: f64, max: f64, availability: Availability) -> ShopProduct {
        ShopProduct {
            handler: handler.to_string(),
            product_group_id: format!("G-{handler}"),
            name: handler.to_string(),
            catalog: catalog_label(slug).unwrap_or("Other").to_string(),
            catalog_slug: slug.to_string(),
            min_price: min,
            max_price: max,
            quality_badge: String::new(),
            availability,
            image_url: String::new(),
            image_alt: String::new(),
            variant_count: 1,
            wholesale_available: false,
        }
    }

    fn products() -> Vec<ShopProduct> {
        vec![
            shop("oil", "batana-oil", 10.0, 60.0, Availability::InStock),
            shop("honey", "stingless-bee-honey", 15.0, 40.0, Availability::OutOfStock),
            shop("herb", "traditional-herbs", 5.0, 8.0, Availability::InStock),
            shop("oil-2", "batana-oil", 90.0, 120.0, Availability::InStock),
        ]
    }

    fn handlers(view: &[&ShopProduct]) -> Vec<String> {
        view.iter().map(|p| p.handler.clone()).collect()
    }

    #[test]
    fn bounds_from_products() {
        let b = PriceBounds::from_products(&products());
        assert_eq!(b, PriceBounds { min: 5.0, max: 120.0 });
        assert_eq!(PriceBounds::from_products(&[]), PriceBounds { min: 0.0, max: 0.0 });
    }

    #[test]
    fn empty_selection_equals_all_selected() {
        let items = products();
        let none = CatalogFilter::for_products(&items, PAGE_SIZE);
        let mut all = none.clone();
        for (slug, _) in CATALOGS {
            all.toggle_catalog(slug);
        }
        assert_eq!(handlers(&none.filtered(&items)), handlers(&all.filtered(&items)));
        assert_eq!(none.filtered(&items).len(), 4);
    }

    #[test]
    fn catalog_selection_filters() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.toggle_catalog("batana-oil");
        assert_eq!(handlers(&f.filtered(&items)), vec!["oil", "oil-2"]);
        f.toggle_catalog("batana-oil");
        assert!(f.selected_catalogs().is_empty());
        assert_eq!(f.filtered(&items).len(), 4);
    }

    #[test]
    fn price_window_uses_range_intersection() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.set_price_min(30.0);
        f.set_price_max(50.0);
        // oil [10,60] and honey [15,40] overlap [30,50]; herb and oil-2 do not.
        assert_eq!(handlers(&f.filtered(&items)), vec!["oil", "honey"]);
    }

    #[test]
    fn min_above_max_clamps_down_to_max() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.set_price_max(50.0);
        f.set_price_min(80.0);
        assert_eq!(f.price_min(), 50.0);
        assert!(f.price_min() <= f.price_max());
    }

    #[test]
    fn max_below_min_clamps_up_to_min() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.set_price_min(40.0);
        f.set_price_max(1.0);
        assert_eq!(f.price_max(), 40.0);
    }

    #[test]
    fn prices_clamp_to_global_bounds() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.set_price_min(-10.0);
        f.set_price_max(10_000.0);
        assert_eq!(f.price_min(), 5.0);
        assert_eq!(f.price_max(), 120.0);
    }

    #[test]
    fn nan_input_never_breaks_ordering() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.set_price_min(f64::NAN);
        f.set_price_max(f64::NAN);
        assert!(f.price_min() <= f.price_max());
        assert!(!f.price_min().is_nan() && !f.price_max().is_nan());
    }

    #[test]
    fn in_stock_only_uses_sentinel() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        f.set_in_stock_only(true);
        assert_eq!(handlers(&f.filtered(&items)), vec!["oil", "herb", "oil-2"]);
    }

    #[test]
    fn load_more_extends_by_one_page() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, 1);
        let view = f.view(&items);
        assert_eq!(handlers(&view.visible), vec!["oil"]);
        assert_eq!(view.total_matches, 4);
        assert!(view.has_more);

        f.load_more();
        f.load_more();
        f.load_more();
        let view = f.view(&items);
        assert_eq!(view.visible.len(), 4);
        assert!(!view.has_more);
    }

    #[test]
    fn filter_change_resets_pagination() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, 1);
        f.load_more();
        assert_eq!(f.show_count(), 2);
        f.set_in_stock_only(true);
        assert_eq!(f.show_count(), 1);

        f.load_more();
        f.toggle_catalog("traditional-herbs");
        assert_eq!(f.show_count(), 1);

        f.load_more();
        f.set_price_min(6.0);
        assert_eq!(f.show_count(), 1);
    }

    #[test]
    fn unchanged_value_keeps_pagination() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, 1);
        f.load_more();
        f.set_in_stock_only(false);
        assert_eq!(f.show_count(), 2);
    }

    #[test]
    fn active_filter_count_and_clear() {
        let items = products();
        let mut f = CatalogFilter::for_products(&items, PAGE_SIZE);
        assert_eq!(f.active_filter_count(), 0);
        f.toggle_catalog("batana-oil");
        f.toggle_catalog("traditional-herbs");
        f.set_in_stock_only(true);
        f.set_price_max(100.0);
        assert_eq!(f.active_filter_count(), 4);

        f.clear();
        assert_eq!(f.active_filter_count(), 0);
        assert_eq!(f.price_min(), 5.0);
        assert_eq!(f.price_max(), 120.0);
    }

    #[test]
    fn counts_are_unfiltered_totals() {
        let counts = catalog_counts(&products());
        assert_eq!(counts["batana-oil"], 2);
        assert_eq!(counts["stingless-bee-honey"], 1);
        assert_eq!(counts["traditional-herbs"], 1);
    }

    #[test]
    fn catalog_urls() {
        let site = "https://forestal-mt.com";
        assert_eq!(
            resolve_catalog_url(site, "batana-oil").unwrap(),
            "https://forestal-mt.com/batana-oil/"
        );
        assert_eq!(
            resolve_catalog_url(site, "stingless-bee-honey").unwrap(),
            "https://forestal-mt.com/stingless-bee-honey/"
        );
        assert_eq!(
            resolve_catalog_url(site, "traditional-herbs").unwrap(),
            "https://forestal-mt.com/traditional-herbs/"
        );
        let err = resolve_catalog_url(site, "unknown-catalog").unwrap_err();
        assert!(err.to_string().contains("Unknown catalog \"unknown-catalog\""));
    }

    #[test]
    fn pagination_saturates_on_huge_page_size() {
        let bounds = PriceBounds { min: 1.0, max: 2.0 };
        let mut f = CatalogFilter::new(bounds, usize::MAX / 2 + 1);
        f.load_more();
        f.load_more();
        assert_eq!(f.show_count(), usize::MAX);

        let mut f = CatalogFilter::new(bounds, usize::MAX / 2 + 1);
        f.show_pages(3);
        assert_eq!(f.show_count(), usize::MAX);
    }

    #[test]
    fn show_pages_sets_window() {
        let mut f = CatalogFilter::new(PriceBounds { min: 1.0, max: 2.0 }, 24);
        f.show_pages(3);
        assert_eq!(f.show_count(), 72);
        f.show_pages(0);
        assert_eq!(f.show_count(), 24);
    }

    #[test]
    fn shop_product_from_record() {
        let record = crate::models::fixtures::product(
            "raw-batana-oil",
            "Raw Batana Oil",
            "batana-oil",
            &[24.0, 9.5],
        );
        let p = ShopProduct::from(&record);
        assert_eq!(p.min_price, 9.5);
        assert_eq!(p.max_price, 24.0);
        assert_eq!(p.variant_count, 2);
        assert_eq!(p.availability, Availability::InStock);
        assert_eq!(p.catalog, "Batana Oil");
    }
}
