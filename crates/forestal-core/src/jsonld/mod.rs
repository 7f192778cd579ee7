//! JSON-LD `@graph` assembly for page `<head>` injection.
//!
//! Pages declare the schema.org entities they want as a list of
//! [`SchemaRef`]s. The [`GraphBuilder`] resolves each reference against the
//! static [`Fixtures`] (loaded once at startup and passed in) or synthesizes
//! the node from page context, then emits a single document:
//!
//! ```json
//! { "@context": "https://schema.org", "@graph": [ ... ] }
//! ```
//!
//! `@context` appears once on the root and is stripped from every member
//! node. Nodes reference each other by `@id` string only.
//!
//! | Builder | Output |
//! |---------|--------|
//! | [`GraphBuilder::page_graph`] | Content pages, driven by `SchemaRef`s |
//! | [`GraphBuilder::product_graph`] | Product detail pages |
//! | [`GraphBuilder::shop_graph`] | The shop listing page |

pub mod fixtures;
pub mod page;
pub mod product;
pub mod schema;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub use fixtures::{Fixtures, RawFixtures};
pub use page::PageContext;
pub use schema::{SchemaMode, SchemaRef, SchemaType};

/// A JSON-LD node: one object of schema.org properties.
pub type Node = Map<String, Value>;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Site identity used for `@id` construction and compact stubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Origin without trailing slash, e.g. `https://forestal-mt.com`.
    pub url: String,
    pub name: String,
    pub country_of_origin: String,
    /// `priceValidUntil` stamped on every offer (`YYYY-MM-DD`).
    pub price_valid_until: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            url: "https://forestal-mt.com".to_string(),
            name: "Forestal MT".to_string(),
            country_of_origin: "Honduras".to_string(),
            price_valid_until: "2026-12-31".to_string(),
        }
    }
}

impl Site {
    /// Site-level `@id`, e.g. `https://forestal-mt.com/#organization`.
    pub fn id(&self, fragment: &str) -> String {
        format!("{}/#{}", self.url, fragment)
    }

    /// Home page URL with trailing slash.
    pub fn home(&self) -> String {
        format!("{}/", self.url)
    }

    /// Abbreviated Organization node for pages that only reference it.
    pub fn organization_compact(&self) -> Node {
        as_node(json!({
            "@type": "Organization",
            "@id": self.id("organization"),
            "name": self.name,
            "url": self.url,
            "logo": {
                "@type": "ImageObject",
                "url": format!("{}/android-chrome-512x512.png", self.url),
            },
        }))
    }

    /// Abbreviated Brand node.
    pub fn brand_compact(&self) -> Node {
        as_node(json!({
            "@type": "Brand",
            "@id": self.id("brand"),
            "name": self.name,
            "url": self.url,
        }))
    }
}

/// Remove `@context` from a node. It belongs on the document root only.
///
/// Key order of the remaining properties is preserved.
pub fn strip_context(mut node: Node) -> Node {
    node.shift_remove("@context");
    node
}

/// `{"@id": id}` reference object.
pub fn id_ref(id: &str) -> Value {
    json!({ "@id": id })
}

/// Serialize graph members under a single root `@context`.
///
/// Returns `None` for an empty graph so callers skip emission instead of
/// shipping `{"@context": ..., "@graph": []}`.
pub fn graph_document(graph: Vec<Node>) -> Option<String> {
    if graph.is_empty() {
        return None;
    }
    let members: Vec<Value> = graph.into_iter().map(Value::Object).collect();
    Some(json!({ "@context": SCHEMA_CONTEXT, "@graph": members }).to_string())
}

pub(crate) fn as_node(value: Value) -> Node {
    match value {
        Value::Object(map) => map,
        _ => Node::new(),
    }
}

/// Resolves schema references and assembles page graphs.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    site: Site,
    fixtures: Fixtures,
}

impl GraphBuilder {
    pub fn new(site: Site, fixtures: Fixtures) -> Self {
        Self { site, fixtures }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }
}
