//! Content-page graphs driven by declared [`SchemaRef`]s.
//!
//! Resolution is best effort. A reference that yields nothing (unknown
//! type, embedded-only type, missing fixture) is dropped with a debug log,
//! so one missing optional node never blocks a page from building.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::schema::{SchemaMode, SchemaRef, SchemaType};
use super::{as_node, graph_document, id_ref, strip_context, GraphBuilder, Node, Site};

/// Per-page inputs for synthesized nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub page_name: String,
    pub canonical_url: String,
}

/// Outcome of resolving one reference.
enum Resolved {
    Nothing,
    One(Node),
    Many(Vec<Node>),
}

/// Two-item breadcrumb: linked "Home", then the unlinked current page.
///
/// The last entry has no `item` URL so the page does not link to itself.
pub fn build_breadcrumb(site: &Site, page_name: &str, canonical_url: &str) -> Node {
    as_node(json!({
        "@type": "BreadcrumbList",
        "@id": format!("{canonical_url}#breadcrumb"),
        "itemListElement": [
            { "@type": "ListItem", "position": 1, "name": "Home", "item": site.home() },
            { "@type": "ListItem", "position": 2, "name": page_name },
        ],
    }))
}

impl GraphBuilder {
    /// Build the serialized `@graph` document for a content page.
    ///
    /// Returns `None` when no reference resolves to a node.
    pub fn page_graph(&self, schemas: &[SchemaRef], page: &PageContext) -> Option<String> {
        let mut graph = Vec::new();
        for schema in schemas {
            match self.resolve(schema, page) {
                Resolved::Nothing => {
                    debug!(kind = schema.kind.as_str(), id = %schema.id, "schema ref has no node");
                }
                Resolved::One(node) => graph.push(strip_context(node)),
                Resolved::Many(nodes) => graph.extend(nodes.into_iter().map(strip_context)),
            }
        }
        graph_document(graph)
    }

    fn resolve(&self, schema: &SchemaRef, page: &PageContext) -> Resolved {
        let fixtures = self.fixtures();
        let compact = schema.mode == SchemaMode::Compact;

        match schema.kind {
            SchemaType::Organization if compact => Resolved::One(self.site().organization_compact()),
            SchemaType::Organization => Resolved::One(fixtures.organization.clone()),
            SchemaType::Brand if compact => Resolved::One(self.site().brand_compact()),
            SchemaType::Brand => Resolved::One(fixtures.brand.clone()),
            SchemaType::WebSite => Resolved::One(fixtures.website.clone()),
            SchemaType::VideoObject => fixtures
                .hero_videos
                .get(&schema.id)
                .cloned()
                .map_or(Resolved::Nothing, Resolved::One),
            SchemaType::BreadcrumbList => Resolved::One(build_breadcrumb(
                self.site(),
                &page.page_name,
                &page.canonical_url,
            )),
            SchemaType::AboutPage | SchemaType::ContactPage | SchemaType::WebPage => {
                Resolved::One(self.web_page(schema, page))
            }
            SchemaType::Service => self.services(&schema.id),
            SchemaType::OfferCatalog => fixtures
                .online_store
                .get("hasOfferCatalog")
                .and_then(|catalog| find_by_id(catalog, &schema.id))
                .map_or(Resolved::Nothing, |node| Resolved::One(node.clone())),
            SchemaType::SearchAction | SchemaType::ImageObject | SchemaType::Unknown => {
                Resolved::Nothing
            }
        }
    }

    fn web_page(&self, schema: &SchemaRef, page: &PageContext) -> Node {
        as_node(json!({
            "@type": schema.kind.as_str(),
            "@id": schema.id,
            "name": page.page_name,
            "url": page.canonical_url,
            "isPartOf": id_ref(&self.site().id("website")),
            "about": id_ref(&self.site().id("organization")),
        }))
    }

    /// One service when `id` names it, otherwise every service.
    fn services(&self, id: &str) -> Resolved {
        let services = &self.fixtures().services;
        if let Some(node) = services
            .iter()
            .find(|n| n.get("@id").and_then(Value::as_str) == Some(id))
        {
            return Resolved::One(node.clone());
        }
        match services.len() {
            0 => Resolved::Nothing,
            _ => Resolved::Many(services.clone()),
        }
    }
}

/// Depth-first search for the object whose `@id` equals `id`.
fn find_by_id<'a>(value: &'a Value, id: &str) -> Option<&'a Node> {
    match value {
        Value::Object(map) => {
            if map.get("@id").and_then(Value::as_str) == Some(id) {
                return Some(map);
            }
            map.values().find_map(|v| find_by_id(v, id))
        }
        Value::Array(items) => items.iter().find_map(|v| find_by_id(v, id)),
        _ => None,
    }
}
