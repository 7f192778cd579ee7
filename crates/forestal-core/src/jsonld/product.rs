//! Product detail and shop listing graphs.
//!
//! Unlike content pages these graphs have a fixed shape. Node order for a
//! product page:
//!
//! 1. Organization, Brand, OnlineStore (compact stubs)
//! 2. `ImageObject` (`#image`)
//! 3. `ProductGroup` (`#product-group`), before any variant
//! 4. one `Product` + `Offer` per price-list entry (`#variant-{sku}`)
//! 5. shipping nodes, then the return policy
//! 6. `BreadcrumbList`: Home, catalog, product (last unlinked)
//! 7. `HowTo` (`#how-to-use`) when usage steps exist

use serde_json::{json, Value};

use super::{as_node, graph_document, id_ref, strip_context, GraphBuilder, Node};
use crate::catalog::{resolve_catalog_url, ShopProduct};
use crate::error::Result;
use crate::models::{Availability, ProductRecord};

/// A step longer than this before its first colon is not treated as titled.
const MAX_STEP_TITLE: usize = 60;

/// `HowToStep` nodes for free-form usage lines.
///
/// `"Warm: Heat the jar gently"` becomes name `Warm`, text `Heat the jar
/// gently`. Lines without a colon in character positions `1..60` are named
/// `Step N` and keep their whole text.
pub fn how_to_steps(lines: &[String]) -> Vec<Value> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let position = i + 1;
            let (name, text) = match split_step(line) {
                Some((name, text)) => (name.to_string(), text.to_string()),
                None => (format!("Step {position}"), line.clone()),
            };
            json!({ "@type": "HowToStep", "position": position, "name": name, "text": text })
        })
        .collect()
}

fn split_step(line: &str) -> Option<(&str, &str)> {
    let (byte_idx, char_idx) = line
        .char_indices()
        .enumerate()
        .find(|(_, (_, c))| *c == ':')
        .map(|(ci, (bi, _))| (bi, ci))?;
    if char_idx == 0 || char_idx >= MAX_STEP_TITLE {
        return None;
    }
    Some((line[..byte_idx].trim(), line[byte_idx + 1..].trim()))
}

impl GraphBuilder {
    /// Abbreviated OnlineStore node, taken from the fixture's identity fields.
    pub fn online_store_compact(&self) -> Node {
        let store = &self.fixtures().online_store;
        let mut node = Node::new();
        node.insert("@type".to_string(), json!("OnlineStore"));
        for key in ["@id", "name", "url"] {
            if let Some(v) = store.get(key) {
                node.insert(key.to_string(), v.clone());
            }
        }
        node
    }

    /// Serialized `@graph` for a product detail page.
    ///
    /// Fails only when the product's catalog slug has no landing page.
    pub fn product_graph(&self, product: &ProductRecord) -> Result<String> {
        let site = self.site();
        let fixtures = self.fixtures();
        let canonical = format!("{}{}", site.url, product.path());
        let catalog_url = resolve_catalog_url(&site.url, &product.catalog_slug)?;
        let organization = id_ref(&site.id("organization"));
        let brand = id_ref(&site.id("brand"));
        let group_id = format!("{canonical}#product-group");
        let image = &product.media.image;
        let content = &product.content;

        let mut graph = vec![
            site.organization_compact(),
            site.brand_compact(),
            self.online_store_compact(),
            as_node(json!({
                "@type": "ImageObject",
                "@id": format!("{canonical}#image"),
                "url": image.url,
                "contentUrl": image.url,
                "caption": image.caption,
                "width": image.width,
                "height": image.height,
                "encodingFormat": image.encoding_format,
                "creator": organization,
            })),
        ];

        let variant_refs: Vec<Value> = product
            .pricing
            .iter()
            .map(|pv| id_ref(&format!("{canonical}#variant-{}", pv.sku)))
            .collect();

        let mut group = as_node(json!({
            "@type": "ProductGroup",
            "@id": group_id,
            "name": product.name,
            "description": content.short_description,
            "brand": brand,
            "manufacturer": organization,
            "url": canonical,
            "image": id_ref(&format!("{canonical}#image")),
            "variesBy": ["https://schema.org/size"],
            "hasVariant": variant_refs,
            "productGroupID": product.product_group_id,
            "countryOfOrigin": { "@type": "Country", "name": site.country_of_origin },
            "category": content.category,
        }));
        if let Some(material) = &content.material {
            group.insert("material".to_string(), json!(material));
        }
        if !content.tags.is_empty() {
            group.insert("keywords".to_string(), json!(content.tags.join(", ")));
        }
        let mut properties = Vec::new();
        if let Some(botanical) = &product.botanical_name {
            properties.push(json!({ "@type": "PropertyValue", "name": "Botanical Name", "value": botanical }));
        }
        if let Some(badge) = &content.quality_badge {
            properties.push(json!({ "@type": "PropertyValue", "name": "Quality", "value": badge }));
        }
        if !properties.is_empty() {
            group.insert("additionalProperty".to_string(), Value::Array(properties));
        }
        if let Some(audience) = &content.audience {
            let mut node = as_node(json!({ "@type": "PeopleAudience" }));
            if let Some(gender) = &audience.suggested_gender {
                node.insert("suggestedGender".to_string(), json!(gender));
            }
            if let Some(age) = audience.suggested_min_age {
                node.insert("suggestedMinAge".to_string(), json!(age));
            }
            group.insert("audience".to_string(), Value::Object(node));
        }
        graph.push(group);

        let shipping_refs = fixtures.shipping_refs();
        let return_policy = fixtures.return_policy_ref();
        for pv in &product.pricing {
            let inventory = product.variant(&pv.sku);
            let availability = inventory.map_or(Availability::InStock, |v| v.availability);
            let variant_image = product
                .media
                .variant_images
                .iter()
                .find(|v| v.sku == pv.sku)
                .map_or(&image.url, |v| &v.url);

            let mut offer = as_node(json!({
                "@type": "Offer",
                "price": pv.price,
                "priceCurrency": pv.currency,
                "availability": availability.schema_url(),
                "itemCondition": "https://schema.org/NewCondition",
                "priceValidUntil": site.price_valid_until,
                "url": canonical,
                "seller": organization,
                "shippingDetails": shipping_refs,
            }));
            if let Some(policy) = &return_policy {
                offer.insert("hasMerchantReturnPolicy".to_string(), policy.clone());
            }

            let mut variant = as_node(json!({
                "@type": "Product",
                "@id": format!("{canonical}#variant-{}", pv.sku),
                "name": pv.sku_name,
                "description": content.short_description,
                "sku": pv.sku,
                "brand": brand,
                "category": content.category,
            }));
            if let Some(v) = inventory {
                variant.insert("size".to_string(), json!(v.size));
                if let Some(kg) = v.weight_kg {
                    variant.insert(
                        "weight".to_string(),
                        json!({ "@type": "QuantitativeValue", "value": kg, "unitCode": "KGM" }),
                    );
                }
            }
            variant.insert("image".to_string(), json!(variant_image));
            variant.insert("isVariantOf".to_string(), id_ref(&group_id));
            variant.insert("offers".to_string(), Value::Object(offer));
            graph.push(variant);
        }

        graph.extend(fixtures.shipping.iter().cloned());
        graph.push(fixtures.return_policy.clone());

        graph.push(as_node(json!({
            "@type": "BreadcrumbList",
            "@id": format!("{canonical}#breadcrumb"),
            "itemListElement": [
                { "@type": "ListItem", "position": 1, "name": "Home", "item": site.home() },
                { "@type": "ListItem", "position": 2, "name": product.catalog, "item": catalog_url },
                { "@type": "ListItem", "position": 3, "name": product.name },
            ],
        })));

        if !content.how_to_use.is_empty() {
            graph.push(as_node(json!({
                "@type": "HowTo",
                "@id": format!("{canonical}#how-to-use"),
                "name": format!("How to Use {}", product.name),
                "step": how_to_steps(&content.how_to_use),
            })));
        }

        // The graph always holds the site stubs, so it is never empty.
        Ok(graph_document(graph).unwrap_or_default())
    }

    /// Serialized `@graph` for the shop listing page.
    pub fn shop_graph(&self, products: &[ShopProduct]) -> String {
        let site = self.site();
        let fixtures = self.fixtures();
        let shop_url = format!("{}/products/", site.url);

        let items: Vec<Value> = products
            .iter()
            .enumerate()
            .map(|(i, p)| {
                json!({
                    "@type": "ListItem",
                    "position": i + 1,
                    "item": {
                        "@id": format!("{}/products/{}/#product-group", site.url, p.handler),
                        "name": p.name,
                        "image": p.image_url,
                    },
                })
            })
            .collect();

        let mut graph = vec![
            site.organization_compact(),
            site.brand_compact(),
            strip_context(fixtures.online_store.clone()),
            as_node(json!({
                "@type": "CollectionPage",
                "@id": format!("{shop_url}#collection"),
                "name": "Products",
                "url": shop_url,
                "isPartOf": id_ref(&site.id("website")),
                "about": id_ref(&site.id("organization")),
                "description": format!(
                    "Browse our full catalog of {} premium ethnobotanical products from {}.",
                    products.len(),
                    site.country_of_origin
                ),
            })),
            as_node(json!({
                "@type": "ItemList",
                "@id": format!("{shop_url}#product-list"),
                "numberOfItems": products.len(),
                "itemListElement": items,
            })),
        ];
        graph.extend(fixtures.shipping.iter().cloned());
        graph.push(fixtures.return_policy.clone());
        graph.push(as_node(json!({
            "@type": "BreadcrumbList",
            "@id": format!("{shop_url}#breadcrumb"),
            "itemListElement": [
                { "@type": "ListItem", "position": 1, "name": "Home", "item": site.home() },
                { "@type": "ListItem", "position": 2, "name": "Products" },
            ],
        })));

        graph_document(graph).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::jsonld::testing::{builder, parse};
    use crate::models::fixtures::product;
    use crate::models::{Audience, ProductVariantData, VariantImage};

    const PDP: &str = "https://forestal-mt.com/products/raw-batana-oil/";

    fn batana() -> ProductRecord {
        let mut p = product("raw-batana-oil", "Raw Batana Oil", "batana-oil", &[24.0, 61.0]);
        p.botanical_name = Some("Elaeis oleifera".to_string());
        p.content.tags = vec!["batana".to_string(), "hair oil".to_string()];
        p.content.quality_badge = Some("Wildcrafted".to_string());
        p.content.audience = Some(Audience {
            suggested_gender: None,
            suggested_min_age: Some(12),
        });
        p.content.how_to_use = vec![
            "Warm: Place the jar in warm water".to_string(),
            "Apply a small amount to the scalp".to_string(),
        ];
        p.variants = vec![ProductVariantData {
            sku: "raw-batana-oil-1".to_string(),
            size: "250 ml".to_string(),
            availability: Availability::OutOfStock,
            weight_kg: Some(0.31),
        }];
        p.media.variant_images = vec![VariantImage {
            sku: "raw-batana-oil-1".to_string(),
            url: "https://cdn.example.com/raw-batana-oil-250.png".to_string(),
            alt: String::new(),
        }];
        p
    }

    fn nodes(doc: &str) -> Vec<Value> {
        parse(doc)["@graph"].as_array().unwrap().clone()
    }

    #[test]
    fn product_graph_node_order() {
        let doc = builder().product_graph(&batana()).unwrap();
        let ids: Vec<String> = nodes(&doc)
            .iter()
            .map(|n| n["@id"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            ids,
            vec![
                "https://forestal-mt.com/#organization".to_string(),
                "https://forestal-mt.com/#brand".to_string(),
                "https://forestal-mt.com/#onlinestore".to_string(),
                format!("{PDP}#image"),
                format!("{PDP}#product-group"),
                format!("{PDP}#variant-raw-batana-oil-0"),
                format!("{PDP}#variant-raw-batana-oil-1"),
                "https://forestal-mt.com/#shipping-us".to_string(),
                "https://forestal-mt.com/#shipping-eu".to_string(),
                "https://forestal-mt.com/#return-policy".to_string(),
                format!("{PDP}#breadcrumb"),
                format!("{PDP}#how-to-use"),
            ]
        );
        assert!(nodes(&doc).iter().all(|n| n.get("@context").is_none()));
    }

    #[test]
    fn product_group_fields() {
        let doc = builder().product_graph(&batana()).unwrap();
        let graph = nodes(&doc);
        let group = &graph[4];
        assert_eq!(group["@type"], "ProductGroup");
        assert_eq!(group["keywords"], "batana, hair oil");
        assert_eq!(group["countryOfOrigin"]["name"], "Honduras");
        assert_eq!(group["hasVariant"].as_array().unwrap().len(), 2);
        assert_eq!(group["additionalProperty"][0]["value"], "Elaeis oleifera");
        assert_eq!(group["additionalProperty"][1]["name"], "Quality");
        assert_eq!(group["audience"], json!({ "@type": "PeopleAudience", "suggestedMinAge": 12 }));
        assert!(group.get("material").is_none());
    }

    #[test]
    fn variant_offers() {
        let doc = builder().product_graph(&batana()).unwrap();
        let graph = nodes(&doc);
        let first = &graph[5];
        assert!(first.get("size").is_none());
        assert_eq!(first["image"], "https://cdn.example.com/raw-batana-oil.png");
        assert_eq!(first["offers"]["availability"], "https://schema.org/InStock");
        assert_eq!(first["offers"]["priceValidUntil"], "2026-12-31");
        assert_eq!(
            first["offers"]["hasMerchantReturnPolicy"]["@id"],
            "https://forestal-mt.com/#return-policy"
        );
        assert_eq!(first["offers"]["shippingDetails"].as_array().unwrap().len(), 2);

        let second = &graph[6];
        assert_eq!(second["size"], "250 ml");
        assert_eq!(second["weight"]["unitCode"], "KGM");
        assert_eq!(second["image"], "https://cdn.example.com/raw-batana-oil-250.png");
        assert_eq!(second["offers"]["availability"], "https://schema.org/OutOfStock");
        assert_eq!(second["isVariantOf"]["@id"], format!("{PDP}#product-group"));
    }

    #[test]
    fn breadcrumb_links_catalog() {
        let doc = builder().product_graph(&batana()).unwrap();
        let graph = nodes(&doc);
        let crumb = &graph[10];
        let items = crumb["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1]["item"], "https://forestal-mt.com/batana-oil/");
        assert!(items[2].get("item").is_none());
    }

    #[test]
    fn no_how_to_without_steps() {
        let mut p = batana();
        p.content.how_to_use.clear();
        let doc = builder().product_graph(&p).unwrap();
        let last = nodes(&doc).last().cloned().unwrap();
        assert_eq!(last["@type"], "BreadcrumbList");
    }

    #[test]
    fn unknown_catalog_fails() {
        let p = product("x", "X", "unknown-catalog", &[1.0]);
        assert!(matches!(
            builder().product_graph(&p),
            Err(CoreError::UnknownCatalog(slug)) if slug == "unknown-catalog"
        ));
    }

    #[test]
    fn how_to_split_rule() {
        let long_title = format!("{}: text", "a".repeat(60));
        let steps = how_to_steps(&[
            "Massage:  Work into the scalp ".to_string(),
            ": leading colon".to_string(),
            long_title.clone(),
            "No colon here".to_string(),
            "Día uno: aplicar".to_string(),
        ]);
        assert_eq!(steps[0]["name"], "Massage");
        assert_eq!(steps[0]["text"], "Work into the scalp");
        assert_eq!(steps[0]["position"], 1);
        assert_eq!(steps[1]["name"], "Step 2");
        assert_eq!(steps[1]["text"], ": leading colon");
        assert_eq!(steps[2]["name"], "Step 3");
        assert_eq!(steps[2]["text"], long_title);
        assert_eq!(steps[3]["name"], "Step 4");
        assert_eq!(steps[4]["name"], "Día uno");
    }

    #[test]
    fn shop_graph_shape() {
        let b = builder();
        let products: Vec<ShopProduct> = [
            product("raw-batana-oil", "Raw Batana Oil", "batana-oil", &[24.0]),
            product("jimerito-honey", "Jimerito Honey", "stingless-bee-honey", &[18.0]),
        ]
        .iter()
        .map(ShopProduct::from)
        .collect();

        let graph = nodes(&b.shop_graph(&products));
        let types: Vec<&str> = graph.iter().map(|n| n["@type"].as_str().unwrap()).collect();
        assert_eq!(
            types,
            vec![
                "Organization",
                "Brand",
                "OnlineStore",
                "CollectionPage",
                "ItemList",
                "OfferShippingDetails",
                "OfferShippingDetails",
                "MerchantReturnPolicy",
                "BreadcrumbList",
            ]
        );
        assert!(graph[2].get("hasOfferCatalog").is_some());
        assert!(graph[2].get("@context").is_none());
        assert_eq!(graph[4]["numberOfItems"], 2);
        assert_eq!(
            graph[4]["itemListElement"][1]["item"]["@id"],
            "https://forestal-mt.com/products/jimerito-honey/#product-group"
        );
        assert_eq!(graph[8]["itemListElement"][1]["name"], "Products");
    }

    #[test]
    fn online_store_stub_keeps_identity_only() {
        let stub = builder().online_store_compact();
        let keys: Vec<&str> = stub.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@type", "@id", "name", "url"]);
    }
}
