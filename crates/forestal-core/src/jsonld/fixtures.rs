//! Static JSON-LD fixtures, loaded once and passed to the [`GraphBuilder`](super::GraphBuilder).
//!
//! [`RawFixtures`] holds the documents exactly as authored (each may carry its
//! own `@context`). [`Fixtures::from_raw`] checks their shape and derives the
//! graph-ready nodes:
//!
//! - shipping nodes: the `OfferShippingDetails` array, `@context` stripped;
//! - return policy: `Organization.hasMerchantReturnPolicy`, `@context`
//!   stripped, with `applicableCountry` replaced by every two-letter
//!   `addressCountry` found across the shipping destinations (sorted, unique),
//!   so return coverage always tracks shipping coverage.
//!
//! A missing return policy is a hard error. Silently dropping it would ship
//! stale legal copy.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use super::{id_ref, strip_context, Node};
use crate::error::{CoreError, Result};

/// Fixture documents as read from disk.
#[derive(Debug, Clone, Default)]
pub struct RawFixtures {
    pub organization: Value,
    pub brand: Value,
    pub website: Value,
    pub online_store: Value,
    /// Hero `VideoObject` documents, keyed later by their own `@id`.
    pub hero_videos: Vec<Value>,
    /// One `Service` object or an array of them.
    pub services: Value,
    /// One `OfferShippingDetails` object or an array of them.
    pub shipping_details: Value,
}

/// Graph-ready fixture nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixtures {
    pub organization: Node,
    pub brand: Node,
    pub website: Node,
    pub online_store: Node,
    pub hero_videos: BTreeMap<String, Node>,
    pub services: Vec<Node>,
    pub shipping: Vec<Node>,
    pub return_policy: Node,
}

impl Fixtures {
    /// Validate raw documents and derive shipping and return-policy nodes.
    pub fn from_raw(raw: RawFixtures) -> Result<Self> {
        let organization = object("Organization", raw.organization)?;
        let brand = object("Brand", raw.brand)?;
        let website = object("WebSite", raw.website)?;
        let online_store = object("OnlineStore", raw.online_store)?;

        let mut hero_videos = BTreeMap::new();
        for video in raw.hero_videos {
            let node = object("VideoObject", video)?;
            match node.get("@id").and_then(Value::as_str) {
                Some(id) => {
                    hero_videos.insert(id.to_string(), node);
                }
                None => {
                    return Err(malformed("VideoObject", "missing @id"));
                }
            }
        }

        let services = object_list("Service", raw.services)?;
        let shipping: Vec<Node> = object_list("OfferShippingDetails", raw.shipping_details)?
            .into_iter()
            .map(strip_context)
            .collect();

        let return_policy = derive_return_policy(&organization, &shipping)?;
        debug!(
            videos = hero_videos.len(),
            services = services.len(),
            shipping = shipping.len(),
            "fixtures loaded"
        );

        Ok(Self {
            organization,
            brand,
            website,
            online_store,
            hero_videos,
            services,
            shipping,
            return_policy,
        })
    }

    /// `{"@id": ...}` references to every shipping node.
    pub fn shipping_refs(&self) -> Vec<Value> {
        self.shipping
            .iter()
            .filter_map(|n| n.get("@id").and_then(Value::as_str))
            .map(id_ref)
            .collect()
    }

    /// `{"@id": ...}` reference to the return policy, if it has an `@id`.
    pub fn return_policy_ref(&self) -> Option<Value> {
        self.return_policy
            .get("@id")
            .and_then(Value::as_str)
            .map(id_ref)
    }
}

/// Sorted, unique two-letter `addressCountry` codes across shipping nodes.
pub fn shipping_countries(shipping: &[Node]) -> Vec<String> {
    let mut countries = BTreeSet::new();
    for node in shipping {
        let regions: Vec<&Value> = match node.get("shippingDestination") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(single) => vec![single],
            None => Vec::new(),
        };
        for region in regions {
            if let Some(code) = region.get("addressCountry").and_then(Value::as_str) {
                if code.len() == 2 {
                    countries.insert(code.to_string());
                }
            }
        }
    }
    countries.into_iter().collect()
}

fn derive_return_policy(organization: &Node, shipping: &[Node]) -> Result<Node> {
    let policy = match organization.get("hasMerchantReturnPolicy") {
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(malformed(
                "Organization",
                "hasMerchantReturnPolicy is not an object",
            ))
        }
        None => return Err(CoreError::MissingReturnPolicy),
    };
    let mut policy = strip_context(policy);
    let countries = shipping_countries(shipping)
        .into_iter()
        .map(Value::String)
        .collect();
    policy.insert("applicableCountry".to_string(), Value::Array(countries));
    Ok(policy)
}

fn object(name: &str, value: Value) -> Result<Node> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(malformed(
            name,
            &format!("expected a JSON object, found {}", kind(&other)),
        )),
    }
}

fn object_list(name: &str, value: Value) -> Result<Vec<Node>> {
    match value {
        Value::Array(items) => items.into_iter().map(|v| object(name, v)).collect(),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![object(name, other)?]),
    }
}

fn malformed(name: &str, reason: &str) -> CoreError {
    CoreError::MalformedFixture {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
