//! Schema references declared by pages.

use serde::{Deserialize, Serialize};

/// The schema.org types this site knows how to place in a page graph.
///
/// The set is closed. Type names outside it deserialize to
/// [`SchemaType::Unknown`], which resolves to no node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum SchemaType {
    Organization,
    Brand,
    WebSite,
    /// Embedded in `WebSite.potentialAction`; never standalone.
    SearchAction,
    VideoObject,
    BreadcrumbList,
    /// OG and hero images are emitted inline by page templates.
    ImageObject,
    AboutPage,
    ContactPage,
    WebPage,
    OfferCatalog,
    Service,
    Unknown,
}

impl SchemaType {
    pub fn parse(s: &str) -> Self {
        match s {
            "Organization" => SchemaType::Organization,
            "Brand" => SchemaType::Brand,
            "WebSite" => SchemaType::WebSite,
            "SearchAction" => SchemaType::SearchAction,
            "VideoObject" => SchemaType::VideoObject,
            "BreadcrumbList" => SchemaType::BreadcrumbList,
            "ImageObject" => SchemaType::ImageObject,
            "AboutPage" => SchemaType::AboutPage,
            "ContactPage" => SchemaType::ContactPage,
            "WebPage" => SchemaType::WebPage,
            "OfferCatalog" => SchemaType::OfferCatalog,
            "Service" => SchemaType::Service,
            _ => SchemaType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Organization => "Organization",
            SchemaType::Brand => "Brand",
            SchemaType::WebSite => "WebSite",
            SchemaType::SearchAction => "SearchAction",
            SchemaType::VideoObject => "VideoObject",
            SchemaType::BreadcrumbList => "BreadcrumbList",
            SchemaType::ImageObject => "ImageObject",
            SchemaType::AboutPage => "AboutPage",
            SchemaType::ContactPage => "ContactPage",
            SchemaType::WebPage => "WebPage",
            SchemaType::OfferCatalog => "OfferCatalog",
            SchemaType::Service => "Service",
            SchemaType::Unknown => "Unknown",
        }
    }
}

impl From<String> for SchemaType {
    fn from(s: String) -> Self {
        SchemaType::parse(&s)
    }
}

impl From<SchemaType> for &'static str {
    fn from(t: SchemaType) -> Self {
        t.as_str()
    }
}

/// Full fixture or abbreviated stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum SchemaMode {
    #[default]
    Full,
    Compact,
}

impl From<String> for SchemaMode {
    fn from(s: String) -> Self {
        if s == "compact" {
            SchemaMode::Compact
        } else {
            SchemaMode::Full
        }
    }
}

impl From<SchemaMode> for &'static str {
    fn from(m: SchemaMode) -> Self {
        match m {
            SchemaMode::Full => "full",
            SchemaMode::Compact => "compact",
        }
    }
}

/// A page's request to include one entity in its graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    pub id: String,
    #[serde(default)]
    pub mode: SchemaMode,
}

impl SchemaRef {
    pub fn new(kind: SchemaType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            mode: SchemaMode::Full,
        }
    }

    pub fn compact(mut self) -> Self {
        self.mode = SchemaMode::Compact;
        self
    }
}
