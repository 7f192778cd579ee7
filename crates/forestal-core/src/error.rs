//! Error types for the forestal-core crate.
//!
//! Scoring, normalization, and filtering never fail. Errors come from
//! fixture loading, catalog URL resolution, and contact-form validation.

/// Errors raised by the core library.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `Organization.hasMerchantReturnPolicy` is absent from the fixture.
    #[error(
        "Organization fixture missing hasMerchantReturnPolicy; structure may have changed to @graph format"
    )]
    MissingReturnPolicy,

    /// A fixture document does not have the expected JSON shape.
    #[error("fixture {name} is malformed: {reason}")]
    MalformedFixture { name: String, reason: String },

    /// A catalog slug with no known landing page.
    #[error("Unknown catalog \"{0}\"")]
    UnknownCatalog(String),

    /// A required contact field is missing, blank, or has the wrong type.
    #[error("missing or invalid field: {0}")]
    InvalidField(&'static str),

    /// A contact field exceeds its length limit.
    #[error("field {field} exceeds {limit} characters")]
    FieldTooLong { field: &'static str, limit: usize },
}

/// Convenience type alias for core results.
pub type Result<T> = std::result::Result<T, CoreError>;
