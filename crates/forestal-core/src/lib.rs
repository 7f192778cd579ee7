//! # Forestal Core
//!
//! Storefront logic for forestal-mt.com that runs identically at build time
//! and behind the HTTP API: accent-insensitive product search, shop grid
//! filtering, contact-form validation, and schema.org JSON-LD graphs.
//!
//! This crate has no async runtime, filesystem, or network dependencies.
//! Callers load data and fixtures and pass them in as values.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`normalize`] | Case and diacritic folding |
//! | [`search`] | Search index construction and ranking |
//! | [`catalog`] | Shop grid filter, price clamping, pagination |
//! | [`contact`] | Contact payload validation and formatting |
//! | [`jsonld`] | `@graph` assembly for pages, products, and the shop |
//! | [`models`] | Product records |

pub mod catalog;
pub mod contact;
pub mod error;
pub mod jsonld;
pub mod models;
pub mod normalize;
pub mod search;

pub use error::{CoreError, Result};
