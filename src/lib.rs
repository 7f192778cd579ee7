//! # Forestal
//!
//! Build-time tooling and HTTP API for the Forestal MT storefront.
//!
//! The storefront logic lives in [`forestal_core`]; this crate wires it to
//! files on disk, the command line, and the network.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌────────────────┐   ┌──────────────────┐
//! │ products.json    │──▶│ forestal-core  │──▶│ export (dist/)   │
//! │ jsonld fixtures  │   │ search/catalog │   │ search, shop,    │
//! │ page manifests   │   │ jsonld/contact │   │ JSON-LD graphs   │
//! └──────────────────┘   └───────┬────────┘   └──────────────────┘
//!                                │
//!                     ┌──────────┴─────────┐
//!                     ▼                    ▼
//!                ┌──────────┐        ┌──────────┐
//!                │   CLI    │        │   HTTP   │
//!                │(forestal)│        │  /api/*  │
//!                └──────────┘        └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`data`] | Loading products, fixtures, and page manifests |
//! | [`search`] | `forestal search` |
//! | [`shop`] | `forestal shop` |
//! | [`graph`] | `forestal graph` |
//! | [`export`] | Static-site exports |
//! | [`contact`] | Contact mail delivery and bot verification |
//! | [`server`] | HTTP API |
//! | [`logging`] | `tracing` subscriber setup |

pub mod config;
pub mod contact;
pub mod data;
pub mod export;
pub mod graph;
pub mod logging;
pub mod search;
pub mod server;
pub mod shop;
