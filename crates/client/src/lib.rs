//! `storefront-client`: talks to the storefront backend and drives the cart.
//!
//! The cart and catalog crates are pure; everything that waits on the network
//! lives here:
//! - collaborator traits for the catalog, the cart and the session,
//! - an HTTP adapter and an in-memory backend implementing them,
//! - [`Storefront`], which runs the quantity-mutation protocol end to end,
//! - environment configuration for the `storefront` binary.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod source;
pub mod storefront;

pub use config::{ClientConfig, ConfigError};
pub use error::RemoteError;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use source::{CartStore, CatalogSource};
pub use storefront::Storefront;
