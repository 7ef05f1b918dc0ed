//! Buddy API interaction module
//!
//! Everything needed to read entities from the Buddy REST API.
//!
//! # Module Structure
//!
//! - [`api`] - The [`BuddyApi`] trait the data sources are written against
//! - [`client`] - [`BuddyClient`], the reqwest-backed implementation
//! - [`http`] - HTTP utilities and error-body parsing
//! - [`models`] - Response DTOs
//! - [`query`] - Options for scoped list calls
//!
//! # Example
//!
//! ```ignore
//! use buddy_datasources::buddy::{BuddyApi, BuddyClient, HttpOptions};
//!
//! async fn example() -> Result<(), buddy_datasources::buddy::ApiError> {
//!     let client = BuddyClient::new("https://api.buddy.works", "token", &HttpOptions::default())?;
//!     let project = client.get_project("acme", "web").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod models;
pub mod query;

pub use api::BuddyApi;
pub use client::BuddyClient;
pub use error::ApiError;
pub use http::HttpOptions;
