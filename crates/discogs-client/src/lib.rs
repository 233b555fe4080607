//! Discogs API client for reading a user's collection.
//!
//! This crate provides a blocking client that:
//! - Builds authenticated collection page requests (`Authorization` + `User-Agent`)
//! - Retries throttled (HTTP 429) and transport-failed requests with a flat delay
//! - Maps every other failure onto `catalog::PickerError` without retrying
//! - Decodes successful responses into `catalog::CollectionPage`
//!
//! ## Example Usage
//! ```ignore
//! use catalog::CollectionSource;
//! use discogs_client::{ClientConfig, DiscogsClient, Token};
//!
//! let client = DiscogsClient::new(ClientConfig::new("digger"), &Token::new(token));
//! let size = client.fetch_collection_size()?;
//! let page = client.fetch_page(1, 50)?;
//! ```

pub mod client;
pub mod transport;

pub use client::{ClientConfig, DiscogsClient, RetryPolicy, Token, DEFAULT_BASE_URL, USER_AGENT};
pub use transport::{HttpResponse, HttpTransport, TransportError, UreqTransport};
