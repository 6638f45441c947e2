//! Creator Studio Gateway
//!
//! HTTP client for the hosted backend the studio runs against: an
//! identity provider (`/auth/v1`), object storage (`/storage/v1`) and a
//! table API (`/rest/v1`).
//!
//! # Features
//!
//! - **Authentication**: password, sign-up, one-time codes, password reset
//! - **Storage**: upload without overwrite, batch removal, public URLs
//! - **Tables**: filtered and ordered selects, insert/update returning rows
//!
//! [`GatewayClient`] implements the `studio-core` backend traits, so the
//! views can be driven by it or by in-memory fakes.
//!
//! # Example
//!
//! ```ignore
//! use studio_core::CatalogStore;
//! use studio_gateway::{GatewayClient, GatewayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new(GatewayConfig::new("https://abc.supabase.co", "anon-key"))?;
//!
//!     client.sign_in_with_password("producer@studio.com", "secret").await?;
//!
//!     let tracks = client.list_tracks().await?;
//!     println!("Found {} tracks", tracks.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod backend;
mod client;
mod error;
mod response;
mod rest;
mod storage;
mod types;

// Re-export main types
pub use client::{GatewayClient, StorageHandle, TableHandle, GENRES_TABLE, TRACKS_TABLE};
pub use error::{GatewayError, Result};
pub use rest::Query;
pub use storage::public_url;
pub use types::{ApiError, GatewayConfig, UploadResponse, DEFAULT_BUCKET};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use rest::TableClient;
pub use storage::StorageClient;
