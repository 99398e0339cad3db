//! Object storage client for the VGen backend.
//!
//! This crate provides:
//! - Classification of media links (signed, public, unrelated)
//! - Extraction of bucket/object addressing from signed links
//! - Signed URL issuance against the storage REST API
//! - Request metrics

pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod metrics;

pub use client::StorageClient;
pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use link::{classify, extract_reference, LinkClass, StorageReference, PUBLIC_ROUTE, SIGN_ROUTE};
