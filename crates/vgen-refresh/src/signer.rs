//! Signed link issuance seam.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use vgen_storage::{StorageClient, StorageReference, StorageResult};

/// Issues time-limited links for stored objects.
///
/// Implementations may fail for any reason; callers decide how to degrade.
#[async_trait]
pub trait LinkSigner: Send + Sync {
    /// Return a new signed URL for `reference`, valid for `validity`.
    async fn issue_signed_link(
        &self,
        reference: &StorageReference,
        validity: Duration,
    ) -> StorageResult<String>;
}

#[async_trait]
impl LinkSigner for StorageClient {
    async fn issue_signed_link(
        &self,
        reference: &StorageReference,
        validity: Duration,
    ) -> StorageResult<String> {
        self.create_signed_url(reference, validity).await
    }
}

#[async_trait]
impl<T: LinkSigner + ?Sized> LinkSigner for Arc<T> {
    async fn issue_signed_link(
        &self,
        reference: &StorageReference,
        validity: Duration,
    ) -> StorageResult<String> {
        (**self).issue_signed_link(reference, validity).await
    }
}
