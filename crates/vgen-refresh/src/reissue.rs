//! Best-effort signed link reissue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, warn};
use vgen_storage::StorageReference;

use crate::signer::LinkSigner;

/// Result of one reissue attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReissueOutcome {
    /// The backend issued a new link.
    Refreshed(String),
    /// The backend failed; the original link is kept.
    Fallback { original: String, reason: String },
}

impl ReissueOutcome {
    /// The link to use from now on.
    pub fn into_url(self) -> String {
        match self {
            ReissueOutcome::Refreshed(url) => url,
            ReissueOutcome::Fallback { original, .. } => original,
        }
    }

    /// The link to use from now on, borrowed.
    pub fn url(&self) -> &str {
        match self {
            ReissueOutcome::Refreshed(url) => url,
            ReissueOutcome::Fallback { original, .. } => original,
        }
    }

    pub fn is_refreshed(&self) -> bool {
        matches!(self, ReissueOutcome::Refreshed(_))
    }
}

/// Requests fresh signed links and never fails outward.
pub struct LinkReissuer<S> {
    signer: S,
    validity: Duration,
    limiter: Option<Arc<Semaphore>>,
}

impl<S: LinkSigner> LinkReissuer<S> {
    /// Create a reissuer. `max_concurrency` bounds in-flight requests across all callers.
    pub fn new(signer: S, validity: Duration, max_concurrency: Option<usize>) -> Self {
        Self {
            signer,
            validity,
            limiter: max_concurrency.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Validity window requested for every link.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// The underlying signer.
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Request a new link for `reference`; on any failure keep `original`.
    pub async fn reissue(&self, reference: &StorageReference, original: &str) -> ReissueOutcome {
        let _permit = match &self.limiter {
            Some(limiter) => match limiter.acquire().await {
                Ok(permit) => Some(permit),
                Err(_) => return fallback(reference, original, "reissue limiter closed".to_string()),
            },
            None => None,
        };

        match self.signer.issue_signed_link(reference, self.validity).await {
            Ok(url) if !url.trim().is_empty() => {
                debug!(
                    container = %reference.container(),
                    object_path = %reference.object_path(),
                    "Reissued signed link"
                );
                ReissueOutcome::Refreshed(url)
            }
            Ok(_) => fallback(reference, original, "backend returned an empty link".to_string()),
            Err(e) => fallback(reference, original, e.to_string()),
        }
    }
}

fn fallback(reference: &StorageReference, original: &str, reason: String) -> ReissueOutcome {
    warn!(
        container = %reference.container(),
        object_path = %reference.object_path(),
        error = %reason,
        "Failed to reissue signed link, keeping original"
    );
    ReissueOutcome::Fallback {
        original: original.to_string(),
        reason,
    }
}
