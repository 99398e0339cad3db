//! Signed media link refresh for scenes.
//!
//! Scenes reference media in object storage through signed links that
//! expire. This crate re-issues those links:
//! - [`LinkReissuer`] asks the storage backend for a fresh link and falls
//!   back to the original on any failure
//! - [`SceneRefresher::refresh_scene`] refreshes every link slot of a scene concurrently
//! - [`SceneRefresher::refresh_batch`] refreshes a list of scenes, skipping the
//!   whole batch when its first link is not a signed one
//!
//! Backend failures never surface as errors; they are reported through
//! [`RefreshReport`] and the `tracing` log.

pub mod batch;
pub mod config;
pub mod error;
pub mod reissue;
pub mod report;
pub mod scene;
pub mod signer;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::BatchRefresh;
pub use config::RefreshConfig;
pub use error::{RefreshError, RefreshResult};
pub use reissue::{LinkReissuer, ReissueOutcome};
pub use report::{RefreshFailure, RefreshReport};
pub use scene::SceneRefresher;
pub use signer::LinkSigner;
