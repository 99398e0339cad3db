//! Test doubles for the signing backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use vgen_storage::{StorageError, StorageReference, StorageResult};

use crate::signer::LinkSigner;

/// Signer stub keyed by object path.
///
/// Unknown paths get `<endpoint>/storage/v1/object/sign/<bucket>/<path>?token=fresh`.
#[derive(Default)]
pub struct StubSigner {
    endpoint: String,
    failures: HashMap<String, u16>,
    empty: Vec<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl StubSigner {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    /// Fail requests for `object_path` with the given HTTP status.
    pub fn failing(mut self, object_path: &str, status: u16) -> Self {
        self.failures.insert(object_path.to_string(), status);
        self
    }

    /// Answer requests for `object_path` with an empty link.
    pub fn empty(mut self, object_path: &str) -> Self {
        self.empty.push(object_path.to_string());
        self
    }

    /// Delay the answer for `object_path`.
    pub fn delayed(mut self, object_path: &str, delay: Duration) -> Self {
        self.delays.insert(object_path.to_string(), delay);
        self
    }

    /// Every `<bucket>/<path>` requested so far, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(reference, _)| reference.clone())
            .collect()
    }

    /// Validity windows requested so far.
    pub fn validities(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().iter().map(|(_, v)| *v).collect()
    }

    /// The link this stub hands out for a successful request.
    pub fn fresh_link(&self, container: &str, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/sign/{}/{}?token=fresh",
            self.endpoint, container, object_path
        )
    }
}

#[async_trait]
impl LinkSigner for StubSigner {
    async fn issue_signed_link(
        &self,
        reference: &StorageReference,
        validity: Duration,
    ) -> StorageResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((reference.to_string(), validity));

        if let Some(delay) = self.delays.get(reference.object_path()) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(status) = self.failures.get(reference.object_path()) {
            return Err(StorageError::from_http_status(*status, "stubbed failure"));
        }

        if self.empty.iter().any(|p| p == reference.object_path()) {
            return Ok(String::new());
        }

        Ok(self.fresh_link(reference.container(), reference.object_path()))
    }
}
