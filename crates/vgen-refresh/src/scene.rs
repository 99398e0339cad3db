//! Per-scene link refresh.

use futures::future::join_all;
use tracing::debug;
use vgen_models::{scene::populated, MediaSlot, Scene};
use vgen_storage::metrics::record_link_refresh;
use vgen_storage::{classify, extract_reference, LinkClass, StorageClient};

use crate::config::RefreshConfig;
use crate::error::RefreshResult;
use crate::reissue::{LinkReissuer, ReissueOutcome};
use crate::report::{RefreshFailure, RefreshReport};
use crate::signer::LinkSigner;

/// What happened to a single link slot.
#[derive(Debug)]
enum LinkOutcome {
    /// Absent or blank slot, copied as is
    Empty,
    /// Public or unrelated link, copied as is
    Unchanged,
    Reissued(ReissueOutcome),
}

/// Refreshes the signed media links of scenes.
pub struct SceneRefresher<S> {
    reissuer: LinkReissuer<S>,
    endpoint_prefix: String,
}

impl SceneRefresher<StorageClient> {
    /// Build a refresher backed by the storage REST API, configured from the environment.
    pub fn from_env() -> RefreshResult<Self> {
        let client = StorageClient::from_env()?;
        let config = RefreshConfig::from_env()?;
        Ok(Self::new(client, config))
    }
}

impl<S: LinkSigner> SceneRefresher<S> {
    /// Create a refresher around any signer.
    pub fn new(signer: S, config: RefreshConfig) -> Self {
        Self {
            reissuer: LinkReissuer::new(signer, config.validity, config.max_concurrency),
            endpoint_prefix: config.endpoint_prefix,
        }
    }

    /// Storage endpoint used to recognise signed links.
    pub fn endpoint_prefix(&self) -> &str {
        &self.endpoint_prefix
    }

    /// The reissuer used for every signed link.
    pub fn reissuer(&self) -> &LinkReissuer<S> {
        &self.reissuer
    }

    /// Classify a link against this refresher's endpoint.
    pub fn classify(&self, url: &str) -> LinkClass {
        classify(url, &self.endpoint_prefix)
    }

    /// Refresh every signed link of `scene`.
    ///
    /// Never fails: a link that cannot be reissued keeps its original value.
    pub async fn refresh_scene(&self, scene: &Scene) -> Scene {
        self.refresh_scene_with_report(scene).await.0
    }

    /// Refresh every signed link of `scene` and report per-slot outcomes.
    ///
    /// All slots, including each alternate image, are refreshed concurrently.
    pub async fn refresh_scene_with_report(&self, scene: &Scene) -> (Scene, RefreshReport) {
        let (primary, alternates, audio, video) = futures::join!(
            self.refresh_slot(MediaSlot::PrimaryImage, scene.primary_image.as_deref()),
            self.refresh_alternates(scene.alternate_images.as_deref()),
            self.refresh_slot(MediaSlot::Audio, scene.audio.as_deref()),
            self.refresh_slot(MediaSlot::Video, scene.video.as_deref()),
        );

        let mut report = RefreshReport::default();
        let refreshed = Scene {
            primary_image: primary
                .map(|(url, outcome)| tally(&mut report, MediaSlot::PrimaryImage, url, outcome)),
            alternate_images: alternates.map(|items| {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, (url, outcome))| {
                        tally(&mut report, MediaSlot::AlternateImage(index), url, outcome)
                    })
                    .collect()
            }),
            audio: audio.map(|(url, outcome)| tally(&mut report, MediaSlot::Audio, url, outcome)),
            video: video.map(|(url, outcome)| tally(&mut report, MediaSlot::Video, url, outcome)),
            extra: scene.extra.clone(),
        };

        (refreshed, report)
    }

    async fn refresh_alternates(&self, urls: Option<&[String]>) -> Option<Vec<(String, LinkOutcome)>> {
        let urls = urls?;
        let refreshed = join_all(urls.iter().enumerate().map(|(index, url)| async move {
            self.refresh_link(MediaSlot::AlternateImage(index), url).await
        }))
        .await;
        Some(refreshed)
    }

    async fn refresh_slot(&self, slot: MediaSlot, url: Option<&str>) -> Option<(String, LinkOutcome)> {
        let url = url?;
        Some(self.refresh_link(slot, url).await)
    }

    async fn refresh_link(&self, slot: MediaSlot, url: &str) -> (String, LinkOutcome) {
        if populated(Some(url)).is_none() {
            return (url.to_string(), LinkOutcome::Empty);
        }

        match extract_reference(url, &self.endpoint_prefix) {
            Some(reference) => {
                debug!(slot = %slot, reference = %reference, "Refreshing signed link");
                let outcome = self.reissuer.reissue(&reference, url).await;
                (outcome.url().to_string(), LinkOutcome::Reissued(outcome))
            }
            None => (url.to_string(), LinkOutcome::Unchanged),
        }
    }
}

/// Record a slot outcome and return the link to keep.
fn tally(report: &mut RefreshReport, slot: MediaSlot, url: String, outcome: LinkOutcome) -> String {
    match outcome {
        LinkOutcome::Empty => {}
        LinkOutcome::Unchanged => {
            report.unchanged += 1;
            record_link_refresh(slot.as_str(), "skipped");
        }
        LinkOutcome::Reissued(ReissueOutcome::Refreshed(_)) => {
            report.refreshed += 1;
            record_link_refresh(slot.as_str(), "refreshed");
        }
        LinkOutcome::Reissued(ReissueOutcome::Fallback { original, reason }) => {
            record_link_refresh(slot.as_str(), "fallback");
            report.fallbacks.push(RefreshFailure {
                scene: 0,
                slot,
                url: original,
                reason,
            });
        }
    }
    url
}
