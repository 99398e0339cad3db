//! Batch refresh of scene lists.

use futures::future::join_all;
use tracing::{debug, info, info_span, warn, Instrument};
use vgen_models::Scene;
use vgen_storage::LinkClass;

use crate::report::RefreshReport;
use crate::scene::SceneRefresher;
use crate::signer::LinkSigner;

/// Outcome of a batch refresh.
#[derive(Debug, Clone, Default)]
pub struct BatchRefresh {
    /// Scenes in input order
    pub scenes: Vec<Scene>,
    pub report: RefreshReport,
    /// True when the batch was returned without contacting the backend
    pub skipped: bool,
}

impl BatchRefresh {
    fn skipped(scenes: Vec<Scene>) -> Self {
        Self {
            scenes,
            report: RefreshReport::default(),
            skipped: true,
        }
    }

    pub fn into_scenes(self) -> Vec<Scene> {
        self.scenes
    }
}

impl<S: LinkSigner> SceneRefresher<S> {
    /// Refresh the signed links of every scene, preserving order.
    ///
    /// See [`SceneRefresher::refresh_batch_detailed`] for the skip rule.
    pub async fn refresh_batch(&self, scenes: Vec<Scene>) -> Vec<Scene> {
        self.refresh_batch_detailed(scenes).await.into_scenes()
    }

    /// Refresh the signed links of every scene and report what happened.
    ///
    /// Only the first link of the first scene (its primary image, else its
    /// first alternate image) is inspected up front. Unless that link is a
    /// signed one, the batch is handed back untouched without any backend
    /// call, even if later scenes do hold signed links.
    pub async fn refresh_batch_detailed(&self, scenes: Vec<Scene>) -> BatchRefresh {
        if !self.batch_needs_refresh(&scenes) {
            debug!(scenes = scenes.len(), "No signed links at head of batch, skipping refresh");
            return BatchRefresh::skipped(scenes);
        }

        let span = info_span!("refresh_batch", scenes = scenes.len());
        async {
            let results = join_all(scenes.iter().map(|scene| self.refresh_scene_with_report(scene))).await;

            let mut report = RefreshReport::default();
            let mut refreshed = Vec::with_capacity(results.len());
            for (index, (scene, scene_report)) in results.into_iter().enumerate() {
                report.merge_scene(index, scene_report);
                refreshed.push(scene);
            }

            if report.is_clean() {
                info!(refreshed = report.refreshed, unchanged = report.unchanged, "Refreshed scene links");
            } else {
                warn!(
                    refreshed = report.refreshed,
                    unchanged = report.unchanged,
                    fallbacks = report.fallbacks.len(),
                    "Refreshed scene links with fallbacks"
                );
            }

            BatchRefresh {
                scenes: refreshed,
                report,
                skipped: false,
            }
        }
        .instrument(span)
        .await
    }

    fn batch_needs_refresh(&self, scenes: &[Scene]) -> bool {
        scenes
            .first()
            .and_then(Scene::first_link)
            .map(|url| self.classify(url) == LinkClass::Signed)
            .unwrap_or(false)
    }
}
