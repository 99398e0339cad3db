//! Scene models.
//!
//! A scene is one generated segment of a video project. The refresh
//! subsystem only owns its media link slots; every other field is carried
//! through verbatim in [`Scene::extra`].

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scene with up to four independent media link slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Primary still image
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub primary_image: Option<String>,

    /// Alternate images, order is significant
    #[serde(rename = "imageUrls", default, skip_serializing_if = "Option::is_none")]
    pub alternate_images: Option<Vec<String>>,

    /// Narration or soundtrack
    #[serde(rename = "audioUrl", default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    /// Rendered clip
    #[serde(rename = "videoUrl", default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,

    /// Fields not owned by the refresh subsystem (title, prompt, duration, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary image link.
    pub fn with_primary_image(mut self, url: impl Into<String>) -> Self {
        self.primary_image = Some(url.into());
        self
    }

    /// Set the alternate image links.
    pub fn with_alternate_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_images = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Set the audio link.
    pub fn with_audio(mut self, url: impl Into<String>) -> Self {
        self.audio = Some(url.into());
        self
    }

    /// Set the video link.
    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.video = Some(url.into());
        self
    }

    /// Head link: the primary image, else the first alternate image.
    ///
    /// Only `alternate_images[0]` is looked at; a blank first entry yields `None`.
    /// Audio and video are not consulted.
    pub fn first_link(&self) -> Option<&str> {
        if let Some(url) = populated(self.primary_image.as_deref()) {
            return Some(url);
        }

        let first = self.alternate_images.as_ref().and_then(|urls| urls.first());
        populated(first.map(String::as_str))
    }

    /// Number of populated link slots, counting each alternate image.
    pub fn populated_link_count(&self) -> usize {
        let singles = [&self.primary_image, &self.audio, &self.video]
            .into_iter()
            .filter(|slot| populated(slot.as_deref()).is_some())
            .count();

        let alternates = self
            .alternate_images
            .as_ref()
            .map(|urls| urls.iter().filter(|u| populated(Some(u.as_str())).is_some()).count())
            .unwrap_or(0);

        singles + alternates
    }
}

/// Returns the link if it is present and not blank.
pub fn populated(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.trim().is_empty())
}

/// Identifies one link slot of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    PrimaryImage,
    /// Alternate image at the given index
    AlternateImage(usize),
    Audio,
    Video,
}

impl MediaSlot {
    /// Stable label, used as a metrics tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaSlot::PrimaryImage => "primary_image",
            MediaSlot::AlternateImage(_) => "alternate_image",
            MediaSlot::Audio => "audio",
            MediaSlot::Video => "video",
        }
    }
}

impl fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSlot::AlternateImage(index) => write!(f, "alternate_image[{}]", index),
            other => f.write_str(other.as_str()),
        }
    }
}
