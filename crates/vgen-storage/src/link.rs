//! Media link classification.
//!
//! Links served by the storage API come in two shapes:
//! - `<endpoint>/storage/v1/object/sign/<bucket>/<path>?token=...` (expiring)
//! - `<endpoint>/storage/v1/object/public/<bucket>/<path>` (permanent)
//!
//! Only signed links ever need to be reissued. Everything here is pure
//! string work; no I/O.

use std::fmt;

/// Route marker of signed (expiring) object links.
pub const SIGN_ROUTE: &str = "/storage/v1/object/sign/";

/// Route marker of public (permanent) object links.
pub const PUBLIC_ROUTE: &str = "/storage/v1/object/public/";

/// Kind of a media link relative to the configured storage endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// Time-limited link that can be reissued
    Signed,
    /// Permanent public link, never refreshed
    Public,
    /// Not served by this storage, or not parseable
    Unrelated,
}

impl LinkClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkClass::Signed => "signed",
            LinkClass::Public => "public",
            LinkClass::Unrelated => "unrelated",
        }
    }
}

/// Bucket and object path addressed by a signed link.
///
/// Both parts are stored percent-decoded and are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageReference {
    container: String,
    object_path: String,
}

impl StorageReference {
    /// Create a reference. Returns `None` if either part is empty.
    pub fn new(container: impl Into<String>, object_path: impl Into<String>) -> Option<Self> {
        let container = container.into();
        let object_path = object_path.into();
        if container.is_empty() || object_path.is_empty() {
            return None;
        }
        Some(Self {
            container,
            object_path,
        })
    }

    /// Bucket name.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Object key within the bucket.
    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    /// `<bucket>/<path>` with every segment percent-encoded, `/` separators kept.
    pub fn encoded_path(&self) -> String {
        std::iter::once(self.container.as_str())
            .chain(self.object_path.split('/'))
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for StorageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.object_path)
    }
}

/// Classify a link against the configured storage endpoint prefix.
pub fn classify(url: &str, endpoint_prefix: &str) -> LinkClass {
    if !belongs_to_endpoint(url, endpoint_prefix) {
        return LinkClass::Unrelated;
    }

    if signed_segment(url).and_then(parse_segment).is_some() {
        return LinkClass::Signed;
    }

    if url.contains(PUBLIC_ROUTE) {
        return LinkClass::Public;
    }

    LinkClass::Unrelated
}

/// Extract the bucket/object addressing of a signed link.
///
/// Returns `None` for public, unrelated and malformed links.
pub fn extract_reference(url: &str, endpoint_prefix: &str) -> Option<StorageReference> {
    if !belongs_to_endpoint(url, endpoint_prefix) {
        return None;
    }
    signed_segment(url).and_then(parse_segment)
}

/// Substring check; an empty prefix matches every link.
fn belongs_to_endpoint(url: &str, endpoint_prefix: &str) -> bool {
    url.contains(endpoint_prefix)
}

/// Raw (still encoded) `<bucket>/<path>` segment following the sign route.
fn signed_segment(url: &str) -> Option<&str> {
    let start = url.find(SIGN_ROUTE)? + SIGN_ROUTE.len();
    let rest = &url[start..];
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Decode the whole segment, then split the bucket off at its first `/`.
fn parse_segment(segment: &str) -> Option<StorageReference> {
    let decoded = urlencoding::decode(segment).ok()?;
    let (container, object_path) = decoded.split_once('/')?;
    StorageReference::new(container, object_path)
}
