//! Legacy image-reference normalization.
//!
//! Decides whether a stored reference still uses the legacy URL shape and,
//! if so, produces the canonical
//! `{base}/storage/v1/object/public/images/{tenant}/{prefix}_{id}.{ext}`
//! form. Every failure mode degrades to returning the input unchanged; the
//! normalizer never errors.

use url::Url;

use crate::content::ContentType;

/// Filename markers that identify an already-canonical reference. Matched
/// as substrings anywhere in the reference, not only at the filename
/// position, so variants already touched by a prior run stay untouched.
const CANONICAL_PREFIXES: [&str; 3] = ["notice_", "board_", "circle_"];

/// Marker carried by legacy filenames (`image_{id}.{ext}`).
const LEGACY_MARKER: &str = "image_";

/// Fixed path under which all image objects live.
const OBJECT_ROOT: &str = "storage/v1/object/public/images";

/// Splits a reference into `(tenant_code, filename)`.
///
/// The URL path must contain a segment literally `images`, followed by a
/// non-empty tenant segment, followed by a non-empty remainder; the
/// remainder is joined back with `/`, doubled separators collapsed and a
/// trailing separator stripped. Anything else yields `None`; malformed
/// input is an expected case, not an error.
pub fn split_reference(reference: &str) -> Option<(String, String)> {
    let parsed = Url::parse(reference).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();

    for (idx, segment) in segments.iter().enumerate() {
        if *segment != "images" {
            continue;
        }
        let tenant = match segments.get(idx + 1) {
            Some(tenant) if !tenant.is_empty() => *tenant,
            _ => continue,
        };
        let rest = &segments[idx + 2..];
        if rest.is_empty() {
            continue;
        }
        let joined = rest.join("/").replace("//", "/");
        let filename = joined.trim_end_matches('/');
        if filename.is_empty() {
            continue;
        }
        return Some((tenant.to_string(), filename.to_string()));
    }

    None
}

/// Rewrites legacy references to the canonical storage path.
pub struct UrlNormalizer {
    base: String,
}

impl UrlNormalizer {
    /// `base` is the storage host, e.g. `https://project.supabase.co`.
    /// Trailing slashes are tolerated and stripped.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// Canonicalizes a single reference.
    ///
    /// Returns the input unchanged when it is empty, already canonical, or
    /// does not parse as an images URL. The tenant segment of the produced
    /// reference always comes from the old reference itself, so a filename
    /// stored under another tenant's path keeps that tenant.
    pub fn rewrite_reference(&self, reference: &str, content_type: ContentType) -> String {
        if reference.is_empty() {
            return reference.to_string();
        }

        if CANONICAL_PREFIXES
            .iter()
            .any(|prefix| reference.contains(prefix))
        {
            return reference.to_string();
        }

        let Some((tenant, filename)) = split_reference(reference) else {
            return reference.to_string();
        };

        // Drop any directory prefix the parser kept, e.g.
        // `images//image_42.jpg` -> `image_42.jpg`.
        let actual = match filename.rfind('/') {
            Some(pos) => &filename[pos + 1..],
            None => filename.as_str(),
        };

        let new_filename = if CANONICAL_PREFIXES
            .iter()
            .any(|prefix| actual.starts_with(prefix))
        {
            actual.to_string()
        } else if actual.contains(LEGACY_MARKER) {
            format!(
                "{}_{}",
                content_type.filename_prefix(),
                actual.replacen(LEGACY_MARKER, "", 1)
            )
        } else {
            actual.to_string()
        };

        format!("{}/{}/{}/{}", self.base, OBJECT_ROOT, tenant, new_filename)
    }
}
