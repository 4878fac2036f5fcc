//! EDHREC build id discovery.
//!
//! Deck preview URLs embed the site's current Next.js build id. It is scraped
//! from the homepage by locating the `_buildManifest.js` script reference and
//! taking the path segment after the nearest preceding `/_next/static/`.
//! This is a best-effort heuristic tied to the site's markup; callers only
//! ever go through [`BuildIdResolver::resolve_with`], so the strategy can be
//! replaced without touching them.

use crate::error::{EdhrecError, Result};
use crate::http::HttpResponse;
use std::sync::Mutex;

const MANIFEST_MARKER: &str = "_buildManifest.js";
const STATIC_PREFIX: &str = "/_next/static/";
const MIN_BUILD_ID_LEN: usize = 5;

/// Extract the build id from homepage HTML.
pub fn extract_build_id(html: &str) -> Result<String> {
    let idx = html.find(MANIFEST_MARKER).ok_or_else(|| {
        EdhrecError::Discovery(format!("could not find {} reference in homepage", MANIFEST_MARKER))
    })?;
    let before = &html[..idx];
    let static_idx = before.rfind(STATIC_PREFIX).ok_or_else(|| {
        EdhrecError::Discovery(format!("could not locate {} in homepage", STATIC_PREFIX))
    })?;

    let start = static_idx + STATIC_PREFIX.len();
    let rest = &before[start..];
    let build_id = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };

    if build_id.chars().count() < MIN_BUILD_ID_LEN {
        return Err(EdhrecError::Discovery(format!(
            "extracted invalid build id: {:?}",
            build_id
        )));
    }
    Ok(build_id.to_string())
}

/// Memoizes the build id for the lifetime of the resolver.
///
/// The lock is held during discovery so concurrent workers trigger at most
/// one homepage fetch. A failed discovery is not memoized.
#[derive(Debug, Default)]
pub struct BuildIdResolver {
    cached: Mutex<Option<String>>,
}

impl BuildIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that already knows its build id and never fetches.
    pub fn with_build_id(build_id: impl Into<String>) -> Self {
        Self {
            cached: Mutex::new(Some(build_id.into())),
        }
    }

    /// The memoized build id, if discovery already succeeded.
    pub fn cached(&self) -> Option<String> {
        self.cached.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Return the build id, calling `fetch_root` for the homepage on the
    /// first successful resolution only.
    pub fn resolve_with<F>(&self, fetch_root: F) -> Result<String>
    where
        F: FnOnce() -> Result<HttpResponse>,
    {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let resp = fetch_root()?;
        if !resp.is_success() {
            return Err(EdhrecError::Discovery(format!(
                "homepage returned HTTP {}",
                resp.status
            )));
        }
        let id = extract_build_id(&resp.body)?;
        tracing::info!(build_id = %id, "EDHREC build id detected");
        *cached = Some(id.clone());
        Ok(id)
    }
}
