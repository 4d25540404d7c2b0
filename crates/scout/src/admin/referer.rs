//! Picks the page an action redirects back to.
//!
//! A referer is only followed when it stays on this site: a path rooted at
//! `/`, or an absolute http(s) url whose authority equals the request's
//! `Host`. It must also be a valid header value, so it can become the
//! `Location` of the redirect.

use axum::http::{
    header::{HOST, REFERER},
    HeaderMap, HeaderValue,
};
use reqwest::Url;
use tracing::warn;

pub const FALLBACK_REFERER: &str = "/";

/// The first safe candidate out of the explicit referer and the `Referer`
/// header, or `/`.
pub fn resolve_referer(explicit: Option<&str>, headers: &HeaderMap) -> String {
    let host = headers.get(HOST).and_then(|value| value.to_str().ok());
    let header = headers.get(REFERER).and_then(|value| value.to_str().ok());

    for candidate in [explicit, header].into_iter().flatten() {
        if is_safe_referer(candidate, host) {
            return candidate.to_string();
        }
        if !candidate.is_empty() {
            warn!("Ignoring unsafe referer {candidate:?}");
        }
    }
    FALLBACK_REFERER.to_string()
}

pub fn is_safe_referer(referer: &str, host: Option<&str>) -> bool {
    if referer.is_empty() || HeaderValue::from_str(referer).is_err() {
        return false;
    }
    if referer.starts_with('/') {
        // `//host` and `/\host` are protocol relative in browsers.
        return !referer.starts_with("//") && !referer.starts_with("/\\");
    }
    let (Ok(url), Some(host)) = (Url::parse(referer), host) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(url_host) = url.host_str() else {
        return false;
    };
    let authority = match url.port() {
        Some(port) => format!("{url_host}:{port}"),
        None => url_host.to_string(),
    };
    authority.eq_ignore_ascii_case(host)
}
