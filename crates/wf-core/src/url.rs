//! URL origin utilities for the hot path
//!
//! These functions avoid allocations and work directly on string slices.
//! "Origin" here is the `host[:port]` part of an http(s) URL; requests whose
//! requester or destination has no recognizable origin can never match a
//! filter.

// =============================================================================
// Origin Extraction
// =============================================================================

/// Extract the origin of an http(s) URL as a slice into the input.
///
/// Matching stops at the first `/` after the scheme, so the port stays part
/// of the origin. Returns `None` for any other scheme.
#[inline]
pub fn extract_origin(url: &str) -> Option<&str> {
    let rest = strip_web_scheme(url)?;

    let end = rest.find('/').unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

/// True when the URL is an `http://` or `https://` URL.
#[inline]
pub fn is_web_url(url: &str) -> bool {
    strip_web_scheme(url).is_some()
}

#[inline]
fn strip_web_scheme(url: &str) -> Option<&str> {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
}

// =============================================================================
// Same-Origin Comparison
// =============================================================================

/// Symmetric same-origin check between two origins.
///
/// `sub.example.com` and `example.com` are the same origin; `xb.com` and
/// `b.com` are not. The shorter operand must be a suffix of the longer with
/// a `.` label boundary immediately before it.
#[inline]
pub fn same_origin(a: &str, b: &str) -> bool {
    let (longer, shorter) = if b.len() > a.len() { (b, a) } else { (a, b) };
    suffix_at_label_boundary(longer, shorter)
}

/// Directional variant used for declared domain lists: `host` must equal
/// `domain` or be a subdomain of it. Never matches when `domain` is the
/// longer operand.
#[inline]
pub fn host_within_domain(host: &str, domain: &str) -> bool {
    suffix_at_label_boundary(host, domain)
}

#[inline]
fn suffix_at_label_boundary(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    a.len() > b.len() && a.ends_with(b) && a.as_bytes()[a.len() - b.len() - 1] == b'.'
}
