//! URL helpers for building request targets from a base URL.

/// Join `part` onto `url` with exactly one `/` between them.
///
/// # Examples
///
/// ```
/// use lcp_http::url::url_path_join;
///
/// assert_eq!(url_path_join("https://lcp.example.com/v1", "/orders/"), "https://lcp.example.com/v1/orders/");
/// assert_eq!(url_path_join("https://lcp.example.com/v1/", "orders/"), "https://lcp.example.com/v1/orders/");
/// ```
#[must_use]
pub fn url_path_join(url: &str, part: &str) -> String {
    let base = url.strip_suffix('/').unwrap_or(url);
    let part = part.strip_prefix('/').unwrap_or(part);
    format!("{base}/{part}")
}

/// Resolve a request URL against an optional base URL.
///
/// URLs that already start with `http` are returned unchanged, as is every URL
/// when there is no base.
#[must_use]
pub fn resolve_url(base_url: Option<&str>, url: &str) -> String {
    match base_url {
        Some(base) if !base.is_empty() && !url.starts_with("http") => url_path_join(base, url),
        _ => url.to_owned(),
    }
}
