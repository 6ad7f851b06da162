//! Request inspection.
//!
//! # Responsibilities
//! - Resolve a best-effort client address for rate limiting
//! - Work out the host a form was posted from
//! - Read the request ID set by the request-id layer
//!
//! # Design Decisions
//! - The forwarded-for header is trusted only as a bucketing key, never as identity
//! - Anything unresolvable falls back to a sentinel instead of failing the request

use std::net::SocketAddr;
use axum::http::{header, HeaderMap, HeaderName};
use url::Url;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Bucket for requests with no usable address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First `X-Forwarded-For` entry, else the peer IP, else [`UNKNOWN_CLIENT`].
pub fn resolve_client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(addr), _) => addr.to_string(),
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}

/// Hostname of the page that posted the form: `Origin`, else `Host`.
pub fn origin_host(headers: &HeaderMap) -> Option<String> {
    let from_origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Url::parse(v).ok())
        .and_then(|url| url.host_str().map(str::to_string));

    from_origin.or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Url::parse(&format!("http://{v}")).ok())
            .and_then(|url| url.host_str().map(str::to_string))
    })
}

/// The request ID, or "-" when the layer did not run.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let h = headers(&[("x-forwarded-for", " 203.0.113.7 , 10.0.0.1")]);
        assert_eq!(resolve_client_address(&h, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_peer_then_unknown() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        assert_eq!(resolve_client_address(&HeaderMap::new(), Some(peer)), "10.0.0.9");
        assert_eq!(resolve_client_address(&headers(&[("x-forwarded-for", " ")]), None), "unknown");
        assert_eq!(resolve_client_address(&HeaderMap::new(), None), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_origin_host() {
        let h = headers(&[("origin", "https://www.pizzatuba.ee"), ("host", "edge.example.com")]);
        assert_eq!(origin_host(&h).as_deref(), Some("www.pizzatuba.ee"));

        let h = headers(&[("host", "edge.example.com:8443")]);
        assert_eq!(origin_host(&h).as_deref(), Some("edge.example.com"));

        assert_eq!(origin_host(&HeaderMap::new()), None);
    }
}
