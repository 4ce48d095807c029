//! `ClientMeta` extractor: caller address and user agent.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Header set by Cloudflare with the original client address.
pub const CF_CONNECTING_IP: &str = "cf-connecting-ip";

/// Provenance recorded on new sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    /// Best-known client address.
    pub ip: Option<String>,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
}

impl ClientMeta {
    /// Resolves the client from headers and the socket address.
    ///
    /// Address precedence: `CF-Connecting-IP`, the first `X-Forwarded-For`
    /// hop, then the peer address.
    pub fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let ip = header(CF_CONNECTING_IP)
            .map(String::from)
            .or_else(|| {
                header("x-forwarded-for")
                    .and_then(|v| v.split(',').next())
                    .map(|v| v.trim().to_string())
            })
            .or_else(|| peer.map(|addr| addr.ip().to_string()));

        Self {
            ip,
            user_agent: header("user-agent").map(String::from),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_parts(&parts.headers, peer))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_cloudflare_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(CF_CONNECTING_IP, HeaderValue::from_static("203.0.113.5"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        headers.insert("user-agent", HeaderValue::from_static("Mozilla/5.0"));
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();

        let meta = ClientMeta::from_parts(&headers, Some(peer));
        assert_eq!(meta.ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(meta.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_forwarded_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.1, 10.0.0.2"),
        );
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        assert_eq!(
            ClientMeta::from_parts(&headers, Some(peer)).ip.as_deref(),
            Some("198.51.100.1")
        );

        let meta = ClientMeta::from_parts(&HeaderMap::new(), Some(peer));
        assert_eq!(meta.ip.as_deref(), Some("10.0.0.1"));
        assert!(meta.user_agent.is_none());
    }

    #[test]
    fn test_unknown_client() {
        assert_eq!(
            ClientMeta::from_parts(&HeaderMap::new(), None),
            ClientMeta::default()
        );
    }
}
