// Per-IP rate limiting middleware

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::{app::AppState, utils::ApiError};

/// Address the limiter keys on
///
/// With no trusted proxies this is the socket peer and `X-Forwarded-For` is ignored.
/// Behind `trusted_hops` proxies it is the entry the outermost trusted proxy appended,
/// counted from the right; entries further left are client-controlled.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trusted_hops: usize) -> String {
    let peer_ip = peer.map(|addr| addr.ip().to_string());

    let forwarded = (trusted_hops > 0)
        .then(|| {
            let hops: Vec<&str> = headers
                .get_all("x-forwarded-for")
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(','))
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
                .collect();
            hops.len()
                .checked_sub(trusted_hops)
                .and_then(|index| hops.get(index))
                .map(|hop| hop.to_string())
        })
        .flatten();

    forwarded
        .or(peer_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let path = request.uri().path().to_string();

    // The whitelist is matched against the socket, never a header
    let peer_ip = peer
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    if !state.rate_limit_service.applies_to(&path, &peer_ip) {
        return next.run(request).await;
    }

    let trusted_hops = state.rate_limit_service.config().trusted_proxy_hops;
    let ip = client_ip(request.headers(), peer, trusted_hops);

    let result = state.rate_limit_service.check(&path, &ip);
    if !result.allowed {
        return ApiError::RateLimited {
            retry_after: result.retry_after.unwrap_or(1),
        }
        .into_response();
    }

    let mut response = next.run(request).await;
    if let Ok(limit) = HeaderValue::from_str(&result.limit.to_string()) {
        response.headers_mut().insert("x-ratelimit-limit", limit);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_forwarded_for_ignored_without_trusted_proxy() {
        let peer: SocketAddr = "198.51.100.4:5000".parse().unwrap();
        let headers = forwarded("127.0.0.1");
        assert_eq!(client_ip(&headers, Some(peer), 0), "198.51.100.4");
        assert_eq!(client_ip(&headers, None, 0), "unknown");
    }

    #[test]
    fn test_trusted_proxy_uses_appended_hop() {
        let peer: SocketAddr = "10.0.0.2:4000".parse().unwrap();
        // Client spoofed the first entry; the proxy appended the real address
        let headers = forwarded("127.0.0.1, 203.0.113.9");
        assert_eq!(client_ip(&headers, Some(peer), 1), "203.0.113.9");

        let headers = forwarded("127.0.0.1, 203.0.113.9, 10.0.0.7");
        assert_eq!(client_ip(&headers, Some(peer), 2), "203.0.113.9");
    }

    #[test]
    fn test_short_forwarded_chain_falls_back_to_peer() {
        let peer: SocketAddr = "10.0.0.2:4000".parse().unwrap();
        assert_eq!(client_ip(&forwarded("203.0.113.9"), Some(peer), 2), "10.0.0.2");
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer), 1), "10.0.0.2");
    }
}
