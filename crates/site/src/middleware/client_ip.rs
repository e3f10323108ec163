//! Client IP resolution behind Cloudflare and Fly.io proxies.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};

/// Proxy headers checked in order.
const IP_HEADERS: [&str; 4] = ["cf-connecting-ip", "x-forwarded-for", "x-real-ip", "fly-client-ip"];

/// Best-effort client address from proxy headers.
///
/// `X-Forwarded-For` contributes its first (client-most) entry.
#[must_use]
pub fn ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    })
}

/// Proxy headers first, then the socket peer address.
#[must_use]
pub fn resolve(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    ip_from_headers(headers).or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

/// Extractor for the requesting client's IP, if it can be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(&parts.headers, &parts.extensions)))
    }
}
