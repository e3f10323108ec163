//! Client IP for marking an admin's address in the visitor table and for
//! keying the login rate limiter.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};

/// Proxy headers checked in order, then the socket peer.
const IP_HEADERS: [&str; 3] = ["cf-connecting-ip", "x-forwarded-for", "fly-client-ip"];

/// First parseable address from the proxy headers, else the peer address.
#[must_use]
pub fn resolve(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    let from_headers = IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    });
    from_headers.or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

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
