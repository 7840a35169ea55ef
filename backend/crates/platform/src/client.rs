//! Client identification utilities

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Proxy headers consulted in order; the first parseable address wins
const FORWARDED_HEADERS: [&str; 2] = ["x-forwarded-for", "x-real-ip"];

/// Best-effort client address for log fields
///
/// Takes the left-most entry of `X-Forwarded-For`, then `X-Real-IP`, then
/// the socket peer. Proxy headers are client-controlled, so the result is
/// only fit for logging.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    FORWARDED_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .find_map(|value| value.split(',').next()?.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
