//! Client identification utilities
//!
//! Common functions for identifying clients and their transport via HTTP headers.

use axum::http::{HeaderMap, Uri};
use std::net::IpAddr;

/// Transport the request arrived over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transport {
    /// TLS between the client and the edge (directly or at a reverse proxy)
    pub encrypted: bool,
}

impl Transport {
    pub const PLAIN: Transport = Transport { encrypted: false };
    pub const ENCRYPTED: Transport = Transport { encrypted: true };
}

/// Detect whether the request was made over an encrypted transport
///
/// Checks the request URI scheme first, then the `X-Forwarded-Proto`
/// header set by reverse proxies (first value in the list).
pub fn detect_transport(headers: &HeaderMap, uri: &Uri) -> Transport {
    if uri.scheme_str() == Some("https") {
        return Transport::ENCRYPTED;
    }

    let forwarded_https = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));

    Transport {
        encrypted: forwarded_https,
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_detect_transport_plain() {
        let headers = HeaderMap::new();
        let uri: Uri = "/age".parse().unwrap();
        assert_eq!(detect_transport(&headers, &uri), Transport::PLAIN);
    }

    #[test]
    fn test_detect_transport_scheme() {
        let headers = HeaderMap::new();
        let uri: Uri = "https://example.com/".parse().unwrap();
        assert_eq!(detect_transport(&headers, &uri), Transport::ENCRYPTED);
    }

    #[test]
    fn test_detect_transport_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS, http"));
        let uri: Uri = "/".parse().unwrap();
        assert!(detect_transport(&headers, &uri).encrypted);

        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
        assert!(!detect_transport(&headers, &uri).encrypted);
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }
}
