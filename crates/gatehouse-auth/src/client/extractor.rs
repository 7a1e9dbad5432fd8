//! ClientInfo extraction from request metadata.

use std::sync::Arc;

use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, Method, Version};

use gatehouse_entity::client::ClientInfo;

use super::fingerprint::{FingerprintCache, fingerprint_key};
use super::ua;

/// Geo attributes for one address.
#[derive(Debug, Clone, Default)]
pub struct GeoInfo {
    /// ISO country code.
    pub country_code: Option<String>,
    /// Region/subdivision name.
    pub region: Option<String>,
    /// City name.
    pub city: Option<String>,
}

/// Resolves geo attributes for a client IP.
pub trait GeoResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Geo attributes for `ip`; fields stay empty when unknown.
    fn resolve(&self, ip: &str) -> GeoInfo;
}

/// Resolver used when no geo database is configured.
#[derive(Debug, Default)]
pub struct NoGeoResolver;

impl GeoResolver for NoGeoResolver {
    fn resolve(&self, _ip: &str) -> GeoInfo {
        GeoInfo::default()
    }
}

/// Derives the per-request [`ClientInfo`] snapshot.
#[derive(Debug, Clone)]
pub struct ClientInfoExtractor {
    /// Fingerprint memoization cache.
    fingerprints: Arc<FingerprintCache>,
    /// Geo lookup collaborator.
    geo: Arc<dyn GeoResolver>,
}

impl ClientInfoExtractor {
    /// Create a new extractor.
    pub fn new(fingerprints: Arc<FingerprintCache>, geo: Arc<dyn GeoResolver>) -> Self {
        Self { fingerprints, geo }
    }

    /// Build the ClientInfo snapshot for one request.
    ///
    /// `socket_ip` is the peer address of the connection; proxy headers
    /// take precedence over it for the reported client IP.
    pub async fn extract(
        &self,
        headers: &HeaderMap,
        method: &Method,
        version: Version,
        socket_ip: &str,
    ) -> ClientInfo {
        let ip_address = forwarded_ip(headers).unwrap_or_else(|| socket_ip.to_string());
        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let parsed = ua::parse(&user_agent);
        let geo = self.geo.resolve(&ip_address);
        let key = fingerprint_key(headers, method, version, socket_ip);
        let fingerprint = self.fingerprints.fingerprint(&key).await;

        ClientInfo {
            ip_address,
            user_agent,
            browser_family: parsed.browser_family,
            browser_version: parsed.browser_version,
            os_family: parsed.os_family,
            os_version: parsed.os_version,
            device_family: parsed.device_family,
            country_code: geo.country_code,
            region: geo.region,
            city: geo.city,
            fingerprint,
        }
    }
}

/// Client IP from common proxy headers: first `X-Forwarded-For` entry,
/// then `X-Real-Ip`.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use gatehouse_core::config::CacheConfig;

    fn extractor() -> ClientInfoExtractor {
        ClientInfoExtractor::new(
            Arc::new(FingerprintCache::new(&CacheConfig::default())),
            Arc::new(NoGeoResolver),
        )
    }

    #[test]
    fn test_forwarded_ip_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(forwarded_ip(&headers), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn test_forwarded_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(forwarded_ip(&headers), Some("9.9.9.9".to_string()));
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_extract_fills_snapshot() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
            ),
        );

        let info = extractor()
            .extract(&headers, &Method::GET, Version::HTTP_11, "10.0.0.7")
            .await;

        assert_eq!(info.ip_address, "10.0.0.7");
        assert_eq!(info.browser_family, "Firefox");
        assert_eq!(info.os_family, "Linux");
        assert_eq!(info.device_family, "Desktop");
        assert_eq!(info.fingerprint.len(), 64);
        assert_eq!(info.country_code, None);
    }

    #[tokio::test]
    async fn test_extract_uses_forwarded_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));

        let info = extractor()
            .extract(&headers, &Method::GET, Version::HTTP_11, "10.0.0.7")
            .await;
        assert_eq!(info.ip_address, "203.0.113.9");
    }
}
