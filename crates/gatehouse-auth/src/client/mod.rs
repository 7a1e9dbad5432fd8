//! Client identification: ClientInfo extraction, UA parsing, fingerprint cache.

pub mod extractor;
pub mod fingerprint;
pub mod ua;

pub use extractor::{ClientInfoExtractor, GeoInfo, GeoResolver, NoGeoResolver};
pub use fingerprint::{FingerprintCache, FingerprintCacheStats};
