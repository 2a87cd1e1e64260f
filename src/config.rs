use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Trigger pattern
    pub domain_suffix: String,
    pub segment_path: String,

    // Lookup endpoints
    pub doh_endpoint: String,
    pub geoip_endpoint: String,
    pub http_timeout_secs: Option<u64>,

    // Cache settings
    pub geo_cache_ttl_secs: u64,
    pub cache_path: Option<String>,

    // Presentation
    pub speed_kbps: Option<String>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain_suffix: "googlevideo.com".to_string(),
            segment_path: "/videoplayback".to_string(),
            doh_endpoint: "https://dns.google/resolve".to_string(),
            geoip_endpoint: "https://ipwho.is".to_string(),
            http_timeout_secs: None,
            geo_cache_ttl_secs: 24 * 3600,
            cache_path: None,
            speed_kbps: None,
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let domain_suffix = std::env::var("CDN_LOCATOR_DOMAIN_SUFFIX")
        .unwrap_or_else(|_| "googlevideo.com".to_string());

    let segment_path = std::env::var("CDN_LOCATOR_SEGMENT_PATH")
        .unwrap_or_else(|_| "/videoplayback".to_string());

    let doh_endpoint = std::env::var("CDN_LOCATOR_DOH_ENDPOINT")
        .unwrap_or_else(|_| "https://dns.google/resolve".to_string());

    let geoip_endpoint = std::env::var("CDN_LOCATOR_GEOIP_ENDPOINT")
        .unwrap_or_else(|_| "https://ipwho.is".to_string());

    let http_timeout_secs = std::env::var("CDN_LOCATOR_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok());

    let geo_cache_ttl_secs = std::env::var("CDN_LOCATOR_GEO_CACHE_TTL_SECS")
        .unwrap_or_else(|_| "86400".to_string())
        .parse()
        .unwrap_or(86400);

    let cache_path = std::env::var("CDN_LOCATOR_CACHE_PATH").ok();

    let speed_kbps = std::env::var("CDN_LOCATOR_SPEED_KBPS").ok();

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        domain_suffix,
        segment_path,
        doh_endpoint,
        geoip_endpoint,
        http_timeout_secs,
        geo_cache_ttl_secs,
        cache_path,
        speed_kbps,
        debug,
    })
}
