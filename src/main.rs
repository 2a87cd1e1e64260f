//! cdn-locator - Locate the CDN edge host of a media stream
//!
//! This is the composition root that wires together all the components.
//! Request URLs are read from stdin, one per line.

use cdn_locator::adapters::outbound::{
    DashMapKeyValueStore, IpWhoisGeoLocator, JsonDohResolver, SqliteKeyValueStore,
};
use cdn_locator::config::Config;
use cdn_locator::{
    load_config, render_status_line, DnsResolver, GeoLocator, KeyValueStore, PipelineConfig,
    RequestInterceptor, ResolutionCache, ResolutionPipeline, SpeedReading, TargetPattern,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "starting cdn-locator suffix={} doh={} geoip={}",
        cfg.domain_suffix,
        cfg.doh_endpoint,
        cfg.geoip_endpoint
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapters
    let http = build_http_client(&cfg)?;
    let dns: Arc<dyn DnsResolver> =
        Arc::new(JsonDohResolver::new(http.clone(), cfg.doh_endpoint.clone()));
    let geo: Arc<dyn GeoLocator> = Arc::new(IpWhoisGeoLocator::new(http, &cfg.geoip_endpoint));
    let store = open_store(&cfg);
    let cache = ResolutionCache::new(store, Duration::from_secs(cfg.geo_cache_ttl_secs));

    // 2. Application services
    let pipeline = ResolutionPipeline::spawn(
        dns,
        geo,
        cache,
        PipelineConfig {
            domain_suffix: cfg.domain_suffix.clone(),
        },
    );
    let interceptor = RequestInterceptor::new(
        TargetPattern::new(cfg.domain_suffix.clone(), &cfg.segment_path),
        pipeline.clone(),
    );

    // 3. Report every published change
    let mut updates = pipeline.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            tracing::info!(
                "location: host={} badge={} resolving={}",
                snapshot
                    .last_host
                    .as_ref()
                    .map(|h| h.as_str())
                    .unwrap_or("-"),
                snapshot.location_badge().unwrap_or_default(),
                snapshot.is_resolving
            );
        }
    });

    // 4. Feed observed request URLs
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(url) => interceptor.observe_url(url.trim()),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, not reading further input");
                break;
            }
        }
    }

    tokio::select! {
        _ = pipeline.settle() => {}
        _ = tokio::signal::ctrl_c() => tracing::warn!("interrupted while lookups were pending"),
    }

    let snapshot = pipeline.snapshot();
    match cfg.speed_kbps.as_deref().and_then(SpeedReading::parse) {
        Some(speed) => println!("{}", render_status_line(&speed, &snapshot)),
        None => match snapshot.location_badge() {
            Some(badge) => println!("{}", badge),
            None => println!("no edge host located"),
        },
    }

    Ok(())
}

fn build_http_client(cfg: &Config) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = cfg.http_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

fn open_store(cfg: &Config) -> Arc<dyn KeyValueStore> {
    match &cfg.cache_path {
        Some(path) => match SqliteKeyValueStore::open(path) {
            Ok(store) => {
                tracing::info!("location cache opened at {}", path);
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("failed to open location cache at {}: {}", path, e);
                Arc::new(DashMapKeyValueStore::new())
            }
        },
        None => Arc::new(DashMapKeyValueStore::new()),
    }
}
