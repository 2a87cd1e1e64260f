//! ipwho.is GeoIP Locator
//!
//! Implements GeoLocator using the ipwho.is JSON API (`GET <endpoint>/<ip>`).

use super::lookup_error::LookupError;
use crate::domain::entities::GeoRecord;
use crate::domain::ports::GeoLocator;
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;

#[derive(Debug, Deserialize)]
struct IpWhoisResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// GeoIP locator backed by an ipwho.is compatible endpoint.
pub struct IpWhoisGeoLocator {
    client: reqwest::Client,
    endpoint: String,
}

impl IpWhoisGeoLocator {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    async fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, LookupError> {
        let url = format!("{}/{}", self.endpoint, ip);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: IpWhoisResponse = serde_json::from_str(&body)?;

        if !parsed.success {
            return Err(LookupError::Rejected(
                parsed.message.unwrap_or_else(|| "success=false".to_string()),
            ));
        }

        Ok(GeoRecord::new(
            parsed.country_code.unwrap_or_default(),
            parsed.country.unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl GeoLocator for IpWhoisGeoLocator {
    async fn locate(&self, ip: IpAddr) -> Option<GeoRecord> {
        match self.lookup(ip).await {
            Ok(geo) => {
                tracing::debug!("geoip located {} in {}", ip, geo.country_code);
                Some(geo)
            }
            Err(e) => {
                tracing::debug!("geoip lookup for {} failed: {}", ip, e);
                None
            }
        }
    }
}
