//! JSON DoH Resolver
//!
//! Implements DnsResolver against a DNS-over-HTTPS JSON endpoint
//! (`https://dns.google/resolve` style: `?name=<host>&type=A`).

use super::lookup_error::LookupError;
use crate::domain::ports::DnsResolver;
use async_trait::async_trait;
use serde::Deserialize;
use std::net::Ipv4Addr;

/// DNS record type number for A records.
const RECORD_TYPE_A: u16 = 1;

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer")]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type", default)]
    record_type: Option<u16>,
    #[serde(default)]
    data: Option<String>,
}

/// DoH resolver speaking the JSON API.
pub struct JsonDohResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl JsonDohResolver {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Query the endpoint and extract the first A record.
    async fn lookup(&self, host: &str) -> Result<Ipv4Addr, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", host), ("type", "A")])
            .header("accept", "application/dns-json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: DohResponse = serde_json::from_str(&body)?;

        Self::first_a_record(parsed).ok_or(LookupError::NoAnswer)
    }

    /// The first A record decides; a later one is never consulted.
    fn first_a_record(response: DohResponse) -> Option<Ipv4Addr> {
        let answer = response
            .answer?
            .into_iter()
            .find(|a| a.record_type == Some(RECORD_TYPE_A))?;
        answer.data?.trim().parse().ok()
    }
}

#[async_trait]
impl DnsResolver for JsonDohResolver {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        match self.lookup(host).await {
            Ok(ip) => {
                tracing::debug!("doh resolved {} -> {}", host, ip);
                Some(ip)
            }
            Err(e) => {
                tracing::debug!("doh lookup for {} failed: {}", host, e);
                None
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HOST: &str = "rr3---sn-abc.googlevideo.com";

    fn resolver_for(server: &MockServer) -> JsonDohResolver {
        JsonDohResolver::new(reqwest::Client::new(), format!("{}/resolve", server.uri()))
    }

    #[tokio::test]
    async fn test_resolve_first_a_record() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "Status": 0,
            "Answer": [
                { "name": HOST, "type": 5, "TTL": 300, "data": "rr3.sn-abc.googlevideo.com." },
                { "name": "rr3.sn-abc.googlevideo.com.", "type": 1, "TTL": 300, "data": "142.250.1.1" },
                { "name": "rr3.sn-abc.googlevideo.com.", "type": 1, "TTL": 300, "data": "142.250.1.2" }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .and(query_param("name", HOST))
            .and(query_param("type", "A"))
            .and(header("accept", "application/dns-json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        let ip = resolver.resolve_ipv4(HOST).await;

        assert_eq!(ip, Some(Ipv4Addr::new(142, 250, 1, 1)));
    }

    #[tokio::test]
    async fn test_resolve_without_answer_section() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Status": 3
            })))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        assert!(resolver.resolve_ipv4(HOST).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_only_cname_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Answer": [{ "type": 5, "data": "alias.example." }]
            })))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        assert!(resolver.resolve_ipv4(HOST).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_a_record_without_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Answer": [{ "type": 1 }, { "type": 1, "data": "142.250.1.1" }]
            })))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        assert!(resolver.resolve_ipv4(HOST).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_skips_answer_without_type() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Answer": [
                    { "name": HOST, "data": "rr3.sn-abc.googlevideo.com." },
                    { "name": "rr3.sn-abc.googlevideo.com.", "type": 1, "data": "142.250.1.7" }
                ]
            })))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        assert_eq!(
            resolver.resolve_ipv4(HOST).await,
            Some(Ipv4Addr::new(142, 250, 1, 7))
        );
    }

    #[tokio::test]
    async fn test_resolve_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        assert!(matches!(
            resolver.lookup(HOST).await,
            Err(LookupError::Malformed(_))
        ));
        assert!(resolver.resolve_ipv4(HOST).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/resolve"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let resolver = resolver_for(&mock_server);
        assert!(matches!(
            resolver.lookup(HOST).await,
            Err(LookupError::Status(s)) if s.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn test_resolve_transport_error() {
        // Nothing listens on port 1
        let resolver = JsonDohResolver::new(reqwest::Client::new(), "http://127.0.0.1:1/resolve");
        assert!(resolver.resolve_ipv4(HOST).await.is_none());
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonDohResolver>();
    }
}
