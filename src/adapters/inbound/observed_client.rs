//! Observed Client
//!
//! Wrapper around `reqwest::Client` that reports each outgoing request
//! URL to the interceptor before sending it. The request itself is
//! executed exactly as the caller built it.

use crate::application::RequestInterceptor;

/// HTTP client with passive request observation.
#[derive(Clone)]
pub struct ObservedClient {
    client: reqwest::Client,
    interceptor: RequestInterceptor,
}

impl ObservedClient {
    pub fn new(client: reqwest::Client, interceptor: RequestInterceptor) -> Self {
        Self {
            client,
            interceptor,
        }
    }

    /// The wrapped client, for building requests.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Execute a prepared request.
    pub async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.interceptor.observe_url(request.url().as_str());
        self.client.execute(request).await
    }

    /// Issue a GET for `url`.
    ///
    /// An invalid URL is reported by reqwest as usual; observation of it
    /// is silently skipped.
    pub async fn fetch(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.interceptor.observe_url(url);
        self.client.get(url).send().await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::DashMapKeyValueStore;
    use crate::application::{PipelineConfig, ResolutionPipeline};
    use crate::domain::entities::GeoRecord;
    use crate::domain::ports::{DnsResolver, GeoLocator};
    use crate::domain::services::ResolutionCache;
    use crate::domain::value_objects::{Host, TargetPattern};
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct CountingDns {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DnsResolver for CountingDns {
        async fn resolve_ipv4(&self, _host: &str) -> Option<Ipv4Addr> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(Ipv4Addr::new(127, 0, 0, 1))
        }
    }

    struct FixedGeo;

    #[async_trait]
    impl GeoLocator for FixedGeo {
        async fn locate(&self, _ip: IpAddr) -> Option<GeoRecord> {
            Some(GeoRecord::new("NL", "Netherlands"))
        }
    }

    /// Treats the loopback mock server at `authority` as the edge network.
    fn client(authority: &str) -> (ObservedClient, ResolutionPipeline, Arc<CountingDns>) {
        let dns = Arc::new(CountingDns::default());
        let cache = ResolutionCache::new(
            Arc::new(DashMapKeyValueStore::new()),
            Duration::from_secs(3600),
        );
        let pipeline = ResolutionPipeline::spawn(
            dns.clone(),
            Arc::new(FixedGeo),
            cache,
            PipelineConfig {
                domain_suffix: "127.0.0.1".to_string(),
            },
        );
        let interceptor = RequestInterceptor::new(
            TargetPattern::new(authority, "/videoplayback"),
            pipeline.clone(),
        );
        (
            ObservedClient::new(reqwest::Client::new(), interceptor),
            pipeline,
            dns,
        )
    }

    #[tokio::test]
    async fn test_fetch_observes_and_returns_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/videoplayback"))
            .respond_with(ResponseTemplate::new(200).set_body_string("segment"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, pipeline, dns) = client(&mock_server.address().to_string());
        let response = client
            .fetch(&format!("{}/videoplayback?itag=1", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "segment");

        pipeline.settle().await;
        assert_eq!(dns.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.snapshot().last_host, Some(Host::new("127.0.0.1")));
        assert_eq!(pipeline.snapshot().display_text, "荷兰");
    }

    #[tokio::test]
    async fn test_execute_keeps_method_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/videoplayback"))
            .and(header("x-client", "player"))
            .and(body_string("ump-payload"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, pipeline, _) = client(&mock_server.address().to_string());
        let request = client
            .inner()
            .post(format!("{}/videoplayback", mock_server.uri()))
            .header("x-client", "player")
            .body("ump-payload")
            .build()
            .unwrap();

        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status(), 200);

        pipeline.settle().await;
        assert!(pipeline.snapshot().last_host.is_some());
    }

    #[tokio::test]
    async fn test_non_segment_request_is_not_observed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/generate_204"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let (client, pipeline, dns) = client(&mock_server.address().to_string());
        let response = client
            .fetch(&format!("{}/generate_204", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
        pipeline.settle().await;
        assert_eq!(dns.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_error_reaches_caller() {
        let (client, pipeline, _) = client("127.0.0.1:1");

        let result = client.fetch("http://127.0.0.1:1/videoplayback").await;
        assert!(result.is_err());

        // The edge host was still handed to the pipeline
        pipeline.settle().await;
        assert_eq!(pipeline.snapshot().last_host, Some(Host::new("127.0.0.1")));
    }
}
