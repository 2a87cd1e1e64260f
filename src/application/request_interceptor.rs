//! Request Interceptor
//!
//! Inspects outbound request URLs and forwards edge hosts of
//! media-segment fetches to the resolution pipeline. Observation is
//! passive: it never blocks, never fails and never touches the request.

use crate::application::resolution_pipeline::ResolutionPipeline;
use crate::domain::value_objects::{Host, TargetPattern};
use reqwest::Url;

/// Observer shared by every interception adapter.
#[derive(Clone)]
pub struct RequestInterceptor {
    pattern: TargetPattern,
    pipeline: ResolutionPipeline,
}

impl RequestInterceptor {
    pub fn new(pattern: TargetPattern, pipeline: ResolutionPipeline) -> Self {
        Self { pattern, pipeline }
    }

    /// Observe one outbound request URL.
    ///
    /// Matching URLs notify the pipeline without waiting for the lookup.
    pub fn observe_url(&self, url: &str) {
        if let Some(host) = self.candidate_host(url) {
            self.pipeline.notify(host);
        }
    }

    /// Edge host of a media-segment URL, or None if the URL is not one.
    pub fn candidate_host(&self, url: &str) -> Option<Host> {
        if !self.pattern.matches_url(url) {
            return None;
        }

        match Url::parse(url) {
            Ok(parsed) => parsed.host_str().map(Host::new),
            Err(e) => {
                tracing::debug!("ignoring unparseable segment url: {}", e);
                None
            }
        }
    }
}
