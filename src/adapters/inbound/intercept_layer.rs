//! Intercept Layer
//!
//! Tower middleware observing `http::Request` objects on their way to
//! an HTTP client service. Requests and responses pass through untouched.

use crate::application::RequestInterceptor;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer wrapping a client service with request observation.
#[derive(Clone)]
pub struct InterceptLayer {
    interceptor: RequestInterceptor,
}

impl InterceptLayer {
    pub fn new(interceptor: RequestInterceptor) -> Self {
        Self { interceptor }
    }
}

impl<S> Layer<S> for InterceptLayer {
    type Service = InterceptService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InterceptService {
            inner,
            interceptor: self.interceptor.clone(),
        }
    }
}

/// Service produced by [`InterceptLayer`].
///
/// Returns the inner service's future unchanged, so errors and
/// back-pressure are exactly those of the wrapped client.
#[derive(Clone)]
pub struct InterceptService<S> {
    inner: S,
    interceptor: RequestInterceptor,
}

impl<S, B> Service<http::Request<B>> for InterceptService<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        self.interceptor.observe_url(&request.uri().to_string());
        self.inner.call(request)
    }
}
