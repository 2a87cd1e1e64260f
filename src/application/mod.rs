//! Application Layer
//!
//! Use cases wiring the domain ports together.

mod request_interceptor;
mod resolution_pipeline;

pub use request_interceptor::RequestInterceptor;
pub use resolution_pipeline::{PipelineConfig, ResolutionPipeline};
