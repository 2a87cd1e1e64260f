mod intercept_layer;
mod observed_client;

pub use intercept_layer::{InterceptLayer, InterceptService};
pub use observed_client::ObservedClient;
