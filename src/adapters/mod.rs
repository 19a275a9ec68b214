// Adapters layer: concrete implementations for external systems (http, sse).

pub mod http;
pub mod sse;

pub use http::ApiClient;
