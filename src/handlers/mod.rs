//! HTTP request plumbing: shared state and health probe.

pub mod http;

pub use http::*;
