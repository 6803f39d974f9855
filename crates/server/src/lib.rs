//! HTTP addon surface for the Internet Archive stream resolver.

pub mod api;
pub mod metrics;
pub mod state;
