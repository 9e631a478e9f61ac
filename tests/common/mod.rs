//! Common test utilities for integration tests.
//!
//! - `logger`: structured test logging
//! - `server`: wiremock helpers for the public feed endpoint

pub mod logger;
pub mod server;
