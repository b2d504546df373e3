//! Integration tests entrypoint for the sampling pipeline and read API

#[path = "support/mod.rs"]
mod support;

#[path = "integration/log_api_test.rs"]
mod log_api_test;

#[path = "integration/restart_test.rs"]
mod restart_test;
