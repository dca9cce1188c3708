//! Tracing initialization reads `RUST_LOG`.
//!
//! The global subscriber can be installed once per process, so this file
//! holds a single test.

use stock_image_mcp::config::LoggingConfig;
use stock_image_mcp::telemetry;
use tracing::Level;

#[test]
fn test_rust_log_enables_provider_debug_logs() {
    std::env::set_var("RUST_LOG", "stock_image_mcp=debug");

    telemetry::init_tracing("stock_image_mcp", &LoggingConfig::default()).unwrap();

    assert!(tracing::enabled!(target: "stock_image_mcp::providers", Level::DEBUG));
    assert!(!tracing::enabled!(target: "stock_image_mcp::providers", Level::TRACE));
    assert!(!tracing::enabled!(target: "hyper", Level::INFO));
}
