#![allow(dead_code)]
//! Shared integration test utilities.

use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Route `tracing` output to the test harness. Later calls are no-ops.
pub fn init_test_logging() {
  INIT_LOGGING.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_max_level(tracing::Level::TRACE)
      .with_test_writer()
      .with_ansi(false)
      .try_init();
  });
}
