//! Test helpers.

use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Route `tracing` output to the test harness. Later calls are no-ops.
pub fn init_test_logging() { init_test_logging_with_level(tracing::Level::TRACE); }

pub fn init_test_logging_with_level(level: tracing::Level) {
  INIT_LOGGING.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_max_level(level)
      .with_test_writer()
      .with_target(true)
      .with_ansi(false)
      .try_init();
  });
}
