// Logging module for structured logging using the tracing crate

use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Initialize the tracing subscriber for structured logging.
///
/// The subscriber is configured with:
/// - JSON formatting for log aggregation systems
/// - Level filtering from `RUST_LOG`, defaulting to `info`
/// - Output to stdout for container deployments
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_subscriber() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = Registry::default().with(filter).with(fmt::layer().json());

    tracing::subscriber::set_global_default(subscriber).map_err(|e| Box::new(e) as Box<dyn Error>)
}

/// Initialize a test subscriber that captures log output to a buffer.
///
/// Unlike the production subscriber this writes JSON lines to an
/// in-memory buffer, so tests can assert on the emitted fields.
pub fn init_test_subscriber(buffer: Arc<Mutex<Vec<u8>>>) -> Result<(), Box<dyn Error>> {
    let test_writer = TestWriter { buffer };

    let json_layer = fmt::layer().json().with_writer(move || test_writer.clone());

    let subscriber = Registry::default().with(json_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| Box::new(e) as Box<dyn Error>)
}

/// A writer that appends to a shared buffer, for test capture.
#[derive(Clone)]
struct TestWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
