// Constants module - centralized default values for configuration

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

/// Default maximum request header size (1 MiB)
pub const DEFAULT_MAX_HEADER_BYTES: usize = 1 << 20;

/// Default app startup timeout in seconds
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default graceful shutdown timeout in seconds
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Signing
// =============================================================================

/// Length of a path signature: URL-safe base64 of a 20-byte SHA1 MAC,
/// padding included
pub const SIGNATURE_LEN: usize = 28;

/// Largest meaningful trim tolerance: the RGB color distance between
/// opposite cube corners, ceil(sqrt(3 * 255^2))
pub const MAX_TRIM_TOLERANCE: u32 = 442;

// =============================================================================
// Loader defaults
// =============================================================================

/// Default User-Agent sent to source hosts
pub const DEFAULT_USER_AGENT: &str = concat!("tsubame/", env!("CARGO_PKG_VERSION"));

/// Default scheme applied to schemeless source URLs
pub const DEFAULT_SCHEME: &str = "https";

/// Default Accept header sent to source hosts
pub const DEFAULT_ACCEPT: &str = "*/*";
