/// Shortest probe timeout accepted anywhere, in milliseconds
pub const MIN_TIMEOUT_MS: u64 = 100;

/// Longest probe timeout a user may request, in milliseconds
pub const MAX_TIMEOUT_MS: u64 = 10_000;
