use std::io;

use thiserror::Error;

/// Errors surfaced while constructing a wheel or a cache.
///
/// Construction is the only fallible surface in this crate. Runtime
/// operations are best-effort: absence is reported through `Option` and
/// invalid requests (zero delays, unknown keys) are documented no-ops.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tick interval is the wheel's time resolution and must be non-zero.
    #[error("tick interval must be non-zero")]
    ZeroInterval,

    /// The slot count fixes the wheel's circumference and must be non-zero.
    #[error("slot count must be non-zero")]
    ZeroSlots,

    /// The wheel's owner thread could not be spawned.
    #[error("failed to spawn wheel thread: {0}")]
    Spawn(#[from] io::Error),
}
