//! Motion error types

use thiserror::Error;

/// Errors from constructing or configuring motion primitives
#[derive(Debug, Error)]
pub enum MotionError {
    /// A breathing pattern whose phases sum to zero cannot oscillate
    #[error("breath pattern '{0}' has zero total duration")]
    EmptyPattern(&'static str),

    /// A materializer transition needs a positive per-character duration
    #[error("char_duration_ms must be positive (got {0})")]
    ZeroCharDuration(f32),
}
