//! Identifier generation.
//!
//! Entries only need a source of process-wide unique values; the
//! [`IdGenerator`] trait keeps the algorithm pluggable.

use uuid::Uuid;

/// Source of unique entry identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produces a fresh identifier, never returned before in this process.
    fn generate(&self) -> Uuid;
}

/// Generator backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    /// Creates a new random generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}
