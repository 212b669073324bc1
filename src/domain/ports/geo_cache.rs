//! Geo Cache Port
//!
//! Defines the interface for the durable place-name cache.
//! One implementation backs both the point cache and the bounding-box cache.

use std::path::PathBuf;

/// Errors surfaced by a cache whose durable log cannot be used.
///
/// Individual corrupt records are not errors; they are skipped on load.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The log could not be opened or read at all.
    #[error("cache log {} is unavailable: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The log exists but its header cannot be used, so stores would not
    /// survive a restart.
    #[error("cache log {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    /// A record could not be appended to the log.
    #[error("failed to append to cache log {}: {source}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Cache from canonical place-name to a previously resolved value.
///
/// This is an outbound port. Implementations must serialize `store`
/// internally so that a memory update never interleaves with another
/// writer's durable append.
pub trait GeoCache<V>: Send + Sync {
    /// Look up a place in memory. Never touches the durable log.
    fn lookup(&self, place: &str) -> Option<V>;

    /// Persist a value and make it visible to `lookup`.
    ///
    /// Returns only after the durable append succeeded; on error the
    /// in-memory state is left unchanged.
    fn store(&self, place: &str, value: V) -> Result<(), CacheError>;

    /// Number of entries currently held in memory.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
