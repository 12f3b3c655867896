//! Response hardening.
//!
//! The status page embeds diagnostic text about the environment, so every
//! response is marked as non-cacheable and non-embeddable.

mod middleware;

pub use middleware::SecurityHeaders;
