//! Configuration module for the feed glow application.

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod feed;
pub mod particles;

// Re-export commonly used items
pub use feed::{FEED, FeedConfig};
pub use particles::{PARTICLES, ParticleConfig};
