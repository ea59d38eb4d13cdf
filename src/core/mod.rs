//! Core deterministic primitives.
//!
//! Grid geometry, seeded randomness and state hashing. Nothing here knows
//! about the swarm itself.

pub mod grid;
pub mod rng;
pub mod hash;

// Re-export core types
pub use grid::{Cell, CellRect, PixelGeometry, PixelPoint};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
