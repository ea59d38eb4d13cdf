//! # Invader Swarm
//!
//! Simulation core for a fixed-formation shoot-'em-up: a rigid grid of
//! enemy units that marches, drops, fires and dies.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        INVADER SWARM                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── grid.rs      - Cells, cell rectangles, pixel mapping    │
//! │  ├── rng.rs       - Deterministic Xorshift128+ PRNG          │
//! │  └── hash.rs      - State hashing for replay checks          │
//! │                                                              │
//! │  game/            - Swarm logic (deterministic)              │
//! │  ├── config.rs    - Tuning and validation                    │
//! │  ├── speed.rs     - Advance speed model                      │
//! │  ├── state.rs     - Units and formation                      │
//! │  ├── collision.rs - Hit tests                                │
//! │  ├── explosion.rs - Destruction animation                    │
//! │  ├── render.rs    - Dirty-rectangle drawing                  │
//! │  ├── host.rs      - Collaborator traits                      │
//! │  ├── events.rs    - Event log                                │
//! │  ├── tick.rs      - One logic update                         │
//! │  └── swarm.rs     - SwarmController entry points             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Model
//!
//! One `update()` per display frame, then one `render()` once all logic
//! for the frame has settled. The swarm never blocks and never fails at
//! runtime; only configuration can be rejected.
//!
//! ```
//! use invader_swarm::{CharBuffer, SwarmConfig, SwarmController};
//!
//! let mut swarm = SwarmController::new(SwarmConfig::default()).unwrap();
//! let mut screen = CharBuffer::for_config(swarm.config());
//! swarm.render(&mut screen);
//! assert!(!swarm.is_cleared());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::grid::{Cell, PixelPoint};
pub use crate::core::rng::DeterministicRng;
pub use crate::game::config::{ConfigError, SwarmConfig};
pub use crate::game::render::CharBuffer;
pub use crate::game::swarm::SwarmController;
pub use crate::game::tick::TickResult;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logic ticks per second (one per PAL frame)
pub const TICK_RATE: u32 = 50;
