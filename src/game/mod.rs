//! Game Logic Module
//!
//! All swarm simulation code. Deterministic given the same calls.
//!
//! ## Module Structure
//!
//! - `config`: Tuning, geometry and validation
//! - `speed`: Frames-per-step escalation curve
//! - `state`: Units and the formation aggregate
//! - `collision`: Projectile, structure, player and floor tests
//! - `explosion`: Per-unit destruction animation
//! - `render`: Dirty-rectangle drawing and the in-memory text screen
//! - `host`: Collaborator traits the swarm calls out through
//! - `events`: Swarm events for replay/inspection
//! - `tick`: One logic update
//! - `swarm`: The controller and its public entry points

pub mod config;
pub mod speed;
pub mod state;
pub mod collision;
pub mod explosion;
pub mod render;
pub mod host;
pub mod events;
pub mod tick;
pub mod swarm;

// Re-export key types
pub use config::{ConfigError, SwarmConfig};
pub use speed::{SpeedCurve, MIN_DELAY};
pub use state::{Direction, Formation, Phase, Unit, UnitKind, UnitStatus};
pub use render::CharBuffer;
pub use host::{
    AudioCue, GameFlow, PlayerView, RandomSource, RenderSurface, ScoreSink, Structures, SwarmHost,
};
pub use events::{SwarmEvent, SwarmEventData};
pub use tick::TickResult;
pub use swarm::SwarmController;
