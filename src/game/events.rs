//! Swarm Events
//!
//! Events generated during simulation for replay and inspection.
//! They describe what happened; the host has already been notified
//! through its collaborator traits by the time it reads them.

use serde::{Serialize, Deserialize};
use crate::core::grid::Cell;
use crate::game::state::Direction;

/// Swarm event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwarmEventData {
    /// Formation stepped sideways
    Advanced {
        origin: Cell,
        delay: u32,
    },

    /// Formation hit an edge and will drop next step
    EdgeReached {
        next_direction: Direction,
    },

    /// Formation descended
    Dropped {
        origin: Cell,
    },

    /// A living unit reached the floor row
    ReachedFloor {
        row: i32,
    },

    /// A unit ran into the player
    PlayerKilled {
        unit: usize,
    },

    /// A projectile hit a unit
    UnitHit {
        unit: usize,
        points: u32,
    },

    /// A unit crashed into a structure
    UnitCrashed {
        unit: usize,
        cell: Cell,
    },

    /// A unit finished exploding
    UnitDestroyed {
        unit: usize,
    },

    /// No living units remain
    Cleared,
}

/// A swarm event stamped with its tick.
///
/// Events within a tick keep the order they were pushed in, which is
/// the order of the tick phases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: SwarmEventData,
}

impl SwarmEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: SwarmEventData) -> Self {
        Self { tick, data }
    }

    /// Unit this event concerns, if any.
    pub fn unit(&self) -> Option<usize> {
        match self.data {
            SwarmEventData::PlayerKilled { unit }
            | SwarmEventData::UnitHit { unit, .. }
            | SwarmEventData::UnitCrashed { unit, .. }
            | SwarmEventData::UnitDestroyed { unit } => Some(unit),
            _ => None,
        }
    }
}
