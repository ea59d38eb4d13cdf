//! Host Collaborators
//!
//! The swarm only ever calls out through these traits. The host owns the
//! screen, the player, the bases, the score and the sound; the swarm never
//! hands out a reference it could later mutate.

use crate::core::grid::Cell;
use crate::core::rng::DeterministicRng;

/// Text-grid output surface.
pub trait RenderSurface {
    /// Write a glyph and colour at an absolute cell.
    fn put(&mut self, cell: Cell, glyph: u8, color: u8);

    /// Read the glyph currently shown at an absolute cell.
    fn glyph_at(&self, cell: Cell) -> u8;
}

/// Read access to the player ship.
pub trait PlayerView {
    /// Player sprite's left pixel.
    fn player_x(&self) -> i32;
}

/// Destructible defensive structures.
pub trait Structures {
    /// Damage the structure at `cell`, if any.
    ///
    /// With `destroy_on_contact` the cell is removed outright instead of
    /// taking one stage of damage. Returns true when something was there.
    fn query_and_damage(&mut self, cell: Cell, destroy_on_contact: bool) -> bool;
}

/// Score keeping.
pub trait ScoreSink {
    /// Credit points to the player.
    fn add_score(&mut self, points: u32);
}

/// Sound and flash cues.
pub trait AudioCue {
    /// A unit was destroyed.
    fn unit_destroyed(&mut self);

    /// The formation took a step.
    fn formation_advance(&mut self);
}

/// Fire-and-forget notifications to the mode driver.
pub trait GameFlow {
    /// A living unit reached the floor row.
    fn formation_reached_floor(&mut self);

    /// A unit ran into the player.
    fn player_killed(&mut self);
}

/// Everything `update()` needs from the host.
pub trait SwarmHost: PlayerView + Structures + ScoreSink + AudioCue + GameFlow {}

impl<T: PlayerView + Structures + ScoreSink + AudioCue + GameFlow> SwarmHost for T {}

/// Uniform integer source for shooter selection.
pub trait RandomSource {
    /// Uniform integer in `[0, max)`; 0 when `max` is 0.
    fn below(&mut self, max: u32) -> u32;
}

impl RandomSource for DeterministicRng {
    #[inline]
    fn below(&mut self, max: u32) -> u32 {
        self.next_int(max)
    }
}
