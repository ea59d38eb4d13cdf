//! Explosion Animation
//!
//! Runs every tick, independent of the formation step timer, so a unit
//! blows up at the same pace whether the swarm is crawling or racing.

use crate::game::state::{Formation, UnitStatus};

/// Explosion pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosionTiming {
    /// Ticks per stage
    pub speed: u32,
    /// Stage at which the unit is gone
    pub final_stage: u32,
}

impl ExplosionTiming {
    /// Total ticks from hit to `Dead`.
    #[inline]
    pub fn total_ticks(&self) -> u32 {
        self.speed * self.final_stage
    }
}

/// Advance every exploding unit by one tick.
///
/// Returns the units that finished this tick and are now `Dead`.
pub fn advance_explosions(formation: &mut Formation, timing: ExplosionTiming) -> Vec<usize> {
    let mut finished = Vec::new();

    for (index, unit) in formation.units_mut().iter_mut().enumerate() {
        if unit.status != UnitStatus::Exploding {
            continue;
        }

        unit.anim_timer += 1;
        if unit.anim_timer >= timing.speed {
            unit.anim_timer = 0;
            unit.anim_stage += 1;
        }

        if unit.anim_stage >= timing.final_stage {
            unit.status = UnitStatus::Dead;
            finished.push(index);
        }
    }

    finished
}
