//! Swarm Simulation Tick
//!
//! One logic update of the formation. Runs once per display frame, always
//! to completion, in a fixed order:
//!
//! 1. Commit the previous origin for the renderer
//! 2. Count down the step timer; on expiry recompute the delay and step
//!    or drop the formation
//! 3. After a drop, check the floor (ends the collision checks)
//! 4. Structure overlap, every tick
//! 5. Player overlap, on every tick the step timer fired
//! 6. Explosions, every tick

use tracing::{debug, info};

use crate::core::grid::Cell;
use crate::game::collision::{
    check_floor,
    check_player_overlap,
    resolve_structure_overlap,
};
use crate::game::events::{SwarmEvent, SwarmEventData};
use crate::game::explosion::{advance_explosions, ExplosionTiming};
use crate::game::host::SwarmHost;
use crate::game::state::{Direction, Phase};
use crate::game::swarm::SwarmController;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick (plus hits resolved since the last tick)
    pub events: Vec<SwarmEvent>,
    /// Whether the step timer expired this tick
    pub stepped: bool,
    /// A living unit reached the floor row
    pub reached_floor: bool,
    /// A unit ran into the player
    pub player_killed: bool,
    /// No living units remain
    pub cleared: bool,
}

/// What the movement step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Timer still running
    Waiting,
    /// Timer expired but nothing is alive to move
    Idle,
    /// Origin moved sideways
    Advanced,
    /// Edge reached; drop queued
    EdgeReached,
    /// Origin moved down
    Dropped,
}

/// Run one simulation tick.
pub fn tick<H>(swarm: &mut SwarmController, host: &mut H) -> TickResult
where
    H: SwarmHost + ?Sized,
{
    let mut result = TickResult::default();

    swarm.tick += 1;

    // 1. Snapshot for the erase pass
    swarm.formation.previous_origin = swarm.formation.origin;

    // 2. Movement
    let step = step_formation(swarm, host);
    result.stepped = step != Step::Waiting;

    // 3. Floor check after a drop
    if step == Step::Dropped {
        if let Some(row) = check_floor(&swarm.formation, swarm.config.floor_row) {
            info!(row, tick = swarm.tick, "Formation reached the floor");
            host.formation_reached_floor();
            swarm.push_event(SwarmEventData::ReachedFloor { row });
            result.reached_floor = true;
        }
    }

    if !result.reached_floor {
        // 4. Structures
        process_structure_overlap(swarm, host);

        // 5. Player
        let stepped = matches!(step, Step::Advanced | Step::EdgeReached | Step::Dropped);
        if stepped {
            result.player_killed = process_player_overlap(swarm, host);
        }
    }

    // 6. Explosions
    process_explosions(swarm);

    check_cleared(swarm, &mut result);

    result.events = swarm.take_events();
    result
}

/// Count down the step timer and move the formation when it expires.
fn step_formation<H>(swarm: &mut SwarmController, host: &mut H) -> Step
where
    H: SwarmHost + ?Sized,
{
    let formation = &mut swarm.formation;

    if formation.tick_timer > 0 {
        formation.tick_timer -= 1;
        return Step::Waiting;
    }

    let Some(span) = formation.alive_span() else {
        return Step::Idle;
    };

    host.formation_advance();

    let delay = swarm
        .config
        .speed_curve
        .compute_delay(formation.alive_count(), swarm.level);
    formation.tick_timer = delay;
    formation.current_delay = delay;
    formation.anim_frame ^= 1;
    formation.dirty = true;

    match formation.phase {
        Phase::Advancing => {
            let at_edge = match formation.direction {
                Direction::Right => span.max_col >= swarm.config.right_edge,
                Direction::Left => span.min_col <= swarm.config.left_edge,
            };

            if at_edge {
                formation.phase = Phase::Dropping;
                formation.pending_direction = formation.direction.reversed();
                debug!(
                    tick = swarm.tick,
                    min_col = span.min_col,
                    max_col = span.max_col,
                    "Edge reached, dropping next step"
                );
                let next_direction = formation.pending_direction;
                swarm.push_event(SwarmEventData::EdgeReached { next_direction });
                Step::EdgeReached
            } else {
                formation.origin.col += formation.direction.step();
                let origin = formation.origin;
                swarm.push_event(SwarmEventData::Advanced { origin, delay });
                Step::Advanced
            }
        }
        Phase::Dropping => {
            let floor = swarm.config.floor_row;
            if formation.origin.row < floor {
                formation.origin.row = (formation.origin.row + swarm.config.drop_rows).min(floor);
            }
            formation.direction = formation.pending_direction;
            formation.phase = Phase::Advancing;

            let origin = formation.origin;
            debug!(tick = swarm.tick, row = origin.row, direction = ?formation.direction, "Formation dropped");
            swarm.push_event(SwarmEventData::Dropped { origin });
            Step::Dropped
        }
    }
}

/// Units flying into structures.
fn process_structure_overlap<H>(swarm: &mut SwarmController, host: &mut H)
where
    H: SwarmHost + ?Sized,
{
    let crashes = resolve_structure_overlap(&mut swarm.formation, &swarm.config, host);

    for crash in crashes {
        debug!(unit = crash.unit, col = crash.cell.col, row = crash.cell.row, "Unit crashed into structure");
        swarm.push_event(SwarmEventData::UnitCrashed {
            unit: crash.unit,
            cell: crash.cell,
        });
    }
}

/// Units overrunning the player. Returns true when the player died.
fn process_player_overlap<H>(swarm: &mut SwarmController, host: &mut H) -> bool
where
    H: SwarmHost + ?Sized,
{
    let Some(unit) = check_player_overlap(&swarm.formation, &swarm.config, &*host) else {
        return false;
    };

    info!(unit, tick = swarm.tick, "Formation overran the player");
    host.player_killed();
    swarm.push_event(SwarmEventData::PlayerKilled { unit });
    true
}

fn process_explosions(swarm: &mut SwarmController) {
    let timing = ExplosionTiming {
        speed: swarm.config.explosion_speed,
        final_stage: swarm.config.explosion_stages,
    };

    for unit in advance_explosions(&mut swarm.formation, timing) {
        debug!(unit, tick = swarm.tick, "Unit destroyed");
        swarm.push_event(SwarmEventData::UnitDestroyed { unit });
    }
}

/// Report the clear once, on the tick it is first seen.
fn check_cleared(swarm: &mut SwarmController, result: &mut TickResult) {
    result.cleared = swarm.is_cleared();

    if result.cleared && !swarm.clear_reported {
        swarm.clear_reported = true;
        info!(tick = swarm.tick, level = swarm.level, "Formation cleared");
        swarm.push_event(SwarmEventData::Cleared);
    }
}

/// Replay a round from a fresh controller.
///
/// `hits` lists projectile cells per tick (`hits[t]` lands before tick
/// `t` runs). Returns the final controller and every event in order.
pub fn replay_round<H>(
    initial: SwarmController,
    hits: &[Vec<Cell>],
    tick_count: u32,
    host: &mut H,
) -> (SwarmController, Vec<SwarmEvent>)
where
    H: SwarmHost + ?Sized,
{
    let mut swarm = initial;
    let mut all_events = Vec::new();

    for t in 0..tick_count {
        if let Some(cells) = hits.get(t as usize) {
            for cell in cells {
                swarm.resolve_projectile_hit(*cell, host);
            }
        }

        let result = tick(&mut swarm, host);
        all_events.extend(result.events);

        if result.reached_floor || result.player_killed {
            break;
        }
    }

    (swarm, all_events)
}
