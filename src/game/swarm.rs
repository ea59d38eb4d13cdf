//! Swarm Controller
//!
//! Owns the formation and exposes the entry points the surrounding game
//! loop drives: `init`, `update`, `render`, projectile hits, resets and
//! shooter selection.

use tracing::{debug, info};

use crate::core::grid::{Cell, PixelPoint};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::collision;
use crate::game::config::{ConfigError, SwarmConfig};
use crate::game::events::{SwarmEvent, SwarmEventData};
use crate::game::host::{AudioCue, RandomSource, RenderSurface, ScoreSink, SwarmHost};
use crate::game::render::render_formation;
use crate::game::state::{Formation, UNIT_HEIGHT};
use crate::game::tick::{tick, TickResult};

/// The swarm and everything needed to run it.
#[derive(Clone, Debug)]
pub struct SwarmController {
    /// Validated configuration
    pub(crate) config: SwarmConfig,
    /// The formation aggregate
    pub(crate) formation: Formation,
    /// Difficulty level, never below 1
    pub(crate) level: u32,
    /// Ticks since the last `init()`
    pub(crate) tick: u32,
    /// Shooter selection stream
    rng: DeterministicRng,
    /// Events waiting for the next tick result
    events: Vec<SwarmEvent>,
    /// `Cleared` already emitted for this round
    pub(crate) clear_reported: bool,
}

impl SwarmController {
    /// Create a controller at level 1, ready to play.
    pub fn new(config: SwarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let formation = Formation::new(&config);
        let rng = DeterministicRng::for_round(config.rng_seed, 1);

        Ok(Self {
            config,
            formation,
            level: 1,
            tick: 0,
            rng,
            events: Vec::new(),
            clear_reported: false,
        })
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Start a round: full-strength formation with the opening delay loaded.
    pub fn init(&mut self) {
        self.reset_full();
        self.formation.tick_timer = self.config.initial_delay;
        self.formation.current_delay = self.config.initial_delay;
        self.tick = 0;
        info!(level = self.level, units = self.formation.alive_count(), "Swarm initialised");
    }

    /// Revive every unit and return to the top of the board.
    ///
    /// The first step follows on the next tick.
    pub fn reset_full(&mut self) {
        self.formation.reset_full();
        self.rng = DeterministicRng::for_round(self.config.rng_seed, self.level);
        self.events.clear();
        self.clear_reported = false;
        info!(level = self.level, "Swarm reset");
    }

    /// Return to the top of the board, keeping every unit's status.
    pub fn reset_position_only(&mut self) {
        self.formation.reset_position();
        debug!(alive = self.formation.alive_count(), "Swarm repositioned");
    }

    /// Difficulty level.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Set the difficulty level (clamped to at least 1).
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    /// Next level: raise the difficulty and bring back a full formation.
    pub fn advance_level(&mut self) {
        self.set_level(self.level.saturating_add(1));
        self.init();
    }

    // =========================================================================
    // PER-FRAME
    // =========================================================================

    /// Run one logic tick.
    pub fn update<H>(&mut self, host: &mut H) -> TickResult
    where
        H: SwarmHost + ?Sized,
    {
        let result = tick(self, host);
        #[cfg(feature = "debug-tracing")]
        tracing::trace!(
            tick = self.tick,
            origin = ?self.formation.origin,
            timer = self.formation.tick_timer,
            alive = self.formation.alive_count(),
            "tick"
        );
        result
    }

    /// Draw the formation. Call once per frame after all logic has run.
    pub fn render<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        render_formation(&mut self.formation, &self.config, surface);
    }

    /// Resolve a player projectile at an absolute cell.
    ///
    /// Returns true when a unit absorbed it.
    pub fn resolve_projectile_hit<H>(&mut self, cell: Cell, host: &mut H) -> bool
    where
        H: ScoreSink + AudioCue + ?Sized,
    {
        let Some(hit) = collision::resolve_projectile_hit(&mut self.formation, cell, host) else {
            return false;
        };

        debug!(unit = hit.unit, points = hit.points, col = cell.col, row = cell.row, "Unit hit");
        self.push_event(SwarmEventData::UnitHit {
            unit: hit.unit,
            points: hit.points,
        });
        true
    }

    /// Resolve a projectile given in sprite pixels.
    pub fn resolve_projectile_at_pixel<H>(&mut self, point: PixelPoint, host: &mut H) -> bool
    where
        H: ScoreSink + AudioCue + ?Sized,
    {
        match self.config.pixels.cell_of(point) {
            Some(cell) => self.resolve_projectile_hit(cell, host),
            None => false,
        }
    }

    /// Are all units gone (or exploding)?
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.formation.alive_count() < 1
    }

    // =========================================================================
    // SHOOTERS
    // =========================================================================

    /// Pick a front-line unit at random and return the pixel point just
    /// beneath its centre. `None` when nothing is alive.
    pub fn pick_random_shooter(&mut self) -> Option<PixelPoint> {
        let mut rng = std::mem::take(&mut self.rng);
        let point = self.pick_random_shooter_with(&mut rng);
        self.rng = rng;
        point
    }

    /// As [`pick_random_shooter`](Self::pick_random_shooter), drawing from
    /// a caller-supplied source.
    pub fn pick_random_shooter_with<R>(&self, rng: &mut R) -> Option<PixelPoint>
    where
        R: RandomSource + ?Sized,
    {
        let candidates = self.front_line();
        if candidates.is_empty() {
            return None;
        }

        let choice = rng.below(candidates.len() as u32) as usize;
        let index = candidates[choice.min(candidates.len() - 1)];
        let cell = self.formation.unit_cell(index)?;

        let pixels = &self.config.pixels;
        Some(PixelPoint::new(
            pixels.pixel_of(cell).x + pixels.cell_px,
            pixels.pixel_of(cell.offset(0, UNIT_HEIGHT)).y,
        ))
    }

    /// Lowest living unit in each formation column, by column.
    pub fn front_line(&self) -> Vec<usize> {
        let columns = self.formation.columns() as usize;
        let mut front: Vec<Option<usize>> = vec![None; columns];

        for (index, unit) in self.formation.units().iter().enumerate() {
            if !unit.is_alive() {
                continue;
            }
            let slot = &mut front[index % columns];
            let lower = match *slot {
                Some(current) => self
                    .formation
                    .unit(current)
                    .is_some_and(|c| unit.offset().row > c.offset().row),
                None => true,
            };
            if lower {
                *slot = Some(index);
            }
        }

        front.into_iter().flatten().collect()
    }

    /// Roll the controller's own stream: true one time in `n`.
    pub fn roll(&mut self, n: u32) -> bool {
        self.rng.one_in(n)
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Read-only view of the formation.
    #[inline]
    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Ticks since `init()`.
    #[inline]
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Move the formation to a new origin without running a tick.
    ///
    /// For scripted scenarios and level editors; the renderer erases the
    /// old footprint on the next frame.
    pub fn place_at(&mut self, origin: Cell) {
        self.formation.previous_origin = self.formation.origin;
        self.formation.origin = origin;
        self.formation.dirty = true;
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.level, |hasher| {
            self.formation.hash_into(hasher);
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Queue an event stamped with the current tick.
    pub(crate) fn push_event(&mut self, data: SwarmEventData) {
        self.events.push(SwarmEvent::new(self.tick, data));
    }

    /// Take all queued events.
    pub(crate) fn take_events(&mut self) -> Vec<SwarmEvent> {
        std::mem::take(&mut self.events)
    }
}
