//! Formation State Definitions
//!
//! The formation is a rigid body: every unit keeps the offset it was
//! created with and all apparent motion comes from moving the shared
//! origin. Units live in a fixed arena indexed row-major.

use serde::{Serialize, Deserialize};

use crate::core::grid::{Cell, CellRect};
use crate::core::hash::StateHasher;
use crate::game::config::SwarmConfig;

/// Units occupy a 2 x 2 block of cells.
pub const UNIT_WIDTH: i32 = 2;
/// Units occupy a 2 x 2 block of cells.
pub const UNIT_HEIGHT: i32 = 2;

// =============================================================================
// UNIT
// =============================================================================

/// Life status of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UnitStatus {
    /// Gone; ignored by every pass
    Dead = 0,
    /// Marching and collidable
    Alive = 1,
    /// Destroyed but still animating on screen
    Exploding = 2,
}

/// Visual / scoring tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UnitKind {
    /// Top row
    Top = 0,
    /// Second and third rows
    Middle = 1,
    /// Remaining rows
    Bottom = 2,
}

impl UnitKind {
    /// Tier for a formation row.
    pub fn for_row(row: u32) -> Self {
        match row {
            0 => UnitKind::Top,
            1 | 2 => UnitKind::Middle,
            _ => UnitKind::Bottom,
        }
    }

    /// Index into per-kind tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One member of the swarm.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    /// Current life status
    pub status: UnitStatus,
    /// Visual / scoring tier
    pub kind: UnitKind,
    /// Offset from the formation origin, fixed at creation
    offset: Cell,
    /// Row decoration colour
    pub color: u8,
    /// Points awarded when destroyed
    pub score_value: u32,
    /// Ticks spent in the current explosion stage
    pub anim_timer: u32,
    /// Current explosion stage
    pub anim_stage: u32,
    /// Cell where an explosion glyph was last drawn (renderer bookkeeping)
    #[serde(skip)]
    pub(crate) drawn_at: Option<Cell>,
}

impl Unit {
    /// Create a live unit.
    pub fn new(kind: UnitKind, offset: Cell, color: u8, score_value: u32) -> Self {
        Self {
            status: UnitStatus::Alive,
            kind,
            offset,
            color,
            score_value,
            anim_timer: 0,
            anim_stage: 0,
            drawn_at: None,
        }
    }

    /// Offset from the formation origin.
    #[inline]
    pub fn offset(&self) -> Cell {
        self.offset
    }

    /// Is the unit marching?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == UnitStatus::Alive
    }

    /// Is the unit mid-explosion?
    #[inline]
    pub fn is_exploding(&self) -> bool {
        self.status == UnitStatus::Exploding
    }

    /// Top-left cell for a given origin.
    #[inline]
    pub fn cell_at(&self, origin: Cell) -> Cell {
        origin + self.offset
    }

    /// 2 x 2 footprint for a given origin.
    #[inline]
    pub fn footprint_at(&self, origin: Cell) -> CellRect {
        CellRect::new(self.cell_at(origin), UNIT_WIDTH, UNIT_HEIGHT)
    }

    /// Hash this unit's mutable state.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.status as u8);
        hasher.update_u32(self.anim_timer);
        hasher.update_u32(self.anim_stage);
    }
}

// =============================================================================
// FORMATION
// =============================================================================

/// Movement phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// Stepping sideways
    #[default]
    Advancing = 0,
    /// Descending one drop on the next step
    Dropping = 1,
}

/// Horizontal marching direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards lower columns
    Left,
    /// Towards higher columns
    #[default]
    Right,
}

impl Direction {
    /// Column delta for one step.
    #[inline]
    pub fn step(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Column span of the living units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AliveSpan {
    /// Leftmost absolute column of a live unit
    pub min_col: i32,
    /// Rightmost absolute column of a live unit
    pub max_col: i32,
}

/// The whole swarm: shared origin plus the unit arena.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Formation {
    /// Current origin (top-left of the bounding box)
    pub origin: Cell,
    /// Origin at the start of the latest tick
    pub previous_origin: Cell,
    /// Current marching direction
    pub direction: Direction,
    /// Direction to take after the pending drop
    pub pending_direction: Direction,
    /// Movement phase
    pub phase: Phase,
    /// Frames left before the next step
    pub tick_timer: u32,
    /// Frames per step as last computed
    pub current_delay: u32,
    /// Two-frame idle animation toggle
    pub anim_frame: u8,
    /// Geometry changed and a full redraw is owed
    pub dirty: bool,
    /// Origin the idle sprites were last drawn at (renderer bookkeeping)
    #[serde(skip)]
    pub(crate) drawn_origin: Option<Cell>,
    /// Units, row-major
    units: Vec<Unit>,
    /// Units per formation row
    columns: u32,
    /// Cached number of `Alive` units
    alive_count: u32,
    /// Start position for resets
    home: Cell,
}

impl Formation {
    /// Build a full-strength formation at the top of the board.
    pub fn new(config: &SwarmConfig) -> Self {
        let mut units = Vec::with_capacity(config.unit_count());

        for row in 0..config.rows {
            let kind = UnitKind::for_row(row);
            let color = config.row_color(row);
            let score_value = config.score_values[kind.index()];

            for col in 0..config.columns {
                let offset = Cell::new(
                    col as i32 * config.column_spacing,
                    row as i32 * config.row_spacing,
                );
                units.push(Unit::new(kind, offset, color, score_value));
            }
        }

        let home = Cell::new(config.start_col, config.start_row);
        let alive_count = units.len() as u32;

        Self {
            origin: home,
            previous_origin: home,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            phase: Phase::Advancing,
            tick_timer: config.initial_delay,
            current_delay: config.initial_delay,
            anim_frame: 0,
            dirty: true,
            drawn_origin: None,
            units,
            columns: config.columns,
            alive_count,
            home,
        }
    }

    /// All units, row-major.
    #[inline]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Mutable access for the animator and renderer.
    #[inline]
    pub(crate) fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    /// A single unit by arena index.
    #[inline]
    pub fn unit(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    /// Units per formation row.
    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of units with status `Alive`.
    #[inline]
    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Absolute top-left cell of a unit at the current origin.
    #[inline]
    pub fn unit_cell(&self, index: usize) -> Option<Cell> {
        self.units.get(index).map(|u| u.cell_at(self.origin))
    }

    /// Mark a unit `Exploding` and restart its animation.
    ///
    /// Returns true when the unit was alive; only that transition
    /// decrements the alive count. Dead units are left untouched.
    pub fn explode(&mut self, index: usize) -> bool {
        let Some(unit) = self.units.get_mut(index) else {
            return false;
        };

        let was_alive = match unit.status {
            UnitStatus::Dead => return false,
            UnitStatus::Alive => true,
            UnitStatus::Exploding => false,
        };

        unit.status = UnitStatus::Exploding;
        unit.anim_timer = 0;
        unit.anim_stage = 0;

        if was_alive {
            self.alive_count = self.alive_count.saturating_sub(1);
        }
        was_alive
    }

    /// Column span of the living units, `None` when nothing is alive.
    pub fn alive_span(&self) -> Option<AliveSpan> {
        if self.alive_count == 0 {
            return None;
        }

        let mut span: Option<AliveSpan> = None;
        for unit in self.units.iter().filter(|u| u.is_alive()) {
            let col = self.origin.col + unit.offset.col;
            span = Some(match span {
                None => AliveSpan { min_col: col, max_col: col },
                Some(s) => AliveSpan {
                    min_col: s.min_col.min(col),
                    max_col: s.max_col.max(col),
                },
            });
        }
        span
    }

    /// Lowest absolute row of a living unit.
    pub fn lowest_alive_row(&self) -> Option<i32> {
        self.units
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| self.origin.row + u.offset.row)
            .max()
    }

    /// Put the formation back at the top of the board.
    ///
    /// Unit status is kept; used after the player loses a life. Whatever
    /// is on screen stays until the next render erases it.
    pub fn reset_position(&mut self) {
        self.origin = self.home;
        self.previous_origin = self.home;
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.phase = Phase::Advancing;
        self.tick_timer = 0;
        self.anim_frame = 0;
        self.dirty = true;
    }

    /// Full-strength formation at the top of the board.
    pub fn reset_full(&mut self) {
        self.reset_position();
        for unit in &mut self.units {
            unit.status = UnitStatus::Alive;
            unit.anim_timer = 0;
            unit.anim_stage = 0;
        }
        self.alive_count = self.units.len() as u32;
    }

    /// Recount living units. Must always equal the cached count.
    pub fn count_alive(&self) -> u32 {
        self.units.iter().filter(|u| u.is_alive()).count() as u32
    }

    /// Hash geometry, timers and every unit.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_cell(self.origin);
        hasher.update_cell(self.previous_origin);
        hasher.update_i32(self.direction.step());
        hasher.update_i32(self.pending_direction.step());
        hasher.update_u8(self.phase as u8);
        hasher.update_u32(self.tick_timer);
        hasher.update_u32(self.current_delay);
        hasher.update_u8(self.anim_frame);
        hasher.update_u32(self.alive_count);
        for unit in &self.units {
            unit.hash_into(hasher);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_layout() {
        let config = SwarmConfig::default();
        let formation = Formation::new(&config);

        assert_eq!(formation.units().len(), 55);
        assert_eq!(formation.alive_count(), 55);
        assert_eq!(formation.origin, Cell::new(2, 2));

        // Row-major: index 12 is row 1, column 1
        let unit = formation.unit(12).unwrap();
        assert_eq!(unit.offset(), Cell::new(3, 2));
        assert_eq!(unit.kind, UnitKind::Middle);
        assert_eq!(unit.score_value, 20);
    }

    #[test]
    fn test_kind_tiers() {
        assert_eq!(UnitKind::for_row(0), UnitKind::Top);
        assert_eq!(UnitKind::for_row(1), UnitKind::Middle);
        assert_eq!(UnitKind::for_row(2), UnitKind::Middle);
        assert_eq!(UnitKind::for_row(3), UnitKind::Bottom);
        assert_eq!(UnitKind::for_row(4), UnitKind::Bottom);
    }

    #[test]
    fn test_explode_counts_once() {
        let mut formation = Formation::new(&SwarmConfig::default());

        assert!(formation.explode(3));
        assert_eq!(formation.alive_count(), 54);

        // Already exploding: restarts the animation, no second decrement
        formation.units_mut()[3].anim_stage = 2;
        assert!(!formation.explode(3));
        assert_eq!(formation.alive_count(), 54);
        assert_eq!(formation.unit(3).unwrap().anim_stage, 0);

        formation.units_mut()[3].status = UnitStatus::Dead;
        assert!(!formation.explode(3));
        assert_eq!(formation.unit(3).unwrap().status, UnitStatus::Dead);

        assert!(!formation.explode(999));
        assert_eq!(formation.alive_count(), formation.count_alive());
    }

    #[test]
    fn test_alive_span_ignores_dead_columns() {
        let mut formation = Formation::new(&SwarmConfig::default());
        assert_eq!(
            formation.alive_span(),
            Some(AliveSpan { min_col: 2, max_col: 32 })
        );

        // Kill the whole rightmost column
        for row in 0..5 {
            formation.explode(row * 11 + 10);
        }
        assert_eq!(formation.alive_span().unwrap().max_col, 29);
    }

    #[test]
    fn test_alive_span_empty() {
        let mut formation = Formation::new(&SwarmConfig::default());
        for i in 0..55 {
            formation.explode(i);
        }
        assert_eq!(formation.alive_count(), 0);
        assert!(formation.alive_span().is_none());
        assert!(formation.lowest_alive_row().is_none());
    }

    #[test]
    fn test_reset_position_keeps_status() {
        let mut formation = Formation::new(&SwarmConfig::default());
        formation.explode(0);
        formation.origin = Cell::new(9, 14);
        formation.direction = Direction::Left;
        formation.phase = Phase::Dropping;

        formation.reset_position();

        assert_eq!(formation.origin, Cell::new(2, 2));
        assert_eq!(formation.direction, Direction::Right);
        assert_eq!(formation.phase, Phase::Advancing);
        assert_eq!(formation.alive_count(), 54);
    }

    #[test]
    fn test_reset_full_revives() {
        let mut formation = Formation::new(&SwarmConfig::default());
        for i in 0..20 {
            formation.explode(i);
        }
        formation.reset_full();
        assert_eq!(formation.alive_count(), 55);
        assert_eq!(formation.count_alive(), 55);
    }
}
