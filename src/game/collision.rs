//! Collision Detection
//!
//! Hit tests between the formation and everything it can touch:
//! player projectiles, structures, the player ship and the floor.
//! Scans run in arena order, so ties always resolve to the lowest
//! row-major unit index.

use crate::core::grid::{Cell, CellRect};
use crate::game::config::SwarmConfig;
use crate::game::host::{AudioCue, PlayerView, ScoreSink, Structures};
use crate::game::state::{Formation, UnitStatus, UNIT_HEIGHT, UNIT_WIDTH};

/// Result of a projectile hitting the formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileHit {
    /// Arena index of the unit hit
    pub unit: usize,
    /// Points credited
    pub points: u32,
}

/// A unit that flew into a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureCrash {
    /// Arena index of the unit
    pub unit: usize,
    /// Cell where contact happened
    pub cell: Cell,
}

/// Playfield as a cell rectangle.
#[inline]
fn playfield(config: &SwarmConfig) -> CellRect {
    CellRect::new(Cell::ZERO, config.playfield_cols, config.playfield_rows)
}

/// Find the first hittable unit covering `cell`.
///
/// Alive and exploding units both absorb projectiles; dead units do not.
pub fn find_unit_at(formation: &Formation, cell: Cell) -> Option<usize> {
    let origin = formation.origin;
    if cell.col < origin.col || cell.row < origin.row {
        return None;
    }

    let relative = Cell::new(cell.col - origin.col, cell.row - origin.row);

    formation.units().iter().position(|unit| {
        unit.status != UnitStatus::Dead
            && CellRect::new(unit.offset(), UNIT_WIDTH, UNIT_HEIGHT).contains(relative)
    })
}

/// Resolve a player projectile at `cell`.
///
/// On a hit the unit starts (or restarts) exploding, its score value is
/// credited and the destroyed cue plays. Misses mutate nothing.
pub fn resolve_projectile_hit<H>(
    formation: &mut Formation,
    cell: Cell,
    host: &mut H,
) -> Option<ProjectileHit>
where
    H: ScoreSink + AudioCue + ?Sized,
{
    let index = find_unit_at(formation, cell)?;
    let points = formation.unit(index)?.score_value;

    formation.explode(index);
    formation.dirty = true;

    host.add_score(points);
    host.unit_destroyed();

    Some(ProjectileHit { unit: index, points })
}

/// Crash living units into any structure under their footprint.
///
/// Contact destroys the touched structure cell and sends the unit
/// straight to `Exploding`; the first contact ends the checks for
/// that unit.
pub fn resolve_structure_overlap<H>(
    formation: &mut Formation,
    config: &SwarmConfig,
    host: &mut H,
) -> Vec<StructureCrash>
where
    H: Structures + AudioCue + ?Sized,
{
    let field = playfield(config);
    let origin = formation.origin;
    let mut crashes = Vec::new();

    for index in 0..formation.units().len() {
        let footprint = match formation.unit(index) {
            Some(unit) if unit.is_alive() => unit.footprint_at(origin),
            _ => continue,
        };

        let contact = footprint
            .cells()
            .filter(|cell| field.contains(*cell))
            .find(|cell| host.query_and_damage(*cell, true));

        if let Some(cell) = contact {
            formation.explode(index);
            host.unit_destroyed();
            crashes.push(StructureCrash { unit: index, cell });
        }
    }

    if !crashes.is_empty() {
        formation.dirty = true;
    }
    crashes
}

/// Find a living unit low enough to overlap the player ship.
///
/// Returns the first offending unit in arena order.
pub fn check_player_overlap<P>(
    formation: &Formation,
    config: &SwarmConfig,
    player: &P,
) -> Option<usize>
where
    P: PlayerView + ?Sized,
{
    let (first_col, last_col) = config
        .pixels
        .column_span(player.player_x(), config.player_width_px);
    let origin = formation.origin;

    formation.units().iter().position(|unit| {
        if !unit.is_alive() {
            return false;
        }
        let footprint = unit.footprint_at(origin);
        footprint.origin.row >= config.player_hit_row
            && footprint.overlaps_columns(first_col, last_col)
    })
}

/// Lowest living row if it has reached the floor.
pub fn check_floor(formation: &Formation, floor_row: i32) -> Option<i32> {
    formation
        .lowest_alive_row()
        .filter(|row| *row >= floor_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        score: u32,
        destroyed: u32,
        solid: Vec<Cell>,
        queried: Vec<Cell>,
        player_x: i32,
    }

    impl ScoreSink for Recorder {
        fn add_score(&mut self, points: u32) {
            self.score += points;
        }
    }

    impl AudioCue for Recorder {
        fn unit_destroyed(&mut self) {
            self.destroyed += 1;
        }
        fn formation_advance(&mut self) {}
    }

    impl Structures for Recorder {
        fn query_and_damage(&mut self, cell: Cell, _destroy_on_contact: bool) -> bool {
            self.queried.push(cell);
            if let Some(pos) = self.solid.iter().position(|c| *c == cell) {
                self.solid.remove(pos);
                true
            } else {
                false
            }
        }
    }

    impl PlayerView for Recorder {
        fn player_x(&self) -> i32 {
            self.player_x
        }
    }

    fn formation() -> (Formation, SwarmConfig) {
        let config = SwarmConfig::default();
        (Formation::new(&config), config)
    }

    #[test]
    fn test_hit_covers_two_by_two_block() {
        let (formation, _) = formation();
        // Unit 1 sits at offset (3, 0) -> absolute (5, 2)
        for cell in [Cell::new(5, 2), Cell::new(6, 2), Cell::new(5, 3), Cell::new(6, 3)] {
            assert_eq!(find_unit_at(&formation, cell), Some(1));
        }
        // Gap column between units
        assert_eq!(find_unit_at(&formation, Cell::new(7, 2)), None);
    }

    #[test]
    fn test_hit_rejects_above_and_left() {
        let (formation, _) = formation();
        assert_eq!(find_unit_at(&formation, Cell::new(1, 2)), None);
        assert_eq!(find_unit_at(&formation, Cell::new(2, 1)), None);
        assert_eq!(find_unit_at(&formation, Cell::new(-5, -5)), None);
    }

    #[test]
    fn test_projectile_hit_credits_score() {
        let (mut formation, _) = formation();
        let mut host = Recorder::default();

        let hit = resolve_projectile_hit(&mut formation, Cell::new(2, 2), &mut host).unwrap();

        assert_eq!(hit, ProjectileHit { unit: 0, points: 30 });
        assert_eq!(host.score, 30);
        assert_eq!(host.destroyed, 1);
        assert_eq!(formation.alive_count(), 54);
        assert_eq!(formation.unit(0).unwrap().status, UnitStatus::Exploding);
    }

    #[test]
    fn test_projectile_miss_mutates_nothing() {
        let (mut formation, _) = formation();
        formation.dirty = false;
        let mut host = Recorder::default();

        assert!(resolve_projectile_hit(&mut formation, Cell::new(39, 24), &mut host).is_none());
        assert_eq!(host.score, 0);
        assert_eq!(formation.alive_count(), 55);
        assert!(!formation.dirty);
    }

    #[test]
    fn test_dead_units_do_not_absorb() {
        let (mut formation, _) = formation();
        formation.explode(0);
        formation.units_mut()[0].status = UnitStatus::Dead;

        assert_eq!(find_unit_at(&formation, Cell::new(2, 2)), None);
    }

    #[test]
    fn test_structure_contact_destroys_unit() {
        let (mut formation, config) = formation();
        // Bottom row, first unit: offset (0, 8) -> absolute (2, 10)
        let mut host = Recorder {
            solid: vec![Cell::new(3, 11)],
            ..Recorder::default()
        };

        let crashes = resolve_structure_overlap(&mut formation, &config, &mut host);

        assert_eq!(crashes, vec![StructureCrash { unit: 44, cell: Cell::new(3, 11) }]);
        assert_eq!(formation.unit(44).unwrap().status, UnitStatus::Exploding);
        assert_eq!(formation.alive_count(), 54);
        // Contact is not a kill by the player
        assert_eq!(host.score, 0);
    }

    #[test]
    fn test_structure_checks_stop_after_first_contact() {
        let (mut formation, config) = formation();
        let mut host = Recorder {
            solid: vec![Cell::new(2, 2), Cell::new(3, 2)],
            ..Recorder::default()
        };

        resolve_structure_overlap(&mut formation, &config, &mut host);

        // Second cell of unit 0 never queried, so it survives
        assert_eq!(host.solid, vec![Cell::new(3, 2)]);
        assert_eq!(host.queried.iter().filter(|c| **c == Cell::new(3, 2)).count(), 0);
    }

    #[test]
    fn test_player_overlap_needs_danger_row() {
        let (mut formation, config) = formation();
        let player = Recorder { player_x: 24, ..Recorder::default() };

        assert_eq!(check_player_overlap(&formation, &config, &player), None);

        // Bottom row now at 12 + 10 = 22
        formation.origin = Cell::new(0, 14);
        assert_eq!(check_player_overlap(&formation, &config, &player), Some(44));
    }

    #[test]
    fn test_player_overlap_column_band() {
        let (mut formation, config) = formation();
        formation.origin = Cell::new(0, 14);

        // Player covers columns 18..=21; unit 50 sits at 18..=19
        let player = Recorder { player_x: 172, ..Recorder::default() };
        assert_eq!(check_player_overlap(&formation, &config, &player), Some(50));

        // Units 50 and 51 (21..=22) are the only ones in the band
        formation.explode(50);
        assert_eq!(check_player_overlap(&formation, &config, &player), Some(51));
        formation.explode(51);
        assert_eq!(check_player_overlap(&formation, &config, &player), None);
    }

    #[test]
    fn test_floor_only_counts_alive() {
        let (mut formation, config) = formation();
        formation.origin = Cell::new(2, 15);
        assert_eq!(check_floor(&formation, config.floor_row), Some(23));

        for index in 44..55 {
            formation.explode(index);
        }
        assert_eq!(check_floor(&formation, config.floor_row), None);
    }
}
