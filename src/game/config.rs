//! Swarm Configuration
//!
//! Geometry, thresholds and tuning knobs for one formation. Defaults
//! reproduce the classic 5 x 11 board on a 40 x 25 text grid.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::grid::PixelGeometry;
use crate::game::speed::SpeedCurve;
use crate::game::state::{UNIT_HEIGHT, UNIT_WIDTH};

/// Number of unit kinds (visual / scoring tiers).
pub const KIND_COUNT: usize = 3;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Zero rows or columns
    #[error("formation must have at least one row and one column")]
    EmptyFormation,

    /// Edge thresholds out of order
    #[error("left edge {left} must be below right edge {right}")]
    EdgesInverted { left: i32, right: i32 },

    /// Units would overlap their neighbours
    #[error("spacing {column_spacing} x {row_spacing} is tighter than a {width} x {height} unit")]
    SpacingTooTight {
        column_spacing: i32,
        row_spacing: i32,
        width: i32,
        height: i32,
    },

    /// Drops must move the formation down
    #[error("drop of {drop_rows} rows must be at least one")]
    NonPositiveDrop { drop_rows: i32 },

    /// Explosion would never advance
    #[error("explosion speed must be at least one tick")]
    ZeroExplosionSpeed,

    /// Explosion with no stages
    #[error("explosion needs at least one stage")]
    ZeroExplosionStages,

    /// Floor off the board
    #[error("floor row {floor} lies outside a playfield of {rows} rows")]
    FloorOutsidePlayfield { floor: i32, rows: i32 },

    /// Full formation cannot fit the playfield
    #[error("formation is {width} columns wide but the playfield has {cols}")]
    FormationTooWide { width: i32, cols: i32 },
}

/// Configuration for a swarm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Formation rows
    pub rows: u32,
    /// Units per row
    pub columns: u32,
    /// Horizontal distance between neighbouring units (cells)
    pub column_spacing: i32,
    /// Vertical distance between neighbouring rows (cells)
    pub row_spacing: i32,
    /// Origin column at the start of a round
    pub start_col: i32,
    /// Origin row at the start of a round
    pub start_row: i32,
    /// Frames before the first step after `init()`
    pub initial_delay: u32,
    /// Leftmost column a unit may reach before the formation drops
    pub left_edge: i32,
    /// Rightmost column a unit may reach before the formation drops
    pub right_edge: i32,
    /// Rows descended per drop
    pub drop_rows: i32,
    /// A unit at or below this row ends the game
    pub floor_row: i32,
    /// A unit at or below this row can collide with the player
    pub player_hit_row: i32,
    /// Render clamp (columns)
    pub playfield_cols: i32,
    /// Render clamp (rows)
    pub playfield_rows: i32,
    /// Animator ticks spent on each explosion stage
    pub explosion_speed: u32,
    /// Number of explosion stages before a unit is gone
    pub explosion_stages: u32,
    /// Advance-speed curve
    pub speed_curve: SpeedCurve,
    /// Pixel <-> cell mapping for sprites
    pub pixels: PixelGeometry,
    /// Player sprite width in pixels
    pub player_width_px: i32,
    /// Score per kind (top, middle, bottom)
    pub score_values: [u32; KIND_COUNT],
    /// Colour per formation row (wraps for taller formations)
    pub row_colors: Vec<u8>,
    /// Session seed for shooter selection
    pub rng_seed: u64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 11,
            column_spacing: 3,
            row_spacing: 2,
            start_col: 2,
            start_row: 2,
            initial_delay: 20,
            left_edge: 0,
            right_edge: 38,
            drop_rows: 1,
            floor_row: 23,
            player_hit_row: 22,
            playfield_cols: 40,
            playfield_rows: 25,
            explosion_speed: 4,
            explosion_stages: 4,
            speed_curve: SpeedCurve::Table,
            pixels: PixelGeometry::default(),
            player_width_px: 24,
            score_values: [30, 20, 10],
            // light red, yellow, green, purple, cyan
            row_colors: vec![10, 7, 5, 4, 3],
            rng_seed: 0x5EED,
        }
    }
}

impl SwarmConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SwarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyFormation);
        }
        if self.left_edge >= self.right_edge {
            return Err(ConfigError::EdgesInverted {
                left: self.left_edge,
                right: self.right_edge,
            });
        }
        if self.column_spacing < UNIT_WIDTH || self.row_spacing < UNIT_HEIGHT {
            return Err(ConfigError::SpacingTooTight {
                column_spacing: self.column_spacing,
                row_spacing: self.row_spacing,
                width: UNIT_WIDTH,
                height: UNIT_HEIGHT,
            });
        }
        if self.drop_rows <= 0 {
            return Err(ConfigError::NonPositiveDrop { drop_rows: self.drop_rows });
        }
        if self.explosion_speed == 0 {
            return Err(ConfigError::ZeroExplosionSpeed);
        }
        if self.explosion_stages == 0 {
            return Err(ConfigError::ZeroExplosionStages);
        }
        if self.floor_row <= 0 || self.floor_row > self.playfield_rows {
            return Err(ConfigError::FloorOutsidePlayfield {
                floor: self.floor_row,
                rows: self.playfield_rows,
            });
        }
        let width = self.formation_width();
        if width > self.playfield_cols {
            return Err(ConfigError::FormationTooWide {
                width,
                cols: self.playfield_cols,
            });
        }
        Ok(())
    }

    /// Total number of units.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Width of the full-strength formation in cells.
    pub fn formation_width(&self) -> i32 {
        (self.columns as i32 - 1) * self.column_spacing + UNIT_WIDTH
    }

    /// Colour for a formation row.
    pub fn row_color(&self, row: u32) -> u8 {
        if self.row_colors.is_empty() {
            return 1;
        }
        self.row_colors[row as usize % self.row_colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SwarmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unit_count(), 55);
        assert_eq!(config.formation_width(), 32);
    }

    #[test]
    fn test_rejects_empty_formation() {
        let config = SwarmConfig { rows: 0, ..SwarmConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyFormation)));
    }

    #[test]
    fn test_rejects_inverted_edges() {
        let config = SwarmConfig { left_edge: 30, right_edge: 10, ..SwarmConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EdgesInverted { left: 30, right: 10 })
        ));
    }

    #[test]
    fn test_rejects_zero_explosion() {
        let config = SwarmConfig { explosion_speed: 0, ..SwarmConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroExplosionSpeed)));

        let config = SwarmConfig { explosion_stages: 0, ..SwarmConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroExplosionStages)));
    }

    #[test]
    fn test_rejects_overlapping_spacing() {
        for (column_spacing, row_spacing) in [(0, 2), (-3, 2), (1, 2), (3, 0), (3, 1)] {
            let config = SwarmConfig { column_spacing, row_spacing, ..SwarmConfig::default() };
            assert!(
                matches!(config.validate(), Err(ConfigError::SpacingTooTight { .. })),
                "accepted {column_spacing} x {row_spacing}"
            );
        }

        // Touching but not overlapping is fine
        let config = SwarmConfig { column_spacing: 2, row_spacing: 2, ..SwarmConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_drop() {
        for drop_rows in [0, -1] {
            let config = SwarmConfig { drop_rows, ..SwarmConfig::default() };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositiveDrop { drop_rows: d }) if d == drop_rows
            ));
        }
        assert!(SwarmConfig::from_json_str(r#"{ "drop_rows": 0 }"#).is_err());
    }

    #[test]
    fn test_rejects_wide_formation() {
        let config = SwarmConfig { columns: 20, ..SwarmConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::FormationTooWide { .. })));
    }

    #[test]
    fn test_json_partial_override() {
        let config = SwarmConfig::from_json_str(r#"{ "rows": 2, "speed_curve": "Linear" }"#).unwrap();
        assert_eq!(config.rows, 2);
        assert_eq!(config.columns, 11);
        assert_eq!(config.speed_curve, SpeedCurve::Linear);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            SwarmConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SwarmConfig::from_json_str(r#"{ "columns": 0 }"#),
            Err(ConfigError::EmptyFormation)
        ));
    }

    #[test]
    fn test_row_colors_wrap() {
        let config = SwarmConfig::default();
        assert_eq!(config.row_color(0), 10);
        assert_eq!(config.row_color(5), 10);
    }
}
