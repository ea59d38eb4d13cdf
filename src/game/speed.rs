//! Advance Speed Model
//!
//! Converts survivors and difficulty into the number of frames between
//! formation steps. Fewer survivors means a faster march, and each level
//! shaves a little more off. The curve shape is tuning; the guarantees are
//! the floor of [`MIN_DELAY`] and monotonic escalation.

use serde::{Serialize, Deserialize};

/// The formation never steps more than once every two frames.
pub const MIN_DELAY: u32 = 2;

/// Frames per step indexed by (clamped survivors - level bias).
const DELAY_TABLE: [u8; 57] = [
    2, 2, 2, 3, 3, 4, 4, 5, 5, 6,
    6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12,
    13, 13, 14, 14, 15, 16, 17, 18, 19, 20, 21, 22,
    24, 26, 28, 29, 30, 30, 31, 32, 33, 34, 35, 36,
    37, 38, 39, 40, 41, 42, 43, 44, 45, 56,
];

/// Highest survivor count the table distinguishes.
pub const TABLE_MAX_SURVIVORS: u32 = DELAY_TABLE.len() as u32 - 1;

/// Shape of the escalation curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedCurve {
    /// Step table lookup (default)
    #[default]
    Table,
    /// One frame per survivor, minus the level bias
    Linear,
}

impl SpeedCurve {
    /// Compute frames between steps.
    ///
    /// `level` starts at 1; level 1 applies no bias.
    pub fn compute_delay(self, alive_count: u32, level: u32) -> u32 {
        let survivors = alive_count.min(TABLE_MAX_SURVIVORS);
        let bias = level.saturating_sub(1);

        let delay = match self {
            SpeedCurve::Table => {
                let index = survivors.saturating_sub(bias) as usize;
                DELAY_TABLE[index] as u32
            }
            SpeedCurve::Linear => (survivors + 1).saturating_sub(bias),
        };

        delay.max(MIN_DELAY)
    }
}
