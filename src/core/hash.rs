//! State Hashing for Verification
//!
//! Deterministic hashing of formation state so two runs fed the same
//! calls can be compared tick for tick (replay checks, regression tests).

use sha2::{Sha256, Digest};
use super::grid::Cell;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for simulation state.
///
/// Wraps SHA-256 with helpers for grid types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for swarm state.
    pub fn for_swarm_state() -> Self {
        Self::new(b"INVADER_SWARM_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a grid cell.
    #[inline]
    pub fn update_cell(&mut self, cell: Cell) {
        self.update_i32(cell.col);
        self.update_i32(cell.row);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// Called by `SwarmController::compute_hash()`; the closure adds the
/// formation-specific data after the tick and level.
pub fn compute_state_hash<F>(tick: u32, level: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_swarm_state();

    // Always hash tick and level first
    hasher.update_u32(tick);
    hasher.update_u32(level);

    add_state(&mut hasher);

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_swarm_state();
            hasher.update_u32(100);
            hasher.update_cell(Cell::new(2, 2));
            hasher.update_i32(-1);
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash(100, 1, |hasher| {
            hasher.update_cell(Cell::new(4, 7));
        });
        let same = compute_state_hash(100, 1, |hasher| {
            hasher.update_cell(Cell::new(4, 7));
        });
        assert_eq!(hash, same);

        let later = compute_state_hash(101, 1, |hasher| {
            hasher.update_cell(Cell::new(4, 7));
        });
        assert_ne!(hash, later);

        let harder = compute_state_hash(100, 2, |hasher| {
            hasher.update_cell(Cell::new(4, 7));
        });
        assert_ne!(hash, harder);
    }
}
