//! Process-wide z-index counter
//!
//! New components take the next value so that they draw above everything
//! created before them. The counter only moves forward, so a value is never
//! handed out twice, even across undo/redo.

use std::sync::atomic::{AtomicI64, Ordering};

static Z_INDEX_COUNTER: AtomicI64 = AtomicI64::new(0);

/// Largest z-index a component may hold (2^53, the largest integer a JSON
/// number carries exactly)
pub const MAX_Z_INDEX: i64 = 1 << 53;

/// Smallest z-index a component may hold
pub const MIN_Z_INDEX: i64 = -MAX_Z_INDEX;

/// Bring a z-index read from outside into `MIN_Z_INDEX..=MAX_Z_INDEX`
pub fn clamp_z_index(z_index: i64) -> i64 {
    z_index.clamp(MIN_Z_INDEX, MAX_Z_INDEX)
}

/// Take the next (topmost) z-index
pub fn next_z_index() -> i64 {
    match Z_INDEX_COUNTER.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |z| z.checked_add(1)) {
        Ok(z) | Err(z) => z,
    }
}

/// Make sure later calls to [`next_z_index`] return values above `z_index`
pub fn reserve_z_index(z_index: i64) {
    Z_INDEX_COUNTER.fetch_max(clamp_z_index(z_index) + 1, Ordering::Relaxed);
}

/// The value the next call to [`next_z_index`] would return
pub fn peek_next_z_index() -> i64 {
    Z_INDEX_COUNTER.load(Ordering::Relaxed)
}
