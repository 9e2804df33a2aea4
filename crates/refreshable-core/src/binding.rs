//! Shared observable values written by the controller and read elsewhere.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A shared `f32` the refresh controller mirrors its pull offset into.
///
/// Clones share the same cell, so a caller can hold one end while the
/// wrapper writes the other every tick. Reads never block.
#[derive(Clone, Default)]
pub struct ContentOffset {
    bits: Arc<AtomicU32>,
}

impl ContentOffset {
    /// Create a cell holding `value`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Overwrite the value.
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Whether `other` is the same cell.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bits, &other.bits)
    }
}

impl fmt::Debug for ContentOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentOffset").field(&self.get()).finish()
    }
}
