//! Millisecond tick counter for bare-metal builds.
//!
//! The SysTick handler is the only writer; everything else reads. On the Cortex-M33 an
//! aligned 32-bit load/store is single-copy atomic, so no lock is needed.
//!
//! The counter wraps to zero after `u32::MAX` ticks (about 49.7 days at 1 kHz). Callers
//! that measure intervals should use [`TickClock::elapsed_since`], which is correct
//! across one wrap.

use core::sync::atomic::{AtomicU32, Ordering};

pub struct TickClock {
    ticks: AtomicU32,
}

impl TickClock {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Clock whose counter starts at `ticks` instead of zero.
    pub const fn starting_at(ticks: u32) -> Self {
        Self {
            ticks: AtomicU32::new(ticks),
        }
    }

    /// Advance by one tick. Call only from the tick interrupt.
    #[inline]
    pub fn on_tick(&self) {
        // Load/store rather than fetch_add: single writer, and no LDREX/STREX in the ISR
        let now = self.ticks.load(Ordering::Relaxed);
        self.ticks.store(now.wrapping_add(1), Ordering::Relaxed);
    }

    /// Ticks since the timer was started.
    #[inline]
    pub fn millis(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Ticks elapsed since `start`, tolerating a single counter wrap.
    #[inline]
    pub fn elapsed_since(&self, start: u32) -> u32 {
        self.millis().wrapping_sub(start)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The counter driven by the SysTick exception.
pub static SYSTEM_TICKS: TickClock = TickClock::new();
