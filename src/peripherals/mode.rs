//! Bring-up mode: bare-metal super-loop or scheduler-driven.
//!
//! The mode is a value of a sealed type picked at build time through [`ActiveMode`]. Each
//! mode configures the time base its own way; nothing re-checks the mode at runtime.

use crate::config::BoardConfig;
use crate::peripherals::tick::TickClock;
use crate::soc::Soc;

mod sealed {
    pub trait Sealed {}
}

/// How the board gets its time base.
pub trait BringupMode: sealed::Sealed {
    const NAME: &'static str;

    /// Step 2 of bring-up.
    fn configure_time_base<S: Soc>(&self, soc: &mut S, config: &BoardConfig);
}

/// No OS: SysTick drives a millisecond counter.
pub struct BareMetal {
    ticks: &'static TickClock,
}

impl BareMetal {
    /// `ticks` must be the counter the SysTick handler advances.
    pub const fn new(ticks: &'static TickClock) -> Self {
        Self { ticks }
    }

    #[inline]
    pub fn ticks(&self) -> &'static TickClock {
        self.ticks
    }
}

impl sealed::Sealed for BareMetal {}

impl BringupMode for BareMetal {
    const NAME: &'static str = "bare-metal";

    fn configure_time_base<S: Soc>(&self, soc: &mut S, config: &BoardConfig) {
        let ticks = soc.core_clock_hz() / config.core.tick_hz;
        debug!("SysTick: {} cycles per tick", ticks);
        soc.start_tick_timer(ticks);
    }
}

/// A scheduler owns time-keeping. The USB interrupt must stay at or below the scheduler's
/// syscall ceiling so the stack may call into the scheduler from its handler.
pub struct Rtos;

impl sealed::Sealed for Rtos {}

impl BringupMode for Rtos {
    const NAME: &'static str = "rtos";

    fn configure_time_base<S: Soc>(&self, soc: &mut S, config: &BoardConfig) {
        // Smaller value is higher priority; pass the ceiling through untouched
        soc.set_irq_priority(config.usb.irq, config.core.max_syscall_priority);
    }
}

/// Mode selected by the `rtos` cargo feature.
#[cfg(not(feature = "rtos"))]
pub type ActiveMode = BareMetal;
/// Mode selected by the `rtos` cargo feature.
#[cfg(feature = "rtos")]
pub type ActiveMode = Rtos;
