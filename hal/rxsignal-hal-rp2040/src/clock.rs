//! Capture clocks
//!
//! Both counters come from the Embassy time driver (the RP2040 TIMER
//! peripheral) and wrap at 32 bits.

use embassy_time::Instant;
use rxsignal_hal::TickCounter;

/// Free-running microsecond clock (the built-in time source)
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemMicros;

impl TickCounter for SystemMicros {
    fn now(&self) -> u32 {
        Instant::now().as_micros() as u32
    }
}

/// Raw Embassy ticks, for use as an external time source
///
/// Ticks run at [`embassy_time::TICK_HZ`]; pair with a multiplier/divisor
/// that converts them to microseconds (see [`EmbassyTicks::micros_scale`]).
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyTicks;

impl EmbassyTicks {
    /// Tick rate in Hz
    pub const fn tick_hz() -> u64 {
        embassy_time::TICK_HZ
    }

    /// `(multiplier, divisor)` converting ticks to microseconds
    pub const fn micros_scale() -> (u32, u32) {
        if embassy_time::TICK_HZ >= 1_000_000 {
            (1, (embassy_time::TICK_HZ / 1_000_000) as u32)
        } else {
            ((1_000_000 / embassy_time::TICK_HZ) as u32, 1)
        }
    }
}

impl TickCounter for EmbassyTicks {
    fn now(&self) -> u32 {
        Instant::now().as_ticks() as u32
    }
}
