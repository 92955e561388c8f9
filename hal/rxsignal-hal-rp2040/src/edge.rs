//! GPIO edge binding
//!
//! The RP2040 has one GPIO interrupt shared by every pin; Embassy turns it
//! into per-pin async edge waits. [`GpioEdgeBinding`] keeps, for each pin,
//! the callback most recently attached and the edge it is armed for. One
//! [`watch_edges`] loop per input pin waits for that edge, latches the
//! resulting level and invokes the callback.
//!
//! Run the watchers on an interrupt-priority executor so edge handling
//! preempts the main loop the way a pin-change ISR would.
//!
//! ```text
//! GPIO IRQ ──► watch_edges(pin) ──► latch level ──► EdgeCallback::invoke
//!                  ▲                                      │
//!                  └──────── armed mode ◄── attach ◄──────┘ (split mode)
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use embassy_rp::gpio::Input;
use portable_atomic::{AtomicU32, Ordering};
use rxsignal_hal::{EdgeCallback, EdgeMode, InputLevel, InterruptBinding, Level, PinId};

/// Number of user GPIOs on the RP2040
pub const NUM_GPIO: usize = 30;

#[derive(Clone, Copy)]
struct Armed {
    callback: EdgeCallback,
    mode: EdgeMode,
}

/// Edge interrupt binding and level reader for RP2040 GPIOs
pub struct GpioEdgeBinding {
    armed: [Mutex<Cell<Option<Armed>>>; NUM_GPIO],
    /// Bit n holds the level GPIO n had at its last edge
    levels: AtomicU32,
}

impl Default for GpioEdgeBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioEdgeBinding {
    /// Create a binding with nothing armed and every level low
    pub const fn new() -> Self {
        Self {
            armed: [const { Mutex::new(Cell::new(None)) }; NUM_GPIO],
            levels: AtomicU32::new(0),
        }
    }

    /// Edge the pin is currently armed for
    pub fn armed_mode(&self, pin: PinId) -> Option<EdgeMode> {
        self.armed(pin).map(|a| a.mode)
    }

    /// Record an edge on `pin` and run its callback
    ///
    /// The level is latched before the callback runs so a combined-mode
    /// handler reads the level that caused the edge. A callback armed
    /// for the other direction is not invoked.
    pub fn dispatch(&self, pin: PinId, level: Level) {
        self.latch(pin, level);

        let Some(armed) = self.armed(pin) else {
            return;
        };
        let fires = match armed.mode {
            EdgeMode::Either => true,
            EdgeMode::Rising => level.is_high(),
            EdgeMode::Falling => level.is_low(),
        };
        if fires {
            armed.callback.invoke();
        }
    }

    /// Record the level of `pin` without running any callback
    pub fn latch(&self, pin: PinId, level: Level) {
        if pin as usize >= NUM_GPIO {
            return;
        }

        let bit = 1u32 << pin;
        if level.is_high() {
            self.levels.fetch_or(bit, Ordering::AcqRel);
        } else {
            self.levels.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    fn armed(&self, pin: PinId) -> Option<Armed> {
        let slot = self.armed.get(pin as usize)?;
        critical_section::with(|cs| slot.borrow(cs).get())
    }
}

impl InterruptBinding for GpioEdgeBinding {
    fn attach(&self, pin: PinId, callback: EdgeCallback, mode: EdgeMode) {
        if let Some(slot) = self.armed.get(pin as usize) {
            critical_section::with(|cs| slot.borrow(cs).set(Some(Armed { callback, mode })));
        }
    }
}

impl InputLevel for GpioEdgeBinding {
    fn read_level(&self, pin: PinId) -> Level {
        if pin as usize >= NUM_GPIO {
            return Level::Low;
        }
        Level::from(self.levels.load(Ordering::Acquire) & (1 << pin) != 0)
    }
}

/// Feed edges on `input` (GPIO `pin`) into `binding` forever
///
/// Re-reads the armed edge before every wait, so a split-mode handler
/// that re-arms for the opposite edge takes effect on the next iteration.
/// Until something is attached the loop waits for any edge and only
/// latches the level.
pub async fn watch_edges(binding: &GpioEdgeBinding, input: &mut Input<'_>, pin: PinId) -> ! {
    binding.latch(pin, Level::from(input.is_high()));

    loop {
        let level = match binding.armed_mode(pin) {
            Some(EdgeMode::Rising) => {
                input.wait_for_rising_edge().await;
                Level::High
            }
            Some(EdgeMode::Falling) => {
                input.wait_for_falling_edge().await;
                Level::Low
            }
            Some(EdgeMode::Either) | None => {
                input.wait_for_any_edge().await;
                Level::from(input.is_high())
            }
        };

        binding.dispatch(pin, level);
    }
}
