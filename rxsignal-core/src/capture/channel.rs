//! Receiver channel edge capture
//!
//! One [`ReceiverChannel`] watches one receiver output (throttle, steering,
//! ...). The platform delivers pin edges through the callbacks registered
//! at [`setup`](ReceiverChannel::setup); each falling edge closes a pulse
//! and commits its width to the channel's [`PulseCell`].
//!
//! # Capture modes
//!
//! - [`CaptureMode::Combined`]: a single callback armed for either edge.
//!   The handler reads the latched pin level to tell rising from falling.
//! - [`CaptureMode::Split`]: one callback per direction. Every handler
//!   re-arms the binding for the opposite edge before returning, even if
//!   the pulse it just measured is implausible, so no transition is lost.
//!
//! # State machine
//!
//! ```text
//!  Unconfigured ──setup──► ArmedForRising ──rising──► ArmedForFalling
//!                                ▲                          │
//!                                └────────falling───────────┘
//! ```
//!
//! While the [`CaptureContext`] has no interrupt binding, `setup` and all
//! edge handlers return without touching any state.

use core::cell::Cell;

use critical_section::Mutex;
use rxsignal_hal::{EdgeCallback, EdgeListener, EdgeMode, PinId};

use super::cell::{PulseCell, UNKNOWN_PULSE_WIDTH};
use crate::calibration::{device_signal_value, generic_signal_value, SignalValue, TxRxCombo};
use crate::context::{Bound, CaptureContext};

/// How a channel is notified of edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CaptureMode {
    /// One callback on either edge, direction read from the pin level
    #[default]
    Combined,
    /// Separate rising and falling callbacks, re-armed alternately
    Split,
}

/// Edge capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureState {
    /// No pin or callbacks registered yet
    Unconfigured,
    /// Waiting for the start of a pulse
    ArmedForRising,
    /// Pulse in progress, waiting for its end
    ArmedForFalling,
}

/// Callbacks registered with the interrupt binding
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Callbacks {
    /// Single either-edge callback
    Combined(EdgeCallback),
    /// One callback per edge direction
    Split {
        /// Armed while waiting for a pulse to start
        rising: EdgeCallback,
        /// Armed while a pulse is in progress
        falling: EdgeCallback,
    },
}

impl Callbacks {
    /// Callback and edge mode armed by `setup`
    pub fn initial(&self) -> (EdgeCallback, EdgeMode) {
        match *self {
            Callbacks::Combined(changed) => (changed, EdgeMode::Either),
            Callbacks::Split { rising, .. } => (rising, EdgeMode::Rising),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    pin: PinId,
    callbacks: Callbacks,
}

#[derive(Debug, Clone, Copy)]
struct Edges {
    rising: u32,
    falling: u32,
    state: CaptureState,
}

/// Pulse width capture for one receiver output
///
/// Channels live for the whole program (`&'static`), since the interrupt
/// binding keeps references to them. Everything the edge handlers mutate
/// sits behind a `critical_section::Mutex`, so a channel can be shared
/// between interrupt and thread context by plain reference.
pub struct ReceiverChannel {
    ctx: &'static CaptureContext,
    mode: CaptureMode,
    binding: Mutex<Cell<Option<Binding>>>,
    edges: Mutex<Cell<Edges>>,
    pulse: PulseCell,
}

impl ReceiverChannel {
    /// Create an unconfigured channel
    pub const fn new(ctx: &'static CaptureContext, mode: CaptureMode) -> Self {
        Self {
            ctx,
            mode,
            binding: Mutex::new(Cell::new(None)),
            edges: Mutex::new(Cell::new(Edges {
                rising: 0,
                falling: 0,
                state: CaptureState::Unconfigured,
            })),
            pulse: PulseCell::new(),
        }
    }

    /// Bind the channel to `pin` and arm the first edge
    ///
    /// Registers this channel's callbacks with the context's interrupt
    /// binding (either-edge in combined mode, rising in split mode) and
    /// returns them. Returns `None` and leaves the channel unconfigured if
    /// the context has no interrupt binding.
    ///
    /// Calling `setup` again moves the channel to a new pin; the previous
    /// pin stays armed in the binding until the platform detaches it.
    pub fn setup(&'static self, pin: PinId) -> Option<Callbacks> {
        let bound = self.ctx.bound()?;

        let callbacks = match self.mode {
            CaptureMode::Combined => Callbacks::Combined(EdgeCallback::new(self, EdgeMode::Either)),
            CaptureMode::Split => Callbacks::Split {
                rising: EdgeCallback::new(self, EdgeMode::Rising),
                falling: EdgeCallback::new(self, EdgeMode::Falling),
            },
        };

        critical_section::with(|cs| {
            self.binding.borrow(cs).set(Some(Binding { pin, callbacks }));
            let edges = self.edges.borrow(cs);
            edges.set(Edges {
                state: CaptureState::ArmedForRising,
                ..edges.get()
            });
        });

        let (callback, mode) = callbacks.initial();
        bound.interrupts.attach(pin, callback, mode);

        Some(callbacks)
    }

    /// Either-edge handler (combined mode)
    pub fn on_pin_changed(&self) {
        let Some((bound, binding)) = self.armed() else {
            return;
        };

        if bound.levels.is_high(binding.pin) {
            self.record_rising();
        } else {
            self.record_falling();
        }
    }

    /// Rising-edge handler (split mode)
    pub fn on_pin_rising(&self) {
        let Some((bound, binding)) = self.armed() else {
            return;
        };

        self.record_rising();

        if let Callbacks::Split { falling, .. } = binding.callbacks {
            bound.interrupts.attach(binding.pin, falling, EdgeMode::Rising.opposite());
        }
    }

    /// Falling-edge handler (split mode)
    pub fn on_pin_falling(&self) {
        let Some((bound, binding)) = self.armed() else {
            return;
        };

        self.record_falling();

        if let Callbacks::Split { rising, .. } = binding.callbacks {
            bound.interrupts.attach(binding.pin, rising, EdgeMode::Falling.opposite());
        }
    }

    /// Latest pulse width in microseconds; clears the changed flag
    ///
    /// Returns [`UNKNOWN_PULSE_WIDTH`](super::UNKNOWN_PULSE_WIDTH) until
    /// the first complete pulse has been captured.
    ///
    /// `has_changed()` followed by `pulse_width()` is two separate reads:
    /// a pulse captured in between is returned here, and its changed flag
    /// is cleared without `has_changed()` having reported it. Use
    /// [`take_if_changed`](Self::take_if_changed) when that matters.
    pub fn pulse_width(&self) -> u32 {
        self.pulse.snapshot()
    }

    /// Check if the pulse width changed since the last `pulse_width()`
    pub fn has_changed(&self) -> bool {
        self.pulse.has_changed()
    }

    /// Latest pulse width if it changed since the last read
    pub fn take_if_changed(&self) -> Option<u32> {
        self.pulse.take_if_changed()
    }

    /// Calibrated stick position using the generic linear model
    ///
    /// Reads (and clears) the pulse width, then calibrates outside the
    /// critical section.
    pub fn signal_value(&self) -> SignalValue {
        generic_signal_value(self.pulse_width())
    }

    /// Calibrated stick position for a known transmitter/receiver pair
    pub fn device_signal_value(&self, combo: TxRxCombo) -> SignalValue {
        device_signal_value(combo, self.pulse_width())
    }

    /// Calibrated stick position, or `None` before the first complete pulse
    ///
    /// Clears the changed flag like [`pulse_width`](Self::pulse_width).
    /// [`device_signal_value`](Self::device_signal_value) maps the
    /// unknown-width sentinel to full deflection; this one does not.
    pub fn captured_signal_value(&self, combo: TxRxCombo) -> Option<SignalValue> {
        let width = self.pulse_width();
        if width == UNKNOWN_PULSE_WIDTH {
            return None;
        }
        Some(device_signal_value(combo, width))
    }

    /// Capture mode chosen at construction
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Bound pin, if `setup` succeeded
    pub fn pin(&self) -> Option<PinId> {
        self.binding().map(|b| b.pin)
    }

    /// Callbacks registered by `setup`
    pub fn callbacks(&self) -> Option<Callbacks> {
        self.binding().map(|b| b.callbacks)
    }

    /// Check if the channel has been set up
    pub fn is_configured(&self) -> bool {
        self.binding().is_some()
    }

    /// Current state of the edge state machine
    pub fn state(&self) -> CaptureState {
        self.edges().state
    }

    /// Raw timestamp of the last rising edge
    pub fn rising_timestamp(&self) -> u32 {
        self.edges().rising
    }

    /// Raw timestamp of the last falling edge
    pub fn falling_timestamp(&self) -> u32 {
        self.edges().falling
    }

    fn binding(&self) -> Option<Binding> {
        critical_section::with(|cs| self.binding.borrow(cs).get())
    }

    fn edges(&self) -> Edges {
        critical_section::with(|cs| self.edges.borrow(cs).get())
    }

    /// Capabilities and pin binding, or `None` if either is missing
    fn armed(&self) -> Option<(Bound<'static>, Binding)> {
        let bound = self.ctx.bound()?;
        let binding = self.binding()?;
        Some((bound, binding))
    }

    fn record_rising(&self) {
        let now = self.ctx.time().now();
        critical_section::with(|cs| {
            let edges = self.edges.borrow(cs);
            edges.set(Edges {
                rising: now,
                state: CaptureState::ArmedForFalling,
                ..edges.get()
            });
        });
    }

    fn record_falling(&self) {
        let time = self.ctx.time();
        let now = time.now();
        let rising = critical_section::with(|cs| {
            let edges = self.edges.borrow(cs);
            let current = edges.get();
            edges.set(Edges {
                falling: now,
                state: CaptureState::ArmedForRising,
                ..current
            });
            current.rising
        });

        self.pulse.commit(time.elapsed_micros(rising, now));
    }
}

impl EdgeListener for ReceiverChannel {
    fn on_edge(&self, trigger: EdgeMode) {
        match trigger {
            EdgeMode::Either => self.on_pin_changed(),
            EdgeMode::Rising => self.on_pin_rising(),
            EdgeMode::Falling => self.on_pin_falling(),
        }
    }
}
