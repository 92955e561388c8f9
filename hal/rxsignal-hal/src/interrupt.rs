//! Edge interrupt abstractions
//!
//! The platform owns the interrupt controller; the capture core only asks
//! it to deliver the next edge of a given direction to a callback.
//!
//! A callback is a `'static` listener plus the edge mode it was registered
//! for. Listeners are long-lived objects (one per receiver channel), so a
//! callback is two words and can be copied into interrupt tables freely.

use core::fmt;

use crate::gpio::PinId;

/// Which transition(s) of a pin should trigger the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeMode {
    /// Low to high transition
    Rising,
    /// High to low transition
    Falling,
    /// Any transition
    Either,
}

impl EdgeMode {
    /// The edge to arm after this one in split capture
    ///
    /// `Either` has no opposite and maps to itself.
    pub const fn opposite(self) -> Self {
        match self {
            EdgeMode::Rising => EdgeMode::Falling,
            EdgeMode::Falling => EdgeMode::Rising,
            EdgeMode::Either => EdgeMode::Either,
        }
    }
}

/// Receiver of edge notifications
///
/// `on_edge` runs in interrupt context. Implementations must return
/// quickly and must not block.
pub trait EdgeListener: Sync {
    /// Handle an edge delivered for a callback registered with `trigger`
    fn on_edge(&self, trigger: EdgeMode);
}

/// A listener bound to the edge mode it handles
#[derive(Clone, Copy)]
pub struct EdgeCallback {
    listener: &'static dyn EdgeListener,
    trigger: EdgeMode,
}

impl EdgeCallback {
    /// Bind `listener` as the handler for `trigger` edges
    pub const fn new(listener: &'static dyn EdgeListener, trigger: EdgeMode) -> Self {
        Self { listener, trigger }
    }

    /// The edge mode this callback handles
    pub const fn trigger(&self) -> EdgeMode {
        self.trigger
    }

    /// Deliver an edge to the listener
    pub fn invoke(&self) {
        self.listener.on_edge(self.trigger);
    }

    /// Check if both callbacks notify the same listener object
    pub fn same_listener(&self, other: &EdgeCallback) -> bool {
        core::ptr::eq(
            self.listener as *const dyn EdgeListener as *const u8,
            other.listener as *const dyn EdgeListener as *const u8,
        )
    }
}

impl PartialEq for EdgeCallback {
    fn eq(&self, other: &Self) -> bool {
        self.trigger == other.trigger && self.same_listener(other)
    }
}

impl fmt::Debug for EdgeCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeCallback")
            .field("listener", &(self.listener as *const dyn EdgeListener as *const u8))
            .field("trigger", &self.trigger)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EdgeCallback {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "EdgeCallback({})", self.trigger)
    }
}

/// Edge interrupt registration
///
/// `attach` arms the trigger for `pin`, replacing whatever callback and
/// mode were previously armed on it. Split capture calls this from inside
/// the handler to swap between rising and falling, so implementations
/// must be callable from interrupt context.
pub trait InterruptBinding: Sync {
    /// Arm `mode` edges on `pin` to invoke `callback`
    fn attach(&self, pin: PinId, callback: EdgeCallback, mode: EdgeMode);
}
