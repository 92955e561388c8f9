//! Capture context
//!
//! Holds the platform capabilities shared by every receiver channel: the
//! edge interrupt binding, the pin level reader and the time source.
//!
//! The context is assembled once at start-up and then handed out by
//! `&'static` reference, so it cannot change while channels are capturing.
//! Leaving the interrupt capabilities out produces an unbound context in
//! which channel setup and every edge handler silently do nothing.

use core::fmt;

use rxsignal_hal::{InputLevel, InterruptBinding, TickCounter};

use crate::time::{ScaleError, TimeSource};

/// Capabilities consumed by the edge capture state machine
#[derive(Clone, Copy)]
pub struct CaptureContext {
    interrupts: Option<&'static dyn InterruptBinding>,
    levels: Option<&'static dyn InputLevel>,
    time: TimeSource,
}

/// Interrupt capabilities, available only once both are registered
#[derive(Clone, Copy)]
pub(crate) struct Bound<'a> {
    pub interrupts: &'a dyn InterruptBinding,
    pub levels: &'a dyn InputLevel,
}

impl CaptureContext {
    /// Create an unbound context timed by the platform microsecond clock
    pub const fn new(clock: &'static dyn TickCounter) -> Self {
        Self {
            interrupts: None,
            levels: None,
            time: TimeSource::builtin(clock),
        }
    }

    /// Register the interrupt binding and pin level reader
    pub const fn with_interrupts(
        mut self,
        interrupts: &'static dyn InterruptBinding,
        levels: &'static dyn InputLevel,
    ) -> Self {
        self.interrupts = Some(interrupts);
        self.levels = Some(levels);
        self
    }

    /// Replace the built-in clock with an external tick counter
    pub fn with_external_counter(
        mut self,
        counter: &'static dyn TickCounter,
        multiplier: u32,
        divisor: u32,
    ) -> Result<Self, ScaleError> {
        self.time = TimeSource::external(counter, multiplier, divisor)?;
        Ok(self)
    }

    /// Replace the time source wholesale
    pub const fn with_time_source(mut self, time: TimeSource) -> Self {
        self.time = time;
        self
    }

    /// Check if both interrupt capabilities are registered
    pub fn is_bound(&self) -> bool {
        self.interrupts.is_some() && self.levels.is_some()
    }

    /// The time source used for edge timestamps
    pub fn time(&self) -> &TimeSource {
        &self.time
    }

    /// Interrupt capabilities, or `None` while the context is unbound
    pub(crate) fn bound(&self) -> Option<Bound<'_>> {
        match (self.interrupts, self.levels) {
            (Some(interrupts), Some(levels)) => Some(Bound { interrupts, levels }),
            _ => None,
        }
    }
}

impl fmt::Debug for CaptureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureContext")
            .field("bound", &self.is_bound())
            .field("time", &self.time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxsignal_hal::{CounterFn, EdgeCallback, EdgeMode, Level, PinId};

    struct NullBinding;

    impl InterruptBinding for NullBinding {
        fn attach(&self, _pin: PinId, _callback: EdgeCallback, _mode: EdgeMode) {}
    }

    impl InputLevel for NullBinding {
        fn read_level(&self, _pin: PinId) -> Level {
            Level::Low
        }
    }

    fn zero() -> u32 {
        0
    }

    static CLOCK: CounterFn = CounterFn(zero);
    static NULL: NullBinding = NullBinding;

    #[test]
    fn test_new_context_is_unbound() {
        let ctx = CaptureContext::new(&CLOCK);
        assert!(!ctx.is_bound());
        assert!(ctx.bound().is_none());
        assert!(!ctx.time().is_external());
    }

    #[test]
    fn test_with_interrupts_binds() {
        let ctx = CaptureContext::new(&CLOCK).with_interrupts(&NULL, &NULL);
        assert!(ctx.is_bound());
        assert!(ctx.bound().is_some());
    }

    #[test]
    fn test_external_counter_scale() {
        let ctx = CaptureContext::new(&CLOCK)
            .with_external_counter(&CLOCK, 4, 1)
            .unwrap();
        assert!(ctx.time().is_external());
        assert_eq!(ctx.time().scale().multiplier(), 4);

        let err = CaptureContext::new(&CLOCK).with_external_counter(&CLOCK, 1, 0);
        assert_eq!(err.err(), Some(ScaleError::ZeroDivisor));
    }
}
