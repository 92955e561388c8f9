//! Capture time base
//!
//! Edge timestamps come from a free-running 32-bit counter. The built-in
//! source is the platform's microsecond clock; an external source is any
//! other counter plus the multiplier/divisor pair that converts its ticks
//! to microseconds.
//!
//! Timestamps themselves are never rescaled. The scale is applied to the
//! tick *delta* between two edges, dividing first and multiplying second
//! so that a fast counter (e.g. 0.5µs ticks, divisor 2) still yields
//! whole microseconds.

use core::fmt;

use rxsignal_hal::TickCounter;

/// Errors building a tick scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScaleError {
    /// Multiplier of zero would report every pulse as 0µs
    ZeroMultiplier,
    /// Divisor of zero leaves the scale undefined
    ZeroDivisor,
}

/// Tick-to-microsecond conversion factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickScale {
    multiplier: u32,
    divisor: u32,
}

impl Default for TickScale {
    fn default() -> Self {
        Self::UNIT
    }
}

impl TickScale {
    /// One tick per microsecond
    pub const UNIT: Self = Self {
        multiplier: 1,
        divisor: 1,
    };

    /// Create a scale, rejecting zero factors
    pub const fn new(multiplier: u32, divisor: u32) -> Result<Self, ScaleError> {
        if multiplier == 0 {
            return Err(ScaleError::ZeroMultiplier);
        }
        if divisor == 0 {
            return Err(ScaleError::ZeroDivisor);
        }
        Ok(Self {
            multiplier,
            divisor,
        })
    }

    /// Multiplier applied after division
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Divisor applied first
    pub const fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Check if this scale leaves ticks unchanged
    pub const fn is_unit(&self) -> bool {
        self.multiplier == 1 && self.divisor == 1
    }

    /// Convert a tick count to microseconds
    ///
    /// Saturates at `u32::MAX` instead of wrapping; such a width is far
    /// outside the calibrated range and gets clamped downstream anyway.
    pub const fn apply(&self, ticks: u32) -> u32 {
        (ticks / self.divisor).saturating_mul(self.multiplier)
    }
}

/// Source of edge timestamps
#[derive(Clone, Copy)]
pub enum TimeSource {
    /// Platform microsecond clock
    Builtin(&'static dyn TickCounter),
    /// Arbitrary counter rescaled to microseconds
    External {
        /// Tick counter read on every edge
        counter: &'static dyn TickCounter,
        /// Conversion from counter ticks to microseconds
        scale: TickScale,
    },
}

impl TimeSource {
    /// Use the platform microsecond clock
    pub const fn builtin(clock: &'static dyn TickCounter) -> Self {
        TimeSource::Builtin(clock)
    }

    /// Use an external counter with the given conversion factors
    pub fn external(
        counter: &'static dyn TickCounter,
        multiplier: u32,
        divisor: u32,
    ) -> Result<Self, ScaleError> {
        let scale = TickScale::new(multiplier, divisor)?;
        Ok(TimeSource::External { counter, scale })
    }

    /// Current raw tick count
    pub fn now(&self) -> u32 {
        match self {
            TimeSource::Builtin(clock) => clock.now(),
            TimeSource::External { counter, .. } => counter.now(),
        }
    }

    /// Scale applied to tick deltas
    pub fn scale(&self) -> TickScale {
        match self {
            TimeSource::Builtin(_) => TickScale::UNIT,
            TimeSource::External { scale, .. } => *scale,
        }
    }

    /// Check if this source is an external counter
    pub fn is_external(&self) -> bool {
        matches!(self, TimeSource::External { .. })
    }

    /// Microseconds between two raw timestamps
    ///
    /// Uses wrapping subtraction, so a counter overflow between `start`
    /// and `end` still yields the true interval.
    pub fn elapsed_micros(&self, start: u32, end: u32) -> u32 {
        self.scale().apply(end.wrapping_sub(start))
    }
}

impl fmt::Debug for TimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSource::Builtin(_) => f.write_str("TimeSource::Builtin"),
            TimeSource::External { scale, .. } => f
                .debug_struct("TimeSource::External")
                .field("scale", scale)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxsignal_hal::CounterFn;

    fn frozen() -> u32 {
        7_000
    }

    static FROZEN: CounterFn = CounterFn(frozen);

    #[test]
    fn test_scale_rejects_zero() {
        assert_eq!(TickScale::new(1, 0), Err(ScaleError::ZeroDivisor));
        assert_eq!(TickScale::new(0, 1), Err(ScaleError::ZeroMultiplier));
        assert!(TickScale::new(4, 1).is_ok());
    }

    #[test]
    fn test_scale_divides_before_multiplying() {
        // 0.5us ticks: 3001 ticks is 1500.5us, truncated to 1500
        let half_us = TickScale::new(1, 2).unwrap();
        assert_eq!(half_us.apply(3001), 1500);

        // 4us ticks (AVR timer2 prescaler)
        let four_us = TickScale::new(4, 1).unwrap();
        assert_eq!(four_us.apply(375), 1500);

        // Integer division happens first: (7 / 2) * 3 = 9, not 10
        let odd = TickScale::new(3, 2).unwrap();
        assert_eq!(odd.apply(7), 9);
    }

    #[test]
    fn test_scale_saturates() {
        let huge = TickScale::new(u32::MAX, 1).unwrap();
        assert_eq!(huge.apply(2), u32::MAX);
    }

    #[test]
    fn test_builtin_is_unit() {
        let source = TimeSource::builtin(&FROZEN);
        assert!(source.scale().is_unit());
        assert!(!source.is_external());
        assert_eq!(source.now(), 7_000);
    }

    #[test]
    fn test_external_rejects_zero_divisor() {
        assert_eq!(
            TimeSource::external(&FROZEN, 1, 0).err(),
            Some(ScaleError::ZeroDivisor)
        );
    }

    #[test]
    fn test_elapsed_wraps() {
        let source = TimeSource::builtin(&FROZEN);
        assert_eq!(source.elapsed_micros(u32::MAX - 499, 1000), 1500);

        let scaled = TimeSource::external(&FROZEN, 1, 2).unwrap();
        assert_eq!(scaled.elapsed_micros(1000, 4000), 1500);
    }
}
