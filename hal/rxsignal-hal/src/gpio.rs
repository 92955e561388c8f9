//! GPIO level abstractions
//!
//! Edge handlers only ever need to know which level a pin settled at when
//! the interrupt fired, so the capability is keyed by pin number rather
//! than by an owned pin object.

/// Logical pin identifier (GPIO number on the target chip)
pub type PinId = u8;

/// Logic level of a digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if this is logic 1
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if this is logic 0
    pub const fn is_low(self) -> bool {
        !self.is_high()
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Level reader for input pins
///
/// Implementations return the level latched when the most recent edge
/// interrupt for `pin` fired. Called from interrupt context, so it must
/// not block.
pub trait InputLevel: Sync {
    /// Read the current logic level of `pin`
    fn read_level(&self, pin: PinId) -> Level;

    /// Check if `pin` reads high
    fn is_high(&self, pin: PinId) -> bool {
        self.read_level(pin).is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(Level::High.is_high());
        assert!(Level::Low.is_low());
    }
}
