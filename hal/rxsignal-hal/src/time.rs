//! Time base abstractions

/// Free-running 32-bit tick counter
///
/// Counts up monotonically and wraps on overflow. The tick rate is
/// platform defined; consumers rescale to microseconds themselves.
pub trait TickCounter: Sync {
    /// Current tick count
    fn now(&self) -> u32;
}

/// Adapter turning a plain counter function into a [`TickCounter`]
///
/// Useful for vendor timer libraries that expose a free function such as
/// `fn micros() -> u32`.
#[derive(Debug, Clone, Copy)]
pub struct CounterFn(pub fn() -> u32);

impl TickCounter for CounterFn {
    fn now(&self) -> u32 {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> u32 {
        1234
    }

    #[test]
    fn test_counter_fn() {
        let counter: &dyn TickCounter = &CounterFn(fixed);
        assert_eq!(counter.now(), 1234);
    }
}
