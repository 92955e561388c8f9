//! Calibration engine
//!
//! Converts a raw pulse width into a signed stick position in percent.
//! Input is clamped to the plausible receiver range before the curve is
//! evaluated, and the result is truncated toward zero and clamped to the
//! signal range afterwards, so any `u32` (including the unknown-width
//! sentinel) yields a bounded value.

mod table;

pub use table::{Polynomial, TxRxCombo};

/// Shortest pulse accepted from a receiver (µs)
pub const MIN_RECEIVER_PWM: u32 = 820;

/// Longest pulse accepted from a receiver (µs)
pub const MAX_RECEIVER_PWM: u32 = 2200;

/// Full stick deflection one way (%)
pub const MIN_SIGNAL_VALUE: SignalValue = -150;

/// Full stick deflection the other way (%)
pub const MAX_SIGNAL_VALUE: SignalValue = 150;

/// Calibrated stick position in percent
pub type SignalValue = i16;

/// Convert a pulse width with the generic linear model
pub fn generic_signal_value(pwm: u32) -> SignalValue {
    device_signal_value(TxRxCombo::Legacy, pwm)
}

/// Convert a pulse width with the curve fitted for `combo`
pub fn device_signal_value(combo: TxRxCombo, pwm: u32) -> SignalValue {
    let pwm = pwm.clamp(MIN_RECEIVER_PWM, MAX_RECEIVER_PWM);
    let raw = combo.polynomial().eval(pwm as f32);

    // `as` truncates toward zero
    (raw as i32).clamp(MIN_SIGNAL_VALUE as i32, MAX_SIGNAL_VALUE as i32) as SignalValue
}
