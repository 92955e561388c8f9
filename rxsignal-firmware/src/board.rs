//! Board pin assignments
//!
//! Raspberry Pi Pico pinout. The receiver outputs feed GPIO2/3 directly
//! (3.3V receivers only); the two H-bridge channels take a direction pin
//! and a PWM pin each.
//!
//! The constants must agree with the `p.PIN_*` peripherals `main` hands
//! to the edge watchers and motor drivers.

use rxsignal_hal::PinId;

/// Steering servo output of the receiver
pub const STEERING_PIN: PinId = 2;

/// Throttle (ESC) output of the receiver
pub const THROTTLE_PIN: PinId = 3;

/// Channel names with an input on this board
pub const WIRED_CHANNELS: [&str; 2] = ["throttle", "steering"];

/// Motor A (left) speed, PWM slice 3 channel A
pub const MOTOR_A_PWM: PinId = 6;

/// Motor A (left) direction
pub const MOTOR_A_DIR: PinId = 7;

/// Motor B (right) direction
pub const MOTOR_B_DIR: PinId = 8;

/// Motor B (right) speed, PWM slice 4 channel B
pub const MOTOR_B_PWM: PinId = 9;

/// PWM counter wrap; 125 MHz / 25_000 = 5 kHz
pub const MOTOR_PWM_TOP: u16 = 24_999;

/// Check whether a configured channel has an input on this board
pub fn is_wired(name: &str) -> bool {
    WIRED_CHANNELS.contains(&name)
}
