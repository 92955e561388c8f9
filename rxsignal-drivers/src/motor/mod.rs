//! Motor driver implementations
//!
//! - H-bridge motors: one direction pin plus one PWM speed pin

pub mod hbridge;

pub use hbridge::{HBridgeConfig, HBridgeMotor};

/// Full speed on the 8-bit scale used by the drive mixer
pub const MAX_SPEED: u8 = u8::MAX;

/// Command for a single motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    /// Direction low, no drive
    #[default]
    Stop,
    /// Drive forward at `0..=255`
    Forward(u8),
    /// Drive in reverse at `0..=255`
    Reverse(u8),
}

impl MotorCommand {
    /// Requested speed, zero when stopped
    pub fn speed(&self) -> u8 {
        match *self {
            MotorCommand::Stop => 0,
            MotorCommand::Forward(s) | MotorCommand::Reverse(s) => s,
        }
    }
}

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Direction pin could not be driven
    DirectionPin,
    /// PWM duty cycle could not be set
    Pwm,
}
