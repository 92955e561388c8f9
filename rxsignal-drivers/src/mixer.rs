//! Differential drive mixer
//!
//! Turns calibrated throttle and steering percentages into one command per
//! wheel for a two-motor rover:
//!
//! - Throttle inside the deadband stops both motors.
//! - Forward: the wheel on the inside of the turn is slowed by an amount
//!   that grows along a logarithmic curve with steering deflection.
//! - Reverse: both wheels at the same speed, steering ignored.
//!
//! A throttle of exactly `±deadband` produces no command; the motors keep
//! whatever they were last told.

use rxsignal_core::config::DriveConfig;
use rxsignal_core::SignalValue;

use crate::motor::{MotorCommand, MAX_SPEED};

/// Commands for both wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveCommand {
    /// Motor A
    pub left: MotorCommand,
    /// Motor B
    pub right: MotorCommand,
}

impl DriveCommand {
    /// Both motors stopped
    pub const STOP: Self = Self {
        left: MotorCommand::Stop,
        right: MotorCommand::Stop,
    };
}

/// Map `input` from one range onto another along a power curve
///
/// `curve` is clamped to `-10..=10`; 0 is linear, negative values start
/// slowly and steepen toward the end of the range, positive values the
/// opposite. `input` is clamped to `from_min..=from_max`; a reversed
/// source range yields 0.
pub fn fscale(
    from_min: f32,
    from_max: f32,
    new_begin: f32,
    new_end: f32,
    input: f32,
    curve: f32,
) -> f32 {
    if from_min > from_max {
        return 0.0;
    }

    let curve = curve.clamp(-10.0, 10.0);
    let exponent = libm::powf(10.0, -curve / 10.0);

    let from_range = from_max - from_min;
    if from_range == 0.0 {
        return new_begin;
    }

    let input = input.clamp(from_min, from_max);
    let normalized = (input - from_min) / from_range;
    let shaped = libm::powf(normalized, exponent);

    if new_end > new_begin {
        new_begin + shaped * (new_end - new_begin)
    } else {
        new_begin - shaped * (new_begin - new_end)
    }
}

/// Throttle/steering to wheel command mixer
#[derive(Debug, Clone, Copy)]
pub struct DriveMixer {
    config: DriveConfig,
}

impl DriveMixer {
    /// Create a mixer; `config` should have passed validation
    pub fn new(config: DriveConfig) -> Self {
        Self { config }
    }

    /// Mixer tuning
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Mix one throttle/steering sample
    ///
    /// Returns `None` when the throttle sits exactly on the deadband edge.
    pub fn mix(&self, throttle: SignalValue, steering: SignalValue) -> Option<DriveCommand> {
        let deadband = self.config.deadband;

        if throttle > -deadband && throttle < deadband {
            return Some(DriveCommand::STOP);
        }

        let speed = self.speed(throttle);

        if throttle > deadband {
            let inner = speed.saturating_sub(self.steering_slowdown(steering));
            let (left, right) = if steering < 0 {
                (speed, inner)
            } else {
                (inner, speed)
            };
            Some(DriveCommand {
                left: MotorCommand::Forward(left),
                right: MotorCommand::Forward(right),
            })
        } else if throttle < -deadband {
            Some(DriveCommand {
                left: MotorCommand::Reverse(speed),
                right: MotorCommand::Reverse(speed),
            })
        } else {
            None
        }
    }

    /// Mix sticks that may not have been captured yet
    ///
    /// No throttle reading stops both motors; no steering reading is
    /// treated as centred.
    pub fn mix_captured(
        &self,
        throttle: Option<SignalValue>,
        steering: Option<SignalValue>,
    ) -> Option<DriveCommand> {
        match throttle {
            Some(throttle) => self.mix(throttle, steering.unwrap_or(0)),
            None => Some(DriveCommand::STOP),
        }
    }

    /// Wheel speed for a throttle deflection, `0..=255`
    pub fn speed(&self, throttle: SignalValue) -> u8 {
        let magnitude = throttle.unsigned_abs() as i32 + self.config.deadband as i32;
        let max_signal = (self.config.max_signal as i32).max(1);
        (magnitude * MAX_SPEED as i32 / max_signal).clamp(0, MAX_SPEED as i32) as u8
    }

    /// Speed taken off the inside wheel for a steering deflection
    pub fn steering_slowdown(&self, steering: SignalValue) -> u8 {
        let slowdown = fscale(
            0.0,
            self.config.max_signal as f32,
            0.0,
            MAX_SPEED as f32,
            steering.unsigned_abs() as f32,
            self.config.steering_curve as f32,
        );
        // `as` truncates and saturates
        slowdown as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mixer() -> DriveMixer {
        DriveMixer::new(DriveConfig::default())
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_fscale_linear() {
        assert!(close(fscale(0.0, 100.0, 0.0, 255.0, 50.0, 0.0), 127.5));
        assert!(close(fscale(0.0, 100.0, 0.0, 255.0, 0.0, 0.0), 0.0));
        assert!(close(fscale(0.0, 100.0, 0.0, 255.0, 100.0, 0.0), 255.0));
    }

    #[test]
    fn test_fscale_inverted_output() {
        assert!(close(fscale(0.0, 100.0, 255.0, 0.0, 25.0, 0.0), 191.25));
    }

    #[test]
    fn test_fscale_clamps_input() {
        assert!(close(fscale(0.0, 100.0, 0.0, 255.0, 150.0, -3.0), 255.0));
        assert!(close(fscale(0.0, 100.0, 0.0, 255.0, -5.0, -3.0), 0.0));
    }

    #[test]
    fn test_fscale_curve() {
        // Negative curve stays below the line, positive above
        let low = fscale(0.0, 100.0, 0.0, 100.0, 50.0, -3.0);
        let high = fscale(0.0, 100.0, 0.0, 100.0, 50.0, 3.0);
        assert!(low < 50.0 && high > 50.0);

        // 0.5 ^ 10^0.3
        assert!(close(low, 100.0 * libm::powf(0.5, libm::powf(10.0, 0.3))));

        // Clamped to +-10
        assert!(close(
            fscale(0.0, 100.0, 0.0, 100.0, 50.0, 25.0),
            fscale(0.0, 100.0, 0.0, 100.0, 50.0, 10.0)
        ));
    }

    #[test]
    fn test_fscale_reversed_input_range() {
        assert_eq!(fscale(100.0, 0.0, 0.0, 255.0, 50.0, 0.0), 0.0);
    }

    #[test]
    fn test_deadband_stops() {
        let m = mixer();
        assert_eq!(m.mix(0, 80), Some(DriveCommand::STOP));
        assert_eq!(m.mix(14, 0), Some(DriveCommand::STOP));
        assert_eq!(m.mix(-14, 0), Some(DriveCommand::STOP));
    }

    #[test]
    fn test_deadband_edge_holds() {
        let m = mixer();
        assert_eq!(m.mix(15, 0), None);
        assert_eq!(m.mix(-15, 0), None);
    }

    #[test]
    fn test_speed_mapping() {
        let m = mixer();
        // (50 + 15) * 255 / 125
        assert_eq!(m.speed(50), 132);
        assert_eq!(m.speed(-50), 132);
        assert_eq!(m.speed(110), 255);
        assert_eq!(m.speed(150), 255);
    }

    #[test]
    fn test_forward_straight() {
        let cmd = mixer().mix(50, 0).unwrap();
        assert_eq!(cmd.left, MotorCommand::Forward(132));
        assert_eq!(cmd.right, MotorCommand::Forward(132));
    }

    #[test]
    fn test_forward_turns() {
        let m = mixer();

        // Full left: right wheel slowed to a halt
        let cmd = m.mix(110, -125).unwrap();
        assert_eq!(cmd.left, MotorCommand::Forward(255));
        assert_eq!(cmd.right, MotorCommand::Forward(0));

        // Right turn slows the left wheel
        let cmd = m.mix(110, 60).unwrap();
        assert_eq!(cmd.right, MotorCommand::Forward(255));
        let slowdown = m.steering_slowdown(60);
        assert!(slowdown > 0 && slowdown < 128);
        assert_eq!(cmd.left, MotorCommand::Forward(255 - slowdown));
    }

    #[test]
    fn test_reverse_ignores_steering() {
        let cmd = mixer().mix(-50, 120).unwrap();
        assert_eq!(cmd.left, MotorCommand::Reverse(132));
        assert_eq!(cmd.right, MotorCommand::Reverse(132));
    }

    #[test]
    fn test_missing_throttle_stops() {
        let m = mixer();
        assert_eq!(m.mix_captured(None, Some(-1)), Some(DriveCommand::STOP));
        assert_eq!(m.mix_captured(None, Some(120)), Some(DriveCommand::STOP));
        assert_eq!(m.mix_captured(None, None), Some(DriveCommand::STOP));
    }

    #[test]
    fn test_missing_steering_is_centred() {
        let m = mixer();
        assert_eq!(m.mix_captured(Some(50), None), m.mix(50, 0));
        assert_eq!(m.mix_captured(Some(-50), Some(120)), m.mix(-50, 120));
    }

    proptest! {
        #[test]
        fn prop_forward_inner_wheel_never_faster(throttle in 16i16..=150, steering in -150i16..=150) {
            let cmd = mixer().mix(throttle, steering).unwrap();
            let (left, right) = (cmd.left.speed(), cmd.right.speed());
            if steering < 0 {
                prop_assert!(right <= left);
            } else {
                prop_assert!(left <= right);
            }
        }

        #[test]
        fn prop_slowdown_monotonic(steering in 0i16..125) {
            let m = mixer();
            prop_assert!(m.steering_slowdown(steering) <= m.steering_slowdown(steering + 1));
        }

        #[test]
        fn prop_mix_total(throttle in any::<i16>(), steering in any::<i16>()) {
            let _ = mixer().mix(throttle, steering);
        }
    }
}
