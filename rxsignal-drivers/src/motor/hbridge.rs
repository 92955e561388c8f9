//! H-bridge motor driver
//!
//! Drives one motor channel of an H-bridge (L298N style) through a
//! direction pin and a PWM speed pin:
//!
//! | Command        | DIR  | PWM duty                            |
//! |----------------|------|-------------------------------------|
//! | `Stop`         | LOW  | 0                                   |
//! | `Forward(s)`   | LOW  | `255 - s` (inverted) or `s`         |
//! | `Reverse(s)`   | HIGH | `s`                                 |
//!
//! Forward duty is inverted by default, matching the rover's bridge
//! wiring. Speeds are on an 8-bit scale and mapped onto the PWM's own
//! `max_duty_cycle`.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use super::{MotorCommand, MotorError, MAX_SPEED};

/// H-bridge wiring options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeConfig {
    /// Forward duty is `255 - speed` instead of `speed`
    pub inverted_forward: bool,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            inverted_forward: true,
        }
    }
}

/// One H-bridge motor channel
pub struct HBridgeMotor<DIR, PWM> {
    dir: DIR,
    pwm: PWM,
    config: HBridgeConfig,
    command: MotorCommand,
}

impl<DIR, PWM> HBridgeMotor<DIR, PWM>
where
    DIR: OutputPin,
    PWM: SetDutyCycle,
{
    /// Create a new motor driver
    ///
    /// The outputs are left untouched until the first command.
    pub fn new(dir: DIR, pwm: PWM, config: HBridgeConfig) -> Self {
        Self {
            dir,
            pwm,
            config,
            command: MotorCommand::Stop,
        }
    }

    /// Apply a command to the outputs
    pub fn drive(&mut self, command: MotorCommand) -> Result<(), MotorError> {
        match command {
            MotorCommand::Stop => {
                self.dir.set_low().map_err(|_| MotorError::DirectionPin)?;
                self.pwm
                    .set_duty_cycle_fully_off()
                    .map_err(|_| MotorError::Pwm)?;
            }
            MotorCommand::Forward(speed) => {
                let duty = if self.config.inverted_forward {
                    MAX_SPEED - speed
                } else {
                    speed
                };
                self.dir.set_low().map_err(|_| MotorError::DirectionPin)?;
                self.set_duty(duty)?;
            }
            MotorCommand::Reverse(speed) => {
                self.dir.set_high().map_err(|_| MotorError::DirectionPin)?;
                self.set_duty(speed)?;
            }
        }

        self.command = command;
        Ok(())
    }

    /// Stop the motor
    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.drive(MotorCommand::Stop)
    }

    /// Last command applied successfully
    pub fn command(&self) -> MotorCommand {
        self.command
    }

    /// Wiring options
    pub fn config(&self) -> &HBridgeConfig {
        &self.config
    }

    /// Give back the pins
    pub fn release(self) -> (DIR, PWM) {
        (self.dir, self.pwm)
    }

    fn set_duty(&mut self, duty: u8) -> Result<(), MotorError> {
        self.pwm
            .set_duty_cycle_fraction(duty as u16, MAX_SPEED as u16)
            .map_err(|_| MotorError::Pwm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{self, ErrorKind};
    use embedded_hal::pwm;

    #[derive(Default)]
    struct MockPin {
        high: bool,
        broken: bool,
    }

    impl digital::ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.high = true;
            Ok(())
        }
    }

    struct MockPwm {
        duty: u16,
        max: u16,
    }

    impl pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    fn motor(inverted_forward: bool) -> HBridgeMotor<MockPin, MockPwm> {
        HBridgeMotor::new(
            MockPin::default(),
            MockPwm { duty: 7, max: 255 },
            HBridgeConfig { inverted_forward },
        )
    }

    #[test]
    fn test_initial_command_is_stop() {
        let m = motor(true);
        assert_eq!(m.command(), MotorCommand::Stop);
        assert!(m.config().inverted_forward);
    }

    #[test]
    fn test_stop() {
        let mut m = motor(true);
        m.drive(MotorCommand::Reverse(100)).unwrap();
        m.stop().unwrap();

        let (dir, pwm) = m.release();
        assert!(!dir.high);
        assert_eq!(pwm.duty, 0);
    }

    #[test]
    fn test_forward_inverted() {
        let mut m = motor(true);
        m.drive(MotorCommand::Forward(200)).unwrap();
        assert_eq!(m.command(), MotorCommand::Forward(200));

        let (dir, pwm) = m.release();
        assert!(!dir.high);
        assert_eq!(pwm.duty, 55);
    }

    #[test]
    fn test_forward_plain() {
        let mut m = motor(false);
        m.drive(MotorCommand::Forward(200)).unwrap();

        let (_, pwm) = m.release();
        assert_eq!(pwm.duty, 200);
    }

    #[test]
    fn test_reverse() {
        let mut m = motor(true);
        m.drive(MotorCommand::Reverse(180)).unwrap();

        let (dir, pwm) = m.release();
        assert!(dir.high);
        assert_eq!(pwm.duty, 180);
    }

    #[test]
    fn test_duty_scaled_to_pwm_range() {
        let mut m = HBridgeMotor::new(
            MockPin::default(),
            MockPwm { duty: 0, max: 1000 },
            HBridgeConfig::default(),
        );
        m.drive(MotorCommand::Reverse(255)).unwrap();
        assert_eq!(m.pwm.duty, 1000);

        // 128 * 1000 / 255
        m.drive(MotorCommand::Reverse(128)).unwrap();
        assert_eq!(m.pwm.duty, 501);
    }

    #[test]
    fn test_pin_failure_keeps_last_command() {
        let mut m = motor(true);
        m.drive(MotorCommand::Forward(50)).unwrap();
        m.dir.broken = true;

        assert_eq!(m.drive(MotorCommand::Reverse(50)), Err(MotorError::DirectionPin));
        assert_eq!(m.command(), MotorCommand::Forward(50));
    }

    #[test]
    fn test_speed_accessor() {
        assert_eq!(MotorCommand::Stop.speed(), 0);
        assert_eq!(MotorCommand::Forward(10).speed(), 10);
        assert_eq!(MotorCommand::Reverse(20).speed(), 20);
    }
}
