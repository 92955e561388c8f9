//! Motor output task
//!
//! Applies the latest wheel command to both H-bridge channels.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::PwmOutput;

use rxsignal_drivers::mixer::DriveCommand;
use rxsignal_drivers::motor::HBridgeMotor;

use crate::channels::DRIVE_CMD;

/// One H-bridge channel on RP2040 pins
pub type Motor = HBridgeMotor<Output<'static>, PwmOutput<'static>>;

/// Wheel motor control task
///
/// Stops both motors at startup, then waits for commands.
#[embassy_executor::task]
pub async fn motor_task(mut left: Motor, mut right: Motor) {
    info!("Motor task started");

    apply(&mut left, &mut right, DriveCommand::STOP);

    loop {
        let cmd = DRIVE_CMD.wait().await;
        apply(&mut left, &mut right, cmd);
    }
}

fn apply(left: &mut Motor, right: &mut Motor, cmd: DriveCommand) {
    if left.command() != cmd.left {
        debug!("Left motor: {:?}", cmd.left);
    }
    if right.command() != cmd.right {
        debug!("Right motor: {:?}", cmd.right);
    }

    if let Err(e) = left.drive(cmd.left) {
        warn!("Left motor command failed: {:?}", e);
    }
    if let Err(e) = right.drive(cmd.right) {
        warn!("Right motor command failed: {:?}", e);
    }
}
