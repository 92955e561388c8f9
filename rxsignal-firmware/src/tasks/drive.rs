//! Drive task
//!
//! Polls the throttle and steering channels and, whenever either has
//! captured a new pulse, converts both to calibrated percentages and
//! mixes them into wheel commands for the motor task. Until the throttle
//! has delivered a pulse the motors are held stopped.

use defmt::*;
use embassy_time::{Duration, Ticker};

use rxsignal_core::{ReceiverChannel, SignalValue, TxRxCombo};
use rxsignal_drivers::mixer::DriveMixer;

use crate::channels::DRIVE_CMD;

/// Poll period; receivers repeat a frame every ~20 ms
const POLL_INTERVAL_MS: u64 = 5;

/// A receiver channel and the calibration its transmitter needs
#[derive(Clone, Copy)]
pub struct Stick {
    /// Capturing channel
    pub channel: &'static ReceiverChannel,
    /// Calibration row
    pub combo: TxRxCombo,
}

impl Stick {
    /// Calibrated position, `-150..=150`, or `None` until the first pulse
    ///
    /// Reading clears the changed flag.
    fn read(&self) -> Option<SignalValue> {
        self.channel.captured_signal_value(self.combo)
    }
}

/// Throttle/steering to wheel command loop
#[embassy_executor::task]
pub async fn drive_task(throttle: Stick, steering: Stick, mixer: DriveMixer) {
    info!(
        "Drive task started (deadband={}%, max={}%, curve={})",
        mixer.config().deadband,
        mixer.config().max_signal,
        mixer.config().steering_curve
    );

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        if throttle.channel.has_changed() || steering.channel.has_changed() {
            let t = throttle.read();
            let s = steering.read();

            match mixer.mix_captured(t, s) {
                Some(cmd) => {
                    trace!("throttle={:?}% steering={:?}% -> {:?}", t, s, cmd);
                    DRIVE_CMD.signal(cmd);
                }
                None => trace!("throttle={:?}% on deadband edge, holding", t),
            }
        }

        ticker.next().await;
    }
}
