//! Configuration type definitions
//!
//! These types describe how the receiver is wired into the rover: which
//! clock times the edges, which channels exist and how each is captured
//! and calibrated, and how the drive mixer shapes the result.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calibration::TxRxCombo;
use crate::capture::CaptureMode;
use crate::time::{ScaleError, TickScale};

/// Maximum channel name length
pub const MAX_NAME_LEN: usize = 16;

/// Maximum receiver channels per config
pub const MAX_CHANNELS: usize = 4;

/// Steering curve bounds accepted by the mixer
pub const MAX_STEERING_CURVE: i8 = 10;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Time source multiplier is zero
    ZeroMultiplier,
    /// Time source divisor is zero
    ZeroDivisor,
    /// No `[[channel]]` entries
    NoChannels,
    /// Two channels share a name
    DuplicateChannel,
    /// Deadband swallows the whole stick range
    DeadbandTooWide,
    /// Steering curve outside `-10..=10`
    CurveOutOfRange,
}

impl From<ScaleError> for ConfigError {
    fn from(e: ScaleError) -> Self {
        match e {
            ScaleError::ZeroMultiplier => ConfigError::ZeroMultiplier,
            ScaleError::ZeroDivisor => ConfigError::ZeroDivisor,
        }
    }
}

/// Which counter timestamps the edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeSourceKind {
    /// Platform microsecond clock
    #[default]
    Builtin,
    /// Board tick counter, rescaled by multiplier/divisor
    External,
}

/// Time source configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimeSourceConfig {
    /// Counter backing `now()`
    pub kind: TimeSourceKind,
    /// Pulse width multiplier (external counters)
    pub multiplier: u32,
    /// Pulse width divisor (external counters)
    pub divisor: u32,
}

impl Default for TimeSourceConfig {
    fn default() -> Self {
        Self {
            kind: TimeSourceKind::Builtin,
            multiplier: 1,
            divisor: 1,
        }
    }
}

impl TimeSourceConfig {
    /// Scale applied to raw tick differences
    pub fn scale(&self) -> Result<TickScale, ScaleError> {
        TickScale::new(self.multiplier, self.divisor)
    }
}

/// One receiver output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelConfig {
    /// Channel name, e.g. "throttle"
    pub name: String<MAX_NAME_LEN>,
    /// Edge notification strategy
    pub mode: CaptureMode,
    /// Calibration row
    pub combo: TxRxCombo,
}

impl ChannelConfig {
    /// Create a channel config, truncating over-long names
    pub fn new(name: &str, mode: CaptureMode, combo: TxRxCombo) -> Self {
        let mut n = String::new();
        for c in name.chars() {
            if n.push(c).is_err() {
                break;
            }
        }
        Self {
            name: n,
            mode,
            combo,
        }
    }
}

/// Drive mixer tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveConfig {
    /// Throttle magnitude treated as centred (%)
    pub deadband: i16,
    /// Stick deflection mapped to full speed (%)
    pub max_signal: i16,
    /// Steering slowdown curve, `-10..=10`; negative bends toward the end
    pub steering_curve: i8,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            deadband: 15,
            max_signal: 125,
            steering_curve: -3,
        }
    }
}

/// Complete receiver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReceiverConfig {
    /// Edge timestamp source
    pub time_source: TimeSourceConfig,
    /// Receiver channels, in declaration order
    #[cfg_attr(feature = "serde", serde(rename = "channel"))]
    pub channels: Vec<ChannelConfig, MAX_CHANNELS>,
    /// Drive mixer tuning
    pub drive: DriveConfig,
}

impl Default for ReceiverConfig {
    /// Throttle and steering on the generic calibration, combined capture
    fn default() -> Self {
        let mut channels = Vec::new();
        for name in ["throttle", "steering"] {
            // Capacity is MAX_CHANNELS
            let _ = channels.push(ChannelConfig::new(
                name,
                CaptureMode::Combined,
                TxRxCombo::Legacy,
            ));
        }
        Self {
            time_source: TimeSourceConfig::default(),
            channels,
            drive: DriveConfig::default(),
        }
    }
}

impl ReceiverConfig {
    /// Create an empty configuration (no channels)
    pub fn new() -> Self {
        Self {
            time_source: TimeSourceConfig::default(),
            channels: Vec::new(),
            drive: DriveConfig::default(),
        }
    }

    /// Find a channel by name
    pub fn channel(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.name.as_str() == name)
    }

    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_source.scale()?;

        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if self.channels[..i].iter().any(|c| c.name == channel.name) {
                return Err(ConfigError::DuplicateChannel);
            }
        }

        if self.drive.deadband < 0 || self.drive.deadband >= self.drive.max_signal {
            return Err(ConfigError::DeadbandTooWide);
        }

        if !(-MAX_STEERING_CURVE..=MAX_STEERING_CURVE).contains(&self.drive.steering_curve) {
            return Err(ConfigError::CurveOutOfRange);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReceiverConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.channels.len(), 2);
        assert!(config.channel("throttle").is_some());
        assert!(config.channel("steering").is_some());
        assert!(config.channel("aux").is_none());
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut config = ReceiverConfig::default();
        config.time_source.divisor = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDivisor));

        config.time_source.divisor = 1;
        config.time_source.multiplier = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMultiplier));
    }

    #[test]
    fn test_no_channels_rejected() {
        assert_eq!(ReceiverConfig::new().validate(), Err(ConfigError::NoChannels));
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let mut config = ReceiverConfig::new();
        let ch = ChannelConfig::new("throttle", CaptureMode::Split, TxRxCombo::Legacy);
        config.channels.push(ch.clone()).unwrap();
        config.channels.push(ch).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::DuplicateChannel));
    }

    #[test]
    fn test_drive_limits() {
        let mut config = ReceiverConfig::default();
        config.drive.deadband = 125;
        assert_eq!(config.validate(), Err(ConfigError::DeadbandTooWide));

        config.drive.deadband = 15;
        config.drive.steering_curve = 11;
        assert_eq!(config.validate(), Err(ConfigError::CurveOutOfRange));

        config.drive.steering_curve = -10;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_long_name_truncated() {
        let ch = ChannelConfig::new("a_very_long_channel_name", CaptureMode::Combined, TxRxCombo::Legacy);
        assert_eq!(ch.name.len(), MAX_NAME_LEN);
    }
}
