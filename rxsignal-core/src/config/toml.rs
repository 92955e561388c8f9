//! Simple TOML parser for receiver configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `receiver.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - `[section]` headers: `time_source`, `drive`
//! - `[[channel]]` array-of-tables headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Inline tables and arrays
//! - Dotted keys
//!
//! Unknown keys are ignored. Unknown calibration names resolve to the
//! generic curve, like every other calibration lookup.

use heapless::String as HString;

use super::types::{
    ChannelConfig, ReceiverConfig, TimeSourceKind, MAX_NAME_LEN,
};
use crate::calibration::TxRxCombo;
use crate::capture::CaptureMode;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Line is neither a header nor `key = value`
    InvalidLine,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    TimeSource,
    Channel,
    Drive,
}

/// Parse TOML text into a [`ReceiverConfig`]
///
/// The result is not validated; call [`ReceiverConfig::validate`].
pub fn parse_config(input: &str) -> Result<ReceiverConfig, ParseError> {
    let mut config = ReceiverConfig::new();
    let mut section = Section::Root;
    let mut current_channel: Option<ChannelConfig> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Section header
        if line.starts_with('[') {
            save_channel(&mut config, &mut current_channel)?;

            section = parse_section_header(strip_comment(line))?;
            if section == Section::Channel {
                current_channel = Some(ChannelConfig::default());
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config, &mut current_channel)?;
    }

    // Save final section
    save_channel(&mut config, &mut current_channel)?;

    Ok(config)
}

/// Parse "[time_source]", "[drive]" or "[[channel]]"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    if let Some(inner) = header
        .strip_prefix("[[")
        .and_then(|h| h.strip_suffix("]]"))
    {
        return match inner.trim() {
            "channel" => Ok(Section::Channel),
            _ => Err(ParseError::InvalidSection),
        };
    }

    let inner = header
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match inner.trim() {
        "time_source" => Ok(Section::TimeSource),
        "drive" => Ok(Section::Drive),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse time source kind
fn parse_time_source_kind(value: &str) -> Result<TimeSourceKind, ParseError> {
    match parse_string(value) {
        "builtin" => Ok(TimeSourceKind::Builtin),
        "external" => Ok(TimeSourceKind::External),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse capture mode
fn parse_capture_mode(value: &str) -> Result<CaptureMode, ParseError> {
    match parse_string(value) {
        "combined" => Ok(CaptureMode::Combined),
        "split" => Ok(CaptureMode::Split),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply a key-value pair to the current section
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ReceiverConfig,
    current_channel: &mut Option<ChannelConfig>,
) -> Result<(), ParseError> {
    match section {
        Section::TimeSource => match key {
            "kind" => config.time_source.kind = parse_time_source_kind(value)?,
            "multiplier" => config.time_source.multiplier = parse_int(value)?,
            "divisor" => config.time_source.divisor = parse_int(value)?,
            _ => {}
        },
        Section::Channel => {
            let c = current_channel.as_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "name" => {
                    c.name = HString::<MAX_NAME_LEN>::try_from(parse_string(value))
                        .map_err(|_| ParseError::InvalidValue)?;
                }
                "mode" => c.mode = parse_capture_mode(value)?,
                "combo" => c.combo = TxRxCombo::from_name(parse_string(value)),
                _ => {}
            }
        }
        Section::Drive => match key {
            "deadband" => config.drive.deadband = parse_int(value)?,
            "max_signal" => config.drive.max_signal = parse_int(value)?,
            "steering_curve" => config.drive.steering_curve = parse_int(value)?,
            _ => {}
        },
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}

/// Push the channel being built, if any
fn save_channel(
    config: &mut ReceiverConfig,
    current_channel: &mut Option<ChannelConfig>,
) -> Result<(), ParseError> {
    if let Some(c) = current_channel.take() {
        config
            .channels
            .push(c)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    const SAMPLE: &str = r#"
# Rover receiver
[time_source]
kind = "external"   # board timer
multiplier = 1
divisor = 2

[[channel]]
name = "throttle"
mode = "split"
combo = "spektrum_dx9_orange_r620x"

[[channel]]
name = "steering"
combo = "ccpm_servo_tester"

[drive]
deadband = 10
max_signal = 120
steering_curve = -3
"#;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("[time_source]"), Ok(Section::TimeSource));
        assert_eq!(parse_section_header("[ drive ]"), Ok(Section::Drive));
        assert_eq!(parse_section_header("[[channel]]"), Ok(Section::Channel));
        assert_eq!(parse_section_header("[channel]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_section_header("[[drive]]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_section_header("[stepper]"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a = 1"), Some(("a", "1")));
        assert_eq!(parse_key_value("name = \"x # y\""), Some(("name", "\"x # y\"")));
        assert_eq!(parse_key_value("kind = builtin # note"), Some(("kind", "builtin")));
        assert_eq!(parse_key_value("novalue ="), None);
        assert_eq!(parse_key_value("garbage"), None);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.time_source.kind, TimeSourceKind::External);
        assert_eq!(config.time_source.divisor, 2);

        assert_eq!(config.channels.len(), 2);
        let throttle = &config.channels[0];
        assert_eq!(throttle.name.as_str(), "throttle");
        assert_eq!(throttle.mode, CaptureMode::Split);
        assert_eq!(throttle.combo, TxRxCombo::SpektrumDx9OrangeR620x);

        let steering = config.channel("steering").unwrap();
        assert_eq!(steering.mode, CaptureMode::Combined);
        assert_eq!(steering.combo, TxRxCombo::CcpmServoTester);

        assert_eq!(config.drive.deadband, 10);
        assert_eq!(config.drive.max_signal, 120);
        assert_eq!(config.drive.steering_curve, -3);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_combo_is_legacy() {
        let config = parse_config("[[channel]]\nname = \"aux\"\ncombo = \"futaba\"\n").unwrap();
        assert_eq!(config.channels[0].combo, TxRxCombo::Legacy);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[time_source]\nkind = \"sundial\"").unwrap_err(),
            ParseError::InvalidValue
        );
        assert_eq!(
            parse_config("[drive]\ndeadband = wide").unwrap_err(),
            ParseError::InvalidValue
        );
        assert_eq!(
            parse_config("[[channel]]\nmode = \"both\"").unwrap_err(),
            ParseError::InvalidValue
        );
        assert_eq!(
            parse_config("[[channel]]\nname = \"a_name_that_is_too_long\"").unwrap_err(),
            ParseError::InvalidValue
        );
        assert_eq!(parse_config("[drive]\nnonsense").unwrap_err(), ParseError::InvalidLine);
    }

    #[test]
    fn test_too_many_channels() {
        let input = "[[channel]]\n[[channel]]\n[[channel]]\n[[channel]]\n[[channel]]\n";
        assert_eq!(parse_config(input).unwrap_err(), ParseError::TooManyItems);
    }

    #[test]
    fn test_zero_divisor_parses_but_fails_validation() {
        let config = parse_config("[time_source]\ndivisor = 0\n[[channel]]\nname = \"t\"").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ZeroDivisor));
    }

    #[test]
    fn test_empty_input() {
        let config = parse_config("").unwrap();
        assert!(config.channels.is_empty());
        assert_eq!(config.validate(), Err(ConfigError::NoChannels));
    }
}
