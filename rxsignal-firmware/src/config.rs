//! Receiver configuration loading
//!
//! The configuration is compiled in from `receiver.toml` (already checked
//! by build.rs). Falls back to the built-in defaults if the embedded
//! text somehow fails to parse or validate.

use defmt::*;

use rxsignal_core::config::{parse_config, ReceiverConfig};

/// Embedded configuration (compiled into firmware)
/// Edit receiver.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../receiver.toml");

/// Parse and validate the embedded configuration
pub fn load_config() -> ReceiverConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            return ReceiverConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Embedded config rejected: {:?}", e);
        warn!("Using default configuration");
        return ReceiverConfig::default();
    }

    info!(
        "Parsed embedded configuration: {} channels, time source {:?}",
        config.channels.len(),
        config.time_source.kind
    );
    config
}
