//! Receiver configuration
//!
//! Board-agnostic configuration structures plus a small `no_std` parser
//! for the embedded `receiver.toml`.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
