mod parse;
mod trace;
mod v1;

use thiserror::Error;

pub use parse::{load_input_map, parse_input_map, InputDocument};
pub use trace::{load_trace, parse_trace};
pub use v1::{parse_axis_name, parse_button_name, parse_input, parse_key_name};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("yaml deserialize error: {0}")]
    YamlDeserializeError(#[from] serde_yaml::Error),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("invalid trace event #{index}: {reason}")]
    InvalidTraceEvent { index: usize, reason: String },
    #[error("path error: {0}")]
    PathError(#[from] std::io::Error),
}
