use std::path::Path;

use impulse_input::{InputManager, InputMap, ManagerSettings};
use serde::Deserialize;

use crate::{v1::InputMapV1, ProfileError};

/// A parsed input-map document: the bindings and the routing settings.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    pub map: InputMap,
    pub settings: ManagerSettings,
}

impl InputDocument {
    /// Builds a ready manager from this document.
    pub fn build(&self) -> impulse_input::Result<InputManager> {
        InputManager::from_map(&self.map, self.settings)
    }
}

/// Parse yaml input map.
pub fn parse_input_map(input: &str) -> Result<InputDocument, ProfileError> {
    let version = parse_version(input)?;
    match version {
        1 => {
            let document: InputMapV1 = serde_yaml::from_str(input)?;
            document.parse()
        }
        _ => Err(ProfileError::UnsupportedVersion(version)),
    }
}

/// Read and parse a yaml input map from disk.
pub fn load_input_map(path: impl AsRef<Path>) -> Result<InputDocument, ProfileError> {
    let input = std::fs::read_to_string(path)?;
    parse_input_map(&input)
}

/// A document with a version.
#[derive(Debug, Clone, Deserialize)]
struct VersionedDocument {
    version: u8,
}

/// Parse the version of yaml document.
fn parse_version(input: &str) -> Result<u8, ProfileError> {
    let raw: VersionedDocument = serde_yaml::from_str(input)?;
    Ok(raw.version)
}
