use thiserror::Error;

use crate::identity::PhysicalInput;

/// Error type for input routing operations.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// No action with this name was configured.
    #[error("action not found: {0}")]
    NotFound(String),
    /// The device index is outside the devices created at startup.
    #[error("device index {index} out of range (devices: {devices})")]
    IndexOutOfRange { index: usize, devices: usize },
    /// A physical input is bound more than once.
    #[error("{input} is bound to both \"{first}\" and \"{second}\"")]
    ConfigurationConflict {
        input: PhysicalInput,
        first: String,
        second: String,
    },
    /// A label is empty once its polarity marker is stripped.
    #[error("invalid action label: \"{0}\"")]
    InvalidLabel(String),
    /// The manager has not been built yet.
    #[error("input manager is not built")]
    NotReady,
    /// The manager has already been built.
    #[error("input manager is already built")]
    AlreadyBuilt,
}

/// Convenient result alias for input routing operations.
pub type Result<T> = std::result::Result<T, Error>;
