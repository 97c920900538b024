/// Dead zone applied to gamepad axes.
pub const DEFAULT_AXIS_DEADZONE: f32 = 0.2;

/// Smallest raw delta that counts as a change for motion events.
pub const DEFAULT_CHANGE_EPSILON: f32 = 0.0001;

/// Routing policy fixed when the manager is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagerSettings {
    /// Number of logical devices. Indices are `0..devices`.
    pub devices: usize,
    /// Route gamepad events to `source + 1`, so a shared keyboard stream and
    /// a controller stream reported on the same index become two players.
    pub controller_as_second_device: bool,
    pub axis_deadzone: f32,
    /// Motion events closer than this to the cached raw value are dropped.
    /// Press and release events are never dropped.
    pub change_epsilon: f32,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            devices: 2,
            controller_as_second_device: true,
            axis_deadzone: DEFAULT_AXIS_DEADZONE,
            change_epsilon: DEFAULT_CHANGE_EPSILON,
        }
    }
}
