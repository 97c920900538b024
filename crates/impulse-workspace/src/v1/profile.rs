use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputMapV1 {
    pub version: u8,
    #[serde(default)]
    pub settings: SettingsV1,
    /// label -> inputs, in document order
    #[serde(default)]
    pub actions: serde_yaml::Mapping,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct SettingsV1 {
    #[serde(default)]
    pub devices: Option<usize>,
    #[serde(default)]
    pub controller_as_second_device: Option<bool>,
    #[serde(default)]
    pub axis_deadzone: Option<f32>,
    #[serde(default)]
    pub change_epsilon: Option<f32>,
}

/// Inputs of one label: a single identity string or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum InputsV1 {
    One(String),
    Many(Vec<String>),
}
