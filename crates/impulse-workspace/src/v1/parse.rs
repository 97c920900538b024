use impulse_input::{InputMap, ManagerSettings, PhysicalInput};
use smallvec::SmallVec;

use crate::parse::InputDocument;
use crate::ProfileError;

use super::names::parse_input;
use super::profile::{InputMapV1, InputsV1, SettingsV1};

impl InputMapV1 {
    pub(crate) fn parse(&self) -> Result<InputDocument, ProfileError> {
        if self.version != 1 {
            return Err(ProfileError::UnsupportedVersion(self.version));
        }

        let settings = parse_settings(&self.settings)?;

        let mut map = InputMap::new();
        for (label, raw) in &self.actions {
            let Some(label) = label.as_str() else {
                return Err(ProfileError::InvalidInput(format!(
                    "action label must be a string, got {label:?}"
                )));
            };
            let inputs = parse_inputs(label, raw)?;
            map.push(label, inputs);
        }

        Ok(InputDocument { map, settings })
    }
}

fn parse_inputs(
    label: &str,
    raw: &serde_yaml::Value,
) -> Result<SmallVec<[PhysicalInput; 4]>, ProfileError> {
    // `jump-:` with nothing after it binds no inputs.
    if raw.is_null() {
        return Ok(SmallVec::new());
    }
    let raw: InputsV1 = serde_yaml::from_value(raw.clone()).map_err(|e| {
        ProfileError::InvalidInput(format!("{label}: {e}"))
    })?;
    match raw {
        InputsV1::One(input) => Ok(std::iter::once(parse_input(&input)?).collect()),
        InputsV1::Many(inputs) => inputs.iter().map(|i| parse_input(i)).collect(),
    }
}

fn parse_settings(raw: &SettingsV1) -> Result<ManagerSettings, ProfileError> {
    let defaults = ManagerSettings::default();
    let settings = ManagerSettings {
        devices: raw.devices.unwrap_or(defaults.devices),
        controller_as_second_device: raw
            .controller_as_second_device
            .unwrap_or(defaults.controller_as_second_device),
        axis_deadzone: raw.axis_deadzone.unwrap_or(defaults.axis_deadzone),
        change_epsilon: raw.change_epsilon.unwrap_or(defaults.change_epsilon),
    };

    if settings.devices == 0 {
        return Err(ProfileError::InvalidSettings(
            "devices must be at least 1".to_string(),
        ));
    }
    if !(0.0..1.0).contains(&settings.axis_deadzone) {
        return Err(ProfileError::InvalidSettings(format!(
            "axis_deadzone must be in [0, 1), got {}",
            settings.axis_deadzone
        )));
    }
    if settings.change_epsilon.is_nan() || settings.change_epsilon < 0.0 {
        return Err(ProfileError::InvalidSettings(format!(
            "change_epsilon must not be negative, got {}",
            settings.change_epsilon
        )));
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_input_map;
    use impulse_input::{Axis, Button, Key};

    #[test]
    fn settings_override_defaults_field_by_field() {
        let yaml = r#"
version: 1
settings:
  devices: 4
  axis_deadzone: 0.1
actions: {}
"#;
        let document = parse_input_map(yaml).unwrap();
        assert_eq!(document.settings.devices, 4);
        assert_eq!(document.settings.axis_deadzone, 0.1);
        assert!(document.settings.controller_as_second_device);
        assert_eq!(
            document.settings.change_epsilon,
            ManagerSettings::default().change_epsilon
        );
    }

    #[test]
    fn invalid_settings_are_rejected() {
        for settings in [
            "devices: 0",
            "axis_deadzone: 1.0",
            "axis_deadzone: -0.1",
            "change_epsilon: -1",
        ] {
            let yaml = format!("version: 1\nsettings: {{ {settings} }}\n");
            assert!(
                matches!(
                    parse_input_map(&yaml),
                    Err(ProfileError::InvalidSettings(_))
                ),
                "{settings} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "version: 1\nbindings: {}\n";
        assert!(matches!(
            parse_input_map(yaml),
            Err(ProfileError::YamlDeserializeError(_))
        ));
        let yaml = "version: 1\nsettings: { players: 2 }\n";
        assert!(matches!(
            parse_input_map(yaml),
            Err(ProfileError::YamlDeserializeError(_))
        ));
    }

    #[test]
    fn single_and_empty_input_lists_are_accepted() {
        let yaml = r#"
version: 1
actions:
  jump+: key:space
  jump-:
  look_: [axis:right_y]
  fire: [button:rb]
"#;
        let document = parse_input_map(yaml).unwrap();
        let bindings = document.map.bindings();
        assert_eq!(bindings.len(), 4);
        assert_eq!(bindings[0].inputs.as_slice(), &[PhysicalInput::Key(Key::Space)]);
        assert!(bindings[1].inputs.is_empty());
        assert_eq!(
            bindings[2].inputs.as_slice(),
            &[PhysicalInput::GamepadAxis(Axis::RightY)]
        );
        assert_eq!(
            bindings[3].inputs.as_slice(),
            &[PhysicalInput::GamepadButton(Button::RightShoulder)]
        );
    }

    #[test]
    fn bad_identity_strings_are_rejected() {
        let yaml = "version: 1\nactions:\n  jump: [key:hyper]\n";
        assert!(matches!(
            parse_input_map(yaml),
            Err(ProfileError::InvalidInput(_))
        ));
        let yaml = "version: 1\nactions:\n  jump: [{ key: space }]\n";
        assert!(matches!(
            parse_input_map(yaml),
            Err(ProfileError::InvalidInput(_))
        ));
    }
}
