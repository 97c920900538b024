use impulse_input::{Axis, Button, Key, PhysicalInput};

use crate::ProfileError;

/// Parse an identity string such as `key:space`, `button:a` or
/// `axis:left_x` into a physical input.
pub fn parse_input(raw: &str) -> Result<PhysicalInput, ProfileError> {
    let Some((kind, name)) = raw.split_once(':') else {
        return Err(ProfileError::InvalidInput(format!(
            "\"{raw}\" is not in <kind>:<name> form"
        )));
    };
    let name = name.trim().to_lowercase();
    Ok(match kind.trim() {
        "key" => PhysicalInput::Key(parse_key_name(&name)?),
        "button" => PhysicalInput::GamepadButton(parse_button_name(&name)?),
        "axis" => PhysicalInput::GamepadAxis(parse_axis_name(&name)?),
        other => {
            return Err(ProfileError::InvalidInput(format!(
                "unknown input kind \"{other}\" in \"{raw}\""
            )))
        }
    })
}

/// Parse a key name into a `Key` enum.
///
/// Single letters and digits map to [`Key::Char`], `code_<n>` to a raw
/// scancode.
pub fn parse_key_name(input: &str) -> Result<Key, ProfileError> {
    let mut chars = input.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            return Ok(Key::Char(ch));
        }
    }

    if let Some(code) = input.strip_prefix("code_") {
        return parse_scancode(code)
            .map(Key::Other)
            .ok_or_else(|| ProfileError::InvalidInput(format!("bad scancode \"{input}\"")));
    }

    Ok(match input {
        // Modifiers
        "ctrl" | "control" => Key::Control,
        "rctrl" => Key::RControl,
        "meta" | "cmd" | "command" | "super" => Key::Meta,
        "rmeta" | "rcmd" | "rcommand" | "rsuper" => Key::RMeta,
        "shift" => Key::Shift,
        "rshift" => Key::RShift,
        "alt" | "option" => Key::Alt,
        "ralt" | "roption" => Key::RAlt,

        // Navigation
        "home" => Key::Home,
        "end" => Key::End,
        "page_up" => Key::PageUp,
        "page_down" => Key::PageDown,
        "arrow_up" | "up" => Key::UpArrow,
        "arrow_down" | "down" => Key::DownArrow,
        "arrow_left" | "left" => Key::LeftArrow,
        "arrow_right" | "right" => Key::RightArrow,

        // Actions
        "insert" => Key::Insert,
        "delete" => Key::Delete,
        "backspace" => Key::Backspace,
        "escape" | "esc" => Key::Escape,
        "tab" => Key::Tab,
        "space" | "spacebar" => Key::Space,
        "enter" | "return" => Key::Return,

        // Special characters
        "'" | "quote" | "apostrophe" => Key::Apostrophe,
        ";" | "semicolon" => Key::Semicolon,
        "\\" | "backslash" => Key::Backslash,
        "`" | "grave" | "backtick" | "tilde" => Key::Grave,
        "." | "period" | "dot" => Key::Period,
        "," | "comma" => Key::Comma,
        "/" | "slash" => Key::Slash,
        "-" | "minus" => Key::Minus,
        "=" | "equal" => Key::Equal,

        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,

        _ => return Err(ProfileError::InvalidInput(format!("unknown key \"{input}\""))),
    })
}

fn parse_scancode(raw: &str) -> Option<u32> {
    match raw.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Parse a button name into a `Button` enum.
pub fn parse_button_name(name: &str) -> Result<Button, ProfileError> {
    Ok(match name {
        "a" => Button::A,
        "b" => Button::B,
        "x" => Button::X,
        "y" => Button::Y,

        "back" | "select" => Button::Back,
        "guide" | "home" => Button::Guide,
        "start" => Button::Start,

        "ls" | "left_stick" => Button::LeftStick,
        "rs" | "right_stick" => Button::RightStick,

        "lb" | "left_bumper" | "left_shoulder" | "l1" => Button::LeftShoulder,
        "rb" | "right_bumper" | "right_shoulder" | "r1" => Button::RightShoulder,

        "dpad_up" => Button::DPadUp,
        "dpad_down" => Button::DPadDown,
        "dpad_left" => Button::DPadLeft,
        "dpad_right" => Button::DPadRight,

        _ => {
            return Err(ProfileError::InvalidInput(format!(
                "unknown button \"{name}\""
            )))
        }
    })
}

/// Parse an axis name into an `Axis` enum. Triggers are axes, not buttons.
pub fn parse_axis_name(name: &str) -> Result<Axis, ProfileError> {
    Ok(match name {
        "left_x" | "lx" => Axis::LeftX,
        "left_y" | "ly" => Axis::LeftY,
        "right_x" | "rx" => Axis::RightX,
        "right_y" | "ry" => Axis::RightY,
        "left_trigger" | "lt" | "l2" => Axis::LeftTrigger,
        "right_trigger" | "rt" | "r2" => Axis::RightTrigger,
        _ => {
            return Err(ProfileError::InvalidInput(format!(
                "unknown axis \"{name}\""
            )))
        }
    })
}
