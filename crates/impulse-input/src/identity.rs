use std::fmt;

/// Keyboard keys that can be bound to actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, identified by its lowercase character.
    Char(char),
    Control,
    RControl,
    Meta,
    RMeta,
    Shift,
    RShift,
    Alt,
    RAlt,
    Home,
    End,
    PageUp,
    PageDown,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Insert,
    Delete,
    Backspace,
    Escape,
    Tab,
    Space,
    Return,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    Apostrophe,
    Semicolon,
    Backslash,
    Grave,
    Comma,
    Period,
    Slash,
    Minus,
    Equal,

    /// A raw physical scancode with no named variant.
    Other(u32),
}

impl Key {
    /// Canonical lowercase name of the key.
    pub fn name(&self) -> String {
        let name = match self {
            Key::Char(ch) => return ch.to_string(),
            Key::Other(code) => return format!("code_{code}"),
            Key::Control => "ctrl",
            Key::RControl => "rctrl",
            Key::Meta => "meta",
            Key::RMeta => "rmeta",
            Key::Shift => "shift",
            Key::RShift => "rshift",
            Key::Alt => "alt",
            Key::RAlt => "ralt",
            Key::Home => "home",
            Key::End => "end",
            Key::PageUp => "page_up",
            Key::PageDown => "page_down",
            Key::UpArrow => "arrow_up",
            Key::DownArrow => "arrow_down",
            Key::LeftArrow => "arrow_left",
            Key::RightArrow => "arrow_right",
            Key::Insert => "insert",
            Key::Delete => "delete",
            Key::Backspace => "backspace",
            Key::Escape => "escape",
            Key::Tab => "tab",
            Key::Space => "space",
            Key::Return => "enter",
            Key::F1 => "f1",
            Key::F2 => "f2",
            Key::F3 => "f3",
            Key::F4 => "f4",
            Key::F5 => "f5",
            Key::F6 => "f6",
            Key::F7 => "f7",
            Key::F8 => "f8",
            Key::F9 => "f9",
            Key::F10 => "f10",
            Key::F11 => "f11",
            Key::F12 => "f12",
            Key::Apostrophe => "apostrophe",
            Key::Semicolon => "semicolon",
            Key::Backslash => "backslash",
            Key::Grave => "grave",
            Key::Comma => "comma",
            Key::Period => "period",
            Key::Slash => "slash",
            Key::Minus => "minus",
            Key::Equal => "equal",
        };
        name.to_string()
    }
}

/// Gamepad buttons, using the standard controller layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl Button {
    pub fn name(&self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::X => "x",
            Button::Y => "y",
            Button::Back => "back",
            Button::Guide => "guide",
            Button::Start => "start",
            Button::LeftStick => "ls",
            Button::RightStick => "rs",
            Button::LeftShoulder => "lb",
            Button::RightShoulder => "rb",
            Button::DPadUp => "dpad_up",
            Button::DPadDown => "dpad_down",
            Button::DPadLeft => "dpad_left",
            Button::DPadRight => "dpad_right",
        }
    }
}

/// Gamepad analog axes. Stick values are in [-1.0, 1.0], triggers in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Axis::LeftX => "left_x",
            Axis::LeftY => "left_y",
            Axis::RightX => "right_x",
            Axis::RightY => "right_y",
            Axis::LeftTrigger => "left_trigger",
            Axis::RightTrigger => "right_trigger",
        }
    }
}

/// One raw signal source reported by the host: a key, a gamepad axis or a
/// gamepad button. Equality and hashing are structural over variant and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalInput {
    Key(Key),
    GamepadAxis(Axis),
    GamepadButton(Button),
}

impl PhysicalInput {
    /// Whether the input comes from a gamepad rather than the keyboard.
    pub fn is_gamepad(&self) -> bool {
        match self {
            PhysicalInput::Key(_) => false,
            PhysicalInput::GamepadAxis(_) | PhysicalInput::GamepadButton(_) => true,
        }
    }

    /// Whether the input reports a continuous magnitude.
    pub fn is_analog(&self) -> bool {
        match self {
            PhysicalInput::GamepadAxis(_) => true,
            PhysicalInput::Key(_) | PhysicalInput::GamepadButton(_) => false,
        }
    }
}

impl From<Key> for PhysicalInput {
    fn from(key: Key) -> Self {
        PhysicalInput::Key(key)
    }
}

impl From<Axis> for PhysicalInput {
    fn from(axis: Axis) -> Self {
        PhysicalInput::GamepadAxis(axis)
    }
}

impl From<Button> for PhysicalInput {
    fn from(button: Button) -> Self {
        PhysicalInput::GamepadButton(button)
    }
}

impl fmt::Display for PhysicalInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalInput::Key(key) => write!(f, "key:{}", key.name()),
            PhysicalInput::GamepadAxis(axis) => write!(f, "axis:{}", axis.name()),
            PhysicalInput::GamepadButton(button) => {
                write!(f, "button:{}", button.name())
            }
        }
    }
}
