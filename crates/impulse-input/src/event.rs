use std::fmt;

use crate::identity::{Axis, Button, Key, PhysicalInput};

/// Which subscribers an ingested event notifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The input became active.
    Pressed,
    /// The input became inactive.
    Released,
    /// The magnitude changed. Also fired alongside every edge.
    Changed,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Pressed => "pressed",
            Edge::Released => "released",
            Edge::Changed => "changed",
        })
    }
}

/// Phase of a raw event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPhase {
    Pressed,
    Released,
    /// Analog motion without a press or release transition.
    Motion,
}

/// A raw physical event handed over by the capture layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    pub phase: RawPhase,
    /// Device index reported by the host.
    pub source: usize,
    pub input: PhysicalInput,
    pub magnitude: f32,
    /// Auto-repeat of a held key.
    pub echo: bool,
    /// Whether the host considers the event bindable at all.
    pub actionable: bool,
}

impl RawEvent {
    pub fn new(phase: RawPhase, input: PhysicalInput, magnitude: f32) -> Self {
        Self {
            phase,
            source: 0,
            input,
            magnitude,
            echo: false,
            actionable: true,
        }
    }

    /// Key press or release with the digital magnitude 1 or 0.
    pub fn key(key: Key, pressed: bool) -> Self {
        Self::digital(PhysicalInput::Key(key), pressed)
    }

    /// Gamepad button press or release with the digital magnitude 1 or 0.
    pub fn button(button: Button, pressed: bool) -> Self {
        Self::digital(PhysicalInput::GamepadButton(button), pressed)
    }

    /// Gamepad axis motion.
    pub fn axis(axis: Axis, value: f32) -> Self {
        Self::new(RawPhase::Motion, PhysicalInput::GamepadAxis(axis), value)
    }

    fn digital(input: PhysicalInput, pressed: bool) -> Self {
        if pressed {
            Self::new(RawPhase::Pressed, input, 1.0)
        } else {
            Self::new(RawPhase::Released, input, 0.0)
        }
    }

    #[must_use]
    pub fn on(mut self, source: usize) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn echo(mut self) -> Self {
        self.echo = true;
        self
    }

    #[must_use]
    pub fn non_actionable(mut self) -> Self {
        self.actionable = false;
        self
    }

    /// Edge this event maps to, or `None` for echoes and non-actionable events.
    pub fn edge(&self) -> Option<Edge> {
        if self.echo || !self.actionable {
            return None;
        }
        Some(match self.phase {
            RawPhase::Pressed => Edge::Pressed,
            RawPhase::Released => Edge::Released,
            RawPhase::Motion => Edge::Changed,
        })
    }
}

/// Clamps analog magnitudes whose absolute value is below `deadzone` to zero.
#[inline]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}
