use std::fmt;

use smallvec::SmallVec;

use crate::accumulator::Accumulator;
use crate::device::Device;

/// Dense index of an action inside the manager's action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) u32);

impl ActionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named logical action aggregated from one or more accumulators.
#[derive(Debug, Clone)]
pub struct Action {
    id: ActionId,
    name: Box<str>,
    accumulators: SmallVec<[Accumulator; 4]>,
}

impl Action {
    pub(crate) fn new(id: ActionId, name: &str) -> Self {
        Self {
            id,
            name: name.into(),
            accumulators: SmallVec::new(),
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accumulators in binding order.
    pub fn accumulators(&self) -> &[Accumulator] {
        &self.accumulators
    }

    pub(crate) fn push(&mut self, accumulator: Accumulator) {
        self.accumulators.push(accumulator);
    }

    /// Sums every accumulator's contribution against the device's raw values.
    pub fn accumulate(&self, device: &Device) -> f32 {
        self.accumulators
            .iter()
            .map(|acc| acc.map(device.raw_value(&acc.input)))
            .sum()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, acc) in self.accumulators.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{acc}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Polarity;
    use crate::identity::{Axis, Key, PhysicalInput};

    fn walk() -> Action {
        let mut action = Action::new(ActionId(0), "walk");
        action.push(Accumulator::new(
            PhysicalInput::Key(Key::Char('d')),
            Polarity::Positive,
        ));
        action.push(Accumulator::new(
            PhysicalInput::Key(Key::Char('a')),
            Polarity::Negative,
        ));
        action.push(Accumulator::new(
            PhysicalInput::GamepadAxis(Axis::LeftX),
            Polarity::Range,
        ));
        action
    }

    #[test]
    fn unseen_inputs_contribute_zero() {
        let device = Device::new();
        assert_eq!(walk().accumulate(&device), 0.0);
    }

    #[test]
    fn accumulate_sums_signed_contributions() {
        let device = Device::new();
        device.set_raw_value(PhysicalInput::Key(Key::Char('d')), 1.0);
        device.set_raw_value(PhysicalInput::GamepadAxis(Axis::LeftX), -0.5);
        assert_eq!(walk().accumulate(&device), 0.5);

        device.set_raw_value(PhysicalInput::Key(Key::Char('a')), 1.0);
        assert_eq!(walk().accumulate(&device), -0.5);
    }

    #[test]
    fn display_lists_accumulators_in_order() {
        assert_eq!(
            walk().to_string(),
            "walk [+key:d, -key:a, ~axis:left_x]"
        );
    }
}
