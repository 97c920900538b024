use std::fmt;

use crate::identity::PhysicalInput;

/// Sign rule applied to a raw magnitude before it is summed into an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// Contributes nothing.
    None,
    /// Contributes the raw magnitude.
    #[default]
    Positive,
    /// Contributes the negated raw magnitude.
    Negative,
    /// Passes an already signed analog value through unchanged.
    Range,
}

impl Polarity {
    /// Splits a raw action label into its canonical name and polarity.
    ///
    /// A trailing `+` means positive, `-` negative and `_` full range.
    /// Labels without a marker are positive.
    pub fn from_label(label: &str) -> (&str, Polarity) {
        let Some(marker) = label.chars().last() else {
            return (label, Polarity::Positive);
        };
        let polarity = match marker {
            '+' => Polarity::Positive,
            '-' => Polarity::Negative,
            '_' => Polarity::Range,
            _ => return (label, Polarity::Positive),
        };
        (&label[..label.len() - marker.len_utf8()], polarity)
    }

    fn symbol(self) -> &'static str {
        match self {
            Polarity::None => "0",
            Polarity::Positive => "+",
            Polarity::Negative => "-",
            Polarity::Range => "~",
        }
    }
}

/// Binds one physical input to an action with a polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accumulator {
    pub input: PhysicalInput,
    pub polarity: Polarity,
}

impl Accumulator {
    pub fn new(input: PhysicalInput, polarity: Polarity) -> Self {
        Self { input, polarity }
    }

    /// Converts a raw magnitude into this accumulator's signed contribution.
    #[inline]
    pub fn map(&self, raw: f32) -> f32 {
        match self.polarity {
            Polarity::None => 0.0,
            Polarity::Positive | Polarity::Range => raw,
            Polarity::Negative => -raw,
        }
    }
}

impl fmt::Display for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.polarity.symbol(), self.input)
    }
}
