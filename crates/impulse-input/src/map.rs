use smallvec::SmallVec;

use crate::identity::PhysicalInput;

/// Raw label with the physical inputs bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Action name with an optional polarity marker (`+`, `-` or `_`).
    pub label: String,
    pub inputs: SmallVec<[PhysicalInput; 4]>,
}

/// Ordered action-label to physical-input table the manager is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputMap {
    bindings: Vec<Binding>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, builder style.
    #[must_use]
    pub fn bind<I, T>(mut self, label: &str, inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PhysicalInput>,
    {
        self.push(label, inputs);
        self
    }

    pub fn push<I, T>(&mut self, label: &str, inputs: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<PhysicalInput>,
    {
        self.bindings.push(Binding {
            label: label.to_string(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
