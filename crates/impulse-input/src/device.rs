use std::cell::RefCell;

use ahash::AHashMap;

use crate::accumulator::Accumulator;
use crate::action::{Action, ActionId};
use crate::event::Edge;
use crate::identity::PhysicalInput;
use crate::registry::{Callback, Registration, SparseEventRegistry};

type ActionRegistry = SparseEventRegistry<ActionId, f32>;

/// One logical input source: the last known raw level of every physical input
/// it has seen, plus pressed, released and changed subscribers keyed by action.
///
/// A device only caches and dispatches. Deadzones and change thresholds are
/// applied before events reach it.
#[derive(Default)]
pub struct Device {
    raw: RefCell<AHashMap<PhysicalInput, f32>>,
    pressed: RefCell<ActionRegistry>,
    released: RefCell<ActionRegistry>,
    changed: RefCell<ActionRegistry>,
}

impl Device {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known raw magnitude of `input`, `0.0` if never seen.
    pub fn raw_value(&self, input: &PhysicalInput) -> f32 {
        self.raw.borrow().get(input).copied().unwrap_or(0.0)
    }

    pub(crate) fn set_raw_value(&self, input: PhysicalInput, magnitude: f32) {
        self.raw.borrow_mut().insert(input, magnitude);
    }

    fn registry(&self, edge: Edge) -> &RefCell<ActionRegistry> {
        match edge {
            Edge::Pressed => &self.pressed,
            Edge::Released => &self.released,
            Edge::Changed => &self.changed,
        }
    }

    /// Stores `magnitude` for `input`, recomputes `action` and notifies its
    /// subscribers. Edge events also notify the changed subscribers first.
    /// Returns the recomputed action value.
    pub fn ingest(
        &self,
        input: PhysicalInput,
        edge: Edge,
        action: &Action,
        magnitude: f32,
    ) -> f32 {
        self.set_raw_value(input, magnitude);
        let value = action.accumulate(self);

        if matches!(edge, Edge::Pressed | Edge::Released) {
            self.dispatch(Edge::Changed, action.id(), value);
        }
        self.dispatch(edge, action.id(), value);

        value
    }

    fn dispatch(&self, edge: Edge, action: ActionId, value: f32) {
        // The borrow must end before callbacks run; they may unsubscribe.
        let dispatch = self.registry(edge).borrow().snapshot(&action);
        dispatch.fire(value);
    }

    pub fn register_callback(
        &self,
        action: ActionId,
        edge: Edge,
        callback: Callback<f32>,
    ) -> Registration<f32> {
        self.registry(edge).borrow_mut().register(action, callback)
    }

    /// Removes the first subscription of `callback`. Unknown pairs are ignored.
    pub fn remove_callback(
        &self,
        action: ActionId,
        edge: Edge,
        callback: &Callback<f32>,
    ) -> bool {
        self.registry(edge).borrow_mut().remove(&action, callback)
    }

    pub(crate) fn remove_registration(
        &self,
        action: ActionId,
        edge: Edge,
        registration: &Registration<f32>,
    ) -> bool {
        self.registry(edge)
            .borrow_mut()
            .remove_registration(&action, registration)
    }

    /// Number of callbacks subscribed to `action` for `edge`.
    pub fn subscribers(&self, action: ActionId, edge: Edge) -> usize {
        self.registry(edge).borrow().subscribers(&action)
    }

    /// Actions that currently have at least one `edge` subscriber.
    pub fn subscribed_actions(&self, edge: Edge) -> Vec<ActionId> {
        let mut ids: Vec<ActionId> =
            self.registry(edge).borrow().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Read-only breakdown of every action's value on this device.
    pub fn report(&self, actions: &[Action]) -> DeviceReport {
        let actions = actions
            .iter()
            .map(|action| ActionReport {
                name: action.name().into(),
                value: action.accumulate(self),
                contributions: action
                    .accumulators()
                    .iter()
                    .map(|acc| (*acc, acc.map(self.raw_value(&acc.input))))
                    .collect(),
            })
            .collect();
        DeviceReport { actions }
    }
}

/// Snapshot of one device's action values, used by debug overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReport {
    pub actions: Vec<ActionReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub name: Box<str>,
    pub value: f32,
    /// Each accumulator with its current contribution.
    pub contributions: Vec<(Accumulator, f32)>,
}

impl DeviceReport {
    pub fn get(&self, name: &str) -> Option<&ActionReport> {
        self.actions.iter().find(|a| &*a.name == name)
    }
}
