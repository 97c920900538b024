use std::rc::Weak;

use smallvec::SmallVec;

use crate::action::ActionId;
use crate::event::Edge;
use crate::manager::Inner;
use crate::registry::Registration;

/// Handle to one callback registered through the manager.
///
/// Dropping the handle removes the callback. Removal is idempotent, so an
/// explicit `unsubscribe` followed by a drop is fine.
#[must_use = "dropping a subscription removes it immediately"]
pub struct Subscription {
    pub(crate) inner: Weak<Inner>,
    pub(crate) device: usize,
    pub(crate) action: ActionId,
    pub(crate) edge: Edge,
    pub(crate) registration: Option<Registration<f32>>,
}

impl Subscription {
    pub fn device(&self) -> usize {
        self.device
    }

    pub fn action(&self) -> ActionId {
        self.action
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(Registration::is_active)
    }

    /// Removes the callback now.
    pub fn close(self) {
        drop(self);
    }

    /// Releases the handle but keeps the callback registered for as long as
    /// the manager lives.
    pub fn detach(mut self) {
        self.registration = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registration) = self.registration.take() else {
            return;
        };
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let Some(device) = inner.devices.get(self.device) else {
            return;
        };
        if device.remove_registration(self.action, self.edge, &registration) {
            log::debug!(
                "removed {} subscription from \"{}\" on device {}",
                self.edge,
                inner.actions[self.action.index()].name(),
                self.device
            );
        }
    }
}

/// Two changed subscriptions combined into one signed axis callback.
#[must_use = "dropping a subscription removes it immediately"]
pub struct AxisSubscription {
    pub(crate) parts: SmallVec<[Subscription; 2]>,
}

impl AxisSubscription {
    pub fn is_active(&self) -> bool {
        self.parts.iter().all(Subscription::is_active)
    }

    pub fn close(self) {
        drop(self);
    }
}

/// Owner scope for subscriptions. Ending the lifetime, or dropping it,
/// removes exactly the subscriptions it holds.
#[derive(Default)]
pub struct Lifetime {
    subscriptions: Vec<Subscription>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn hold_axis(&mut self, axis: AxisSubscription) {
        self.subscriptions.extend(axis.parts);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Signals that the owner is gone.
    pub fn end(&mut self) {
        self.subscriptions.clear();
    }
}
