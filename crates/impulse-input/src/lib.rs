//! Routing of raw keyboard and gamepad signals to named, per-device actions.
//!
//! An [`InputManager`] is built once from an [`InputMap`]. Each raw event is
//! classified into a device, an [`Edge`] and the [`Action`] its physical
//! input is bound to, and the subscribers of that action run synchronously
//! inside [`InputManager::ingest`].

mod accumulator;
mod action;
mod device;
mod error;
mod event;
mod identity;
mod manager;
mod map;
mod registry;
mod settings;
mod subscription;

pub use crate::accumulator::{Accumulator, Polarity};
pub use crate::action::{Action, ActionId};
pub use crate::device::{ActionReport, Device, DeviceReport};
pub use crate::error::{Error, Result};
pub use crate::event::{apply_deadzone, Edge, RawEvent, RawPhase};
pub use crate::identity::{Axis, Button, Key, PhysicalInput};
pub use crate::manager::{InputManager, Route};
pub use crate::map::{Binding, InputMap};
pub use crate::registry::{Callback, Dispatch, Registration, SparseEventRegistry};
pub use crate::settings::{
    ManagerSettings, DEFAULT_AXIS_DEADZONE, DEFAULT_CHANGE_EPSILON,
};
pub use crate::subscription::{AxisSubscription, Lifetime, Subscription};
