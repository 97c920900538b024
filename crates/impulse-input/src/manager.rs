use std::rc::{Rc, Weak};

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::accumulator::{Accumulator, Polarity};
use crate::action::{Action, ActionId};
use crate::device::{Device, DeviceReport};
use crate::error::{Error, Result};
use crate::event::{apply_deadzone, Edge, RawEvent};
use crate::identity::PhysicalInput;
use crate::map::InputMap;
use crate::registry::Callback;
use crate::settings::ManagerSettings;
use crate::subscription::{AxisSubscription, Lifetime, Subscription};

/// State shared by the manager and its subscription handles.
pub(crate) struct Inner {
    pub(crate) actions: Vec<Action>,
    pub(crate) names: AHashMap<Box<str>, ActionId>,
    pub(crate) lookup: AHashMap<PhysicalInput, ActionId>,
    pub(crate) devices: Vec<Device>,
}

impl Inner {
    fn compile(map: &InputMap, settings: &ManagerSettings) -> Result<Self> {
        let mut actions: Vec<Action> = Vec::new();
        let mut names: AHashMap<Box<str>, ActionId> = AHashMap::new();
        let mut lookup: AHashMap<PhysicalInput, ActionId> = AHashMap::new();
        let mut bound_by: AHashMap<PhysicalInput, &str> = AHashMap::new();

        for binding in map.bindings() {
            let (name, polarity) = Polarity::from_label(&binding.label);
            if name.is_empty() {
                return Err(Error::InvalidLabel(binding.label.clone()));
            }

            let id = match names.get(name) {
                Some(id) => *id,
                None => {
                    let id = ActionId(u32::try_from(actions.len()).map_err(|_| {
                        Error::InvalidLabel(binding.label.clone())
                    })?);
                    actions.push(Action::new(id, name));
                    names.insert(name.into(), id);
                    id
                }
            };

            for input in &binding.inputs {
                if let Some(first) = bound_by.insert(*input, binding.label.as_str()) {
                    return Err(Error::ConfigurationConflict {
                        input: *input,
                        first: first.to_string(),
                        second: binding.label.clone(),
                    });
                }
                lookup.insert(*input, id);
                actions[id.index()].push(Accumulator::new(*input, polarity));
            }
        }

        let devices = (0..settings.devices).map(|_| Device::new()).collect();

        Ok(Self {
            actions,
            names,
            lookup,
            devices,
        })
    }

    fn device(&self, index: usize) -> Result<&Device> {
        self.devices.get(index).ok_or(Error::IndexOutOfRange {
            index,
            devices: self.devices.len(),
        })
    }

    fn resolve(&self, name: &str) -> Result<ActionId> {
        self.names.get(name).copied().ok_or_else(|| {
            log::warn!("unknown action \"{name}\"");
            Error::NotFound(name.to_string())
        })
    }
}

/// Where an ingested event goes after classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub device: usize,
    pub edge: Edge,
    pub input: PhysicalInput,
    pub action: ActionId,
    /// Raw magnitude after the dead zone.
    pub magnitude: f32,
}

/// Routes raw physical events to per-device action subscribers.
///
/// The manager starts unbuilt. [`InputManager::build`] compiles an
/// [`InputMap`] into actions and devices once; every other runtime call
/// fails with [`Error::NotReady`] until then.
pub struct InputManager {
    settings: ManagerSettings,
    inner: Option<Rc<Inner>>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(ManagerSettings::default())
    }
}

impl InputManager {
    pub fn new(settings: ManagerSettings) -> Self {
        Self {
            settings,
            inner: None,
        }
    }

    /// Creates a manager and builds it from `map` in one step.
    pub fn from_map(map: &InputMap, settings: ManagerSettings) -> Result<Self> {
        let mut manager = Self::new(settings);
        manager.build(map)?;
        Ok(manager)
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_some()
    }

    /// Builds the action table and devices. Either everything is built or
    /// the manager stays unbuilt.
    pub fn build(&mut self, map: &InputMap) -> Result<()> {
        if self.inner.is_some() {
            return Err(Error::AlreadyBuilt);
        }

        let inner = Inner::compile(map, &self.settings)?;
        log::debug!(
            "built {} actions from {} bindings over {} devices",
            inner.actions.len(),
            map.len(),
            inner.devices.len()
        );
        self.inner = Some(Rc::new(inner));
        Ok(())
    }

    fn ready(&self) -> Result<&Rc<Inner>> {
        self.inner.as_ref().ok_or(Error::NotReady)
    }

    /// Works out which device, action and edge a raw event maps to.
    /// Returns `None` for events that must be discarded.
    pub fn classify(&self, event: &RawEvent) -> Result<Option<Route>> {
        let inner = self.ready()?;
        let Some(edge) = event.edge() else {
            return Ok(None);
        };

        let Some(action) = inner.lookup.get(&event.input).copied() else {
            log::trace!("discarding unbound input {}", event.input);
            return Ok(None);
        };

        let device = if self.settings.controller_as_second_device && event.input.is_gamepad() {
            event.source.checked_add(1).ok_or(Error::IndexOutOfRange {
                index: event.source,
                devices: inner.devices.len(),
            })?
        } else {
            event.source
        };

        let magnitude = if event.input.is_analog() {
            apply_deadzone(event.magnitude, self.settings.axis_deadzone)
        } else {
            event.magnitude
        };

        Ok(Some(Route {
            device,
            edge,
            input: event.input,
            action,
            magnitude,
        }))
    }

    /// Ingests one raw event and synchronously notifies the subscribers of
    /// the action it is bound to. Returns the action's new value, or `None`
    /// if the event was discarded.
    ///
    /// A panicking callback propagates out of this call and the remaining
    /// callbacks for that action are skipped.
    pub fn ingest(&self, event: RawEvent) -> Result<Option<f32>> {
        let Some(route) = self.classify(&event)? else {
            return Ok(None);
        };
        let inner = self.ready()?;
        let device = inner.device(route.device).inspect_err(|_| {
            log::warn!(
                "dropping {} from source {}: no device {}",
                route.input,
                event.source,
                route.device
            );
        })?;

        if route.edge == Edge::Changed {
            let previous = device.raw_value(&route.input);
            if (previous - route.magnitude).abs() < self.settings.change_epsilon {
                return Ok(None);
            }
        }

        let action = &inner.actions[route.action.index()];
        log::debug!(
            "{} {} -> \"{}\" ({}) on device {}",
            route.input,
            route.edge,
            action.name(),
            route.magnitude,
            route.device
        );
        Ok(Some(device.ingest(route.input, route.edge, action, route.magnitude)))
    }

    /// Subscribes `callback` to `edge` events of the named action on one
    /// device. The subscription lives as long as the returned handle.
    pub fn subscribe<F>(
        &self,
        action: &str,
        edge: Edge,
        device: usize,
        callback: F,
    ) -> Result<Subscription>
    where
        F: Fn(f32) + 'static,
    {
        self.subscribe_callback(action, edge, device, Rc::new(callback))
    }

    /// Like [`InputManager::subscribe`], with a shared callback that can
    /// later be passed to [`InputManager::unsubscribe`].
    pub fn subscribe_callback(
        &self,
        action: &str,
        edge: Edge,
        device: usize,
        callback: Callback<f32>,
    ) -> Result<Subscription> {
        let inner = self.ready()?;
        let id = inner.resolve(action)?;
        let target = inner.device(device)?;

        let registration = target.register_callback(id, edge, callback);
        log::debug!("subscribed {edge} callback to \"{action}\" on device {device}");

        Ok(Subscription {
            inner: Rc::downgrade(inner),
            device,
            action: id,
            edge,
            registration: Some(registration),
        })
    }

    /// Subscribes `callback` and ties the subscription to `owner`.
    pub fn subscribe_in<F>(
        &self,
        action: &str,
        edge: Edge,
        device: usize,
        owner: &mut Lifetime,
        callback: F,
    ) -> Result<()>
    where
        F: Fn(f32) + 'static,
    {
        let subscription = self.subscribe(action, edge, device, callback)?;
        owner.hold(subscription);
        Ok(())
    }

    /// Removes the first subscription of `callback`. Removing something that
    /// is not registered, including under an unknown action, does nothing.
    pub fn unsubscribe(
        &self,
        action: &str,
        edge: Edge,
        device: usize,
        callback: &Callback<f32>,
    ) -> Result<bool> {
        let inner = self.ready()?;
        let target = inner.device(device)?;
        let Some(id) = inner.names.get(action).copied() else {
            return Ok(false);
        };

        let removed = target.remove_callback(id, edge, callback);
        if removed {
            log::debug!("unsubscribed {edge} callback from \"{action}\" on device {device}");
        }
        Ok(removed)
    }

    /// Subscribes to a one-dimensional axis composed of two actions. The
    /// callback receives `positive - negative` whenever either changes.
    pub fn subscribe_axis<F>(
        &self,
        positive: &str,
        negative: &str,
        device: usize,
        callback: F,
    ) -> Result<AxisSubscription>
    where
        F: Fn(f32) + 'static,
    {
        let inner = self.ready()?;
        let positive_id = inner.resolve(positive)?;
        let negative_id = inner.resolve(negative)?;
        inner.device(device)?;

        let weak: Weak<Inner> = Rc::downgrade(inner);
        let combined: Callback<f32> = Rc::new(move |_: f32| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Some(device) = inner.devices.get(device) else {
                return;
            };
            let value = inner.actions[positive_id.index()].accumulate(device)
                - inner.actions[negative_id.index()].accumulate(device);
            callback(value);
        });

        let mut parts: SmallVec<[Subscription; 2]> = SmallVec::new();
        parts.push(self.subscribe_callback(
            positive,
            Edge::Changed,
            device,
            Rc::clone(&combined),
        )?);
        if negative_id != positive_id {
            parts.push(self.subscribe_callback(
                negative,
                Edge::Changed,
                device,
                combined,
            )?);
        }
        Ok(AxisSubscription { parts })
    }

    /// Current value of the named action on one device.
    pub fn current_value(&self, action: &str, device: usize) -> Result<f32> {
        let inner = self.ready()?;
        let id = inner.resolve(action)?;
        let device = inner.device(device)?;
        Ok(inner.actions[id.index()].accumulate(device))
    }

    /// All configured actions, in the order they were first bound.
    pub fn actions(&self) -> Result<&[Action]> {
        Ok(&self.ready()?.actions)
    }

    pub fn action(&self, name: &str) -> Result<&Action> {
        let inner = self.ready()?;
        let id = inner.resolve(name)?;
        Ok(&inner.actions[id.index()])
    }

    /// Action bound to a physical input, if any.
    pub fn action_for(&self, input: &PhysicalInput) -> Result<Option<&Action>> {
        let inner = self.ready()?;
        Ok(inner
            .lookup
            .get(input)
            .map(|id| &inner.actions[id.index()]))
    }

    pub fn device_count(&self) -> Result<usize> {
        Ok(self.ready()?.devices.len())
    }

    pub fn device(&self, index: usize) -> Result<&Device> {
        self.ready()?.device(index)
    }

    pub fn device_report(&self, index: usize) -> Result<DeviceReport> {
        let inner = self.ready()?;
        Ok(inner.device(index)?.report(&inner.actions))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::identity::{Axis, Button, Key};

    fn manager(map: &InputMap) -> InputManager {
        InputManager::from_map(map, ManagerSettings::default())
            .expect("map should build")
    }

    #[test]
    fn labels_with_same_name_share_one_action() {
        let map = InputMap::new()
            .bind("walk+", [Key::Char('d')])
            .bind("walk-", [Key::Char('a')])
            .bind("jump", [Key::Space]);
        let manager = manager(&map);

        let actions = manager.actions().unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].name(), "walk");
        assert_eq!(
            actions[0].accumulators(),
            &[
                Accumulator::new(PhysicalInput::Key(Key::Char('d')), Polarity::Positive),
                Accumulator::new(PhysicalInput::Key(Key::Char('a')), Polarity::Negative),
            ]
        );
    }

    #[test]
    fn duplicate_binding_is_a_conflict_and_leaves_manager_unbuilt() {
        let map = InputMap::new()
            .bind("jump", [Key::Space])
            .bind("fire", [Key::Space]);
        let mut manager = InputManager::default();

        let err = manager.build(&map).unwrap_err();
        assert_eq!(
            err,
            Error::ConfigurationConflict {
                input: PhysicalInput::Key(Key::Space),
                first: "jump".into(),
                second: "fire".into(),
            }
        );
        assert!(!manager.is_ready());
        assert!(matches!(manager.actions(), Err(Error::NotReady)));
    }

    #[test]
    fn empty_label_is_rejected() {
        let map = InputMap::new().bind("-", [Key::Tab]);
        let mut manager = InputManager::default();
        assert_eq!(manager.build(&map), Err(Error::InvalidLabel("-".into())));
    }

    #[test]
    fn building_twice_fails() {
        let map = InputMap::new().bind("jump", [Key::Space]);
        let mut manager = manager(&map);
        assert_eq!(manager.build(&map), Err(Error::AlreadyBuilt));
    }

    #[test]
    fn runtime_calls_fail_before_build() {
        let manager = InputManager::default();
        assert!(matches!(
            manager.ingest(RawEvent::key(Key::Space, true)),
            Err(Error::NotReady)
        ));
        assert!(matches!(
            manager.subscribe("jump", Edge::Pressed, 0, |_| {}),
            Err(Error::NotReady)
        ));
        assert!(matches!(
            manager.current_value("jump", 0),
            Err(Error::NotReady)
        ));
        assert_eq!(manager.device_count(), Err(Error::NotReady));
    }

    #[test]
    fn classify_moves_gamepad_events_to_next_device() {
        let map = InputMap::new()
            .bind("jump", [PhysicalInput::Key(Key::Space)])
            .bind("jump", [PhysicalInput::GamepadButton(Button::A)]);
        let manager = manager(&map);

        let key = manager
            .classify(&RawEvent::key(Key::Space, true))
            .unwrap()
            .unwrap();
        let pad = manager
            .classify(&RawEvent::button(Button::A, true))
            .unwrap()
            .unwrap();
        assert_eq!(key.device, 0);
        assert_eq!(pad.device, 1);
    }

    #[test]
    fn classify_keeps_source_when_policy_is_off() {
        let map = InputMap::new().bind("jump", [Button::A]);
        let settings = ManagerSettings {
            controller_as_second_device: false,
            ..ManagerSettings::default()
        };
        let manager = InputManager::from_map(&map, settings).unwrap();
        let route = manager
            .classify(&RawEvent::button(Button::A, true))
            .unwrap()
            .unwrap();
        assert_eq!(route.device, 0);
    }

    #[test]
    fn unbound_and_echo_events_are_discarded() {
        let map = InputMap::new().bind("jump", [Key::Space]);
        let manager = manager(&map);
        assert_eq!(manager.ingest(RawEvent::key(Key::Tab, true)), Ok(None));
        assert_eq!(manager.ingest(RawEvent::key(Key::Space, true).echo()), Ok(None));
        // Unbound events never reach a device, even an out-of-range one.
        assert_eq!(manager.ingest(RawEvent::key(Key::Tab, true).on(9)), Ok(None));
    }

    #[test]
    fn bound_event_for_missing_device_is_an_error() {
        let map = InputMap::new().bind("jump", [Button::A]);
        let manager = manager(&map);
        assert_eq!(
            manager.ingest(RawEvent::button(Button::A, true).on(1)),
            Err(Error::IndexOutOfRange { index: 2, devices: 2 })
        );
    }

    #[test]
    fn controller_on_last_source_index_is_out_of_range() {
        let map = InputMap::new()
            .bind("jump", [Key::Space])
            .bind("jump", [Button::A]);
        let manager = manager(&map);
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = manager
            .subscribe("jump", Edge::Pressed, 0, move |_| *counter.borrow_mut() += 1)
            .unwrap();

        assert_eq!(
            manager.ingest(RawEvent::button(Button::A, true).on(usize::MAX)),
            Err(Error::IndexOutOfRange {
                index: usize::MAX,
                devices: 2
            })
        );
        let cached = manager
            .device(0)
            .unwrap()
            .raw_value(&PhysicalInput::GamepadButton(Button::A));
        assert_eq!(cached, 0.0);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn motion_below_epsilon_is_suppressed() {
        let map = InputMap::new().bind("aim_", [Axis::RightX]);
        let manager = manager(&map);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = manager
            .subscribe("aim", Edge::Changed, 1, move |v| sink.borrow_mut().push(v))
            .unwrap();

        manager.ingest(RawEvent::axis(Axis::RightX, 0.5)).unwrap();
        manager.ingest(RawEvent::axis(Axis::RightX, 0.500_01)).unwrap();
        manager.ingest(RawEvent::axis(Axis::RightX, 0.1)).unwrap();
        manager.ingest(RawEvent::axis(Axis::RightX, 0.05)).unwrap();

        assert_eq!(*seen.borrow(), vec![0.5, 0.0]);
    }

    #[test]
    fn subscribe_to_unknown_action_or_device_fails() {
        let map = InputMap::new().bind("jump", [Key::Space]);
        let manager = manager(&map);
        assert!(matches!(
            manager.subscribe("dash", Edge::Pressed, 0, |_| {}),
            Err(Error::NotFound(name)) if name == "dash"
        ));
        assert!(matches!(
            manager.subscribe("jump", Edge::Pressed, 5, |_| {}),
            Err(Error::IndexOutOfRange { index: 5, devices: 2 })
        ));
    }

    #[test]
    fn explicit_unsubscribe_then_drop_is_idempotent() {
        let map = InputMap::new().bind("jump", [Key::Space]);
        let manager = manager(&map);
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let callback: Callback<f32> = Rc::new(move |_| *counter.borrow_mut() += 1);

        let sub = manager
            .subscribe_callback("jump", Edge::Pressed, 0, Rc::clone(&callback))
            .unwrap();
        assert_eq!(manager.unsubscribe("jump", Edge::Pressed, 0, &callback), Ok(true));
        assert!(!sub.is_active());
        drop(sub);
        assert_eq!(manager.unsubscribe("jump", Edge::Pressed, 0, &callback), Ok(false));
        assert_eq!(manager.unsubscribe("dash", Edge::Pressed, 0, &callback), Ok(false));

        manager.ingest(RawEvent::key(Key::Space, true)).unwrap();
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn action_for_resolves_bound_inputs() {
        let map = InputMap::new().bind("jump", [Key::Space]);
        let manager = manager(&map);
        let action = manager
            .action_for(&PhysicalInput::Key(Key::Space))
            .unwrap()
            .expect("space is bound");
        assert_eq!(action.name(), "jump");
        assert!(manager
            .action_for(&PhysicalInput::Key(Key::Tab))
            .unwrap()
            .is_none());
    }
}
