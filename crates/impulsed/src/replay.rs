use std::cell::{Cell, RefCell};
use std::rc::Rc;

use impulse_input::{DeviceReport, Edge, Lifetime, RawEvent};
use impulse_workspace::InputDocument;

use crate::error::AppError;

const EDGES: [Edge; 3] = [Edge::Pressed, Edge::Released, Edge::Changed];

/// One callback invocation observed while replaying.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Index of the trace event that caused it.
    pub event: usize,
    pub device: usize,
    pub action: Box<str>,
    pub edge: Edge,
    pub value: f32,
}

#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub notifications: Vec<Notification>,
    pub reports: Vec<(usize, DeviceReport)>,
    pub routed: usize,
    /// Echoes, unbound inputs and motion below the change threshold.
    pub discarded: usize,
    pub failures: Vec<(usize, impulse_input::Error)>,
}

impl ReplayOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds a manager from `document`, observes every action and edge on the
/// selected devices, and ingests `events` in order.
///
/// Events that fail to route are recorded and the replay goes on.
pub fn replay(
    document: &InputDocument,
    events: &[RawEvent],
    device: Option<usize>,
) -> Result<ReplayOutcome, AppError> {
    let manager = document.build()?;
    let devices: Vec<usize> = match device {
        Some(index) => {
            manager.device(index)?;
            vec![index]
        }
        None => (0..manager.device_count()?).collect(),
    };

    let seen: Rc<RefCell<Vec<Notification>>> = Rc::new(RefCell::new(Vec::new()));
    let cursor = Rc::new(Cell::new(0usize));
    let mut observers = Lifetime::new();
    for action in manager.actions()? {
        for &index in &devices {
            for edge in EDGES {
                let seen = Rc::clone(&seen);
                let cursor = Rc::clone(&cursor);
                let name: Box<str> = action.name().into();
                manager.subscribe_in(
                    action.name(),
                    edge,
                    index,
                    &mut observers,
                    move |value| {
                        log::debug!(
                            "#{} \"{name}\" {edge} {value} on device {index}",
                            cursor.get()
                        );
                        seen.borrow_mut().push(Notification {
                            event: cursor.get(),
                            device: index,
                            action: name.clone(),
                            edge,
                            value,
                        });
                    },
                )?;
            }
        }
    }

    let mut outcome = ReplayOutcome::default();
    for (index, event) in events.iter().enumerate() {
        cursor.set(index);
        match manager.ingest(*event) {
            Ok(Some(_)) => outcome.routed += 1,
            Ok(None) => outcome.discarded += 1,
            Err(err) => {
                log::warn!("event #{index} ({}) failed: {err}", event.input);
                outcome.failures.push((index, err));
            }
        }
    }
    observers.end();

    outcome.notifications = seen.take();
    for index in devices {
        outcome.reports.push((index, manager.device_report(index)?));
    }
    Ok(outcome)
}

/// Renders a device report as one line per action.
pub fn format_report(report: &DeviceReport) -> Vec<String> {
    report
        .actions
        .iter()
        .map(|action| {
            let contributions = action
                .contributions
                .iter()
                .map(|(acc, value)| format!("{acc} {value:.2}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} = {:.2} [{contributions}]", action.name, action.value)
        })
        .collect()
}
