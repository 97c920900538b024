use std::path::Path;

use impulse_input::{RawEvent, RawPhase};
use serde::Deserialize;

use crate::v1::parse_input;
use crate::ProfileError;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TracePhase {
    Pressed,
    Released,
    Motion,
}

/// One recorded raw event.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TraceEvent {
    input: String,
    phase: TracePhase,
    #[serde(default)]
    value: Option<f32>,
    #[serde(default)]
    device: usize,
    #[serde(default)]
    echo: bool,
    #[serde(default = "default_actionable")]
    actionable: bool,
}

fn default_actionable() -> bool {
    true
}

impl TraceEvent {
    fn to_raw(&self, index: usize) -> Result<RawEvent, ProfileError> {
        let input = parse_input(&self.input)?;
        let (phase, magnitude) = match (self.phase, self.value) {
            (TracePhase::Pressed, value) => (RawPhase::Pressed, value.unwrap_or(1.0)),
            (TracePhase::Released, value) => (RawPhase::Released, value.unwrap_or(0.0)),
            (TracePhase::Motion, Some(value)) => (RawPhase::Motion, value),
            (TracePhase::Motion, None) => {
                return Err(ProfileError::InvalidTraceEvent {
                    index,
                    reason: "motion requires a value".to_string(),
                })
            }
        };

        let mut event = RawEvent::new(phase, input, magnitude).on(self.device);
        event.echo = self.echo;
        event.actionable = self.actionable;
        Ok(event)
    }
}

/// Parse a yaml list of recorded raw events.
pub fn parse_trace(input: &str) -> Result<Vec<RawEvent>, ProfileError> {
    let events: Vec<TraceEvent> = serde_yaml::from_str(input)?;
    events
        .iter()
        .enumerate()
        .map(|(index, event)| event.to_raw(index))
        .collect()
}

/// Read and parse a yaml event trace from disk.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<RawEvent>, ProfileError> {
    let input = std::fs::read_to_string(path)?;
    parse_trace(&input)
}
