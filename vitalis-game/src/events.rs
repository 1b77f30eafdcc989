//! Random perturbation events and their selection logic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::biomarker::BodySystem;
use crate::data::ContentError;
use crate::session::Difficulty;

/// How an event entered play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Random,
    Scheduled,
    Triggered,
}

/// Severity tier, a presentation hint only; the resolver applies the
/// effect values as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

/// Single adjustment carried by an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEffect {
    pub system: BodySystem,
    pub value: f64,
    #[serde(default)]
    pub duration: u32,
}

/// A perturbation drawn against the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    #[serde(default)]
    pub effects: Vec<EventEffect>,
    pub severity: EventSeverity,
}

/// Container for all event content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventData {
    pub events: Vec<GameEvent>,
}

impl EventData {
    /// Create empty event data (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Load event data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid event data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create event data from pre-parsed events
    #[must_use]
    pub fn from_events(events: Vec<GameEvent>) -> Self {
        Self { events }
    }

    /// Built-in perturbation table used when the platform supplies nothing.
    #[must_use]
    pub fn builtin() -> Self {
        fn event(
            id: &str,
            title: &str,
            severity: EventSeverity,
            effects: Vec<(BodySystem, f64)>,
            description: &str,
        ) -> GameEvent {
            GameEvent {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                kind: EventKind::Random,
                effects: effects
                    .into_iter()
                    .map(|(system, value)| EventEffect {
                        system,
                        value,
                        duration: 0,
                    })
                    .collect(),
                severity,
            }
        }

        Self::from_events(vec![
            event(
                "adrenaline_surge",
                "Adrenaline Surge",
                EventSeverity::Moderate,
                vec![
                    (BodySystem::Glucose, 20.0),
                    (BodySystem::Temperature, 0.3),
                ],
                "A stress response floods the bloodstream with fuel.",
            ),
            event(
                "skipped_meal",
                "Skipped Meal",
                EventSeverity::Mild,
                vec![(BodySystem::Glucose, -15.0)],
                "Hours without food and glucose starts to slide.",
            ),
            event(
                "fever_spike",
                "Fever Spike",
                EventSeverity::Severe,
                vec![(BodySystem::Temperature, 1.2)],
                "An immune response resets the thermostat upward.",
            ),
            event(
                "cold_exposure",
                "Cold Exposure",
                EventSeverity::Mild,
                vec![(BodySystem::Temperature, -0.8)],
                "A long wait outside drains core heat.",
            ),
            event(
                "lactic_buildup",
                "Lactic Buildup",
                EventSeverity::Severe,
                vec![(BodySystem::Ph, -0.25)],
                "Anaerobic exertion dumps lactate into the blood.",
            ),
            event(
                "hyperventilation",
                "Hyperventilation",
                EventSeverity::Moderate,
                vec![(BodySystem::Ph, 0.2)],
                "Panic breathing blows off CO2 and alkalizes the blood.",
            ),
        ])
    }

    /// Validate authoring invariants across the event table.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentError` found: duplicate ids or an event
    /// with no effects.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                return Err(ContentError::DuplicateEventId {
                    event_id: event.id.clone(),
                });
            }
            if event.effects.is_empty() {
                return Err(ContentError::EmptyEventEffects {
                    event_id: event.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Draw one event uniformly at random from the table. Returns `None` only
/// for an empty table.
pub fn pick_event<R: Rng>(data: &EventData, rng: &mut R) -> Option<GameEvent> {
    if data.events.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..data.events.len());
    data.events.get(idx).cloned()
}

/// One Bernoulli draw against the difficulty's event chance, used by the
/// caller to decide whether a turn ends with a perturbation.
pub fn event_roll<R: Rng>(difficulty: Difficulty, rng: &mut R) -> bool {
    rng.gen_range(0.0..1.0) < difficulty.event_chance()
}
