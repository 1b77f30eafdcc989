//! Game session aggregate and lifecycle state.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::biomarker::Vitals;
use crate::constants::{
    EVENT_CHANCE_EASY, EVENT_CHANCE_HARD, EVENT_CHANCE_MEDIUM, LOG_SEED_SET, STARTING_HAND_SIZE,
};
use crate::data::{Card, CardData};
use crate::events::{EventData, GameEvent, event_roll, pick_event};
use crate::score::compute_score;

/// Lifecycle state of a match. The resolver only ever produces
/// `InProgress` -> `Victory`/`Defeat`; `Lobby` and `Paused` belong to the
/// outer product surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Lobby,
    #[default]
    InProgress,
    Victory,
    Defeat,
    Paused,
}

impl GameStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::InProgress => "in_progress",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Paused => "paused",
        }
    }

    /// Whether the match has ended; terminal states never regress.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty chosen at creation, immutable thereafter. Tunes only the
/// event frequency, never resolver arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Per-turn chance of a random perturbation event.
    #[must_use]
    pub const fn event_chance(self) -> f64 {
        match self {
            Self::Easy => EVENT_CHANCE_EASY,
            Self::Medium => EVENT_CHANCE_MEDIUM,
            Self::Hard => EVENT_CHANCE_HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// The aggregate root for one match. Mutated once per player action by the
/// resolver; every card dealt to the session lives in exactly one of
/// `hand`, `deck`, or `discard_pile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: String,
    pub player_id: String,
    #[serde(default)]
    pub status: GameStatus,
    pub vitals: Vitals,
    #[serde(default)]
    pub hand: Vec<Card>,
    #[serde(default)]
    pub deck: Vec<Card>,
    #[serde(default)]
    pub discard_pile: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_event: Option<GameEvent>,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub turn_count: u32,
    pub start_time: DateTime<Utc>,
    pub last_save: DateTime<Utc>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
    #[serde(skip)]
    pub events: Option<EventData>,
}

impl Default for GameSession {
    fn default() -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: String::new(),
            player_id: String::new(),
            status: GameStatus::InProgress,
            vitals: Vitals::starting(),
            hand: Vec::new(),
            deck: Vec::new(),
            discard_pile: Vec::new(),
            current_event: None,
            score: 0,
            turn_count: 0,
            start_time: now,
            last_save: now,
            difficulty: Difficulty::default(),
            seed: 0,
            logs: Vec::new(),
            rng: None,
            events: None,
        };
        session.score = compute_score(&session);
        session
    }
}

impl GameSession {
    /// Create a fresh session: seeded vitals, the starting deck dealt from
    /// the content table, and a deterministic RNG derived from the seed.
    #[must_use]
    pub fn new(
        id: &str,
        player_id: &str,
        difficulty: Difficulty,
        seed: u64,
        cards: &CardData,
        events: EventData,
    ) -> Self {
        let mut deck: Vec<Card> = cards.cards.clone();
        let dealt = STARTING_HAND_SIZE.min(deck.len());
        let hand: Vec<Card> = deck.drain(..dealt).collect();

        let mut session = Self {
            id: id.to_string(),
            player_id: player_id.to_string(),
            hand,
            deck,
            difficulty,
            ..Self::default()
        };
        session.seed = seed;
        session.rng = Some(ChaCha20Rng::seed_from_u64(seed));
        session.events = Some(events);
        session.logs.push(String::from(LOG_SEED_SET));
        session.score = compute_score(&session);
        session
    }

    /// Reattach the RNG and content table after deserialization.
    #[must_use]
    pub fn rehydrate(mut self, events: EventData) -> Self {
        self.rng = Some(ChaCha20Rng::seed_from_u64(self.seed));
        self.events = Some(events);
        self
    }

    /// Append a presentation log key.
    pub fn push_log(&mut self, key: &str) {
        self.logs.push(key.to_string());
    }

    /// Total cards dealt to this session across all three piles.
    #[must_use]
    pub fn dealt_card_count(&self) -> usize {
        self.hand.len() + self.deck.len() + self.discard_pile.len()
    }

    /// Roll against the difficulty's event chance using the session RNG.
    /// Always `false` when no RNG is attached.
    pub fn roll_for_event(&mut self) -> bool {
        let difficulty = self.difficulty;
        self.rng
            .as_mut()
            .is_some_and(|rng| event_roll(difficulty, rng))
    }

    /// Draw one perturbation uniformly from the attached event table.
    pub fn generate_event(&mut self) -> Option<GameEvent> {
        let events = self.events.as_ref()?;
        let rng = self.rng.as_mut()?;
        pick_event(events, rng)
    }
}
