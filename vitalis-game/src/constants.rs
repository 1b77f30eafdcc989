//! Centralized balance and tuning constants for Vitalis game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "VITALIS_DEBUG_LOGS";
pub(crate) const LOG_SEED_SET: &str = "log.seed-set";
pub(crate) const LOG_CARD_PLAYED: &str = "log.card.played";
pub(crate) const LOG_DECK_RECYCLED: &str = "log.deck.recycled";
pub(crate) const LOG_EVENT_APPLIED: &str = "log.event.applied";
pub(crate) const LOG_BIOMARKER_CRITICAL: &str = "log.biomarker.critical";
pub(crate) const LOG_GAME_VICTORY: &str = "log.game.victory";
pub(crate) const LOG_GAME_DEFEAT: &str = "log.game.defeat";

// Biomarker seeding --------------------------------------------------------
pub(crate) const GLUCOSE_START: f64 = 90.0;
pub(crate) const GLUCOSE_NORMAL: (f64, f64) = (70.0, 110.0);
pub(crate) const GLUCOSE_CRITICAL: (f64, f64) = (50.0, 140.0);
pub(crate) const PH_START: f64 = 7.4;
pub(crate) const PH_NORMAL: (f64, f64) = (7.35, 7.45);
pub(crate) const PH_CRITICAL: (f64, f64) = (7.0, 7.8);
pub(crate) const TEMPERATURE_START: f64 = 37.0;
pub(crate) const TEMPERATURE_NORMAL: (f64, f64) = (36.5, 37.5);
pub(crate) const TEMPERATURE_CRITICAL: (f64, f64) = (35.0, 40.0);

// Classification -----------------------------------------------------------
/// Deltas strictly below this magnitude read as a flat trend.
pub(crate) const TREND_STABLE_EPSILON: f64 = 0.1;

// Termination --------------------------------------------------------------
pub(crate) const DEFEAT_CRITICAL_COUNT: usize = 2;
/// Victory requires strictly more turns than this floor.
pub(crate) const VICTORY_TURN_FLOOR: u32 = 5;

// Scoring ------------------------------------------------------------------
pub(crate) const SCORE_BASE: i32 = 1_000;
pub(crate) const SCORE_TURN_PENALTY: i32 = 10;
pub(crate) const SCORE_CRITICAL_PENALTY: i32 = 50;
pub(crate) const SCORE_STABLE_BONUS: i32 = 100;

// Card economy -------------------------------------------------------------
pub(crate) const STARTING_HAND_SIZE: usize = 5;

// Event tuning -------------------------------------------------------------
pub(crate) const EVENT_CHANCE_EASY: f64 = 0.15;
pub(crate) const EVENT_CHANCE_MEDIUM: f64 = 0.25;
pub(crate) const EVENT_CHANCE_HARD: f64 = 0.35;
