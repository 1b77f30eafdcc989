//! Scoring for a run, recomputed from scratch on every call.

use serde::{Deserialize, Serialize};

use crate::constants::{
    SCORE_BASE, SCORE_CRITICAL_PENALTY, SCORE_STABLE_BONUS, SCORE_TURN_PENALTY,
};
use crate::session::GameSession;

/// Scoring policy. The defaults reproduce the shipped balance; an explicit
/// policy lets the platform tune without touching the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub base: i32,
    pub turn_penalty: i32,
    pub critical_penalty: i32,
    pub stable_bonus: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: SCORE_BASE,
            turn_penalty: SCORE_TURN_PENALTY,
            critical_penalty: SCORE_CRITICAL_PENALTY,
            stable_bonus: SCORE_STABLE_BONUS,
        }
    }
}

/// Compute the current score with the default policy.
#[must_use]
pub fn compute_score(session: &GameSession) -> i32 {
    compute_score_with_weights(session, &ScoreWeights::default())
}

/// Compute the current score using an explicit policy. Pure function of the
/// turn count and the critical/stable counts, floored at zero.
#[must_use]
pub fn compute_score_with_weights(session: &GameSession, weights: &ScoreWeights) -> i32 {
    let turns = i32::try_from(session.turn_count).unwrap_or(i32::MAX);
    let critical = i32::try_from(session.vitals.critical_count()).unwrap_or(0);
    let stable = i32::try_from(session.vitals.stable_count()).unwrap_or(0);

    let mut total = weights.base;
    total = total.saturating_sub(weights.turn_penalty.saturating_mul(turns));
    total = total.saturating_sub(weights.critical_penalty.saturating_mul(critical));
    total = total.saturating_add(weights.stable_bonus.saturating_mul(stable));
    total.max(0)
}
