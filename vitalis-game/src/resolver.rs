//! Turn resolution: card effects, the draw economy, event application, and
//! the termination rule.
//!
//! Every operation is copy-on-write: the caller's session is never mutated
//! and a fresh snapshot comes back, so the presentation layer can diff old
//! against new and the persistence client can store whichever it likes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::biomarker::BodySystem;
use crate::constants::{
    DEFEAT_CRITICAL_COUNT, LOG_BIOMARKER_CRITICAL, LOG_CARD_PLAYED, LOG_DECK_RECYCLED,
    LOG_EVENT_APPLIED, LOG_GAME_DEFEAT, LOG_GAME_VICTORY, VICTORY_TURN_FLOOR,
};
#[cfg(debug_assertions)]
use crate::constants::DEBUG_ENV_VAR;
use crate::data::Card;
use crate::events::GameEvent;
use crate::score::compute_score;
use crate::session::{GameSession, GameStatus};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Audit record for one effect application. Produced transiently per turn;
/// the caller decides whether to retain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerChange {
    pub timestamp: DateTime<Utc>,
    pub system: BodySystem,
    pub old_value: f64,
    pub new_value: f64,
    /// Always `new_value - old_value`.
    pub change: f64,
    pub reason: String,
}

/// Result of a resolved player turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session: GameSession,
    pub history: Vec<BiomarkerChange>,
}

/// Result of a draw attempt.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub session: GameSession,
    pub drawn: Option<Card>,
}

/// Classify the current state against the termination rule.
///
/// Defeat needs two simultaneous crises; a single excursion stays
/// recoverable. Victory needs every system inside its normal range with the
/// turn floor strictly exceeded.
#[must_use]
pub fn check_game_end(session: &GameSession) -> GameStatus {
    if session.vitals.critical_count() >= DEFEAT_CRITICAL_COUNT {
        return GameStatus::Defeat;
    }
    if session.vitals.all_stable() && session.turn_count > VICTORY_TURN_FLOOR {
        return GameStatus::Victory;
    }
    GameStatus::InProgress
}

/// Resolve one played card against the session.
///
/// Effects apply in list order with instant additive semantics; the card
/// moves from hand to discard (a card missing from the hand is still
/// discarded, by design); the turn counter advances by exactly one even for
/// an effectless card; the score is recomputed from scratch.
#[must_use]
pub fn process_turn(session: &GameSession, played: &Card) -> TurnOutcome {
    let mut next = session.clone();
    let mut history = Vec::with_capacity(played.effects.len());

    for effect in &played.effects {
        apply_adjustment(
            &mut next,
            effect.target_system,
            effect.value,
            format!("Card played: {}", played.name),
            &mut history,
        );
    }

    discard_played(&mut next, played);
    next.turn_count += 1;
    refresh_status(&mut next);
    next.score = compute_score(&next);
    next.push_log(LOG_CARD_PLAYED);

    TurnOutcome {
        session: next,
        history,
    }
}

/// Apply a perturbation event. Same adjustment semantics as a card, but an
/// event is not a player action: the turn counter does not advance.
#[must_use]
pub fn apply_event(session: &GameSession, event: &GameEvent) -> TurnOutcome {
    let mut next = session.clone();
    let mut history = Vec::with_capacity(event.effects.len());

    for effect in &event.effects {
        apply_adjustment(
            &mut next,
            effect.system,
            effect.value,
            format!("Event: {}", event.title),
            &mut history,
        );
    }

    next.current_event = Some(event.clone());
    next.score = compute_score(&next);
    next.push_log(LOG_EVENT_APPLIED);

    TurnOutcome {
        session: next,
        history,
    }
}

/// Draw the top card of the deck into the hand. An empty deck first
/// recycles the discard pile in accumulation order; only when both piles
/// are empty does the draw come back empty, with the session untouched.
#[must_use]
pub fn draw_card(session: &GameSession) -> DrawOutcome {
    let mut next = session.clone();
    let mut recycled = false;

    if next.deck.is_empty() && !next.discard_pile.is_empty() {
        next.deck = std::mem::take(&mut next.discard_pile);
        recycled = true;
    }

    if next.deck.is_empty() {
        return DrawOutcome {
            session: session.clone(),
            drawn: None,
        };
    }

    let card = next.deck.remove(0);
    next.hand.push(card.clone());
    if recycled {
        next.push_log(LOG_DECK_RECYCLED);
    }

    DrawOutcome {
        session: next,
        drawn: Some(card),
    }
}

fn apply_adjustment(
    session: &mut GameSession,
    system: BodySystem,
    value: f64,
    reason: String,
    history: &mut Vec<BiomarkerChange>,
) {
    let marker = session.vitals.get_mut(system);
    let old_value = marker.current_value;
    let was_critical = marker.is_critical;
    marker.apply_delta(value);
    let new_value = marker.current_value;
    let timestamp = marker.last_update;
    let turned_critical = !was_critical && marker.is_critical;

    if debug_log_enabled() {
        println!("{reason} | {system} {old_value} -> {new_value}");
    }

    if turned_critical {
        session.push_log(LOG_BIOMARKER_CRITICAL);
    }
    history.push(BiomarkerChange {
        timestamp,
        system,
        old_value,
        new_value,
        change: new_value - old_value,
        reason,
    });

    refresh_status(session);
}

fn discard_played(session: &mut GameSession, played: &Card) {
    if let Some(pos) = session.hand.iter().position(|card| card.id == played.id) {
        let card = session.hand.remove(pos);
        session.discard_pile.push(card);
    } else {
        // Permissive: a card outside the hand is still discarded.
        if debug_log_enabled() {
            println!("discarding card {} not present in hand", played.id);
        }
        session.discard_pile.push(played.clone());
    }
}

/// Re-evaluate the termination rule while the session is still live.
/// Victory and Defeat latch; nothing moves a finished match back.
fn refresh_status(session: &mut GameSession) {
    if session.status != GameStatus::InProgress {
        return;
    }
    let next = check_game_end(session);
    match next {
        GameStatus::Victory => session.push_log(LOG_GAME_VICTORY),
        GameStatus::Defeat => session.push_log(LOG_GAME_DEFEAT),
        _ => {}
    }
    session.status = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CardEffect, CardKind, EffectList, Rarity};
    use crate::events::{EventEffect, EventKind, EventSeverity};

    fn make_card(id: &str, effects: Vec<CardEffect>) -> Card {
        Card {
            id: id.to_string(),
            name: format!("Card {id}"),
            kind: CardKind::Action,
            description: String::new(),
            cost: 1,
            rarity: Rarity::Common,
            effects: EffectList::from_vec(effects),
            educational_note: None,
            flavor_text: None,
        }
    }

    fn make_event(id: &str, effects: Vec<(BodySystem, f64)>) -> GameEvent {
        GameEvent {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: String::new(),
            kind: EventKind::Random,
            effects: effects
                .into_iter()
                .map(|(system, value)| EventEffect {
                    system,
                    value,
                    duration: 0,
                })
                .collect(),
            severity: EventSeverity::Moderate,
        }
    }

    #[test]
    fn ghost_card_is_still_discarded() {
        let session = GameSession::default();
        let card = make_card("ghost", vec![]);
        assert!(session.hand.is_empty());

        let outcome = process_turn(&session, &card);
        assert_eq!(outcome.session.discard_pile.len(), 1);
        assert_eq!(outcome.session.discard_pile[0].id, "ghost");
        assert!(outcome.session.hand.is_empty());
        assert_eq!(outcome.session.turn_count, 1);
        assert!(outcome.history.is_empty());
    }

    #[test]
    fn played_card_moves_from_hand_by_id() {
        let mut session = GameSession::default();
        session.hand = vec![make_card("a", vec![]), make_card("b", vec![])];

        let played = session.hand[1].clone();
        let outcome = process_turn(&session, &played);
        assert_eq!(outcome.session.hand.len(), 1);
        assert_eq!(outcome.session.hand[0].id, "a");
        assert_eq!(outcome.session.discard_pile.len(), 1);
        assert_eq!(outcome.session.discard_pile[0].id, "b");
    }

    #[test]
    fn input_session_is_never_mutated() {
        let mut session = GameSession::default();
        session.hand = vec![make_card(
            "push",
            vec![CardEffect::instant(BodySystem::Glucose, -10.0)],
        )];
        let played = session.hand[0].clone();

        let before = serde_json::to_value(&session).expect("serialize");
        let _ = process_turn(&session, &played);
        let after = serde_json::to_value(&session).expect("serialize");
        assert_eq!(before, after);
    }

    #[test]
    fn terminal_status_latches_across_further_turns() {
        let mut session = GameSession::default();
        session.vitals.get_mut(BodySystem::Glucose).set_value(40.0);
        session.vitals.get_mut(BodySystem::Ph).set_value(6.5);

        let defeat = process_turn(&session, &make_card("noop", vec![]));
        assert_eq!(defeat.session.status, GameStatus::Defeat);

        // A heal that clears both crises cannot revive a finished match.
        let heal = make_card(
            "heal",
            vec![
                CardEffect::instant(BodySystem::Glucose, 50.0),
                CardEffect::instant(BodySystem::Ph, 0.9),
            ],
        );
        let after = process_turn(&defeat.session, &heal);
        assert_eq!(after.session.status, GameStatus::Defeat);
        assert_eq!(after.session.turn_count, 2, "turn counter still advances");
        assert_eq!(after.history.len(), 2);
    }

    #[test]
    fn mid_card_double_crisis_latches_defeat() {
        let mut session = GameSession::default();
        session.vitals.get_mut(BodySystem::Glucose).set_value(45.0);

        // First effect drives pH critical too, second heals it again; the
        // defeat latched between them stands.
        let card = make_card(
            "spike_then_heal",
            vec![
                CardEffect::instant(BodySystem::Ph, -0.6),
                CardEffect::instant(BodySystem::Ph, 0.6),
            ],
        );
        let outcome = process_turn(&session, &card);
        assert_eq!(outcome.session.status, GameStatus::Defeat);
    }

    #[test]
    fn event_application_keeps_turn_count() {
        let session = GameSession::default();
        let event = make_event(
            "surge",
            vec![(BodySystem::Glucose, 20.0), (BodySystem::Temperature, 0.3)],
        );

        let outcome = apply_event(&session, &event);
        assert_eq!(outcome.session.turn_count, 0);
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(
            outcome.session.current_event.as_ref().map(|e| e.id.as_str()),
            Some("surge")
        );
        assert!((outcome.history[0].change - 20.0).abs() < f64::EPSILON);
        assert!(
            outcome
                .session
                .logs
                .iter()
                .any(|entry| entry == LOG_EVENT_APPLIED)
        );
    }

    #[test]
    fn critical_transition_is_logged_once() {
        let mut session = GameSession::default();
        session.hand = vec![make_card(
            "crash",
            vec![CardEffect::instant(BodySystem::Glucose, -45.0)],
        )];
        let played = session.hand[0].clone();

        let outcome = process_turn(&session, &played);
        let hits = outcome
            .session
            .logs
            .iter()
            .filter(|entry| entry.as_str() == LOG_BIOMARKER_CRITICAL)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn recycle_preserves_discard_order() {
        let mut session = GameSession::default();
        session.discard_pile = vec![make_card("x", vec![]), make_card("y", vec![])];

        let outcome = draw_card(&session);
        assert_eq!(outcome.drawn.as_ref().map(|c| c.id.as_str()), Some("x"));
        assert_eq!(outcome.session.deck.len(), 1);
        assert_eq!(outcome.session.deck[0].id, "y");
        assert!(outcome.session.discard_pile.is_empty());
        assert!(
            outcome
                .session
                .logs
                .iter()
                .any(|entry| entry == LOG_DECK_RECYCLED)
        );
    }

    #[test]
    fn exhausted_piles_yield_no_card_and_no_change() {
        let session = GameSession::default();
        let before = serde_json::to_value(&session).expect("serialize");

        let outcome = draw_card(&session);
        assert!(outcome.drawn.is_none());
        let after = serde_json::to_value(&outcome.session).expect("serialize");
        assert_eq!(before, after);
    }
}
