//! Card content model and authoring-time validation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use thiserror::Error;

use crate::biomarker::BodySystem;

/// Effect capacity stored inline without additional allocations.
pub type EffectList = SmallVec<[CardEffect; 4]>;

/// Broad card family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Action,
    Event,
}

/// Collectible rarity tier, used by the outer product surface for deck
/// composition and presentation; the resolver ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Declared application mode of an effect. Carried content: the resolver
/// applies instant semantics regardless, so `Continuous`/`Conditional` only
/// constrain validation today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    Instant,
    Continuous,
    Conditional,
}

/// Single signed adjustment against one regulated system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEffect {
    pub target_system: BodySystem,
    pub value: f64,
    #[serde(default)]
    pub kind: EffectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl CardEffect {
    #[must_use]
    pub fn instant(target_system: BodySystem, value: f64) -> Self {
        Self {
            target_system,
            value,
            kind: EffectKind::Instant,
            duration: None,
            condition: None,
        }
    }
}

/// An immutable content item. Only its placement (deck/hand/discard)
/// changes during play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub kind: CardKind,
    pub description: String,
    #[serde(default)]
    pub cost: u32,
    pub rarity: Rarity,
    #[serde(default)]
    pub effects: EffectList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_text: Option<String>,
}

/// Errors raised when content violates authoring invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("card {card_id} effect {index} has a zero value")]
    ZeroEffectValue { card_id: String, index: usize },
    #[error("card {card_id} effect {index} is continuous but carries no duration")]
    MissingDuration { card_id: String, index: usize },
    #[error("duplicate card id {card_id}")]
    DuplicateCardId { card_id: String },
    #[error("duplicate event id {event_id}")]
    DuplicateEventId { event_id: String },
    #[error("event {event_id} has no effects")]
    EmptyEventEffects { event_id: String },
    #[error("{system} normal range must lie strictly inside the critical range")]
    RangeNesting { system: BodySystem },
    #[error("{system} range has low {low} above high {high}")]
    InvertedRange {
        system: BodySystem,
        low: f64,
        high: f64,
    },
}

/// Container for all card content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CardData {
    pub cards: Vec<Card>,
}

impl CardData {
    /// Create empty card data (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Load card data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid card data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create card data from pre-parsed cards
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Built-in starter catalog used when the platform supplies nothing.
    #[must_use]
    pub fn builtin() -> Self {
        fn card(
            id: &str,
            name: &str,
            cost: u32,
            rarity: Rarity,
            effects: Vec<CardEffect>,
            description: &str,
            note: &str,
        ) -> Card {
            Card {
                id: id.to_string(),
                name: name.to_string(),
                kind: CardKind::Action,
                description: description.to_string(),
                cost,
                rarity,
                effects: EffectList::from_vec(effects),
                educational_note: Some(note.to_string()),
                flavor_text: None,
            }
        }

        Self::from_cards(vec![
            card(
                "insulin_shot",
                "Insulin Shot",
                2,
                Rarity::Common,
                vec![CardEffect::instant(BodySystem::Glucose, -30.0)],
                "Rapid-acting insulin drives glucose into cells.",
                "Insulin lowers blood glucose by promoting cellular uptake.",
            ),
            card(
                "glucose_tablet",
                "Glucose Tablet",
                1,
                Rarity::Common,
                vec![CardEffect::instant(BodySystem::Glucose, 25.0)],
                "Fast sugar for a crashing reading.",
                "Oral glucose is the first response to mild hypoglycemia.",
            ),
            card(
                "balanced_meal",
                "Balanced Meal",
                2,
                Rarity::Uncommon,
                vec![CardEffect::instant(BodySystem::Glucose, 10.0)],
                "Slow carbohydrates nudge glucose upward.",
                "Complex carbohydrates release glucose gradually.",
            ),
            card(
                "bicarbonate_drip",
                "Bicarbonate Drip",
                3,
                Rarity::Rare,
                vec![CardEffect::instant(BodySystem::Ph, 0.2)],
                "Buffer an acidic drift back toward neutral.",
                "Bicarbonate is the blood's main buffering system.",
            ),
            card(
                "controlled_breathing",
                "Controlled Breathing",
                1,
                Rarity::Common,
                vec![CardEffect::instant(BodySystem::Ph, -0.1)],
                "Slow the breath; retained CO2 acidifies the blood.",
                "CO2 dissolves into carbonic acid, lowering pH.",
            ),
            card(
                "cooling_blanket",
                "Cooling Blanket",
                2,
                Rarity::Common,
                vec![CardEffect::instant(BodySystem::Temperature, -1.0)],
                "Draw heat away from the skin.",
                "Conductive cooling counters fever and hyperthermia.",
            ),
            card(
                "warm_compress",
                "Warm Compress",
                1,
                Rarity::Common,
                vec![CardEffect::instant(BodySystem::Temperature, 0.8)],
                "Gentle external warming.",
                "External heat limits shivering's metabolic cost.",
            ),
            card(
                "glucagon_release",
                "Glucagon Release",
                3,
                Rarity::Rare,
                vec![CardEffect::instant(BodySystem::Glucose, 40.0)],
                "Signal the liver to dump stored glycogen.",
                "Glucagon is insulin's counter-regulatory hormone.",
            ),
            card(
                "homeostatic_reset",
                "Homeostatic Reset",
                5,
                Rarity::Epic,
                vec![
                    CardEffect::instant(BodySystem::Glucose, -10.0),
                    CardEffect::instant(BodySystem::Ph, 0.05),
                    CardEffect::instant(BodySystem::Temperature, -0.3),
                ],
                "A coordinated multi-system correction.",
                "Real regulation is simultaneous across organ systems.",
            ),
            card(
                "electrolyte_flush",
                "Electrolyte Flush",
                2,
                Rarity::Uncommon,
                vec![CardEffect::instant(BodySystem::Ph, 0.1)],
                "Rebalance the ions that carry the buffer load.",
                "Electrolyte balance and acid-base balance are coupled.",
            ),
        ])
    }

    /// Validate authoring invariants across the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentError` found: duplicate ids, zero-value
    /// effects, or continuous effects without a duration.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.id.as_str()) {
                return Err(ContentError::DuplicateCardId {
                    card_id: card.id.clone(),
                });
            }
            for (index, effect) in card.effects.iter().enumerate() {
                if effect.value == 0.0 {
                    return Err(ContentError::ZeroEffectValue {
                        card_id: card.id.clone(),
                        index,
                    });
                }
                if effect.kind == EffectKind::Continuous && effect.duration.is_none() {
                    return Err(ContentError::MissingDuration {
                        card_id: card.id.clone(),
                        index,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_data_from_json() {
        let json = r#"{
            "cards": [
                {
                    "id": "test1",
                    "name": "Test Card",
                    "kind": "action",
                    "description": "A test card",
                    "cost": 2,
                    "rarity": "rare",
                    "effects": [
                        {
                            "target_system": "glucose",
                            "value": -15.0
                        }
                    ]
                }
            ]
        }"#;

        let data = CardData::from_json(json).unwrap();
        assert_eq!(data.cards.len(), 1);
        assert_eq!(data.cards[0].name, "Test Card");
        assert_eq!(data.cards[0].rarity, Rarity::Rare);
        assert_eq!(data.cards[0].effects[0].target_system, BodySystem::Glucose);
        assert!((data.cards[0].effects[0].value - (-15.0)).abs() < f64::EPSILON);
        assert_eq!(data.cards[0].effects[0].kind, EffectKind::Instant);
    }

    #[test]
    fn unknown_target_system_is_rejected_at_parse_time() {
        let json = r#"{
            "cards": [
                {
                    "id": "bad",
                    "name": "Bad Card",
                    "kind": "action",
                    "description": "",
                    "rarity": "common",
                    "effects": [{ "target_system": "cortisol", "value": 1.0 }]
                }
            ]
        }"#;
        assert!(CardData::from_json(json).is_err());
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let data = CardData::builtin();
        assert!(!data.cards.is_empty());
        data.validate().expect("builtin content is valid");
    }

    #[test]
    fn validate_rejects_zero_value_effect() {
        let mut data = CardData::builtin();
        data.cards[0].effects[0].value = 0.0;
        let id = data.cards[0].id.clone();
        assert_eq!(
            data.validate(),
            Err(ContentError::ZeroEffectValue {
                card_id: id,
                index: 0
            })
        );
    }

    #[test]
    fn validate_rejects_continuous_without_duration() {
        let mut data = CardData::builtin();
        data.cards[1].effects[0].kind = EffectKind::Continuous;
        data.cards[1].effects[0].duration = None;
        assert!(matches!(
            data.validate(),
            Err(ContentError::MissingDuration { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut data = CardData::builtin();
        let twin = data.cards[0].clone();
        data.cards.push(twin);
        assert!(matches!(
            data.validate(),
            Err(ContentError::DuplicateCardId { .. })
        ));
    }
}
