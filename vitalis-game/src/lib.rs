//! Vitalis Game Engine
//!
//! Platform-agnostic core game logic for the Vitalis homeostasis card game.
//! This crate provides all simulation rules without UI or platform-specific
//! dependencies.

pub mod biomarker;
pub mod constants;
pub mod data;
pub mod events;
pub mod resolver;
pub mod score;
pub mod session;

// Re-export commonly used types
pub use biomarker::{Biomarker, BiomarkerZone, BodySystem, Range, Trend, Vitals};
pub use data::{
    Card, CardData, CardEffect, CardKind, ContentError, EffectKind, EffectList, Rarity,
};
pub use events::{
    EventData, EventEffect, EventKind, EventSeverity, GameEvent, event_roll, pick_event,
};
pub use resolver::{
    BiomarkerChange, DrawOutcome, TurnOutcome, apply_event, check_game_end, draw_card,
    process_turn,
};
pub use score::{ScoreWeights, compute_score, compute_score_with_weights};
pub use session::{Difficulty, GameSession, GameStatus};

/// Trait for abstracting content loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the card catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the card data cannot be loaded.
    fn load_card_data(&self) -> Result<CardData, Self::Error>;

    /// Load the perturbation event table from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the event data cannot be loaded.
    fn load_event_data(&self) -> Result<EventData, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a session snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be saved.
    fn save_session(&self, name: &str, session: &GameSession) -> Result<(), Self::Error>;

    /// Load a session snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be loaded.
    fn load_session(&self, name: &str) -> Result<Option<GameSession>, Self::Error>;

    /// Delete a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_session(&self, name: &str) -> Result<(), Self::Error>;
}

/// Main game engine binding a content loader to a session store
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: SessionStore,
{
    data_loader: L,
    store: S,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: SessionStore,
{
    /// Create a new game engine with the provided data loader and store
    pub const fn new(data_loader: L, store: S) -> Self {
        Self { data_loader, store }
    }

    /// Create a fresh session with seeded vitals and a dealt starting deck
    ///
    /// # Errors
    ///
    /// Returns an error if the content tables cannot be loaded.
    pub fn new_session(
        &self,
        id: &str,
        player_id: &str,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<GameSession, L::Error> {
        let cards = self.data_loader.load_card_data()?;
        let events = self.data_loader.load_event_data()?;
        Ok(GameSession::new(
            id, player_id, difficulty, seed, &cards, events,
        ))
    }

    /// Save a session snapshot, stamping its save time
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be saved.
    pub fn save_session(&self, name: &str, session: &mut GameSession) -> Result<(), S::Error> {
        session.last_save = chrono::Utc::now();
        self.store.save_session(name, session)
    }

    /// Load a session snapshot and rehydrate its RNG and content table
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be loaded or rehydrated.
    pub fn load_session(&self, name: &str) -> Result<Option<GameSession>, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        if let Some(session) = self.store.load_session(name).map_err(Into::into)? {
            // Rehydrate with fresh content
            let events = self.data_loader.load_event_data().map_err(Into::into)?;
            Ok(Some(session.rehydrate(events)))
        } else {
            Ok(None)
        }
    }

    /// Delete a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_session(&self, name: &str) -> Result<(), S::Error> {
        self.store.delete_session(name)
    }
}
