//! Padel Clicker Game Engine
//!
//! Platform-agnostic game-state engine for the Padel Clicker incremental game:
//! upgrade catalog, pricing, stat aggregation, click/buy/tick transitions and
//! the save-slot protocol. Rendering, animation and input handling live in the
//! host application, which drives the engine through [`GameStore`] (or
//! [`GameEngine`] when it runs its own event loop).

pub mod catalog;
pub mod config;
pub mod constants;
pub mod cost;
pub mod format;
pub mod numbers;
pub mod save;
pub mod state;
pub mod stats;
pub mod storage;
#[cfg(feature = "async")]
pub mod store;
pub mod view;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Effect, Upgrade};
pub use config::{ConfigError, StoreConfig};
pub use cost::upgrade_cost;
pub use format::format_points;
pub use save::SaveError;
pub use state::{GameState, Purchase, PurchaseError};
pub use stats::{Stats, aggregate};
pub use storage::{FileStorage, MemoryStorage, StorageError};
#[cfg(feature = "async")]
pub use store::{GameStore, Phase, StoreError};
pub use view::{Snapshot, UpgradeView};

/// Trait for abstracting the durable save slots.
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw payload stored under `key`, `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn read_slot(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be written.
    fn write_slot(&self, key: &str, payload: &str) -> Result<(), Self::Error>;

    /// Remove the payload stored under `key`. Clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be removed.
    fn clear_slot(&self, key: &str) -> Result<(), Self::Error>;
}

/// Synchronous engine for hosts that serialize transitions on their own loop
/// and call [`GameState::tick`] and [`GameEngine::save_game`] from their own
/// timers.
pub struct GameEngine<S>
where
    S: GameStorage,
{
    catalog: Catalog,
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    /// Create a new game engine over the provided catalog and storage
    pub const fn new(catalog: Catalog, storage: S) -> Self {
        Self { catalog, storage }
    }

    /// Engine over the shipped catalog.
    pub fn with_standard_catalog(storage: S) -> Self {
        Self::new(Catalog::standard().clone(), storage)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A fresh game with every upgrade at level 0.
    #[must_use]
    pub fn new_game(&self) -> GameState {
        GameState::new(&self.catalog)
    }

    /// Load and reconcile the game in `save_name`, or a fresh game.
    #[must_use]
    pub fn load_game(&self, save_name: &str) -> GameState {
        save::load(&self.storage, save_name, &self.catalog)
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be encoded or written.
    pub fn save_game(
        &self,
        save_name: &str,
        game_state: &GameState,
    ) -> Result<(), SaveError<S::Error>> {
        save::save(&self.storage, save_name, game_state)
    }

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.clear_slot(save_name)
    }
}
