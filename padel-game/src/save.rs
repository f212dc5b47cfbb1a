//! Persistence adapter: snapshot encoding, load with catalog reconciliation,
//! and best-effort saves.
//!
//! The slot holds the JSON form of [`GameState`]. Decoding is keyed by field
//! name only: unknown fields are ignored and missing ones fall back to the
//! values of a fresh game, so saves written by older or newer builds load.
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

use crate::GameStorage;
use crate::catalog::Catalog;
use crate::constants::{BASE_AUTO_CLICK_POWER, BASE_CLICK_POWER, BASE_MULTIPLIER};
use crate::numbers::{floor_f64_to_u32, floor_f64_to_u64, non_negative_finite};
use crate::state::GameState;

/// Errors surfaced by [`save`]. Callers log them; gameplay carries on.
#[derive(Debug, thiserror::Error)]
pub enum SaveError<E: std::error::Error + 'static> {
    #[error("failed to encode save: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write save slot: {0}")]
    Storage(#[source] E),
}

/// Lenient view of a save payload.
///
/// Every number is optional: a field that is missing, `null` or not a number
/// falls back to its fresh-game value without discarding the rest of the save.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SavedGame {
    #[serde(deserialize_with = "lenient_number")]
    points: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    total_points: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    click_power: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    auto_click_power: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    multiplier: Option<f64>,
    upgrades: Vec<SavedUpgrade>,
    #[serde(deserialize_with = "lenient_number")]
    total_clicks: Option<f64>,
}

/// Only the id and level of a saved upgrade matter; the rest comes from the catalog.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavedUpgrade {
    id: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    level: Option<f64>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Serialize the full game state for the slot.
///
/// # Errors
///
/// Returns an error if the state cannot be encoded as JSON.
pub fn encode(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Parse a save payload and reconcile it against `catalog`.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON object of the save shape.
pub fn decode(payload: &str, catalog: &Catalog) -> Result<GameState, serde_json::Error> {
    let saved: SavedGame = serde_json::from_str(payload)?;
    Ok(reconcile(saved, catalog))
}

/// Merge saved progress into the current catalog.
///
/// Catalog order and metadata win; saved levels are kept for ids the catalog
/// still ships, new ids start at 0 and retired ids are dropped. Scalars are
/// taken from the save as-is, so cached stats are not recomputed here.
fn reconcile(saved: SavedGame, catalog: &Catalog) -> GameState {
    let mut levels: HashMap<String, f64> = HashMap::new();
    for upgrade in saved.upgrades {
        if let Some(id) = upgrade.id {
            levels.entry(id).or_insert(upgrade.level.unwrap_or(0.0));
        }
    }

    let upgrades = catalog
        .iter()
        .map(|definition| {
            let level = levels
                .get(&definition.id)
                .map_or(0, |level| floor_f64_to_u32(*level));
            definition.at_level(level)
        })
        .collect();

    let dropped = levels
        .keys()
        .filter(|id| catalog.get(id).is_none())
        .count();
    if dropped > 0 {
        debug!("dropped {dropped} retired upgrade(s) from save");
    }

    GameState {
        points: saved.points.map_or(0.0, non_negative_finite),
        total_points: saved.total_points.map_or(0.0, non_negative_finite),
        click_power: saved.click_power.unwrap_or(BASE_CLICK_POWER),
        auto_click_power: saved.auto_click_power.unwrap_or(BASE_AUTO_CLICK_POWER),
        multiplier: saved.multiplier.unwrap_or(BASE_MULTIPLIER),
        upgrades,
        total_clicks: saved.total_clicks.map_or(0, floor_f64_to_u64),
    }
}

/// Restore the game from `key`, falling back to a fresh game.
///
/// A missing slot is a normal first run. An unreadable or corrupt slot is
/// logged and treated the same way; loading never fails.
pub fn load<S: GameStorage>(storage: &S, key: &str, catalog: &Catalog) -> GameState {
    let payload = match storage.read_slot(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            info!("no save in slot `{key}`, starting a new game");
            return GameState::new(catalog);
        }
        Err(err) => {
            warn!("failed to read save slot `{key}`: {err}");
            return GameState::new(catalog);
        }
    };

    match decode(&payload, catalog) {
        Ok(state) => {
            info!(
                "restored save from `{key}` ({} points, {} clicks)",
                state.points, state.total_clicks
            );
            state
        }
        Err(err) => {
            warn!("ignoring corrupt save in slot `{key}`: {err}");
            GameState::new(catalog)
        }
    }
}

/// Write `state` into `key`.
///
/// # Errors
///
/// Returns a [`SaveError`] if encoding or the storage write fails. The
/// in-memory state is never affected.
pub fn save<S: GameStorage>(
    storage: &S,
    key: &str,
    state: &GameState,
) -> Result<(), SaveError<S::Error>> {
    let payload = encode(state)?;
    storage.write_slot(key, &payload).map_err(SaveError::Storage)?;
    debug!("saved {} bytes to `{key}`", payload.len());
    Ok(())
}
