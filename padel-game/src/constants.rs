//! Centralized balance and tuning constants for the Padel Clicker engine.
//!
//! The shipped upgrade table lives in [`crate::catalog`]; everything else that
//! shapes the economy or the store lifecycle is collected here so that it can
//! only change through reviewed code.

// Stat floors ----------------------------------------------------------------
/// Click power of a fresh game before any upgrades.
pub const BASE_CLICK_POWER: f64 = 1.0;
/// Passive income of a fresh game (passive timer disabled).
pub const BASE_AUTO_CLICK_POWER: f64 = 0.0;
/// Global multiplier of a fresh game.
pub const BASE_MULTIPLIER: f64 = 1.0;

// Store timers ---------------------------------------------------------------
/// Period of the passive-income tick, in milliseconds.
pub const TICK_PERIOD_MS: u64 = 1_000;
/// Period of the autosave, in milliseconds.
pub const SAVE_PERIOD_MS: u64 = 5_000;

// Persistence ----------------------------------------------------------------
/// Name of the single durable slot holding the save snapshot.
pub const SAVE_KEY: &str = "padel_clicker_save";
/// Extension used by file-backed slots.
pub(crate) const SLOT_FILE_EXTENSION: &str = "json";

// Display --------------------------------------------------------------------
/// Compact suffixes for [`crate::format::format_points`], smallest first.
pub(crate) const POINT_SUFFIXES: [(f64, &str); 4] = [
    (1_000.0, "K"),
    (1_000_000.0, "M"),
    (1_000_000_000.0, "B"),
    (1_000_000_000_000.0, "T"),
];
