//! Game state and its transitions: click, buy, passive-income tick.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Upgrade};
use crate::constants::{BASE_AUTO_CLICK_POWER, BASE_CLICK_POWER, BASE_MULTIPLIER};
use crate::stats::{Stats, aggregate};

/// Reason a purchase was rejected. A rejected purchase never changes state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PurchaseError {
    #[error("unknown upgrade `{id}`")]
    UnknownUpgrade { id: String },
    #[error("upgrade `{id}` is already at max level {max_level}")]
    MaxLevel { id: String, max_level: u32 },
    #[error("upgrade `{id}` costs {cost} but only {points} points are available")]
    InsufficientPoints { id: String, cost: f64, points: f64 },
}

/// Receipt for a successful purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: String,
    /// Points deducted.
    pub cost: f64,
    /// Level reached by the purchase.
    pub level: u32,
}

/// Full game state, serialized verbatim into the save slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Spendable balance, never negative.
    pub points: f64,
    /// Lifetime earnings; spending never lowers it.
    pub total_points: f64,
    pub click_power: f64,
    pub auto_click_power: f64,
    pub multiplier: f64,
    /// One entry per catalog upgrade, in catalog order.
    pub upgrades: Vec<Upgrade>,
    pub total_clicks: u64,
}

impl GameState {
    /// Fresh game: floor stats, every upgrade at level 0.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            points: 0.0,
            total_points: 0.0,
            click_power: BASE_CLICK_POWER,
            auto_click_power: BASE_AUTO_CLICK_POWER,
            multiplier: BASE_MULTIPLIER,
            upgrades: catalog.fresh_upgrades(),
            total_clicks: 0,
        }
    }

    /// Cached aggregate stats as currently stored.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        Stats {
            click_power: self.click_power,
            auto_click_power: self.auto_click_power,
            multiplier: self.multiplier,
        }
    }

    #[must_use]
    pub fn points_per_click(&self) -> f64 {
        self.stats().points_per_click()
    }

    #[must_use]
    pub fn points_per_second(&self) -> f64 {
        self.stats().points_per_second()
    }

    /// Whether the passive-income timer should be running.
    #[must_use]
    pub fn earns_passively(&self) -> bool {
        self.auto_click_power > 0.0
    }

    #[must_use]
    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// Register one manual click, returning the points it earned.
    pub fn click(&mut self) -> f64 {
        let earned = self.points_per_click();
        self.points += earned;
        self.total_points += earned;
        self.total_clicks += 1;
        earned
    }

    /// Buy the next level of upgrade `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PurchaseError`] when the id is unknown, the upgrade is
    /// maxed, or the balance cannot cover the cost. State is untouched then.
    pub fn buy(&mut self, id: &str) -> Result<Purchase, PurchaseError> {
        let index = self
            .upgrades
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| PurchaseError::UnknownUpgrade { id: id.to_string() })?;

        let upgrade = &self.upgrades[index];
        if upgrade.is_maxed() {
            return Err(PurchaseError::MaxLevel {
                id: id.to_string(),
                max_level: upgrade.max_level,
            });
        }
        let cost = upgrade.next_cost();
        if self.points < cost {
            return Err(PurchaseError::InsufficientPoints {
                id: id.to_string(),
                cost,
                points: self.points,
            });
        }

        self.points -= cost;
        self.upgrades[index].level += 1;
        self.refresh_stats();

        Ok(Purchase {
            id: id.to_string(),
            cost,
            level: self.upgrades[index].level,
        })
    }

    /// Apply one passive-income tick, returning the points it earned.
    pub fn tick(&mut self) -> f64 {
        if !self.earns_passively() {
            return 0.0;
        }
        let earned = self.points_per_second();
        self.points += earned;
        self.total_points += earned;
        earned
    }

    fn refresh_stats(&mut self) {
        let stats = aggregate(&self.upgrades);
        self.click_power = stats.click_power;
        self.auto_click_power = stats.auto_click_power;
        self.multiplier = stats.multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Effect, test_upgrade};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            test_upgrade("grip", Effect::ClickPower, 1.0, 2),
            test_upgrade("machine", Effect::AutoClick, 2.0, 5),
            test_upgrade("coach", Effect::Multiplier, 0.5, 5),
        ])
        .unwrap()
    }

    #[test]
    fn fresh_state_has_floor_stats() {
        let state = GameState::new(&catalog());
        assert!(state.points.abs() < f64::EPSILON);
        assert_eq!(state.stats(), Stats::default());
        assert_eq!(state.upgrades.len(), 3);
        assert!(state.upgrades.iter().all(|u| u.level == 0));
        assert!(!state.earns_passively());
    }

    #[test]
    fn click_applies_multiplier_at_click_time() {
        let mut state = GameState::new(&catalog());
        state.click_power = 3.0;
        state.multiplier = 2.0;
        let earned = state.click();
        assert!((earned - 6.0).abs() < f64::EPSILON);
        assert!((state.points - 6.0).abs() < f64::EPSILON);
        assert!((state.total_points - 6.0).abs() < f64::EPSILON);
        assert_eq!(state.total_clicks, 1);
    }

    #[test]
    fn buy_deducts_cost_and_recomputes() {
        let mut state = GameState::new(&catalog());
        state.points = 25.0;
        let receipt = state.buy("grip").unwrap();
        assert_eq!(receipt.level, 1);
        assert!((receipt.cost - 10.0).abs() < f64::EPSILON);
        assert!((state.points - 15.0).abs() < f64::EPSILON);
        assert!((state.click_power - 2.0).abs() < f64::EPSILON);
        assert!(state.total_points.abs() < f64::EPSILON);
    }

    #[test]
    fn buy_rejects_unknown_ids() {
        let mut state = GameState::new(&catalog());
        state.points = 1_000.0;
        let before = state.clone();
        assert_eq!(
            state.buy("racket"),
            Err(PurchaseError::UnknownUpgrade {
                id: "racket".into()
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn buy_rejects_when_too_expensive() {
        let mut state = GameState::new(&catalog());
        state.points = 9.0;
        let before = state.clone();
        let err = state.buy("grip").unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientPoints { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn buy_rejects_at_max_level() {
        let mut state = GameState::new(&catalog());
        state.points = 1_000.0;
        state.buy("grip").unwrap();
        state.buy("grip").unwrap();
        let before = state.clone();
        assert_eq!(
            state.buy("grip"),
            Err(PurchaseError::MaxLevel {
                id: "grip".into(),
                max_level: 2
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn max_level_wins_over_funds() {
        let mut state = GameState::new(&catalog());
        state.upgrades[0].level = 2;
        assert!(matches!(
            state.buy("grip"),
            Err(PurchaseError::MaxLevel { .. })
        ));
    }

    #[test]
    fn tick_is_noop_without_passive_income() {
        let mut state = GameState::new(&catalog());
        assert!(state.tick().abs() < f64::EPSILON);
        assert!(state.points.abs() < f64::EPSILON);
    }

    #[test]
    fn tick_pays_passive_rate_times_multiplier() {
        let mut state = GameState::new(&catalog());
        state.points = 100.0;
        state.buy("machine").unwrap();
        state.buy("coach").unwrap();
        assert!(state.earns_passively());
        let points = state.points;
        let clicks = state.total_clicks;
        let earned = state.tick();
        assert!((earned - 3.0).abs() < f64::EPSILON);
        assert!((state.points - points - 3.0).abs() < 1e-9);
        assert_eq!(state.total_clicks, clicks);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let state = GameState::new(&catalog());
        let value = serde_json::to_value(&state).unwrap();
        for field in [
            "points",
            "totalPoints",
            "clickPower",
            "autoClickPower",
            "multiplier",
            "upgrades",
            "totalClicks",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        let first = &value["upgrades"][0];
        assert_eq!(first["baseCost"], 10.0);
        assert_eq!(first["maxLevel"], 2);
        assert_eq!(first["effect"], "clickPower");
    }
}
