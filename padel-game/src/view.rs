//! Read-only snapshot handed to the presentation layer each frame.
use serde::Serialize;

use crate::catalog::Effect;
use crate::state::GameState;

/// One row of the upgrade shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub effect: Effect,
    pub level: u32,
    pub max_level: u32,
    /// Price of the next level.
    pub cost: f64,
    /// The player could buy the next level right now.
    pub affordable: bool,
    pub maxed: bool,
}

/// Everything the screen needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub points: f64,
    pub total_points: f64,
    pub total_clicks: u64,
    pub points_per_click: f64,
    pub points_per_second: f64,
    pub multiplier: f64,
    pub upgrades: Vec<UpgradeView>,
}

impl Snapshot {
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        let upgrades = state
            .upgrades
            .iter()
            .map(|upgrade| {
                let cost = upgrade.next_cost();
                let maxed = upgrade.is_maxed();
                UpgradeView {
                    id: upgrade.id.clone(),
                    name: upgrade.name.clone(),
                    description: upgrade.description.clone(),
                    icon: upgrade.icon.clone(),
                    effect: upgrade.effect,
                    level: upgrade.level,
                    max_level: upgrade.max_level,
                    cost,
                    affordable: !maxed && state.points >= cost,
                    maxed,
                }
            })
            .collect();

        Self {
            points: state.points,
            total_points: state.total_points,
            total_clicks: state.total_clicks,
            points_per_click: state.points_per_click(),
            points_per_second: state.points_per_second(),
            multiplier: state.multiplier,
            upgrades,
        }
    }

    #[must_use]
    pub fn upgrade(&self, id: &str) -> Option<&UpgradeView> {
        self.upgrades.iter().find(|u| u.id == id)
    }
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self::of(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn affordability_tracks_points() {
        let mut state = GameState::new(Catalog::standard());
        let view = Snapshot::of(&state);
        let grip = view.upgrade("grip").unwrap();
        assert!(!grip.affordable);
        assert!(!grip.maxed);
        assert!((grip.cost - 10.0).abs() < f64::EPSILON);

        state.points = 10.0;
        assert!(Snapshot::of(&state).upgrade("grip").unwrap().affordable);
    }

    #[test]
    fn maxed_upgrades_are_never_affordable() {
        let mut state = GameState::new(Catalog::standard());
        state.points = f64::MAX;
        let sponsor = state
            .upgrades
            .iter_mut()
            .find(|u| u.id == "sponsor")
            .unwrap();
        sponsor.level = sponsor.max_level;
        let view = Snapshot::from(&state);
        let sponsor = view.upgrade("sponsor").unwrap();
        assert!(sponsor.maxed);
        assert!(!sponsor.affordable);
    }

    #[test]
    fn rates_include_multiplier() {
        let mut state = GameState::new(Catalog::standard());
        state.click_power = 4.0;
        state.auto_click_power = 2.0;
        state.multiplier = 1.5;
        let view = Snapshot::of(&state);
        assert!((view.points_per_click - 6.0).abs() < f64::EPSILON);
        assert!((view.points_per_second - 3.0).abs() < f64::EPSILON);
        assert_eq!(view.upgrades.len(), Catalog::standard().len());
    }
}
