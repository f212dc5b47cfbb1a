//! Stat aggregation over upgrade levels.
use serde::{Deserialize, Serialize};

use crate::catalog::{Effect, Upgrade};
use crate::constants::{BASE_AUTO_CLICK_POWER, BASE_CLICK_POWER, BASE_MULTIPLIER};
use crate::numbers::level_to_f64;

/// Effective stats derived from upgrade levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub click_power: f64,
    pub auto_click_power: f64,
    pub multiplier: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            click_power: BASE_CLICK_POWER,
            auto_click_power: BASE_AUTO_CLICK_POWER,
            multiplier: BASE_MULTIPLIER,
        }
    }
}

impl Stats {
    /// Points earned by one manual click.
    #[must_use]
    pub fn points_per_click(&self) -> f64 {
        self.click_power * self.multiplier
    }

    /// Points earned by one passive-income tick.
    #[must_use]
    pub fn points_per_second(&self) -> f64 {
        self.auto_click_power * self.multiplier
    }
}

/// Fold every upgrade's `effect_value * level` into the stat its effect names.
///
/// Always recomputed from scratch; callers never patch stats incrementally.
#[must_use]
pub fn aggregate<'a, I>(upgrades: I) -> Stats
where
    I: IntoIterator<Item = &'a Upgrade>,
{
    upgrades
        .into_iter()
        .fold(Stats::default(), |mut stats, upgrade| {
            let contribution = upgrade.effect_value * level_to_f64(upgrade.level);
            match upgrade.effect {
                Effect::ClickPower => stats.click_power += contribution,
                Effect::AutoClick => stats.auto_click_power += contribution,
                Effect::Multiplier => stats.multiplier += contribution,
            }
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_upgrade;

    fn leveled(id: &str, effect: Effect, value: f64, level: u32) -> Upgrade {
        let mut upgrade = test_upgrade(id, effect, value, 10);
        upgrade.level = level;
        upgrade
    }

    #[test]
    fn empty_aggregate_is_floor() {
        let none: [Upgrade; 0] = [];
        let stats = aggregate(&none);
        assert_eq!(
            stats,
            Stats {
                click_power: 1.0,
                auto_click_power: 0.0,
                multiplier: 1.0,
            }
        );
    }

    #[test]
    fn click_power_adds_per_level() {
        let stats = aggregate(&[leveled("a", Effect::ClickPower, 2.0, 3)]);
        assert!((stats.click_power - 7.0).abs() < f64::EPSILON);
        assert!(stats.auto_click_power.abs() < f64::EPSILON);
        assert!((stats.multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn each_effect_feeds_its_own_stat() {
        let upgrades = [
            leveled("click", Effect::ClickPower, 1.0, 2),
            leveled("auto", Effect::AutoClick, 5.0, 2),
            leveled("mult", Effect::Multiplier, 0.25, 2),
            leveled("idle", Effect::AutoClick, 100.0, 0),
        ];
        let stats = aggregate(&upgrades);
        assert!((stats.click_power - 3.0).abs() < f64::EPSILON);
        assert!((stats.auto_click_power - 10.0).abs() < f64::EPSILON);
        assert!((stats.multiplier - 1.5).abs() < f64::EPSILON);
        assert!((stats.points_per_click() - 4.5).abs() < f64::EPSILON);
        assert!((stats.points_per_second() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn order_does_not_matter() {
        let mut upgrades = vec![
            leveled("a", Effect::ClickPower, 1.0, 4),
            leveled("b", Effect::AutoClick, 3.0, 1),
            leveled("c", Effect::Multiplier, 0.5, 2),
        ];
        let forward = aggregate(&upgrades);
        upgrades.reverse();
        assert_eq!(forward, aggregate(&upgrades));
    }
}
