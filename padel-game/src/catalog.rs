//! Upgrade catalog: the fixed, ordered set of purchasable upgrades.
//!
//! The catalog is the single source of truth for which upgrades exist, their
//! economics and the stat they feed. Shipped ids must never be reused for a
//! different effect, otherwise reconciliation of old saves credits the wrong
//! stat.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::cost::upgrade_cost;

/// Aggregate stat an upgrade contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    #[serde(rename = "clickPower")]
    ClickPower,
    #[serde(rename = "autoClick")]
    AutoClick,
    #[serde(rename = "multiplier")]
    Multiplier,
}

impl Effect {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClickPower => "clickPower",
            Self::AutoClick => "autoClick",
            Self::Multiplier => "multiplier",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clickPower" => Ok(Self::ClickPower),
            "autoClick" => Ok(Self::AutoClick),
            "multiplier" => Ok(Self::Multiplier),
            _ => Err(()),
        }
    }
}

/// An upgrade definition together with its purchased level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Price of level 1.
    pub base_cost: f64,
    /// Geometric cost growth per level, always > 1.
    pub cost_multiplier: f64,
    pub level: u32,
    pub max_level: u32,
    pub effect: Effect,
    /// Contribution per level to the stat named by `effect`.
    pub effect_value: f64,
}

impl Upgrade {
    /// Price of advancing from the current level to the next one.
    #[must_use]
    pub fn next_cost(&self) -> f64 {
        upgrade_cost(self.base_cost, self.cost_multiplier, self.level)
    }

    #[must_use]
    pub const fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// Same definition at `level`, clamped to `max_level`.
    #[must_use]
    pub fn at_level(&self, level: u32) -> Self {
        Self {
            level: level.min(self.max_level),
            ..self.clone()
        }
    }
}

/// Errors raised when catalog invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("upgrade id must not be empty")]
    EmptyId,
    #[error("duplicate upgrade id `{0}`")]
    DuplicateId(String),
    #[error("upgrade `{id}` base cost must be positive (got {value})")]
    BaseCost { id: String, value: f64 },
    #[error("upgrade `{id}` cost multiplier must exceed 1 (got {value})")]
    CostMultiplier { id: String, value: f64 },
    #[error("upgrade `{id}` max level must be at least 1")]
    MaxLevel { id: String },
    #[error("upgrade `{id}` effect value must be non-negative (got {value})")]
    EffectValue { id: String, value: f64 },
}

/// Ordered, validated list of upgrade definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<Upgrade>,
}

impl Catalog {
    /// Build a catalog from definitions, validating every entry.
    ///
    /// Levels carried by `entries` are reset to 0.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found, in entry order.
    pub fn new(entries: Vec<Upgrade>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            validate_entry(entry)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        let entries = entries.into_iter().map(|u| u.at_level(0)).collect();
        Ok(Self { entries })
    }

    /// The catalog shipped with the game.
    #[must_use]
    pub fn standard() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self {
            entries: SHIPPED.iter().map(ShippedUpgrade::to_upgrade).collect(),
        })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Upgrade> {
        self.entries.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every catalog entry at level 0, in catalog order.
    #[must_use]
    pub fn fresh_upgrades(&self) -> Vec<Upgrade> {
        self.entries.clone()
    }
}

fn validate_entry(entry: &Upgrade) -> Result<(), CatalogError> {
    let id = || entry.id.clone();
    if entry.id.is_empty() {
        return Err(CatalogError::EmptyId);
    }
    if !entry.base_cost.is_finite() || entry.base_cost <= 0.0 {
        return Err(CatalogError::BaseCost {
            id: id(),
            value: entry.base_cost,
        });
    }
    if !entry.cost_multiplier.is_finite() || entry.cost_multiplier <= 1.0 {
        return Err(CatalogError::CostMultiplier {
            id: id(),
            value: entry.cost_multiplier,
        });
    }
    if entry.max_level == 0 {
        return Err(CatalogError::MaxLevel { id: id() });
    }
    if !entry.effect_value.is_finite() || entry.effect_value < 0.0 {
        return Err(CatalogError::EffectValue {
            id: id(),
            value: entry.effect_value,
        });
    }
    Ok(())
}

struct ShippedUpgrade {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    base_cost: f64,
    cost_multiplier: f64,
    max_level: u32,
    effect: Effect,
    effect_value: f64,
}

impl ShippedUpgrade {
    fn to_upgrade(&self) -> Upgrade {
        Upgrade {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            base_cost: self.base_cost,
            cost_multiplier: self.cost_multiplier,
            level: 0,
            max_level: self.max_level,
            effect: self.effect,
            effect_value: self.effect_value,
        }
    }
}

const SHIPPED: [ShippedUpgrade; 7] = [
    ShippedUpgrade {
        id: "grip",
        name: "Overgrip",
        description: "+1 punto por golpe",
        icon: "🎾",
        base_cost: 10.0,
        cost_multiplier: 1.15,
        max_level: 50,
        effect: Effect::ClickPower,
        effect_value: 1.0,
    },
    ShippedUpgrade {
        id: "carbon_racket",
        name: "Pala de carbono",
        description: "+5 puntos por golpe",
        icon: "🏸",
        base_cost: 150.0,
        cost_multiplier: 1.2,
        max_level: 25,
        effect: Effect::ClickPower,
        effect_value: 5.0,
    },
    ShippedUpgrade {
        id: "ball_machine",
        name: "Lanzapelotas",
        description: "+1 punto por segundo",
        icon: "⚙️",
        base_cost: 50.0,
        cost_multiplier: 1.15,
        max_level: 50,
        effect: Effect::AutoClick,
        effect_value: 1.0,
    },
    ShippedUpgrade {
        id: "sparring",
        name: "Sparring",
        description: "+5 puntos por segundo",
        icon: "🤝",
        base_cost: 500.0,
        cost_multiplier: 1.2,
        max_level: 25,
        effect: Effect::AutoClick,
        effect_value: 5.0,
    },
    ShippedUpgrade {
        id: "coach",
        name: "Entrenador",
        description: "+0.25x multiplicador",
        icon: "📋",
        base_cost: 1_000.0,
        cost_multiplier: 1.5,
        max_level: 10,
        effect: Effect::Multiplier,
        effect_value: 0.25,
    },
    ShippedUpgrade {
        id: "club",
        name: "Club de pádel",
        description: "+25 puntos por segundo",
        icon: "🏟️",
        base_cost: 5_000.0,
        cost_multiplier: 1.25,
        max_level: 20,
        effect: Effect::AutoClick,
        effect_value: 25.0,
    },
    ShippedUpgrade {
        id: "sponsor",
        name: "Patrocinador",
        description: "+1x multiplicador",
        icon: "🏆",
        base_cost: 25_000.0,
        cost_multiplier: 2.0,
        max_level: 5,
        effect: Effect::Multiplier,
        effect_value: 1.0,
    },
];

#[cfg(test)]
pub(crate) fn test_upgrade(id: &str, effect: Effect, effect_value: f64, max_level: u32) -> Upgrade {
    Upgrade {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        icon: String::new(),
        base_cost: 10.0,
        cost_multiplier: 1.15,
        level: 0,
        max_level,
        effect,
        effect_value,
    }
}
