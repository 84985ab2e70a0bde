//! Build tunables and rule variants.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BONUS_SKILL_AMOUNT, CAREER_POOL_TOTAL, CULTURE_POOL_TOTAL, DERIVED_OVERFLOW_OFFSET,
    POINT_BUY_DEFAULT, POINT_BUY_MAX, POINT_BUY_MIN, PROFESSIONAL_LIMIT, STANDARD_SKILL_FLOOR,
};

/// Which pools the age bracket's per-skill cap applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapScope {
    #[default]
    AllPools,
    BonusOnly,
}

/// How a professional selection is re-seeded after its archetype changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionalSeed {
    #[default]
    Empty,
    FirstListed,
}

/// Overflow formula for the experience modifier above 18 CHA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceOverflow {
    /// `1 + (CHA - 13) / 6`
    #[default]
    FromThirteen,
    /// `1 + (CHA - 18) / 6`
    FromEighteen,
}

impl ExperienceOverflow {
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Self::FromThirteen => DERIVED_OVERFLOW_OFFSET,
            Self::FromEighteen => 18,
        }
    }
}

/// Errors raised when build configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("point-buy budget {value} must be between {min} and {max}")]
    BudgetRange { value: i32, min: i32, max: i32 },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("bonus skill amount {amount} exceeds the culture pool {pool}")]
    BonusAmountTooLarge { amount: u32, pool: u32 },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Tunables for a build session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "BuildConfig::default_point_buy_budget")]
    pub point_buy_budget: i32,
    #[serde(default = "BuildConfig::default_culture_pool")]
    pub culture_pool: u32,
    #[serde(default = "BuildConfig::default_career_pool")]
    pub career_pool: u32,
    #[serde(default = "BuildConfig::default_bonus_skill_amount")]
    pub bonus_skill_amount: u32,
    #[serde(default = "BuildConfig::default_standard_floor")]
    pub standard_floor: i32,
    #[serde(default = "BuildConfig::default_professional_limit")]
    pub professional_limit: usize,
    #[serde(default)]
    pub experience_overflow: ExperienceOverflow,
    #[serde(default)]
    pub culture_standard_floor: bool,
    #[serde(default)]
    pub cap_scope: CapScope,
    #[serde(default)]
    pub professional_seed: ProfessionalSeed,
}

impl BuildConfig {
    const fn default_point_buy_budget() -> i32 {
        POINT_BUY_DEFAULT
    }

    const fn default_culture_pool() -> u32 {
        CULTURE_POOL_TOTAL
    }

    const fn default_career_pool() -> u32 {
        CAREER_POOL_TOTAL
    }

    const fn default_bonus_skill_amount() -> u32 {
        BONUS_SKILL_AMOUNT
    }

    const fn default_standard_floor() -> i32 {
        STANDARD_SKILL_FLOOR
    }

    const fn default_professional_limit() -> usize {
        PROFESSIONAL_LIMIT
    }

    /// Parse a config from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate invariants that the build rules depend on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(POINT_BUY_MIN..=POINT_BUY_MAX).contains(&self.point_buy_budget) {
            return Err(ConfigError::BudgetRange {
                value: self.point_buy_budget,
                min: POINT_BUY_MIN,
                max: POINT_BUY_MAX,
            });
        }
        for (field, value) in [
            ("culture_pool", self.culture_pool),
            ("career_pool", self.career_pool),
            (
                "professional_limit",
                u32::try_from(self.professional_limit).unwrap_or(u32::MAX),
            ),
        ] {
            if value == 0 {
                return Err(ConfigError::MinViolation {
                    field,
                    min: 1,
                    value,
                });
            }
        }
        if self.bonus_skill_amount > self.culture_pool {
            return Err(ConfigError::BonusAmountTooLarge {
                amount: self.bonus_skill_amount,
                pool: self.culture_pool,
            });
        }
        Ok(())
    }

    /// Builder-style override for the point-buy budget.
    #[must_use]
    pub const fn with_point_buy_budget(mut self, budget: i32) -> Self {
        self.point_buy_budget = budget;
        self
    }

    /// Builder-style override for the cap scope.
    #[must_use]
    pub const fn with_cap_scope(mut self, scope: CapScope) -> Self {
        self.cap_scope = scope;
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            point_buy_budget: Self::default_point_buy_budget(),
            culture_pool: Self::default_culture_pool(),
            career_pool: Self::default_career_pool(),
            bonus_skill_amount: Self::default_bonus_skill_amount(),
            standard_floor: Self::default_standard_floor(),
            professional_limit: Self::default_professional_limit(),
            experience_overflow: ExperienceOverflow::default(),
            culture_standard_floor: false,
            cap_scope: CapScope::default(),
            professional_seed: ProfessionalSeed::default(),
        }
    }
}
