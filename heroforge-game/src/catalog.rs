//! Immutable reference tables: skills, cultures, careers, age brackets and equipment.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::characteristics::{Characteristic, Characteristics};
use crate::constants::{PERCENTILE_MAX, PERCENTILE_MIN};
use crate::dice::DiceExpr;

const DEFAULT_CATALOG_DATA: &str = include_str!("../data/catalog.json");

/// Strip a parenthetical qualifier: `Lore (Astronomy)` becomes `Lore`.
#[must_use]
pub fn normalize_skill_name(name: &str) -> &str {
    name.split_once('(').map_or(name, |(head, _)| head).trim()
}

/// Whether a skill list admits `skill`, either verbatim or through an
/// unqualified entry matching its normalized name.
#[must_use]
pub fn list_admits(list: &[String], skill: &str) -> bool {
    let normalized = normalize_skill_name(skill);
    list.iter().any(|entry| {
        entry.trim().eq_ignore_ascii_case(skill.trim())
            || (!entry.contains('(') && entry.trim().eq_ignore_ascii_case(normalized))
    })
}

/// Base-value formula, stored as data so the table can be serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkillFormula {
    /// Sum of two characteristics plus a constant.
    Sum {
        of: [Characteristic; 2],
        #[serde(default)]
        plus: i32,
    },
    /// One characteristic doubled plus a constant.
    Doubled {
        of: Characteristic,
        #[serde(default)]
        plus: i32,
    },
}

impl SkillFormula {
    #[must_use]
    pub const fn evaluate(&self, values: &Characteristics) -> i32 {
        match *self {
            Self::Sum { of: [a, b], plus } => values.get(a) + values.get(b) + plus,
            Self::Doubled { of, plus } => values.get(of) * 2 + plus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Standard,
    Professional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub name: String,
    pub category: SkillCategory,
    pub formula: SkillFormula,
}

/// A percentile band of a culture's social-class table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialClass {
    pub name: String,
    pub low: u32,
    pub high: u32,
    pub multiplier: f64,
}

impl SocialClass {
    #[must_use]
    pub const fn contains(&self, roll: u32) -> bool {
        roll >= self.low && roll <= self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Culture {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub standard_skills: Vec<String>,
    #[serde(default)]
    pub professional_skills: Vec<String>,
    #[serde(default)]
    pub combat_styles: Vec<String>,
    pub money: DiceExpr,
    #[serde(default)]
    pub social_classes: Vec<SocialClass>,
}

impl Culture {
    /// Social class whose percentile band contains `roll`.
    #[must_use]
    pub fn social_class_for_roll(&self, roll: u32) -> Option<&SocialClass> {
        self.social_classes.iter().find(|class| class.contains(roll))
    }

    #[must_use]
    pub fn social_class(&self, name: &str) -> Option<&SocialClass> {
        self.social_classes
            .iter()
            .find(|class| class.name.eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub standard_skills: Vec<String>,
    #[serde(default)]
    pub professional_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub key: String,
    pub name: String,
    pub bonus_points: u32,
    pub skill_cap: u32,
    pub age: DiceExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub cost: i64,
}

/// Errors raised when reference data is malformed or inconsistent.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} key `{key}`")]
    DuplicateKey { kind: &'static str, key: String },
    #[error("culture `{culture}` social classes {detail}")]
    SocialClassTable { culture: String, detail: String },
    #[error("{kind} `{key}` has invalid value: {detail}")]
    InvalidValue {
        kind: &'static str,
        key: String,
        detail: String,
    },
}

/// All static reference data a build reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReferenceCatalog {
    #[serde(default)]
    pub skills: Vec<SkillDef>,
    #[serde(default)]
    pub cultures: Vec<Culture>,
    #[serde(default)]
    pub careers: Vec<Career>,
    #[serde(default)]
    pub age_brackets: Vec<AgeBracket>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
}

impl ReferenceCatalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the tables are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails validation.
    pub fn load_bundled() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_DATA)
    }

    /// Shared bundled catalog; empty if the bundled data is broken.
    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<ReferenceCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::load_bundled().unwrap_or_else(|err| {
                log::error!("bundled catalog rejected: {err}");
                Self::default()
            })
        })
    }

    /// Check key uniqueness, value ranges and social-class coverage.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        ensure_unique("skill", self.skills.iter().map(|s| normalize_skill_name(&s.name)))?;
        ensure_unique("culture", self.cultures.iter().map(|c| c.key.as_str()))?;
        ensure_unique("career", self.careers.iter().map(|c| c.key.as_str()))?;
        ensure_unique("age bracket", self.age_brackets.iter().map(|a| a.key.as_str()))?;
        ensure_unique("item", self.equipment.iter().map(|e| e.key.as_str()))?;

        for culture in &self.cultures {
            validate_social_classes(culture)?;
        }
        for item in &self.equipment {
            if item.cost < 0 {
                return Err(CatalogError::InvalidValue {
                    kind: "item",
                    key: item.key.clone(),
                    detail: format!("negative cost {}", item.cost),
                });
            }
        }
        for bracket in &self.age_brackets {
            if bracket.skill_cap == 0 {
                return Err(CatalogError::InvalidValue {
                    kind: "age bracket",
                    key: bracket.key.clone(),
                    detail: "skill cap must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&SkillDef> {
        let normalized = normalize_skill_name(name);
        self.skills
            .iter()
            .find(|skill| normalize_skill_name(&skill.name).eq_ignore_ascii_case(normalized))
    }

    /// Formula value for `name`, or 0 when no formula is known.
    #[must_use]
    pub fn formula_value(&self, name: &str, values: &Characteristics) -> i32 {
        self.skill(name)
            .map_or(0, |skill| skill.formula.evaluate(values))
    }

    #[must_use]
    pub fn is_standard(&self, name: &str) -> bool {
        self.skill(name)
            .is_some_and(|skill| skill.category == SkillCategory::Standard)
    }

    /// Standard skills in catalog order.
    pub fn standard_skills(&self) -> impl Iterator<Item = &SkillDef> {
        self.skills
            .iter()
            .filter(|skill| skill.category == SkillCategory::Standard)
    }

    #[must_use]
    pub fn culture(&self, key: &str) -> Option<&Culture> {
        self.cultures.iter().find(|c| c.key == key)
    }

    #[must_use]
    pub fn career(&self, key: &str) -> Option<&Career> {
        self.careers.iter().find(|c| c.key == key)
    }

    #[must_use]
    pub fn age_bracket(&self, key: &str) -> Option<&AgeBracket> {
        self.age_brackets.iter().find(|a| a.key == key)
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&EquipmentItem> {
        self.equipment.iter().find(|e| e.key == key)
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.to_ascii_lowercase()) {
            return Err(CatalogError::DuplicateKey {
                kind,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Bands must be well-formed, contiguous and cover the whole percentile range.
fn validate_social_classes(culture: &Culture) -> Result<(), CatalogError> {
    let fail = |detail: String| CatalogError::SocialClassTable {
        culture: culture.key.clone(),
        detail,
    };
    if culture.social_classes.is_empty() {
        return Err(fail("are empty".to_string()));
    }
    let mut bands: Vec<&SocialClass> = culture.social_classes.iter().collect();
    bands.sort_by_key(|class| class.low);

    let mut expected = PERCENTILE_MIN;
    for class in bands {
        if !class.multiplier.is_finite() || class.multiplier < 0.0 {
            return Err(fail(format!(
                "`{}` has invalid multiplier {}",
                class.name, class.multiplier
            )));
        }
        if class.low > class.high {
            return Err(fail(format!(
                "`{}` range {}..={} is inverted",
                class.name, class.low, class.high
            )));
        }
        if class.low != expected {
            return Err(fail(format!(
                "leave a gap or overlap at {expected} (`{}` starts at {})",
                class.name, class.low
            )));
        }
        expected = class.high + 1;
    }
    if expected != PERCENTILE_MAX + 1 {
        return Err(fail(format!("stop at {} instead of {PERCENTILE_MAX}", expected - 1)));
    }
    Ok(())
}
