//! Immutable, serializable view of a build session.

use serde::{Deserialize, Serialize};

use crate::allocation::{Pool, PoolStatus, Side, SkillValue};
use crate::characteristics::{Characteristics, GenerationMethod};
use crate::derived::DerivedStats;
use crate::money::Purchase;
use crate::session::{BuildSession, Identity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeSummary {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub key: String,
    pub name: String,
    pub bonus_points: u32,
    pub skill_cap: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBuySummary {
    pub budget: i32,
    pub spent: i32,
    pub remaining: i32,
}

/// Everything a renderer or exporter needs, owned and detached from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSnapshot {
    pub seed: u64,
    pub identity: Identity,
    pub method: GenerationMethod,
    pub characteristics: Characteristics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_buy: Option<PointBuySummary>,
    pub derived: DerivedStats,
    pub culture: Option<ArchetypeSummary>,
    pub career: Option<ArchetypeSummary>,
    pub age: Option<AgeSummary>,
    pub pools: Vec<PoolStatus>,
    pub skills: Vec<SkillValue>,
    pub culture_professional: Vec<String>,
    pub career_professional: Vec<String>,
    pub bonus_skill: Option<String>,
    pub combat_style: Option<String>,
    pub social_class: Option<String>,
    pub starting_money: i64,
    pub remaining_money: i64,
    pub purchases: Vec<Purchase>,
}

impl BuildSnapshot {
    #[must_use]
    pub fn capture(session: &BuildSession) -> Self {
        let attributes = session.attributes();
        let engine = session.allocation();
        let money = session.money();

        let point_buy = (attributes.method() == GenerationMethod::PointBuy).then(|| {
            PointBuySummary {
                budget: attributes.budget(),
                spent: attributes.points_spent(),
                remaining: attributes.points_remaining(),
            }
        });

        Self {
            seed: session.seed(),
            identity: session.identity().clone(),
            method: attributes.method(),
            characteristics: *attributes.values(),
            point_buy,
            derived: session.derived(),
            culture: engine.culture().map(|c| ArchetypeSummary {
                key: c.key.clone(),
                name: c.name.clone(),
            }),
            career: engine.career().map(|c| ArchetypeSummary {
                key: c.key.clone(),
                name: c.name.clone(),
            }),
            age: engine.age_bracket().map(|a| AgeSummary {
                key: a.key.clone(),
                name: a.name.clone(),
                bonus_points: a.bonus_points,
                skill_cap: a.skill_cap,
            }),
            pools: Pool::ALL.iter().map(|pool| engine.pool_status(*pool)).collect(),
            skills: session.skills(),
            culture_professional: engine.professional(Side::Culture).as_slice().to_vec(),
            career_professional: engine.professional(Side::Career).as_slice().to_vec(),
            bonus_skill: engine.bonus_skill().map(|grant| grant.skill.clone()),
            combat_style: engine.combat_style().map(str::to_string),
            social_class: money.social_class().map(str::to_string),
            starting_money: money.starting_money(),
            remaining_money: money.remaining(),
            purchases: money.purchases().to_vec(),
        }
    }

    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&SkillValue> {
        self.skills
            .iter()
            .find(|row| row.name.eq_ignore_ascii_case(name.trim()))
    }

    #[must_use]
    pub fn pool(&self, pool: Pool) -> Option<&PoolStatus> {
        self.pools.iter().find(|status| status.pool == pool)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
