//! Skill point allocation across the culture, career and bonus pools.
//!
//! Every public mutation validates before it writes. A rejected call leaves
//! the engine exactly as it was, so the pool invariant (`spent <= total`)
//! and the per-skill caps hold after every call, accepted or not.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::catalog::{
    AgeBracket, Career, Culture, ReferenceCatalog, SkillCategory, list_admits,
    normalize_skill_name,
};
use crate::characteristics::Characteristics;
use crate::config::{BuildConfig, CapScope, ProfessionalSeed};
use crate::constants::CULTURE_STANDARD_FLOOR;
use crate::error::{ReferenceKind, Rejection};
use crate::numbers::points_to_i32;

const COMBAT_STYLE: &str = "Combat Style";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    Culture,
    Career,
    Bonus,
}

impl Pool {
    pub const ALL: [Self; 3] = [Self::Culture, Self::Career, Self::Bonus];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Career => "career",
            Self::Bonus => "bonus",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which archetype a professional selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Culture,
    Career,
}

impl Side {
    #[must_use]
    pub const fn pool(self) -> Pool {
        match self {
            Self::Culture => Pool::Culture,
            Self::Career => Pool::Career,
        }
    }

    const fn reference_kind(self) -> ReferenceKind {
        match self {
            Self::Culture => ReferenceKind::Culture,
            Self::Career => ReferenceKind::Career,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pool().key())
    }
}

/// Points a single skill holds in each pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillAllocation {
    pub culture: u32,
    pub career: u32,
    pub bonus: u32,
}

impl SkillAllocation {
    #[must_use]
    pub const fn get(&self, pool: Pool) -> u32 {
        match pool {
            Pool::Culture => self.culture,
            Pool::Career => self.career,
            Pool::Bonus => self.bonus,
        }
    }

    pub const fn set(&mut self, pool: Pool, amount: u32) {
        match pool {
            Pool::Culture => self.culture = amount,
            Pool::Career => self.career = amount,
            Pool::Bonus => self.bonus = amount,
        }
    }

    #[must_use]
    pub const fn sum(&self) -> u32 {
        self.culture
            .saturating_add(self.career)
            .saturating_add(self.bonus)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sum() == 0
    }
}

/// Capacity report for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub pool: Pool,
    pub total: u32,
    pub spent: u32,
    pub remaining: u32,
}

/// Result of an accepted allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub skill: String,
    pub pool: Pool,
    pub previous: u32,
    pub requested: u32,
    pub applied: u32,
}

impl AllocationOutcome {
    /// True when the request was reduced to fit the pool.
    #[must_use]
    pub const fn was_clamped(&self) -> bool {
        self.applied != self.requested
    }
}

/// The automatic bonus-pool grant attached to the chosen bonus skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusGrant {
    pub skill: String,
    pub granted: u32,
}

/// Professional skills chosen on one side; at most a handful, so stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfessionalSelection(SmallVec<[String; 3]>);

impl ProfessionalSelection {
    #[must_use]
    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s.eq_ignore_ascii_case(skill.trim()))
    }

    /// Whether any selected entry admits `skill`, qualifiers included.
    #[must_use]
    pub fn admits(&self, skill: &str) -> bool {
        list_admits(&self.0, skill)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    fn insert(&mut self, skill: String) {
        self.0.push(skill);
    }

    fn remove(&mut self, skill: &str) {
        self.0.retain(|s| !s.eq_ignore_ascii_case(skill.trim()));
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Fully resolved value of one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillValue {
    pub name: String,
    pub base: i32,
    pub culture: u32,
    pub career: u32,
    pub bonus: u32,
    pub total: i32,
    pub standard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PoolTotals {
    culture: u32,
    career: u32,
    bonus: u32,
}

impl PoolTotals {
    const fn get(&self, pool: Pool) -> u32 {
        match pool {
            Pool::Culture => self.culture,
            Pool::Career => self.career,
            Pool::Bonus => self.bonus,
        }
    }
}

/// Owns archetype context and every skill allocation of a build.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    catalog: Rc<ReferenceCatalog>,
    config: BuildConfig,
    culture: Option<String>,
    career: Option<String>,
    age: Option<String>,
    totals: PoolTotals,
    allocations: BTreeMap<String, SkillAllocation>,
    culture_professional: ProfessionalSelection,
    career_professional: ProfessionalSelection,
    bonus_skill: Option<BonusGrant>,
    combat_style: Option<String>,
}

impl PartialEq for AllocationEngine {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.catalog, &other.catalog)
            && self.config == other.config
            && self.culture == other.culture
            && self.career == other.career
            && self.age == other.age
            && self.totals == other.totals
            && self.allocations == other.allocations
            && self.culture_professional == other.culture_professional
            && self.career_professional == other.career_professional
            && self.bonus_skill == other.bonus_skill
            && self.combat_style == other.combat_style
    }
}

impl AllocationEngine {
    #[must_use]
    pub fn new(catalog: Rc<ReferenceCatalog>, config: BuildConfig) -> Self {
        Self {
            catalog,
            config,
            culture: None,
            career: None,
            age: None,
            totals: PoolTotals::default(),
            allocations: BTreeMap::new(),
            culture_professional: ProfessionalSelection::default(),
            career_professional: ProfessionalSelection::default(),
            bonus_skill: None,
            combat_style: None,
        }
    }

    // Context accessors ------------------------------------------------------

    #[must_use]
    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    #[must_use]
    pub fn culture(&self) -> Option<&Culture> {
        self.culture.as_deref().and_then(|key| self.catalog.culture(key))
    }

    #[must_use]
    pub fn career(&self) -> Option<&Career> {
        self.career.as_deref().and_then(|key| self.catalog.career(key))
    }

    #[must_use]
    pub fn age_bracket(&self) -> Option<&AgeBracket> {
        self.age.as_deref().and_then(|key| self.catalog.age_bracket(key))
    }

    #[must_use]
    pub const fn professional(&self, side: Side) -> &ProfessionalSelection {
        match side {
            Side::Culture => &self.culture_professional,
            Side::Career => &self.career_professional,
        }
    }

    #[must_use]
    pub const fn bonus_skill(&self) -> Option<&BonusGrant> {
        self.bonus_skill.as_ref()
    }

    #[must_use]
    pub fn combat_style(&self) -> Option<&str> {
        self.combat_style.as_deref()
    }

    /// Skill name the selected combat style is tracked under.
    #[must_use]
    pub fn combat_style_skill(&self) -> Option<String> {
        self.combat_style
            .as_deref()
            .map(|style| format!("{COMBAT_STYLE} ({style})"))
    }

    #[must_use]
    pub fn allocation(&self, skill: &str) -> SkillAllocation {
        self.allocations
            .get(&self.canonical_name(skill))
            .copied()
            .unwrap_or_default()
    }

    pub fn allocations(&self) -> impl Iterator<Item = (&str, &SkillAllocation)> {
        self.allocations.iter().map(|(name, alloc)| (name.as_str(), alloc))
    }

    // Pool accounting ----------------------------------------------------------

    #[must_use]
    pub fn spent(&self, pool: Pool) -> u32 {
        self.allocations
            .values()
            .fold(0_u32, |acc, alloc| acc.saturating_add(alloc.get(pool)))
    }

    #[must_use]
    pub fn remaining(&self, pool: Pool) -> u32 {
        self.totals.get(pool).saturating_sub(self.spent(pool))
    }

    #[must_use]
    pub fn pool_status(&self, pool: Pool) -> PoolStatus {
        let total = self.totals.get(pool);
        let spent = self.spent(pool);
        PoolStatus {
            pool,
            total,
            spent,
            remaining: total.saturating_sub(spent),
        }
    }

    /// Every pool within capacity and every capped allocation within its cap.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let pools_ok = Pool::ALL
            .iter()
            .all(|pool| self.spent(*pool) <= self.totals.get(*pool));
        let caps_ok = self.allocations.values().all(|alloc| {
            Pool::ALL.iter().all(|pool| {
                self.cap_for(*pool)
                    .is_none_or(|cap| alloc.get(*pool) <= cap)
            })
        });
        pools_ok && caps_ok
    }

    /// Per-skill cap applying to `pool`, if any.
    #[must_use]
    pub fn cap_for(&self, pool: Pool) -> Option<u32> {
        let cap = self.age_bracket()?.skill_cap;
        match (self.config.cap_scope, pool) {
            (CapScope::AllPools, _) | (CapScope::BonusOnly, Pool::Bonus) => Some(cap),
            (CapScope::BonusOnly, _) => None,
        }
    }

    // Eligibility --------------------------------------------------------------

    /// Whether `skill` may receive points from `pool` under the current context.
    #[must_use]
    pub fn is_eligible(&self, skill: &str, pool: Pool) -> bool {
        if skill.trim().is_empty() {
            return false;
        }
        match pool {
            Pool::Bonus => true,
            Pool::Culture => self.culture().is_some_and(|culture| {
                (list_admits(&culture.standard_skills, skill)
                    || self.culture_professional.admits(skill))
                    && self.style_taught(skill)
            }),
            Pool::Career => self.career().is_some_and(|career| {
                (list_admits(&career.standard_skills, skill)
                    || self.career_professional.admits(skill))
                    && self.style_taught(skill)
            }),
        }
    }

    fn professional_list(&self, side: Side) -> Option<&[String]> {
        match side {
            Side::Culture => self.culture().map(|c| c.professional_skills.as_slice()),
            Side::Career => self.career().map(|c| c.professional_skills.as_slice()),
        }
    }

    /// Resolve `skill` to the spelling already in use; names that differ
    /// only in case share one allocation. Unseen names take the catalog's
    /// casing of their head.
    fn canonical_name(&self, skill: &str) -> String {
        let trimmed = skill.trim();
        if let Some(known) = self.known_spelling(trimmed) {
            return known;
        }
        let head = normalize_skill_name(trimmed);
        match self.catalog.skill(head) {
            Some(def) => {
                let canonical_head = normalize_skill_name(&def.name);
                format!("{canonical_head}{}", &trimmed[head.len()..])
            }
            None => trimmed.to_string(),
        }
    }

    fn known_spelling(&self, skill: &str) -> Option<String> {
        let archetype_lists = self
            .culture()
            .into_iter()
            .flat_map(|c| c.standard_skills.iter().chain(&c.professional_skills))
            .chain(
                self.career()
                    .into_iter()
                    .flat_map(|c| c.standard_skills.iter().chain(&c.professional_skills)),
            );
        self.allocations
            .keys()
            .chain(self.culture_professional.iter())
            .chain(self.career_professional.iter())
            .chain(archetype_lists)
            .find(|name| name.eq_ignore_ascii_case(skill))
            .cloned()
            .or_else(|| {
                self.combat_style_skill()
                    .filter(|style| style.eq_ignore_ascii_case(skill))
            })
    }

    /// A qualified combat style only counts when the culture teaches it.
    fn style_taught(&self, skill: &str) -> bool {
        let Some((head, rest)) = skill.split_once('(') else {
            return true;
        };
        if !head.trim().eq_ignore_ascii_case(COMBAT_STYLE) {
            return true;
        }
        let style = rest.trim_end().trim_end_matches(')').trim();
        self.culture().is_some_and(|culture| {
            culture
                .combat_styles
                .iter()
                .any(|s| s.eq_ignore_ascii_case(style))
        })
    }

    // Re-initialization ----------------------------------------------------------

    /// Switch culture, resetting its pool and professional selection.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown key.
    pub fn set_culture(&mut self, key: &str) -> Result<(), Rejection> {
        let culture = self
            .catalog
            .culture(key)
            .ok_or_else(|| Rejection::unknown(ReferenceKind::Culture, key))?;
        let seed = self.seed_selection(&culture.professional_skills);
        let style = culture.combat_styles.first().cloned();

        self.culture = Some(key.to_string());
        self.totals.culture = self.config.culture_pool;
        self.culture_professional = seed;
        self.combat_style = style;
        self.prune_pool(Pool::Culture);
        self.prune_pool(Pool::Career);
        log::info!("culture set to {key}");
        Ok(())
    }

    /// Switch career, resetting its pool and professional selection.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown key.
    pub fn set_career(&mut self, key: &str) -> Result<(), Rejection> {
        let career = self
            .catalog
            .career(key)
            .ok_or_else(|| Rejection::unknown(ReferenceKind::Career, key))?;
        let seed = self.seed_selection(&career.professional_skills);

        self.career = Some(key.to_string());
        self.totals.career = self.config.career_pool;
        self.career_professional = seed;
        self.prune_pool(Pool::Career);
        log::info!("career set to {key}");
        Ok(())
    }

    /// Switch age bracket, resizing the bonus pool and re-applying caps.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown key.
    pub fn set_age(&mut self, key: &str) -> Result<(), Rejection> {
        let bracket = self
            .catalog
            .age_bracket(key)
            .ok_or_else(|| Rejection::unknown(ReferenceKind::AgeBracket, key))?;
        let bonus_total = bracket.bonus_points;

        let grant_skill = self.refund_bonus_grant();
        self.age = Some(key.to_string());
        self.totals.bonus = bonus_total;

        let caps: Vec<(Pool, u32)> = Pool::ALL
            .iter()
            .filter_map(|pool| self.cap_for(*pool).map(|cap| (*pool, cap)))
            .collect();
        for alloc in self.allocations.values_mut() {
            for (pool, cap) in &caps {
                if alloc.get(*pool) > *cap {
                    alloc.set(*pool, *cap);
                }
            }
        }
        if self.spent(Pool::Bonus) > bonus_total {
            for alloc in self.allocations.values_mut() {
                alloc.bonus = 0;
            }
        }
        self.drop_empty();
        if let Some(skill) = grant_skill {
            self.grant_bonus(skill);
        }
        log::info!("age bracket set to {key} (bonus pool {bonus_total})");
        Ok(())
    }

    fn seed_selection(&self, list: &[String]) -> ProfessionalSelection {
        let mut selection = ProfessionalSelection::default();
        if self.config.professional_seed == ProfessionalSeed::FirstListed {
            for skill in list.iter().take(self.config.professional_limit) {
                selection.insert(skill.clone());
            }
        }
        selection
    }

    /// Zero `pool` points on skills that no longer qualify for it.
    fn prune_pool(&mut self, pool: Pool) {
        let stale: Vec<String> = self
            .allocations
            .iter()
            .filter(|(name, alloc)| alloc.get(pool) > 0 && !self.is_eligible(name, pool))
            .map(|(name, _)| name.clone())
            .collect();
        for name in stale {
            if let Some(alloc) = self.allocations.get_mut(&name) {
                log::debug!("clearing {} {pool} points from {name}", alloc.get(pool));
                alloc.set(pool, 0);
            }
        }
        self.drop_empty();
    }

    fn drop_empty(&mut self) {
        self.allocations.retain(|_, alloc| !alloc.is_empty());
    }

    // Professional selection --------------------------------------------------

    /// Select or deselect a professional skill on one side.
    ///
    /// Returns whether the selection changed. Deselecting zeroes the side's
    /// points on skills that lose eligibility, freeing them back to the pool.
    ///
    /// # Errors
    ///
    /// Rejects a selection beyond the limit, a skill the archetype does not
    /// offer, or a side with no active archetype.
    pub fn toggle_professional(
        &mut self,
        side: Side,
        skill: &str,
        selected: bool,
    ) -> Result<bool, Rejection> {
        let list = self.professional_list(side).ok_or(Rejection::MissingContext {
            kind: side.reference_kind(),
        })?;
        let name = self.canonical_name(skill);

        if selected {
            if self.professional(side).contains(&name) {
                return Ok(false);
            }
            if !list_admits(list, &name) {
                return Err(Rejection::NotOffered {
                    target: name,
                    kind: side.reference_kind(),
                });
            }
            let limit = self.config.professional_limit;
            if self.professional(side).len() >= limit {
                return Err(Rejection::SelectionLimitExceeded { side, limit });
            }
            self.selection_mut(side).insert(name.clone());
            log::debug!("selected professional skill {name} on {side} side");
            return Ok(true);
        }

        if !self.professional(side).contains(&name) {
            return Ok(false);
        }
        self.selection_mut(side).remove(&name);
        self.prune_pool(side.pool());
        log::debug!("deselected professional skill {name} on {side} side");
        Ok(true)
    }

    fn selection_mut(&mut self, side: Side) -> &mut ProfessionalSelection {
        match side {
            Side::Culture => &mut self.culture_professional,
            Side::Career => &mut self.career_professional,
        }
    }

    // Allocation ---------------------------------------------------------------

    /// Set `skill`'s points in `pool` to `amount`.
    ///
    /// A request larger than the pool can cover is reduced to
    /// `current + remaining`; the outcome reports both values.
    ///
    /// # Errors
    ///
    /// Rejects ineligible skills, pools with no active archetype and amounts
    /// above the per-skill cap. Nothing changes on rejection.
    pub fn allocate(
        &mut self,
        skill: &str,
        pool: Pool,
        amount: u32,
    ) -> Result<AllocationOutcome, Rejection> {
        match pool {
            Pool::Culture if self.culture.is_none() => {
                return Err(Rejection::MissingContext {
                    kind: ReferenceKind::Culture,
                });
            }
            Pool::Career if self.career.is_none() => {
                return Err(Rejection::MissingContext {
                    kind: ReferenceKind::Career,
                });
            }
            _ => {}
        }
        let name = self.canonical_name(skill);
        if !self.is_eligible(&name, pool) {
            return Err(Rejection::IneligibleTarget { target: name, pool });
        }
        if let Some(cap) = self.cap_for(pool)
            && amount > cap
        {
            return Err(Rejection::out_of_range(
                format!("{name} {pool} allocation"),
                i64::from(amount),
                0,
                i64::from(cap),
            ));
        }

        let previous = self.allocation(&name).get(pool);
        let ceiling = previous.saturating_add(self.remaining(pool));
        let applied = amount.min(ceiling);

        let entry = self.allocations.entry(name.clone()).or_default();
        entry.set(pool, applied);
        self.drop_empty();
        if pool == Pool::Bonus
            && let Some(grant) = self.bonus_skill.as_mut()
            && grant.skill.eq_ignore_ascii_case(&name)
        {
            grant.granted = grant.granted.min(applied);
        }

        if applied == amount {
            log::debug!("{name}: {pool} {previous} -> {applied}");
        } else {
            log::debug!("{name}: {pool} {previous} -> {applied} (requested {amount})");
        }
        Ok(AllocationOutcome {
            skill: name,
            pool,
            previous,
            requested: amount,
            applied,
        })
    }

    /// Choose the skill that receives the automatic bonus grant.
    ///
    /// The previous grant is refunded first. Returns the amount granted.
    ///
    /// # Errors
    ///
    /// Rejects a blank skill name.
    pub fn set_bonus_skill(&mut self, skill: Option<&str>) -> Result<u32, Rejection> {
        let name = match skill {
            Some(raw) if raw.trim().is_empty() => {
                return Err(Rejection::IneligibleTarget {
                    target: raw.to_string(),
                    pool: Pool::Bonus,
                });
            }
            Some(raw) => Some(self.canonical_name(raw)),
            None => None,
        };
        self.refund_bonus_grant();
        Ok(name.map_or(0, |name| self.grant_bonus(name)))
    }

    /// Remove the automatic grant, returning the skill it was attached to.
    fn refund_bonus_grant(&mut self) -> Option<String> {
        let grant = self.bonus_skill.take()?;
        if let Some(alloc) = self.allocations.get_mut(&grant.skill) {
            alloc.bonus = alloc.bonus.saturating_sub(grant.granted);
        }
        self.drop_empty();
        Some(grant.skill)
    }

    fn grant_bonus(&mut self, skill: String) -> u32 {
        let current = self.allocation(&skill).bonus;
        let headroom = self
            .cap_for(Pool::Bonus)
            .map_or(u32::MAX, |cap| cap.saturating_sub(current));
        let granted = self
            .config
            .bonus_skill_amount
            .min(self.remaining(Pool::Bonus))
            .min(headroom);
        if granted > 0 {
            let entry = self.allocations.entry(skill.clone()).or_default();
            entry.bonus = entry.bonus.saturating_add(granted);
        }
        log::debug!("bonus skill {skill} granted {granted}");
        self.bonus_skill = Some(BonusGrant { skill, granted });
        granted
    }

    /// Pick one of the culture's combat styles.
    ///
    /// # Errors
    ///
    /// Rejects a style the active culture does not teach.
    pub fn set_combat_style(&mut self, style: &str) -> Result<(), Rejection> {
        let culture = self.culture().ok_or(Rejection::MissingContext {
            kind: ReferenceKind::Culture,
        })?;
        let chosen = culture
            .combat_styles
            .iter()
            .find(|s| s.eq_ignore_ascii_case(style.trim()))
            .cloned()
            .ok_or_else(|| Rejection::NotOffered {
                target: style.to_string(),
                kind: ReferenceKind::Culture,
            })?;
        self.combat_style = Some(chosen);
        Ok(())
    }

    /// Clear every allocation, selection and bonus grant, keeping archetypes.
    pub fn reset(&mut self) {
        self.allocations.clear();
        self.culture_professional.clear();
        self.career_professional.clear();
        self.bonus_skill = None;
    }

    // Skill values -------------------------------------------------------------

    /// A professional skill is trained once selected or holding points.
    fn is_trained(&self, skill: &str) -> bool {
        self.culture_professional.admits(skill)
            || self.career_professional.admits(skill)
            || !self.allocation(skill).is_empty()
    }

    /// Formula base of `skill`; untrained professional skills have none.
    #[must_use]
    pub fn base_value(&self, skill: &str, values: &Characteristics) -> i32 {
        match self.catalog.skill(skill) {
            Some(def) if def.category == SkillCategory::Standard => def.formula.evaluate(values),
            Some(def) if self.is_trained(skill) => def.formula.evaluate(values),
            _ => 0,
        }
    }

    /// Full breakdown of one skill.
    #[must_use]
    pub fn skill_value(&self, skill: &str, values: &Characteristics) -> SkillValue {
        let name = self.canonical_name(skill);
        let alloc = self.allocation(&name);
        let base = self.base_value(&name, values);
        let standard = self.catalog.is_standard(&name);

        let mut culture_points = alloc.culture;
        if self.config.culture_standard_floor
            && self
                .culture()
                .is_some_and(|c| list_admits(&c.standard_skills, &name))
        {
            culture_points = culture_points.max(CULTURE_STANDARD_FLOOR);
        }

        let mut total = base
            + points_to_i32(culture_points)
            + points_to_i32(alloc.career)
            + points_to_i32(alloc.bonus);
        if standard {
            total = total.max(self.config.standard_floor);
        }

        SkillValue {
            name,
            base,
            culture: alloc.culture,
            career: alloc.career,
            bonus: alloc.bonus,
            total,
            standard,
        }
    }

    /// Total of one skill, floors applied.
    #[must_use]
    pub fn compute_total(&self, skill: &str, values: &Characteristics) -> i32 {
        self.skill_value(skill, values).total
    }

    /// Every skill with a base or any points: standard skills in catalog
    /// order, then professional selections, then anything else allocated.
    #[must_use]
    pub fn skills_in_play(&self, values: &Characteristics) -> Vec<SkillValue> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        };

        let style_skill = self.combat_style_skill();
        for def in self.catalog.standard_skills() {
            match (&style_skill, normalize_skill_name(&def.name)) {
                (Some(style), COMBAT_STYLE) => push(style.clone()),
                _ => push(def.name.clone()),
            }
        }
        for skill in self
            .culture_professional
            .iter()
            .chain(self.career_professional.iter())
        {
            push(skill.clone());
        }
        for name in self.allocations.keys() {
            push(name.clone());
        }

        names
            .iter()
            .map(|name| self.skill_value(name, values))
            .filter(|value| value.base != 0 || value.culture + value.career + value.bonus > 0)
            .collect()
    }
}
