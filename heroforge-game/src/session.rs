//! The build session: single owner of every piece of mutable build state.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::allocation::{AllocationEngine, AllocationOutcome, Pool, Side, SkillValue};
use crate::catalog::ReferenceCatalog;
use crate::characteristics::{
    AttributeGenerator, Characteristic, Characteristics, GenerationMethod,
};
use crate::config::{BuildConfig, ConfigError};
use crate::derived::DerivedStats;
use crate::error::{ReferenceKind, Rejection};
use crate::money::{ClassChoice, MoneyLedger, MoneyRoll};
use crate::numbers::i64_to_u32;
use crate::rng::RngBundle;
use crate::snapshot::BuildSnapshot;

/// Descriptive fields copied verbatim into snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub name: String,
    pub player: String,
    pub species: String,
    pub gender: String,
    pub age: Option<u32>,
    pub notes: String,
}

/// One discrete edit, replayable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SetIdentity {
        identity: Identity,
    },
    RollCharacteristics,
    SetMethod {
        method: GenerationMethod,
    },
    SetCharacteristic {
        characteristic: Characteristic,
        value: i32,
    },
    SetCulture {
        key: String,
    },
    SetCareer {
        key: String,
    },
    SetAge {
        key: String,
    },
    RollAge,
    ToggleProfessional {
        side: Side,
        skill: String,
        selected: bool,
    },
    Allocate {
        skill: String,
        pool: Pool,
        amount: u32,
    },
    SetBonusSkill {
        #[serde(default)]
        skill: Option<String>,
    },
    SetCombatStyle {
        style: String,
    },
    RollStartingMoney {
        #[serde(default)]
        social_class: Option<String>,
    },
    Purchase {
        item: String,
    },
    Remove {
        item: String,
    },
    ResetAllocations,
    ResetEquipment,
}

/// Owns characteristics, allocations, money, identity and RNG streams.
///
/// Collaborators read the build through [`BuildSession::snapshot`]; every
/// mutation goes through a typed method or [`BuildSession::apply`].
#[derive(Debug, Clone)]
pub struct BuildSession {
    catalog: Rc<ReferenceCatalog>,
    config: BuildConfig,
    identity: Identity,
    attributes: AttributeGenerator,
    allocation: AllocationEngine,
    money: MoneyLedger,
    rng: RngBundle,
}

impl BuildSession {
    /// Create a session and roll its first set of characteristics.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(
        catalog: Rc<ReferenceCatalog>,
        config: BuildConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(catalog, config, seed))
    }

    pub(crate) fn from_validated(
        catalog: Rc<ReferenceCatalog>,
        config: BuildConfig,
        seed: u64,
    ) -> Self {
        let mut session = Self {
            allocation: AllocationEngine::new(Rc::clone(&catalog), config.clone()),
            attributes: AttributeGenerator::new(config.point_buy_budget),
            catalog,
            config,
            identity: Identity::default(),
            money: MoneyLedger::default(),
            rng: RngBundle::from_user_seed(seed),
        };
        session.roll_characteristics();
        session
    }

    /// Session over the bundled catalog with default rules.
    #[must_use]
    pub fn with_defaults(seed: u64) -> Self {
        Self::from_validated(
            Rc::new(ReferenceCatalog::default_catalog().clone()),
            BuildConfig::default(),
            seed,
        )
    }

    // Read access ----------------------------------------------------------------

    #[must_use]
    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn attributes(&self) -> &AttributeGenerator {
        &self.attributes
    }

    #[must_use]
    pub const fn characteristics(&self) -> &Characteristics {
        self.attributes.values()
    }

    #[must_use]
    pub const fn allocation(&self) -> &AllocationEngine {
        &self.allocation
    }

    #[must_use]
    pub const fn money(&self) -> &MoneyLedger {
        &self.money
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.total_draws()
    }

    /// Derived statistics for the current characteristics.
    #[must_use]
    pub fn derived(&self) -> DerivedStats {
        DerivedStats::compute(self.characteristics(), &self.config)
    }

    #[must_use]
    pub fn skill(&self, name: &str) -> SkillValue {
        self.allocation.skill_value(name, self.characteristics())
    }

    #[must_use]
    pub fn skills(&self) -> Vec<SkillValue> {
        self.allocation.skills_in_play(self.characteristics())
    }

    #[must_use]
    pub fn snapshot(&self) -> BuildSnapshot {
        BuildSnapshot::capture(self)
    }

    // Identity and characteristics -----------------------------------------------

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    pub fn roll_characteristics(&mut self) {
        self.attributes.roll(self.rng.characteristics());
    }

    pub fn set_method(&mut self, method: GenerationMethod) {
        self.attributes.set_method(method);
        log::debug!("generation method {method:?}");
    }

    /// # Errors
    ///
    /// Returns [`Rejection::OutOfRange`] when a point-buy edit overspends.
    pub fn set_characteristic(
        &mut self,
        which: Characteristic,
        value: i32,
    ) -> Result<i32, Rejection> {
        self.attributes.set_manual(which, value)
    }

    // Archetypes and age ---------------------------------------------------------

    /// Switch culture; the money ledger is reset since its basis changed.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown key.
    pub fn set_culture(&mut self, key: &str) -> Result<(), Rejection> {
        self.allocation.set_culture(key)?;
        self.money.reset();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown key.
    pub fn set_career(&mut self, key: &str) -> Result<(), Rejection> {
        self.allocation.set_career(key)
    }

    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown key.
    pub fn set_age(&mut self, key: &str) -> Result<(), Rejection> {
        self.allocation.set_age(key)
    }

    /// Roll an age in years from the active bracket into the identity.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::MissingContext`] when no age bracket is set.
    pub fn roll_age(&mut self) -> Result<u32, Rejection> {
        let dice = self
            .allocation
            .age_bracket()
            .map(|bracket| bracket.age)
            .ok_or(Rejection::MissingContext {
                kind: ReferenceKind::AgeBracket,
            })?;
        let rolled = dice.roll(self.rng.age());
        let years = i64_to_u32(rolled);
        self.identity.age = Some(years);
        log::debug!("rolled age {years}");
        Ok(years)
    }

    // Skills ---------------------------------------------------------------------

    /// # Errors
    ///
    /// See [`AllocationEngine::toggle_professional`].
    pub fn toggle_professional(
        &mut self,
        side: Side,
        skill: &str,
        selected: bool,
    ) -> Result<bool, Rejection> {
        self.allocation.toggle_professional(side, skill, selected)
    }

    /// # Errors
    ///
    /// See [`AllocationEngine::allocate`].
    pub fn allocate(
        &mut self,
        skill: &str,
        pool: Pool,
        amount: u32,
    ) -> Result<AllocationOutcome, Rejection> {
        self.allocation.allocate(skill, pool, amount)
    }

    /// # Errors
    ///
    /// Rejects a blank skill name.
    pub fn set_bonus_skill(&mut self, skill: Option<&str>) -> Result<u32, Rejection> {
        self.allocation.set_bonus_skill(skill)
    }

    /// # Errors
    ///
    /// Rejects a style the active culture does not teach.
    pub fn set_combat_style(&mut self, style: &str) -> Result<(), Rejection> {
        self.allocation.set_combat_style(style)
    }

    pub fn reset_allocations(&mut self) {
        self.allocation.reset();
        log::debug!("allocations reset");
    }

    // Money ----------------------------------------------------------------------

    /// Roll starting money for the active culture.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::MissingContext`] without a culture and
    /// [`Rejection::UnknownReference`] for an unknown social class.
    pub fn roll_starting_money(
        &mut self,
        social_class: Option<&str>,
    ) -> Result<MoneyRoll, Rejection> {
        let culture = self.allocation.culture().ok_or(Rejection::MissingContext {
            kind: ReferenceKind::Culture,
        })?;
        let (money_rng, class_rng) = self.rng.money_streams();
        self.money.roll_starting_money(
            culture,
            &ClassChoice::from_option(social_class),
            money_rng,
            class_rng,
        )
    }

    /// Buy one catalog item, returning the money left.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] for an unknown item and
    /// [`Rejection::UnderfundedPurchase`] when funds are short.
    pub fn purchase(&mut self, key: &str) -> Result<i64, Rejection> {
        let item = self
            .catalog
            .item(key)
            .ok_or_else(|| Rejection::unknown(ReferenceKind::Item, key))?;
        self.money.purchase(item)
    }

    /// Return one purchased item. False when it was never bought.
    pub fn remove(&mut self, key: &str) -> bool {
        self.money.remove(key)
    }

    pub fn reset_equipment(&mut self) {
        self.money.clear_purchases();
    }

    // Commands -------------------------------------------------------------------

    /// Apply one command and return the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns the command's [`Rejection`]; the session is left unchanged.
    pub fn apply(&mut self, command: Command) -> Result<BuildSnapshot, Rejection> {
        match self.dispatch(&command) {
            Ok(()) => Ok(self.snapshot()),
            Err(rejection) => {
                log::debug!("rejected {command:?}: {rejection}");
                Err(rejection)
            }
        }
    }

    fn dispatch(&mut self, command: &Command) -> Result<(), Rejection> {
        match command {
            Command::SetIdentity { identity } => self.set_identity(identity.clone()),
            Command::RollCharacteristics => self.roll_characteristics(),
            Command::SetMethod { method } => self.set_method(*method),
            Command::SetCharacteristic {
                characteristic,
                value,
            } => {
                self.set_characteristic(*characteristic, *value)?;
            }
            Command::SetCulture { key } => self.set_culture(key)?,
            Command::SetCareer { key } => self.set_career(key)?,
            Command::SetAge { key } => self.set_age(key)?,
            Command::RollAge => {
                self.roll_age()?;
            }
            Command::ToggleProfessional {
                side,
                skill,
                selected,
            } => {
                self.toggle_professional(*side, skill, *selected)?;
            }
            Command::Allocate {
                skill,
                pool,
                amount,
            } => {
                self.allocate(skill, *pool, *amount)?;
            }
            Command::SetBonusSkill { skill } => {
                self.set_bonus_skill(skill.as_deref())?;
            }
            Command::SetCombatStyle { style } => self.set_combat_style(style)?,
            Command::RollStartingMoney { social_class } => {
                self.roll_starting_money(social_class.as_deref())?;
            }
            Command::Purchase { item } => {
                self.purchase(item)?;
            }
            Command::Remove { item } => {
                self.remove(item);
            }
            Command::ResetAllocations => self.reset_allocations(),
            Command::ResetEquipment => self.reset_equipment(),
        }
        Ok(())
    }

    /// Apply commands in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns the index and [`Rejection`] of the first failing command.
    pub fn apply_all<I>(&mut self, commands: I) -> Result<BuildSnapshot, (usize, Rejection)>
    where
        I: IntoIterator<Item = Command>,
    {
        for (index, command) in commands.into_iter().enumerate() {
            self.apply(command).map_err(|rejection| (index, rejection))?;
        }
        Ok(self.snapshot())
    }

    /// Replace the RNG streams with ones derived from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngBundle::from_user_seed(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Purchase;

    fn session() -> BuildSession {
        let mut session = BuildSession::with_defaults(2024);
        session.set_culture("barbarian").unwrap();
        session.set_career("warrior").unwrap();
        session.set_age("adult").unwrap();
        session
    }

    #[test]
    fn new_session_rolls_characteristics() {
        let session = BuildSession::with_defaults(7);
        assert_eq!(session.attributes().method(), GenerationMethod::Roll);
        assert!(session.rng_draws() > 0);
        for which in Characteristic::ALL {
            let value = session.characteristics().get(which);
            assert!((which.minimum()..=18).contains(&value));
        }
    }

    #[test]
    fn same_seed_gives_same_rolls() {
        let a = BuildSession::with_defaults(99);
        let b = BuildSession::with_defaults(99);
        assert_eq!(a.characteristics(), b.characteristics());
    }

    #[test]
    fn invalid_config_is_refused() {
        let catalog = Rc::new(ReferenceCatalog::load_bundled().unwrap());
        let config = BuildConfig::default().with_point_buy_budget(200);
        assert!(BuildSession::new(catalog, config, 1).is_err());
    }

    #[test]
    fn culture_change_resets_money() {
        let mut session = session();
        session.roll_starting_money(Some("Freeman")).unwrap();
        assert!(session.money().starting_money() > 0);
        session.set_culture("nomadic").unwrap();
        assert_eq!(session.money().starting_money(), 0);
        assert_eq!(session.money().social_class(), None);
    }

    #[test]
    fn money_requires_a_culture() {
        let mut session = BuildSession::with_defaults(5);
        assert_eq!(
            session.roll_starting_money(None).unwrap_err(),
            Rejection::MissingContext {
                kind: ReferenceKind::Culture
            }
        );
    }

    #[test]
    fn roll_age_uses_bracket_dice() {
        let mut session = session();
        let years = session.roll_age().unwrap();
        assert!((17..=27).contains(&years));
        assert_eq!(session.identity().age, Some(years));
    }

    #[test]
    fn purchase_and_remove_through_the_catalog() {
        let mut session = session();
        session.roll_starting_money(Some("Freeman")).unwrap();
        let start = session.money().starting_money();
        let left = session.purchase("torch").unwrap();
        assert_eq!(left, start - 1);
        assert_eq!(
            session.money().purchases(),
            [Purchase {
                key: "torch".to_string(),
                name: "Torch".to_string(),
                cost: 1
            }]
        );
        assert!(matches!(
            session.purchase("laser"),
            Err(Rejection::UnknownReference { .. })
        ));
        assert!(session.remove("torch"));
        assert!(!session.remove("torch"));
        assert_eq!(session.money().remaining(), start);
    }

    #[test]
    fn apply_returns_fresh_snapshot() {
        let mut session = session();
        let snapshot = session
            .apply(Command::Allocate {
                skill: "Athletics".to_string(),
                pool: Pool::Culture,
                amount: 10,
            })
            .unwrap();
        let row = snapshot.skill("Athletics").unwrap();
        assert_eq!(row.culture, 10);
        assert_eq!(snapshot.pool(Pool::Culture).unwrap().remaining, 90);
    }

    #[test]
    fn rejected_command_leaves_snapshot_identical() {
        let mut session = session();
        session.allocate("Brawn", Pool::Culture, 10).unwrap();
        let before = session.snapshot();
        let err = session
            .apply(Command::Allocate {
                skill: "Willpower".to_string(),
                pool: Pool::Career,
                amount: 10,
            })
            .unwrap_err();
        assert!(matches!(err, Rejection::IneligibleTarget { .. }));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn commands_parse_from_tagged_json() {
        let json = r#"[
            {"op": "set_culture", "key": "civilised"},
            {"op": "set_characteristic", "characteristic": "STR", "value": 12},
            {"op": "toggle_professional", "side": "career", "skill": "Lore", "selected": true},
            {"op": "allocate", "skill": "Lore (History)", "pool": "career", "amount": 10},
            {"op": "set_bonus_skill"},
            {"op": "roll_starting_money", "social_class": "Gentry"},
            {"op": "reset_equipment"}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 7);
        assert_eq!(commands[4], Command::SetBonusSkill { skill: None });
        assert_eq!(
            commands[1],
            Command::SetCharacteristic {
                characteristic: Characteristic::Strength,
                value: 12
            }
        );
    }

    #[test]
    fn apply_all_reports_failing_index() {
        let mut session = BuildSession::with_defaults(3);
        let commands = vec![
            Command::SetCulture {
                key: "primitive".to_string(),
            },
            Command::SetCareer {
                key: "pirate".to_string(),
            },
        ];
        let (index, rejection) = session.apply_all(commands).unwrap_err();
        assert_eq!(index, 1);
        assert!(matches!(rejection, Rejection::UnknownReference { .. }));
        assert!(session.allocation().culture().is_some());
    }
}
