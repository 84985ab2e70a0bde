//! Heroforge Build Engine
//!
//! Platform-agnostic rules engine for building tabletop RPG characters:
//! characteristics, derived statistics, skill-point pools, starting money and
//! equipment. Renderers and exporters only ever see [`BuildSnapshot`]s.

pub mod allocation;
pub mod catalog;
pub mod characteristics;
pub mod config;
pub(crate) mod constants;
pub mod derived;
pub mod dice;
pub mod error;
pub mod money;
pub mod numbers;
pub mod rng;
pub mod session;
pub mod snapshot;

use std::rc::Rc;
use thiserror::Error;

// Re-export commonly used types
pub use allocation::{
    AllocationEngine, AllocationOutcome, BonusGrant, Pool, PoolStatus, ProfessionalSelection,
    Side, SkillAllocation, SkillValue,
};
pub use catalog::{
    AgeBracket, Career, CatalogError, Culture, EquipmentItem, ReferenceCatalog, SkillCategory,
    SkillDef, SkillFormula, SocialClass, list_admits, normalize_skill_name,
};
pub use characteristics::{AttributeGenerator, Characteristic, Characteristics, GenerationMethod};
pub use config::{BuildConfig, CapScope, ConfigError, ExperienceOverflow, ProfessionalSeed};
pub use derived::{DerivedStats, HitLocations, damage_modifier, experience_modifier};
pub use dice::{DiceExpr, DiceParseError};
pub use error::{ReferenceKind, Rejection};
pub use money::{ClassChoice, MoneyLedger, MoneyRoll, Purchase};
pub use rng::{CountingRng, RngBundle};
pub use session::{BuildSession, Command, Identity};
pub use snapshot::{AgeSummary, ArchetypeSummary, BuildSnapshot, PointBuySummary};

/// Source of reference data and rule configuration.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the reference catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation.
    fn load_catalog(&self) -> Result<ReferenceCatalog, Self::Error>;

    /// Load the rule configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_config(&self) -> Result<BuildConfig, Self::Error>;
}

/// The catalog compiled into the crate with default rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogLoader for BundledCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<ReferenceCatalog, Self::Error> {
        ReferenceCatalog::load_bundled()
    }

    fn load_config(&self) -> Result<BuildConfig, Self::Error> {
        Ok(BuildConfig::default())
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Catalog and config supplied as JSON text; `None` falls back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
    pub catalog: Option<String>,
    pub config: Option<String>,
}

impl CatalogLoader for JsonSource {
    type Error = SourceError;

    fn load_catalog(&self) -> Result<ReferenceCatalog, Self::Error> {
        let catalog = match &self.catalog {
            Some(json) => ReferenceCatalog::from_json(json)?,
            None => ReferenceCatalog::load_bundled()?,
        };
        Ok(catalog)
    }

    fn load_config(&self) -> Result<BuildConfig, Self::Error> {
        let config = match &self.config {
            Some(json) => BuildConfig::from_json(json)?,
            None => BuildConfig::default(),
        };
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum EngineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("failed to load reference data")]
    Load(#[source] E),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Creates build sessions over the data its loader provides.
pub struct ForgeEngine<L>
where
    L: CatalogLoader,
{
    loader: L,
}

impl<L> ForgeEngine<L>
where
    L: CatalogLoader,
{
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Load the catalog and config and open a session seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the config does not validate.
    pub fn create_session(&self, seed: u64) -> Result<BuildSession, EngineError<L::Error>> {
        let config = self.loader.load_config().map_err(EngineError::Load)?;
        self.create_session_with(seed, config)
    }

    /// Like [`ForgeEngine::create_session`] with an explicit config.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails to load or `config` is invalid.
    pub fn create_session_with(
        &self,
        seed: u64,
        config: BuildConfig,
    ) -> Result<BuildSession, EngineError<L::Error>> {
        config.validate()?;
        let catalog = self.loader.load_catalog().map_err(EngineError::Load)?;
        log::info!("opening build session with seed {seed}");
        Ok(BuildSession::from_validated(Rc::new(catalog), config, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl CatalogLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<ReferenceCatalog, Self::Error> {
            Ok(ReferenceCatalog::load_bundled().unwrap())
        }

        fn load_config(&self) -> Result<BuildConfig, Self::Error> {
            Ok(BuildConfig::default().with_point_buy_budget(90))
        }
    }

    #[test]
    fn engine_creates_sessions_from_loader_config() {
        let engine = ForgeEngine::new(FixtureLoader);
        let session = engine.create_session(0xABCD).unwrap();
        assert_eq!(session.seed(), 0xABCD);
        assert_eq!(session.config().point_buy_budget, 90);
        assert_eq!(session.attributes().budget(), 90);
    }

    #[test]
    fn explicit_config_is_validated() {
        let engine = ForgeEngine::new(BundledCatalog);
        let config = BuildConfig::default().with_point_buy_budget(10);
        assert!(matches!(
            engine.create_session_with(1, config),
            Err(EngineError::Config(ConfigError::BudgetRange { .. }))
        ));
    }

    #[test]
    fn json_source_reports_bad_catalog() {
        let engine = ForgeEngine::new(JsonSource {
            catalog: Some("{ not json".to_string()),
            config: None,
        });
        let err = engine.create_session(1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Load(SourceError::Catalog(CatalogError::Parse(_)))
        ));
    }

    #[test]
    fn json_source_reads_config_overrides() {
        let engine = ForgeEngine::new(JsonSource {
            catalog: None,
            config: Some(r#"{"cap_scope": "bonus_only"}"#.to_string()),
        });
        let session = engine.create_session(5).unwrap();
        assert_eq!(session.config().cap_scope, CapScope::BonusOnly);
    }
}
