//! Starting money and the equipment spend ledger.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Culture, EquipmentItem};
use crate::constants::{PERCENTILE_MAX, PERCENTILE_MIN};
use crate::error::{ReferenceKind, Rejection};
use crate::numbers::{i64_to_f64, round_f64_to_i64};

/// How the social class for a money roll is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassChoice {
    /// Percentile roll against the culture's table.
    #[default]
    Roll,
    Named(String),
}

impl ClassChoice {
    #[must_use]
    pub fn from_option(name: Option<&str>) -> Self {
        name.map_or(Self::Roll, |name| Self::Named(name.to_string()))
    }
}

/// Details of one starting-money roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyRoll {
    pub dice_total: i64,
    pub social_class: String,
    pub multiplier: f64,
    pub percentile: Option<u32>,
    pub starting_money: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub key: String,
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoneyLedger {
    starting_money: i64,
    social_class: Option<String>,
    purchases: Vec<Purchase>,
}

impl MoneyLedger {
    #[must_use]
    pub const fn starting_money(&self) -> i64 {
        self.starting_money
    }

    #[must_use]
    pub fn social_class(&self) -> Option<&str> {
        self.social_class.as_deref()
    }

    #[must_use]
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    #[must_use]
    pub fn spent(&self) -> i64 {
        self.purchases.iter().map(|p| p.cost).sum()
    }

    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.starting_money - self.spent()
    }

    /// Roll starting money for `culture` and clear any purchases.
    ///
    /// The class dice and money dice draw from separate streams so naming a
    /// class never shifts the money roll.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnknownReference`] when a named class is not in
    /// the culture's table or the percentile falls outside every band.
    pub fn roll_starting_money<M, C>(
        &mut self,
        culture: &Culture,
        choice: &ClassChoice,
        money_rng: &mut M,
        class_rng: &mut C,
    ) -> Result<MoneyRoll, Rejection>
    where
        M: Rng + ?Sized,
        C: Rng + ?Sized,
    {
        let (class, percentile) = match choice {
            ClassChoice::Named(name) => {
                let class = culture
                    .social_class(name)
                    .ok_or_else(|| Rejection::unknown(ReferenceKind::SocialClass, name))?;
                (class, None)
            }
            ClassChoice::Roll => {
                let roll = class_rng.gen_range(PERCENTILE_MIN..=PERCENTILE_MAX);
                let class = culture.social_class_for_roll(roll).ok_or_else(|| {
                    Rejection::unknown(ReferenceKind::SocialClass, &roll.to_string())
                })?;
                (class, Some(roll))
            }
        };

        let dice_total = culture.money.roll(money_rng);
        let starting_money = round_f64_to_i64(i64_to_f64(dice_total) * class.multiplier);

        self.starting_money = starting_money;
        self.social_class = Some(class.name.clone());
        self.purchases.clear();
        log::info!(
            "{} starting money {starting_money} ({dice_total} x {} as {})",
            culture.name,
            class.multiplier,
            class.name
        );

        Ok(MoneyRoll {
            dice_total,
            social_class: class.name.clone(),
            multiplier: class.multiplier,
            percentile,
            starting_money,
        })
    }

    /// Buy one `item`, returning the money left afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::UnderfundedPurchase`] when the item costs more
    /// than remains; the ledger is unchanged.
    pub fn purchase(&mut self, item: &EquipmentItem) -> Result<i64, Rejection> {
        let remaining = self.remaining();
        if item.cost > remaining {
            return Err(Rejection::UnderfundedPurchase {
                item: item.key.clone(),
                cost: item.cost,
                remaining,
            });
        }
        self.purchases.push(Purchase {
            key: item.key.clone(),
            name: item.name.clone(),
            cost: item.cost,
        });
        log::debug!("bought {} for {}", item.key, item.cost);
        Ok(self.remaining())
    }

    /// Remove the most recent purchase of `key`. Returns false if none exists.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(index) = self.purchases.iter().rposition(|p| p.key == key) else {
            return false;
        };
        let refunded = self.purchases.remove(index);
        log::debug!("returned {} for {}", refunded.key, refunded.cost);
        true
    }

    pub fn clear_purchases(&mut self) {
        self.purchases.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReferenceCatalog;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn funded(amount: i64) -> MoneyLedger {
        MoneyLedger {
            starting_money: amount,
            social_class: Some("Freeman".to_string()),
            purchases: Vec::new(),
        }
    }

    fn item(key: &str, cost: i64) -> EquipmentItem {
        EquipmentItem {
            key: key.to_string(),
            name: key.to_string(),
            category: "gear".to_string(),
            cost,
        }
    }

    #[test]
    fn underfunded_purchase_leaves_ledger_unchanged() {
        let mut ledger = funded(80);
        ledger.purchase(&item("dagger", 50)).unwrap();
        assert_eq!(ledger.remaining(), 30);
        let before = ledger.clone();

        let err = ledger.purchase(&item("buckler", 50)).unwrap_err();
        assert_eq!(
            err,
            Rejection::UnderfundedPurchase {
                item: "buckler".to_string(),
                cost: 50,
                remaining: 30
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn exact_funds_are_enough() {
        let mut ledger = funded(30);
        assert_eq!(ledger.purchase(&item("dagger", 30)).unwrap(), 0);
        assert!(ledger.purchase(&item("torch", 1)).is_err());
    }

    #[test]
    fn remove_refunds_one_instance() {
        let mut ledger = funded(100);
        ledger.purchase(&item("torch", 1)).unwrap();
        ledger.purchase(&item("torch", 1)).unwrap();
        assert!(ledger.remove("torch"));
        assert_eq!(ledger.remaining(), 99);
        assert_eq!(ledger.purchases().len(), 1);
        assert!(!ledger.remove("riding_horse"));
        assert_eq!(ledger.remaining(), 99);
    }

    #[test]
    fn named_class_scales_the_dice_roll() {
        let catalog = ReferenceCatalog::load_bundled().unwrap();
        let culture = catalog.culture("barbarian").unwrap();
        let mut ledger = funded(500);
        ledger.purchase(&item("torch", 1)).unwrap();

        let mut money_rng = SmallRng::seed_from_u64(7);
        let mut class_rng = SmallRng::seed_from_u64(8);
        let roll = ledger
            .roll_starting_money(
                culture,
                &ClassChoice::Named("gentry".to_string()),
                &mut money_rng,
                &mut class_rng,
            )
            .unwrap();

        assert_eq!(roll.social_class, "Gentry");
        assert_eq!(roll.percentile, None);
        assert!((200..=1200).contains(&roll.dice_total));
        assert_eq!(roll.starting_money, roll.dice_total * 3);
        assert_eq!(ledger.starting_money(), roll.starting_money);
        assert!(ledger.purchases().is_empty());
    }

    #[test]
    fn rolled_class_comes_from_the_percentile_table() {
        let catalog = ReferenceCatalog::load_bundled().unwrap();
        let culture = catalog.culture("primitive").unwrap();
        let mut ledger = MoneyLedger::default();
        let mut money_rng = SmallRng::seed_from_u64(1);
        let mut class_rng = SmallRng::seed_from_u64(2);

        for _ in 0..50 {
            let roll = ledger
                .roll_starting_money(culture, &ClassChoice::Roll, &mut money_rng, &mut class_rng)
                .unwrap();
            let percentile = roll.percentile.unwrap();
            let expected = culture.social_class_for_roll(percentile).unwrap();
            assert_eq!(roll.social_class, expected.name);
            assert_eq!(ledger.social_class(), Some(expected.name.as_str()));
        }
    }

    #[test]
    fn unknown_class_is_rejected_without_change() {
        let catalog = ReferenceCatalog::load_bundled().unwrap();
        let culture = catalog.culture("nomadic").unwrap();
        let mut ledger = funded(40);
        let before = ledger.clone();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut class_rng = SmallRng::seed_from_u64(4);
        let err = ledger
            .roll_starting_money(
                culture,
                &ClassChoice::Named("Slave".to_string()),
                &mut rng,
                &mut class_rng,
            )
            .unwrap_err();
        assert!(matches!(err, Rejection::UnknownReference { .. }));
        assert_eq!(ledger, before);
    }
}
