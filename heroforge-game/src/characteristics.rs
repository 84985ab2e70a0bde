//! The seven characteristics and the ways a build can generate them.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CHARACTERISTIC_DIE_SIDES, CHARACTERISTIC_MAX_MANUAL, CHARACTERISTIC_MAX_ROLLED,
    CHARACTERISTIC_MIN_NORMAL, CHARACTERISTIC_MIN_SIZE_INTELLECT, NORMAL_ROLL_DICE,
    SIZE_INTELLECT_ROLL_BONUS, SIZE_INTELLECT_ROLL_DICE,
};
use crate::dice::DiceExpr;
use crate::error::{ReferenceKind, Rejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Characteristic {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "SIZ")]
    Size,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "POW")]
    Power,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Characteristic {
    pub const ALL: [Self; 7] = [
        Self::Strength,
        Self::Constitution,
        Self::Size,
        Self::Dexterity,
        Self::Intelligence,
        Self::Power,
        Self::Charisma,
    ];

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Constitution => "CON",
            Self::Size => "SIZ",
            Self::Dexterity => "DEX",
            Self::Intelligence => "INT",
            Self::Power => "POW",
            Self::Charisma => "CHA",
        }
    }

    /// Size and intellect start at 8; everything else at 3.
    #[must_use]
    pub const fn minimum(self) -> i32 {
        match self {
            Self::Size | Self::Intelligence => CHARACTERISTIC_MIN_SIZE_INTELLECT,
            _ => CHARACTERISTIC_MIN_NORMAL,
        }
    }

    /// Dice used when the characteristic is rolled.
    #[must_use]
    pub const fn roll_expr(self) -> DiceExpr {
        match self {
            Self::Size | Self::Intelligence => {
                DiceExpr::new(SIZE_INTELLECT_ROLL_DICE, CHARACTERISTIC_DIE_SIDES)
                    .plus(SIZE_INTELLECT_ROLL_BONUS)
            }
            _ => DiceExpr::new(NORMAL_ROLL_DICE, CHARACTERISTIC_DIE_SIDES),
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Characteristic {
    type Err = Rejection;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let upper = text.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.abbreviation() == upper || format!("{c:?}").to_ascii_uppercase() == upper)
            .ok_or_else(|| Rejection::unknown(ReferenceKind::Characteristic, text))
    }
}

/// How characteristic values are produced and bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    #[default]
    Roll,
    PointBuy,
    Manual,
}

impl GenerationMethod {
    #[must_use]
    pub const fn maximum(self) -> i32 {
        match self {
            Self::Roll | Self::PointBuy => CHARACTERISTIC_MAX_ROLLED,
            Self::Manual => CHARACTERISTIC_MAX_MANUAL,
        }
    }
}

/// Characteristic values of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristics {
    #[serde(rename = "STR")]
    pub strength: i32,
    #[serde(rename = "CON")]
    pub constitution: i32,
    #[serde(rename = "SIZ")]
    pub size: i32,
    #[serde(rename = "DEX")]
    pub dexterity: i32,
    #[serde(rename = "INT")]
    pub intelligence: i32,
    #[serde(rename = "POW")]
    pub power: i32,
    #[serde(rename = "CHA")]
    pub charisma: i32,
}

impl Characteristics {
    /// Every characteristic at its minimum.
    #[must_use]
    pub const fn minimums() -> Self {
        Self {
            strength: CHARACTERISTIC_MIN_NORMAL,
            constitution: CHARACTERISTIC_MIN_NORMAL,
            size: CHARACTERISTIC_MIN_SIZE_INTELLECT,
            dexterity: CHARACTERISTIC_MIN_NORMAL,
            intelligence: CHARACTERISTIC_MIN_SIZE_INTELLECT,
            power: CHARACTERISTIC_MIN_NORMAL,
            charisma: CHARACTERISTIC_MIN_NORMAL,
        }
    }

    /// Every characteristic at the same value, for fixtures and examples.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            constitution: value,
            size: value,
            dexterity: value,
            intelligence: value,
            power: value,
            charisma: value,
        }
    }

    #[must_use]
    pub const fn get(&self, which: Characteristic) -> i32 {
        match which {
            Characteristic::Strength => self.strength,
            Characteristic::Constitution => self.constitution,
            Characteristic::Size => self.size,
            Characteristic::Dexterity => self.dexterity,
            Characteristic::Intelligence => self.intelligence,
            Characteristic::Power => self.power,
            Characteristic::Charisma => self.charisma,
        }
    }

    pub const fn set(&mut self, which: Characteristic, value: i32) {
        match which {
            Characteristic::Strength => self.strength = value,
            Characteristic::Constitution => self.constitution = value,
            Characteristic::Size => self.size = value,
            Characteristic::Dexterity => self.dexterity = value,
            Characteristic::Intelligence => self.intelligence = value,
            Characteristic::Power => self.power = value,
            Characteristic::Charisma => self.charisma = value,
        }
    }

    #[must_use]
    pub fn sum(&self) -> i32 {
        Characteristic::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Builder-style setter used by fixtures.
    #[must_use]
    pub const fn with(mut self, which: Characteristic, value: i32) -> Self {
        self.set(which, value);
        self
    }
}

impl Default for Characteristics {
    fn default() -> Self {
        Self::minimums()
    }
}

fn minimum_sum() -> i32 {
    Characteristics::minimums().sum()
}

/// Owns characteristic values and enforces the active generation method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGenerator {
    values: Characteristics,
    method: GenerationMethod,
    budget: i32,
}

impl AttributeGenerator {
    #[must_use]
    pub const fn new(budget: i32) -> Self {
        Self {
            values: Characteristics::minimums(),
            method: GenerationMethod::Roll,
            budget,
        }
    }

    #[must_use]
    pub const fn values(&self) -> &Characteristics {
        &self.values
    }

    #[must_use]
    pub const fn method(&self) -> GenerationMethod {
        self.method
    }

    #[must_use]
    pub const fn budget(&self) -> i32 {
        self.budget
    }

    /// Points consumed above the minimums.
    #[must_use]
    pub fn points_spent(&self) -> i32 {
        self.values.sum() - minimum_sum()
    }

    /// Point-buy budget still available; negative values never occur under point-buy.
    #[must_use]
    pub fn points_remaining(&self) -> i32 {
        self.budget - self.points_spent()
    }

    /// Roll every characteristic, overwriting manual edits.
    ///
    /// A roll cannot honour a point-buy budget, so point-buy falls back to
    /// rolled generation.
    pub fn roll<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut rolled = Characteristics::minimums();
        for which in Characteristic::ALL {
            let value = which.roll_expr().roll(rng);
            rolled.set(which, i32::try_from(value).unwrap_or(which.minimum()));
        }
        self.values = rolled;
        if self.method == GenerationMethod::PointBuy {
            self.method = GenerationMethod::Roll;
        }
        log::debug!("rolled characteristics {:?}", self.values);
    }

    /// Switch generation method.
    ///
    /// Entering point-buy resets every value to its minimum; other switches
    /// clamp current values to the new maximum.
    pub fn set_method(&mut self, method: GenerationMethod) {
        if method == self.method {
            return;
        }
        self.method = method;
        if method == GenerationMethod::PointBuy {
            self.values = Characteristics::minimums();
            return;
        }
        for which in Characteristic::ALL {
            let value = self.values.get(which).clamp(which.minimum(), method.maximum());
            self.values.set(which, value);
        }
    }

    /// Edit one characteristic, clamping into its bounds.
    ///
    /// Returns the value actually stored.
    ///
    /// # Errors
    ///
    /// Under point-buy, returns [`Rejection::OutOfRange`] when the edit
    /// would overspend the budget. The previous value is kept.
    pub fn set_manual(&mut self, which: Characteristic, value: i32) -> Result<i32, Rejection> {
        let clamped = value.clamp(which.minimum(), self.method.maximum());
        if self.method == GenerationMethod::PointBuy {
            let previous = self.values.get(which);
            let cost =
                self.points_spent() - (previous - which.minimum()) + (clamped - which.minimum());
            if cost > self.budget {
                let affordable = previous + (self.budget - self.points_spent());
                return Err(Rejection::out_of_range(
                    format!("{which} point-buy"),
                    i64::from(value),
                    i64::from(which.minimum()),
                    i64::from(affordable),
                ));
            }
        }
        self.values.set(which, clamped);
        Ok(clamped)
    }

    /// Replace every value at once, clamping each into bounds.
    ///
    /// # Errors
    ///
    /// Under point-buy, rejects the whole set when it overspends the budget.
    pub fn set_all(&mut self, values: Characteristics) -> Result<(), Rejection> {
        let mut next = values;
        for which in Characteristic::ALL {
            next.set(which, next.get(which).clamp(which.minimum(), self.method.maximum()));
        }
        if self.method == GenerationMethod::PointBuy {
            let cost = next.sum() - minimum_sum();
            if cost > self.budget {
                return Err(Rejection::out_of_range(
                    "point-buy total",
                    i64::from(cost),
                    0,
                    i64::from(self.budget),
                ));
            }
        }
        self.values = next;
        Ok(())
    }
}
