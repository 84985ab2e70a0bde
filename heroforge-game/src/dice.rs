//! Dice expressions of the form `NdM`, `NdM+K` and `NdM*X`.
//!
//! Expressions serialize as their text form so reference tables can write
//! `"4d6*75"` instead of a nested object.

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

const DICE_PATTERN: &str =
    r"^\s*(\d+)\s*[dD]\s*(\d+)\s*(?:([+-])\s*(\d+))?\s*(?:[xX*]\s*(\d+))?\s*$";

fn dice_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DICE_PATTERN).ok()).as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    #[error("`{0}` is not a dice expression (expected NdM, NdM+K or NdM*X)")]
    Syntax(String),
    #[error("dice in `{0}` must have at least one side")]
    NoSides(String),
    #[error("number in `{0}` is too large")]
    Overflow(String),
}

/// `count` dice of `sides` sides, plus `bonus`, times `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
    pub multiplier: u32,
}

impl DiceExpr {
    #[must_use]
    pub const fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            bonus: 0,
            multiplier: 1,
        }
    }

    #[must_use]
    pub const fn plus(mut self, bonus: i32) -> Self {
        self.bonus = bonus;
        self
    }

    #[must_use]
    pub const fn times(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Smallest value the expression can produce.
    #[must_use]
    pub fn min(&self) -> i64 {
        (i64::from(self.count) + i64::from(self.bonus)) * i64::from(self.multiplier)
    }

    /// Largest value the expression can produce.
    #[must_use]
    pub fn max(&self) -> i64 {
        (i64::from(self.count) * i64::from(self.sides) + i64::from(self.bonus))
            * i64::from(self.multiplier)
    }

    /// Roll the dice and return only the face sum, before bonus and multiplier.
    pub fn roll_faces<R>(&self, rng: &mut R) -> i64
    where
        R: Rng + ?Sized,
    {
        let sides = self.sides.max(1);
        (0..self.count)
            .map(|_| i64::from(rng.gen_range(1..=sides)))
            .sum()
    }

    /// Roll the full expression.
    pub fn roll<R>(&self, rng: &mut R) -> i64
    where
        R: Rng + ?Sized,
    {
        (self.roll_faces(rng) + i64::from(self.bonus)) * i64::from(self.multiplier)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.bonus > 0 {
            write!(f, "+{}", self.bonus)?;
        } else if self.bonus < 0 {
            write!(f, "{}", self.bonus)?;
        }
        if self.multiplier != 1 {
            write!(f, "*{}", self.multiplier)?;
        }
        Ok(())
    }
}

impl FromStr for DiceExpr {
    type Err = DiceParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let syntax = || DiceParseError::Syntax(text.to_string());
        let overflow = || DiceParseError::Overflow(text.to_string());
        let caps = dice_regex()
            .and_then(|re| re.captures(text))
            .ok_or_else(syntax)?;

        let number = |idx: usize| -> Result<Option<u32>, DiceParseError> {
            caps.get(idx)
                .map(|m| m.as_str().parse::<u32>().map_err(|_| overflow()))
                .transpose()
        };

        let count = number(1)?.ok_or_else(syntax)?;
        let sides = number(2)?.ok_or_else(syntax)?;
        if sides == 0 {
            return Err(DiceParseError::NoSides(text.to_string()));
        }
        let magnitude = i32::try_from(number(4)?.unwrap_or(0)).map_err(|_| overflow())?;
        let bonus = match caps.get(3).map(|m| m.as_str()) {
            Some("-") => -magnitude,
            _ => magnitude,
        };
        let multiplier = number(5)?.unwrap_or(1);

        Ok(Self {
            count,
            sides,
            bonus,
            multiplier,
        })
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = DiceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpr> for String {
    fn from(value: DiceExpr) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn parses_plain_bonus_and_multiplier_forms() {
        assert_eq!("3d6".parse::<DiceExpr>().unwrap(), DiceExpr::new(3, 6));
        assert_eq!(
            "2d6+6".parse::<DiceExpr>().unwrap(),
            DiceExpr::new(2, 6).plus(6)
        );
        assert_eq!(
            "4d6*75".parse::<DiceExpr>().unwrap(),
            DiceExpr::new(4, 6).times(75)
        );
        assert_eq!(
            " 4D6 x 25 ".parse::<DiceExpr>().unwrap(),
            DiceExpr::new(4, 6).times(25)
        );
        assert_eq!(
            "1d10-2".parse::<DiceExpr>().unwrap(),
            DiceExpr::new(1, 10).plus(-2)
        );
    }

    #[test]
    fn rejects_garbage_and_zero_sides() {
        assert!(matches!(
            "d6".parse::<DiceExpr>(),
            Err(DiceParseError::Syntax(_))
        ));
        assert!(matches!(
            "2d0".parse::<DiceExpr>(),
            Err(DiceParseError::NoSides(_))
        ));
        assert!(matches!(
            "99999999999d6".parse::<DiceExpr>(),
            Err(DiceParseError::Overflow(_))
        ));
    }

    #[test]
    fn display_matches_parse_input() {
        for text in ["3d6", "2d6+6", "4d6*75", "1d10-2", "2d6+15*10"] {
            let expr: DiceExpr = text.parse().unwrap();
            assert_eq!(expr.to_string(), text);
        }
    }

    #[test]
    fn rolls_stay_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let expr = DiceExpr::new(2, 6).plus(6);
        for _ in 0..500 {
            let value = expr.roll(&mut rng);
            assert!((expr.min()..=expr.max()).contains(&value));
        }
        assert_eq!(expr.min(), 8);
        assert_eq!(expr.max(), 18);
    }

    #[test]
    fn serializes_as_text() {
        let expr = DiceExpr::new(4, 6).times(50);
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(json, "\"4d6*50\"");
        let back: DiceExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
        assert!(serde_json::from_str::<DiceExpr>("\"four dice\"").is_err());
    }
}
