//! Centralized rule constants for Heroforge build logic.
//!
//! These values define the default numeric rules of a build. Tunables that a
//! table may house-rule live in [`crate::config::BuildConfig`] and default to
//! the values declared here.

// Characteristic bounds ----------------------------------------------------
pub(crate) const CHARACTERISTIC_MIN_NORMAL: i32 = 3;
pub(crate) const CHARACTERISTIC_MIN_SIZE_INTELLECT: i32 = 8;
pub(crate) const CHARACTERISTIC_MAX_ROLLED: i32 = 18;
pub(crate) const CHARACTERISTIC_MAX_MANUAL: i32 = 21;

// Characteristic dice ------------------------------------------------------
pub(crate) const NORMAL_ROLL_DICE: u32 = 3;
pub(crate) const SIZE_INTELLECT_ROLL_DICE: u32 = 2;
pub(crate) const SIZE_INTELLECT_ROLL_BONUS: i32 = 6;
pub(crate) const CHARACTERISTIC_DIE_SIDES: u32 = 6;

// Point-buy ----------------------------------------------------------------
pub(crate) const POINT_BUY_DEFAULT: i32 = 75;
pub(crate) const POINT_BUY_MIN: i32 = 60;
pub(crate) const POINT_BUY_MAX: i32 = 120;

// Pools --------------------------------------------------------------------
pub(crate) const CULTURE_POOL_TOTAL: u32 = 100;
pub(crate) const CAREER_POOL_TOTAL: u32 = 100;
pub(crate) const BONUS_SKILL_AMOUNT: u32 = 10;
pub(crate) const PROFESSIONAL_LIMIT: usize = 3;
pub(crate) const STANDARD_SKILL_FLOOR: i32 = 5;
pub(crate) const CULTURE_STANDARD_FLOOR: u32 = 5;

// Derived statistics -------------------------------------------------------
pub(crate) const DERIVED_BAND_LOW: i32 = 6;
pub(crate) const DERIVED_BAND_MID: i32 = 12;
pub(crate) const DERIVED_BAND_HIGH: i32 = 18;
pub(crate) const DERIVED_OVERFLOW_STEP: i32 = 6;
pub(crate) const DERIVED_OVERFLOW_OFFSET: i32 = 13;
pub(crate) const DAMAGE_OVERFLOW_THRESHOLD: i32 = 120;
pub(crate) const DAMAGE_OVERFLOW_STEP: i32 = 10;
pub(crate) const HIT_LOCATION_STEP: i32 = 5;
pub(crate) const HIT_LOCATION_OVERFLOW_THRESHOLD: i32 = 40;
pub(crate) const ACTION_POINT_STEP: i32 = 12;

// Money --------------------------------------------------------------------
pub(crate) const PERCENTILE_MIN: u32 = 1;
pub(crate) const PERCENTILE_MAX: u32 = 100;

// RNG stream domain tags ---------------------------------------------------
pub(crate) const RNG_TAG_CHARACTERISTICS: &[u8] = b"characteristics";
pub(crate) const RNG_TAG_MONEY: &[u8] = b"money";
pub(crate) const RNG_TAG_SOCIAL_CLASS: &[u8] = b"social-class";
pub(crate) const RNG_TAG_AGE: &[u8] = b"age";
