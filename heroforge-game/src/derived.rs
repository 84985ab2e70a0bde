//! Secondary statistics derived from characteristics.
//!
//! Everything here is a pure function of characteristic values. Nothing is
//! cached: a build recomputes these on every read so they can never lag
//! behind a characteristic edit.

use serde::{Deserialize, Serialize};

use crate::characteristics::Characteristics;
use crate::config::{BuildConfig, ExperienceOverflow};
use crate::constants::{
    ACTION_POINT_STEP, DAMAGE_OVERFLOW_STEP, DAMAGE_OVERFLOW_THRESHOLD, DERIVED_BAND_HIGH,
    DERIVED_BAND_LOW, DERIVED_BAND_MID, DERIVED_OVERFLOW_OFFSET, DERIVED_OVERFLOW_STEP,
    HIT_LOCATION_OVERFLOW_THRESHOLD, HIT_LOCATION_STEP,
};

/// Upper bound of each STR+SIZ band and the modifier it grants.
const DAMAGE_BANDS: [(i32, &str); 16] = [
    (5, "-1d8"),
    (10, "-1d6"),
    (15, "-1d4"),
    (20, "-1d2"),
    (25, "+0"),
    (30, "+1d2"),
    (35, "+1d4"),
    (40, "+1d6"),
    (45, "+1d8"),
    (50, "+1d10"),
    (60, "+1d12"),
    (70, "+2d6"),
    (80, "+1d8+1d6"),
    (90, "+2d8"),
    (100, "+1d10+1d8"),
    (DAMAGE_OVERFLOW_THRESHOLD, "+2d10"),
];

/// Hit points per location for CON+SIZ rows of five.
const HIT_LOCATION_ROWS: [HitLocations; 8] = [
    HitLocations::new(1, 3, 2, 1, 1),
    HitLocations::new(2, 4, 3, 1, 2),
    HitLocations::new(3, 5, 4, 2, 3),
    HitLocations::new(4, 6, 5, 3, 4),
    HitLocations::new(5, 7, 6, 4, 5),
    HitLocations::new(6, 8, 7, 5, 6),
    HitLocations::new(7, 9, 8, 6, 7),
    HitLocations::new(8, 10, 9, 7, 8),
];

/// Hit points for each body location. Arms and legs are per limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLocations {
    pub head: i32,
    pub chest: i32,
    pub abdomen: i32,
    pub arm: i32,
    pub leg: i32,
}

impl HitLocations {
    #[must_use]
    pub const fn new(head: i32, chest: i32, abdomen: i32, arm: i32, leg: i32) -> Self {
        Self {
            head,
            chest,
            abdomen,
            arm,
            leg,
        }
    }

    const fn raised_by(self, extra: i32) -> Self {
        Self::new(
            self.head + extra,
            self.chest + extra,
            self.abdomen + extra,
            self.arm + extra,
            self.leg + extra,
        )
    }
}

/// Damage modifier for a STR+SIZ total, as dice text.
#[must_use]
pub fn damage_modifier(str_plus_siz: i32) -> String {
    if let Some((_, label)) = DAMAGE_BANDS.iter().find(|(limit, _)| str_plus_siz <= *limit) {
        return (*label).to_string();
    }
    let extra = (str_plus_siz - DAMAGE_OVERFLOW_THRESHOLD) / DAMAGE_OVERFLOW_STEP;
    if extra == 0 {
        "+2d10".to_string()
    } else {
        format!("+2d10+{extra}d2")
    }
}

/// Shared shape of the three-band tables: low/mid/high bands, then one step
/// per six points above the high band.
const fn banded(value: i32, low: i32, mid: i32, high: i32, offset: i32) -> i32 {
    if value <= DERIVED_BAND_LOW {
        low
    } else if value <= DERIVED_BAND_MID {
        mid
    } else if value <= DERIVED_BAND_HIGH {
        high
    } else {
        high + (value - offset) / DERIVED_OVERFLOW_STEP
    }
}

/// Experience modifier from CHA.
#[must_use]
pub const fn experience_modifier(cha: i32, overflow: ExperienceOverflow) -> i32 {
    banded(cha, -1, 0, 1, overflow.offset())
}

/// Healing rate from CON.
#[must_use]
pub const fn healing_rate(con: i32) -> i32 {
    banded(con, 1, 2, 3, DERIVED_OVERFLOW_OFFSET)
}

/// Luck points from POW.
#[must_use]
pub const fn luck_points(pow: i32) -> i32 {
    banded(pow, 1, 2, 3, DERIVED_OVERFLOW_OFFSET)
}

/// Hit points per location from CON+SIZ.
#[must_use]
pub fn hit_points_per_location(con_plus_siz: i32) -> HitLocations {
    let row = usize::try_from((con_plus_siz - 1).max(0) / HIT_LOCATION_STEP)
        .unwrap_or(0)
        .min(HIT_LOCATION_ROWS.len() - 1);
    let extra = if con_plus_siz > HIT_LOCATION_OVERFLOW_THRESHOLD {
        (con_plus_siz - HIT_LOCATION_OVERFLOW_THRESHOLD) / HIT_LOCATION_STEP
    } else {
        0
    };
    HIT_LOCATION_ROWS[row].raised_by(extra)
}

/// Initiative bonus: average of DEX and INT, rounded down.
#[must_use]
pub const fn initiative_bonus(dex: i32, int: i32) -> i32 {
    (dex + int) / 2
}

/// Action points: one per twelve points of DEX+INT, rounded up, minimum one.
#[must_use]
pub const fn action_points(dex_plus_int: i32) -> i32 {
    if dex_plus_int <= ACTION_POINT_STEP {
        1
    } else {
        (dex_plus_int + ACTION_POINT_STEP - 1) / ACTION_POINT_STEP
    }
}

/// All secondary statistics for one set of characteristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub damage_modifier: String,
    pub experience_modifier: i32,
    pub healing_rate: i32,
    pub luck_points: i32,
    pub hit_points: HitLocations,
    pub initiative_bonus: i32,
    pub action_points: i32,
    pub magic_points: i32,
}

impl DerivedStats {
    #[must_use]
    pub fn compute(values: &Characteristics, cfg: &BuildConfig) -> Self {
        Self {
            damage_modifier: damage_modifier(values.strength + values.size),
            experience_modifier: experience_modifier(values.charisma, cfg.experience_overflow),
            healing_rate: healing_rate(values.constitution),
            luck_points: luck_points(values.power),
            hit_points: hit_points_per_location(values.constitution + values.size),
            initiative_bonus: initiative_bonus(values.dexterity, values.intelligence),
            action_points: action_points(values.dexterity + values.intelligence),
            magic_points: values.power,
        }
    }
}
