use heroforge_game::{
    BuildConfig, BuildSession, BundledCatalog, CapScope, Characteristic, Command, ForgeEngine,
    GenerationMethod, HitLocations, Pool, ReferenceCatalog, Rejection, Side,
};
use std::rc::Rc;

fn session_with(config: BuildConfig) -> BuildSession {
    ForgeEngine::new(BundledCatalog)
        .create_session_with(0x5EED, config)
        .unwrap()
}

fn barbarian_warrior(config: BuildConfig) -> BuildSession {
    let mut session = session_with(config);
    session.set_culture("barbarian").unwrap();
    session.set_career("warrior").unwrap();
    session.set_age("adult").unwrap();
    session
}

#[test]
fn strength_and_size_drive_damage_modifier() {
    let mut session = session_with(BuildConfig::default());
    session.set_characteristic(Characteristic::Strength, 12).unwrap();
    session.set_characteristic(Characteristic::Size, 14).unwrap();
    assert_eq!(session.snapshot().derived.damage_modifier, "+1d2");
}

#[test]
fn constitution_and_size_drive_hit_locations() {
    let mut session = session_with(BuildConfig::default());
    session
        .set_characteristic(Characteristic::Constitution, 16)
        .unwrap();
    session.set_characteristic(Characteristic::Size, 10).unwrap();
    assert_eq!(
        session.snapshot().derived.hit_points,
        HitLocations::new(6, 8, 7, 5, 6)
    );
}

#[test]
fn culture_pool_clamps_overspend_when_cap_only_binds_bonus() {
    let config = BuildConfig::default().with_cap_scope(CapScope::BonusOnly);
    let mut session = barbarian_warrior(config);
    session.allocate("Athletics", Pool::Culture, 15).unwrap();
    assert_eq!(session.allocation().remaining(Pool::Culture), 85);

    let outcome = session.allocate("Brawn", Pool::Culture, 90).unwrap();
    assert_eq!(outcome.requested, 90);
    assert_eq!(outcome.applied, 85);
    assert_eq!(session.allocation().remaining(Pool::Culture), 0);
}

#[test]
fn culture_pool_rejects_overspend_above_cap_by_default() {
    let mut session = barbarian_warrior(BuildConfig::default());
    session.allocate("Athletics", Pool::Culture, 15).unwrap();
    let err = session.allocate("Brawn", Pool::Culture, 90).unwrap_err();
    assert!(matches!(err, Rejection::OutOfRange { .. }));
    assert_eq!(session.allocation().allocation("Brawn").culture, 0);
    assert_eq!(session.allocation().remaining(Pool::Culture), 85);
}

#[test]
fn fourth_professional_skill_is_refused() {
    let mut session = barbarian_warrior(BuildConfig::default());
    for skill in ["Craft", "Gambling", "Oratory"] {
        assert!(session.toggle_professional(Side::Career, skill, true).unwrap());
    }
    let err = session
        .toggle_professional(Side::Career, "Survival", true)
        .unwrap_err();
    assert_eq!(
        err,
        Rejection::SelectionLimitExceeded {
            side: Side::Career,
            limit: 3
        }
    );
    assert_eq!(session.snapshot().career_professional.len(), 3);
}

#[test]
fn underfunded_purchase_is_refused() {
    let mut session = barbarian_warrior(BuildConfig::default());
    session.roll_starting_money(Some("Slave")).unwrap();
    // Spend down until less than a buckler's price remains.
    while session.money().remaining() >= 50 {
        session.purchase("rope").unwrap();
    }
    let before = session.snapshot();
    let err = session.purchase("buckler").unwrap_err();
    assert!(matches!(err, Rejection::UnderfundedPurchase { cost: 50, .. }));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn reinitializing_with_the_same_key_is_idempotent() {
    let mut once = barbarian_warrior(BuildConfig::default());
    once.toggle_professional(Side::Culture, "Track", true).unwrap();
    once.allocate("Track", Pool::Culture, 10).unwrap();
    once.set_bonus_skill(Some("Perception")).unwrap();

    let mut twice = once.clone();
    once.set_culture("barbarian").unwrap();
    twice.set_culture("barbarian").unwrap();
    twice.set_culture("barbarian").unwrap();
    once.set_age("adult").unwrap();
    twice.set_age("adult").unwrap();
    twice.set_age("adult").unwrap();
    assert_eq!(once.snapshot(), twice.snapshot());
}

#[test]
fn point_buy_flow_through_commands() {
    let mut session = session_with(BuildConfig::default().with_point_buy_budget(60));
    session
        .apply(Command::SetMethod {
            method: GenerationMethod::PointBuy,
        })
        .unwrap();
    for (which, value) in [
        (Characteristic::Strength, 18),
        (Characteristic::Constitution, 18),
        (Characteristic::Dexterity, 18),
        (Characteristic::Power, 18),
    ] {
        session
            .apply(Command::SetCharacteristic {
                characteristic: which,
                value,
            })
            .unwrap();
    }
    let err = session
        .apply(Command::SetCharacteristic {
            characteristic: Characteristic::Charisma,
            value: 4,
        })
        .unwrap_err();
    assert!(matches!(err, Rejection::OutOfRange { .. }));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.characteristics.charisma, 3);
    assert_eq!(snapshot.point_buy.unwrap().remaining, 0);
}

#[test]
fn scripted_build_produces_a_complete_snapshot() {
    let script = r#"[
        {"op": "set_identity", "identity": {"name": "Hrolf", "player": "Sam"}},
        {"op": "set_culture", "key": "barbarian"},
        {"op": "set_career", "key": "hunter"},
        {"op": "set_age", "key": "middle_aged"},
        {"op": "roll_age"},
        {"op": "set_combat_style", "style": "shieldwall warrior"},
        {"op": "toggle_professional", "side": "culture", "skill": "Survival", "selected": true},
        {"op": "toggle_professional", "side": "career", "skill": "Track", "selected": true},
        {"op": "allocate", "skill": "Survival", "pool": "culture", "amount": 20},
        {"op": "allocate", "skill": "Combat Style (Shieldwall Warrior)", "pool": "culture", "amount": 20},
        {"op": "allocate", "skill": "Track", "pool": "career", "amount": 15},
        {"op": "allocate", "skill": "Stealth", "pool": "career", "amount": 15},
        {"op": "set_bonus_skill", "skill": "Perception"},
        {"op": "roll_starting_money", "social_class": "Freeman"},
        {"op": "purchase", "item": "shortspear"},
        {"op": "purchase", "item": "bedroll"}
    ]"#;
    let commands: Vec<Command> = serde_json::from_str(script).unwrap();
    let mut session = session_with(BuildConfig::default());
    let snapshot = session.apply_all(commands).unwrap();

    assert_eq!(snapshot.identity.name, "Hrolf");
    assert!((28..=43).contains(&snapshot.identity.age.unwrap()));
    assert_eq!(snapshot.combat_style.as_deref(), Some("Shieldwall Warrior"));
    assert_eq!(snapshot.culture_professional, ["Survival"]);
    assert_eq!(snapshot.career_professional, ["Track"]);
    assert_eq!(snapshot.bonus_skill.as_deref(), Some("Perception"));
    assert_eq!(snapshot.pool(Pool::Culture).unwrap().remaining, 60);
    assert_eq!(snapshot.pool(Pool::Career).unwrap().remaining, 70);
    assert_eq!(snapshot.pool(Pool::Bonus).unwrap().remaining, 190);
    assert_eq!(snapshot.purchases.len(), 2);
    assert_eq!(snapshot.remaining_money, snapshot.starting_money - 21);

    let survival = snapshot.skill("Survival").unwrap();
    let values = snapshot.characteristics;
    assert_eq!(survival.base, values.constitution + values.power);
    assert_eq!(survival.total, survival.base + 20);
    let style = snapshot.skill("Combat Style (Shieldwall Warrior)").unwrap();
    assert_eq!(style.culture, 20);
    assert!(snapshot.skill("Combat Style").is_none());
}

#[test]
fn sessions_share_one_catalog() {
    let catalog = Rc::new(ReferenceCatalog::load_bundled().unwrap());
    let a = BuildSession::new(Rc::clone(&catalog), BuildConfig::default(), 1).unwrap();
    let b = BuildSession::new(Rc::clone(&catalog), BuildConfig::default(), 2).unwrap();
    assert_eq!(Rc::strong_count(&catalog), 5);
    assert_ne!(a.characteristics(), b.characteristics());
}
