use std::collections::HashSet;
use std::io::Write;

use arena_shooter::catalog::{Catalog, PowerUpEffect, Variant};
use arena_shooter::config::GameConfig;
use arena_shooter::effects::{BotEffectKind, EffectKind};
use arena_shooter::entities::{PowerUpKind, Tag};
use arena_shooter::error::CatalogError;
use tempfile::NamedTempFile;

const TINY: &str = r#"{
    "name": "tiny",
    "starting_money": 10,
    "starting_weapon": "pea",
    "basic_reward": 1,
    "boss_reward": 2,
    "weapons": [
        { "id": "pea", "name": "Pea Shooter", "damage": 1, "fire_rate_ms": 100,
          "bullet_speed": 2.0, "cost": 0, "tags": ["freeze"] },
        { "id": "fan", "name": "Fan", "damage": 2, "fire_rate_ms": 300,
          "bullet_speed": 3.0, "cost": 5, "spread_deg": 10.0 }
    ],
    "power_ups": [
        { "kind": "health", "effect": "heal", "amount": 5 },
        { "kind": "freezeTime", "effect": "bot_status", "status": "frozen",
          "duration_ms": 100, "factor": 0.0 },
        { "kind": "speed", "effect": "timed", "status": "speed", "duration_ms": 500 }
    ]
}"#;

#[test]
fn built_in_variants_are_valid() {
    for variant in [Variant::Arsenal, Variant::Classic] {
        Catalog::for_variant(variant).validate().unwrap();
    }
    assert_eq!(Catalog::arsenal().weapons.len(), 10);
    assert_eq!(Catalog::classic().weapons.len(), 6);
    assert_eq!(Catalog::classic().starting_money, 1000);
}

#[test]
fn power_up_table_covers_every_kind_once() {
    let catalog = Catalog::arsenal();
    let kinds: HashSet<PowerUpKind> = catalog.power_ups.iter().map(|e| e.kind).collect();
    assert_eq!(kinds.len(), catalog.power_ups.len());
    assert!(PowerUpKind::ALL.iter().all(|k| kinds.contains(k)));
}

#[test]
fn starting_weapon_is_free() {
    for catalog in [Catalog::arsenal(), Catalog::classic()] {
        assert_eq!(catalog.weapon(&catalog.starting_weapon).unwrap().cost, 0);
    }
}

#[test]
fn parses_a_hand_written_catalog() {
    let catalog = Catalog::from_json(TINY).unwrap();
    assert_eq!(catalog.name, "tiny");
    assert!(catalog.weapons[0].tags.contains(Tag::Freeze));
    assert_eq!(catalog.weapons[0].spread_deg, None);
    assert_eq!(catalog.weapons[1].spread_deg, Some(10.0));
    assert_eq!(
        catalog.power_up_effect(PowerUpKind::Health),
        Some(PowerUpEffect::Heal { amount: 5 })
    );
    assert_eq!(
        catalog.power_up_effect(PowerUpKind::FreezeTime),
        Some(PowerUpEffect::BotStatus {
            status: BotEffectKind::Frozen,
            duration_ms: 100,
            factor: 0.0,
        })
    );
    assert_eq!(
        catalog.power_up_effect(PowerUpKind::Speed),
        Some(PowerUpEffect::Timed {
            status: EffectKind::Speed,
            duration_ms: 500,
            magnitude: 0.0,
        })
    );
    assert_eq!(catalog.power_up_effect(PowerUpKind::Bomb), None);
}

#[test]
fn catalog_file_round_trips() {
    let original = Catalog::classic();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(&original).unwrap().as_bytes())
        .unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(Catalog::from_json(&text).unwrap(), original);
}

#[test]
fn rejects_broken_catalogs() {
    assert!(matches!(Catalog::from_json("{ nope"), Err(CatalogError::Parse(_))));

    let mut c = Catalog::arsenal();
    c.weapons.clear();
    assert!(matches!(c.validate(), Err(CatalogError::NoWeapons)));

    let mut c = Catalog::arsenal();
    let dup = c.weapons[1].clone();
    c.weapons.push(dup);
    assert!(matches!(
        c.validate(),
        Err(CatalogError::DuplicateWeapon { id }) if id == "rocketLauncher"
    ));

    let mut c = Catalog::classic();
    c.starting_weapon = "bfg".into();
    assert!(matches!(c.validate(), Err(CatalogError::UnknownStartingWeapon { .. })));

    let mut c = Catalog::classic();
    c.power_ups.clear();
    assert!(matches!(c.validate(), Err(CatalogError::NoPowerUps)));
}

#[test]
fn rejects_a_weapon_that_never_reloads() {
    let mut c = Catalog::arsenal();
    c.weapons[2].fire_rate_ms = 0;
    let id = c.weapons[2].id.clone();
    assert!(matches!(
        c.validate(),
        Err(CatalogError::ZeroFireRate { id: bad }) if bad == id
    ));
}

#[test]
fn rejects_a_power_up_listed_twice() {
    let mut c = Catalog::classic();
    let again = c.power_ups[0].clone();
    let kind = again.kind;
    c.power_ups.push(again);
    assert!(matches!(
        c.validate(),
        Err(CatalogError::DuplicatePowerUp { kind: k }) if k == kind
    ));
}

#[test]
fn parse_error_keeps_its_source() {
    let err = Catalog::from_json("[]").unwrap_err();
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn partial_config_json_falls_back_to_defaults() {
    let config = GameConfig::from_json(r#"{ "tick_ms": 20, "initial_bots": 2 }"#).unwrap();
    assert_eq!(config.tick_ms, 20);
    assert_eq!(config.initial_bots, 2);
    assert_eq!(config.respawn_delay_ms, 3000);
    assert_eq!(config.arena(), GameConfig::default().arena());
}

#[test]
fn zero_tick_length_is_raised_to_one_millisecond() {
    let config = GameConfig::from_json(r#"{ "tick_ms": 0 }"#).unwrap();
    assert_eq!(config.tick_ms, 1);
}
