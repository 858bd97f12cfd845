/// Weapon list, power-up effect table and economy constants.
///
/// The two historical game variants differ only in this data, so they are
/// two catalogs for one engine.  A catalog can also be read from JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::effects::{BotEffectKind, EffectKind};
use crate::entities::{PowerUpKind, Tag, Tags};
use crate::error::CatalogError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub id: String,
    pub name: String,
    pub damage: i32,
    /// Minimum interval between shots.
    pub fire_rate_ms: u64,
    pub bullet_speed: f32,
    pub cost: u32,
    #[serde(default)]
    pub tags: Tags,
    /// Fan half-angle in degrees; the weapon fires one bullet per step of
    /// this size from `-spread` to `+spread`.
    #[serde(default)]
    pub spread_deg: Option<f32>,
}

impl WeaponSpec {
    fn new(id: &str, name: &str, damage: i32, fire_rate_ms: u64, bullet_speed: f32, cost: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            damage,
            fire_rate_ms,
            bullet_speed,
            cost,
            tags: Tags::NONE,
            spread_deg: None,
        }
    }

    fn tagged(mut self, tag: Tag) -> Self {
        self.tags = self.tags.with(tag);
        self
    }

    fn spread(mut self, degrees: f32) -> Self {
        self.spread_deg = Some(degrees);
        self
    }
}

/// What picking up a power-up does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PowerUpEffect {
    Heal {
        amount: i32,
    },
    Timed {
        status: EffectKind,
        duration_ms: u64,
        #[serde(default)]
        magnitude: f32,
    },
    ExtraLife,
    /// Applied to every bot alive at pickup time.
    BotStatus {
        status: BotEffectKind,
        duration_ms: u64,
        factor: f32,
    },
    Teleport,
    Bomb {
        radius: f32,
    },
    HealOverTime {
        amount: i32,
        interval_ms: u64,
        duration_ms: u64,
    },
    BlackHole {
        interval_ms: u64,
        duration_ms: u64,
        min_radius: f32,
        max_radius: f32,
        strength: f32,
    },
    Push {
        radius: f32,
        distance: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerUpEntry {
    pub kind: PowerUpKind,
    #[serde(flatten)]
    pub effect: PowerUpEffect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Plasma rifle start, ten weapons.
    Arsenal,
    /// Pistol start, six weapons.
    Classic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    pub starting_money: u32,
    pub starting_weapon: String,
    pub basic_reward: u32,
    pub boss_reward: u32,
    pub weapons: Vec<WeaponSpec>,
    pub power_ups: Vec<PowerUpEntry>,
}

impl Catalog {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Arsenal => Self::arsenal(),
            Variant::Classic => Self::classic(),
        }
    }

    pub fn arsenal() -> Self {
        Self {
            name: "arsenal".to_string(),
            starting_money: 2000,
            starting_weapon: "plasmaRifle".to_string(),
            basic_reward: 50,
            boss_reward: 100,
            weapons: vec![
                WeaponSpec::new("plasmaRifle", "Plasma Rifle", 18, 400, 9.0, 0),
                WeaponSpec::new("rocketLauncher", "Rocket Launcher", 25, 1200, 6.0, 2000)
                    .tagged(Tag::Explosive),
                WeaponSpec::new("laserCannon", "Laser Cannon", 20, 200, 10.0, 1800),
                WeaponSpec::new("flamethrower", "Flamethrower", 6, 100, 4.0, 1600).spread(3.0),
                WeaponSpec::new("railgun", "Railgun", 30, 1500, 12.0, 2500),
                WeaponSpec::new("grenadeLauncher", "Grenade Launcher", 22, 1000, 5.0, 1700)
                    .tagged(Tag::Explosive),
                WeaponSpec::new("teslaGun", "Tesla Gun", 16, 350, 8.0, 1400).tagged(Tag::Chain),
                WeaponSpec::new("cryoGun", "Cryo Gun", 14, 300, 7.0, 1300).tagged(Tag::Freeze),
                WeaponSpec::new("acidGun", "Acid Gun", 12, 250, 6.0, 1200).tagged(Tag::Poison),
                WeaponSpec::new("gravityGun", "Gravity Gun", 10, 500, 5.0, 1100).tagged(Tag::Pull),
            ],
            power_ups: default_power_ups(),
        }
    }

    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            starting_money: 1000,
            starting_weapon: "pistol".to_string(),
            basic_reward: 50,
            boss_reward: 100,
            weapons: vec![
                WeaponSpec::new("pistol", "Pistol", 3, 500, 5.0, 0),
                WeaponSpec::new("shotgun", "Shotgun", 8, 800, 4.0, 200).spread(5.0),
                WeaponSpec::new("rifle", "Rifle", 5, 300, 6.0, 400),
                WeaponSpec::new("rayGun", "Ray Gun", 12, 600, 7.0, 800),
                WeaponSpec::new("minigun", "Minigun", 4, 150, 5.0, 1200),
                WeaponSpec::new("sniper", "Sniper", 15, 1000, 8.0, 600),
            ],
            power_ups: default_power_ups(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.weapons.is_empty() {
            return Err(CatalogError::NoWeapons);
        }
        let mut seen = HashSet::new();
        for w in &self.weapons {
            if !seen.insert(w.id.as_str()) {
                return Err(CatalogError::DuplicateWeapon { id: w.id.clone() });
            }
            if w.fire_rate_ms == 0 {
                return Err(CatalogError::ZeroFireRate { id: w.id.clone() });
            }
        }
        if self.weapon(&self.starting_weapon).is_none() {
            return Err(CatalogError::UnknownStartingWeapon {
                id: self.starting_weapon.clone(),
            });
        }
        if self.power_ups.is_empty() {
            return Err(CatalogError::NoPowerUps);
        }
        let mut kinds = HashSet::new();
        for entry in &self.power_ups {
            if !kinds.insert(entry.kind) {
                return Err(CatalogError::DuplicatePowerUp { kind: entry.kind });
            }
        }
        Ok(())
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponSpec> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn power_up_effect(&self, kind: PowerUpKind) -> Option<PowerUpEffect> {
        self.power_ups
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.effect)
    }
}

fn timed(kind: PowerUpKind, effect: EffectKind, duration_ms: u64) -> PowerUpEntry {
    PowerUpEntry {
        kind,
        effect: PowerUpEffect::Timed {
            status: effect,
            duration_ms,
            magnitude: 0.0,
        },
    }
}

fn bot_status(kind: PowerUpKind, effect: BotEffectKind, duration_ms: u64, factor: f32) -> PowerUpEntry {
    PowerUpEntry {
        kind,
        effect: PowerUpEffect::BotStatus {
            status: effect,
            duration_ms,
            factor,
        },
    }
}

fn entry(kind: PowerUpKind, effect: PowerUpEffect) -> PowerUpEntry {
    PowerUpEntry { kind, effect }
}

/// The power-up table both variants share.
pub fn default_power_ups() -> Vec<PowerUpEntry> {
    use PowerUpKind as K;
    vec![
        entry(K::Health, PowerUpEffect::Heal { amount: 20 }),
        entry(
            K::Speed,
            PowerUpEffect::Timed {
                status: EffectKind::Speed,
                duration_ms: 5000,
                magnitude: 1.0,
            },
        ),
        entry(
            K::BulletSpeed,
            PowerUpEffect::Timed {
                status: EffectKind::BulletSpeed,
                duration_ms: 5000,
                magnitude: 10.0,
            },
        ),
        timed(K::Invincibility, EffectKind::Invincible, 5000),
        timed(K::Shield, EffectKind::Invincible, 10_000),
        timed(K::DoubleDamage, EffectKind::DoubleDamage, 5000),
        entry(K::ExtraLife, PowerUpEffect::ExtraLife),
        timed(K::RapidFire, EffectKind::RapidFire, 8000),
        bot_status(K::FreezeTime, BotEffectKind::Frozen, 3000, 0.0),
        entry(K::Teleport, PowerUpEffect::Teleport),
        entry(K::Bomb, PowerUpEffect::Bomb { radius: 150.0 }),
        entry(
            K::HealOverTime,
            PowerUpEffect::HealOverTime {
                amount: 5,
                interval_ms: 1000,
                duration_ms: 10_000,
            },
        ),
        timed(K::TripleShot, EffectKind::TripleShot, 6000),
        timed(K::ExplosiveBullets, EffectKind::ExplosiveBullets, 7000),
        timed(K::LifeSteal, EffectKind::LifeSteal, 8000),
        bot_status(K::TimeSlow, BotEffectKind::Slowed, 4000, 0.3),
        timed(K::ChainLightning, EffectKind::ChainLightning, 5000),
        entry(
            K::ShieldBash,
            PowerUpEffect::Push {
                radius: 100.0,
                distance: 50.0,
            },
        ),
        timed(K::VampireMode, EffectKind::VampireMode, 10_000),
        timed(K::GoldenBullet, EffectKind::GoldenBullet, 3000),
        bot_status(K::TimeWarp, BotEffectKind::Warped, 3000, -1.0),
        entry(
            K::BlackHole,
            PowerUpEffect::BlackHole {
                interval_ms: 50,
                duration_ms: 5000,
                min_radius: 20.0,
                max_radius: 200.0,
                strength: 2.0,
            },
        ),
    ]
}
