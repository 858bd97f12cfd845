/// All game entity types: plain data plus the few mutation rules that
/// belong to a single entity (clamping, bullet travel).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::effects::{BotEffects, StatusEffects};
use crate::geometry::{heading, Arena};
use crate::schedule::Schedule;
use crate::shop::Inventory;

pub const PLAYER_MAX_HEALTH: i32 = 100;

pub type BotId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// In the menus; nothing ticks.
    Idle,
    Running,
    GameOver,
}

// ── Tags ──────────────────────────────────────────────────────────────────────

/// One named behavior a weapon or bullet can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Explosive,
    Chain,
    Golden,
    Poison,
    Freeze,
    Pull,
}

impl Tag {
    pub const ALL: [Tag; 6] = [
        Tag::Explosive,
        Tag::Chain,
        Tag::Golden,
        Tag::Poison,
        Tag::Freeze,
        Tag::Pull,
    ];

    fn bit(self) -> u8 {
        match self {
            Tag::Explosive => 1 << 0,
            Tag::Chain => 1 << 1,
            Tag::Golden => 1 << 2,
            Tag::Poison => 1 << 3,
            Tag::Freeze => 1 << 4,
            Tag::Pull => 1 << 5,
        }
    }
}

/// Capability tags attached to weapons and the bullets they fire.
///
/// Serialized as a list of tag names so catalog files stay readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct Tags(u8);

impl Tags {
    pub const NONE: Self = Self(0);

    pub fn of(tags: &[Tag]) -> Self {
        tags.iter().fold(Self::NONE, |acc, &t| acc.with(t))
    }

    #[inline]
    pub fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    #[inline]
    pub fn with(self, tag: Tag) -> Self {
        Self(self.0 | tag.bit())
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Tag> {
        Tag::ALL.into_iter().filter(move |&t| self.contains(t))
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(tags: Vec<Tag>) -> Self {
        Self::of(&tags)
    }
}

impl From<Tags> for Vec<Tag> {
    fn from(tags: Tags) -> Self {
        tags.iter().collect()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub speed: f32,
    /// Radians, fixed at spawn.
    pub angle: f32,
    pub damage: i32,
    pub tags: Tags,
}

impl Bullet {
    pub fn advance(&mut self) {
        self.pos += heading(self.angle) * self.speed;
    }
}

/// Advance every bullet one step and drop the ones that left the arena.
pub fn advance_and_cull(bullets: &mut Vec<Bullet>, arena: &Arena) {
    bullets.retain_mut(|b| {
        b.advance();
        arena.contains(b.pos)
    });
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    Health,
    Speed,
    BulletSpeed,
    Invincibility,
    Shield,
    DoubleDamage,
    ExtraLife,
    RapidFire,
    FreezeTime,
    Teleport,
    Bomb,
    HealOverTime,
    TripleShot,
    ExplosiveBullets,
    LifeSteal,
    TimeSlow,
    ChainLightning,
    ShieldBash,
    VampireMode,
    GoldenBullet,
    TimeWarp,
    BlackHole,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 22] = [
        PowerUpKind::Health,
        PowerUpKind::Speed,
        PowerUpKind::BulletSpeed,
        PowerUpKind::Invincibility,
        PowerUpKind::Shield,
        PowerUpKind::DoubleDamage,
        PowerUpKind::ExtraLife,
        PowerUpKind::RapidFire,
        PowerUpKind::FreezeTime,
        PowerUpKind::Teleport,
        PowerUpKind::Bomb,
        PowerUpKind::HealOverTime,
        PowerUpKind::TripleShot,
        PowerUpKind::ExplosiveBullets,
        PowerUpKind::LifeSteal,
        PowerUpKind::TimeSlow,
        PowerUpKind::ChainLightning,
        PowerUpKind::ShieldBash,
        PowerUpKind::VampireMode,
        PowerUpKind::GoldenBullet,
        PowerUpKind::TimeWarp,
        PowerUpKind::BlackHole,
    ];

    /// Tooltip text shown by the front-end.
    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::Health => "Restores 20 health points",
            PowerUpKind::Speed => "Increases movement speed for 5 seconds",
            PowerUpKind::BulletSpeed => "Increases bullet speed for 5 seconds",
            PowerUpKind::Invincibility => "Makes you invincible for 5 seconds",
            PowerUpKind::Shield => "Makes you invincible for 10 seconds",
            PowerUpKind::DoubleDamage => "Doubles weapon damage for 5 seconds",
            PowerUpKind::ExtraLife => "Grants an extra life when you die",
            PowerUpKind::RapidFire => "Increases fire rate for 8 seconds",
            PowerUpKind::FreezeTime => "Freezes all bots for 3 seconds",
            PowerUpKind::Teleport => "Teleports you to a random location",
            PowerUpKind::Bomb => "Kills all bots within 150 units",
            PowerUpKind::HealOverTime => "Heals 5 health per second for 10 seconds",
            PowerUpKind::TripleShot => "Fires 3 bullets at once for 6 seconds",
            PowerUpKind::ExplosiveBullets => "Bullets explode on impact for 7 seconds",
            PowerUpKind::LifeSteal => "Steals health from damaged bots for 8 seconds",
            PowerUpKind::TimeSlow => "Slows down all bots for 4 seconds",
            PowerUpKind::ChainLightning => "Bullets chain to nearby bots for 5 seconds",
            PowerUpKind::ShieldBash => "Pushes nearby bots away",
            PowerUpKind::VampireMode => "Steals health from all damaged enemies for 10 seconds",
            PowerUpKind::GoldenBullet => "Bullets deal 3x damage for 3 seconds",
            PowerUpKind::TimeWarp => "Reverses bot movement for 3 seconds",
            PowerUpKind::BlackHole => "Pulls nearby bots toward you",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

// ── Player & bots ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    /// Current movement speed; the speed power-up raises it temporarily.
    pub speed: f32,
    pub bullet_speed: f32,
    pub health: i32,
    pub money: u32,
    pub inventory: Inventory,
    pub effects: StatusEffects,
    /// Consumed by the next death instead of ending the session.
    pub extra_life: bool,
    pub bullets: Vec<Bullet>,
    pub color: Rgb,
    /// Logical time (ms) of the last shot, `None` until the first one.
    pub last_shot_ms: Option<u64>,
}

impl Player {
    pub const BASE_SPEED: f32 = 2.0;
    pub const BASE_BULLET_SPEED: f32 = 5.0;

    pub fn new(pos: Vec2, money: u32, inventory: Inventory) -> Self {
        Self {
            pos,
            speed: Self::BASE_SPEED,
            bullet_speed: Self::BASE_BULLET_SPEED,
            health: PLAYER_MAX_HEALTH,
            money,
            inventory,
            effects: StatusEffects::default(),
            extra_life: false,
            bullets: Vec::new(),
            color: Rgb::WHITE,
            last_shot_ms: None,
        }
    }

    /// Add `amount` health, never going past the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, PLAYER_MAX_HEALTH);
    }

    /// Subtract `amount` health, never going below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, PLAYER_MAX_HEALTH);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

#[derive(Clone, Debug)]
pub struct Bot {
    pub id: BotId,
    pub pos: Vec2,
    /// Signed speed after effects; negative while time-warped.
    pub speed: f32,
    /// Pre-effect speed, restored once every effect has expired.
    pub base_speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub is_boss: bool,
    /// Collision half-extent.
    pub size: f32,
    pub bullets: Vec<Bullet>,
    pub effects: BotEffects,
}

impl Bot {
    pub const BASIC_SPEED: f32 = 0.8;
    pub const BASIC_HEALTH: i32 = 50;
    pub const BASIC_SIZE: f32 = 10.0;
    pub const BOSS_SPEED: f32 = 0.5;
    pub const BOSS_HEALTH: i32 = 500;
    pub const BOSS_SIZE: f32 = 30.0;

    pub fn basic(id: BotId, pos: Vec2) -> Self {
        Self::with_stats(id, pos, Self::BASIC_SPEED, Self::BASIC_HEALTH, false, Self::BASIC_SIZE)
    }

    pub fn boss(id: BotId, pos: Vec2) -> Self {
        Self::with_stats(id, pos, Self::BOSS_SPEED, Self::BOSS_HEALTH, true, Self::BOSS_SIZE)
    }

    fn with_stats(id: BotId, pos: Vec2, speed: f32, health: i32, is_boss: bool, size: f32) -> Self {
        Self {
            id,
            pos,
            speed,
            base_speed: speed,
            health,
            max_health: health,
            is_boss,
            size,
            bullets: Vec::new(),
            effects: BotEffects::default(),
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_frozen(&self) -> bool {
        self.effects.frozen.is_some()
    }

    /// Recompute `speed` from `base_speed` and the active effect factors.
    pub fn refresh_speed(&mut self) {
        self.speed = self.base_speed * self.effects.speed_factor();
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state of one session, owned by the driver.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub arena: Arena,
    /// Logical clock in milliseconds, advanced by one tick length per step.
    pub now_ms: u64,
    pub tick: u64,
    pub player: Player,
    pub bots: Vec<Bot>,
    pub power_ups: Vec<PowerUp>,
    /// Non-boss kills this session.
    pub kills: u32,
    pub boss_alive: bool,
    /// A boss spawn is scheduled but has not happened yet.
    pub boss_pending: bool,
    /// The "boss incoming" banner is visible.
    pub boss_notice: bool,
    pub schedule: Schedule,
    pub status: GameStatus,
    pub next_bot_id: BotId,
}

impl WorldState {
    pub fn new(arena: Arena, player: Player) -> Self {
        Self {
            arena,
            now_ms: 0,
            tick: 0,
            player,
            bots: Vec::new(),
            power_ups: Vec::new(),
            kills: 0,
            boss_alive: false,
            boss_pending: false,
            boss_notice: false,
            schedule: Schedule::default(),
            status: GameStatus::Idle,
            next_bot_id: 0,
        }
    }

    pub fn allocate_bot_id(&mut self) -> BotId {
        let id = self.next_bot_id;
        self.next_bot_id = self.next_bot_id.wrapping_add(1);
        id
    }

    pub fn bot_mut(&mut self, id: BotId) -> Option<&mut Bot> {
        self.bots.iter_mut().find(|b| b.id == id)
    }
}
