/// Status-effect manager.
///
/// Player effects live in a keyed map on the player; bot effects live on
/// each bot, since freeze / slow / warp only touch the bots present when
/// they trigger.  Every timed effect records its absolute expiry, and the
/// matching [`Deferred`] entry is ignored unless the times still agree, so
/// re-applying an active effect just moves the expiry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Bot, Player, Tag, Tags, PLAYER_MAX_HEALTH};
use crate::schedule::{Deferred, Pulse, Schedule};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Adds the magnitude to the player's speed.
    Speed,
    /// Replaces the player's bullet speed with the magnitude.
    BulletSpeed,
    Invincible,
    DoubleDamage,
    RapidFire,
    TripleShot,
    ExplosiveBullets,
    LifeSteal,
    VampireMode,
    ChainLightning,
    GoldenBullet,
    HealOverTime,
    BlackHole,
}

impl EffectKind {
    /// Short HUD text.
    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Speed => "Speed",
            EffectKind::BulletSpeed => "Fast Bullets",
            EffectKind::Invincible => "Invincible",
            EffectKind::DoubleDamage => "Double Damage",
            EffectKind::RapidFire => "Rapid Fire",
            EffectKind::TripleShot => "Triple Shot",
            EffectKind::ExplosiveBullets => "Explosive",
            EffectKind::LifeSteal => "Life Steal",
            EffectKind::VampireMode => "Vampire",
            EffectKind::ChainLightning => "Chain Lightning",
            EffectKind::GoldenBullet => "Golden",
            EffectKind::HealOverTime => "Regen",
            EffectKind::BlackHole => "Black Hole",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveEffect {
    pub expires_at: u64,
    /// Stat value from before the effect, for the stat-overriding kinds.
    pub saved: Option<f32>,
}

#[derive(Clone, Debug, Default)]
pub struct StatusEffects {
    active: BTreeMap<EffectKind, ActiveEffect>,
}

impl StatusEffects {
    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.active.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, &ActiveEffect)> {
        self.active.iter().map(|(k, v)| (*k, v))
    }

    /// Tags the active effects add to every bullet fired now.
    pub fn bullet_tags(&self) -> Tags {
        let mut tags = Tags::NONE;
        if self.is_active(EffectKind::ExplosiveBullets) {
            tags = tags.with(Tag::Explosive);
        }
        if self.is_active(EffectKind::ChainLightning) {
            tags = tags.with(Tag::Chain);
        }
        if self.is_active(EffectKind::GoldenBullet) {
            tags = tags.with(Tag::Golden);
        }
        tags
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Started,
    /// Already active: only the expiry moved.
    Refreshed,
}

/// Apply a timed effect to the player for `duration_ms`.
pub fn apply_player_effect(
    player: &mut Player,
    schedule: &mut Schedule,
    now: u64,
    kind: EffectKind,
    duration_ms: u64,
    magnitude: f32,
) -> Applied {
    let expires_at = now + duration_ms;
    schedule.push(expires_at, Deferred::PlayerEffectExpired(kind));

    if let Some(active) = player.effects.active.get_mut(&kind) {
        active.expires_at = expires_at;
        return Applied::Refreshed;
    }

    let saved = match kind {
        EffectKind::Speed => {
            let original = player.speed;
            player.speed = original + magnitude;
            Some(original)
        }
        EffectKind::BulletSpeed => {
            let original = player.bullet_speed;
            player.bullet_speed = magnitude;
            Some(original)
        }
        _ => None,
    };
    player
        .effects
        .active
        .insert(kind, ActiveEffect { expires_at, saved });
    Applied::Started
}

/// Handle an expiry entry due at `at`.  Returns `false` for stale entries
/// left behind by a refresh.
pub fn expire_player_effect(player: &mut Player, kind: EffectKind, at: u64) -> bool {
    match player.effects.active.get(&kind) {
        Some(active) if active.expires_at == at => {}
        _ => return false,
    }
    let Some(active) = player.effects.active.remove(&kind) else {
        return false;
    };
    match (kind, active.saved) {
        (EffectKind::Speed, Some(original)) => player.speed = original,
        (EffectKind::BulletSpeed, Some(original)) => player.bullet_speed = original,
        _ => {}
    }
    true
}

/// Start (or extend) a repeating effect.  A fresh start enqueues the first
/// pulse; a refresh only moves the end so the chain is never doubled.
pub fn apply_repeating_effect(
    player: &mut Player,
    schedule: &mut Schedule,
    now: u64,
    kind: EffectKind,
    interval_ms: u64,
    duration_ms: u64,
    pulse: Pulse,
) -> Applied {
    let expires_at = now + duration_ms;
    if let Some(active) = player.effects.active.get_mut(&kind) {
        active.expires_at = expires_at;
        return Applied::Refreshed;
    }
    player.effects.active.insert(
        kind,
        ActiveEffect {
            expires_at,
            saved: None,
        },
    );
    schedule.push(
        now + interval_ms,
        Deferred::Pulse {
            kind,
            interval_ms,
            pulse,
        },
    );
    Applied::Started
}

/// Bookkeeping for a pulse firing at `at`: returns `true` if the pulse
/// should act.  Enqueues the next pulse while the effect lasts and ends the
/// effect after its final pulse.
pub fn advance_pulse(
    player: &mut Player,
    schedule: &mut Schedule,
    at: u64,
    kind: EffectKind,
    interval_ms: u64,
    pulse: Pulse,
) -> bool {
    let Some(expires_at) = player.effects.get(kind).map(|a| a.expires_at) else {
        return false;
    };
    if at > expires_at {
        player.effects.active.remove(&kind);
        return false;
    }
    let next = at + interval_ms.max(1);
    if next <= expires_at {
        schedule.push(
            next,
            Deferred::Pulse {
                kind,
                interval_ms,
                pulse,
            },
        );
    } else {
        player.effects.active.remove(&kind);
    }
    true
}

// ── Damage & healing ──────────────────────────────────────────────────────────

/// base × 2 under double damage × 3 for a golden bullet.
pub fn effective_damage(base: i32, effects: &StatusEffects, bullet_tags: Tags) -> i32 {
    let mut damage = base;
    if effects.is_active(EffectKind::DoubleDamage) {
        damage *= 2;
    }
    if bullet_tags.contains(Tag::Golden) {
        damage *= 3;
    }
    damage
}

/// Heal the player for a hit that dealt `dealt`: 30 % under life steal,
/// then 50 % under vampire mode, each floored and only while hurt.
pub fn apply_life_steal(player: &mut Player, dealt: i32) {
    if player.effects.is_active(EffectKind::LifeSteal) && player.health < PLAYER_MAX_HEALTH {
        player.heal(dealt * 3 / 10);
    }
    if player.effects.is_active(EffectKind::VampireMode) && player.health < PLAYER_MAX_HEALTH {
        player.heal(dealt / 2);
    }
}

// ── Bot effects ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotEffectKind {
    Frozen,
    Slowed,
    Warped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotEffect {
    pub expires_at: u64,
    /// Multiplier on the bot's base speed while active.
    pub factor: f32,
}

#[derive(Clone, Debug, Default)]
pub struct BotEffects {
    pub frozen: Option<BotEffect>,
    pub slowed: Option<BotEffect>,
    pub warped: Option<BotEffect>,
}

impl BotEffects {
    fn slot_mut(&mut self, kind: BotEffectKind) -> &mut Option<BotEffect> {
        match kind {
            BotEffectKind::Frozen => &mut self.frozen,
            BotEffectKind::Slowed => &mut self.slowed,
            BotEffectKind::Warped => &mut self.warped,
        }
    }

    pub fn get(&self, kind: BotEffectKind) -> Option<&BotEffect> {
        match kind {
            BotEffectKind::Frozen => self.frozen.as_ref(),
            BotEffectKind::Slowed => self.slowed.as_ref(),
            BotEffectKind::Warped => self.warped.as_ref(),
        }
    }

    pub fn speed_factor(&self) -> f32 {
        [self.frozen, self.slowed, self.warped]
            .iter()
            .flatten()
            .fold(1.0, |acc, e| acc * e.factor)
    }
}

pub fn apply_bot_effect(
    bot: &mut Bot,
    schedule: &mut Schedule,
    now: u64,
    kind: BotEffectKind,
    duration_ms: u64,
    factor: f32,
) -> Applied {
    let expires_at = now + duration_ms;
    schedule.push(expires_at, Deferred::BotEffectExpired { bot: bot.id, kind });

    let slot = bot.effects.slot_mut(kind);
    if let Some(effect) = slot {
        effect.expires_at = expires_at;
        return Applied::Refreshed;
    }
    *slot = Some(BotEffect { expires_at, factor });
    bot.refresh_speed();
    Applied::Started
}

pub fn expire_bot_effect(bot: &mut Bot, kind: BotEffectKind, at: u64) -> bool {
    let slot = bot.effects.slot_mut(kind);
    if !matches!(*slot, Some(effect) if effect.expires_at == at) {
        return false;
    }
    *slot = None;
    bot.refresh_speed();
    true
}
