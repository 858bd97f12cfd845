/// Power-up pickup effects, dispatched through the catalog's effect table.

use rand::Rng;
use tracing::{debug, warn};

use crate::catalog::{Catalog, PowerUpEffect};
use crate::config::GameConfig;
use crate::effects::{
    advance_pulse, apply_bot_effect, apply_player_effect, apply_repeating_effect, EffectKind,
};
use crate::entities::{Bot, PowerUpKind, WorldState, PLAYER_MAX_HEALTH};
use crate::geometry::{angle_to, distance, heading};
use crate::schedule::Pulse;
use crate::spawn;

pub fn apply_power_up(
    world: &mut WorldState,
    config: &GameConfig,
    catalog: &Catalog,
    kind: PowerUpKind,
    rng: &mut impl Rng,
) {
    let Some(effect) = catalog.power_up_effect(kind) else {
        warn!(?kind, "power-up has no effect in this catalog");
        return;
    };
    debug!(?kind, "power-up collected");
    let now = world.now_ms;

    match effect {
        PowerUpEffect::Heal { amount } => world.player.heal(amount),
        PowerUpEffect::Timed {
            status,
            duration_ms,
            magnitude,
        } => {
            apply_player_effect(
                &mut world.player,
                &mut world.schedule,
                now,
                status,
                duration_ms,
                magnitude,
            );
        }
        PowerUpEffect::ExtraLife => world.player.extra_life = true,
        PowerUpEffect::BotStatus {
            status,
            duration_ms,
            factor,
        } => {
            for bot in &mut world.bots {
                apply_bot_effect(bot, &mut world.schedule, now, status, duration_ms, factor);
            }
        }
        PowerUpEffect::Teleport => {
            world.player.pos = world.arena.random_point_inset(rng, config.edge_margin);
        }
        PowerUpEffect::Bomb { radius } => {
            detonate_bomb(world, config, radius);
        }
        PowerUpEffect::HealOverTime {
            amount,
            interval_ms,
            duration_ms,
        } => {
            apply_repeating_effect(
                &mut world.player,
                &mut world.schedule,
                now,
                EffectKind::HealOverTime,
                interval_ms,
                duration_ms,
                Pulse::Heal { amount },
            );
        }
        PowerUpEffect::BlackHole {
            interval_ms,
            duration_ms,
            min_radius,
            max_radius,
            strength,
        } => {
            apply_repeating_effect(
                &mut world.player,
                &mut world.schedule,
                now,
                EffectKind::BlackHole,
                interval_ms,
                duration_ms,
                Pulse::Pull {
                    min_radius,
                    max_radius,
                    strength,
                },
            );
        }
        PowerUpEffect::Push { radius, distance } => shield_bash(world, radius, distance),
    }
}

/// Remove every bot closer than `radius` to the player.  No reward is paid;
/// each removed bot is still replaced.  Returns how many were removed.
pub fn detonate_bomb(world: &mut WorldState, config: &GameConfig, radius: f32) -> usize {
    let center = world.player.pos;
    let (caught, kept): (Vec<Bot>, Vec<Bot>) = std::mem::take(&mut world.bots)
        .into_iter()
        .partition(|b| distance(b.pos, center) < radius);
    world.bots = kept;
    for bot in &caught {
        spawn::on_bot_removed(world, config, bot);
    }
    caught.len()
}

/// Push bots closer than `radius` straight away from the player.
pub fn shield_bash(world: &mut WorldState, radius: f32, push: f32) {
    let center = world.player.pos;
    for bot in &mut world.bots {
        if distance(bot.pos, center) < radius {
            bot.pos += heading(angle_to(center, bot.pos)) * push;
        }
    }
}

/// Fire one pulse of a repeating effect that came due at `at`.
pub fn run_pulse(world: &mut WorldState, at: u64, kind: EffectKind, interval_ms: u64, pulse: Pulse) {
    if !advance_pulse(&mut world.player, &mut world.schedule, at, kind, interval_ms, pulse) {
        return;
    }
    match pulse {
        Pulse::Heal { amount } => {
            if world.player.health < PLAYER_MAX_HEALTH {
                world.player.heal(amount);
            }
        }
        Pulse::Pull {
            min_radius,
            max_radius,
            strength,
        } => {
            let center = world.player.pos;
            for bot in &mut world.bots {
                let d = distance(bot.pos, center);
                if d < max_radius && d > min_radius {
                    bot.pos += heading(angle_to(bot.pos, center)) * strength;
                }
            }
        }
    }
}
