/// Spawn director: bot population, the boss gate and power-up density.
///
/// Nothing here spawns on a wall-clock timer.  Delayed spawns are entries
/// in the world's [`Schedule`](crate::schedule::Schedule) and happen when
/// the tick drains them.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::entities::{Bot, BotId, PowerUp, WorldState};
use crate::schedule::Deferred;

/// The session-start population: `initial_bots` basic bots at random spots.
pub fn populate(world: &mut WorldState, config: &GameConfig, rng: &mut impl Rng) {
    for _ in 0..config.initial_bots {
        spawn_bot(world, rng);
    }
}

pub fn spawn_bot(world: &mut WorldState, rng: &mut impl Rng) -> BotId {
    let id = world.allocate_bot_id();
    let pos = world.arena.random_point(rng);
    world.bots.push(Bot::basic(id, pos));
    id
}

/// Bring in the boss and raise the notification banner.
pub fn spawn_boss(world: &mut WorldState, config: &GameConfig, rng: &mut impl Rng) -> BotId {
    let id = world.allocate_bot_id();
    let pos = world.arena.random_point(rng);
    world.bots.push(Bot::boss(id, pos));
    world.boss_alive = true;
    world.boss_pending = false;
    world.boss_notice = true;
    world
        .schedule
        .push(world.now_ms + config.boss_notice_ms, Deferred::HideBossNotice);
    info!(bot = id, kills = world.kills, "boss spawned");
    id
}

/// Arm the repeating power-up spawner for a running session.
pub fn start_power_up_timer(world: &mut WorldState, config: &GameConfig) {
    let interval_ms = config.power_up_interval_ms;
    world
        .schedule
        .push(world.now_ms + interval_ms, Deferred::SpawnPowerUp { interval_ms });
}

/// Drop one power-up of a uniformly random catalog kind anywhere in the
/// arena.  Kinds are drawn with replacement.
pub fn spawn_power_up(world: &mut WorldState, catalog: &Catalog, rng: &mut impl Rng) {
    let Some(entry) = catalog.power_ups.choose(rng) else {
        return;
    };
    let pos = world.arena.random_point(rng);
    debug!(kind = ?entry.kind, x = pos.x, y = pos.y, "power-up spawned");
    world.power_ups.push(PowerUp {
        pos,
        kind: entry.kind,
    });
}

pub fn schedule_replacement(world: &mut WorldState, config: &GameConfig) {
    world
        .schedule
        .push(world.now_ms + config.respawn_delay_ms, Deferred::SpawnBot);
}

/// Schedule a boss if the kill counter sits on a positive multiple of the
/// boss interval and no boss is alive or already on its way.
pub fn evaluate_boss_trigger(world: &mut WorldState, config: &GameConfig) -> bool {
    let every = config.boss_every_kills;
    if every == 0 || world.kills == 0 || world.kills % every != 0 {
        return false;
    }
    if world.boss_alive || world.boss_pending {
        return false;
    }
    world.boss_pending = true;
    world
        .schedule
        .push(world.now_ms + config.boss_delay_ms, Deferred::SpawnBoss);
    info!(kills = world.kills, delay_ms = config.boss_delay_ms, "boss scheduled");
    true
}

/// Bookkeeping for a bot destroyed by player fire: reward, kill counter,
/// boss gate and one replacement spawn.
pub fn on_bot_killed(world: &mut WorldState, config: &GameConfig, catalog: &Catalog, bot: &Bot) {
    if bot.is_boss {
        world.player.money += catalog.boss_reward;
        world.boss_alive = false;
        info!(bot = bot.id, money = world.player.money, "boss destroyed");
    } else {
        world.player.money += catalog.basic_reward;
        world.kills += 1;
        evaluate_boss_trigger(world, config);
    }
    schedule_replacement(world, config);
}

/// A bot removed without a kill award (bomb): still replaced, and a removed
/// boss frees the boss slot.
pub fn on_bot_removed(world: &mut WorldState, config: &GameConfig, bot: &Bot) {
    if bot.is_boss {
        world.boss_alive = false;
    }
    schedule_replacement(world, config);
}
