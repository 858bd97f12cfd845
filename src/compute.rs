/// The per-tick simulation step.
///
/// [`tick`] advances a [`WorldState`] by one fixed step.  All randomness
/// comes through the injected RNG so callers control determinism (tests
/// use a seeded one).  The phase order below is part of the contract.

use rand::Rng;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::effects::{apply_life_steal, effective_damage, expire_bot_effect, expire_player_effect, EffectKind};
use crate::entities::{
    advance_and_cull, Bot, BotId, Bullet, GameStatus, PowerUpKind, Tags, WorldState,
    PLAYER_MAX_HEALTH,
};
use crate::error::GameError;
use crate::geometry::{angle_to, overlaps};
use crate::input::InputState;
use crate::powerups;
use crate::schedule::Deferred;
use crate::spawn;

const BASIC_BULLET_SPEED: f32 = 3.0;
const BASIC_BULLET_DAMAGE: i32 = 10;
const BOSS_BULLET_SPEED: f32 = 4.0;
const BOSS_BULLET_DAMAGE: i32 = 20;

/// What happened during one tick, for the front-end and for tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub bullets_fired: usize,
    pub player_hits: u32,
    pub killed: Vec<BotId>,
    pub picked_up: Vec<PowerUpKind>,
    pub respawned: bool,
    pub game_over: bool,
}

/// Advance the simulation by one step.
pub fn tick(
    world: &mut WorldState,
    input: &InputState,
    config: &GameConfig,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Result<TickReport, GameError> {
    if world.status != GameStatus::Running {
        return Err(GameError::SessionNotRunning);
    }
    let mut report = TickReport::default();

    world.tick += 1;
    world.now_ms += config.tick_ms;
    drain_schedule(world, config, catalog, rng);

    // ── 1. Movement ──────────────────────────────────────────────────────────
    move_player(world, input, config);

    // ── 2. Continuous fire ───────────────────────────────────────────────────
    if input.fire && fire_ready(world) {
        report.bullets_fired = fire_weapon(world, input.pointer, config);
    }

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    let arena = world.arena;
    advance_and_cull(&mut world.player.bullets, &arena);
    for bot in &mut world.bots {
        advance_and_cull(&mut bot.bullets, &arena);
    }

    // ── 4. Bots ──────────────────────────────────────────────────────────────
    bots_think(world, config, rng);

    // ── 5. Bot bullets ↔ player ──────────────────────────────────────────────
    resolve_bot_fire(world, config, &mut report);
    if report.game_over {
        return Ok(report);
    }

    // ── 6. Player bullets ↔ bots ─────────────────────────────────────────────
    resolve_player_fire(world, config, catalog, &mut report);

    // ── 7. Power-ups ─────────────────────────────────────────────────────────
    collect_power_ups(world, config, catalog, rng, &mut report);

    Ok(report)
}

/// Run every deferred entry due at the current logical time.
pub fn drain_schedule(
    world: &mut WorldState,
    config: &GameConfig,
    catalog: &Catalog,
    rng: &mut impl Rng,
) {
    while let Some((at, event)) = world.schedule.pop_due(world.now_ms) {
        match event {
            Deferred::PlayerEffectExpired(kind) => {
                if expire_player_effect(&mut world.player, kind, at) {
                    debug!(?kind, "effect expired");
                }
            }
            Deferred::BotEffectExpired { bot, kind } => {
                if let Some(bot) = world.bot_mut(bot) {
                    expire_bot_effect(bot, kind, at);
                }
            }
            Deferred::Pulse {
                kind,
                interval_ms,
                pulse,
            } => powerups::run_pulse(world, at, kind, interval_ms, pulse),
            Deferred::SpawnBot => {
                spawn::spawn_bot(world, rng);
            }
            Deferred::SpawnBoss => {
                spawn::spawn_boss(world, config, rng);
            }
            Deferred::HideBossNotice => world.boss_notice = false,
            Deferred::SpawnPowerUp { interval_ms } => {
                spawn::spawn_power_up(world, catalog, rng);
                world.schedule.push(
                    at + interval_ms.max(1),
                    Deferred::SpawnPowerUp { interval_ms },
                );
            }
        }
    }
}

pub fn move_player(world: &mut WorldState, input: &InputState, config: &GameConfig) {
    let player = &mut world.player;
    let moved = player.pos + input.direction() * player.speed;
    player.pos = world.arena.clamp_inset(moved, config.edge_margin);
}

/// Fire interval of the equipped weapon, halved under rapid fire.
pub fn fire_interval_ms(world: &WorldState) -> u64 {
    let rate = world.player.inventory.current().fire_rate_ms;
    if world.player.effects.is_active(EffectKind::RapidFire) {
        rate / 2
    } else {
        rate
    }
}

pub fn fire_ready(world: &WorldState) -> bool {
    match world.player.last_shot_ms {
        None => true,
        Some(last) => world.now_ms.saturating_sub(last) > fire_interval_ms(world),
    }
}

/// Spawn one batch of bullets from the equipped weapon aimed at `target`
/// and stamp the shot time.  Returns how many bullets were created.
pub fn fire_weapon(world: &mut WorldState, target: glam::Vec2, config: &GameConfig) -> usize {
    let player = &mut world.player;
    let weapon = player.inventory.current();
    let aim = angle_to(player.pos, target);
    let tags: Tags = weapon.tags.union(player.effects.bullet_tags());

    let mut angles = Vec::with_capacity(5);
    match weapon.spread_deg {
        Some(spread) if spread > 0.0 => {
            // -spread ..= +spread in steps of `spread`
            for step in [-1.0f32, 0.0, 1.0] {
                angles.push(aim + (step * spread).to_radians());
            }
        }
        _ => angles.push(aim),
    }
    if player.effects.is_active(EffectKind::TripleShot) {
        let extra = config.triple_shot_spread_deg.to_radians();
        angles.push(aim + extra);
        angles.push(aim - extra);
    }

    let origin = player.pos;
    let (speed, damage) = (weapon.bullet_speed, weapon.damage);
    player.bullets.extend(angles.iter().map(|&angle| Bullet {
        pos: origin,
        speed,
        angle,
        damage,
        tags,
    }));
    player.last_shot_ms = Some(world.now_ms);
    angles.len()
}

/// Step toward `target` along each axis independently.  A negative speed
/// (time warp) steps away.
fn step_toward(bot: &mut Bot, target: glam::Vec2) {
    if bot.pos.x < target.x {
        bot.pos.x += bot.speed;
    } else if bot.pos.x > target.x {
        bot.pos.x -= bot.speed;
    }
    if bot.pos.y < target.y {
        bot.pos.y += bot.speed;
    } else if bot.pos.y > target.y {
        bot.pos.y -= bot.speed;
    }
}

pub fn bots_think(world: &mut WorldState, config: &GameConfig, rng: &mut impl Rng) {
    let target = world.player.pos;
    for bot in &mut world.bots {
        if bot.is_frozen() {
            continue;
        }
        step_toward(bot, target);

        let chance = if bot.is_boss {
            config.boss_fire_chance
        } else {
            config.basic_fire_chance
        };
        if chance > 0.0 && rng.gen_bool(chance.min(1.0)) {
            let (speed, damage) = if bot.is_boss {
                (BOSS_BULLET_SPEED, BOSS_BULLET_DAMAGE)
            } else {
                (BASIC_BULLET_SPEED, BASIC_BULLET_DAMAGE)
            };
            bot.bullets.push(Bullet {
                pos: bot.pos,
                speed,
                angle: angle_to(bot.pos, target),
                damage,
                tags: Tags::NONE,
            });
        }
    }
}

fn resolve_bot_fire(world: &mut WorldState, config: &GameConfig, report: &mut TickReport) {
    if world.player.effects.is_active(EffectKind::Invincible) {
        return;
    }
    let half = config.hit_half_extent;
    for bi in 0..world.bots.len() {
        let mut j = 0;
        while j < world.bots[bi].bullets.len() {
            if !overlaps(world.bots[bi].bullets[j].pos, world.player.pos, half) {
                j += 1;
                continue;
            }
            let bullet = world.bots[bi].bullets.remove(j);
            world.player.take_damage(bullet.damage);
            report.player_hits += 1;

            if world.player.is_dead() {
                if world.player.extra_life {
                    respawn_player(world);
                    report.respawned = true;
                } else {
                    game_over(world);
                    report.game_over = true;
                    return;
                }
            }
        }
    }
}

/// Spend the extra life: back to the centre at full health.
pub fn respawn_player(world: &mut WorldState) {
    let player = &mut world.player;
    player.pos = world.arena.center();
    player.health = PLAYER_MAX_HEALTH;
    player.extra_life = false;
    info!("extra life consumed");
}

/// End the session and cancel everything still pending for it.
pub fn game_over(world: &mut WorldState) {
    world.status = GameStatus::GameOver;
    world.schedule.clear();
    info!(kills = world.kills, money = world.player.money, "game over");
}

fn resolve_player_fire(
    world: &mut WorldState,
    config: &GameConfig,
    catalog: &Catalog,
    report: &mut TickReport,
) {
    let mut i = 0;
    while i < world.bots.len() {
        let mut killed = false;
        let mut j = 0;
        while j < world.player.bullets.len() {
            let bot = &world.bots[i];
            if !overlaps(world.player.bullets[j].pos, bot.pos, bot.size) {
                j += 1;
                continue;
            }
            let bullet = world.player.bullets.remove(j);
            let damage = effective_damage(bullet.damage, &world.player.effects, bullet.tags);
            world.bots[i].take_damage(damage);
            apply_life_steal(&mut world.player, damage);

            if world.bots[i].is_dead() {
                killed = true;
                break;
            }
        }

        if killed {
            let bot = world.bots.remove(i);
            report.killed.push(bot.id);
            spawn::on_bot_killed(world, config, catalog, &bot);
        } else {
            i += 1;
        }
    }
}

fn collect_power_ups(
    world: &mut WorldState,
    config: &GameConfig,
    catalog: &Catalog,
    rng: &mut impl Rng,
    report: &mut TickReport,
) {
    let half = config.hit_half_extent;
    let mut i = 0;
    while i < world.power_ups.len() {
        if overlaps(world.player.pos, world.power_ups[i].pos, half) {
            let power_up = world.power_ups.remove(i);
            powerups::apply_power_up(world, config, catalog, power_up.kind, rng);
            report.picked_up.push(power_up.kind);
        } else {
            i += 1;
        }
    }
}
