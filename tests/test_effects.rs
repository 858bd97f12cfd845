use arena_shooter::catalog::Catalog;
use arena_shooter::compute::tick;
use arena_shooter::config::GameConfig;
use arena_shooter::effects::*;
use arena_shooter::entities::*;
use arena_shooter::input::InputState;
use arena_shooter::powerups::apply_power_up;
use arena_shooter::schedule::Schedule;
use arena_shooter::session::new_world;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_config(tick_ms: u64) -> GameConfig {
    GameConfig {
        tick_ms,
        initial_bots: 0,
        basic_fire_chance: 0.0,
        boss_fire_chance: 0.0,
        ..GameConfig::default()
    }
}

fn running_world(config: &GameConfig, catalog: &Catalog) -> WorldState {
    let mut world = new_world(config, catalog);
    world.status = GameStatus::Running;
    world
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── stat overrides ────────────────────────────────────────────────────────────

#[test]
fn speed_boost_does_not_stack_and_restores_once() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    let mut schedule = Schedule::default();
    let player = &mut world.player;

    let first = apply_player_effect(player, &mut schedule, 0, EffectKind::Speed, 5000, 1.0);
    assert_eq!(first, Applied::Started);
    assert_eq!(player.speed, 3.0);

    let again = apply_player_effect(player, &mut schedule, 1000, EffectKind::Speed, 5000, 1.0);
    assert_eq!(again, Applied::Refreshed);
    assert_eq!(player.speed, 3.0);

    // The first expiry is stale after the refresh.
    assert!(!expire_player_effect(player, EffectKind::Speed, 5000));
    assert_eq!(player.speed, 3.0);

    assert!(expire_player_effect(player, EffectKind::Speed, 6000));
    assert_eq!(player.speed, Player::BASE_SPEED);
    assert!(!player.effects.is_active(EffectKind::Speed));
}

#[test]
fn bullet_speed_is_overridden_then_restored() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    let mut schedule = Schedule::default();
    let player = &mut world.player;

    apply_player_effect(player, &mut schedule, 0, EffectKind::BulletSpeed, 5000, 10.0);
    assert_eq!(player.bullet_speed, 10.0);
    assert!(expire_player_effect(player, EffectKind::BulletSpeed, 5000));
    assert_eq!(player.bullet_speed, Player::BASE_BULLET_SPEED);
}

#[test]
fn each_application_enqueues_an_expiry() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    let mut schedule = Schedule::default();
    apply_player_effect(&mut world.player, &mut schedule, 0, EffectKind::RapidFire, 8000, 0.0);
    apply_player_effect(&mut world.player, &mut schedule, 500, EffectKind::RapidFire, 8000, 0.0);
    let times: Vec<u64> = schedule.pending().iter().map(|(at, _)| *at).collect();
    assert_eq!(times, vec![8000, 8500]);
    assert_eq!(world.player.effects.get(EffectKind::RapidFire).unwrap().expires_at, 8500);
}

// ── damage & healing ──────────────────────────────────────────────────────────

#[test]
fn double_damage_and_golden_multiply() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    let mut schedule = Schedule::default();
    let golden = Tags::NONE.with(Tag::Golden);

    assert_eq!(effective_damage(10, &world.player.effects, Tags::NONE), 10);
    assert_eq!(effective_damage(10, &world.player.effects, golden), 30);

    apply_player_effect(&mut world.player, &mut schedule, 0, EffectKind::DoubleDamage, 5000, 0.0);
    assert_eq!(effective_damage(10, &world.player.effects, Tags::NONE), 20);
    assert_eq!(effective_damage(10, &world.player.effects, golden), 60);
}

#[test]
fn life_steal_returns_thirty_percent() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    let mut schedule = Schedule::default();
    world.player.health = 80;
    apply_player_effect(&mut world.player, &mut schedule, 0, EffectKind::LifeSteal, 8000, 0.0);

    apply_life_steal(&mut world.player, 10);
    assert_eq!(world.player.health, 83);
}

#[test]
fn vampire_mode_adds_to_life_steal() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    let mut schedule = Schedule::default();
    world.player.health = 80;
    apply_player_effect(&mut world.player, &mut schedule, 0, EffectKind::LifeSteal, 8000, 0.0);
    apply_player_effect(&mut world.player, &mut schedule, 0, EffectKind::VampireMode, 10_000, 0.0);

    apply_life_steal(&mut world.player, 10);
    assert_eq!(world.player.health, 88);
}

#[test]
fn no_steal_at_full_health_or_without_effect() {
    let catalog = Catalog::arsenal();
    let mut world = new_world(&GameConfig::default(), &catalog);
    world.player.health = 50;
    apply_life_steal(&mut world.player, 40);
    assert_eq!(world.player.health, 50);

    let mut schedule = Schedule::default();
    apply_player_effect(&mut world.player, &mut schedule, 0, EffectKind::VampireMode, 10_000, 0.0);
    world.player.health = PLAYER_MAX_HEALTH;
    apply_life_steal(&mut world.player, 40);
    assert_eq!(world.player.health, PLAYER_MAX_HEALTH);
}

// ── bot effects ───────────────────────────────────────────────────────────────

#[test]
fn bot_speed_derives_from_base_and_factors() {
    let mut bot = Bot::basic(7, Vec2::ZERO);
    let mut schedule = Schedule::default();

    apply_bot_effect(&mut bot, &mut schedule, 0, BotEffectKind::Slowed, 4000, 0.3);
    assert!((bot.speed - 0.24).abs() < 1e-6);

    apply_bot_effect(&mut bot, &mut schedule, 0, BotEffectKind::Warped, 3000, -1.0);
    assert!((bot.speed + 0.24).abs() < 1e-6);

    assert!(expire_bot_effect(&mut bot, BotEffectKind::Warped, 3000));
    assert!((bot.speed - 0.24).abs() < 1e-6);

    assert!(expire_bot_effect(&mut bot, BotEffectKind::Slowed, 4000));
    assert_eq!(bot.speed, Bot::BASIC_SPEED);
}

#[test]
fn refreshed_freeze_ignores_the_old_expiry() {
    let mut bot = Bot::basic(1, Vec2::ZERO);
    let mut schedule = Schedule::default();

    apply_bot_effect(&mut bot, &mut schedule, 0, BotEffectKind::Frozen, 3000, 0.0);
    assert!(bot.is_frozen());
    assert_eq!(bot.speed, 0.0);
    let again = apply_bot_effect(&mut bot, &mut schedule, 1000, BotEffectKind::Frozen, 3000, 0.0);
    assert_eq!(again, Applied::Refreshed);

    assert!(!expire_bot_effect(&mut bot, BotEffectKind::Frozen, 3000));
    assert!(bot.is_frozen());
    assert!(expire_bot_effect(&mut bot, BotEffectKind::Frozen, 4000));
    assert!(!bot.is_frozen());
    assert_eq!(bot.speed, Bot::BASIC_SPEED);
}

#[test]
fn freeze_pickup_touches_only_present_bots_and_expires_on_time() {
    let config = quiet_config(100);
    let catalog = Catalog::arsenal();
    let mut world = running_world(&config, &catalog);
    let mut rng = seeded_rng();
    let id = world.allocate_bot_id();
    world.bots.push(Bot::basic(id, Vec2::new(100.0, 100.0)));

    apply_power_up(&mut world, &config, &catalog, PowerUpKind::FreezeTime, &mut rng);
    let late = world.allocate_bot_id();
    world.bots.push(Bot::basic(late, Vec2::new(800.0, 100.0)));

    for _ in 0..29 {
        tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap();
    }
    assert_eq!(world.bots[0].pos, Vec2::new(100.0, 100.0));
    assert_ne!(world.bots[1].pos, Vec2::new(800.0, 100.0));

    tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap(); // now = 3000
    assert!(!world.bots[0].is_frozen());
}

// ── repeating effects ─────────────────────────────────────────────────────────

#[test]
fn heal_over_time_pulses_ten_times() {
    let config = quiet_config(100);
    let catalog = Catalog::arsenal();
    let mut world = running_world(&config, &catalog);
    let mut rng = seeded_rng();
    world.player.health = 40;

    apply_power_up(&mut world, &config, &catalog, PowerUpKind::HealOverTime, &mut rng);
    assert!(world.player.effects.is_active(EffectKind::HealOverTime));

    for _ in 0..99 {
        tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap();
    }
    assert_eq!(world.player.health, 85); // nine pulses by 9900 ms

    tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap();
    assert_eq!(world.player.health, 90);
    assert!(!world.player.effects.is_active(EffectKind::HealOverTime));

    for _ in 0..20 {
        tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap();
    }
    assert_eq!(world.player.health, 90);
}

#[test]
fn reapplied_heal_over_time_extends_without_doubling() {
    let config = quiet_config(100);
    let catalog = Catalog::arsenal();
    let mut world = running_world(&config, &catalog);
    let mut rng = seeded_rng();
    world.player.health = 10;

    apply_power_up(&mut world, &config, &catalog, PowerUpKind::HealOverTime, &mut rng);
    apply_power_up(&mut world, &config, &catalog, PowerUpKind::HealOverTime, &mut rng);

    for _ in 0..10 {
        tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap();
    }
    assert_eq!(world.player.health, 15);
}

#[test]
fn black_hole_pulls_bots_inside_the_ring() {
    let config = quiet_config(50);
    let catalog = Catalog::arsenal();
    let mut world = running_world(&config, &catalog);
    let mut rng = seeded_rng();
    let center = world.player.pos;
    let near = world.allocate_bot_id();
    world.bots.push(Bot::basic(near, center + Vec2::new(100.0, 0.0)));
    let far = world.allocate_bot_id();
    world.bots.push(Bot::basic(far, center + Vec2::new(300.0, 0.0)));

    apply_power_up(&mut world, &config, &catalog, PowerUpKind::BlackHole, &mut rng);
    tick(&mut world, &InputState::default(), &config, &catalog, &mut rng).unwrap();

    // pull of 2 from the pulse, then 0.8 of normal chasing
    assert!((world.bots[0].pos.x - (center.x + 97.2)).abs() < 1e-3);
    assert!((world.bots[1].pos.x - (center.x + 299.2)).abs() < 1e-3);
}

#[test]
fn hud_labels_are_player_facing() {
    assert_eq!(EffectKind::RapidFire.label(), "Rapid Fire");
    assert_eq!(EffectKind::DoubleDamage.label(), "Double Damage");
    assert_eq!(EffectKind::HealOverTime.label(), "Regen");
}
