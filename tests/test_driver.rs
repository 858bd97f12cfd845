use std::time::Duration;

use arena_shooter::catalog::Catalog;
use arena_shooter::config::GameConfig;
use arena_shooter::driver::{pump, FixedStep};
use arena_shooter::input::InputState;
use arena_shooter::session::Session;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn accumulates_partial_frames() {
    let mut clock = FixedStep::new(16, 5);
    assert_eq!(clock.advance(ms(10)), 0);
    assert_eq!(clock.advance(ms(10)), 1);
    assert_eq!(clock.advance(ms(32)), 2); // 4 ms carried over
    assert_eq!(clock.advance(ms(12)), 1);
}

#[test]
fn drops_backlog_beyond_the_catch_up_limit() {
    let mut clock = FixedStep::new(16, 5);
    assert_eq!(clock.advance(Duration::from_secs(1)), 5);
    assert_eq!(clock.advance(ms(0)), 0);
}

#[test]
fn huge_backlog_saturates_instead_of_wrapping() {
    let mut clock = FixedStep::new(1, 5);
    // 2^32 + 3 steps truncate to 3 as a u32.
    assert_eq!(clock.advance(ms((1u64 << 32) + 3)), 5);
    assert_eq!(clock.advance(ms(0)), 0);
}

#[test]
fn reset_forgets_banked_time() {
    let mut clock = FixedStep::new(16, 5);
    clock.advance(ms(15));
    clock.reset();
    assert_eq!(clock.advance(ms(15)), 0);
}

#[test]
fn pump_runs_only_a_running_session() {
    let config = GameConfig {
        basic_fire_chance: 0.0,
        boss_fire_chance: 0.0,
        ..GameConfig::default()
    };
    let mut session = Session::new(config, Catalog::arsenal(), 11);
    let mut clock = FixedStep::new(session.config().tick_ms, 5);
    let input = InputState::default();

    assert!(pump(&mut session, &mut clock, &input, ms(48)).is_empty());

    session.start();
    clock.reset();
    assert_eq!(pump(&mut session, &mut clock, &input, ms(48)).len(), 3);
    assert_eq!(session.world().tick, 3);
    assert_eq!(session.world().now_ms, 48);
}
