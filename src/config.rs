/// Tunable constants of the engine.  The defaults reproduce the shipped
/// game; tests usually lower the bot fire chance to zero for quiet worlds.

use serde::{Deserialize, Serialize};

use crate::geometry::Arena;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Logical milliseconds per simulation step.
    pub tick_ms: u64,
    pub initial_bots: usize,
    /// The player is kept this far from every edge.
    pub edge_margin: f32,
    /// Half-extent of the player / power-up pickup boxes.
    pub hit_half_extent: f32,
    pub respawn_delay_ms: u64,
    pub boss_delay_ms: u64,
    pub boss_notice_ms: u64,
    /// Non-boss kills between boss appearances.
    pub boss_every_kills: u32,
    pub power_up_interval_ms: u64,
    pub basic_fire_chance: f64,
    pub boss_fire_chance: f64,
    pub triple_shot_spread_deg: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 960.0,
            arena_height: 540.0,
            tick_ms: 16,
            initial_bots: 5,
            edge_margin: 10.0,
            hit_half_extent: 10.0,
            respawn_delay_ms: 3000,
            boss_delay_ms: 2000,
            boss_notice_ms: 3000,
            boss_every_kills: 20,
            power_up_interval_ms: 5000,
            basic_fire_chance: 0.005,
            boss_fire_chance: 0.02,
            triple_shot_spread_deg: 15.0,
        }
    }
}

impl GameConfig {
    /// Parse a partial config; missing fields take their defaults.  A zero
    /// step length is raised to one millisecond so the clock always moves.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: GameConfig = serde_json::from_str(text)?;
        config.tick_ms = config.tick_ms.max(1);
        Ok(config)
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }
}
