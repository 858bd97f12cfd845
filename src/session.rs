/// Session state machine:
///
/// ```text
/// Idle ──start──▶ Running ──death──▶ GameOver ──restart_keep_progress──▶ Running
///   ▲                                   │      ──fresh_session─────────▶ Running
///   └───────────────to_menu─────────────┘
/// ```
///
/// Only `Running` ticks.  Every transition that ends a round clears the
/// deferred schedule so nothing from the old round leaks into the next.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::catalog::Catalog;
use crate::compute::{self, TickReport};
use crate::config::GameConfig;
use crate::entities::{GameStatus, Player, Rgb, WorldState};
use crate::error::GameError;
use crate::input::InputState;
use crate::shop::{self, Inventory};
use crate::spawn;

/// A brand-new idle world: player centred with the catalog's economy.
pub fn new_world(config: &GameConfig, catalog: &Catalog) -> WorldState {
    let arena = config.arena();
    let player = Player::new(
        arena.center(),
        catalog.starting_money,
        Inventory::from_catalog(catalog),
    );
    WorldState::new(arena, player)
}

/// Reset the round state and put the world into `Running`.  With
/// `keep_economy` money and weapon ownership survive; otherwise they are
/// reset to the catalog's starting values.
pub fn begin_round(
    world: &mut WorldState,
    config: &GameConfig,
    catalog: &Catalog,
    rng: &mut StdRng,
    keep_economy: bool,
) {
    world.schedule.clear();
    world.now_ms = 0;
    world.tick = 0;

    let color = world.player.color;
    let mut player = if keep_economy {
        let money = world.player.money;
        let inventory = world.player.inventory.clone();
        Player::new(world.arena.center(), money, inventory)
    } else {
        Player::new(
            world.arena.center(),
            catalog.starting_money,
            Inventory::from_catalog(catalog),
        )
    };
    player.color = color;
    world.player = player;

    world.bots.clear();
    world.power_ups.clear();
    world.kills = 0;
    world.boss_alive = false;
    world.boss_pending = false;
    world.boss_notice = false;
    world.status = GameStatus::Running;

    spawn::populate(world, config, rng);
    spawn::start_power_up_timer(world, config);
    info!(keep_economy, money = world.player.money, "round started");
}

pub struct Session {
    config: GameConfig,
    catalog: Catalog,
    world: WorldState,
    rng: StdRng,
}

impl Session {
    pub fn new(config: GameConfig, catalog: Catalog, seed: u64) -> Self {
        let world = new_world(&config, &catalog);
        Self {
            config,
            catalog,
            world,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn status(&self) -> GameStatus {
        self.world.status
    }

    /// Idle → Running.  Money and weapons carry over from earlier rounds.
    pub fn start(&mut self) {
        if self.world.status == GameStatus::Running {
            return;
        }
        begin_round(&mut self.world, &self.config, &self.catalog, &mut self.rng, true);
    }

    pub fn step(&mut self, input: &InputState) -> Result<TickReport, GameError> {
        compute::tick(
            &mut self.world,
            input,
            &self.config,
            &self.catalog,
            &mut self.rng,
        )
    }

    /// New round keeping money and weapon ownership.
    pub fn restart_keep_progress(&mut self) {
        begin_round(&mut self.world, &self.config, &self.catalog, &mut self.rng, true);
    }

    /// New round with the economy reset to the catalog's starting values.
    pub fn fresh_session(&mut self) {
        begin_round(&mut self.world, &self.config, &self.catalog, &mut self.rng, false);
    }

    /// Back to the menus.  Pending deferred work is cancelled.
    pub fn to_menu(&mut self) {
        self.world.schedule.clear();
        self.world.status = GameStatus::Idle;
        info!("returned to menu");
    }

    pub fn purchase(&mut self, weapon: &str) -> Result<(), GameError> {
        shop::purchase(&mut self.world.player, weapon)
    }

    pub fn equip(&mut self, weapon: &str) -> Result<(), GameError> {
        shop::equip(&mut self.world.player, weapon)
    }

    /// Cosmetic only.
    pub fn set_player_color(&mut self, color: Rgb) {
        self.world.player.color = color;
    }
}
