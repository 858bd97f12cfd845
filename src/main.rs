mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arena_shooter::catalog::{Catalog, Variant};
use arena_shooter::config::GameConfig;
use arena_shooter::driver::{self, FixedStep};
use arena_shooter::entities::GameStatus;
use arena_shooter::input::InputState;
use arena_shooter::session::Session;

use display::{Viewport, COLOR_PRESETS, MENU_ITEMS};

/// Render cadence; the simulation runs on its own fixed step.
const FRAME: Duration = Duration::from_millis(33);

/// Most simulation steps one frame may catch up on.
const MAX_CATCH_UP: u32 = 5;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Arsenal,
    Classic,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Arsenal => Variant::Arsenal,
            VariantArg::Classic => Variant::Classic,
        }
    }
}

/// Top-down terminal arena shooter.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Arena width in world units.
    #[arg(long)]
    width: Option<f32>,
    /// Arena height in world units.
    #[arg(long)]
    height: Option<f32>,
    /// Logical milliseconds per simulation step.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Built-in weapon catalog.
    #[arg(long, value_enum, default_value = "arsenal")]
    variant: VariantArg,
    /// Load the catalog from a JSON file instead of a built-in variant.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Engine tunables as JSON; command-line values override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "arena_shooter.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GameConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(w) = args.width {
        config.arena_width = w;
    }
    if let Some(h) = args.height {
        config.arena_height = h;
    }
    if let Some(t) = args.tick_ms {
        config.tick_ms = t.max(1);
    }
    Ok(config)
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    match &args.catalog {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            Catalog::from_json(&text)
                .with_context(|| format!("loading catalog {}", path.display()))
        }
        None => Ok(Catalog::for_variant(args.variant.into())),
    }
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
    })
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

// ── Menus ─────────────────────────────────────────────────────────────────────

enum MenuChoice {
    Play,
    Lobby,
    Shop,
    Settings,
    Quit,
}

/// Blocks until the next key press and returns it.
fn next_key(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(key),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<MenuChoice> {
    let mut selected = 0usize;
    loop {
        let (cols, rows) = terminal::size()?;
        display::render_menu(out, cols, rows, selected)?;
        let Some(KeyEvent { code, modifiers, .. }) = next_key(rx) else {
            return Ok(MenuChoice::Quit);
        };
        match code {
            _ if is_quit(code, modifiers) => return Ok(MenuChoice::Quit),
            KeyCode::Up | KeyCode::Char('w') => {
                selected = (selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
            }
            KeyCode::Down | KeyCode::Char('s') => selected = (selected + 1) % MENU_ITEMS.len(),
            KeyCode::Enter => {
                return Ok(match selected {
                    0 => MenuChoice::Play,
                    1 => MenuChoice::Lobby,
                    2 => MenuChoice::Shop,
                    3 => MenuChoice::Settings,
                    _ => MenuChoice::Quit,
                })
            }
            _ => {}
        }
    }
}

fn show_shop<W: Write>(out: &mut W, session: &mut Session, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let mut selected = 0usize;
    let mut message: Option<String> = None;
    loop {
        let (cols, rows) = terminal::size()?;
        let player = &session.world().player;
        let count = player.inventory.slots().len().max(1);
        display::render_shop(
            out,
            cols,
            rows,
            &player.inventory,
            player.money,
            selected,
            message.as_deref(),
        )?;
        let Some(KeyEvent { code, .. }) = next_key(rx) else {
            return Ok(());
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
            KeyCode::Up | KeyCode::Char('w') => selected = (selected + count - 1) % count,
            KeyCode::Down | KeyCode::Char('s') => selected = (selected + 1) % count,
            KeyCode::Enter => {
                let Some(slot) = player.inventory.slots().get(selected) else {
                    continue;
                };
                let (id, owned) = (slot.spec.id.clone(), slot.owned);
                let result = if owned {
                    session.equip(&id)
                } else {
                    session.purchase(&id)
                };
                message = result.err().map(|e| {
                    warn!(error = %e, "shop action refused");
                    e.to_string()
                });
            }
            _ => {}
        }
    }
}

fn show_settings<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut selected = COLOR_PRESETS
        .iter()
        .position(|(_, rgb)| *rgb == session.world().player.color)
        .unwrap_or(0);
    loop {
        let (cols, rows) = terminal::size()?;
        display::render_settings(out, cols, rows, selected)?;
        let Some(KeyEvent { code, .. }) = next_key(rx) else {
            return Ok(());
        };
        let n = COLOR_PRESETS.len();
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
            KeyCode::Up | KeyCode::Char('w') => selected = (selected + n - 1) % n,
            KeyCode::Down | KeyCode::Char('s') => selected = (selected + 1) % n,
            KeyCode::Enter => {
                session.set_player_color(COLOR_PRESETS[selected].1);
                return Ok(());
            }
            _ => {}
        }
    }
}

/// Returns true when the player asks for a local game.
fn show_lobby<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<bool> {
    loop {
        let (cols, rows) = terminal::size()?;
        display::render_lobby(out, cols, rows)?;
        match next_key(rx) {
            Some(KeyEvent { code: KeyCode::Enter, .. }) => return Ok(true),
            Some(KeyEvent { code: KeyCode::Esc | KeyCode::Char('q'), .. }) | None => return Ok(false),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RoundEnd {
    Menu,
    Quit,
}

/// Input model: a `key_frame` map records the frame of the last
/// press/repeat event for every key, and keys fresh within `HOLD_WINDOW`
/// count as held.  Release events (keyboard-enhancement terminals) remove
/// a key immediately.  The mouse sets the aim point and the fire button.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> Result<RoundEnd> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut mouse_fire = false;
    let mut input = InputState::default();
    let mut clock = FixedStep::new(session.config().tick_ms, MAX_CATCH_UP);
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let (cols, rows) = terminal::size()?;
        let view = Viewport::new(cols, rows, session.world().arena);

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        if is_quit(code, modifiers) {
                            return Ok(RoundEnd::Quit);
                        }
                        match (session.status(), code) {
                            (GameStatus::GameOver, KeyCode::Char('r' | 'R')) => {
                                session.restart_keep_progress();
                                clock.reset();
                            }
                            (GameStatus::GameOver, KeyCode::Char('n' | 'N')) => {
                                session.fresh_session();
                                clock.reset();
                            }
                            (GameStatus::GameOver, KeyCode::Char('m' | 'M')) | (_, KeyCode::Esc) => {
                                session.to_menu();
                                return Ok(RoundEnd::Menu);
                            }
                            (GameStatus::Running, KeyCode::Char(c @ '1'..='9')) => {
                                let index = c as usize - '1' as usize;
                                let owned = session
                                    .world()
                                    .player
                                    .inventory
                                    .slots()
                                    .iter()
                                    .filter(|s| s.owned)
                                    .nth(index)
                                    .map(|s| s.spec.id.clone());
                                if let Some(id) = owned {
                                    if let Err(e) = session.equip(&id) {
                                        warn!(error = %e, "equip refused");
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    input.pointer = view.cell_to_world(column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => mouse_fire = true,
                        MouseEventKind::Up(MouseButton::Left) => mouse_fire = false,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        input.up = is_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
        input.down = is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);
        input.left = is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        input.right = is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        input.fire = mouse_fire || is_held(&key_frame, &[KeyCode::Char(' ')], frame);

        let now = Instant::now();
        let elapsed = now - last;
        last = now;
        for report in driver::pump(session, &mut clock, &input, elapsed) {
            for kind in &report.picked_up {
                info!(?kind, "{}", kind.description());
            }
            if report.game_over {
                info!(kills = session.world().kills, "player died");
            }
        }

        display::render(out, session.world(), &view)?;

        let spent = frame_start.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;
    let config = load_config(&args)?;
    let catalog = load_catalog(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, catalog = %catalog.name, "starting");

    let mut session = Session::new(config, catalog, seed);
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &mut session, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, session: &mut Session, rx: &mpsc::Receiver<Event>) -> Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuChoice::Quit => break,
            MenuChoice::Shop => show_shop(out, session, rx)?,
            MenuChoice::Settings => show_settings(out, session, rx)?,
            MenuChoice::Lobby => {
                if show_lobby(out, rx)? && play(out, session, rx)? {
                    break;
                }
            }
            MenuChoice::Play => {
                if play(out, session, rx)? {
                    break;
                }
            }
        }
    }
    info!("exiting");
    Ok(())
}

/// Returns true when the player quit from inside the game.
fn play<W: Write>(out: &mut W, session: &mut Session, rx: &mpsc::Receiver<Event>) -> Result<bool> {
    session.start();
    Ok(matches!(game_loop(out, session, rx)?, RoundEnd::Quit))
}
