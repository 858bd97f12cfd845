/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No game logic is performed; this module only translates state
/// into terminal commands.  World units are scaled onto the terminal grid
/// through a [`Viewport`].

use std::io::Write;

use arena_shooter::entities::{Bot, Bullet, GameStatus, PowerUp, PowerUpKind, Rgb, Tag, WorldState};
use arena_shooter::geometry::Arena;
use arena_shooter::shop::Inventory;
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_MONEY: Color = Color::Yellow;
const C_HUD_WEAPON: Color = Color::Cyan;
const C_BOT: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_BOT: Color = Color::Magenta;
const C_EFFECT: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Player colour presets offered by the settings screen.
pub const COLOR_PRESETS: [(&str, Rgb); 6] = [
    ("White", Rgb::WHITE),
    ("Red", Rgb { r: 255, g: 80, b: 80 }),
    ("Green", Rgb { r: 80, g: 255, b: 120 }),
    ("Blue", Rgb { r: 90, g: 140, b: 255 }),
    ("Gold", Rgb { r: 255, g: 200, b: 40 }),
    ("Pink", Rgb { r: 255, g: 120, b: 220 }),
];

pub const MENU_ITEMS: [&str; 5] = ["Play", "Multiplayer", "Shop", "Settings", "Quit"];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps the arena onto the playfield rows 2..rows-2 and columns 1..cols-1.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    arena: Arena,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, arena: Arena) -> Self {
        Self { cols, rows, arena }
    }

    fn field_cols(&self) -> f32 {
        f32::from(self.cols.saturating_sub(2).max(1))
    }

    fn field_rows(&self) -> f32 {
        f32::from(self.rows.saturating_sub(4).max(1))
    }

    pub fn world_to_cell(&self, p: Vec2) -> (u16, u16) {
        let fx = (p.x / self.arena.width).clamp(0.0, 1.0) * (self.field_cols() - 1.0);
        let fy = (p.y / self.arena.height).clamp(0.0, 1.0) * (self.field_rows() - 1.0);
        (1 + fx.round() as u16, 2 + fy.round() as u16)
    }

    /// Inverse of [`world_to_cell`](Self::world_to_cell), used for the mouse.
    pub fn cell_to_world(&self, col: u16, row: u16) -> Vec2 {
        let fx = f32::from(col.saturating_sub(1)) / (self.field_cols() - 1.0).max(1.0);
        let fy = f32::from(row.saturating_sub(2)) / (self.field_rows() - 1.0).max(1.0);
        Vec2::new(
            fx.clamp(0.0, 1.0) * self.arena.width,
            fy.clamp(0.0, 1.0) * self.arena.height,
        )
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

fn centered<W: Write>(out: &mut W, cols: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn finish<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()
}

// ── In-game view ──────────────────────────────────────────────────────────────

/// Render one complete in-game frame.
pub fn render<W: Write>(out: &mut W, world: &WorldState, view: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, world, view)?;

    for power_up in &world.power_ups {
        draw_power_up(out, power_up, view)?;
    }
    for bot in &world.bots {
        draw_bot(out, bot, view)?;
    }
    for bullet in &world.player.bullets {
        draw_bullet(out, bullet, true, view)?;
    }
    for bullet in world.bots.iter().flat_map(|b| b.bullets.iter()) {
        draw_bullet(out, bullet, false, view)?;
    }

    let (px, py) = view.world_to_cell(world.player.pos);
    out.queue(cursor::MoveTo(px, py))?;
    out.queue(style::SetForegroundColor(to_color(world.player.color)))?;
    out.queue(Print("@"))?;

    if world.boss_notice {
        centered(out, view.cols, 2, "!! BOSS INCOMING !!", C_BOSS)?;
    }

    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD/arrows: move   mouse/SPACE: fire   1-9: equip   Q: quit"))?;

    if world.status == GameStatus::GameOver {
        draw_game_over(out, world, view)?;
    }

    finish(out, view.rows)
}

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, world: &WorldState, view: &Viewport) -> std::io::Result<()> {
    let player = &world.player;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    let life = if player.extra_life { " +1" } else { "" };
    out.queue(Print(format!("HP:{:>3}{}  ", player.health, life)))?;
    out.queue(style::SetForegroundColor(C_HUD_MONEY))?;
    out.queue(Print(format!("${:<6} ", player.money)))?;
    out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
    out.queue(Print(format!("{}  ", player.inventory.current().name)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(format!("Kills:{}", world.kills)))?;

    // Active effects with seconds remaining, right-aligned.
    let effects: Vec<String> = player
        .effects
        .iter()
        .map(|(kind, active)| {
            let left = active.expires_at.saturating_sub(world.now_ms) / 1000 + 1;
            format!("[{} {}s]", kind.label(), left)
        })
        .collect();
    let tag = effects.join(" ");
    if !tag.is_empty() {
        let col = view.cols.saturating_sub(tag.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(col, 0))?;
        out.queue(style::SetForegroundColor(C_EFFECT))?;
        out.queue(Print(tag))?;
    }
    Ok(())
}

fn draw_bot<W: Write>(out: &mut W, bot: &Bot, view: &Viewport) -> std::io::Result<()> {
    let (x, y) = view.world_to_cell(bot.pos);
    if bot.is_boss {
        out.queue(style::SetForegroundColor(C_BOSS))?;
        out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), y))?;
        out.queue(Print("«B»"))?;
    } else {
        let color = if bot.is_frozen() { Color::Cyan } else { C_BOT };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(Print("▼"))?;
    }
    Ok(())
}

fn bullet_color(bullet: &Bullet, from_player: bool) -> Color {
    if !from_player {
        return C_BULLET_BOT;
    }
    match bullet.tags.iter().next() {
        Some(Tag::Golden) => Color::Yellow,
        Some(Tag::Explosive) => Color::DarkYellow,
        Some(Tag::Chain) => Color::Blue,
        Some(Tag::Poison) => Color::Green,
        Some(Tag::Freeze) => Color::White,
        Some(Tag::Pull) => Color::DarkMagenta,
        None => C_BULLET_PLAYER,
    }
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, from_player: bool, view: &Viewport) -> std::io::Result<()> {
    let (x, y) = view.world_to_cell(bullet.pos);
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(bullet_color(bullet, from_player)))?;
    out.queue(Print(if from_player { "•" } else { "∘" }))?;
    Ok(())
}

fn power_up_glyph(kind: PowerUpKind) -> (&'static str, Color) {
    match kind {
        PowerUpKind::Health | PowerUpKind::HealOverTime => ("+", Color::Green),
        PowerUpKind::ExtraLife => ("♥", Color::Magenta),
        PowerUpKind::Bomb => ("*", Color::Red),
        PowerUpKind::Invincibility | PowerUpKind::Shield => ("◊", Color::Cyan),
        PowerUpKind::FreezeTime | PowerUpKind::TimeSlow | PowerUpKind::TimeWarp => ("○", Color::Blue),
        _ => ("★", Color::Yellow),
    }
}

fn draw_power_up<W: Write>(out: &mut W, power_up: &PowerUp, view: &Viewport) -> std::io::Result<()> {
    let (x, y) = view.world_to_cell(power_up.pos);
    let (glyph, color) = power_up_glyph(power_up.kind);
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, world: &WorldState, view: &Viewport) -> std::io::Result<()> {
    let kills = format!("Kills: {}   Money: ${}", world.kills, world.player.money);
    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&kills, Color::Yellow),
        ("R - Restart (keep progress)", Color::White),
        ("N - New game   M - Menu", Color::White),
    ];
    let start = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        centered(out, view.cols, start + i as u16, text, *color)?;
    }
    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(out: &mut W, cols: u16, rows: u16, selected: usize) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = rows / 2;
    centered(out, cols, cy.saturating_sub(5), "★  ARENA  SHOOTER  ★", Color::Cyan)?;
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let (text, color) = if i == selected {
            (format!("> {} <", item), Color::Yellow)
        } else {
            (item.to_string(), Color::White)
        };
        centered(out, cols, cy.saturating_sub(2) + i as u16, &text, color)?;
    }
    centered(out, cols, cy + 5, "↑ ↓ : select   ENTER : confirm   Q : quit", C_HINT)?;
    finish(out, rows)
}

pub fn render_shop<W: Write>(
    out: &mut W,
    cols: u16,
    rows: u16,
    inventory: &Inventory,
    money: u32,
    selected: usize,
    message: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    centered(out, cols, 1, "WEAPON SHOP", Color::Cyan)?;
    centered(out, cols, 2, &format!("Money: ${}", money), C_HUD_MONEY)?;

    let current = &inventory.current().id;
    for (i, slot) in inventory.slots().iter().enumerate() {
        let w = &slot.spec;
        let state = if &w.id == current {
            "equipped".to_string()
        } else if slot.owned {
            "owned".to_string()
        } else {
            format!("${}", w.cost)
        };
        let line = format!(
            "{} {:<18} dmg {:>3}  rate {:>4}ms  {:>9}",
            if i == selected { ">" } else { " " },
            w.name,
            w.damage,
            w.fire_rate_ms,
            state
        );
        let color = if i == selected { Color::Yellow } else { Color::White };
        out.queue(cursor::MoveTo(2, 4 + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(line))?;
    }
    if let Some(msg) = message {
        centered(out, cols, rows.saturating_sub(3), msg, Color::Red)?;
    }
    centered(out, cols, rows.saturating_sub(2), "↑ ↓ : select   ENTER : buy / equip   ESC : back", C_HINT)?;
    finish(out, rows)
}

pub fn render_settings<W: Write>(out: &mut W, cols: u16, rows: u16, selected: usize) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = rows / 2;
    centered(out, cols, cy.saturating_sub(5), "PLAYER COLOUR", Color::Cyan)?;
    for (i, (name, rgb)) in COLOR_PRESETS.iter().enumerate() {
        let text = if i == selected {
            format!("> @ {} <", name)
        } else {
            format!("@ {}", name)
        };
        centered(out, cols, cy.saturating_sub(3) + i as u16, &text, to_color(*rgb))?;
    }
    centered(out, cols, cy + 5, "↑ ↓ : select   ENTER : apply   ESC : back", C_HINT)?;
    finish(out, rows)
}

pub fn render_lobby<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = rows / 2;
    centered(out, cols, cy.saturating_sub(1), "MULTIPLAYER LOBBY", Color::Cyan)?;
    centered(out, cols, cy + 1, "No servers found. Local game only.", Color::White)?;
    centered(out, cols, cy + 3, "ENTER : start local game   ESC : back", C_HINT)?;
    finish(out, rows)
}
