/// Snapshot of raw input the simulation reads each tick.  Input handlers
/// only ever write here; the world is mutated by the tick alone.

use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire button held.
    pub fire: bool,
    /// Pointer position in world units.
    pub pointer: Vec2,
}

impl InputState {
    /// Unit-less movement intent, one step per held key on each axis.
    pub fn direction(&self) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= 1.0;
        }
        if self.down {
            d.y += 1.0;
        }
        if self.left {
            d.x -= 1.0;
        }
        if self.right {
            d.x += 1.0;
        }
        d
    }
}
