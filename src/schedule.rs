/// Deferred work keyed by logical time.
///
/// Everything the game would otherwise hand to a wall-clock timer (effect
/// expiry, delayed spawns, repeating pulses, the power-up spawner) is an
/// entry here.  The simulation drains due entries once per tick, in order
/// of due time and then insertion, so two runs with the same inputs see the
/// same sequence.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::effects::{BotEffectKind, EffectKind};
use crate::entities::BotId;

/// Payload of one repeating-effect pulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pulse {
    Heal { amount: i32 },
    /// Drag bots whose distance lies in `(min_radius, max_radius)` toward
    /// the player by `strength` units.
    Pull {
        min_radius: f32,
        max_radius: f32,
        strength: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Deferred {
    PlayerEffectExpired(EffectKind),
    BotEffectExpired { bot: BotId, kind: BotEffectKind },
    /// One tick of a repeating player effect; re-enqueued until the effect
    /// runs out.
    Pulse {
        kind: EffectKind,
        interval_ms: u64,
        pulse: Pulse,
    },
    SpawnBot,
    SpawnBoss,
    HideBossNotice,
    /// Repeating power-up spawner.
    SpawnPowerUp { interval_ms: u64 },
}

#[derive(Clone, Debug)]
struct Entry {
    at: u64,
    seq: u64,
    event: Deferred,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        (self.at, self.seq) == (other.at, other.seq)
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Schedule {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Schedule {
    pub fn push(&mut self, at: u64, event: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { at, seq, event }));
    }

    /// Remove and return the earliest entry due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, Deferred)> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.at <= now => {}
            _ => return None,
        }
        self.heap.pop().map(|Reverse(e)| (e.at, e.event))
    }

    /// Drop everything; used when a session ends.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pending entries in firing order.
    pub fn pending(&self) -> Vec<(u64, &Deferred)> {
        let mut entries: Vec<&Entry> = self.heap.iter().map(|Reverse(e)| e).collect();
        entries.sort();
        entries.into_iter().map(|e| (e.at, &e.event)).collect()
    }

    pub fn count(&self, pred: impl Fn(&Deferred) -> bool) -> usize {
        self.heap.iter().filter(|Reverse(e)| pred(&e.event)).count()
    }
}
