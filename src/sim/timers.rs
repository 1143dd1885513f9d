//! Scheduled work keyed by simulation time
//!
//! Spawn intervals, bomb recharge and delayed blast effects are queue entries
//! drained by the tick loop, so cancelling them is just removing entries.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What happens when a timer comes due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerKind {
    EnemySpawn,
    PickupSpawn,
    BombRecharge,
    /// Delayed half-strength cluster sub-blast
    ClusterBlast {
        pos: Vec2,
        radius: f32,
        damage: f32,
        color: u32,
    },
    /// One ring of a staggered nuke shockwave (cosmetic)
    ShockwaveRing { pos: Vec2, radius: f32, ring: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub due_ms: u64,
    /// Re-arm interval for recurring timers
    pub repeat_ms: Option<u64>,
    pub kind: TimerKind,
    seq: u64,
}

/// Pending timers in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    pending: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    /// Fire once at `due_ms`
    pub fn schedule(&mut self, due_ms: u64, kind: TimerKind) {
        self.push(due_ms, None, kind);
    }

    /// Fire at `first_due_ms`, then every `interval_ms` until cancelled
    pub fn schedule_repeating(&mut self, first_due_ms: u64, interval_ms: u64, kind: TimerKind) {
        self.push(first_due_ms, Some(interval_ms.max(1)), kind);
    }

    fn push(&mut self, due_ms: u64, repeat_ms: Option<u64>, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer {
            due_ms,
            repeat_ms,
            kind,
            seq,
        });
    }

    /// Remove every timer matching the predicate
    pub fn cancel(&mut self, mut matches: impl FnMut(&TimerKind) -> bool) {
        self.pending.retain(|t| !matches(&t.kind));
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, mut matches: impl FnMut(&TimerKind) -> bool) -> bool {
        self.pending.iter().any(|t| matches(&t.kind))
    }

    /// Take every timer due at or before `now_ms`, ordered by due time then
    /// scheduling order. Recurring timers are re-armed one interval later.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<TimerKind> {
        let mut due: Vec<Timer> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now_ms {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due_ms, t.seq));

        for timer in &due {
            if let Some(interval) = timer.repeat_ms {
                self.push(timer.due_ms + interval, Some(interval), timer.kind.clone());
            }
        }

        due.into_iter().map(|t| t.kind).collect()
    }
}
