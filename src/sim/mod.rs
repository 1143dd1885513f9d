//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Delayed work goes through the timer queue, never wall-clock callbacks
//! - No rendering or audio dependencies (those consume events and snapshots)

pub mod ai;
pub mod bomb;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod events;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use combat::{DamageOutcome, freeze, heal, take_damage};
pub use events::{GameEvent, SoundEffect};
pub use snapshot::{Snapshot, Summary};
pub use state::{Bullet, GamePhase, GameState, HealthPickup, Particle, Role, Tank};
pub use tick::{TickInput, autopilot, tick};
pub use timers::{TimerKind, TimerQueue};
