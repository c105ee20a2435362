//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod death;
pub mod intro;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use death::{HaloFrame, HaloRing, halo_frame};
pub use intro::{IntroItem, IntroState};
pub use level::{LEVELS, Level, RewardKind};
pub use rect::Rect;
pub use state::{
    Banner, Drop, DropKind, GameEvent, GamePhase, GameState, Outcome, Player, Popup, PopupStyle,
};
pub use tick::{TickInput, tick};
