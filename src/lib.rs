//! Airdrop Survival - dodge the bombs, catch the coins
//!
//! Core modules:
//! - `sim`: Deterministic simulation (intro cutscene, drops, levels, death)
//! - `renderer`: WebGPU rendering pipeline
//! - `ui`: Text overlays, buttons and HUD derived from sim state
//! - `synth`: Procedural soundtrack synthesis and WAV codec
//! - `audio`: Web Audio sound effects and music playback
//! - `settings`: Player preferences

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod synth;
pub mod ui;

pub use settings::{Settings, SoundtrackVariant};

/// Game configuration constants
pub mod consts {
    /// Logical screen size in pixels
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Simulation rate; one tick per display frame
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_SPEED: f32 = 300.0; // pixels per second
    /// Gap between the player's feet and the bottom of the screen
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    pub const MAX_HEARTS: u8 = 3;
    pub const HURT_MS: u32 = 2000;

    /// Drops
    pub const DROP_SIZE: f32 = 40.0;
    /// Per-frame fall speed range at level 1, minute 0
    pub const DROP_MIN_FRAME_SPEED: u32 = 3;
    pub const DROP_MAX_FRAME_SPEED: u32 = 6;
    /// Spawn roll is 1-in-N per tick; N shrinks as the level goes on
    pub const DROP_SPAWN_INTERVAL_BASE: u32 = 60;
    pub const DROP_SPAWN_INTERVAL_MIN: u32 = 15;
    pub const DROP_SPAWN_DECREASE_PER_MIN: f32 = 20.0;
    pub const DROP_SPEED_INCREASE_PER_MIN: f32 = 0.10;
    pub const LEVEL_SPEED_INCREASE_PER_LEVEL: f32 = 0.15;

    /// Feedback popups
    pub const POPUP_MS: u32 = 800;
    pub const POPUP_RISE: f32 = 30.0;

    /// Control hint shown when a run starts
    pub const CONTROL_HINT_MS: u32 = 5000;

    /// Banners between levels
    pub const RESULT_BANNER_MS: u32 = 2500;
    pub const LEVEL_START_BANNER_MS: u32 = 2000;

    /// Death animation
    pub const DEATH_MS: u32 = 5500;
    pub const HALO_RISE_MS: u32 = 3000;
    pub const HALO_MAX_RISE: f32 = 50.0;
    pub const HALO_FLASH_MS: u32 = 300;
    pub const HALO_FADE_MS: u32 = 300;

    /// Soundtrack
    pub const MUSIC_FADE_OUT_MS: u32 = 800;
}

/// Convert a duration in milliseconds to whole simulation ticks
#[inline]
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms * consts::TICKS_PER_SECOND / 1000
}

/// Convert a tick count to elapsed milliseconds
#[inline]
pub const fn ticks_to_ms(ticks: u32) -> u32 {
    ticks * 1000 / consts::TICKS_PER_SECOND
}
