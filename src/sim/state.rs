//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; the intro cutscene has its
//! own state in [`super::intro`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{self, RewardKind, time_speed_multiplier};
use super::rect::Rect;
use crate::consts::*;
use crate::ms_to_ticks;

/// Kind of falling item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    Bomb,
    Coin,
    HealthPack,
}

impl DropKind {
    /// Spawn weights out of 100 (bomb, coin, health pack)
    pub const WEIGHTS: [(DropKind, u32); 3] = [
        (DropKind::Bomb, 35),
        (DropKind::Coin, 50),
        (DropKind::HealthPack, 15),
    ];

    /// Pick a kind according to [`Self::WEIGHTS`]
    pub fn random(rng: &mut Pcg32) -> Self {
        let mut roll = rng.random_range(0..100u32);
        for (kind, weight) in Self::WEIGHTS {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        DropKind::Coin
    }
}

/// A falling item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drop {
    pub id: u32,
    pub kind: DropKind,
    pub rect: Rect,
    /// Fall speed in pixels per second
    pub speed: f32,
}

impl Drop {
    /// Spawn a random drop at the top of the screen
    pub fn spawn(id: u32, rng: &mut Pcg32, elapsed_secs: f32, level_mult: f32) -> Self {
        let max_x = (WIDTH - DROP_SIZE) as u32;
        let x = rng.random_range(0..=max_x) as f32;
        let frame_speed = rng.random_range(DROP_MIN_FRAME_SPEED..=DROP_MAX_FRAME_SPEED) as f32;
        let speed =
            frame_speed * TICKS_PER_SECOND as f32 * level_mult * time_speed_multiplier(elapsed_secs);

        Self {
            id,
            kind: DropKind::random(rng),
            rect: Rect::new(x, 0.0, DROP_SIZE, DROP_SIZE),
            speed,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.rect.pos.y += self.speed * dt;
    }

    /// Fully fallen past the bottom edge
    pub fn is_below_screen(&self) -> bool {
        self.rect.top() > HEIGHT
    }
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Ticks left on the hurt overlay
    pub hurt_ticks: u32,
    pub dead: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (WIDTH - PLAYER_WIDTH) / 2.0,
                HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            hurt_ticks: 0,
            dead: false,
        }
    }
}

impl Player {
    /// Move horizontally; `direction` is -1 (left), 0 or 1 (right)
    pub fn move_horizontal(&mut self, direction: f32, dt: f32) {
        self.rect.pos.x += direction * PLAYER_SPEED * dt;
        self.rect.clamp_x(0.0, WIDTH);
    }

    pub fn set_hurt(&mut self) {
        self.hurt_ticks = ms_to_ticks(HURT_MS);
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt_ticks > 0
    }
}

/// Visual style of a feedback popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupStyle {
    /// Yellow "+1"
    Coin,
    /// Green "+1"
    Heal,
    /// Red "-1"
    Damage,
}

impl PopupStyle {
    pub fn text(&self) -> &'static str {
        match self {
            PopupStyle::Coin | PopupStyle::Heal => "+1",
            PopupStyle::Damage => "-1",
        }
    }

    pub fn color(&self) -> [u8; 3] {
        match self {
            PopupStyle::Coin => [255, 223, 0],
            PopupStyle::Heal => [50, 200, 50],
            PopupStyle::Damage => [200, 30, 30],
        }
    }
}

/// Floating "+1"/"-1" feedback above the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popup {
    /// Start position (text center)
    pub origin: Vec2,
    pub born_tick: u64,
    pub style: PopupStyle,
}

impl Popup {
    /// Animation progress in [0, 1]
    pub fn progress(&self, now_tick: u64) -> f32 {
        let age = now_tick.saturating_sub(self.born_tick) as f32;
        (age / ms_to_ticks(POPUP_MS) as f32).clamp(0.0, 1.0)
    }

    /// Current text center, rising as it fades
    pub fn position(&self, now_tick: u64) -> Vec2 {
        self.origin - Vec2::new(0.0, self.progress(now_tick) * POPUP_RISE)
    }

    /// Opacity in [0, 1]
    pub fn alpha(&self, now_tick: u64) -> f32 {
        1.0 - self.progress(now_tick)
    }

    pub fn expired(&self, now_tick: u64) -> bool {
        now_tick.saturating_sub(self.born_tick) >= ms_to_ticks(POPUP_MS) as u64
    }
}

/// Things the frontend reacts to (sound effects, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected,
    BombHit,
    Healed,
    LevelCleared { level: u32, reward: RewardKind },
    LevelStarted { level: u32 },
    TimeUp { level: u32 },
    AllLevelsCleared,
    Died,
}

/// Timed message shown between levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    /// Coins traded for the level reward
    LevelCleared { reward: RewardKind, final_level: bool },
    /// Goal of the level about to start
    LevelStart { level: u32 },
    /// Timer ran out without enough coins
    TimeUp,
}

impl Banner {
    pub fn duration_ticks(&self) -> u32 {
        match self {
            Banner::LevelStart { .. } => ms_to_ticks(LEVEL_START_BANNER_MS),
            Banner::LevelCleared { .. } | Banner::TimeUp => ms_to_ticks(RESULT_BANNER_MS),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every level cleared
    Victory,
    /// A level timer expired short of coins
    TimeUp,
    /// Hearts ran out
    Died,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen while a banner is up
    Banner { banner: Banner, ticks_left: u32 },
    /// Death animation; `ticks` counts up from 0
    Dying { ticks: u32 },
    /// Run over, waiting for Back to Menu / Quit
    Ended(Outcome),
}

/// Complete state of a run (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Ticks advanced while playing or dying
    pub time_ticks: u64,
    /// Ticks spent in the current level (drives its timer and difficulty)
    pub level_ticks: u32,
    pub level_index: u32,
    pub hearts: u8,
    pub coins: u32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active drops (sorted by id for determinism)
    pub drops: Vec<Drop>,
    pub popups: Vec<Popup>,
    /// Ticks left on the movement hint
    pub control_hint_ticks: u32,
    /// Events since the frontend last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            level_ticks: 0,
            level_index: 0,
            hearts: MAX_HEARTS,
            coins: 0,
            phase: GamePhase::Playing,
            player: Player::default(),
            drops: Vec::new(),
            popups: Vec::new(),
            control_hint_ticks: ms_to_ticks(CONTROL_HINT_MS),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn current_level(&self) -> Option<&'static level::Level> {
        level::level(self.level_index)
    }

    /// Seconds spent in the current level
    pub fn level_elapsed_secs(&self) -> f32 {
        self.level_ticks as f32 * SIM_DT
    }

    /// Whole seconds left on the level timer, `None` once the run is over
    pub fn time_left_secs(&self) -> Option<u32> {
        if matches!(self.phase, GamePhase::Ended(_)) {
            return None;
        }
        let level = self.current_level()?;
        let ticks_left = level.duration_ticks().saturating_sub(self.level_ticks);
        Some(ticks_left / TICKS_PER_SECOND)
    }

    /// Hand accumulated events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a drop using the level's difficulty curve
    pub fn spawn_drop(&mut self) {
        let id = self.next_entity_id();
        let elapsed = self.level_elapsed_secs();
        let mult = level::level_speed_multiplier(self.level_index);
        let drop = Drop::spawn(id, &mut self.rng, elapsed, mult);
        self.drops.push(drop);
    }

    /// Apply the effect of the player catching a drop
    pub fn apply_catch(&mut self, kind: DropKind) {
        let origin = self.player.rect.top_center();
        let style = match kind {
            DropKind::Bomb => {
                self.hearts = self.hearts.saturating_sub(1);
                self.player.set_hurt();
                self.events.push(GameEvent::BombHit);
                Some(PopupStyle::Damage)
            }
            DropKind::Coin => {
                self.coins += 1;
                self.events.push(GameEvent::CoinCollected);
                Some(PopupStyle::Coin)
            }
            DropKind::HealthPack if self.hearts < MAX_HEARTS => {
                self.hearts += 1;
                self.events.push(GameEvent::Healed);
                Some(PopupStyle::Heal)
            }
            // Full health: the pack is used up with no effect
            DropKind::HealthPack => None,
        };

        if let Some(style) = style {
            self.popups.push(Popup {
                origin,
                born_tick: self.time_ticks,
                style,
            });
        }
    }

    /// Ensure drops are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.drops.sort_by_key(|d| d.id);
    }
}
