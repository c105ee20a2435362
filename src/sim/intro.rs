//! Intro cutscene
//!
//! A supply plane crosses the sky and drops one of each item as it passes the
//! middle of the screen. Shortly after, the goal text and the Enter Game
//! button appear.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::DropKind;
use crate::consts::*;
use crate::ms_to_ticks;

/// Plane sprite size before scaling
pub const PLANE_BASE_SIZE: Vec2 = Vec2::new(140.0, 80.0);
/// The plane flies small, high in the sky
pub const PLANE_SCALE: f32 = 0.6;
pub const PLANE_Y: f32 = 40.0;
/// Horizontal speed in pixels per frame
pub const PLANE_FRAME_SPEED: f32 = 4.0;
/// Downward acceleration of dropped items in pixels per frame²
pub const ITEM_FRAME_GRAVITY: f32 = 0.25;
/// Delay between the drop and the prompt
pub const PROMPT_DELAY_MS: u32 = 300;
/// The plane counts as gone this far past the right edge
const EXIT_MARGIN: f32 = 20.0;

/// An item falling out of the plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntroItem {
    pub kind: DropKind,
    pub pos: Vec2,
    /// Vertical speed in pixels per frame
    pub vy: f32,
}

/// Intro cutscene state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroState {
    /// Top-left corner of the plane
    pub plane_pos: Vec2,
    pub items: Vec<IntroItem>,
    /// Whether the drop point has been reached
    pub dropped: bool,
    /// Tick of the drop (or of the plane leaving without one)
    pub dropped_at: Option<u64>,
    pub ticks: u64,
}

impl Default for IntroState {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroState {
    pub fn new() -> Self {
        Self {
            plane_pos: Vec2::new(-Self::plane_size().x, PLANE_Y),
            items: Vec::new(),
            dropped: false,
            dropped_at: None,
            ticks: 0,
        }
    }

    /// On-screen plane size
    pub fn plane_size() -> Vec2 {
        (PLANE_BASE_SIZE * PLANE_SCALE).floor()
    }

    pub fn plane_center(&self) -> Vec2 {
        self.plane_pos + Self::plane_size() / 2.0
    }

    /// Whether the goal text and Enter Game button are showing
    pub fn prompt_visible(&self) -> bool {
        match self.dropped_at {
            Some(at) => self.ticks.saturating_sub(at) > ms_to_ticks(PROMPT_DELAY_MS) as u64,
            None => false,
        }
    }

    /// Advance the cutscene by one frame
    pub fn tick(&mut self) {
        self.ticks += 1;
        self.plane_pos.x += PLANE_FRAME_SPEED;

        if !self.dropped && self.plane_pos.x > WIDTH / 2.0 {
            self.release_items();
        }

        for item in &mut self.items {
            item.vy += ITEM_FRAME_GRAVITY;
            item.pos.y += item.vy;
        }
        self.items.retain(|item| item.pos.y <= HEIGHT);

        // Never leave the player without a way forward
        if self.plane_pos.x > WIDTH + EXIT_MARGIN && self.dropped_at.is_none() {
            self.dropped = true;
            self.dropped_at = Some(self.ticks);
        }
    }

    /// Bomb on the left, coin in the middle, health pack on the right
    fn release_items(&mut self) {
        let center = Vec2::new(
            self.plane_pos.x + Self::plane_size().x / 2.0,
            self.plane_center().y,
        );
        let spread = [
            (DropKind::Bomb, -60.0, 2.6),
            (DropKind::Coin, 0.0, 2.0),
            (DropKind::HealthPack, 60.0, 2.2),
        ];
        for (kind, dx, vy) in spread {
            self.items.push(IntroItem {
                kind,
                pos: center + Vec2::new(dx, 0.0),
                vy,
            });
        }
        self.dropped = true;
        self.dropped_at = Some(self.ticks);
        log::debug!("Intro drop released at x={}", center.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_drop(intro: &mut IntroState) {
        while !intro.dropped {
            intro.tick();
        }
    }

    #[test]
    fn test_plane_starts_offscreen() {
        let intro = IntroState::new();
        assert!(intro.plane_pos.x + IntroState::plane_size().x <= 0.0);
        assert!(!intro.prompt_visible());
    }

    #[test]
    fn test_drops_three_items_past_center() {
        let mut intro = IntroState::new();
        run_until_drop(&mut intro);
        assert!(intro.plane_pos.x > WIDTH / 2.0);
        assert_eq!(intro.items.len(), 3);
        assert_eq!(intro.items[0].kind, DropKind::Bomb);
        assert_eq!(intro.items[1].kind, DropKind::Coin);
        assert_eq!(intro.items[2].kind, DropKind::HealthPack);
        assert!(intro.items[0].pos.x < intro.items[1].pos.x);
        assert!(intro.items[2].pos.x > intro.items[1].pos.x);
    }

    #[test]
    fn test_items_accelerate() {
        let mut intro = IntroState::new();
        run_until_drop(&mut intro);
        let vy_before = intro.items[1].vy;
        intro.tick();
        assert!((intro.items[1].vy - vy_before - ITEM_FRAME_GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_prompt_after_delay() {
        let mut intro = IntroState::new();
        run_until_drop(&mut intro);
        assert!(!intro.prompt_visible());
        for _ in 0..=ms_to_ticks(PROMPT_DELAY_MS) {
            intro.tick();
        }
        assert!(intro.prompt_visible());
    }

    #[test]
    fn test_items_removed_once_off_screen() {
        let mut intro = IntroState::new();
        run_until_drop(&mut intro);
        for _ in 0..600 {
            intro.tick();
        }
        assert!(intro.items.is_empty());
        assert!(intro.prompt_visible());
    }

    #[test]
    fn test_prompt_forced_when_plane_leaves() {
        let mut intro = IntroState::new();
        // Skip the drop entirely, as if the drop point had been missed
        intro.dropped = true;
        intro.plane_pos.x = WIDTH + 100.0;
        intro.dropped_at = None;
        intro.tick();
        assert!(intro.dropped_at.is_some());
    }
}
