//! Scene building: sim state to triangle lists
//!
//! Sprites are drawn procedurally on a 128-unit grid and scaled to their
//! on-screen size.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, grayscale, rgb};
use crate::consts::*;
use crate::sim::death::{self, HaloRing};
use crate::sim::intro::IntroState;
use crate::sim::rect::Rect;
use crate::sim::state::{DropKind, GamePhase, GameState, Outcome, Player};
use crate::ticks_to_ms;

/// Side of the grid sprites are designed on
const SPRITE_GRID: f32 = 128.0;
const HURT_BLINK_TICKS: u32 = 8;

/// Maps sprite grid units onto a square on screen
struct SpriteFrame {
    origin: Vec2,
    scale: f32,
}

impl SpriteFrame {
    fn new(min: Vec2, size: f32) -> Self {
        Self {
            origin: min,
            scale: size / SPRITE_GRID,
        }
    }

    fn pt(&self, x: f32, y: f32) -> Vec2 {
        self.origin + Vec2::new(x, y) * self.scale
    }

    fn len(&self, units: f32) -> f32 {
        units * self.scale
    }
}

/// Sky gradient with a strip of ground under the player
pub fn background(out: &mut Vec<Vertex>) {
    out.extend(shapes::gradient_rect(
        Vec2::ZERO,
        Vec2::new(WIDTH, HEIGHT),
        rgb(colors::SKY_TOP, 1.0),
        rgb(colors::SKY_BOTTOM, 1.0),
    ));
    out.extend(shapes::rect(
        Vec2::new(0.0, HEIGHT - PLAYER_BOTTOM_MARGIN),
        Vec2::new(WIDTH, PLAYER_BOTTOM_MARGIN),
        rgb(colors::GROUND, 1.0),
    ));
}

/// Draw a drop sprite filling the square at `min`
pub fn drop_sprite(out: &mut Vec<Vertex>, kind: DropKind, min: Vec2, size: f32) {
    let f = SpriteFrame::new(min, size);
    match kind {
        DropKind::Bomb => {
            out.extend(shapes::circle(
                f.pt(64.0, 72.0),
                f.len(56.0),
                rgb(colors::BOMB_BODY, 1.0),
                24,
            ));
            out.extend(shapes::ring(
                f.pt(54.0, 58.0),
                f.len(46.0),
                f.len(50.0),
                rgb(colors::BOMB_SHINE, 1.0),
                24,
            ));
            out.extend(shapes::rect(
                f.pt(58.0, 8.0),
                Vec2::new(f.len(12.0), f.len(28.0)),
                rgb(colors::BOMB_FUSE, 1.0),
            ));
            out.extend(shapes::circle(
                f.pt(64.0, 8.0),
                f.len(6.0),
                rgb(colors::BOMB_SPARK, 1.0),
                10,
            ));
        }
        DropKind::Coin => {
            // Face with an off-center hole leaves a "C"
            let center = f.pt(64.0, 64.0);
            out.extend(shapes::disc_with_hole(
                center,
                f.len(58.0),
                f.pt(70.0, 64.0),
                f.len(38.0),
                rgb(colors::COIN_FACE, 1.0),
                24,
            ));
            out.extend(shapes::ring(
                center,
                f.len(54.0),
                f.len(58.0),
                rgb(colors::COIN_RIM, 1.0),
                24,
            ));
        }
        DropKind::HealthPack => {
            out.extend(shapes::rounded_rect(
                f.pt(8.0, 18.0),
                Vec2::new(f.len(112.0), f.len(92.0)),
                f.len(12.0),
                rgb(colors::HEALTH_BOX, 1.0),
            ));
            let cross = rgb(colors::HEALTH_CROSS, 1.0);
            out.extend(shapes::rect(
                f.pt(46.0, 54.0),
                Vec2::new(f.len(36.0), f.len(20.0)),
                cross,
            ));
            out.extend(shapes::rect(
                f.pt(54.0, 46.0),
                Vec2::new(f.len(20.0), f.len(36.0)),
                cross,
            ));
        }
    }
}

/// The player's silhouette; flashes red while hurt
pub fn player(out: &mut Vec<Vertex>, player: &Player) {
    let r = player.rect;
    let alpha = if player.dead { 0.6 } else { 1.0 };
    out.extend(shapes::rect(r.pos, r.size, rgb(colors::PLAYER_BODY, alpha)));

    let head = Vec2::new(r.center().x, r.top() + r.width() * 0.3);
    out.extend(shapes::circle(
        head,
        r.width() * 0.2,
        rgb(colors::PLAYER_SKIN, alpha),
        16,
    ));

    if player.is_hurt() && !player.dead && (player.hurt_ticks / HURT_BLINK_TICKS) % 2 == 1 {
        out.extend(shapes::rect(r.pos, r.size, rgb(colors::HURT_TINT, 0.45)));
    }
}

fn halo_ring(out: &mut Vec<Vertex>, center: Vec2, ring: &HaloRing) {
    out.extend(shapes::ellipse_ring(
        center,
        Vec2::new(ring.size, ring.size / 4.0),
        ring.stroke,
        rgb(ring.color, ring.alpha),
        32,
    ));
}

/// Halo above the dead player's head
pub fn halo(out: &mut Vec<Vertex>, player_rect: &Rect, elapsed_ms: u32, show_flash: bool) {
    let Some(frame) = death::halo_frame(elapsed_ms, player_rect.width()) else {
        return;
    };
    let center = Vec2::new(player_rect.center().x, player_rect.top() - frame.rise);
    halo_ring(out, center, &frame.ring);
    if let (true, Some(flash)) = (show_flash, frame.flash) {
        halo_ring(out, center, &flash);
    }
}

/// Supply plane with its nose pointing right
pub fn plane(out: &mut Vec<Vertex>, min: Vec2, size: Vec2) {
    let at = |x: f32, y: f32| min + Vec2::new(x, y) * size;
    let body = rgb(colors::PLANE_BODY, 1.0);
    let wing = rgb(colors::PLANE_WING, 1.0);

    out.extend(shapes::triangle(at(0.05, 0.15), at(0.25, 0.5), at(0.05, 0.5), wing));
    out.extend(shapes::ellipse(
        at(0.5, 0.5),
        Vec2::new(size.x * 0.45, size.y * 0.18),
        body,
        24,
    ));
    out.extend(shapes::triangle(at(0.35, 0.45), at(0.6, 0.45), at(0.4, 0.95), wing));
    for i in 0..3 {
        out.extend(shapes::circle(
            at(0.6 + i as f32 * 0.08, 0.45),
            size.y * 0.05,
            rgb(colors::PLANE_WINDOW, 1.0),
            8,
        ));
    }
}

/// Full frame for the intro cutscene
pub fn intro_scene(intro: &IntroState) -> Vec<Vertex> {
    let mut out = Vec::new();
    background(&mut out);
    plane(&mut out, intro.plane_pos, IntroState::plane_size());
    for item in &intro.items {
        let min = Vec2::new(item.pos.x - DROP_SIZE / 2.0, item.pos.y);
        drop_sprite(&mut out, item.kind, min, DROP_SIZE);
    }
    out
}

/// Full frame for a run; drained of color once the player has died
pub fn game_scene(state: &GameState, show_flash: bool) -> Vec<Vertex> {
    let mut out = Vec::new();
    background(&mut out);
    for drop in &state.drops {
        drop_sprite(&mut out, drop.kind, drop.rect.pos, drop.rect.width());
    }
    player(&mut out, &state.player);

    match state.phase {
        GamePhase::Dying { ticks } => {
            halo(&mut out, &state.player.rect, ticks_to_ms(ticks), show_flash);
        }
        GamePhase::Ended(Outcome::Died) => {
            for v in &mut out {
                v.color = grayscale(v.color);
            }
        }
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Drop;

    fn count_for(kind: DropKind) -> usize {
        let mut out = Vec::new();
        drop_sprite(&mut out, kind, Vec2::ZERO, DROP_SIZE);
        out.len()
    }

    #[test]
    fn test_sprites_stay_in_their_box() {
        for kind in [DropKind::Bomb, DropKind::Coin, DropKind::HealthPack] {
            let mut out = Vec::new();
            drop_sprite(&mut out, kind, Vec2::new(100.0, 200.0), DROP_SIZE);
            assert!(!out.is_empty());
            for v in &out {
                assert!(v.position[0] >= 100.0 - 1e-3 && v.position[0] <= 100.0 + DROP_SIZE + 1e-3);
                assert!(v.position[1] >= 200.0 - 1e-3 && v.position[1] <= 200.0 + DROP_SIZE + 1e-3);
            }
        }
    }

    fn covers(tri: &[Vertex], p: Vec2) -> bool {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec2::from(v.position));
        let d1 = (b - a).perp_dot(p - a);
        let d2 = (c - b).perp_dot(p - b);
        let d3 = (a - c).perp_dot(p - c);
        (d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0) || (d1 <= 0.0 && d2 <= 0.0 && d3 <= 0.0)
    }

    #[test]
    fn test_coin_has_see_through_notch() {
        let size = 128.0;
        let mut out = Vec::new();
        drop_sprite(&mut out, DropKind::Coin, Vec2::ZERO, size);
        // Inside the notch nothing is drawn; the face left of it is
        assert!(!out.chunks(3).any(|tri| covers(tri, Vec2::new(70.0, 64.0))));
        assert!(out.chunks(3).any(|tri| covers(tri, Vec2::new(20.0, 64.0))));
    }

    #[test]
    fn test_game_scene_draws_every_drop() {
        let mut state = GameState::new(1);
        let base = game_scene(&state, true).len();
        let id = state.next_entity_id();
        state.drops.push(Drop {
            id,
            kind: DropKind::Coin,
            rect: Rect::new(0.0, 0.0, DROP_SIZE, DROP_SIZE),
            speed: 0.0,
        });
        assert_eq!(game_scene(&state, true).len(), base + count_for(DropKind::Coin));
    }

    #[test]
    fn test_hurt_player_is_tinted() {
        let mut p = Player::default();
        let mut calm = Vec::new();
        player(&mut calm, &p);
        p.set_hurt();
        let mut hurt = Vec::new();
        player(&mut hurt, &p);
        assert_eq!(hurt.len(), calm.len() + 6);
    }

    #[test]
    fn test_halo_only_while_dying() {
        let mut state = GameState::new(1);
        let alive = game_scene(&state, true).len();
        state.player.dead = true;
        state.phase = GamePhase::Dying { ticks: 0 };
        assert!(game_scene(&state, true).len() > alive);
    }

    #[test]
    fn test_flash_respects_setting() {
        let rect = Player::default().rect;
        let mut with_flash = Vec::new();
        halo(&mut with_flash, &rect, HALO_RISE_MS, true);
        let mut without = Vec::new();
        halo(&mut without, &rect, HALO_RISE_MS, false);
        assert!(with_flash.len() > without.len());
    }

    #[test]
    fn test_death_drains_color() {
        let mut state = GameState::new(1);
        state.player.dead = true;
        state.phase = GamePhase::Ended(Outcome::Died);
        for v in game_scene(&state, true) {
            assert_eq!(v.color[0], v.color[1]);
            assert_eq!(v.color[1], v.color[2]);
        }

        state.phase = GamePhase::Ended(Outcome::TimeUp);
        let colored = game_scene(&state, true);
        assert!(colored.iter().any(|v| v.color[0] != v.color[2]));
    }

    #[test]
    fn test_intro_scene_includes_items() {
        let mut intro = IntroState::new();
        let before = intro_scene(&intro).len();
        while !intro.dropped {
            intro.tick();
        }
        assert!(intro_scene(&intro).len() > before);
    }
}
