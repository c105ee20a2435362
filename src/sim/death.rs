//! Death animation timeline
//!
//! A golden halo rises from the player's head, flashes once it tops out,
//! then fades away. All values are pure functions of the elapsed time so the
//! renderer can sample any frame.

use crate::consts::*;

/// An elliptical ring drawn above the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloRing {
    /// Half-width of the ellipse in pixels
    pub size: f32,
    /// Stroke width in pixels
    pub stroke: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// RGB color
    pub color: [u8; 3],
}

/// Everything needed to draw one frame of the halo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloFrame {
    /// Pixels above the player's head
    pub rise: f32,
    pub ring: HaloRing,
    /// Bright flash drawn over the ring right after it tops out
    pub flash: Option<HaloRing>,
}

const HALO_COLOR: [u8; 3] = [255, 230, 120];
const FLASH_COLOR: [u8; 3] = [255, 250, 200];
/// Gap between the top of the head and the halo
const HALO_HEAD_GAP: f32 = 6.0;

/// Fraction of the whole death animation elapsed, in [0, 1]
pub fn death_progress(elapsed_ms: u32) -> f32 {
    (elapsed_ms as f32 / DEATH_MS as f32).min(1.0)
}

/// Fraction of the halo's climb, in [0, 1]
pub fn halo_rise_fraction(elapsed_ms: u32) -> f32 {
    (elapsed_ms as f32 / HALO_RISE_MS as f32).min(1.0)
}

/// Whether the death animation has run its course
pub fn finished(elapsed_ms: u32) -> bool {
    elapsed_ms >= DEATH_MS
}

/// Sample the halo at `elapsed_ms` into the animation
///
/// Returns `None` once the post-flash fade has completed.
pub fn halo_frame(elapsed_ms: u32, player_width: f32) -> Option<HaloFrame> {
    let rise_frac = halo_rise_fraction(elapsed_ms);
    let base_alpha = (1.0 - death_progress(elapsed_ms)).max(0.0);
    // 40% of the player's width, shrinking to 25% as it rises
    let size = (player_width * (0.4 - 0.15 * rise_frac)).max(8.0);
    let stroke = (size / 10.0).max(1.0);
    let rise = rise_frac * HALO_MAX_RISE + HALO_HEAD_GAP;

    let mut ring = HaloRing {
        size,
        stroke,
        alpha: base_alpha,
        color: HALO_COLOR,
    };
    let mut flash = None;

    if elapsed_ms >= HALO_RISE_MS {
        let age = elapsed_ms - HALO_RISE_MS;
        if age < HALO_FLASH_MS {
            let flash_frac = age as f32 / HALO_FLASH_MS as f32;
            let flash_size = size * 1.2 + 2.0;
            flash = Some(HaloRing {
                size: flash_size,
                stroke: (flash_size / 6.0).max(1.0),
                alpha: (200.0 / 255.0) * (1.0 - flash_frac),
                color: FLASH_COLOR,
            });
        } else if age < HALO_FLASH_MS + HALO_FADE_MS {
            let fade_frac = ((age - HALO_FLASH_MS) as f32 / HALO_FADE_MS as f32).min(1.0);
            ring.alpha = base_alpha * (1.0 - fade_frac);
        } else {
            return None;
        }
    }

    Some(HaloFrame { rise, ring, flash })
}
