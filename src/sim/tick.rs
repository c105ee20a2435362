//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run deterministically.

use rand::Rng;

use super::level::{self, spawn_interval};
use super::state::{Banner, GameEvent, GamePhase, GameState, Outcome};
use crate::ms_to_ticks;

/// Input for a single tick (held keys)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left arrow or A held
    pub left: bool,
    /// Right arrow or D held
    pub right: bool,
}

impl TickInput {
    /// Horizontal direction; opposite keys cancel out
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Ended(_) => {}
        GamePhase::Banner { banner, ticks_left } => {
            if ticks_left > 1 {
                state.phase = GamePhase::Banner {
                    banner,
                    ticks_left: ticks_left - 1,
                };
            } else {
                finish_banner(state, banner);
            }
        }
        GamePhase::Dying { ticks } => {
            state.time_ticks += 1;
            let now = state.time_ticks;
            state.popups.retain(|p| !p.expired(now));
            let ticks = ticks + 1;
            if ticks >= ms_to_ticks(crate::consts::DEATH_MS) {
                log::info!("Run over: died on level {}", state.level_index + 1);
                state.phase = GamePhase::Ended(Outcome::Died);
            } else {
                state.phase = GamePhase::Dying { ticks };
            }
        }
        GamePhase::Playing => tick_playing(state, input, dt),
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.level_ticks += 1;
    state.control_hint_ticks = state.control_hint_ticks.saturating_sub(1);
    state.player.hurt_ticks = state.player.hurt_ticks.saturating_sub(1);

    state.player.move_horizontal(input.direction(), dt);

    // Spawn roll gets likelier the longer the level runs
    let interval = spawn_interval(state.level_elapsed_secs());
    if state.rng.random_range(1..=interval) == 1 {
        state.spawn_drop();
    }

    let player_rect = state.player.rect;
    let mut caught = Vec::new();
    state.drops.retain_mut(|drop| {
        drop.update(dt);
        if drop.rect.intersects(&player_rect) {
            caught.push(drop.kind);
            false
        } else {
            !drop.is_below_screen()
        }
    });
    for kind in caught {
        state.apply_catch(kind);
    }

    let now = state.time_ticks;
    state.popups.retain(|p| !p.expired(now));

    // Level timer is settled before death; a run that moves on can still die
    match check_level_timer(state) {
        LevelTimer::Running | LevelTimer::Advanced => {}
        LevelTimer::Finished => return,
    }

    if state.hearts == 0 {
        log::info!("Out of hearts on level {}", state.level_index + 1);
        state.player.dead = true;
        state.events.push(GameEvent::Died);
        state.phase = GamePhase::Dying { ticks: 0 };
        return;
    }

    state.normalize_order();
}

/// Result of checking the level timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelTimer {
    /// Time left on the clock
    Running,
    /// Level cleared and the next one is queued
    Advanced,
    /// Run decided: final level cleared or time up
    Finished,
}

/// Evaluate the level when its timer runs out
fn check_level_timer(state: &mut GameState) -> LevelTimer {
    let Some(current) = state.current_level() else {
        return LevelTimer::Running;
    };
    if state.level_ticks < current.duration_ticks() {
        return LevelTimer::Running;
    }

    let level_index = state.level_index;
    if state.coins >= current.coins_required {
        state.coins -= current.coins_required;
        state.events.push(GameEvent::LevelCleared {
            level: level_index,
            reward: current.reward,
        });
        log::info!(
            "Level {} cleared: traded {} coins for a {} ({} left over)",
            level_index + 1,
            current.coins_required,
            current.reward.name(),
            state.coins
        );

        let final_level = level::is_last_level(level_index);
        if !final_level {
            advance_level(state);
        }
        set_banner(
            state,
            Banner::LevelCleared {
                reward: current.reward,
                final_level,
            },
        );
        if final_level {
            LevelTimer::Finished
        } else {
            LevelTimer::Advanced
        }
    } else {
        log::info!(
            "Level {} failed: {} of {} coins",
            level_index + 1,
            state.coins,
            current.coins_required
        );
        state.events.push(GameEvent::TimeUp { level: level_index });
        set_banner(state, Banner::TimeUp);
        LevelTimer::Finished
    }
}

/// Move to the next level with a fresh timer and an empty sky
fn advance_level(state: &mut GameState) {
    state.level_index += 1;
    state.level_ticks = 0;
    state.drops.clear();
    state.popups.clear();
}

fn set_banner(state: &mut GameState, banner: Banner) {
    state.phase = GamePhase::Banner {
        banner,
        ticks_left: banner.duration_ticks(),
    };
}

fn finish_banner(state: &mut GameState, banner: Banner) {
    match banner {
        Banner::LevelCleared { final_level: true, .. } => {
            log::info!("All levels cleared");
            state.events.push(GameEvent::AllLevelsCleared);
            state.phase = GamePhase::Ended(Outcome::Victory);
        }
        Banner::LevelCleared { .. } => {
            state.events.push(GameEvent::LevelStarted {
                level: state.level_index,
            });
            set_banner(
                state,
                Banner::LevelStart {
                    level: state.level_index,
                },
            );
        }
        Banner::LevelStart { .. } => state.phase = GamePhase::Playing,
        Banner::TimeUp => state.phase = GamePhase::Ended(Outcome::TimeUp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::level::LEVELS;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Drop, DropKind};
    use proptest::prelude::*;

    /// Drop placed directly on top of the player
    fn drop_on_player(state: &mut GameState, kind: DropKind) {
        let id = state.next_entity_id();
        let target = state.player.rect.center();
        state.drops.push(Drop {
            id,
            kind,
            rect: Rect::new(target.x - DROP_SIZE / 2.0, target.y, DROP_SIZE, DROP_SIZE),
            speed: 0.0,
        });
    }

    /// Run until the current banner is replaced
    fn run_banner(state: &mut GameState) {
        let GamePhase::Banner { banner: current, .. } = state.phase else {
            return;
        };
        let input = TickInput::default();
        while matches!(state.phase, GamePhase::Banner { banner, .. } if banner == current) {
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_direction() {
        let both = TickInput {
            left: true,
            right: true,
        };
        assert_eq!(both.direction(), 0.0);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        assert_eq!(left.direction(), -1.0);
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut state = GameState::new(1);
        let start = state.player.rect.left();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!((state.player.rect.left() - (start + PLAYER_SPEED * SIM_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_catching_coin() {
        let mut state = GameState::new(1);
        drop_on_player(&mut state, DropKind::Coin);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.coins, 1);
        assert!(state.drops.iter().all(|d| d.kind != DropKind::Coin || d.speed > 0.0));
        assert!(state.drain_events().contains(&GameEvent::CoinCollected));
        assert_eq!(state.popups.len(), 1);
    }

    #[test]
    fn test_two_bombs_in_one_tick_at_one_heart() {
        let mut state = GameState::new(1);
        state.hearts = 1;
        drop_on_player(&mut state, DropKind::Bomb);
        drop_on_player(&mut state, DropKind::Bomb);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.hearts, 0);
        assert!(state.player.dead);
        assert_eq!(state.phase, GamePhase::Dying { ticks: 0 });
        assert!(state.drain_events().contains(&GameEvent::Died));
    }

    #[test]
    fn test_drops_freeze_while_dying_then_run_ends() {
        let mut state = GameState::new(1);
        state.hearts = 1;
        drop_on_player(&mut state, DropKind::Bomb);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let snapshot: Vec<f32> = state.drops.iter().map(|d| d.rect.top()).collect();

        for _ in 0..ms_to_ticks(DEATH_MS) {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let after: Vec<f32> = state.drops.iter().map(|d| d.rect.top()).collect();
        assert_eq!(snapshot, after);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Died));
    }

    #[test]
    fn test_drops_removed_below_screen() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state.drops.push(Drop {
            id,
            kind: DropKind::Coin,
            rect: Rect::new(0.0, HEIGHT - 1.0, DROP_SIZE, DROP_SIZE),
            speed: 600.0,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.drops.iter().all(|d| d.id != id));
        assert_eq!(state.coins, 0);
    }

    #[test]
    fn test_popups_expire() {
        let mut state = GameState::new(1);
        drop_on_player(&mut state, DropKind::Coin);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.popups.len(), 1);
        for _ in 0..ms_to_ticks(POPUP_MS) {
            state.drops.clear();
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.popups.is_empty());
    }

    #[test]
    fn test_level_cleared_carries_surplus_and_advances() {
        let mut state = GameState::new(1);
        state.coins = LEVELS[0].coins_required + 3;
        state.level_ticks = LEVELS[0].duration_ticks() - 1;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.coins, 3);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.level_ticks, 0);
        assert!(state.drops.is_empty());
        assert!(matches!(
            state.phase,
            GamePhase::Banner {
                banner: Banner::LevelCleared {
                    final_level: false,
                    ..
                },
                ..
            }
        ));

        run_banner(&mut state);
        assert!(matches!(
            state.phase,
            GamePhase::Banner {
                banner: Banner::LevelStart { level: 1 },
                ..
            }
        ));
        run_banner(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_left_secs(), Some(LEVELS[1].time_seconds));
        assert!(state.drain_events().contains(&GameEvent::LevelStarted { level: 1 }));
    }

    #[test]
    fn test_time_up_ends_run() {
        let mut state = GameState::new(1);
        state.coins = LEVELS[0].coins_required - 1;
        state.level_ticks = LEVELS[0].duration_ticks() - 1;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.coins, LEVELS[0].coins_required - 1);
        assert!(state.drain_events().contains(&GameEvent::TimeUp { level: 0 }));
        run_banner(&mut state);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::TimeUp));
        assert_eq!(state.time_left_secs(), None);
    }

    #[test]
    fn test_last_level_is_victory() {
        let mut state = GameState::new(1);
        let last = LEVELS.len() as u32 - 1;
        state.level_index = last;
        state.coins = LEVELS[last as usize].coins_required;
        state.level_ticks = LEVELS[last as usize].duration_ticks() - 1;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.level_index, last);
        run_banner(&mut state);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Victory));
        assert!(state.drain_events().contains(&GameEvent::AllLevelsCleared));
    }

    #[test]
    fn test_timer_settled_before_death() {
        let mut state = GameState::new(1);
        state.hearts = 1;
        state.level_ticks = LEVELS[0].duration_ticks() - 1;
        drop_on_player(&mut state, DropKind::Bomb);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.hearts, 0);
        assert!(matches!(
            state.phase,
            GamePhase::Banner {
                banner: Banner::TimeUp,
                ..
            }
        ));
    }

    #[test]
    fn test_clearing_level_on_last_heart_still_dies() {
        let mut state = GameState::new(1);
        state.hearts = 1;
        state.coins = LEVELS[0].coins_required;
        state.level_ticks = LEVELS[0].duration_ticks() - 1;
        drop_on_player(&mut state, DropKind::Bomb);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.hearts, 0);
        assert_eq!(state.coins, 0);
        assert_eq!(state.level_index, 1);
        assert!(state.player.dead);
        assert_eq!(state.phase, GamePhase::Dying { ticks: 0 });
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelCleared {
            level: 0,
            reward: LEVELS[0].reward,
        }));
        assert_eq!(events.last(), Some(&GameEvent::Died));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelStarted { .. })));
    }

    #[test]
    fn test_popups_cleared_while_dying() {
        let mut state = GameState::new(1);
        state.hearts = 1;
        drop_on_player(&mut state, DropKind::Bomb);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.popups.len(), 1);
        assert!(matches!(state.phase, GamePhase::Dying { .. }));

        for _ in 0..ms_to_ticks(POPUP_MS) {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(matches!(state.phase, GamePhase::Dying { .. }));
        assert!(state.popups.is_empty());
    }

    #[test]
    fn test_ended_run_is_frozen() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Ended(Outcome::TimeUp);
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_control_hint_expires() {
        let mut state = GameState::new(1);
        assert!(state.control_hint_ticks > 0);
        for _ in 0..ms_to_ticks(CONTROL_HINT_MS) {
            state.drops.clear();
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.control_hint_ticks, 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                ..Default::default()
            },
        ];

        for i in 0..900 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.drops.len(), state2.drops.len());
        assert_eq!(state1.coins, state2.coins);
        assert_eq!(state1.hearts, state2.hearts);
        assert!((state1.player.rect.left() - state2.player.rect.left()).abs() < 0.0001);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(seed in any::<u64>(), moves in prop::collection::vec(0u8..3, 1..600)) {
            let mut state = GameState::new(seed);
            for m in moves {
                let input = TickInput { left: m == 1, right: m == 2 };
                let coins_before = state.coins;
                tick(&mut state, &input, SIM_DT);

                let events = state.drain_events();
                let caught = events.iter().filter(|e| **e == GameEvent::CoinCollected).count() as u32;
                if !events.iter().any(|e| matches!(e, GameEvent::LevelCleared { .. })) {
                    prop_assert_eq!(state.coins, coins_before + caught);
                }
                prop_assert!(state.hearts <= MAX_HEARTS);
                prop_assert!(state.player.rect.left() >= 0.0);
                prop_assert!(state.player.rect.right() <= WIDTH);
                for drop in &state.drops {
                    prop_assert!(drop.rect.left() >= 0.0 && drop.rect.right() <= WIDTH);
                    prop_assert!(drop.rect.top() <= HEIGHT);
                }
                let ids: Vec<u32> = state.drops.iter().map(|d| d.id).collect();
                let mut sorted = ids.clone();
                sorted.sort();
                prop_assert_eq!(ids, sorted);
            }
        }
    }
}
