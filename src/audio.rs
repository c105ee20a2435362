//! Audio system using Web Audio API
//!
//! Sound effects are synthesized with oscillators on the fly. The background
//! track is rendered once by [`crate::synth`] and looped from an AudioBuffer.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin caught
    Coin,
    /// Bomb caught
    Bomb,
    /// Health pack restored a heart
    Heal,
    /// Level goal met when the timer ran out
    LevelSuccess,
    /// Timer ran out short of coins
    LevelFailure,
    /// Hearts ran out
    Death,
}

impl SoundEffect {
    /// Effect for a sim event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CoinCollected => Some(SoundEffect::Coin),
            GameEvent::BombHit => Some(SoundEffect::Bomb),
            GameEvent::Healed => Some(SoundEffect::Heal),
            GameEvent::LevelCleared { .. } => Some(SoundEffect::LevelSuccess),
            GameEvent::TimeUp { .. } => Some(SoundEffect::LevelFailure),
            GameEvent::Died => Some(SoundEffect::Death),
            GameEvent::LevelStarted { .. } | GameEvent::AllLevelsCleared => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::consts::MUSIC_FADE_OUT_MS;
    use crate::settings::Settings;
    use crate::synth::WavFile;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        music_buffer: Option<AudioBuffer>,
        music_source: Option<AudioBufferSourceNode>,
        music_gain: Option<GainNode>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let defaults = Settings::default();
            Self {
                ctx,
                sfx_volume: defaults.effective_sfx_volume(),
                music_volume: defaults.effective_music_volume(),
                music_buffer: None,
                music_source: None,
                music_gain: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume and mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
            if let (Some(ctx), Some(gain)) = (&self.ctx, &self.music_gain) {
                gain.gain()
                    .set_value_at_time(self.music_volume, ctx.current_time())
                    .ok();
            }
        }

        /// Copy a rendered soundtrack into a Web Audio buffer
        pub fn load_soundtrack(&mut self, wav: &WavFile) {
            let Some(ctx) = &self.ctx else { return };
            let Some(samples) = wav.samples_i16() else {
                log::warn!("Soundtrack is not 16-bit; music disabled");
                return;
            };
            let channels = wav.channels as usize;
            let frames = wav.frames();
            let Ok(buffer) =
                ctx.create_buffer(wav.channels as u32, frames as u32, wav.sample_rate as f32)
            else {
                log::warn!("Failed to allocate soundtrack buffer");
                return;
            };

            for ch in 0..channels {
                let data: Vec<f32> = samples
                    .iter()
                    .skip(ch)
                    .step_by(channels)
                    .map(|&s| s as f32 / 32767.0)
                    .collect();
                if buffer.copy_to_channel(&data, ch as i32).is_err() {
                    log::warn!("Failed to fill soundtrack channel {}", ch);
                    return;
                }
            }

            log::info!(
                "Soundtrack loaded: {} channel(s), {:.1}s",
                channels,
                wav.duration_secs()
            );
            self.music_buffer = Some(buffer);
        }

        /// Start looping the soundtrack (no-op if already playing)
        pub fn start_music(&mut self) {
            if self.music_source.is_some() {
                return;
            }
            let (Some(ctx), Some(buffer)) = (&self.ctx, &self.music_buffer) else {
                return;
            };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Ok(source) = ctx.create_buffer_source() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            source.set_buffer(Some(buffer));
            source.set_loop(true);
            gain.gain().set_value(self.music_volume);
            if source.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            if source.start().is_err() {
                log::warn!("Failed to start soundtrack");
                return;
            }

            self.music_source = Some(source);
            self.music_gain = Some(gain);
        }

        /// Ramp the soundtrack down and stop it
        pub fn fade_out_music(&mut self) {
            let (Some(ctx), Some(source), Some(gain)) =
                (&self.ctx, self.music_source.take(), self.music_gain.take())
            else {
                return;
            };
            let t = ctx.current_time();
            let end = t + MUSIC_FADE_OUT_MS as f64 / 1000.0;
            gain.gain().set_value_at_time(gain.gain().value(), t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();
            source.stop_with_when(end).ok();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.sfx_volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Coin => self.play_coin(ctx, vol),
                SoundEffect::Bomb => self.play_bomb(ctx, vol),
                SoundEffect::Heal => self.play_heal(ctx, vol),
                SoundEffect::LevelSuccess => self.play_level_success(ctx, vol),
                SoundEffect::LevelFailure => self.play_level_failure(ctx, vol),
                SoundEffect::Death => self.play_death(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Notes played one after another, each with a short decay
        fn play_sequence(
            &self,
            ctx: &AudioContext,
            notes: &[f32],
            spacing: f64,
            length: f64,
            level: f32,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(level, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + length)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + length + 0.05).ok();
                }
            }
        }

        /// Coin - bright two-note ding
        fn play_coin(&self, ctx: &AudioContext, vol: f32) {
            self.play_sequence(
                ctx,
                &[988.0, 1319.0],
                0.06,
                0.15,
                vol * 0.25,
                OscillatorType::Sine,
            );
        }

        /// Bomb - low boom with a sub thump
        fn play_bomb(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.35)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 50.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }

        /// Heal - soft rising triad
        fn play_heal(&self, ctx: &AudioContext, vol: f32) {
            self.play_sequence(
                ctx,
                &[523.0, 659.0, 784.0],
                0.07,
                0.18,
                vol * 0.22,
                OscillatorType::Triangle,
            );
        }

        /// Level success - short fanfare
        fn play_level_success(&self, ctx: &AudioContext, vol: f32) {
            self.play_sequence(
                ctx,
                &[523.0, 659.0, 784.0, 1047.0],
                0.12,
                0.3,
                vol * 0.2,
                OscillatorType::Square,
            );
        }

        /// Level failure - descending tones
        fn play_level_failure(&self, ctx: &AudioContext, vol: f32) {
            self.play_sequence(
                ctx,
                &[400.0, 350.0, 300.0, 200.0],
                0.2,
                0.3,
                vol * 0.25,
                OscillatorType::Sawtooth,
            );
        }

        /// Death - long falling tone
        fn play_death(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 1.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.3).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RewardKind;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::CoinCollected),
            Some(SoundEffect::Coin)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelCleared {
                level: 0,
                reward: RewardKind::Can
            }),
            Some(SoundEffect::LevelSuccess)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TimeUp { level: 2 }),
            Some(SoundEffect::LevelFailure)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Died), Some(SoundEffect::Death));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelStarted { level: 1 }),
            None
        );
    }
}
