//! The layered "urgent" background track
//!
//! Eight seconds of mono audio built from a droning bass, a pulse rhythm,
//! a dissonant arpeggio, percussion and metallic noise bursts. The noise
//! layers draw from a fixed seed so every build produces the same file.

use std::f64::consts::TAU;

use super::dsp::{self, Noise};

pub const SAMPLE_RATE: u32 = 44_100;
pub const DURATION_SECS: f64 = 8.0;
pub const SEED: u64 = 424_242;
/// Peak level after normalisation
pub const PEAK: f64 = 0.95;

const ARP_FREQS: [f64; 3] = [220.0, 233.08, 196.0];
const ARP_STEP_SECS: f64 = 0.25;
const HIT_INTERVAL_SECS: f64 = 0.5;
const HIT_OFFSETS_SECS: [f64; 2] = [0.0, 0.25];
const HIT_SECS: f64 = 0.10;
const REVERB_SECS: f64 = 0.03;
const SMOOTHING_TAPS: usize = 32;
const DETUNE: f64 = 0.997;

/// Number of samples in the track
pub fn sample_count() -> usize {
    (SAMPLE_RATE as f64 * DURATION_SECS) as usize
}

/// Render the track as floats peaking at [`PEAK`]
pub fn render() -> Vec<f64> {
    let sr = SAMPLE_RATE as f64;
    let n = sample_count();
    let t = dsp::time_axis(n, SAMPLE_RATE);
    let mut noise = Noise::new(SEED);

    // Slow swell shared by the low end
    let bass_env: Vec<f64> = t.iter().map(|&t| 0.6 + 0.4 * (TAU * 0.05 * t).sin()).collect();

    let mut signal: Vec<f64> = t
        .iter()
        .zip(&bass_env)
        .map(|(&t, &env)| {
            let sub = 0.35 * (TAU * 27.5 * t).sin();
            let drone = 0.55 * (TAU * 55.0 * t).sin() + 0.18 * (TAU * 58.5 * t).sin();
            let pulse_base = (TAU * 2.8 * t).sin();
            let pulse = 0.28 * pulse_base * pulse_base.abs().powf(0.45);
            (sub + drone) * env + pulse
        })
        .collect();

    add_arpeggio(&mut signal, &t, sr);

    for (s, &t) in signal.iter_mut().zip(&t) {
        let low_harmony = 0.2 * (TAU * 85.0 * t).sin() + 0.15 * (TAU * 95.0 * t).sin();
        *s += low_harmony * ((TAU * 0.2 * t).sin() + 1.0) * 0.5;
    }

    // Kick on the first half of every second, noise snare at 4 Hz
    let snare = noise.samples(n);
    for ((s, &t), &z) in signal.iter_mut().zip(&t).zip(&snare) {
        let kick_gate = if (TAU * t).sin() > 0.0 { 1.0 } else { 0.0 };
        let snare_gate = if (TAU * 4.0 * t).sin() > 0.0 { 1.0 } else { 0.0 };
        *s += 0.3 * (TAU * 60.0 * t).sin() * kick_gate + 0.15 * z * snare_gate;
    }

    add_metallic_hits(&mut signal, &t, sr, &mut noise);

    let shimmer = noise.samples(n);
    for ((s, &t), &z) in signal.iter_mut().zip(&t).zip(&shimmer) {
        *s += 0.08 * (z * 0.4) * ((TAU * 0.15 * t).sin() + 1.0);

        let harmony = 0.1 * (TAU * 330.0 * t).sin() + 0.08 * (TAU * 440.0 * t).sin();
        *s += harmony * ((TAU * 0.5 * t).sin() + 1.0) * 0.5;

        *s *= 0.85 + 0.15 * (TAU * 0.1 * t).sin();
    }

    // Single-tap echo
    let echo = dsp::delay(&signal, (sr * REVERB_SECS) as usize);
    for (s, e) in signal.iter_mut().zip(echo) {
        *s += e * 0.3;
    }

    let mut kernel = dsp::hanning(SMOOTHING_TAPS);
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    let mut signal = dsp::convolve_same(&signal, &kernel);

    for (s, &t) in signal.iter_mut().zip(&t) {
        *s += 0.06 * (TAU * 55.0 * t * DETUNE).sin();
    }

    dsp::normalize(&mut signal, PEAK);
    signal
}

/// Render the track as 16-bit mono PCM
pub fn render_pcm() -> Vec<i16> {
    to_pcm16(&render())
}

/// Convert floats in [-1, 1] to 16-bit samples, truncating toward zero
pub fn to_pcm16(signal: &[f64]) -> Vec<i16> {
    signal.iter().map(|&x| (x * 32767.0) as i16).collect()
}

/// Convert 16-bit samples back to floats in [-1, 1]
pub fn from_pcm16(samples: &[i16]) -> Vec<f64> {
    samples.iter().map(|&s| s as f64 / 32767.0).collect()
}

/// Quarter-second notes cycling through the arpeggio, each decaying
fn add_arpeggio(signal: &mut [f64], t: &[f64], sr: f64) {
    let n = signal.len();
    let step_len = (sr * ARP_STEP_SECS) as usize;
    for (step, start) in (0..n).step_by(step_len).enumerate() {
        let dur = step_len.min(n - start);
        let freq = ARP_FREQS[step % ARP_FREQS.len()] * (1.0 + 0.02 * (step % 3) as f64);
        let decay = dsp::linspace(0.0, 3.0, dur);
        for i in 0..dur {
            let idx = start + i;
            signal[idx] += 0.09 * (TAU * freq * t[idx]).sin() * (-decay[i]).exp();
        }
    }
}

/// Short 900 Hz noise bursts every quarter second
fn add_metallic_hits(signal: &mut [f64], t: &[f64], sr: f64, noise: &mut Noise) {
    let n = signal.len();
    let hit_len = (HIT_SECS * sr) as usize;
    for offset in HIT_OFFSETS_SECS {
        let mut beat_index = 0;
        loop {
            let beat = offset + beat_index as f64 * HIT_INTERVAL_SECS;
            if beat >= DURATION_SECS {
                break;
            }
            beat_index += 1;

            let start = (beat * sr) as usize;
            if start >= n {
                break;
            }
            let end = n.min(start + hit_len);
            let len = end - start;
            let burst = noise.samples(len);
            let decay = dsp::linspace(0.0, 5.0, len);
            for i in 0..len {
                let idx = start + i;
                let carrier = (TAU * 900.0 * t[idx]).sin();
                let wobble = 1.0 + 0.3 * (TAU * 60.0 * t[idx]).sin();
                signal[idx] += burst[i] * (-decay[i]).exp() * carrier * wobble * 1.2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_length_and_peak() {
        let signal = render();
        assert_eq!(signal.len(), 352_800);
        assert!((dsp::peak(&signal) - PEAK).abs() < 1e-9);
        assert!(signal.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render_pcm(), render_pcm());
    }

    #[test]
    fn test_pcm_truncates_toward_zero() {
        assert_eq!(to_pcm16(&[0.95, -0.95, 0.0]), vec![31128, -31128, 0]);
        let back = from_pcm16(&[32767, -32767]);
        assert_eq!(back, vec![1.0, -1.0]);
    }

    #[test]
    fn test_arpeggio_decays_within_each_step() {
        let sr = SAMPLE_RATE as f64;
        let n = (sr * 0.5) as usize;
        let t = dsp::time_axis(n, SAMPLE_RATE);
        let mut signal = vec![0.0; n];
        add_arpeggio(&mut signal, &t, sr);

        let step = (sr * ARP_STEP_SECS) as usize;
        let head = dsp::peak(&signal[..step / 8]);
        let tail = dsp::peak(&signal[step - step / 8..step]);
        assert!(head > tail * 5.0);
    }
}
