//! Stereo variants derived from the mono base track

use std::f64::consts::TAU;

use super::dsp;

/// A two-channel signal with equal-length channels
#[derive(Debug, Clone, PartialEq)]
pub struct StereoTrack {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl StereoTrack {
    /// Interleave into 16-bit PCM, clipping to [-1, 1] first
    pub fn to_pcm16(&self) -> Vec<i16> {
        let mut out = Vec::with_capacity(self.left.len() * 2);
        for (&l, &r) in self.left.iter().zip(&self.right) {
            out.push((l.clamp(-1.0, 1.0) * 32767.0) as i16);
            out.push((r.clamp(-1.0, 1.0) * 32767.0) as i16);
        }
        out
    }

    pub fn frames(&self) -> usize {
        self.left.len()
    }
}

fn samples_for(secs: f64, sample_rate: u32) -> usize {
    (secs * sample_rate as f64) as usize
}

/// Oscillator `sin(2π·freq·i/sr)` evaluated per sample index
fn lfo(i: usize, freq: f64, sample_rate: u32) -> f64 {
    (TAU * freq * i as f64 / sample_rate as f64).sin()
}

/// Right channel 2 ms late and slightly quieter
pub fn punchy(mono: &[f64], sample_rate: u32) -> StereoTrack {
    let right = dsp::delay(mono, samples_for(0.002, sample_rate))
        .into_iter()
        .map(|x| x * 0.92)
        .collect();
    StereoTrack {
        left: mono.to_vec(),
        right,
    }
}

/// Right channel 12 ms late with a 2.5 Hz tremolo for groove
pub fn rhythmic(mono: &[f64], sample_rate: u32) -> StereoTrack {
    let right = dsp::delay(mono, samples_for(0.012, sample_rate))
        .into_iter()
        .enumerate()
        .map(|(i, x)| x * (0.85 + 0.25 * lfo(i, 2.5, sample_rate)))
        .collect();
    StereoTrack {
        left: mono.iter().map(|x| x * 0.98).collect(),
        right,
    }
}

/// Right channel ring-modulated at 880 Hz with its low end pulled out
pub fn metallic_stereo(mono: &[f64], sample_rate: u32) -> StereoTrack {
    let ringed: Vec<f64> = mono
        .iter()
        .enumerate()
        .map(|(i, x)| x * lfo(i, 880.0, sample_rate) * 0.9)
        .collect();
    let window = samples_for(0.02, sample_rate).max(1);
    let low = dsp::moving_average_same(&ringed, window);
    let right = ringed.iter().zip(&low).map(|(x, avg)| x - 0.6 * avg).collect();
    StereoTrack {
        left: mono.iter().map(|x| x * 0.9).collect(),
        right,
    }
}

/// Transient-boosted, gated, ping-pong stereo with widened highs
///
/// Both channels are normalised together so the louder one peaks at 0.95.
pub fn dynamic(mono: &[f64], sample_rate: u32) -> StereoTrack {
    let n = mono.len();

    // Onset strength from the rise of the smoothed envelope
    let magnitude: Vec<f64> = mono.iter().map(|x| x.abs()).collect();
    let smooth = dsp::moving_average_same(&magnitude, 256);
    let mut novelty = Vec::with_capacity(n);
    if n > 0 {
        novelty.push(0.0);
    }
    novelty.extend(smooth.windows(2).map(|w| (w[1] - w[0]).max(0.0)));
    let novelty_max = novelty.iter().cloned().fold(0.0, f64::max);
    let transient: Vec<f64> = if novelty_max > dsp::SILENCE_FLOOR {
        novelty.iter().map(|x| 1.0 + 4.0 * x / novelty_max).collect()
    } else {
        vec![1.0; n]
    };

    let trem: Vec<f64> = (0..n)
        .map(|i| 0.7 + 0.6 * lfo(i, 3.2, sample_rate).abs())
        .collect();

    let mut left: Vec<f64> = (0..n)
        .map(|i| mono[i] * (0.9 * trem[i] * (0.8 + 0.5 * transient[i])))
        .collect();

    let delayed = dsp::delay(mono, samples_for(0.01, sample_rate));
    let detuned = dsp::resample_linear(&delayed, 0.9995);
    let mut right: Vec<f64> = (0..n)
        .map(|i| {
            let pan = 0.5 + 0.5 * lfo(i, 0.25, sample_rate);
            detuned[i] * (0.85 * trem[i] * (0.7 + 0.6 * transient[i])) * (0.6 + 0.8 * pan)
        })
        .collect();

    // Opposite-phase high band on each side
    let hf = dsp::convolve_same(mono, &[1.0, -0.5, 0.25]);
    for i in 0..n {
        let h = hf[i] * 0.04;
        left[i] += h;
        right[i] -= h;
    }

    let joint_peak = dsp::peak(&left).max(dsp::peak(&right)).max(dsp::SILENCE_FLOOR);
    let gain = 0.95 / joint_peak;
    for x in left.iter_mut().chain(right.iter_mut()) {
        *x *= gain;
    }

    StereoTrack { left, right }
}
