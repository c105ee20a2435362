//! Signal processing helpers for the soundtrack synthesizer
//!
//! Signals are plain `f64` slices at a fixed sample rate. Convolution follows
//! the usual "same" convention: the output has the length of the longer input
//! and is centered on the full convolution.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f64::consts::TAU;

/// Smallest peak treated as non-silent
pub const SILENCE_FLOOR: f64 = 1e-9;

/// `n` evenly spaced values from `start` to `stop`, both included
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Sample times `i / sample_rate` for `n` samples
pub fn time_axis(n: usize, sample_rate: u32) -> Vec<f64> {
    (0..n).map(|i| i as f64 / sample_rate as f64).collect()
}

/// `sin(2π·freq·t)` for every sample time
pub fn sine(t: &[f64], freq: f64) -> Vec<f64> {
    t.iter().map(|&t| (TAU * freq * t).sin()).collect()
}

/// Raised-cosine (Hann) window of `m` points with zero endpoints
pub fn hanning(m: usize) -> Vec<f64> {
    match m {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..m)
            .map(|n| 0.5 - 0.5 * (TAU * n as f64 / (m - 1) as f64).cos())
            .collect(),
    }
}

/// Discrete convolution trimmed to the length of the longer input
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let (a, v) = if signal.len() >= kernel.len() {
        (signal, kernel)
    } else {
        (kernel, signal)
    };
    let (n, m) = (a.len(), v.len());
    if m == 0 {
        return Vec::new();
    }
    let start = (m - 1) / 2;

    (0..n)
        .map(|i| {
            let j = i + start;
            let k_min = j.saturating_sub(n - 1);
            let k_max = j.min(m - 1);
            (k_min..=k_max).map(|k| v[k] * a[j - k]).sum()
        })
        .collect()
}

/// Box filter of `window` taps, same as convolving with `ones(window) / window`
pub fn moving_average_same(signal: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let n = signal.len();
    if n < window {
        return convolve_same(signal, &vec![1.0 / window as f64; window]);
    }

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &x in signal {
        acc += x;
        prefix.push(acc);
    }

    let start = (window - 1) / 2;
    (0..n)
        .map(|i| {
            let j = i + start;
            let lo = (j + 1).saturating_sub(window);
            let hi = j.min(n - 1);
            (prefix[hi + 1] - prefix[lo]) / window as f64
        })
        .collect()
}

/// Shift right by `samples`, padding the front with silence
pub fn delay(signal: &[f64], samples: usize) -> Vec<f64> {
    let n = signal.len();
    let samples = samples.min(n);
    let mut out = vec![0.0; samples];
    out.extend_from_slice(&signal[..n - samples]);
    out
}

/// Linear interpolation of `signal` sampled at positions `i·ratio`
///
/// Positions past the last sample hold the last value.
pub fn resample_linear(signal: &[f64], ratio: f64) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let x = (i as f64 * ratio).clamp(0.0, (n - 1) as f64);
            let lo = x.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = x - lo as f64;
            signal[lo] + frac * (signal[hi] - signal[lo])
        })
        .collect()
}

/// Largest absolute sample, 0 for an empty signal
pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// Scale so the peak sits at `target`; silent signals are left untouched
pub fn normalize(signal: &mut [f64], target: f64) {
    let max = peak(signal);
    if max < SILENCE_FLOOR {
        return;
    }
    let gain = target / max;
    for x in signal.iter_mut() {
        *x *= gain;
    }
}

/// Standard normal noise from a seeded PCG (Box–Muller)
pub struct Noise {
    rng: Pcg32,
    spare: Option<f64>,
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            spare: None,
        }
    }

    /// Next sample of N(0, 1)
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // Keep u1 away from zero so ln() stays finite
        let u1 = 1.0 - self.rng.random::<f64>();
        let u2 = self.rng.random::<f64>();
        let r = (-2.0 * u1.ln()).sqrt();
        self.spare = Some(r * (TAU * u2).sin());
        r * (TAU * u2).cos()
    }

    pub fn samples(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next_gaussian()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_linspace_includes_endpoint() {
        assert_close(&linspace(0.0, 3.0, 4), &[0.0, 1.0, 2.0, 3.0]);
        assert_close(&linspace(0.0, 5.0, 1), &[0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_hanning_shape() {
        let w = hanning(5);
        assert_close(&w, &[0.0, 0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_convolve_same_odd_kernel() {
        let out = convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_close(&out, &[1.0, 2.5, 4.0]);
    }

    #[test]
    fn test_convolve_same_even_kernel() {
        let out = convolve_same(&[1.0, 2.0, 3.0], &[1.0, 1.0]);
        assert_close(&out, &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_convolve_same_short_signal() {
        // The longer input sets the output length
        let out = convolve_same(&[1.0], &[1.0, 2.0, 3.0]);
        assert_close(&out, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_delay_pads_front() {
        assert_close(&delay(&[1.0, 2.0, 3.0, 4.0], 2), &[0.0, 0.0, 1.0, 2.0]);
        assert_close(&delay(&[1.0, 2.0], 5), &[0.0, 0.0]);
    }

    #[test]
    fn test_resample_linear_midpoints() {
        let out = resample_linear(&[0.0, 2.0, 4.0], 0.5);
        assert_close(&out, &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_normalize_silence_is_untouched() {
        let mut silent = vec![0.0; 16];
        normalize(&mut silent, 0.95);
        assert!(silent.iter().all(|&x| x == 0.0));

        let mut empty: Vec<f64> = Vec::new();
        normalize(&mut empty, 0.95);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_normalize_to_target() {
        let mut sig = vec![0.5, -2.0, 1.0];
        normalize(&mut sig, 0.95);
        assert!((peak(&sig) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_noise_is_seeded() {
        let a = Noise::new(424242).samples(64);
        let b = Noise::new(424242).samples(64);
        assert_eq!(a, b);
        let mean: f64 = Noise::new(1).samples(20_000).iter().sum::<f64>() / 20_000.0;
        assert!(mean.abs() < 0.05);
    }

    proptest! {
        #[test]
        fn prop_moving_average_matches_convolution(
            signal in prop::collection::vec(-1.0f64..1.0, 0..200),
            window in 1usize..40,
        ) {
            let fast = moving_average_same(&signal, window);
            let slow = convolve_same(&signal, &vec![1.0 / window as f64; window]);
            prop_assert_eq!(fast.len(), slow.len());
            for (a, b) in fast.iter().zip(&slow) {
                prop_assert!((a - b).abs() < 1e-9);
            }
        }
    }
}
