//! Tables and readouts derived from a frame of frequency bins: the Hann
//! window, per-bin frequencies, display bar heights and peak labels.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Hann window of `size` points, `sin²(πi / (size - 1))`.
///
/// Zero at both edges and one at the centre. A single-point window is `[1.0]`,
/// where the formula would divide by zero.
pub fn hann_window(size: usize) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0; size];
    }
    let denominator = (size - 1) as f64;
    (0..size)
        .map(|i| {
            let y = (PI * i as f64 / denominator).sin();
            y * y
        })
        .collect()
}

/// Centre frequency in Hz of every bin of a `frame_size`-point transform.
pub fn bin_frequencies(frame_size: usize, sample_rate: u32) -> Vec<f64> {
    let resolution = sample_rate as f64 / frame_size as f64;
    (0..frame_size).map(|i| i as f64 * resolution).collect()
}

/// Heights for `bar_count` bars, skipping the DC bin.
///
/// Bar `i` is `|bins[i + 1]| * intensity`, clamped to `max_height`. Bars past
/// the end of `bins` are zero.
pub fn bar_heights(
    bins: &[Complex64],
    bar_count: usize,
    intensity: f32,
    max_height: f32,
) -> Vec<f32> {
    (1..=bar_count)
        .map(|bin| {
            bins.get(bin)
                .map(|c| (c.norm() as f32 * intensity).min(max_height))
                .unwrap_or(0.0)
        })
        .collect()
}

/// A labelled spectral peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub bin: usize,
    pub frequency_hz: f64,
    pub magnitude: f64,
}

/// The `count` strongest bins below Nyquist, strongest first.
///
/// The DC bin is ignored. Ties keep the lower bin first.
pub fn strongest_peaks(bins: &[Complex64], frequencies: &[f64], count: usize) -> Vec<Peak> {
    let half = bins.len().min(frequencies.len()) / 2;
    let mut peaks: Vec<Peak> = (1..half)
        .map(|bin| Peak {
            bin,
            frequency_hz: frequencies[bin],
            magnitude: bins[bin].norm(),
        })
        .collect();

    peaks.sort_by(|a, b| {
        b.magnitude
            .total_cmp(&a.magnitude)
            .then_with(|| a.bin.cmp(&b.bin))
    });
    peaks.truncate(count);
    peaks
}
