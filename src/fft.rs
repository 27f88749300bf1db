//! Radix-2 Cooley-Tukey transform engine.
//!
//! Every entry point validates the sequence length before touching a single
//! element, so a rejected call leaves its buffers exactly as they were.
//! The engine is pure computation: no allocation, no I/O, no logging.

use crate::error::FftError;
use num_complex::Complex64;
use std::f64::consts::PI;

/// [`forward`] scales by `1/N` unless told otherwise.
pub const DEFAULT_FORWARD_SCALE: bool = true;
/// [`inverse`] leaves its output unscaled unless told otherwise.
pub const DEFAULT_INVERSE_SCALE: bool = false;

fn check_len(len: usize) -> Result<(), FftError> {
    if len == 0 {
        return Err(FftError::ZeroLength);
    }
    if !len.is_power_of_two() {
        return Err(FftError::NotPowerOfTwo { len });
    }
    Ok(())
}

fn check_pair(input: usize, output: usize) -> Result<(), FftError> {
    if input != output {
        return Err(FftError::LengthMismatch { input, output });
    }
    check_len(input)
}

/// Advance a bit-reversed counter by one.
///
/// Starting from the most significant bit, set bits are cleared until the
/// first clear bit is found, which is then set.
#[inline]
fn next_reversed(mut index: usize, len: usize) -> usize {
    let mut bit = len >> 1;
    while index & bit != 0 {
        index &= !bit;
        bit >>= 1;
    }
    index | bit
}

/// Reorder `data` in place so that `data[i]` holds the element previously at
/// the bit-reversed position of `i`.
///
/// Each pair is swapped once, only when the reversed index is ahead of the
/// current one. Applying this twice restores the original order.
pub fn bit_reverse_permute(data: &mut [Complex64]) -> Result<(), FftError> {
    let len = data.len();
    check_len(len)?;

    let mut reversed = 0;
    for index in 0..len {
        if reversed > index {
            data.swap(index, reversed);
        }
        reversed = next_reversed(reversed, len);
    }
    Ok(())
}

/// Write the bit-reversed ordering of `input` into `output`.
pub fn bit_reverse_copy(input: &[Complex64], output: &mut [Complex64]) -> Result<(), FftError> {
    let len = input.len();
    check_pair(len, output.len())?;

    let mut reversed = 0;
    for value in input {
        output[reversed] = *value;
        reversed = next_reversed(reversed, len);
    }
    Ok(())
}

/// Unnormalized decimation-in-time butterflies over a bit-reversed sequence.
///
/// The twiddle factor for each stage is advanced with the trigonometric
/// recurrence `w' = w + w * (cos(d) - 1 + i sin(d))`, where
/// `cos(d) - 1 = -2 sin²(d/2)`, so each stage costs two sine evaluations
/// regardless of its width. Rounding error accumulates across stages.
pub fn butterfly(data: &mut [Complex64], inverse: bool) -> Result<(), FftError> {
    let len = data.len();
    check_len(len)?;

    let pi = if inverse { -PI } else { PI };
    let mut step = 1;
    while step < len {
        let jump = step << 1;
        let delta = -pi / step as f64;
        let sine = (delta / 2.0).sin();
        let multiplier = Complex64::new(-2.0 * sine * sine, delta.sin());
        let mut factor = Complex64::new(1.0, 0.0);

        for group in 0..step {
            for summand in (group..len).step_by(jump) {
                let pair = summand + step;
                let product = factor * data[pair];
                data[pair] = data[summand] - product;
                data[summand] += product;
            }
            factor += multiplier * factor;
        }
        step = jump;
    }
    Ok(())
}

/// Multiply every element by `1/N`.
///
/// Apply at most once per forward/inverse pair.
pub fn normalize(data: &mut [Complex64]) -> Result<(), FftError> {
    if data.is_empty() {
        return Err(FftError::ZeroLength);
    }
    let factor = 1.0 / data.len() as f64;
    for value in data.iter_mut() {
        *value *= factor;
    }
    Ok(())
}

fn transform(data: &mut [Complex64], inverse: bool, scale: bool) -> Result<(), FftError> {
    bit_reverse_permute(data)?;
    butterfly(data, inverse)?;
    if scale {
        normalize(data)?;
    }
    Ok(())
}

fn transform_into(
    input: &[Complex64],
    output: &mut [Complex64],
    inverse: bool,
    scale: bool,
) -> Result<(), FftError> {
    bit_reverse_copy(input, output)?;
    butterfly(output, inverse)?;
    if scale {
        normalize(output)?;
    }
    Ok(())
}

/// Forward transform in place. Pass [`DEFAULT_FORWARD_SCALE`] for the
/// conventional `1/N` scaling.
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use spectrum_visualizer::fft;
///
/// let mut data = vec![Complex64::new(1.0, 0.0); 4];
/// fft::forward(&mut data, false)?;
/// assert!((data[0].re - 4.0).abs() < 1e-12);
/// # Ok::<(), spectrum_visualizer::error::FftError>(())
/// ```
pub fn forward(data: &mut [Complex64], scale: bool) -> Result<(), FftError> {
    check_len(data.len())?;
    transform(data, false, scale)
}

/// Inverse transform in place. Pass [`DEFAULT_INVERSE_SCALE`] to leave the
/// result unscaled.
pub fn inverse(data: &mut [Complex64], scale: bool) -> Result<(), FftError> {
    check_len(data.len())?;
    transform(data, true, scale)
}

/// Forward transform of `samples` written into `output`; `samples` is left untouched.
pub fn forward_into(
    samples: &[Complex64],
    output: &mut [Complex64],
    scale: bool,
) -> Result<(), FftError> {
    check_pair(samples.len(), output.len())?;
    transform_into(samples, output, false, scale)
}

/// Inverse transform of `spectrum` written into `output`; `spectrum` is left untouched.
pub fn inverse_into(
    spectrum: &[Complex64],
    output: &mut [Complex64],
    scale: bool,
) -> Result<(), FftError> {
    check_pair(spectrum.len(), output.len())?;
    transform_into(spectrum, output, true, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn real(values: &[f64]) -> Vec<Complex64> {
        values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
    }

    fn assert_close(actual: &[Complex64], expected: &[Complex64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).norm() < TOLERANCE,
                "bin {}: got {}, expected {}",
                i,
                a,
                e
            );
        }
    }

    fn naive_dft(input: &[Complex64]) -> Vec<Complex64> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .map(|(t, x)| {
                        let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                        x * Complex64::from_polar(1.0, angle)
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_impulse_spreads_to_all_bins() {
        let mut data = real(&[1.0, 0.0, 0.0, 0.0]);
        forward(&mut data, false).unwrap();
        assert_close(&data, &real(&[1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_constant_concentrates_in_dc() {
        let mut data = real(&[1.0, 1.0, 1.0, 1.0]);
        forward(&mut data, false).unwrap();
        assert_close(&data, &real(&[4.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_default_forward_scaling() {
        let mut data = real(&[1.0, 1.0, 1.0, 1.0]);
        forward(&mut data, DEFAULT_FORWARD_SCALE).unwrap();
        assert_close(&data, &real(&[1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_matches_naive_dft() {
        let input: Vec<Complex64> = (0..16)
            .map(|i| Complex64::new((i as f64 * 0.7).sin(), (i as f64 * 0.3).cos()))
            .collect();
        let expected = naive_dft(&input);

        let mut data = input.clone();
        forward(&mut data, false).unwrap();
        assert_close(&data, &expected);
    }

    #[test]
    fn test_single_element_is_identity() {
        let mut data = vec![Complex64::new(3.5, -1.25)];
        forward(&mut data, true).unwrap();
        assert_eq!(data, vec![Complex64::new(3.5, -1.25)]);
    }

    #[test]
    fn test_bit_reverse_order_of_eight() {
        let mut data = real(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        bit_reverse_permute(&mut data).unwrap();
        assert_eq!(data, real(&[0.0, 4.0, 2.0, 6.0, 1.0, 5.0, 3.0, 7.0]));
    }

    #[test]
    fn test_bit_reverse_copy_matches_in_place() {
        let input: Vec<Complex64> = (0..16).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let mut copied = vec![Complex64::default(); input.len()];
        bit_reverse_copy(&input, &mut copied).unwrap();

        let mut in_place = input.clone();
        bit_reverse_permute(&mut in_place).unwrap();
        assert_eq!(copied, in_place);
    }

    #[test]
    fn test_copy_variants_leave_input_untouched() {
        let input = real(&[0.5, -1.0, 2.0, 0.25]);
        let mut spectrum = vec![Complex64::default(); 4];
        forward_into(&input, &mut spectrum, false).unwrap();
        assert_eq!(input, real(&[0.5, -1.0, 2.0, 0.25]));

        let mut restored = vec![Complex64::default(); 4];
        inverse_into(&spectrum, &mut restored, true).unwrap();
        assert_close(&restored, &input);
    }

    #[test]
    fn test_rejects_non_power_of_two_without_mutation() {
        let original = real(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut data = original.clone();

        assert_eq!(
            forward(&mut data, true),
            Err(FftError::NotPowerOfTwo { len: 6 })
        );
        assert_eq!(
            inverse(&mut data, false),
            Err(FftError::NotPowerOfTwo { len: 6 })
        );
        assert_eq!(
            bit_reverse_permute(&mut data),
            Err(FftError::NotPowerOfTwo { len: 6 })
        );
        assert_eq!(data, original);
    }

    #[test]
    fn test_rejects_empty() {
        let mut data: Vec<Complex64> = Vec::new();
        assert_eq!(forward(&mut data, true), Err(FftError::ZeroLength));
        assert_eq!(normalize(&mut data), Err(FftError::ZeroLength));
        assert_eq!(butterfly(&mut data, false), Err(FftError::ZeroLength));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let input = real(&[1.0, 2.0, 3.0, 4.0]);
        let mut output = vec![Complex64::new(9.0, 9.0); 8];
        assert_eq!(
            forward_into(&input, &mut output, true),
            Err(FftError::LengthMismatch {
                input: 4,
                output: 8
            })
        );
        assert!(output.iter().all(|v| *v == Complex64::new(9.0, 9.0)));
    }

    #[test]
    fn test_normalize_divides_by_length() {
        let mut data = real(&[8.0, 4.0, -2.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        normalize(&mut data).unwrap();
        assert_close(&data, &real(&[1.0, 0.5, -0.25, 0.0, 0.125, 0.125, 0.125, 0.125]));
    }

    #[test]
    fn test_default_flags_round_trip() {
        // Only the forward default scales, so the default pair scales exactly once.
        let input = real(&[1.0, 2.0, 3.0, 4.0]);
        let mut data = input.clone();
        forward(&mut data, DEFAULT_FORWARD_SCALE).unwrap();
        inverse(&mut data, DEFAULT_INVERSE_SCALE).unwrap();
        assert_close(&data, &input);
    }
}
