//! Algebraic laws of the transform engine, checked over random inputs.

use num_complex::Complex64;
use proptest::collection::vec;
use proptest::prelude::*;
use realfft::RealFftPlanner;
use spectrum_visualizer::error::FftError;
use spectrum_visualizer::fft;

fn complex() -> impl Strategy<Value = Complex64> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(re, im)| Complex64::new(re, im))
}

/// Sequences whose length is a power of two between 1 and 1024.
fn sequence() -> impl Strategy<Value = Vec<Complex64>> {
    (0u32..=10).prop_flat_map(|power| vec(complex(), 1usize << power))
}

fn sequence_pair() -> impl Strategy<Value = (Vec<Complex64>, Vec<Complex64>)> {
    (0u32..=10).prop_flat_map(|power| {
        let len = 1usize << power;
        (vec(complex(), len), vec(complex(), len))
    })
}

/// Absolute tolerance proportional to the total energy of the input.
fn tolerance(values: &[Complex64]) -> f64 {
    1e-10 * (1.0 + values.iter().map(|c| c.norm()).sum::<f64>())
}

fn max_error(a: &[Complex64], b: &[Complex64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

proptest! {
    #[test]
    fn round_trip_reconstructs_input(input in sequence()) {
        let mut data = input.clone();
        fft::forward(&mut data, false).unwrap();
        fft::inverse(&mut data, true).unwrap();
        prop_assert!(max_error(&data, &input) <= tolerance(&input));
    }

    #[test]
    fn default_flags_round_trip(input in sequence()) {
        let mut data = input.clone();
        fft::forward(&mut data, fft::DEFAULT_FORWARD_SCALE).unwrap();
        fft::inverse(&mut data, fft::DEFAULT_INVERSE_SCALE).unwrap();
        prop_assert!(max_error(&data, &input) <= tolerance(&input));
    }

    #[test]
    fn forward_is_linear(
        (x, y) in sequence_pair(),
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
    ) {
        let mut combined: Vec<Complex64> = x.iter().zip(&y).map(|(p, q)| *p * a + *q * b).collect();
        let mut fx = x.clone();
        let mut fy = y.clone();
        fft::forward(&mut combined, true).unwrap();
        fft::forward(&mut fx, true).unwrap();
        fft::forward(&mut fy, true).unwrap();

        let expected: Vec<Complex64> = fx.iter().zip(&fy).map(|(p, q)| *p * a + *q * b).collect();
        let scale = 10.0 * (tolerance(&x) + tolerance(&y));
        prop_assert!(max_error(&combined, &expected) <= scale);
    }

    #[test]
    fn bit_reversal_is_an_involution(input in sequence()) {
        let mut data = input.clone();
        fft::bit_reverse_permute(&mut data).unwrap();
        fft::bit_reverse_permute(&mut data).unwrap();
        prop_assert_eq!(data, input);
    }

    #[test]
    fn copy_and_in_place_agree(input in sequence()) {
        let mut in_place = input.clone();
        fft::forward(&mut in_place, true).unwrap();

        let mut copied = vec![Complex64::default(); input.len()];
        fft::forward_into(&input, &mut copied, true).unwrap();
        prop_assert_eq!(in_place, copied);
    }

    #[test]
    fn agrees_with_realfft(power in 1u32..=10, seed in vec(-1.0f64..1.0, 1024)) {
        let len = 1usize << power;
        let signal = &seed[..len];

        let mut ours: Vec<Complex64> = signal.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        fft::forward(&mut ours, false).unwrap();

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(len);
        let mut input = signal.to_vec();
        let mut reference = r2c.make_output_vec();
        r2c.process(&mut input, &mut reference).unwrap();

        let err = max_error(&ours[..reference.len()], &reference);
        prop_assert!(err <= 1e-9 * len as f64, "max error {}", err);
    }

    #[test]
    fn rejects_non_power_of_two(len in 1usize..2048) {
        prop_assume!(!len.is_power_of_two());
        let original: Vec<Complex64> = (0..len).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let mut data = original.clone();

        prop_assert_eq!(fft::forward(&mut data, true), Err(FftError::NotPowerOfTwo { len }));
        prop_assert_eq!(data, original);
    }
}

#[test]
fn zeros_transform_to_zeros() {
    for power in 0..=12 {
        let mut data = vec![Complex64::default(); 1 << power];
        fft::forward(&mut data, false).unwrap();
        assert!(data.iter().all(|c| c.re == 0.0 && c.im == 0.0));

        fft::inverse(&mut data, true).unwrap();
        assert!(data.iter().all(|c| c.re == 0.0 && c.im == 0.0));
    }
}

#[test]
fn length_six_is_rejected() {
    let mut data = vec![Complex64::new(1.0, 0.0); 6];
    assert_eq!(
        fft::inverse(&mut data, false),
        Err(FftError::NotPowerOfTwo { len: 6 })
    );
}
