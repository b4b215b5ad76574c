//! Property-based tests for the vibrato engine.
//!
//! Block splitting must not change the result, and output never exceeds the
//! input peak or goes non-finite for any parameter combination.

use proptest::prelude::*;
use vibrato_effects::{
    DEPTH_MAX_S, DEPTH_MIN_S, RATE_MAX_HZ, RATE_MIN_HZ, Vibrato, VibratoParams,
};

fn stereo_signal(seed: &[f32], len: usize) -> (Vec<f32>, Vec<f32>) {
    let left: Vec<f32> = seed.iter().copied().cycle().take(len).collect();
    let right: Vec<f32> = left.iter().rev().map(|s| -s).collect();
    (left, right)
}

fn process_in_blocks(vibrato: &mut Vibrato, left: &mut [f32], right: &mut [f32], sizes: &[usize]) {
    let mut start = 0;
    let mut sizes = sizes.iter().copied().cycle();
    while start < left.len() {
        let end = (start + sizes.next().unwrap_or(64)).min(left.len());
        vibrato.process_block(&mut [&mut left[start..end], &mut right[start..end]], 2);
        start = end;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// One big block and any sequence of small blocks give bit-identical output.
    #[test]
    fn block_split_invariance(
        seed in prop::collection::vec(-1.0f32..=1.0f32, 1..64),
        sizes in prop::collection::vec(1usize..700, 1..8),
        rate in RATE_MIN_HZ..=RATE_MAX_HZ,
        depth in DEPTH_MIN_S..=DEPTH_MAX_S,
        sample_rate in prop::sample::select(vec![22050.0f32, 44100.0, 48000.0]),
    ) {
        let params = VibratoParams::new(rate, depth);
        let (left, right) = stereo_signal(&seed, 5000);

        let mut whole = Vibrato::with_sample_rate(2, sample_rate);
        whole.set_params(params);
        let (mut whole_l, mut whole_r) = (left.clone(), right.clone());
        whole.process_block(&mut [&mut whole_l[..], &mut whole_r[..]], 2);

        let mut split = Vibrato::with_sample_rate(2, sample_rate);
        split.set_params(params);
        let (mut split_l, mut split_r) = (left, right);
        process_in_blocks(&mut split, &mut split_l, &mut split_r, &sizes);

        prop_assert_eq!(whole_l, split_l);
        prop_assert_eq!(whole_r, split_r);
        prop_assert_eq!(whole.phase(), split.phase());
        prop_assert_eq!(whole.write_pos(), split.write_pos());
    }

    /// Output stays finite and within the input peak.
    #[test]
    fn output_bounded_by_input(
        seed in prop::collection::vec(-1.0f32..=1.0f32, 1..128),
        rate in RATE_MIN_HZ..=RATE_MAX_HZ,
        depth in DEPTH_MIN_S..=DEPTH_MAX_S,
        block in 1usize..1024,
    ) {
        let (mut left, mut right) = stereo_signal(&seed, 6000);
        let peak = seed.iter().fold(0.0f32, |m, s| m.max(s.abs()));

        let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
        vibrato.set_params(VibratoParams::new(rate, depth));
        process_in_blocks(&mut vibrato, &mut left, &mut right, &[block]);

        for &s in left.iter().chain(right.iter()) {
            prop_assert!(s.is_finite());
            prop_assert!(s.abs() <= peak + 1e-6, "sample {} exceeds peak {}", s, peak);
        }
    }

    /// Out-of-range parameters are clamped instead of breaking the engine.
    #[test]
    fn extreme_params_stay_finite(
        rate in -100.0f32..100.0f32,
        depth in -1.0f32..1.0f32,
    ) {
        let mut vibrato = Vibrato::with_sample_rate(1, 8000.0);
        vibrato.set_params(VibratoParams { rate_hz: rate, depth_s: depth });
        let mut block: Vec<f32> = (0..2048).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        vibrato.process_block(&mut [&mut block[..]], 1);
        prop_assert!(block.iter().all(|s| s.is_finite()));
        prop_assert!((0.0..1.0).contains(&vibrato.phase()));
    }
}
