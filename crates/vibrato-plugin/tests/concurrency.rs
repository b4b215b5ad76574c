//! Control/audio thread protocol tests.
//!
//! A control thread hammers the parameter store while the audio thread runs
//! blocks. Every block must run with one complete snapshot: never a rate
//! from one write and a depth from another, and never a change mid-block.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use vibrato_plugin::{Param, ProcessorConfig, VibratoParams, VibratoProcessor, VibratoShared};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK: usize = 64;

/// Circular distance between two phases in [0, 1).
fn phase_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

#[test]
fn blocks_see_whole_snapshots() {
    let a = VibratoParams::new(2.0, 0.01);
    let b = VibratoParams::new(11.0, 0.05);

    let shared = VibratoShared::with_params(a, None);
    let mut processor = VibratoProcessor::new(shared.clone(), &ProcessorConfig::default());
    processor.prepare(SAMPLE_RATE, BLOCK).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let shared = shared.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut flip = false;
            while !stop.load(Ordering::Relaxed) {
                shared.set_params(if flip { a } else { b });
                flip = !flip;
            }
        })
    };

    let mut left = vec![0.0f32; BLOCK];
    let mut right = vec![0.0f32; BLOCK];
    for i in 0..5000 {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l = (i as f32 * 0.37).sin() * 0.5;
            *r = -*l;
        }

        let phase_before = processor.phase();
        processor.process_block(&mut [&mut left[..], &mut right[..]], 2);
        let params = processor.params();

        assert!(
            params == a || params == b,
            "block {i} ran with mixed parameters {params:?}"
        );

        let expected = (phase_before + BLOCK as f32 * params.rate_hz / SAMPLE_RATE as f32).fract();
        assert!(
            phase_distance(processor.phase(), expected) < 1e-3,
            "block {i}: phase {} does not match a single rate {} (expected {})",
            processor.phase(),
            params.rate_hz,
            expected
        );
        assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
    }

    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}

#[test]
fn single_parameter_writers_do_not_clobber_each_other() {
    let shared = VibratoShared::new(None);
    let rates = [1.0f32, 4.0, 8.0, 12.0];
    let depths = [0.01f32, 0.02, 0.04, 0.05];

    let rate_writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..20_000 {
                shared.set(Param::Rate, rates[i % rates.len()]);
            }
        })
    };
    let depth_writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..20_000 {
                shared.set(Param::Depth, depths[(i + 1) % depths.len()]);
            }
        })
    };

    rate_writer.join().unwrap();
    depth_writer.join().unwrap();

    // Last writes: i = 19_999.
    assert_eq!(shared.get(Param::Rate), rates[19_999 % 4]);
    assert_eq!(shared.get(Param::Depth), depths[20_000 % 4]);
}

#[test]
fn late_write_is_picked_up_next_block() {
    let shared = VibratoShared::new(None);
    let mut processor = VibratoProcessor::new(shared.clone(), &ProcessorConfig::default());
    processor.prepare(SAMPLE_RATE, BLOCK).unwrap();

    let mut block = vec![0.0f32; BLOCK];
    processor.process_block(&mut [&mut block[..]], 1);
    assert!(!shared.is_dirty());

    let handle = {
        let shared = shared.clone();
        thread::spawn(move || shared.set(Param::Rate, 9.0))
    };
    handle.join().unwrap();

    assert!(shared.is_dirty());
    processor.process_block(&mut [&mut block[..]], 1);
    assert_eq!(processor.params().rate_hz, 9.0);
    assert!(!shared.is_dirty());
}
