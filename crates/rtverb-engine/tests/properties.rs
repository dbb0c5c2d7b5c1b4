//! Property-based tests for the reverb engine.
//!
//! Stability over the whole normal-mode parameter range, the freeze invariant,
//! predelay timing and the coefficient smoothing bound, using proptest for
//! randomized parameters and input.

use proptest::prelude::*;
use rtverb_engine::{
    EngineConfig, FIXED_GAIN, FREEZE_GAIN, MAX_FEEDBACK, PredelayMode, ReverbEngine,
    ReverbParameters, Tuning,
};

/// Short buffers so tails decay within a few thousand samples.
fn short_tuning() -> Tuning {
    Tuning {
        comb_left: vec![29, 31, 37, 41],
        comb_right: vec![43, 47, 53, 59],
        allpass_left: vec![13, 7],
        allpass_right: vec![17, 11],
    }
}

fn engine_with(config: EngineConfig) -> ReverbEngine {
    ReverbEngine::with_config(config).unwrap()
}

fn run(engine: &mut ReverbEngine, input: &[f32]) -> Vec<f32> {
    let mut out_l = vec![0.0; input.len()];
    let mut out_r = vec![0.0; input.len()];
    engine.process(input, input, &mut out_l, &mut out_r, input.len(), 1);
    out_l.into_iter().chain(out_r).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For room size in [0, 0.99] and any damping, the output stays finite and
    /// bounded, and the tail does not grow once the input stops.
    #[test]
    fn normal_mode_is_stable(
        room_size in 0.0f32..=0.99f32,
        damp in 0.0f32..=1.0f32,
        width in 0.0f32..=1.0f32,
        noise in prop::collection::vec(-1.0f32..=1.0f32, 64..512),
    ) {
        let mut engine = engine_with(EngineConfig::new(48000.0).with_tuning(short_tuning()));
        engine.set_room_size(room_size);
        engine.set_damp(damp);
        engine.set_width(width);

        let excited = run(&mut engine, &noise);
        prop_assert!(excited.iter().all(|s| s.is_finite()));

        let tail = run(&mut engine, &vec![0.0; 20_000]);
        prop_assert!(tail.iter().all(|s| s.is_finite() && s.abs() < 1000.0));

        let energy = |s: &[f32]| s.iter().map(|x| x * x).sum::<f32>();
        let early = energy(&tail[..2000]) + energy(&tail[20_000..22_000]);
        let late = energy(&tail[18_000..20_000]) + energy(&tail[38_000..]);
        prop_assert!(late <= early + 1e-12, "tail grew: {} -> {}", early, late);
    }

    /// Freeze forces feedback 1, damping 0 and the near-zero gain whatever the
    /// other parameters are; leaving freeze restores them.
    #[test]
    fn freeze_invariant(
        room_size in 0.0f32..=1.0f32,
        damp in 0.0f32..=1.0f32,
        mode in 1.0f32..10.0f32,
    ) {
        let mut engine = ReverbEngine::new(48000.0);
        engine.set_room_size(room_size);
        engine.set_damp(damp);
        engine.set_mode(mode);

        let c = *engine.coefficients();
        prop_assert!(engine.is_frozen());
        prop_assert_eq!(c.feedback, 1.0);
        prop_assert_eq!(c.damp, 0.0);
        prop_assert_eq!(c.gain, FREEZE_GAIN);

        engine.set_mode(0.0);
        let c = *engine.coefficients();
        prop_assert_eq!(c.feedback, room_size.min(MAX_FEEDBACK));
        prop_assert_eq!(c.damp, damp);
        prop_assert_eq!(c.gain, FIXED_GAIN);
    }

    /// Any predelay duration maps to `round(seconds · sr)` samples, clamped to
    /// the capacity.
    #[test]
    fn predelay_length_is_rounded(
        seconds in 0.0f32..0.2f32,
        crossfade in any::<bool>(),
    ) {
        let mode = if crossfade { PredelayMode::Crossfade } else { PredelayMode::Simple };
        let mut engine = engine_with(
            EngineConfig::new(48000.0)
                .with_tuning(short_tuning())
                .with_predelay(mode),
        );
        engine.set_predelay(seconds);
        // Let a crossfade finish.
        run(&mut engine, &vec![0.0; 2048]);

        let expected = (libm::roundf(seconds.min(0.1) * 48000.0) as usize).min(4800);
        prop_assert_eq!(engine.latency_samples(), expected);
    }

    /// Each processing block moves the applied cutoff by at most ×1.2.
    #[test]
    fn cutoff_smoothing_per_block(
        start in 20.0f32..20000.0f32,
        target in 20.0f32..20000.0f32,
    ) {
        let mut engine = ReverbEngine::new(48000.0);
        engine.apply_preset(&rtverb_engine::Preset::new("start", ReverbParameters {
            cutoff: start,
            ..ReverbParameters::DEFAULT
        }));
        for _ in 0..64 {
            run(&mut engine, &[0.0; 16]);
        }

        engine.set_input_filter(target, 0.5);
        for _ in 0..64 {
            let before = engine.applied_cutoff().unwrap();
            run(&mut engine, &[0.0; 16]);
            let after = engine.applied_cutoff().unwrap();
            let ratio = after / before;
            prop_assert!(ratio <= 1.2 * (1.0 + 1e-6) && ratio >= (1.0 / 1.2) * (1.0 - 1e-6));
        }
        prop_assert!((engine.applied_cutoff().unwrap() - target).abs() <= target * 1e-5);
    }
}
