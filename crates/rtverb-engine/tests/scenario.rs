//! End-to-end behaviour of the reverb engine.
//!
//! Covers the 48 kHz impulse scenario, determinism, the freeze state machine
//! and predelay timing, all measured at the engine's outputs.

use rtverb_engine::{
    EngineConfig, PredelayMode, Preset, ReverbEngine, ReverbParameters, Tuning,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK: usize = 512;

/// Run `input` (same signal on both channels) through the engine in host-sized blocks.
fn render(engine: &mut ReverbEngine, input: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let mut out_l = vec![0.0; input.len()];
    let mut out_r = vec![0.0; input.len()];
    for start in (0..input.len()).step_by(BLOCK) {
        let end = (start + BLOCK).min(input.len());
        engine.process(
            &input[start..end],
            &input[start..end],
            &mut out_l[start..end],
            &mut out_r[start..end],
            end - start,
            1,
        );
    }
    (out_l, out_r)
}

fn energy(signal: &[f32]) -> f32 {
    signal.iter().map(|&s| s * s).sum()
}

fn impulse_after(silence: usize, total: usize) -> Vec<f32> {
    let mut input = vec![0.0; total];
    input[silence] = 1.0;
    input
}

#[test]
fn impulse_scenario_48k_four_combs() {
    let tuning = Tuning::freeverb(4, SAMPLE_RATE);
    let shortest_left = *tuning.comb_left.iter().min().unwrap();
    let shortest = tuning.shortest_comb().unwrap();
    assert_eq!(shortest, shortest_left);

    let mut engine = ReverbEngine::with_config(EngineConfig::new(SAMPLE_RATE).with_tuning(tuning))
        .unwrap();
    assert_eq!(*engine.parameters(), ReverbParameters::DEFAULT);

    let silence = SAMPLE_RATE as usize;
    let tail = 2 * SAMPLE_RATE as usize;
    let input = impulse_after(silence, silence + tail);
    let (out_l, out_r) = render(&mut engine, &input);

    let onset = silence + shortest;
    assert!(out_l[..onset].iter().all(|&s| s == 0.0), "left output before onset");
    assert!(out_r[..onset].iter().all(|&s| s == 0.0), "right output before onset");
    assert!(out_l[onset] != 0.0, "left tail missing at the shortest comb delay");

    assert!(out_l.iter().chain(&out_r).all(|s| s.is_finite()));

    let half_second = SAMPLE_RATE as usize / 2;
    let early = energy(&out_l[onset..onset + half_second]);
    let late = energy(&out_l[out_l.len() - half_second..]);
    assert!(early > 0.0);
    assert!(late < early * 0.1, "tail not decaying: early {early}, late {late}");
}

#[test]
fn processing_is_deterministic() {
    let input: Vec<f32> = (0..9000)
        .map(|i| libm::sinf(i as f32 * 0.031) * if i < 3000 { 0.8 } else { 0.0 })
        .collect();

    let build = || {
        let mut engine = ReverbEngine::with_config(
            EngineConfig::new(SAMPLE_RATE).with_predelay(PredelayMode::Crossfade),
        )
        .unwrap();
        engine.set_room_size(0.8);
        engine.set_predelay(0.01);
        engine.set_input_filter(4000.0, 3.0);
        engine
    };

    let (a_l, a_r) = render(&mut build(), &input);
    let (b_l, b_r) = render(&mut build(), &input);
    assert_eq!(a_l, b_l);
    assert_eq!(a_r, b_r);
}

#[test]
fn freeze_holds_energy_and_ignores_input() {
    let mut engine = ReverbEngine::new(SAMPLE_RATE);
    engine.set_room_size(0.8);
    render(&mut engine, &impulse_after(0, 4096));

    engine.set_mode(1.0);
    assert!(engine.is_frozen());

    let (first, _) = render(&mut engine, &vec![0.0; 24_000]);
    // Loud input while frozen barely enters the network.
    let (second, _) = render(&mut engine, &vec![0.9; 24_000]);
    let ratio = energy(&second) / energy(&first);
    assert!(
        (0.9..1.1).contains(&ratio),
        "frozen energy ratio {ratio}"
    );

    engine.set_mode(0.0);
    let (thawed, _) = render(&mut engine, &vec![0.0; 96_000]);
    assert!(energy(&thawed[72_000..]) < energy(&thawed[..24_000]) * 0.01);
}

#[test]
fn mute_in_freeze_changes_nothing() {
    let build = || {
        let mut engine = ReverbEngine::new(SAMPLE_RATE);
        render(&mut engine, &impulse_after(0, 6000));
        engine.set_mode(1.0);
        engine
    };
    let mut muted = build();
    let mut untouched = build();

    muted.mute();

    let silence = vec![0.0; 4096];
    assert_eq!(render(&mut muted, &silence), render(&mut untouched, &silence));
}

#[test]
fn mute_silences_normal_mode() {
    let mut engine = ReverbEngine::new(SAMPLE_RATE);
    render(&mut engine, &impulse_after(0, 6000));
    engine.mute();
    let (l, r) = render(&mut engine, &vec![0.0; 4096]);
    assert!(l.iter().chain(&r).all(|&s| s == 0.0));
}

#[test]
fn predelay_shifts_wet_output() {
    let tuning = Tuning::freeverb(2, 8000.0);
    let config = EngineConfig::new(8000.0)
        .with_tuning(tuning)
        .with_input_filter(None)
        .with_predelay(PredelayMode::Simple)
        .with_max_predelay_samples(800);

    let mut plain = ReverbEngine::with_config(config.clone()).unwrap();
    let mut delayed = ReverbEngine::with_config(config).unwrap();
    delayed.set_predelay(0.0125);
    let shift = 100; // round(0.0125 * 8000)
    assert_eq!(delayed.latency_samples(), shift);

    let input = impulse_after(10, 4000);
    let (ref_l, _) = render(&mut plain, &input);
    let (out_l, _) = render(&mut delayed, &input);

    assert!(out_l[..shift].iter().all(|&s| s == 0.0));
    assert_eq!(&out_l[shift..], &ref_l[..ref_l.len() - shift]);
}

#[test]
fn width_zero_is_mono() {
    let mut engine = ReverbEngine::new(SAMPLE_RATE);
    engine.set_width(0.0);
    let mut out_l = vec![0.0; 8000];
    let mut out_r = vec![0.0; 8000];
    let mut in_l = vec![0.0; 8000];
    in_l[0] = 1.0;
    let in_r = vec![0.0; 8000];
    engine.process(&in_l, &in_r, &mut out_l, &mut out_r, 8000, 1);
    for (l, r) in out_l.iter().zip(&out_r) {
        assert!((l - r).abs() < 1e-7);
    }
}

#[test]
fn dry_path_is_unfiltered() {
    let mut engine = ReverbEngine::new(SAMPLE_RATE);
    engine.set_wet(0.0);
    engine.set_dry(1.0);
    engine.set_input_filter(100.0, 0.0);
    let input: Vec<f32> = (0..1024).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
    let (out_l, out_r) = render(&mut engine, &input);
    assert_eq!(out_l, input);
    assert_eq!(out_r, input);
}

#[test]
fn factory_style_catalog_by_index() {
    let mut engine = ReverbEngine::new(SAMPLE_RATE);
    engine.set_catalog(vec![
        Preset::new("Default", ReverbParameters::DEFAULT),
        Preset::new(
            "Freeze",
            ReverbParameters {
                room_size: 1.0,
                damp: 0.0,
                mode: 1.0,
                ..ReverbParameters::DEFAULT
            },
        ),
    ]);
    assert!(engine.load_preset_by_index(1));
    assert!(engine.is_frozen());
    assert!(!engine.load_preset_by_index(7));
    assert!(engine.is_frozen());
}
