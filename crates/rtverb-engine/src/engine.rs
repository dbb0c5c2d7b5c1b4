//! The stereo reverb engine.
//!
//! Signal flow per frame:
//!
//! ```text
//!  inL ─→ [input filter] ─→ [predelay] ─┐
//!                                        (+)·gain ─┬─→ Σ combs L ─→ allpasses L ─┐
//!  inR ─→ [input filter] ─→ [predelay] ─┘          └─→ Σ combs R ─→ allpasses R ─┤
//!                                                                                  │
//!  outL = L·wet1 + R·wet2 + inL·dry                    wet1/wet2 cross-mix ←──────┘
//!  outR = R·wet1 + L·wet2 + inR·dry
//! ```
//!
//! Stages in brackets are optional and chosen at construction through
//! [`EngineConfig`]. Processing allocates nothing, takes no locks and never
//! fails; parameter changes from another thread arrive through the
//! [`PresetQueue`] and are applied at the start of the next block.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use rtverb_core::{
    AllpassFilter, CombFilter, CrossfadePredelay, FilterMode, InputFilter, PredelayLine,
    seconds_to_samples,
};

use crate::config::{EngineConfig, PredelayMode};
use crate::controller::{Coefficients, ParameterController};
use crate::error::EngineError;
use crate::mailbox::{PresetMailbox, PresetQueue};
use crate::params::{Preset, ReverbMode, ReverbParameters};

/// Catalog installed by [`ReverbEngine::new`] and [`ReverbEngine::with_config`].
pub const DEFAULT_CATALOG: &[Preset] = &[Preset::new("Default", ReverbParameters::DEFAULT)];

/// Per-channel predelay; `Bypass` costs nothing.
#[derive(Debug, Clone)]
enum PredelayStage {
    Bypass,
    Simple(PredelayLine),
    Crossfade(CrossfadePredelay),
}

impl PredelayStage {
    fn new(mode: PredelayMode, max_samples: usize, sample_rate: f32) -> Self {
        match mode {
            PredelayMode::Off => Self::Bypass,
            PredelayMode::Simple => Self::Simple(PredelayLine::new(max_samples)),
            PredelayMode::Crossfade => {
                Self::Crossfade(CrossfadePredelay::new(max_samples, sample_rate))
            }
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        match self {
            Self::Bypass => input,
            Self::Simple(line) => line.process(input),
            Self::Crossfade(line) => line.process(input),
        }
    }

    fn set_len(&mut self, samples: usize) {
        match self {
            Self::Bypass => {}
            Self::Simple(line) => {
                if line.len() != samples {
                    line.set_len(samples);
                }
            }
            Self::Crossfade(line) => {
                line.set_len(samples);
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Bypass => 0,
            Self::Simple(line) => line.len(),
            Self::Crossfade(line) => line.len(),
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if let Self::Crossfade(line) = self {
            line.set_sample_rate(sample_rate);
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Bypass => {}
            Self::Simple(line) => line.clear(),
            Self::Crossfade(line) => line.clear(),
        }
    }
}

/// Number of whole frames that fit in a slice of `len` elements read every
/// `stride` elements.
#[inline]
fn frames_in(len: usize, stride: usize) -> usize {
    if len == 0 { 0 } else { (len - 1) / stride + 1 }
}

/// Real-time stereo reverb on the Freeverb topology.
///
/// # Parameters
///
/// - `room_size`: 0.0-1.0, comb feedback (capped at 0.99 outside freeze)
/// - `damp`: 0.0-1.0, high-frequency absorption (0=bright, 1=dark)
/// - `wet` / `dry`: 0.0-1.0, output levels
/// - `width`: 0.0-1.0, stereo spread of the wet signal
/// - `mode`: ≥ 1.0 freezes the tail
/// - `predelay`: seconds, up to the configured capacity
/// - `cutoff` / `resonance`: input filter, Hz / dB
///
/// # Example
///
/// ```rust
/// use rtverb_engine::ReverbEngine;
///
/// let mut reverb = ReverbEngine::new(48000.0);
/// reverb.set_room_size(0.7);
/// reverb.set_damp(0.3);
/// reverb.set_wet(0.4);
/// reverb.set_dry(0.6);
///
/// let input = vec![0.5f32; 256];
/// let mut out_l = vec![0.0f32; 256];
/// let mut out_r = vec![0.0f32; 256];
/// reverb.process(&input, &input, &mut out_l, &mut out_r, 256, 1);
/// assert!(out_l.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug)]
pub struct ReverbEngine {
    sample_rate: f32,

    // Freeverb structure
    comb_left: Vec<CombFilter>,
    comb_right: Vec<CombFilter>,
    allpass_left: Vec<AllpassFilter>,
    allpass_right: Vec<AllpassFilter>,

    // Optional stages
    input_filter: Option<[InputFilter; 2]>,
    predelay: [PredelayStage; 2],
    predelay_mode: PredelayMode,
    max_predelay_samples: usize,

    controller: ParameterController,

    // Preset handoff
    mailbox: Arc<PresetMailbox>,
    last_sequence: u32,
    catalog: Arc<[Preset]>,
}

impl ReverbEngine {
    /// Create an engine with the default configuration at `sample_rate`.
    ///
    /// An unusable sample rate (zero, negative, not finite) falls back to
    /// [`DEFAULT_SAMPLE_RATE`](crate::DEFAULT_SAMPLE_RATE).
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            crate::config::DEFAULT_SAMPLE_RATE
        };
        // The default configuration at a valid rate always validates.
        Self::build(EngineConfig::new(sample_rate))
    }

    /// Create an engine from an explicit configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let EngineConfig {
            sample_rate,
            tuning,
            input_filter,
            predelay,
            max_predelay_samples,
        } = config;

        let combs = |lengths: &[usize]| -> Vec<CombFilter> {
            lengths.iter().map(|&n| CombFilter::new(n)).collect()
        };
        let allpasses = |lengths: &[usize]| -> Vec<AllpassFilter> {
            lengths.iter().map(|&n| AllpassFilter::new(n)).collect()
        };

        let params = ReverbParameters::DEFAULT;
        let input_filter = input_filter.map(|mode| {
            core::array::from_fn(|_| {
                let mut filter = InputFilter::new(mode, sample_rate);
                filter.set_params(params.cutoff, params.resonance);
                // Re-arm so the initial request is designed without smoothing.
                filter.reset(mode, sample_rate);
                filter
            })
        });

        let mut engine = Self {
            sample_rate,
            comb_left: combs(&tuning.comb_left),
            comb_right: combs(&tuning.comb_right),
            allpass_left: allpasses(&tuning.allpass_left),
            allpass_right: allpasses(&tuning.allpass_right),
            input_filter,
            predelay: core::array::from_fn(|_| {
                PredelayStage::new(predelay, max_predelay_samples, sample_rate)
            }),
            predelay_mode: predelay,
            max_predelay_samples,
            controller: ParameterController::new(params),
            mailbox: Arc::new(PresetMailbox::new()),
            last_sequence: 0,
            catalog: Arc::from(DEFAULT_CATALOG),
        };

        engine.mute();
        engine.apply_parameters(&params);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            combs = engine.comb_left.len(),
            allpasses = engine.allpass_left.len(),
            input_filter = ?engine.input_filter_mode(),
            predelay = ?predelay,
            "reverb engine created"
        );

        engine
    }

    // ------------------------------------------------------------------
    // Processing
    // ------------------------------------------------------------------

    /// Process `sample_count` frames of strided stereo audio.
    ///
    /// Frame `i` is read from `in_left[i * stride]` / `in_right[i * stride]`
    /// and written to the same positions of the outputs, so planar buffers use
    /// `stride = 1` and any layout with a fixed step works without copying.
    /// A `stride` of 0 is treated as 1. The count is limited to the frames that
    /// fit in every slice; samples outside those frames are left untouched.
    pub fn process(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
        sample_count: usize,
        stride: usize,
    ) {
        self.begin_block();

        let stride = stride.max(1);
        let frames = sample_count
            .min(frames_in(in_left.len(), stride))
            .min(frames_in(in_right.len(), stride))
            .min(frames_in(out_left.len(), stride))
            .min(frames_in(out_right.len(), stride));

        let coefficients = *self.controller.coefficients();
        for i in 0..frames {
            let idx = i * stride;
            let (l, r) = self.process_frame(&coefficients, in_left[idx], in_right[idx]);
            out_left[idx] = l;
            out_right[idx] = r;
        }
    }

    /// Process LR-interleaved frames.
    ///
    /// Handles as many whole frames as both slices hold.
    pub fn process_interleaved(&mut self, input: &[f32], output: &mut [f32]) {
        self.begin_block();

        let coefficients = *self.controller.coefficients();
        for (frame_in, frame_out) in input.chunks_exact(2).zip(output.chunks_exact_mut(2)) {
            let (l, r) = self.process_frame(&coefficients, frame_in[0], frame_in[1]);
            frame_out[0] = l;
            frame_out[1] = r;
        }
    }

    /// Take a pending preset, then advance input filter smoothing one step.
    fn begin_block(&mut self) {
        if let Some((sequence, params)) = self.mailbox.try_take(self.last_sequence) {
            self.last_sequence = sequence;
            self.apply_parameters(&params);
        }
        if let Some(filters) = &mut self.input_filter {
            for filter in filters {
                filter.update_coefficients();
            }
        }
    }

    #[inline]
    fn process_frame(&mut self, c: &Coefficients, in_l: f32, in_r: f32) -> (f32, f32) {
        let (mut l, mut r) = (in_l, in_r);

        if let Some([filter_l, filter_r]) = &mut self.input_filter {
            l = filter_l.process(l);
            r = filter_r.process(r);
        }

        l = self.predelay[0].process(l);
        r = self.predelay[1].process(r);

        let input = (l + r) * c.gain;

        let mut acc_l = 0.0;
        for comb in &mut self.comb_left {
            acc_l += comb.process(input);
        }
        let mut acc_r = 0.0;
        for comb in &mut self.comb_right {
            acc_r += comb.process(input);
        }

        for allpass in &mut self.allpass_left {
            acc_l = allpass.process(acc_l);
        }
        for allpass in &mut self.allpass_right {
            acc_r = allpass.process(acc_r);
        }

        (
            acc_l * c.wet1 + acc_r * c.wet2 + in_l * c.dry,
            acc_r * c.wet1 + acc_l * c.wet2 + in_r * c.dry,
        )
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Push the controller's coefficients into every comb.
    fn push_coefficients(&mut self) {
        let c = *self.controller.coefficients();
        for comb in self.comb_left.iter_mut().chain(self.comb_right.iter_mut()) {
            comb.set_feedback(c.feedback);
            comb.set_damp(c.damp);
        }
    }

    /// Apply every parameter. Allocation-free; used on the audio thread too.
    fn apply_parameters(&mut self, params: &ReverbParameters) {
        self.controller.set_all(params);
        self.push_coefficients();
        let p = *self.controller.parameters();
        self.set_predelay(p.predelay);
        self.set_input_filter(p.cutoff, p.resonance);
    }

    /// Set the room size (0.0 to 1.0).
    pub fn set_room_size(&mut self, value: f32) {
        self.controller.set_room_size(value);
        self.push_coefficients();
    }

    /// Get the current room size.
    pub fn room_size(&self) -> f32 {
        self.controller.parameters().room_size
    }

    /// Set the damping amount (0.0 to 1.0).
    pub fn set_damp(&mut self, value: f32) {
        self.controller.set_damp(value);
        self.push_coefficients();
    }

    /// Get the current damping value.
    pub fn damp(&self) -> f32 {
        self.controller.parameters().damp
    }

    /// Set the wet level (0.0 to 1.0).
    pub fn set_wet(&mut self, value: f32) {
        self.controller.set_wet(value);
    }

    /// Get the current wet level.
    pub fn wet(&self) -> f32 {
        self.controller.parameters().wet
    }

    /// Set the dry level (0.0 to 1.0).
    pub fn set_dry(&mut self, value: f32) {
        self.controller.set_dry(value);
    }

    /// Get the current dry level.
    pub fn dry(&self) -> f32 {
        self.controller.parameters().dry
    }

    /// Set the stereo width (0.0 to 1.0).
    pub fn set_width(&mut self, value: f32) {
        self.controller.set_width(value);
    }

    /// Get the current width.
    pub fn width(&self) -> f32 {
        self.controller.parameters().width
    }

    /// Set the mode value; 1.0 and above freezes the tail.
    pub fn set_mode(&mut self, value: f32) {
        self.controller.set_mode(value);
        self.push_coefficients();
    }

    /// Get the current mode value.
    pub fn mode(&self) -> f32 {
        self.controller.parameters().mode
    }

    /// Set the predelay in seconds.
    ///
    /// Clamped to `[0, max_predelay_samples / sample_rate]`; the line length
    /// is `round(seconds · sample_rate)` samples. Without a predelay stage the
    /// value is only recorded.
    pub fn set_predelay(&mut self, seconds: f32) {
        let max_seconds = self.max_predelay_samples as f32 / self.sample_rate;
        let seconds = if seconds.is_finite() {
            seconds.clamp(0.0, max_seconds)
        } else {
            0.0
        };
        self.controller.set_predelay(seconds);

        let samples =
            seconds_to_samples(seconds, self.sample_rate).min(self.max_predelay_samples);
        for stage in &mut self.predelay {
            stage.set_len(samples);
        }
    }

    /// Get the current predelay in seconds.
    pub fn predelay(&self) -> f32 {
        self.controller.parameters().predelay
    }

    /// Request input filter cutoff (Hz, floored at 10) and resonance (dB).
    ///
    /// The applied values approach the request by at most ×1.2 and 1 dB per
    /// call or processing block.
    pub fn set_input_filter(&mut self, cutoff_hz: f32, resonance_db: f32) {
        self.controller.set_input_filter(cutoff_hz, resonance_db);
        let p = *self.controller.parameters();
        if let Some(filters) = &mut self.input_filter {
            for filter in filters {
                filter.set_params(p.cutoff, p.resonance);
            }
        }
    }

    /// Get the requested input filter cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.controller.parameters().cutoff
    }

    /// Get the requested input filter resonance in dB.
    pub fn resonance(&self) -> f32 {
        self.controller.parameters().resonance
    }

    /// Change the sample rate.
    ///
    /// The input filter is redesigned for the new rate, the predelay length is
    /// recomputed from its duration and the crossfade window is resized.
    /// Comb and allpass buffers keep their lengths.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate(sample_rate));
        }
        self.sample_rate = sample_rate;

        if let Some(filters) = &mut self.input_filter {
            for filter in filters {
                filter.reset(filter.mode(), sample_rate);
            }
        }
        for stage in &mut self.predelay {
            stage.set_sample_rate(sample_rate);
        }
        let predelay = self.predelay();
        self.set_predelay(predelay);

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "reverb sample rate changed");
        Ok(())
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// All current parameter values.
    pub fn parameters(&self) -> &ReverbParameters {
        self.controller.parameters()
    }

    /// Coefficients derived from the current parameters.
    pub fn coefficients(&self) -> &Coefficients {
        self.controller.coefficients()
    }

    /// Operating mode derived from the mode value.
    pub fn reverb_mode(&self) -> ReverbMode {
        self.controller.mode()
    }

    /// Returns `true` while the tail is frozen.
    pub fn is_frozen(&self) -> bool {
        self.reverb_mode() == ReverbMode::Freeze
    }

    // ------------------------------------------------------------------
    // Presets
    // ------------------------------------------------------------------

    /// Apply a preset immediately. Call from the thread that owns the engine.
    pub fn apply_preset(&mut self, preset: &Preset) {
        #[cfg(feature = "tracing")]
        tracing::debug!(preset = %preset.name, "applying reverb preset");
        self.apply_parameters(&preset.parameters);
    }

    /// Queue a preset for the start of the next processing block.
    ///
    /// A preset queued before the previous one was taken replaces it.
    pub fn queue_preset(&self, preset: &Preset) {
        self.mailbox.publish(&preset.parameters);
    }

    /// Queue raw parameter values for the start of the next processing block.
    pub fn queue_parameters(&self, params: &ReverbParameters) {
        self.mailbox.publish(params);
    }

    /// Producer handle for queueing presets from other threads.
    pub fn preset_queue(&self) -> PresetQueue {
        PresetQueue::new(Arc::clone(&self.mailbox))
    }

    /// Returns `true` if a queued preset has not been taken yet.
    pub fn has_pending_preset(&self) -> bool {
        self.mailbox.has_pending(self.last_sequence)
    }

    /// Apply the catalog entry at `index`.
    ///
    /// Out-of-range indices change nothing and return `false`.
    pub fn load_preset_by_index(&mut self, index: usize) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let Some(preset) = catalog.get(index) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(index, len = catalog.len(), "preset index out of range");
            return false;
        };
        self.apply_preset(preset);
        true
    }

    /// Apply [`ReverbParameters::DEFAULT`].
    pub fn load_default_preset(&mut self) {
        self.apply_parameters(&ReverbParameters::DEFAULT);
    }

    /// Replace the preset catalog.
    pub fn set_catalog(&mut self, catalog: impl Into<Arc<[Preset]>>) {
        self.catalog = catalog.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(presets = self.catalog.len(), "reverb preset catalog replaced");
    }

    /// Current preset catalog.
    pub fn catalog(&self) -> &[Preset] {
        &self.catalog
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Zero every buffer and filter history.
    ///
    /// Does nothing while frozen. Filter coefficients are kept.
    pub fn mute(&mut self) {
        if self.is_frozen() {
            return;
        }
        for comb in self.comb_left.iter_mut().chain(self.comb_right.iter_mut()) {
            comb.mute();
        }
        for allpass in self
            .allpass_left
            .iter_mut()
            .chain(self.allpass_right.iter_mut())
        {
            allpass.mute();
        }
        for stage in &mut self.predelay {
            stage.clear();
        }
        if let Some(filters) = &mut self.input_filter {
            for filter in filters {
                filter.clear();
            }
        }
    }

    /// Delay added by the predelay stage, in samples.
    pub fn latency_samples(&self) -> usize {
        self.predelay[0].len()
    }

    /// Combs per channel.
    pub fn num_combs(&self) -> usize {
        self.comb_left.len()
    }

    /// Input filter response, if the stage is present.
    pub fn input_filter_mode(&self) -> Option<FilterMode> {
        self.input_filter.as_ref().map(|[filter, _]| filter.mode())
    }

    /// Cutoff the input filter currently applies, if the stage is present.
    pub fn applied_cutoff(&self) -> Option<f32> {
        self.input_filter
            .as_ref()
            .map(|[filter, _]| filter.applied_cutoff())
    }

    /// Predelay stage selected at construction.
    pub fn predelay_mode(&self) -> PredelayMode {
        self.predelay_mode
    }
}
