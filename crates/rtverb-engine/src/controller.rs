//! Parameter state and the coefficients derived from it.

use rtverb_core::stereo_wet_gains;

use crate::params::{FIXED_GAIN, FREEZE_GAIN, MAX_FEEDBACK, ReverbMode, ReverbParameters};

/// Values the processing loop actually multiplies by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Comb feedback gain.
    pub feedback: f32,
    /// Comb damping.
    pub damp: f32,
    /// Input gain into the comb bank.
    pub gain: f32,
    /// Wet gain of the same-side channel.
    pub wet1: f32,
    /// Wet gain of the opposite channel.
    pub wet2: f32,
    /// Dry gain.
    pub dry: f32,
}

impl Coefficients {
    /// Derive coefficients from (already clamped) parameters.
    pub fn derive(params: &ReverbParameters) -> Self {
        let (wet1, wet2) = stereo_wet_gains(params.wet, params.width);
        match params.reverb_mode() {
            ReverbMode::Freeze => Self {
                feedback: 1.0,
                damp: 0.0,
                gain: FREEZE_GAIN,
                wet1,
                wet2,
                dry: params.dry,
            },
            ReverbMode::Normal => Self {
                feedback: params.room_size.min(MAX_FEEDBACK),
                damp: params.damp,
                gain: FIXED_GAIN,
                wet1,
                wet2,
                dry: params.dry,
            },
        }
    }
}

/// Holds the current [`ReverbParameters`] and keeps [`Coefficients`] in sync.
///
/// Every setter clamps its input (non-finite values fall back to the
/// defaults) and recomputes the coefficients, so the filter network never
/// sees an unstable feedback value outside freeze.
#[derive(Debug, Clone)]
pub struct ParameterController {
    params: ReverbParameters,
    coefficients: Coefficients,
}

impl ParameterController {
    /// Controller starting from `params` (clamped).
    pub fn new(params: ReverbParameters) -> Self {
        let params = params.clamped();
        Self {
            params,
            coefficients: Coefficients::derive(&params),
        }
    }

    /// Current parameters.
    pub fn parameters(&self) -> &ReverbParameters {
        &self.params
    }

    /// Current derived coefficients.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Current operating mode.
    pub fn mode(&self) -> ReverbMode {
        self.params.reverb_mode()
    }

    /// Replace every parameter at once.
    pub fn set_all(&mut self, params: &ReverbParameters) {
        self.params = *params;
        self.commit();
    }

    /// Set room size, 0.0 to 1.0.
    pub fn set_room_size(&mut self, value: f32) {
        self.params.room_size = value;
        self.commit();
    }

    /// Set damping, 0.0 to 1.0.
    pub fn set_damp(&mut self, value: f32) {
        self.params.damp = value;
        self.commit();
    }

    /// Set wet level, 0.0 to 1.0.
    pub fn set_wet(&mut self, value: f32) {
        self.params.wet = value;
        self.commit();
    }

    /// Set dry level, 0.0 to 1.0.
    pub fn set_dry(&mut self, value: f32) {
        self.params.dry = value;
        self.commit();
    }

    /// Set stereo width, 0.0 to 1.0.
    pub fn set_width(&mut self, value: f32) {
        self.params.width = value;
        self.commit();
    }

    /// Set the mode value; 1.0 and above freezes.
    pub fn set_mode(&mut self, value: f32) {
        self.params.mode = value;
        self.commit();
    }

    /// Set the predelay in seconds (no coefficient depends on it).
    pub fn set_predelay(&mut self, seconds: f32) {
        self.params.predelay = seconds;
        self.commit();
    }

    /// Set the input filter request (no coefficient depends on it).
    pub fn set_input_filter(&mut self, cutoff_hz: f32, resonance_db: f32) {
        self.params.cutoff = cutoff_hz;
        self.params.resonance = resonance_db;
        self.commit();
    }

    fn commit(&mut self) {
        self.params = self.params.clamped();
        self.coefficients = Coefficients::derive(&self.params);
    }
}

impl Default for ParameterController {
    fn default() -> Self {
        Self::new(ReverbParameters::DEFAULT)
    }
}
