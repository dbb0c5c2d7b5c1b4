//! Reverb parameter set, presets and operating mode.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::borrow::Cow;

use rtverb_core::MIN_CUTOFF_HZ;

/// Input gain applied to the comb bank in normal mode.
pub const FIXED_GAIN: f32 = 0.015;

/// Input gain applied while frozen.
///
/// Near zero but never exactly zero, so the network keeps seeing normal floats.
pub const FREEZE_GAIN: f32 = 1.0e-9;

/// Upper bound of the comb feedback outside freeze.
pub const MAX_FEEDBACK: f32 = 0.99;

/// Mode values at or above this threshold select [`ReverbMode::Freeze`].
pub const FREEZE_THRESHOLD: f32 = 1.0;

/// Operating mode derived from the `mode` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbMode {
    /// The tail decays according to room size and damping.
    #[default]
    Normal,
    /// The tail sustains indefinitely and no new input enters the network.
    Freeze,
}

impl ReverbMode {
    /// Derive the mode from the raw parameter value.
    #[inline]
    pub fn from_value(mode: f32) -> Self {
        if mode >= FREEZE_THRESHOLD {
            Self::Freeze
        } else {
            Self::Normal
        }
    }

    /// Canonical parameter value for this mode.
    pub fn value(self) -> f32 {
        match self {
            Self::Normal => 0.0,
            Self::Freeze => 1.0,
        }
    }
}

/// Complete set of user-facing reverb parameters.
///
/// | Field | Range | Meaning |
/// |-------|-------|---------|
/// | `room_size` | 0.0–1.0 | comb feedback (capped at 0.99 outside freeze) |
/// | `damp` | 0.0–1.0 | high-frequency absorption in the feedback path |
/// | `wet` | 0.0–1.0 | reverb output level |
/// | `dry` | 0.0–1.0 | direct signal level |
/// | `width` | 0.0–1.0 | stereo spread of the wet signal |
/// | `mode` | ≥ 0.0 | ≥ 1.0 freezes the tail |
/// | `predelay` | ≥ 0.0 s | gap before the reverb starts |
/// | `cutoff` | ≥ 10 Hz | input filter cutoff |
/// | `resonance` | dB | input filter resonance |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Room size, 0.0 to 1.0.
    pub room_size: f32,
    /// Damping, 0.0 (bright) to 1.0 (dark).
    pub damp: f32,
    /// Wet level, 0.0 to 1.0.
    pub wet: f32,
    /// Dry level, 0.0 to 1.0.
    pub dry: f32,
    /// Stereo width, 0.0 (mono) to 1.0 (full).
    pub width: f32,
    /// Mode value, see [`ReverbMode::from_value`].
    pub mode: f32,
    /// Predelay in seconds.
    pub predelay: f32,
    /// Input filter cutoff in Hz.
    pub cutoff: f32,
    /// Input filter resonance in dB.
    pub resonance: f32,
}

impl ReverbParameters {
    /// Medium room, fully wet.
    pub const DEFAULT: Self = Self {
        room_size: 0.5,
        damp: 0.5,
        wet: 1.0,
        dry: 0.0,
        width: 1.0,
        mode: 0.0,
        predelay: 0.0,
        cutoff: 8000.0,
        resonance: 0.5,
    };

    /// Copy with every field clamped to its documented range.
    ///
    /// Non-finite values fall back to the corresponding [`DEFAULT`](Self::DEFAULT) field.
    pub fn clamped(&self) -> Self {
        fn finite_or(value: f32, fallback: f32) -> f32 {
            if value.is_finite() { value } else { fallback }
        }
        let d = Self::DEFAULT;
        Self {
            room_size: finite_or(self.room_size, d.room_size).clamp(0.0, 1.0),
            damp: finite_or(self.damp, d.damp).clamp(0.0, 1.0),
            wet: finite_or(self.wet, d.wet).clamp(0.0, 1.0),
            dry: finite_or(self.dry, d.dry).clamp(0.0, 1.0),
            width: finite_or(self.width, d.width).clamp(0.0, 1.0),
            mode: finite_or(self.mode, d.mode).max(0.0),
            predelay: finite_or(self.predelay, d.predelay).max(0.0),
            cutoff: finite_or(self.cutoff, d.cutoff).max(MIN_CUTOFF_HZ),
            resonance: finite_or(self.resonance, d.resonance),
        }
    }

    /// Mode selected by the `mode` field.
    pub fn reverb_mode(&self) -> ReverbMode {
        ReverbMode::from_value(self.mode)
    }

    /// Fields in declaration order.
    pub fn to_array(&self) -> [f32; 9] {
        [
            self.room_size,
            self.damp,
            self.wet,
            self.dry,
            self.width,
            self.mode,
            self.predelay,
            self.cutoff,
            self.resonance,
        ]
    }

    /// Inverse of [`to_array`](Self::to_array).
    pub fn from_array(values: [f32; 9]) -> Self {
        let [
            room_size,
            damp,
            wet,
            dry,
            width,
            mode,
            predelay,
            cutoff,
            resonance,
        ] = values;
        Self {
            room_size,
            damp,
            wet,
            dry,
            width,
            mode,
            predelay,
            cutoff,
            resonance,
        }
    }
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Named, immutable parameter snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Display name.
    pub name: Cow<'static, str>,
    /// Parameter values.
    pub parameters: ReverbParameters,
}

impl Preset {
    /// Preset with a static name, usable in `const` catalogs.
    pub const fn new(name: &'static str, parameters: ReverbParameters) -> Self {
        Self {
            name: Cow::Borrowed(name),
            parameters,
        }
    }

    /// Preset with a name decided at runtime (e.g. read from a file).
    pub fn named(name: impl Into<Cow<'static, str>>, parameters: ReverbParameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}
