//! Small numeric helpers shared by the reverb primitives.
//!
//! All functions are allocation-free, branch-light and `no_std` compatible.
//!
//! - [`flush_denormal`] - Zero out values that would decay into subnormals
//! - [`db_to_factor`] - Resonance dB to linear Q conversion used by the input filter
//! - [`stereo_wet_gains`] - Width-dependent wet gains for a dual-mono filter bank
//! - [`crossfade`] - Linear blend between two signals

use libm::exp2f;

/// `log2(10) / 20`: converts decibels to a base-2 exponent.
pub const DB_TO_EXP2: f32 = 0.166_096_404_744_368;

/// Flush a value to zero once it falls below the audible floor.
///
/// Feedback paths that decay towards silence otherwise end up producing
/// IEEE 754 subnormals, which are dramatically slower on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Convert a level in decibels to a linear factor.
///
/// Computed as `2^(db · log2(10)/20)`, which is the same curve as
/// `10^(db/20)` but maps onto a single `exp2`.
///
/// # Example
/// ```rust
/// use rtverb_core::db_to_factor;
///
/// assert!((db_to_factor(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_factor(6.0206) - 2.0).abs() < 1e-3);
/// ```
#[inline]
pub fn db_to_factor(db: f32) -> f32 {
    exp2f(db * DB_TO_EXP2)
}

/// Wet gains for the direct and cross-fed channel of a stereo reverb.
///
/// Returns `(wet1, wet2)` with `wet1 = wet · (width/2 + 0.5)` and
/// `wet2 = wet · (1 − width)/2`. At full width the channels stay separate,
/// at zero width both outputs receive the same mono blend.
#[inline]
pub fn stereo_wet_gains(wet: f32, width: f32) -> (f32, f32) {
    (wet * (width / 2.0 + 0.5), wet * ((1.0 - width) / 2.0))
}

/// Linear crossfade: `from · fade + to · (1 − fade)`.
///
/// `fade` runs from 1.0 (all `from`) down to 0.0 (all `to`).
#[inline]
pub fn crossfade(from: f32, to: f32, fade: f32) -> f32 {
    from * fade + to * (1.0 - fade)
}
