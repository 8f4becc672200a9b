//! Frame-rate scaling helpers.
//!
//! Per-frame tuning constants are expressed against a 60 Hz reference
//! frame. These helpers convert them for an arbitrary `dt` so that motion
//! is the same at any display refresh rate.

pub const REFERENCE_HZ: f32 = 60.0;

/// Number of reference frames covered by `dt` seconds.
#[inline]
pub fn reference_frames(dt: f32) -> f32 {
    dt.max(0.0) * REFERENCE_HZ
}

/// Blend factor equivalent to applying `blend` once per reference frame,
/// `frames` times. Zero frames gives zero.
#[inline]
pub fn frame_blend(blend: f32, frames: f32) -> f32 {
    1.0 - (1.0 - blend.clamp(0.0, 1.0)).powf(frames)
}

/// `factor` applied once per reference frame, `frames` times.
#[inline]
pub fn frame_decay(factor: f32, frames: f32) -> f32 {
    factor.powf(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_reference_frame_is_identity() {
        assert!((reference_frames(1.0 / 60.0) - 1.0).abs() < 1e-6);
        assert!((frame_blend(0.1, 1.0) - 0.1).abs() < 1e-6);
        assert!((frame_decay(0.98, 1.0) - 0.98).abs() < 1e-6);
    }

    #[test]
    fn zero_time_changes_nothing() {
        assert_eq!(reference_frames(0.0), 0.0);
        assert_eq!(frame_blend(0.3, 0.0), 0.0);
        assert_eq!(frame_decay(0.5, 0.0), 1.0);
    }

    #[test]
    fn two_half_frames_equal_one_frame() {
        let half = frame_decay(0.9, 0.5);
        assert!((half * half - 0.9).abs() < 1e-6);
        let b = frame_blend(0.2, 0.5);
        let remaining = (1.0 - b) * (1.0 - b);
        assert!((remaining - 0.8).abs() < 1e-6);
    }

    #[test]
    fn negative_dt_is_ignored() {
        assert_eq!(reference_frames(-1.0), 0.0);
    }
}
