use super::profile::LidarProfile;

/// Readings with a smaller magnitude than this are "no laser return".
pub const NO_RETURN_EPSILON: f32 = 1e-9;

// ---------------------------------------------------------------------------
// Clip-and-normalize
// ---------------------------------------------------------------------------

/// Clip one raw range to the profile's detection window and map it onto
/// `[-1, 1]`.
///
/// * `|v| < 1e-9`  → no return, becomes the `norm_r` sentinel
/// * `v < min_r`   → too close, becomes `0`
/// * `v > max_r`   → out of range, becomes the `norm_r` sentinel
///
/// then `v * (2 / norm_r) - 1`, so the sentinel lands exactly on `+1` and a
/// zeroed reading on `-1`. The no-return check must come before the
/// too-close check, otherwise a literal `0.0` reading would be zeroed.
#[inline]
pub fn normalize_range(v: f32, profile: &LidarProfile) -> f32 {
    // The sentinel is emitted as +1 directly: norm_r * (2 / norm_r) - 1 is
    // not exactly 1 in f32 for every norm_r.
    if v.abs() < NO_RETURN_EPSILON {
        1.0
    } else if v < profile.min_range {
        -1.0
    } else if v > profile.max_range {
        1.0
    } else {
        v * (2.0 / profile.normalization_range) - 1.0
    }
}

/// Apply [`normalize_range`] to every value of an exclusively borrowed
/// buffer.
pub fn clip_and_normalize(values: &mut [f32], profile: &LidarProfile) {
    for v in values.iter_mut() {
        *v = normalize_range(*v, profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> LidarProfile {
        LidarProfile::new(16, 1024, 1.0, 80.0, 100.0)
    }

    #[test]
    fn no_return_and_out_of_range_share_the_sentinel() {
        let p = profile();
        let no_return = normalize_range(0.0, &p);
        let tiny = normalize_range(5e-10, &p);
        let far = normalize_range(p.max_range + 1.0, &p);
        assert_eq!(no_return, 1.0);
        assert_eq!(tiny, 1.0);
        assert_eq!(far, 1.0);
    }

    #[test]
    fn too_close_maps_to_minus_one() {
        let p = profile();
        assert_eq!(normalize_range(0.5, &p), -1.0);
        assert_eq!(normalize_range(-3.0, &p), -1.0);
    }

    #[test]
    fn in_range_values_scale_linearly() {
        let p = profile();
        for v in [1.0f32, 2.5, 10.0, 42.0, 79.99] {
            let out = normalize_range(v, &p);
            assert_eq!(out, v * (2.0 / p.normalization_range) - 1.0);
            assert!((-1.0..1.0).contains(&out), "{v} -> {out}");
        }
        // max_r itself is kept, not clipped
        assert_eq!(normalize_range(80.0, &p), 80.0 * (2.0 / 100.0) - 1.0);
    }

    #[test]
    fn preserves_order_inside_window() {
        let p = profile();
        let samples: Vec<f32> = (0..200).map(|i| 1.0 + i as f32 * 0.395).collect();
        let mapped: Vec<f32> = samples.iter().map(|&v| normalize_range(v, &p)).collect();
        assert!(mapped.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn buffer_transform_matches_scalar() {
        let p = profile();
        let raw = [0.0f32, 0.2, 1.0, 50.0, 80.0, 81.0, 1e6];
        let mut buf = raw;
        clip_and_normalize(&mut buf, &p);
        for (r, b) in raw.iter().zip(buf.iter()) {
            assert_eq!(normalize_range(*r, &p), *b);
        }
    }
}
