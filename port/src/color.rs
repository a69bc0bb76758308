/// Color conversion utilities for sRGB, linear RGB, LMS, HSV and HSL.
///
/// Channel values are normalized to 0-1 unless stated otherwise. Hue is in
/// degrees, 0 <= h < 360.

// Linear RGB to LMS cone space
pub const RGB_TO_LMS: [[f64; 3]; 3] = [
    [0.31399, 0.639513, 0.046497],
    [0.155372, 0.757894, 0.086701],
    [0.017752, 0.109442, 0.872569],
];

// LMS to linear RGB (inverse of above)
pub const LMS_TO_RGB: [[f64; 3]; 3] = [
    [5.47221206, -4.6419601, 0.16963708],
    [-1.1252419, 2.29317094, -0.1678952],
    [0.02980165, -0.19318073, 1.16364789],
];

/// Clamp to the unit interval. NaN maps to 0.
#[inline]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Wrap a hue in degrees into [0, 360)
#[inline]
pub fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert sRGB value (0-1) to linear RGB
#[inline]
pub fn srgb_to_linear_single(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert linear RGB value (0-1) to sRGB.
/// Negative input (out of gamut after LMS compensation) encodes as 0.
#[inline]
pub fn linear_to_srgb_single(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear.max(0.0) * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert an 8-bit sRGB channel to linear RGB
#[inline]
pub fn srgb_u8_to_linear(value: u8) -> f64 {
    srgb_to_linear_single(value as f64 / 255.0)
}

#[inline]
fn mat3_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Convert linear RGB to LMS cone responses
#[inline]
pub fn linear_rgb_to_lms(rgb: [f64; 3]) -> [f64; 3] {
    mat3_mul(&RGB_TO_LMS, rgb)
}

/// Convert LMS cone responses to linear RGB (may leave 0-1 for scaled input)
#[inline]
pub fn lms_to_linear_rgb(lms: [f64; 3]) -> [f64; 3] {
    mat3_mul(&LMS_TO_RGB, lms)
}

// ============== HSV ==============

/// Convert RGB (0-1) to HSV.
/// Returns (h, s, v) with h in degrees. Achromatic input yields h = 0, s = 0.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = 0.0;
    if delta != 0.0 {
        h = if max == r {
            ((g - b) / delta) % 6.0
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }
    }

    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

/// Convert HSV to RGB (0-1). Hue outside [0, 360) is wrapped first.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let h = wrap_hue(h);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = sector_rgb(h, c, x);
    (r + m, g + m, b + m)
}

// ============== HSL ==============

/// Convert RGB (0-1) to HSL. Returns (h, s, l) with h in degrees, s and l in 0-1.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}

/// Convert HSL (s and l in 0-1) to RGB (0-1)
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = wrap_hue(h);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = sector_rgb(h, c, x);
    (r + m, g + m, b + m)
}

/// Chroma/intermediate placement for the six 60-degree hue sectors
#[inline]
fn sector_rgb(h: f64, c: f64, x: f64) -> (f64, f64, f64) {
    if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_linear_roundtrip() {
        let test_values = [0.0, 0.04045, 0.1, 0.5, 1.0];
        for &v in &test_values {
            let linear = srgb_to_linear_single(v);
            let back = linear_to_srgb_single(linear);
            assert!((v - back).abs() < 1e-6, "Failed at {}: got {}", v, back);
        }
    }

    #[test]
    fn test_negative_linear_encodes_to_zero() {
        assert_eq!(linear_to_srgb_single(-0.25), 0.0);
        assert!(!linear_to_srgb_single(-1e-12).is_nan());
    }

    #[test]
    fn test_lms_roundtrip() {
        let test_rgb = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.5, 0.3, 0.7], [0.2, 0.8, 0.4]];
        for rgb in test_rgb {
            let lms = linear_rgb_to_lms(rgb);
            let back = lms_to_linear_rgb(lms);
            for c in 0..3 {
                assert!((rgb[c] - back[c]).abs() < 1e-5, "channel {} failed: {} vs {}", c, rgb[c], back[c]);
            }
        }
    }

    #[test]
    fn test_hsv_primaries() {
        let (h, s, v) = rgb_to_hsv(1.0, 0.0, 0.0);
        assert_eq!((h, s, v), (0.0, 1.0, 1.0));
        let (h, _, _) = rgb_to_hsv(0.0, 1.0, 0.0);
        assert!((h - 120.0).abs() < 1e-9);
        let (h, _, _) = rgb_to_hsv(0.0, 0.0, 1.0);
        assert!((h - 240.0).abs() < 1e-9);
        let (h, _, _) = rgb_to_hsv(1.0, 0.0, 1.0 / 6.0);
        assert!((h - 350.0).abs() < 1e-9, "got {}", h);
    }

    #[test]
    fn test_hsv_roundtrip() {
        let test_rgb = [(0.0, 0.0, 0.0), (1.0, 1.0, 1.0), (0.5, 0.3, 0.7), (0.9, 0.1, 0.2)];
        for (r, g, b) in test_rgb {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!((r - r2).abs() < 1e-9, "R failed: {} vs {}", r, r2);
            assert!((g - g2).abs() < 1e-9, "G failed: {} vs {}", g, g2);
            assert!((b - b2).abs() < 1e-9, "B failed: {} vs {}", b, b2);
        }
    }

    #[test]
    fn test_hsl_roundtrip() {
        let test_rgb = [(0.2, 0.2, 0.2), (0.5, 0.3, 0.7), (0.9, 0.1, 0.2), (0.1, 0.9, 0.6)];
        for (r, g, b) in test_rgb {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = hsl_to_rgb(h, s, l);
            assert!((r - r2).abs() < 1e-9, "R failed: {} vs {}", r, r2);
            assert!((g - g2).abs() < 1e-9, "G failed: {} vs {}", g, g2);
            assert!((b - b2).abs() < 1e-9, "B failed: {} vs {}", b, b2);
        }
    }

    #[test]
    fn test_wrap_hue() {
        assert_eq!(wrap_hue(370.0), 10.0);
        assert_eq!(wrap_hue(-10.0), 350.0);
        assert_eq!(wrap_hue(360.0), 0.0);
        assert!(wrap_hue(-1e-20) < 360.0);
    }

    #[test]
    fn test_clamp01_nan() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(-0.5), 0.0);
    }
}
