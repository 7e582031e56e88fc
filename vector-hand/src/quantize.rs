//! Compact numeric encodings used by the compact layout

use glam::Quat;

// ============================================================================
// Quaternion Encoding: Smallest-Three
// ============================================================================

/// Bits per stored component
const COMPONENT_BITS: u32 = 10;
const COMPONENT_MAX: u32 = (1 << COMPONENT_BITS) - 1;
const COMPONENT_SCALE: f32 = COMPONENT_MAX as f32 / 2.0;

/// Pack a rotation into 32 bits
///
/// The largest component is dropped and rebuilt on decode from the unit-length
/// constraint. The other three lie in `[-1/√2, 1/√2]` and are quantized to 10 bits.
///
/// Bit layout: `[a:10][b:10][c:10][idx:2]`, `idx` naming the dropped component
/// in `x, y, z, w` order.
pub fn encode_quat_smallest_three(q: Quat) -> u32 {
    let q = q.normalize().to_array();

    let abs = q.map(f32::abs);
    let idx = if abs[0] > abs[1] && abs[0] > abs[2] && abs[0] > abs[3] {
        0
    } else if abs[1] > abs[2] && abs[1] > abs[3] {
        1
    } else if abs[2] > abs[3] {
        2
    } else {
        3
    };

    // q and -q are the same rotation; keep the dropped component positive
    let sign = if q[idx] < 0.0 { -1.0 } else { 1.0 };
    let mut rest = q
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != idx)
        .map(|(_, &v)| v * sign);

    let mut quantize = || {
        let v = rest.next().unwrap_or(0.0);
        let scaled = ((v * std::f32::consts::SQRT_2 + 1.0) * COMPONENT_SCALE).round();
        (scaled.max(0.0) as u32).min(COMPONENT_MAX)
    };
    let qa = quantize();
    let qb = quantize();
    let qc = quantize();

    (qa << 22) | (qb << 12) | (qc << 2) | idx as u32
}

/// Unpack a smallest-three rotation
pub fn decode_quat_smallest_three(packed: u32) -> Quat {
    let idx = (packed & 0x3) as usize;
    let dequantize = |shift: u32| {
        let raw = ((packed >> shift) & COMPONENT_MAX) as f32;
        (raw / COMPONENT_SCALE - 1.0) * std::f32::consts::FRAC_1_SQRT_2
    };
    let a = dequantize(22);
    let b = dequantize(12);
    let c = dequantize(2);

    let largest = (1.0 - a * a - b * b - c * c).max(0.0).sqrt();

    let q = match idx {
        0 => [largest, a, b, c],
        1 => [a, largest, b, c],
        2 => [a, b, largest, c],
        _ => [a, b, c, largest],
    };
    Quat::from_array(q).normalize()
}

// ============================================================================
// Range Quantization: 8 bits
// ============================================================================

/// Map `value` in `[min, max]` onto `0..=255`
///
/// Values outside the range clamp to its ends.
pub fn quantize_unit_byte(value: f32, min: f32, max: f32) -> u8 {
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    (t * 255.0).round() as u8
}

/// Inverse of [`quantize_unit_byte`]
pub fn dequantize_unit_byte(byte: u8, min: f32, max: f32) -> f32 {
    min + (byte as f32 / 255.0) * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_dot(q: Quat) -> f32 {
        let decoded = decode_quat_smallest_three(encode_quat_smallest_three(q));
        q.normalize().dot(decoded).abs()
    }

    #[test]
    fn test_quat_identity_roundtrip() {
        let encoded = encode_quat_smallest_three(Quat::IDENTITY);
        assert_eq!(encoded & 0x3, 3, "Identity should drop w (idx=3)");
        assert!(roundtrip_dot(Quat::IDENTITY) > 0.9999);
    }

    #[test]
    fn test_quat_axis_dropped_index() {
        let cases = [
            (Quat::from_xyzw(1.0, 0.0, 0.0, 0.0), 0),
            (Quat::from_xyzw(0.0, 1.0, 0.0, 0.0), 1),
            (Quat::from_xyzw(0.0, 0.0, 1.0, 0.0), 2),
        ];
        for (q, idx) in cases {
            let encoded = encode_quat_smallest_three(q);
            assert_eq!(encoded & 0x3, idx, "{:?} should drop component {}", q, idx);
            assert!(roundtrip_dot(q) > 0.999, "{:?} roundtrip failed", q);
        }
    }

    #[test]
    fn test_quat_sign_flip_roundtrip() {
        // Same rotation as [0.5, 0.5, 0.5, -0.5]
        let q = Quat::from_xyzw(-0.5, -0.5, -0.5, 0.5);
        assert!(roundtrip_dot(q) > 0.999, "dot = {}", roundtrip_dot(q));
    }

    #[test]
    fn test_quat_roundtrip_precision() {
        for angle in [0.1_f32, 0.55, 1.3, 2.7] {
            let q = Quat::from_axis_angle(glam::Vec3::new(0.3, -0.8, 0.5).normalize(), angle);
            assert!(roundtrip_dot(q) > 0.9999, "angle {} dot {}", angle, roundtrip_dot(q));
        }
    }

    #[test]
    fn test_quat_unnormalized_input() {
        let q = Quat::from_xyzw(0.0, 0.0, 0.0, 3.0);
        let decoded = decode_quat_smallest_three(encode_quat_smallest_three(q));
        assert!(decoded.dot(Quat::IDENTITY).abs() > 0.9999);
    }

    #[test]
    fn test_unit_byte_endpoints() {
        assert_eq!(quantize_unit_byte(-0.3, -0.3, 0.3), 0);
        assert_eq!(quantize_unit_byte(0.3, -0.3, 0.3), 255);
        assert_eq!(quantize_unit_byte(0.0, -0.3, 0.3), 128);
        assert_eq!(dequantize_unit_byte(0, -0.3, 0.3), -0.3);
        assert!((dequantize_unit_byte(255, -0.3, 0.3) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_unit_byte_clamps() {
        assert_eq!(quantize_unit_byte(-5.0, -0.3, 0.3), 0);
        assert_eq!(quantize_unit_byte(5.0, -0.3, 0.3), 255);
    }

    #[test]
    fn test_unit_byte_error_bound() {
        let step = 0.6 / 255.0;
        let mut v = -0.3_f32;
        while v <= 0.3 {
            let back = dequantize_unit_byte(quantize_unit_byte(v, -0.3, 0.3), -0.3, 0.3);
            assert!((back - v).abs() <= step * 0.5 + 1e-6, "{} -> {}", v, back);
            v += 0.0137;
        }
    }
}
