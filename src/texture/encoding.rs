//! 8-bit channel quantizers and their inverses.
//!
//! All quantizers round half to even and clamp into `[0, 255]`.

/// Magnitude of the brightest catalog star (Sirius), mapped to 255
pub const BRIGHT_MAG_BOUND: f64 = -1.46;
/// Faintest magnitude kept in the texture range, mapped to 0
pub const DIM_MAG_BOUND: f64 = 7.0;

pub const MIN_TEMPERATURE_K: f64 = 2650.0;
pub const MAX_TEMPERATURE_K: f64 = 37000.0;

/// Half-width of the sub-pixel offset range covered by the offset channels
pub const OFFSET_RANGE: f64 = 1.5;

#[inline]
fn quantize(normalized: f64) -> u8 {
    (normalized * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

#[inline]
fn normalized(code: u8) -> f64 {
    code as f64 / 255.0
}

/// Linear magnitude scale: `bright_bound` -> 255, `dim_bound` -> 0
pub fn magnitude_to_8bit(magnitude: f64, bright_bound: f64, dim_bound: f64) -> u8 {
    quantize((dim_bound - magnitude) / (dim_bound - bright_bound))
}

pub fn magnitude_from_8bit(code: u8, bright_bound: f64, dim_bound: f64) -> f64 {
    dim_bound - normalized(code) * (dim_bound - bright_bound)
}

/// Logarithmic temperature scale: `min_k` -> 0, `max_k` -> 255
pub fn temperature_to_8bit(temperature_k: f64, min_k: f64, max_k: f64) -> u8 {
    quantize((temperature_k / min_k).log10() / (max_k / min_k).log10())
}

pub fn temperature_from_8bit(code: u8, min_k: f64, max_k: f64) -> f64 {
    min_k * (max_k / min_k).powf(normalized(code))
}

/// Linear offset scale: -1.5 -> 0, +1.5 -> 255
pub fn offset_to_8bit(offset: f64) -> u8 {
    quantize((offset + OFFSET_RANGE) / (2.0 * OFFSET_RANGE))
}

pub fn offset_from_8bit(code: u8) -> f64 {
    normalized(code) * 2.0 * OFFSET_RANGE - OFFSET_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_magnitude_bounds() {
        assert_eq!(magnitude_to_8bit(BRIGHT_MAG_BOUND, BRIGHT_MAG_BOUND, DIM_MAG_BOUND), 255);
        assert_eq!(magnitude_to_8bit(DIM_MAG_BOUND, BRIGHT_MAG_BOUND, DIM_MAG_BOUND), 0);
        // Outside the range saturates
        assert_eq!(magnitude_to_8bit(-3.0, BRIGHT_MAG_BOUND, DIM_MAG_BOUND), 255);
        assert_eq!(magnitude_to_8bit(9.0, BRIGHT_MAG_BOUND, DIM_MAG_BOUND), 0);
    }

    #[test]
    fn test_magnitude_decreasing() {
        let mut prev = u8::MAX;
        let mut mag = BRIGHT_MAG_BOUND;
        while mag <= DIM_MAG_BOUND {
            let code = magnitude_to_8bit(mag, BRIGHT_MAG_BOUND, DIM_MAG_BOUND);
            assert!(code <= prev, "mag {} code {} prev {}", mag, code, prev);
            prev = code;
            mag += 0.01;
        }
        // One quantization step apart is strictly ordered
        let step = (DIM_MAG_BOUND - BRIGHT_MAG_BOUND) / 255.0;
        assert!(
            magnitude_to_8bit(2.0, BRIGHT_MAG_BOUND, DIM_MAG_BOUND)
                > magnitude_to_8bit(2.0 + step, BRIGHT_MAG_BOUND, DIM_MAG_BOUND)
        );
    }

    #[test]
    fn test_temperature_bounds() {
        assert_eq!(temperature_to_8bit(MIN_TEMPERATURE_K, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K), 0);
        assert_eq!(temperature_to_8bit(MAX_TEMPERATURE_K, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K), 255);
        assert_eq!(temperature_to_8bit(1000.0, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K), 0);
        assert_eq!(temperature_to_8bit(80000.0, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K), 255);
    }

    #[test]
    fn test_temperature_increasing() {
        let mut prev = 0_u8;
        let mut t = MIN_TEMPERATURE_K;
        while t <= MAX_TEMPERATURE_K {
            let code = temperature_to_8bit(t, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K);
            assert!(code >= prev, "t {} code {} prev {}", t, code, prev);
            prev = code;
            t *= 1.001;
        }
        assert!(
            temperature_to_8bit(5000.0, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K)
                < temperature_to_8bit(6000.0, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K)
        );
    }

    #[test]
    fn test_offset_codes() {
        assert_eq!(offset_to_8bit(-1.5), 0);
        assert_eq!(offset_to_8bit(1.5), 255);
        // 127.5 rounds to even
        assert_eq!(offset_to_8bit(0.0), 128);
        assert_eq!(offset_to_8bit(-40.0), 0);
    }

    #[test]
    fn test_offset_round_trip() {
        let tolerance = OFFSET_RANGE * 2.0 / 255.0 / 2.0 + 1e-12;
        let mut offset = -OFFSET_RANGE;
        while offset <= OFFSET_RANGE {
            let back = offset_from_8bit(offset_to_8bit(offset));
            assert_abs_diff_eq!(back, offset, epsilon = tolerance);
            offset += 0.0137;
        }
    }

    #[test]
    fn test_magnitude_temperature_inverse() {
        for code in [0_u8, 17, 128, 254, 255] {
            let mag = magnitude_from_8bit(code, BRIGHT_MAG_BOUND, DIM_MAG_BOUND);
            assert_eq!(magnitude_to_8bit(mag, BRIGHT_MAG_BOUND, DIM_MAG_BOUND), code);
            let t = temperature_from_8bit(code, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K);
            assert_eq!(temperature_to_8bit(t, MIN_TEMPERATURE_K, MAX_TEMPERATURE_K), code);
        }
    }
}
