//! Unit conversion for micro-unit fields.
//!
//! Micro-unit fields are edited in micro-units (e.g. µS) and persisted in the
//! base unit. Export divides, import multiplies.

const MICRO_PER_UNIT: f64 = 1_000_000.0;

/// Precision kept when converting back to micro-units, so re-imports stay stable.
const MICRO_DECIMALS: i32 = 9;

pub fn micro_unit_to_unit(value: f64) -> f64 {
    value / MICRO_PER_UNIT
}

pub fn unit_to_micro_unit(value: f64) -> f64 {
    let scale = 10f64.powi(MICRO_DECIMALS);
    (value * MICRO_PER_UNIT * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_both_ways() {
        assert_eq!(micro_unit_to_unit(2_500_000.0), 2.5);
        assert_eq!(unit_to_micro_unit(2.5), 2_500_000.0);
    }

    #[test]
    fn inverse_is_exact_for_typical_values() {
        for x in [0.0, 1.0, 3.0, 12.5, -7.25, 0.001, 123_456.789, 0.35] {
            assert_eq!(unit_to_micro_unit(micro_unit_to_unit(x)), x, "{}", x);
        }
    }
}
