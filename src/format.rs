//! Fixed-precision number formatting shared by chart annotations, the CSV
//! table and the printed summary.

/// Rendered in place of a number when a value is infinite (zero time).
pub const INFINITY_SENTINEL: &str = "inf";

/// Decimals used for execution times
pub const TIME_PRECISION: usize = 4;

/// Decimals used for speedup, efficiency, throughput and percentages
pub const RATIO_PRECISION: usize = 2;

/// Format `value` with `precision` decimals, never panicking on non-finite input.
pub fn fixed(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            INFINITY_SENTINEL.to_string()
        } else {
            format!("-{INFINITY_SENTINEL}")
        }
    } else {
        format!("{value:.precision$}")
    }
}

/// `1.5895s`
pub fn seconds(value: f64) -> String {
    format!("{}s", fixed(value, TIME_PRECISION))
}

/// `7.62x`
pub fn times(value: f64) -> String {
    format!("{}x", fixed(value, RATIO_PRECISION))
}

/// `95.19%`
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, RATIO_PRECISION))
}

/// Full-precision value for the CSV table. `f64`'s `Display` round-trips
/// exactly, and the sentinel parses back as infinity.
pub fn raw(value: f64) -> String {
    if value.is_infinite() {
        fixed(value, 0)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinity_uses_sentinel() {
        assert_eq!(times(f64::INFINITY), "infx");
        assert_eq!(percent(f64::INFINITY), "inf%");
        assert_eq!(fixed(f64::NEG_INFINITY, 2), "-inf");
    }

    #[test]
    fn finite_values_are_fixed_precision() {
        assert_eq!(seconds(1.589532), "1.5895s");
        assert_eq!(times(7.616_25), "7.62x");
        assert_eq!(percent(104.0), "104.00%");
    }

    #[test]
    fn raw_parses_back() {
        for v in [0.208704, 7.616_256_6, f64::INFINITY] {
            let parsed: f64 = raw(v).parse().unwrap();
            assert_eq!(parsed, v);
        }
    }
}
