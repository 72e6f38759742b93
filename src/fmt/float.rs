//! Floating-point output in the style of Go's `%v` verb.
//!
//! Values print with the fewest digits that read back as the same value at
//! their own width, so a `float32` holding `302.5` prints `302.5` and not the
//! digits of the nearest `float64`. Decimal exponents below -4 or from 6 up
//! switch to exponent form (`1e+06`, `1.5e-07`).

/// Width of the value being printed; decides how many digits round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

pub fn format_float(value: f64, width: FloatWidth) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let inf = if value > 0.0 { "+Inf" } else { "-Inf" };
        return inf.to_string();
    }

    // Rust's `{:e}` already yields the shortest round-trip digits.
    let scientific = match width {
        FloatWidth::F32 => format!("{:e}", value as f32),
        FloatWidth::F64 => format!("{:e}", value),
    };

    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if !(-4..6).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exponent.abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let plain = if exponent >= 0 {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{}{}", digits, "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("0.{}{}", zeros, digits)
    };

    format!("{}{}", sign, plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_values_print_without_fraction() {
        assert_eq!(format_float(605.0, FloatWidth::F32), "605");
        assert_eq!(format_float(275.0, FloatWidth::F64), "275");
        assert_eq!(format_float(0.0, FloatWidth::F64), "0");
        assert_eq!(format_float(-0.0, FloatWidth::F64), "-0");
    }

    #[test]
    fn fractions_use_shortest_digits_for_their_width() {
        assert_eq!(format_float(302.5, FloatWidth::F32), "302.5");
        assert_eq!(format_float(0.1f32 as f64, FloatWidth::F32), "0.1");
        assert_eq!(format_float(0.1f32 as f64, FloatWidth::F64), "0.10000000149011612");
        assert_eq!(format_float(0.1 + 0.2, FloatWidth::F64), "0.30000000000000004");
        assert_eq!(format_float(-2.5, FloatWidth::F64), "-2.5");
    }

    #[test]
    fn large_and_small_exponents_switch_to_exponent_form() {
        assert_eq!(format_float(123456.0, FloatWidth::F64), "123456");
        assert_eq!(format_float(1_000_000.0, FloatWidth::F64), "1e+06");
        assert_eq!(format_float(1_234_567.0, FloatWidth::F64), "1.234567e+06");
        assert_eq!(format_float(0.0001, FloatWidth::F64), "0.0001");
        assert_eq!(format_float(0.000015, FloatWidth::F64), "1.5e-05");
        assert_eq!(format_float(1.5e-7, FloatWidth::F64), "1.5e-07");
        assert_eq!(format_float(1e100, FloatWidth::F64), "1e+100");
    }

    #[test]
    fn special_values() {
        assert_eq!(format_float(f64::NAN, FloatWidth::F64), "NaN");
        assert_eq!(format_float(f64::INFINITY, FloatWidth::F32), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY, FloatWidth::F64), "-Inf");
    }
}
