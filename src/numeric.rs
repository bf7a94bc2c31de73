//! Shared numeric helpers: validation, clamping, rounding and ratio safety

use crate::error::{CoreError, CoreResult};

/// Round to a fixed number of decimal places, half away from zero
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Divide, failing with a domain error instead of producing NaN or infinity
pub fn safe_ratio(numerator: f64, denominator: f64, operation: &'static str) -> CoreResult<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(CoreError::domain(
            operation,
            format!("denominator is {denominator}"),
        ));
    }
    let ratio = numerator / denominator;
    if !ratio.is_finite() {
        return Err(CoreError::domain(operation, format!("ratio {numerator}/{denominator} is not finite")));
    }
    Ok(ratio)
}

/// Clamp into [lower, upper]. When the bounds cross, the lower bound wins.
///
/// `f64::clamp` panics on crossed bounds; MCR bounding relies on the
/// floor taking precedence instead.
pub fn bounded(value: f64, lower: f64, upper: f64) -> f64 {
    if lower > upper {
        lower
    } else {
        value.max(lower).min(upper)
    }
}

pub fn ensure_finite(parameter: &'static str, value: f64) -> CoreResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::invalid(parameter, value, "must be finite"))
    }
}

pub fn ensure_non_negative(parameter: &'static str, value: f64) -> CoreResult<f64> {
    ensure_finite(parameter, value)?;
    if value < 0.0 {
        return Err(CoreError::invalid(parameter, value, "must not be negative"));
    }
    Ok(value)
}

/// Inclusive range check
pub fn ensure_in_range(parameter: &'static str, value: f64, min: f64, max: f64) -> CoreResult<f64> {
    ensure_finite(parameter, value)?;
    if value < min || value > max {
        return Err(CoreError::invalid(
            parameter,
            value,
            format!("must lie in [{min}, {max}]"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_to() {
        assert_abs_diff_eq!(round_to(1234.5678, 2), 1234.57, epsilon = 1e-9);
        assert_abs_diff_eq!(round_to(-2.5, 0), -3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(round_to(0.125, 2), 0.13, epsilon = 1e-9);
    }

    #[test]
    fn test_safe_ratio() {
        assert_abs_diff_eq!(safe_ratio(3.0, 4.0, "test").unwrap(), 0.75);
        assert!(safe_ratio(1.0, 0.0, "test").unwrap_err().is_domain());
        assert!(safe_ratio(1.0, f64::NAN, "test").unwrap_err().is_domain());
    }

    #[test]
    fn test_bounded_lower_wins_when_crossed() {
        assert_eq!(bounded(5.0, 1.0, 10.0), 5.0);
        assert_eq!(bounded(0.0, 1.0, 10.0), 1.0);
        assert_eq!(bounded(50.0, 1.0, 10.0), 10.0);
        assert_eq!(bounded(5.0, 12.0, 10.0), 12.0);
    }

    #[test]
    fn test_validators() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", -1.0).unwrap_err().is_invalid_parameter());
        assert!(ensure_finite("x", f64::INFINITY).is_err());
        assert!(ensure_in_range("d", -0.2, -0.3, -0.1).is_ok());
        assert!(ensure_in_range("d", -0.05, -0.3, -0.1).is_err());
    }
}
