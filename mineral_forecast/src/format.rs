//! Human-readable magnitudes

use crate::error::{ForecastError, Result};

/// Scale words indexed by the number of divisions by 1000
pub const SCALE_WORDS: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Render a magnitude as `"<value to one decimal> <scale word>"`.
///
/// `999.0` becomes `"999.0 "` (note the trailing space), `2_500_000.0`
/// becomes `"2.5 million"`. Values of 1000 quintillion and above do not fit
/// the table and return [`ForecastError::FormatOverflow`].
pub fn format_magnitude(number: f64) -> Result<String> {
    if number.is_infinite() {
        return Err(ForecastError::FormatOverflow(number));
    }

    let mut value = number;
    let mut power = 0;
    while value >= 1000.0 {
        value /= 1000.0;
        power += 1;
    }

    let word = SCALE_WORDS
        .get(power)
        .ok_or(ForecastError::FormatOverflow(number))?;
    Ok(format!("{:.1} {}", value, word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_have_empty_word() {
        assert_eq!(format_magnitude(0.0).unwrap(), "0.0 ");
        assert_eq!(format_magnitude(999.0).unwrap(), "999.0 ");
    }

    #[test]
    fn test_overflow() {
        assert!(format_magnitude(999.0e18).is_ok());
        assert!(matches!(
            format_magnitude(1.0e21),
            Err(ForecastError::FormatOverflow(_))
        ));
        assert!(format_magnitude(f64::INFINITY).is_err());
    }
}
