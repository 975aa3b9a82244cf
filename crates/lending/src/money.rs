//! Peso amounts for display.

use rust_decimal::Decimal;

/// Display wrapper: `₱` plus the amount with thousands separators and at
/// most three fraction digits (trailing zeros dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peso(pub Decimal);

impl core::fmt::Display for Peso {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let rounded = self.0.round_dp(3).normalize();
        let text = rounded.abs().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        if rounded.is_sign_negative() && !rounded.is_zero() {
            f.write_str("-")?;
        }
        f.write_str("\u{20b1}")?;

        let digits = whole.len();
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                f.write_str(",")?;
            }
            write!(f, "{ch}")?;
        }

        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}
