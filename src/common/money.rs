use bigdecimal::{BigDecimal, ParseBigDecimalError, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
const SCALE: i64 = 100;

#[derive(Debug, Clone, Copy, Default)]
/// A monetary value stored in cents.
///
/// Card balances, linked-account balances and ATM cash all use `Money`, so
/// arithmetic stays exact at two decimal places and never mixes with plain
/// integers or floats.
///
/// # Examples
/// ```
/// use atm_engine::common::money::Money;
///
/// let amount = Money::new(150_000); // 1500.00
/// assert_eq!(amount.as_i64(), 150_000);
/// assert_eq!(amount.to_string_2dp(), "1500.00");
/// ```
pub struct Money(i64);

impl Money {
    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub fn zero() -> Self {
        Money(0)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// `None` when the sum leaves the cent range.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Multiplies by `factor` and rounds back to whole cents.
    ///
    /// Returns `None` when the result does not fit in the cent range.
    pub fn scale(&self, factor: &BigDecimal) -> Option<Money> {
        let scaled = (BigDecimal::from(self.0) * factor).round(0);
        scaled.to_i64().map(Money)
    }

    pub fn to_string_2dp(&self) -> String {
        let bd = BigDecimal::from(self.0) / BigDecimal::from(SCALE);
        format!("{:.2}", bd)
    }
}

impl std::str::FromStr for Money {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(ParseBigDecimalError::Other("empty amount".into()));
        }

        let bd: BigDecimal = t.parse()?;

        // Scale to 2 decimal places
        let scaled = (bd * BigDecimal::from(SCALE)).round(0);
        let value: i64 = scaled
            .to_i64()
            .ok_or_else(|| ParseBigDecimalError::Other("amount overflow".into()))?;

        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_string_2dp())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_from_str_valid() {
        assert_eq!(Money::from_str("1").unwrap(), Money(100));
        assert_eq!(Money::from_str("1.5").unwrap(), Money(150));
        assert_eq!(Money::from_str("1500.00").unwrap(), Money(150_000));
        assert_eq!(Money::from_str("0.01").unwrap(), Money(1));
        assert_eq!(Money::from_str("  2.00 ").unwrap(), Money(200));
        assert_eq!(Money::from_str("-5").unwrap(), Money(-500));
    }

    #[test]
    fn test_from_str_rounding() {
        assert_eq!(Money::from_str("1.999").unwrap(), Money(200));
        assert_eq!(Money::from_str("0.001").unwrap(), Money(0));
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(Money(150).checked_add(Money(50)), Some(Money(200)));
        assert_eq!(Money(i64::MAX - 1).checked_add(Money(2)), None);
        assert_eq!(Money(-100).checked_sub(Money(1)), Some(Money(-101)));
        assert_eq!(Money(i64::MIN).checked_sub(Money(1)), None);
        assert_eq!(Money(i64::MIN).abs(), Money(i64::MAX));
        assert_eq!(Money(i64::MAX).saturating_add(Money(1)), Money(i64::MAX));
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("   ").is_err());
        assert!(Money::from_str("abc").is_err());
        assert!(Money::from_str("12,50").is_err());
    }

    #[test]
    fn test_to_string_2dp() {
        assert_eq!(Money(100).to_string_2dp(), "1.00");
        assert_eq!(Money(12345).to_string_2dp(), "123.45");
        assert_eq!(Money(1).to_string_2dp(), "0.01");
        assert_eq!(Money(0).to_string_2dp(), "0.00");
        assert_eq!(Money(-10100).to_string_2dp(), "-101.00");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(Money(500).to_string(), "5.00");
        assert_eq!(format!("{:>8}", Money(500)), "    5.00");
        assert_eq!(format!("{:<6}|", Money(500)), "5.00  |");
    }

    #[test]
    fn test_scale_rounds_to_cents() {
        let one_percent = BigDecimal::from_str("0.01").unwrap();
        assert_eq!(Money(10_000).scale(&one_percent), Some(Money(100)));
        assert_eq!(Money(20_100).scale(&one_percent), Some(Money(201)));
        assert_eq!(Money(40).scale(&one_percent), Some(Money(0)));
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Money(-1).is_negative());
        assert!(Money(1).is_positive());
        assert!(Money::zero().is_zero());
        assert_eq!(Money(-250).abs(), Money(250));
        assert_eq!(-Money(250), Money(-250));
    }

    #[test]
    fn test_arithmetic() {
        let mut m = Money(10_000);
        m += Money(5_000);
        assert_eq!(m, Money(15_000));
        m -= Money(20_000);
        assert_eq!(m, Money(-5_000));
        assert_eq!(Money(100) + Money(100) - Money(50), Money(150));
    }

    #[test]
    fn test_ordering() {
        assert!(Money(10_000) < Money(15_000));
        assert!(Money(-1) < Money::zero());
        assert!(Money(10_000) >= Money(10_000));
    }
}
