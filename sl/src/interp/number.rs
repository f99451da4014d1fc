//! Numbers: 64-bit fast path with arbitrary-precision fallback
//!
//! Arithmetic on two `Long` operands is attempted with checked i64
//! operations first. When the result does not fit, the same operation is
//! recomputed on `BigInt` and the result stays `Big`. Once a value is `Big`
//! every result derived from it is `Big` as well; the two representations
//! compare and print by mathematical value, so callers never observe the
//! difference.

use num_bigint::BigInt;
use num_traits::Zero;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// An SL number
#[derive(Debug, Clone)]
pub enum Number {
    Long(i64),
    Big(Rc<BigInt>),
}

impl Number {
    pub fn big(value: BigInt) -> Self {
        Number::Big(Rc::new(value))
    }

    /// Parse a decimal literal, promoting when it exceeds the i64 range
    pub fn parse_literal(digits: &str) -> Option<Self> {
        match digits.parse::<i64>() {
            Ok(n) => Some(Number::Long(n)),
            Err(_) => digits.parse::<BigInt>().ok().map(Number::big),
        }
    }

    pub fn is_big(&self) -> bool {
        matches!(self, Number::Big(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Long(n) => *n == 0,
            Number::Big(n) => n.is_zero(),
        }
    }

    pub fn to_bigint(&self) -> BigInt {
        match self {
            Number::Long(n) => BigInt::from(*n),
            Number::Big(n) => BigInt::clone(n),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        self.arith(other, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.arith(other, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Number) -> Number {
        self.arith(other, i64::checked_mul, |a, b| a * b)
    }

    /// Truncating division; `None` on division by zero
    pub fn div(&self, other: &Number) -> Option<Number> {
        if other.is_zero() {
            return None;
        }
        // i64::MIN / -1 is the only overflowing case
        Some(self.arith(other, i64::checked_div, |a, b| a / b))
    }

    /// Remainder with the sign of the dividend; `None` on division by zero
    pub fn rem(&self, other: &Number) -> Option<Number> {
        if other.is_zero() {
            return None;
        }
        Some(self.arith(other, i64::checked_rem, |a, b| a % b))
    }

    fn arith(
        &self,
        other: &Number,
        fast: fn(i64, i64) -> Option<i64>,
        slow: fn(BigInt, BigInt) -> BigInt,
    ) -> Number {
        let fast_result = match (self, other) {
            (Number::Long(a), Number::Long(b)) => fast(*a, *b),
            _ => None,
        };
        match fast_result {
            Some(result) => Number::Long(result),
            None => Number::big(slow(self.to_bigint(), other.to_bigint())),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Long(n)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::big(n)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Long(a), Number::Long(b)) => a.cmp(b),
            (Number::Big(a), Number::Big(b)) => a.cmp(b),
            _ => self.to_bigint().cmp(&other.to_bigint()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Long(n) => write!(f, "{n}"),
            Number::Big(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    #[test]
    fn test_small_arithmetic_stays_long() {
        let a = Number::Long(40);
        let b = Number::Long(2);
        assert!(matches!(a.add(&b), Number::Long(42)));
        assert!(matches!(a.sub(&b), Number::Long(38)));
        assert!(matches!(a.mul(&b), Number::Long(80)));
        assert!(matches!(a.div(&b), Some(Number::Long(20))));
        assert!(matches!(a.rem(&Number::Long(3)), Some(Number::Long(1))));
    }

    #[test]
    fn test_add_overflow_promotes() {
        let sum = Number::Long(i64::MAX).add(&Number::Long(1));
        assert!(sum.is_big());
        assert_eq!(sum.to_bigint(), big("9223372036854775808"));
    }

    #[test]
    fn test_sub_overflow_promotes() {
        let diff = Number::Long(i64::MIN).sub(&Number::Long(1));
        assert!(diff.is_big());
        assert_eq!(diff.to_string(), "-9223372036854775809");
    }

    #[test]
    fn test_mul_overflow_promotes() {
        let product = Number::Long(i64::MAX).mul(&Number::Long(i64::MAX));
        assert_eq!(
            product.to_bigint(),
            big("85070591730234615847396907784232501249")
        );
    }

    #[test]
    fn test_div_min_by_minus_one_promotes() {
        let quotient = Number::Long(i64::MIN).div(&Number::Long(-1)).unwrap();
        assert!(quotient.is_big());
        assert_eq!(quotient.to_string(), "9223372036854775808");
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        assert_eq!(Number::Long(-7).div(&Number::Long(2)), Some(Number::Long(-3)));
        assert_eq!(Number::Long(7).div(&Number::Long(-2)), Some(Number::Long(-3)));
        assert_eq!(Number::Long(-7).rem(&Number::Long(2)), Some(Number::Long(-1)));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(Number::Long(1).div(&Number::Long(0)).is_none());
        let huge = Number::big(big("100000000000000000000"));
        assert!(huge.rem(&Number::big(BigInt::zero())).is_none());
    }

    #[test]
    fn test_big_results_stay_big() {
        let huge = Number::Long(i64::MAX).add(&Number::Long(1));
        let back = huge.sub(&Number::Long(1));
        assert!(back.is_big());
        assert_eq!(back, Number::Long(i64::MAX));
    }

    #[test]
    fn test_cross_representation_ordering() {
        let small = Number::Long(5);
        let same = Number::big(BigInt::from(5));
        let larger = Number::big(big("1000000000000000000000"));
        assert_eq!(small, same);
        assert!(small < larger);
        assert!(larger > Number::Long(i64::MAX));
    }

    #[test]
    fn test_parse_literal() {
        assert!(matches!(Number::parse_literal("123"), Some(Number::Long(123))));
        let promoted = Number::parse_literal("99999999999999999999").unwrap();
        assert!(promoted.is_big());
        assert_eq!(promoted.to_string(), "99999999999999999999");
        assert!(Number::parse_literal("12a").is_none());
    }
}
