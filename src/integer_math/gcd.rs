// src/integer_math/gcd.rs

use num::{BigInt, Integer, One, Zero};

pub struct GCD;

impl GCD {
    pub fn find_gcd_pair(left: &BigInt, right: &BigInt) -> BigInt {
        left.gcd(right)
    }

    /// gcd of a whole slice. Stops early once the accumulator collapses
    /// to 1, since no further element can change it.
    pub fn find_gcd(numbers: &[BigInt]) -> BigInt {
        let mut accumulator = BigInt::zero();
        for value in numbers {
            accumulator = accumulator.gcd(value);
            if accumulator.is_one() {
                break;
            }
        }
        accumulator
    }

    pub fn find_lcm_pair(left: &BigInt, right: &BigInt) -> BigInt {
        left.lcm(right)
    }

    pub fn are_coprime(numbers: &[BigInt]) -> bool {
        Self::find_gcd(numbers).is_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_pair() {
        assert_eq!(
            GCD::find_gcd_pair(&BigInt::from(12), &BigInt::from(18)),
            BigInt::from(6)
        );
        // gcd is non-negative, also for negative operands.
        assert_eq!(
            GCD::find_gcd_pair(&BigInt::from(15), &BigInt::from(-3)),
            BigInt::from(3)
        );
    }

    #[test]
    fn test_gcd_of_slice() {
        let numbers = [BigInt::from(12), BigInt::from(18), BigInt::from(30)];
        assert_eq!(GCD::find_gcd(&numbers), BigInt::from(6));
        assert_eq!(GCD::find_gcd(&[]), BigInt::from(0));
    }

    #[test]
    fn test_lcm_pair() {
        assert_eq!(
            GCD::find_lcm_pair(&BigInt::from(4), &BigInt::from(6)),
            BigInt::from(12)
        );
        assert_eq!(
            GCD::find_lcm_pair(&BigInt::from(-4), &BigInt::from(6)),
            BigInt::from(12)
        );
        assert_eq!(
            GCD::find_lcm_pair(&BigInt::from(0), &BigInt::from(6)),
            BigInt::from(0)
        );
    }

    #[test]
    fn test_are_coprime() {
        assert!(GCD::are_coprime(&[BigInt::from(9), BigInt::from(16)]));
        assert!(!GCD::are_coprime(&[BigInt::from(6), BigInt::from(15)]));
    }
}
