// src/integer_math/legendre.rs

use num::{BigInt, Integer, One, Zero};

use crate::error::{QsError, QsResult};

pub struct Legendre;

impl Legendre {
    /// Legendre symbol (a/p) for p an odd prime, by Euler's criterion:
    /// (a/p) = a^((p-1)/2) (mod p).
    ///
    /// Returns 0 when p divides a, 1 for a quadratic residue and -1 for a
    /// non-residue. Any other residue of the modular exponentiation means p
    /// was not prime (or the inputs were misused) and is reported as an
    /// arithmetic inconsistency.
    ///
    /// Boundary: for p = 2 and odd a the exponent is 0, so the result is 1.
    /// The factor-base build relies on this to admit 2.
    pub fn symbol(a: &BigInt, p: &BigInt) -> QsResult<i32> {
        let a_mod = a.mod_floor(p);
        if a_mod.is_zero() {
            return Ok(0);
        }

        let exponent: BigInt = (p - BigInt::one()) / BigInt::from(2);
        let result = a_mod.modpow(&exponent, p); // 1 <= result <= p - 1

        if result.is_one() {
            Ok(1)
        } else if result == p - BigInt::one() {
            Ok(-1)
        } else {
            Err(QsError::ArithmeticInconsistency(format!(
                "a^((p-1)/2) mod p = {} for a = {}, p = {}",
                result, a, p
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_known_values() {
        let p = BigInt::from(7);
        assert_eq!(Legendre::symbol(&BigInt::from(5), &p).unwrap(), -1);
        assert_eq!(Legendre::symbol(&BigInt::from(2), &p).unwrap(), 1);
        assert_eq!(Legendre::symbol(&BigInt::from(14), &p).unwrap(), 0);
    }

    #[test]
    fn test_symbol_is_zero_iff_p_divides_a() {
        let p = BigInt::from(11);
        for a in 1i64..50 {
            let symbol = Legendre::symbol(&BigInt::from(a), &p).unwrap();
            assert!((-1..=1).contains(&symbol));
            assert_eq!(symbol == 0, a % 11 == 0);
        }
    }

    #[test]
    fn test_symbol_admits_two_for_odd_a() {
        assert_eq!(
            Legendre::symbol(&BigInt::from(5959), &BigInt::from(2)).unwrap(),
            1
        );
    }

    #[test]
    fn test_symbol_negative_a() {
        // -1 is a residue mod 5 (2^2 = 4 = -1) and a non-residue mod 7.
        assert_eq!(
            Legendre::symbol(&BigInt::from(-1), &BigInt::from(5)).unwrap(),
            1
        );
        assert_eq!(
            Legendre::symbol(&BigInt::from(-1), &BigInt::from(7)).unwrap(),
            -1
        );
    }

    #[test]
    fn test_symbol_composite_modulus_is_inconsistent() {
        // 15 is not prime; Euler's criterion lands outside {1, p-1} for 2.
        let result = Legendre::symbol(&BigInt::from(2), &BigInt::from(15));
        assert!(matches!(
            result,
            Err(QsError::ArithmeticInconsistency(_))
        ));
    }
}
