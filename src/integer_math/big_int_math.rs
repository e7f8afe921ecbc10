// src/integer_math/big_int_math.rs

use num::{BigInt, Integer, One, Signed, Zero};

use crate::error::{QsError, QsResult};

/// Utility methods on arbitrary-precision integers: a floor square root,
/// a perfect-square test and a deterministic primality check.
pub struct BigIntMath;

impl BigIntMath {
    /// Floor square root of a non-negative integer.
    ///
    /// Newton's method, seeded from the bit length: 2^((bitlen+1)/2) is
    /// always >= sqrt(a), and from above the integer iteration
    /// q <- (q + a/q) / 2 decreases monotonically until it reaches
    /// floor(sqrt(a)).
    pub fn sqrt(a: &BigInt) -> QsResult<BigInt> {
        if a.is_negative() {
            return Err(QsError::InvalidArgument(format!(
                "square root of negative integer: {}",
                a
            )));
        }
        if a < &BigInt::from(2) {
            return Ok(a.clone());
        }

        let mut q: BigInt = BigInt::one() << (((a.bits() + 1) / 2) as usize);
        loop {
            let next = (&q + a / &q) >> 1;
            if next >= q {
                return Ok(q);
            }
            q = next;
        }
    }

    /// True if the parameter is a perfect square. Negative integers are
    /// never squares.
    pub fn is_square(a: &BigInt) -> bool {
        if a.is_negative() {
            return false;
        }
        match Self::sqrt(a) {
            Ok(root) => &root * &root == *a,
            Err(_) => false,
        }
    }

    /// Primality by trial division. Only used on factor-base candidates,
    /// which stay small (~10^5 for the target input sizes), so the quadratic
    /// cost is acceptable.
    pub fn is_prime_by_trial_division(a: &BigInt) -> bool {
        let two = BigInt::from(2);
        if a < &two {
            return false;
        }

        let mut i = two;
        while &i < a {
            if a.mod_floor(&i).is_zero() {
                return false;
            }
            i += 1;
        }
        true
    }
}
