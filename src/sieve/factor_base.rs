// src/sieve/factor_base.rs

use std::fmt;
use std::str::FromStr;

use log::debug;
use num::BigInt;
use num::One;

use crate::error::{QsError, QsResult};
use crate::integer_math::big_int_math::BigIntMath;
use crate::integer_math::legendre::Legendre;
use crate::sieve::input;

/// The ordered set of primes over which relations must factor completely.
///
/// Built once per run and shared read-only with every sieve worker and the
/// combiner. Contains every prime p with Legendre symbol (N/p) in {0, 1},
/// in increasing order, up to the optimal size for N. The symbol rule admits
/// p = 2 for odd N (boundary of the symbol computation) and primes dividing
/// N (symbol 0), which can short-circuit to an early factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorBaseArray {
    factors: Vec<BigInt>,
}

impl FactorBaseArray {
    pub fn from_vec(factors: Vec<BigInt>) -> Self {
        FactorBaseArray { factors }
    }

    /// Builds the factor base of the optimal size for factoring n.
    pub fn build(n: &BigInt) -> QsResult<Self> {
        let size = input::factor_base_size(n);
        debug!("target factor base size: {}", size);

        let mut factors = Vec::with_capacity(size);
        let mut p = BigInt::from(2);
        while factors.len() < size {
            if BigIntMath::is_prime_by_trial_division(&p) {
                let symbol = Legendre::symbol(n, &p)?;
                if symbol == 0 || symbol == 1 {
                    factors.push(p.clone());
                }
            }
            p += BigInt::one();
        }

        Ok(FactorBaseArray { factors })
    }

    pub fn size(&self) -> usize {
        self.factors.len()
    }

    pub fn get(&self, i: usize) -> &BigInt {
        &self.factors[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BigInt> {
        self.factors.iter()
    }

    /// Parses the serialized form produced by `Display`:
    /// `[2,3,5,7,17]`.
    pub fn from_string(s: &str) -> QsResult<Self> {
        let inner = s
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| QsError::parse("missing opening or closing brackets"))?;

        let mut factors = Vec::new();
        for token in inner.split(',') {
            let value = BigInt::from_str(token)
                .map_err(|_| QsError::parse(format!("invalid integer: {:?}", token)))?;
            factors.push(value);
        }

        Ok(FactorBaseArray { factors })
    }
}

impl fmt::Display for FactorBaseArray {
    /// Factors 2 3 5 7 17 serialize as `[2,3,5,7,17]`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, factor) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", factor)?;
        }
        write!(f, "]")
    }
}
