// src/core/solution.rs

use std::fmt;

use num::BigInt;

/// A non-trivial factor pair of N, produced by the combine phase.
///
/// Displays in the tab-separated form of the result channel: a `Factor1`
/// line and a `Factor2` line. The CLI prints it verbatim and the result
/// file stores the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub p: BigInt,
    pub q: BigInt,
}

impl Solution {
    /// Builds the pair from one non-trivial factor of n; the second factor
    /// is the cofactor n / factor.
    pub fn from_factor(n: &BigInt, factor: &BigInt) -> Self {
        Solution {
            p: factor.clone(),
            q: n / factor,
        }
    }

    /// True if the pair actually multiplies back to n.
    pub fn verifies(&self, n: &BigInt) -> bool {
        &self.p * &self.q == *n
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Factor1\t{}", self.p)?;
        write!(f, "Factor2\t{}", self.q)
    }
}
