// src/combine/combiner.rs
//
// Second phase of the pipeline: find a subset of the sieved relations whose
// product of evaluations is a perfect square, and use the resulting
// congruence of squares to split N.
//
// Each relation pair (x, x^2 - N) satisfies x^2 = (x^2 - N) (mod N). A
// selection of relations whose exponent vector over the factor base is even
// in every coordinate multiplies to a square s^2 on the evaluation side and
// to a square t^2 on the integer side modulo N, so N divides (s - t)(s + t)
// and a gcd with either factor can be non-trivial. The selections are the
// kernel vectors of the exponent-parity matrix; different assignments of the
// solver's free variables walk different kernel elements.

use log::{debug, info, warn};
use num::{BigInt, Integer, One, Signed, Zero};

use crate::core::cancellation_token::CancellationToken;
use crate::core::counters::{increment, Counters};
use crate::core::solution::Solution;
use crate::error::{QsError, QsResult};
use crate::integer_math::big_int_math::BigIntMath;
use crate::integer_math::gcd::GCD;
use crate::matrix::bit_matrix::BitMatrix;
use crate::sieve::factor_base::FactorBaseArray;
use crate::sieve::sieve_array::SieveArray;

/// Exponents of each factor-base prime in the decomposition of a.
///
/// The input is smooth over the base by construction, so repeated division
/// is all it takes. A zero input decomposes to the zero vector.
pub fn smooth_factor(a: &BigInt, factor_base: &FactorBaseArray) -> Vec<u32> {
    let mut exponents = vec![0u32; factor_base.size()];
    let mut remaining = a.abs();
    if remaining.is_zero() {
        return exponents;
    }

    for (i, p) in factor_base.iter().enumerate() {
        while remaining.mod_floor(p).is_zero() {
            remaining = &remaining / p;
            exponents[i] += 1;
        }
        if remaining.is_one() {
            break;
        }
    }

    exponents
}

/// Builds the augmented GF(2) system whose solutions select square products.
///
/// One row per factor-base prime, one column per relation plus the final
/// independent column (left zero: the system is homogeneous). Column j holds
/// the exponent vector of relation j reduced mod 2.
pub fn build_system_matrix(
    all_factors: &SieveArray,
    factor_base: &FactorBaseArray,
) -> QsResult<BitMatrix> {
    let rows = factor_base.size();
    let columns = all_factors.size() + 1;
    let mut result = BitMatrix::new(rows, columns)?;

    for j in 0..columns - 1 {
        let exponents = smooth_factor(all_factors.get_eval(j), factor_base);
        for (i, &exponent) in exponents.iter().enumerate() {
            result.set(i, j, exponent % 2);
        }
    }

    debug!("system matrix of dimension: {} x {}", rows, columns);
    Ok(result)
}

/// The binary representation of `mask` as a column vector, low bit first.
/// Used to assign values to the free variables of the solved system.
pub fn indeterminates_from_mask(mask: u64) -> QsResult<BitMatrix> {
    if mask == 0 {
        return BitMatrix::new(1, 1);
    }

    let bits = (u64::BITS - mask.leading_zeros()) as usize;
    let mut indeterminates = BitMatrix::new(bits, 1)?;
    for i in 0..bits {
        indeterminates.set(i, 0, ((mask >> i) & 1) as u32);
    }
    Ok(indeterminates)
}

/// Attempts to select a subset of the relations whose evaluation product is
/// a perfect square, using `mask` to pick a kernel element.
///
/// Returns None when the selected product is not a square (a degenerate
/// selection, e.g. one with an odd number of negative evaluations).
pub fn find_square(
    all_factors: &SieveArray,
    mask: u64,
    factor_base: &FactorBaseArray,
) -> QsResult<Option<SieveArray>> {
    let mut system = build_system_matrix(all_factors, factor_base)?;
    let indeterminates = indeterminates_from_mask(mask)?;
    let selection = system.solve(&indeterminates)?;

    let mut square_factors = SieveArray::new();
    let mut product = BigInt::one();
    for i in 0..selection.rows() {
        if selection.get(i, 0) == 1 {
            square_factors.append_pair(
                all_factors.get_int(i).clone(),
                all_factors.get_eval(i).clone(),
            );
            product *= all_factors.get_eval(i);
        }
    }

    if !BigIntMath::is_square(&product) {
        warn!(
            "selected factors do not multiply to a square: {}",
            square_factors
        );
        return Ok(None);
    }

    Ok(Some(square_factors))
}

/// Tries to extract a factor of n from a square selection.
///
/// With s the root of the evaluation product and t the product of the
/// integers, s^2 = t^2 (mod n); a gcd of n with s - t or s + t different
/// from 1 and n is a factor.
pub fn try_factor(
    n: &BigInt,
    square_factors: &SieveArray,
    counters: &Counters,
) -> QsResult<Option<BigInt>> {
    debug!("attempting factorization with: {}", square_factors);

    let mut product_ints = BigInt::one();
    let mut product_evals = BigInt::one();
    for i in 0..square_factors.size() {
        product_ints *= square_factors.get_int(i);
        product_evals *= square_factors.get_eval(i);
    }

    let root = BigIntMath::sqrt(&product_evals)?;

    let factor = GCD::find_gcd_pair(n, &(&root - &product_ints));
    if !factor.is_one() && &factor != n {
        return Ok(Some(factor));
    }
    let factor = GCD::find_gcd_pair(n, &(&root + &product_ints));
    if !factor.is_one() && &factor != n {
        return Ok(Some(factor));
    }

    increment(&counters.cant_factor);
    Ok(None)
}

/// Runs the combine phase: walks the kernel of the exponent-parity system
/// until a selection factors n, or the attempt budget runs out.
///
/// Mask 0 is skipped since it usually reproduces the homogeneous (empty)
/// solution. A failing solve is counted and skipped; the walk only stops on
/// success, exhaustion or cancellation.
pub fn combine(
    n: &BigInt,
    all_factors: &SieveArray,
    factor_base: &FactorBaseArray,
    max_attempts: u64,
    counters: &Counters,
    token: &CancellationToken,
) -> QsResult<Solution> {
    info!(
        "combining {} smooth relations over a factor base of {}",
        all_factors.size(),
        factor_base.size()
    );

    for attempt in 1..max_attempts {
        if token.is_cancellation_requested() {
            warn!("combine phase cancelled at attempt {}", attempt);
            break;
        }

        debug!("attempt: {}", attempt);

        let square_factors = match find_square(all_factors, attempt, factor_base) {
            Ok(Some(square_factors)) => square_factors,
            Ok(None) => continue,
            Err(e) => {
                increment(&counters.unable_to_solve_system);
                warn!("unable to solve the system for attempt {}: {}", attempt, e);
                continue;
            }
        };

        match try_factor(n, &square_factors, counters) {
            Ok(Some(factor)) => {
                let solution = Solution::from_factor(n, &factor);
                info!("found factors: {} x {}", solution.p, solution.q);
                return Ok(solution);
            }
            Ok(None) => {
                debug!("the product did not lead to a factorization of n");
            }
            Err(e) => {
                increment(&counters.unable_to_solve_system);
                warn!("factor extraction failed for attempt {}: {}", attempt, e);
            }
        }
    }

    Err(QsError::FactorizationFailed(max_attempts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_5959() -> FactorBaseArray {
        FactorBaseArray::build(&BigInt::from(5959)).unwrap()
    }

    #[test]
    fn test_smooth_factor() {
        let base = base_5959(); // [2,3,5,7,17]
        assert_eq!(
            smooth_factor(&BigInt::from(125), &base),
            vec![0, 0, 3, 0, 0]
        );
        assert_eq!(
            smooth_factor(&BigInt::from(-30), &base),
            vec![1, 1, 1, 0, 0]
        );
        assert_eq!(smooth_factor(&BigInt::zero(), &base), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_build_system_matrix() {
        let base = base_5959();
        let mut relations = SieveArray::new();
        relations.append_pair(BigInt::from(77), BigInt::from(-30)); // 2*3*5
        relations.append_pair(BigInt::from(78), BigInt::from(125)); // 5^3

        let matrix = build_system_matrix(&relations, &base).unwrap();
        assert_eq!(matrix.rows(), 5);
        assert_eq!(matrix.columns(), 3);

        // Column 0: parities of 2*3*5; column 1: parity of 5^3; the
        // augmented column stays zero.
        assert_eq!(matrix.get(0, 0), 1);
        assert_eq!(matrix.get(1, 0), 1);
        assert_eq!(matrix.get(2, 0), 1);
        assert_eq!(matrix.get(2, 1), 1);
        for i in 0..5 {
            assert_eq!(matrix.get(i, 2), 0);
        }
    }

    #[test]
    fn test_indeterminates_from_mask() {
        let zero = indeterminates_from_mask(0).unwrap();
        assert_eq!((zero.rows(), zero.get(0, 0)), (1, 0));

        // 6 = 110 in binary, low bit first: (0, 1, 1).
        let six = indeterminates_from_mask(6).unwrap();
        assert_eq!(six.rows(), 3);
        assert_eq!(six.get(0, 0), 0);
        assert_eq!(six.get(1, 0), 1);
        assert_eq!(six.get(2, 0), 1);
    }

    #[test]
    fn test_find_square_selects_square_product() {
        // Evaluations 18 = 2*3^2 and 8 = 2^3 multiply to 144 = 12^2; each on
        // its own has an odd power of 2, so the kernel forces both together.
        let base = FactorBaseArray::from_string("[2,3]").unwrap();
        let mut relations = SieveArray::new();
        relations.append_pair(BigInt::from(5), BigInt::from(18));
        relations.append_pair(BigInt::from(9), BigInt::from(8));

        let mut found = None;
        for mask in 1..8 {
            if let Some(square) = find_square(&relations, mask, &base).unwrap() {
                if !square.is_empty() {
                    found = Some(square);
                    break;
                }
            }
        }

        let square = found.expect("a non-empty square selection must exist");
        assert_eq!(square.size(), 2);
    }

    #[test]
    fn test_try_factor_extracts_nontrivial_factor() {
        // For N = 15 the single relation (4, 1) gives s = 1, t = 4 and
        // gcd(15, 1 - 4) = 3.
        let n = BigInt::from(15);
        let counters = Counters::new();
        let mut square_factors = SieveArray::new();
        square_factors.append_pair(BigInt::from(4), BigInt::from(1));

        let factor = try_factor(&n, &square_factors, &counters).unwrap().unwrap();
        assert_eq!(factor, BigInt::from(3));
    }

    #[test]
    fn test_try_factor_counts_trivial_outcomes() {
        use std::sync::atomic::Ordering;

        // (4, 1) for N = 5: gcd(5, -3) = 1 and gcd(5, 5) = 5, both trivial.
        let n = BigInt::from(5);
        let counters = Counters::new();
        let mut square_factors = SieveArray::new();
        square_factors.append_pair(BigInt::from(4), BigInt::from(1));

        let factor = try_factor(&n, &square_factors, &counters).unwrap();
        assert!(factor.is_none());
        assert_eq!(counters.cant_factor.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_combine_factors_15() {
        // The two smooth relations of the N = 15 interval are enough.
        let n = BigInt::from(15);
        let base = FactorBaseArray::build(&n).unwrap();
        let mut relations = SieveArray::new();
        relations.append_pair(BigInt::from(3), BigInt::from(-6));
        relations.append_pair(BigInt::from(4), BigInt::from(1));

        let counters = Counters::new();
        let token = CancellationToken::new();
        let solution = combine(&n, &relations, &base, 1000, &counters, &token).unwrap();

        assert_eq!(&solution.p * &solution.q, n);
        assert!(solution.p > BigInt::one() && solution.p < n);
        assert!(solution.q > BigInt::one() && solution.q < n);
    }

    #[test]
    fn test_combine_exhaustion_is_factorization_failed() {
        // No relations: every attempt fails to solve (no coefficient
        // columns), so the budget runs out.
        let n = BigInt::from(5959);
        let base = base_5959();
        let relations = SieveArray::new();
        let counters = Counters::new();
        let token = CancellationToken::new();

        let result = combine(&n, &relations, &base, 5, &counters, &token);
        assert!(matches!(result, Err(QsError::FactorizationFailed(5))));
    }
}
