// src/sieve/worker.rs

use log::debug;
use num::{BigInt, Integer, Signed, ToPrimitive, Zero};

use crate::sieve::factor_base::FactorBaseArray;
use crate::sieve::sieve_array::SieveArray;

/// Index of the first entry of the shard whose evaluation is divisible by p.
///
/// x^2 - N = 0 (mod p) has up to two roots mod p, each generating an
/// arithmetic progression of period p inside the shard. `solution_index`
/// (0 or 1) selects which progression start to return. The roots could be
/// computed with Tonelli-Shanks; a linear scan is enough at shard scale.
///
/// For `solution_index` 1, the next divisible index is searched past the
/// first; if the gap is a multiple of p both indices belong to the same
/// residue class and the first is returned. A second root can be absent
/// from a short shard, in which case there is nothing to sieve: `None`.
pub fn first_multiple_index(
    p: &BigInt,
    array: &SieveArray,
    solution_index: usize,
) -> Option<usize> {
    let first = (0..array.size()).find(|&i| array.get_eval(i).mod_floor(p).is_zero())?;
    if solution_index == 0 {
        return Some(first);
    }

    let second = ((first + 1)..array.size()).find(|&i| array.get_eval(i).mod_floor(p).is_zero())?;
    if BigInt::from((second - first) as u64).mod_floor(p).is_zero() {
        // Same residue class as the first solution.
        Some(first)
    } else {
        Some(second)
    }
}

/// Sieves one shard: divides every evaluation by the factor-base primes along
/// both residue-class progressions and keeps the pairs whose residue reduces
/// to +-1, i.e. the evaluations that are smooth over the factor base.
///
/// A zero evaluation (x = floor(sqrt(N)) when N is a perfect square) is kept
/// as trivially smooth; dividing it would never terminate.
pub fn sieve(n: &BigInt, array: &SieveArray, factor_base: &FactorBaseArray) -> SieveArray {
    let mut quotients: Vec<BigInt> = (0..array.size())
        .map(|i| array.get_eval(i).clone())
        .collect();

    for p in factor_base.iter() {
        // A prime wider than the shard strides out after a single index.
        let step = p.to_usize().unwrap_or(usize::MAX);

        for solution_index in 0..2 {
            let start = match first_multiple_index(p, array, solution_index) {
                Some(index) => index,
                None => continue,
            };

            let mut j = start;
            while j < quotients.len() {
                while !quotients[j].is_zero() && quotients[j].mod_floor(p).is_zero() {
                    let reduced = &quotients[j] / p;
                    quotients[j] = reduced;
                }

                j = match j.checked_add(step) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    let mut sieved = SieveArray::new();
    for (i, quotient) in quotients.iter().enumerate() {
        if quotient.abs() <= BigInt::from(1) {
            sieved.append_pair(array.get_int(i).clone(), array.get_eval(i).clone());
        }
    }

    debug!(
        "sieved shard of size {} for {}: {} smooth",
        array.size(),
        n,
        sieved.size()
    );
    sieved
}
