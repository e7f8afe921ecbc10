// src/sieve/input.rs

use std::io::Write;

use log::debug;
use num::{BigInt, ToPrimitive};

use crate::error::{QsError, QsResult};
use crate::integer_math::big_int_math::BigIntMath;
use crate::sieve::sieve_array::SieveArray;

/// Optimal factor base size for the integer n:
/// (exp(sqrt(ln(n) * ln(ln(n)))))^(sqrt(2)/4), rounded up.
///
/// ln(n) is approximated from the bit length: ln(n) = log2(n) * ln(2).
pub fn factor_base_size(n: &BigInt) -> usize {
    let log2_n = n.bits() as f64;
    let ln_n = log2_n * std::f64::consts::LN_2;
    let lnln_n = ln_n.ln();
    let base = (ln_n * lnln_n).sqrt().exp();
    let exponent = std::f64::consts::SQRT_2 / 4.0;
    base.powf(exponent).ceil() as usize
}

/// Optimal size of the full sieve interval: the cube of the factor base size.
pub fn full_sieve_interval_size(n: &BigInt) -> BigInt {
    BigInt::from(factor_base_size(n)).pow(3)
}

/// Writes the full sieve interval to `sink`, one serialized shard per line.
///
/// The interval is centered on floor(sqrt(n)) to keep the evaluations
/// x^2 - n small. Every `shard_size` consecutive (x, x^2 - n) pairs form one
/// shard; the final shard may be shorter. Shards are independent units: the
/// sieve phase may process the lines in any order.
pub fn write_full_sieve_interval<W: Write>(
    n: &BigInt,
    shard_size: usize,
    sink: &mut W,
) -> QsResult<()> {
    if shard_size == 0 {
        return Err(QsError::InvalidArgument(
            "shard size must be positive".to_string(),
        ));
    }

    let size = full_sieve_interval_size(n);
    let size = size.to_u64().ok_or_else(|| {
        QsError::InvalidArgument(format!("sieve interval too large: {}", size))
    })?;

    let n_root = BigIntMath::sqrt(n)?;
    let start = &n_root - BigInt::from(size / 2);
    debug!("sieve interval of size {} starting at {}", size, start);

    let mut ints: Vec<BigInt> = Vec::with_capacity(shard_size);
    let mut evals: Vec<BigInt> = Vec::with_capacity(shard_size);

    let mut x = start;
    for k in 0..size {
        let eval = &x * &x - n;
        ints.push(x.clone());
        evals.push(eval);

        if ints.len() == shard_size || k == size - 1 {
            let shard = SieveArray::from_vecs(
                std::mem::take(&mut ints),
                std::mem::take(&mut evals),
            )?;
            writeln!(sink, "{}", shard)?;
            ints.reserve(shard_size);
            evals.reserve(shard_size);
        }

        x += 1;
    }

    Ok(())
}
