// src/sieve/sieve_array.rs

use std::fmt;
use std::str::FromStr;

use num::BigInt;

use crate::error::{QsError, QsResult};

/// Paired arrays of sieve candidates: `ints[i]` is an integer x of the sieve
/// interval and `evals[i]` the evaluation x^2 - N of the fundamental
/// polynomial. The two vectors are never reordered independently.
///
/// The same type carries a full shard before the sieve, the surviving smooth
/// relations after it, and the concatenated union inside the combiner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SieveArray {
    ints: Vec<BigInt>,
    evals: Vec<BigInt>,
}

impl SieveArray {
    pub fn new() -> Self {
        SieveArray::default()
    }

    /// Builds a sieve array from its two component vectors.
    pub fn from_vecs(ints: Vec<BigInt>, evals: Vec<BigInt>) -> QsResult<Self> {
        if ints.len() != evals.len() {
            return Err(QsError::InvalidArgument(format!(
                "arrays must have the same size: {} != {}",
                ints.len(),
                evals.len()
            )));
        }

        let mut s = SieveArray { ints, evals };
        s.ints.shrink_to_fit();
        s.evals.shrink_to_fit();
        Ok(s)
    }

    pub fn size(&self) -> usize {
        self.ints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ints.is_empty()
    }

    pub fn get_int(&self, i: usize) -> &BigInt {
        &self.ints[i]
    }

    /// The evaluation of the fundamental polynomial at `get_int(i)`.
    pub fn get_eval(&self, i: usize) -> &BigInt {
        &self.evals[i]
    }

    /// Appends another sieve array at the end of this one.
    pub fn append(&mut self, other: SieveArray) {
        self.ints.extend(other.ints);
        self.evals.extend(other.evals);
    }

    /// Appends a single (integer, evaluation) pair.
    pub fn append_pair(&mut self, integer: BigInt, evaluation: BigInt) {
        self.ints.push(integer);
        self.evals.push(evaluation);
    }

    /// Parses the serialized form produced by `Display`. `expected_size` is a
    /// capacity hint (0 means unknown).
    pub fn from_string(s: &str, expected_size: usize) -> QsResult<Self> {
        if s == "[]" {
            return Ok(SieveArray::new());
        }

        let inner = s
            .strip_prefix("[[")
            .and_then(|rest| rest.strip_suffix("]]"))
            .ok_or_else(|| QsError::parse("missing opening or closing brackets"))?;

        let start_size = if expected_size > 0 { expected_size } else { 10 };
        let mut ints = Vec::with_capacity(start_size);
        let mut evals = Vec::with_capacity(start_size);

        for pair in inner.split("],[") {
            let mut tokens = pair.split(',');
            let (first, second) = match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(first), Some(second), None) => (first, second),
                _ => {
                    return Err(QsError::parse("all pairs must have exactly two integers"));
                }
            };

            let int = BigInt::from_str(first)
                .map_err(|_| QsError::parse(format!("invalid integer: {:?}", first)))?;
            let eval = BigInt::from_str(second)
                .map_err(|_| QsError::parse(format!("invalid integer: {:?}", second)))?;
            ints.push(int);
            evals.push(eval);
        }

        SieveArray::from_vecs(ints, evals)
    }
}

impl fmt::Display for SieveArray {
    /// Integers 1 2 3 with evaluations 5 6 7 serialize as
    /// `[[1,5],[2,6],[3,7]]`; the empty array as `[]`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.size() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "[{},{}]", self.get_int(i), self.get_eval(i))?;
        }
        write!(f, "]")
    }
}
