// src/pipeline.rs
//
// Two-phase orchestration. Phase 1 sieves the interval shards in parallel;
// a barrier collects every surviving relation before phase 2 runs the
// combiner over the union. N and the factor base are built once up front and
// shared read-only with all workers.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use num::BigInt;
use rayon::prelude::*;

use crate::combine::combiner;
use crate::config::QsConfig;
use crate::core::cancellation_token::CancellationToken;
use crate::core::counters::{increment, Counters};
use crate::core::solution::Solution;
use crate::error::{QsError, QsResult};
use crate::sieve::factor_base::FactorBaseArray;
use crate::sieve::input;
use crate::sieve::sieve_array::SieveArray;
use crate::sieve::worker;

/// Name of the shard file inside the work directory.
pub const INPUT_FILE_NAME: &str = "input_file";

/// Name of the result file inside the work directory.
pub const OUTPUT_FILE_NAME: &str = "output_file";

/// Runs the full factorization pipeline for n and returns a non-trivial
/// factor pair.
pub fn run(
    n: &BigInt,
    config: &QsConfig,
    counters: &Counters,
    token: &CancellationToken,
) -> QsResult<Solution> {
    if n <= &BigInt::from(3) {
        return Err(QsError::InvalidArgument(format!(
            "nothing to factor for n = {}",
            n
        )));
    }

    info!("attempting factorization of: {}", n);

    // Build the factor base once and round-trip it through its broadcast
    // form, the same representation the shard workers would receive.
    let factor_base = FactorBaseArray::build(n)?;
    info!("factor base of size: {}", factor_base.size());
    let factor_base = FactorBaseArray::from_string(&factor_base.to_string())?;

    info!("sieve of size: {}", input::full_sieve_interval_size(n));

    let work_dir = Path::new(&config.work_dir);
    fs::create_dir_all(work_dir)?;
    let input_path = work_dir.join(INPUT_FILE_NAME);
    write_shard_file(n, config.shard_size, &input_path)?;

    // Phase 1: sieve every shard in isolation.
    let contents = fs::read_to_string(&input_path)?;
    let lines: Vec<&str> = contents.lines().collect();
    let all_factors = sieve_shard_lines(n, &lines, &factor_base, counters, token);
    info!("sieve phase kept {} smooth relations", all_factors.size());

    // Phase 2: single-consumer combine over the union.
    let solution = combiner::combine(
        n,
        &all_factors,
        &factor_base,
        config.max_square_attempts,
        counters,
        token,
    )?;

    let output_path = work_dir.join(OUTPUT_FILE_NAME);
    if let Err(e) = write_result_file(&output_path, &solution) {
        increment(&counters.unable_to_output);
        error!("unable to write the result file: {}", e);
    }

    if config.cleanup {
        cleanup_work_files(&[input_path, output_path]);
    }

    counters.log_totals();
    Ok(solution)
}

/// Sieves a batch of serialized shards in parallel and returns the union of
/// the surviving relations.
///
/// A shard that fails to parse is counted and skipped; the job proceeds on
/// partial data, since enough relations may survive anyway. The barrier
/// before the combine phase is the collect here: no combine work starts
/// until every shard's output is materialized. Output order follows shard
/// input order, though the combiner treats the union as a set.
pub fn sieve_shard_lines(
    n: &BigInt,
    lines: &[&str],
    factor_base: &FactorBaseArray,
    counters: &Counters,
    token: &CancellationToken,
) -> SieveArray {
    let sieved: Vec<SieveArray> = lines
        .par_iter()
        .filter_map(|line| {
            if token.is_cancellation_requested() {
                return None;
            }
            match SieveArray::from_string(line, 0) {
                Ok(shard) => Some(worker::sieve(n, &shard, factor_base)),
                Err(e) => {
                    increment(&counters.invalid_sieve_array);
                    error!("unable to parse a sieve shard: {}", e);
                    None
                }
            }
        })
        .collect();

    let mut all_factors = SieveArray::new();
    for shard in sieved {
        all_factors.append(shard);
    }
    all_factors
}

/// Writes the full sieve interval to the shard file, one shard per line.
fn write_shard_file(n: &BigInt, shard_size: usize, path: &Path) -> QsResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    input::write_full_sieve_interval(n, shard_size, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Materializes the factor pair on disk in the same tab-separated form the
/// CLI prints.
fn write_result_file(path: &Path, solution: &Solution) -> QsResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", solution)?;
    writer.flush()?;
    Ok(())
}

fn cleanup_work_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("could not clean up {}: {}", path.display(), e);
        }
    }
}
