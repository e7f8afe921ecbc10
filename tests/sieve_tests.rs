// tests/sieve_tests.rs
//
// Integration tests for the sieve phase: shard file format, shard
// independence and smoothness of the sieve output.

use num::{BigInt, Integer, Signed, Zero};
use quadsieve::core::cancellation_token::CancellationToken;
use quadsieve::core::counters::Counters;
use quadsieve::pipeline;
use quadsieve::sieve::factor_base::FactorBaseArray;
use quadsieve::sieve::input;
use quadsieve::sieve::sieve_array::SieveArray;

fn shard_lines(n: &BigInt, shard_size: usize) -> Vec<String> {
    let mut sink = Vec::new();
    input::write_full_sieve_interval(n, shard_size, &mut sink).unwrap();
    String::from_utf8(sink)
        .unwrap()
        .lines()
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn test_shard_file_round_trips_line_by_line() {
    let n = BigInt::from(5959);
    let lines = shard_lines(&n, 10);

    for line in &lines {
        let shard = SieveArray::from_string(line, 10).unwrap();
        assert_eq!(&shard.to_string(), line);

        // Every entry satisfies the defining identity of the interval.
        for i in 0..shard.size() {
            let x = shard.get_int(i);
            assert_eq!(shard.get_eval(i), &(x * x - &n));
        }
    }

    // All shards are full-size except possibly the last one.
    for line in &lines[..lines.len() - 1] {
        assert_eq!(SieveArray::from_string(line, 10).unwrap().size(), 10);
    }
}

#[test]
fn test_interval_is_centered_and_complete() {
    let n = BigInt::from(5959);
    let lines = shard_lines(&n, 10);

    // start = floor(sqrt(5959)) - 125 / 2 = 77 - 62.
    let first_shard = SieveArray::from_string(&lines[0], 10).unwrap();
    assert_eq!(first_shard.get_int(0), &BigInt::from(15));

    let mut total = 0;
    let mut previous: Option<BigInt> = None;
    for line in &lines {
        let shard = SieveArray::from_string(line, 10).unwrap();
        for i in 0..shard.size() {
            if let Some(ref previous) = previous {
                assert_eq!(shard.get_int(i), &(previous + 1), "interval must be contiguous");
            }
            previous = Some(shard.get_int(i).clone());
            total += 1;
        }
    }

    assert_eq!(BigInt::from(total), input::full_sieve_interval_size(&n));
}

#[test]
fn test_sieve_output_is_smooth_over_the_factor_base() {
    let n = BigInt::from(5959);
    let factor_base = FactorBaseArray::build(&n).unwrap();
    let lines = shard_lines(&n, 10);
    let line_refs: Vec<&str> = lines.iter().map(|line| line.as_str()).collect();

    let counters = Counters::new();
    let token = CancellationToken::new();
    let relations = pipeline::sieve_shard_lines(&n, &line_refs, &factor_base, &counters, &token);

    assert!(relations.size() > 0, "the interval must contain smooth entries");
    for i in 0..relations.size() {
        let mut residue = relations.get_eval(i).abs();
        for p in factor_base.iter() {
            while !residue.is_zero() && residue.mod_floor(p).is_zero() {
                residue = &residue / p;
            }
        }
        assert!(
            residue <= BigInt::from(1),
            "relation ({}, {}) is not smooth",
            relations.get_int(i),
            relations.get_eval(i)
        );
    }
}

#[test]
fn test_shard_order_does_not_change_the_relation_set() {
    let n = BigInt::from(5959);
    let factor_base = FactorBaseArray::build(&n).unwrap();
    let lines = shard_lines(&n, 10);

    let forward: Vec<&str> = lines.iter().map(|line| line.as_str()).collect();
    let reversed: Vec<&str> = lines.iter().rev().map(|line| line.as_str()).collect();

    let counters = Counters::new();
    let token = CancellationToken::new();
    let first = pipeline::sieve_shard_lines(&n, &forward, &factor_base, &counters, &token);
    let second = pipeline::sieve_shard_lines(&n, &reversed, &factor_base, &counters, &token);

    let collect = |relations: &SieveArray| {
        let mut pairs: Vec<(BigInt, BigInt)> = (0..relations.size())
            .map(|i| (relations.get_int(i).clone(), relations.get_eval(i).clone()))
            .collect();
        pairs.sort();
        pairs
    };

    assert_eq!(collect(&first), collect(&second));
}

#[test]
fn test_shard_size_does_not_change_the_relation_set() {
    // The same interval cut into different shard lengths must surface the
    // same relations: shards are independent units.
    let n = BigInt::from(1649); // 17 x 97
    let factor_base = FactorBaseArray::build(&n).unwrap();
    let counters = Counters::new();
    let token = CancellationToken::new();

    let mut results = Vec::new();
    for shard_size in [3usize, 10, 1000] {
        let lines = shard_lines(&n, shard_size);
        let line_refs: Vec<&str> = lines.iter().map(|line| line.as_str()).collect();
        let relations =
            pipeline::sieve_shard_lines(&n, &line_refs, &factor_base, &counters, &token);
        let mut pairs: Vec<(BigInt, BigInt)> = (0..relations.size())
            .map(|i| (relations.get_int(i).clone(), relations.get_eval(i).clone()))
            .collect();
        pairs.sort();
        results.push(pairs);
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}
