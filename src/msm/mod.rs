//! Chunked multi-scalar multiplication over a pairing group.
//!
//! Arbitrarily long `(points, scalars)` pairs are split into
//! `window_size`-wide chunks, one precomputed subset-sum table per chunk.
//! [`scalar_multiply`] applies the double-and-add strategy chunk by chunk,
//! chaining the accumulator; [`scalar_multiply_no_doubling`] feeds every
//! chunk's table into one bucket-accumulation pass so the doubling count
//! stays at `MODULUS_BITS - 1` no matter how many chunks there are.

use ark_ff::AdditiveGroup;
use ark_std::Zero;
use num::BigUint;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod table;
pub mod windows;

pub use table::MsmTable;

use crate::group::PairingGroup;
use crate::utils::errors::MsmError;
use windows::{max_bit_length, pad_scalars, window_index};

/// Deferred-doubling multiplication over prebuilt tables, one table per
/// `window_size`-wide scalar chunk.
///
/// Bit contributions from every table are folded into `MODULUS_BITS`
/// bucket accumulators without any doubling, then a single Horner pass
/// consolidates them with exactly `MODULUS_BITS - 1` doublings. The
/// consolidation only starts once every table's contribution is in; with the
/// `parallel` feature, workers fold chunks into private bucket arrays that
/// are merged element-wise beforehand.
pub fn windowed_mul_no_doubling<G: PairingGroup>(
    tables: &[MsmTable<G>],
    scalars: &[BigUint],
    running: Option<G>,
) -> Result<G, MsmError> {
    let first = tables.first().ok_or(MsmError::EmptyBases)?;
    let window_size = first.window_size();
    if let Some(other) = tables.iter().find(|t| t.window_size() != window_size) {
        return Err(MsmError::MismatchedWindowSize(
            window_size,
            other.window_size(),
        ));
    }

    let capacity = tables.len() * window_size;
    if scalars.len() > capacity {
        return Err(MsmError::TooManyScalars(scalars.len(), capacity));
    }
    let msb = max_bit_length(scalars);
    if msb > G::MODULUS_BITS {
        return Err(MsmError::ScalarTooWide(msb, G::MODULUS_BITS));
    }
    let padded = pad_scalars(scalars, capacity);
    let scalars: &[BigUint] = &padded;

    #[cfg(feature = "parallel")]
    let buckets = tables
        .par_iter()
        .zip(scalars.par_chunks(window_size))
        .map(|(table, chunk)| {
            let mut buckets = vec![G::zero(); G::MODULUS_BITS];
            accumulate_buckets(&mut buckets, table, chunk);
            buckets
        })
        .reduce(
            || vec![G::zero(); G::MODULUS_BITS],
            |mut merged, buckets| {
                for (slot, contribution) in merged.iter_mut().zip(buckets) {
                    *slot += contribution;
                }
                merged
            },
        );

    #[cfg(not(feature = "parallel"))]
    let buckets = {
        let mut buckets = vec![G::zero(); G::MODULUS_BITS];
        for (table, chunk) in tables.iter().zip(scalars.chunks(window_size)) {
            accumulate_buckets(&mut buckets, table, chunk);
        }
        buckets
    };

    let result = consolidate(&buckets);
    Ok(match running {
        Some(prev) => result + prev,
        None => result,
    })
}

/// Folds one table's bit contributions into the shared bucket array: for
/// each bit position with a nonzero window index, the table entry is added
/// into that position's bucket. No doubling happens here.
fn accumulate_buckets<G: PairingGroup>(buckets: &mut [G], table: &MsmTable<G>, scalars: &[BigUint]) {
    let msb = max_bit_length(scalars);
    for bit in (0..msb).rev() {
        let idx = window_index(scalars, bit as u64);
        if idx != 0 {
            buckets[bit] += table.points()[idx];
        }
    }
}

/// Horner consolidation: `buckets[i]` weighs `2^i`, so walking from the top
/// bucket down, doubling once per step, yields the full sum.
fn consolidate<G: PairingGroup>(buckets: &[G]) -> G {
    let mut result = buckets[buckets.len() - 1];
    for bit in (1..buckets.len()).rev() {
        result.double_in_place();
        result += buckets[bit - 1];
    }
    result
}

fn validate<G>(bases: &[G], scalars: &[BigUint], window_size: usize) -> Result<(), MsmError> {
    if bases.is_empty() {
        return Err(MsmError::EmptyBases);
    }
    if window_size == 0 {
        return Err(MsmError::InvalidWindowSize(window_size));
    }
    if scalars.len() > bases.len() {
        return Err(MsmError::TooManyScalars(scalars.len(), bases.len()));
    }
    Ok(())
}

/// Computes `Σ scalars[i]·bases[i]` (plus `running`, if supplied) by
/// building a table per `window_size`-wide chunk and chaining the
/// double-and-add strategy through the chunks.
///
/// Scalars shorter than the base vector are zero-padded; the doubling count
/// scales with the number of chunks, so prefer
/// [`scalar_multiply_no_doubling`] for long inputs.
#[tracing::instrument(skip_all)]
pub fn scalar_multiply<G: PairingGroup>(
    bases: &[G],
    scalars: &[BigUint],
    running: Option<G>,
    window_size: usize,
) -> Result<G, MsmError> {
    validate(bases, scalars, window_size)?;
    let padded = pad_scalars(scalars, bases.len());

    // Genuine sequential dependency: each chunk's result seeds the next.
    let mut acc = G::zero();
    for (chunk, chunk_scalars) in bases.chunks(window_size).zip(padded.chunks(window_size)) {
        let table = MsmTable::new(chunk, window_size)?;
        acc = table.windowed_mul(chunk_scalars, Some(acc))?;
    }

    Ok(match running {
        Some(prev) => acc + prev,
        None => acc,
    })
}

/// Computes `Σ scalars[i]·bases[i]` (plus `running`, if supplied) with one
/// table per chunk and a single deferred-doubling consolidation, performing
/// `MODULUS_BITS - 1` doublings total regardless of input length.
#[tracing::instrument(skip_all)]
pub fn scalar_multiply_no_doubling<G: PairingGroup>(
    bases: &[G],
    scalars: &[BigUint],
    running: Option<G>,
    window_size: usize,
) -> Result<G, MsmError> {
    validate(bases, scalars, window_size)?;

    #[cfg(feature = "parallel")]
    let tables = bases
        .par_chunks(window_size)
        .map(|chunk| MsmTable::new(chunk, window_size))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let tables = bases
        .chunks(window_size)
        .map(|chunk| MsmTable::new(chunk, window_size))
        .collect::<Result<Vec<_>, _>>()?;

    windowed_mul_no_doubling(&tables, scalars, running)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{G1Projective, G2Projective};
    use ark_ec::PrimeGroup;
    use ark_std::rand::RngCore;
    use ark_std::{test_rng, UniformRand};

    fn random_bases<G: PairingGroup>(rng: &mut impl RngCore, n: usize) -> Vec<G> {
        (0..n).map(|_| G::rand(rng)).collect()
    }

    // 31-byte scalars stay under the 254-bit modulus bound.
    fn random_scalars(rng: &mut impl RngCore, n: usize) -> Vec<BigUint> {
        (0..n)
            .map(|_| {
                let mut buf = [0u8; 31];
                rng.fill_bytes(&mut buf);
                BigUint::from_bytes_le(&buf)
            })
            .collect()
    }

    fn naive_msm<G: PairingGroup>(bases: &[G], scalars: &[BigUint]) -> G {
        bases
            .iter()
            .zip(scalars)
            .fold(G::zero(), |acc, (base, k)| {
                acc + base.mul_bigint(k.to_u64_digits())
            })
    }

    fn strategies_agree<G: PairingGroup>(n: usize, window_size: usize) {
        let mut rng = test_rng();
        let bases: Vec<G> = random_bases(&mut rng, n);
        let scalars = random_scalars(&mut rng, n);
        let expected = naive_msm(&bases, &scalars);

        let chained = scalar_multiply(&bases, &scalars, None, window_size).unwrap();
        let bucketed = scalar_multiply_no_doubling(&bases, &scalars, None, window_size).unwrap();

        assert_eq!(chained, expected, "n={n} gsize={window_size}");
        assert_eq!(bucketed, expected, "n={n} gsize={window_size}");
    }

    #[test]
    fn strategy_equivalence_g1() {
        for (n, window_size) in [(1, 4), (5, 4), (12, 4), (23, 5)] {
            strategies_agree::<G1Projective>(n, window_size);
        }
    }

    #[test]
    fn strategy_equivalence_g2() {
        for (n, window_size) in [(1, 4), (7, 3), (17, 4)] {
            strategies_agree::<G2Projective>(n, window_size);
        }
    }

    #[test]
    fn chunk_size_invariance() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 13);
        let scalars = random_scalars(&mut rng, 13);

        let reference = scalar_multiply(&bases, &scalars, None, 1).unwrap();
        for window_size in [2, 3, 4, 5, 8] {
            assert_eq!(
                scalar_multiply(&bases, &scalars, None, window_size).unwrap(),
                reference
            );
            assert_eq!(
                scalar_multiply_no_doubling(&bases, &scalars, None, window_size).unwrap(),
                reference
            );
        }
    }

    #[test]
    fn linearity() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 9);
        let k1 = random_scalars(&mut rng, 9);
        let k2 = random_scalars(&mut rng, 9);
        let sum: Vec<BigUint> = k1.iter().zip(&k2).map(|(a, b)| a + b).collect();

        let lhs = scalar_multiply(&bases, &k1, None, 4).unwrap()
            + scalar_multiply(&bases, &k2, None, 4).unwrap();
        let rhs = scalar_multiply(&bases, &sum, None, 4).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn zero_scalars_return_the_accumulator() {
        let mut rng = test_rng();
        let bases: Vec<G2Projective> = random_bases(&mut rng, 10);
        let zeros = vec![BigUint::from(0u32); 10];
        let acc = G2Projective::rand(&mut rng);

        assert_eq!(
            scalar_multiply(&bases, &zeros, None, 4).unwrap(),
            G2Projective::zero()
        );
        assert_eq!(scalar_multiply(&bases, &zeros, Some(acc), 4).unwrap(), acc);
        assert_eq!(
            scalar_multiply_no_doubling(&bases, &zeros, Some(acc), 4).unwrap(),
            acc
        );
    }

    #[test]
    fn short_scalar_vector_is_zero_padded() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 10);
        let scalars = random_scalars(&mut rng, 4);
        let expected = naive_msm(&bases, &scalars);

        assert_eq!(scalar_multiply(&bases, &scalars, None, 3).unwrap(), expected);
        assert_eq!(
            scalar_multiply_no_doubling(&bases, &scalars, None, 3).unwrap(),
            expected
        );
    }

    #[test]
    fn chaining_matches_separate_addition() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 11);
        let scalars = random_scalars(&mut rng, 11);
        let acc = G1Projective::rand(&mut rng);

        let separate = acc + scalar_multiply(&bases, &scalars, None, 4).unwrap();
        assert_eq!(
            scalar_multiply(&bases, &scalars, Some(acc), 4).unwrap(),
            separate
        );
        assert_eq!(
            scalar_multiply_no_doubling(&bases, &scalars, Some(acc), 4).unwrap(),
            separate
        );
    }

    #[test]
    fn concrete_three_point_scenario() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 3);
        let k = vec![BigUint::from(2u32), BigUint::from(0u32), BigUint::from(1u32)];
        let expected = bases[0].double() + bases[2];

        assert_eq!(scalar_multiply(&bases, &k, None, 3).unwrap(), expected);
        assert_eq!(
            scalar_multiply_no_doubling(&bases, &k, None, 3).unwrap(),
            expected
        );
    }

    #[test]
    fn prebuilt_tables_match_on_the_fly() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 12);
        let scalars = random_scalars(&mut rng, 12);

        let tables: Vec<MsmTable<G1Projective>> = bases
            .chunks(4)
            .map(|chunk| MsmTable::new(chunk, 4).unwrap())
            .collect();

        assert_eq!(
            windowed_mul_no_doubling(&tables, &scalars, None).unwrap(),
            scalar_multiply_no_doubling(&bases, &scalars, None, 4).unwrap()
        );
    }

    #[test]
    fn rejects_contract_violations() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 4);
        let scalars = random_scalars(&mut rng, 4);

        assert!(matches!(
            scalar_multiply::<G1Projective>(&[], &scalars, None, 4),
            Err(MsmError::EmptyBases)
        ));
        assert!(matches!(
            scalar_multiply(&bases, &scalars, None, 0),
            Err(MsmError::InvalidWindowSize(0))
        ));
        let too_many = random_scalars(&mut rng, 5);
        assert!(matches!(
            scalar_multiply_no_doubling(&bases, &too_many, None, 4),
            Err(MsmError::TooManyScalars(5, 4))
        ));
    }

    #[test]
    fn rejects_mismatched_table_window_sizes() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 6);
        let scalars = random_scalars(&mut rng, 6);

        let tables = vec![
            MsmTable::new(&bases[..3], 3).unwrap(),
            MsmTable::new(&bases[3..], 4).unwrap(),
        ];
        assert!(matches!(
            windowed_mul_no_doubling(&tables, &scalars, None),
            Err(MsmError::MismatchedWindowSize(3, 4))
        ));
    }

    #[test]
    fn rejects_overwide_scalars() {
        let mut rng = test_rng();
        let bases: Vec<G1Projective> = random_bases(&mut rng, 2);
        let wide = vec![BigUint::from(1u32) << 255u32, BigUint::from(1u32)];

        assert!(matches!(
            scalar_multiply_no_doubling(&bases, &wide, None, 2),
            Err(MsmError::ScalarTooWide(256, 254))
        ));
    }
}
