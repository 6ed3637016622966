use ark_ec::CurveGroup;
use ark_ff::AdditiveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;
use num::BigUint;

use crate::group::PairingGroup;
use crate::msm::windows::{max_bit_length, pad_scalars, window_index};
use crate::utils::errors::MsmError;

/// All `2^window_size` subset-sums of up to `window_size` base points,
/// indexed by subset bitmask:
///
/// ```text
/// table[0]              = identity
/// table[1]              = bases[0]
/// table[2]              = bases[1]
/// table[3]              = bases[0] + bases[1]
/// ...
/// table[2^window_size - 1] = bases[0] + ... + bases[window_size - 1]
/// ```
///
/// Built once, immutable afterward. Entry `i` is the sum of exactly those
/// base points whose bit is set in `i`.
#[derive(Clone, Debug)]
pub struct MsmTable<G: PairingGroup> {
    window_size: usize,
    points: Vec<G>,
}

impl<G: PairingGroup> MsmTable<G> {
    /// Builds the subset-sum table with a doubling-free, bottom-up
    /// recurrence: each non-power-of-two entry splits at the largest power of
    /// two below its index. Fewer than `window_size` bases are padded with
    /// the identity; more than `window_size` is a caller error (chunking is
    /// the orchestrator's job).
    pub fn new(bases: &[G], window_size: usize) -> Result<Self, MsmError> {
        if window_size == 0 {
            return Err(MsmError::InvalidWindowSize(window_size));
        }
        if bases.len() > window_size {
            return Err(MsmError::TooManyBases(bases.len(), window_size));
        }

        let mut points = Vec::with_capacity(1 << window_size);
        points.push(G::zero());
        let mut last_pow2 = 1;
        let mut next_base = 0;
        for i in 1..(1usize << window_size) {
            let entry = if i.is_power_of_two() {
                last_pow2 = i;
                let base = bases.get(next_base).copied().unwrap_or_else(G::zero);
                next_base += 1;
                base
            } else {
                points[last_pow2] + points[i - last_pow2]
            };
            points.push(entry);
        }

        Ok(Self {
            window_size,
            points,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn points(&self) -> &[G] {
        &self.points
    }

    /// Serialized size of one entry; the table layout is this stride
    /// repeated `2^window_size` times.
    pub fn stride() -> usize {
        G::zero().compressed_size()
    }

    /// Re-encodes every entry in canonical affine-equivalent form. Advisory:
    /// the table is usable without it, but normalized entries serialize and
    /// compare in canonical form.
    pub fn normalize(&mut self) {
        let affine = G::normalize_batch(&self.points);
        for (point, affine) in self.points.iter_mut().zip(affine) {
            *point = G::from(affine);
        }
    }

    /// Back-to-back canonical point encodings, fixed stride, ascending index
    /// order. Total length is `stride() * 2^window_size`.
    pub fn serialize(&self) -> Result<Vec<u8>, MsmError> {
        let mut bytes = Vec::with_capacity(self.points.len() * Self::stride());
        for point in &self.points {
            point
                .serialize_compressed(&mut bytes)
                .map_err(MsmError::PointEncode)?;
        }
        Ok(bytes)
    }

    /// Inverse of [`serialize`](Self::serialize). Malformed point encodings
    /// surface as [`MsmError::PointDecode`] rather than decoding to the
    /// identity.
    pub fn deserialize(bytes: &[u8], window_size: usize) -> Result<Self, MsmError> {
        if window_size == 0 {
            return Err(MsmError::InvalidWindowSize(window_size));
        }
        let expected = Self::stride() << window_size;
        if bytes.len() != expected {
            return Err(MsmError::TableByteLength(bytes.len(), expected));
        }

        let points = bytes
            .chunks(Self::stride())
            .map(G::deserialize_compressed)
            .collect::<Result<Vec<_>, _>>()
            .map_err(MsmError::PointDecode)?;

        Ok(Self {
            window_size,
            points,
        })
    }

    /// Classic double-and-add-with-lookup: one doubling per scalar bit
    /// position, plus one table-indexed addition per nonzero window. An
    /// all-zero scalar group yields the identity. The running accumulator,
    /// when supplied, is added to the result and never mutated.
    pub fn windowed_mul(&self, scalars: &[BigUint], running: Option<G>) -> Result<G, MsmError> {
        if scalars.len() > self.window_size {
            return Err(MsmError::TooManyScalars(scalars.len(), self.window_size));
        }
        let scalars = pad_scalars(scalars, self.window_size);

        let msb = max_bit_length(&scalars);
        let mut q = G::zero();
        for bit in (0..msb).rev() {
            q.double_in_place();
            let idx = window_index(&scalars, bit as u64);
            if idx != 0 {
                q += self.points[idx];
            }
        }

        Ok(match running {
            Some(prev) => q + prev,
            None => q,
        })
    }
}
