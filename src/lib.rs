//! Windowed-table multi-scalar multiplication (MSM) for Groth16-style proof
//! generation over BN254.
//!
//! Proof generation spends most of its time evaluating sums `Σ kᵢ·Pᵢ` over
//! thousands of group elements. This crate precomputes all subset-sums of a
//! small window of base points and reuses them across the bits of the
//! accompanying scalars, replacing per-point double-and-add chains with a
//! single shared doubling chain plus table lookups.
//!
//! The two entry points are [`msm::scalar_multiply`] (per-chunk doubling,
//! accumulator chained across chunks) and [`msm::scalar_multiply_no_doubling`]
//! (bucket accumulation with a single consolidation pass, preferred when the
//! input spans many chunks). Both are generic over [`group::PairingGroup`] and
//! instantiated for `ark_bn254::G1Projective` and `ark_bn254::G2Projective`.
//!
//! # Timing
//!
//! All arithmetic here is variable-time: loop bounds and table lookups depend
//! on scalar bits. Do not feed secret scalars through this crate without
//! separate constant-time hardening.

pub mod group;
pub mod msm;
pub mod utils;

pub use group::PairingGroup;
pub use msm::{scalar_multiply, scalar_multiply_no_doubling, windowed_mul_no_doubling, MsmTable};
pub use utils::errors::MsmError;
