use ark_bn254::Fq;
use ark_ec::{short_weierstrass::Projective, CurveGroup};
use ark_ff::PrimeField;

/// Capability set the MSM engine consumes from a pairing group.
///
/// `CurveGroup` supplies identity, addition, doubling and the canonical
/// (de)serialization; the associated constant pins the bit length of the
/// group's defining base-field modulus, which bounds the accumulator array in
/// the deferred-doubling strategy. G1 and G2 of a pairing curve share one
/// modulus, so both instantiations carry the same constant.
pub trait PairingGroup: CurveGroup {
    /// Bit length of the base-field modulus.
    const MODULUS_BITS: usize;
}

// The impls name `Projective<g1::Config>` / `Projective<g2::Config>` directly
// rather than the `G1Projective` / `G2Projective` aliases: those aliases
// project through `<Config as BnConfig>::G1Config`, which the compiler's
// coherence check does not normalize, so the aliased impls are rejected as
// overlapping. The aliases normalize to these types at use sites.
impl PairingGroup for Projective<ark_bn254::g1::Config> {
    const MODULUS_BITS: usize = Fq::MODULUS_BIT_SIZE as usize;
}

impl PairingGroup for Projective<ark_bn254::g2::Config> {
    const MODULUS_BITS: usize = Fq::MODULUS_BIT_SIZE as usize;
}
