use ark_serialize::SerializationError;
use core::fmt::Debug;
use thiserror::Error;

/// Caller-contract violations and point-codec failures.
///
/// Given well-formed inputs every MSM operation is total; these variants
/// reject malformed calls synchronously instead of guessing.
#[derive(Error, Debug)]
pub enum MsmError {
    #[error("empty base-point vector")]
    EmptyBases,
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),
    #[error("got {0} base points for a table of window size {1}")]
    TooManyBases(usize, usize),
    #[error("got {0} scalars but at most {1} can be consumed")]
    TooManyScalars(usize, usize),
    #[error("tables disagree on window size: {0} vs {1}")]
    MismatchedWindowSize(usize, usize),
    #[error("scalar of {0} bits exceeds the {1}-bit modulus bound")]
    ScalarTooWide(usize, usize),
    #[error("table encoding is {0} bytes, expected {1}")]
    TableByteLength(usize, usize),
    #[error("point encoding failed: {0}")]
    PointEncode(SerializationError),
    #[error("point decoding failed: {0}")]
    PointDecode(SerializationError),
}
