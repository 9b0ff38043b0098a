//! The deferred pairing check emitted by the recursive rollup circuit.
//!
//! The rollup circuit verifies every inner proof except for one final pairing, which it cannot do
//! cheaply in-circuit. It instead accumulates two G1 points `(P0, P1)` and exposes them as public
//! inputs. Whoever checks `e(P0, [1]_2) * e(P1, [x]_2) == 1` natively has certified the inner
//! proofs.
//!
//! ## Public input encoding
//!
//! The points are coordinates in `Fq`, but public inputs live in `Fr`. Each coordinate is split
//! into [`NUM_LIMBS`] little-endian limbs of [`NUM_LIMB_BITS`] bits, so the output occupies
//! [`RECURSION_OUTPUT_NUM_FIELDS`] public inputs, ordered `P0.x, P0.y, P1.x, P1.y`.

use ark_bn254::{Fq, Fr, G1Affine};
use ark_ff::{BigInteger, PrimeField, Zero};
use thiserror::Error;

pub const NUM_LIMB_BITS: usize = 68;
pub const NUM_LIMBS: usize = 4;
pub const RECURSION_OUTPUT_NUM_FIELDS: usize = 4 * NUM_LIMBS;

const NUM_COORDINATE_BITS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecursionOutputError {
    #[error("expected {expected} recursion output fields, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("recursion output limb {index} exceeds 68 bits")]
    LimbOverflow { index: usize },

    #[error("recursion output coordinate {index} is not a canonical base field element")]
    NonCanonicalCoordinate { index: usize },

    #[error("recursion output point P{index} is not a valid G1 point")]
    InvalidPoint { index: usize },
}

/// Pair of G1 points whose batched pairing certifies the recursively verified proofs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecursionOutput {
    pub p0: G1Affine,
    pub p1: G1Affine,
}

impl RecursionOutput {
    pub fn new(p0: G1Affine, p1: G1Affine) -> Self {
        Self { p0, p1 }
    }

    pub fn points(&self) -> [G1Affine; 2] {
        [self.p0, self.p1]
    }

    /// Limb-encode both points as public inputs.
    ///
    /// The point at infinity has no affine coordinates and encodes as `(0, 0)`, which
    /// [`Self::from_public_inputs`] rejects.
    pub fn to_public_inputs(&self) -> [Fr; RECURSION_OUTPUT_NUM_FIELDS] {
        let mut fields = [Fr::zero(); RECURSION_OUTPUT_NUM_FIELDS];
        let coordinates = [self.p0.x, self.p0.y, self.p1.x, self.p1.y];
        for (chunk, coordinate) in fields.chunks_mut(NUM_LIMBS).zip(coordinates.iter()) {
            chunk.copy_from_slice(&fq_to_limbs(coordinate));
        }
        fields
    }

    /// Recombine the limbs and validate both points.
    pub fn from_public_inputs(fields: &[Fr]) -> Result<Self, RecursionOutputError> {
        if fields.len() != RECURSION_OUTPUT_NUM_FIELDS {
            return Err(RecursionOutputError::WrongLength {
                expected: RECURSION_OUTPUT_NUM_FIELDS,
                actual: fields.len(),
            });
        }

        let mut coordinates = [Fq::zero(); 4];
        for (index, (coordinate, limbs)) in coordinates
            .iter_mut()
            .zip(fields.chunks(NUM_LIMBS))
            .enumerate()
        {
            *coordinate = limbs_to_fq(limbs, index)?;
        }

        let p0 = checked_point(coordinates[0], coordinates[1], 0)?;
        let p1 = checked_point(coordinates[2], coordinates[3], 1)?;
        Ok(Self { p0, p1 })
    }
}

fn fq_to_limbs(x: &Fq) -> [Fr; NUM_LIMBS] {
    let bits = x.into_bigint().to_bits_le();
    let mut limbs = [Fr::zero(); NUM_LIMBS];
    for (limb, chunk) in limbs.iter_mut().zip(bits.chunks(NUM_LIMB_BITS)) {
        let value = chunk
            .iter()
            .rev()
            .fold(0u128, |acc, &bit| (acc << 1) | u128::from(bit));
        *limb = Fr::from(value);
    }
    limbs
}

fn limbs_to_fq(limbs: &[Fr], coordinate_index: usize) -> Result<Fq, RecursionOutputError> {
    let mut bits = Vec::with_capacity(NUM_LIMBS * NUM_LIMB_BITS);
    for (i, limb) in limbs.iter().enumerate() {
        let limb = limb.into_bigint();
        if limb.num_bits() as usize > NUM_LIMB_BITS {
            return Err(RecursionOutputError::LimbOverflow {
                index: coordinate_index * NUM_LIMBS + i,
            });
        }
        bits.extend_from_slice(&limb.to_bits_le()[..NUM_LIMB_BITS]);
    }

    let non_canonical = RecursionOutputError::NonCanonicalCoordinate {
        index: coordinate_index,
    };
    if bits[NUM_COORDINATE_BITS..].iter().any(|&bit| bit) {
        return Err(non_canonical);
    }
    let value = <Fq as PrimeField>::BigInt::from_bits_le(&bits[..NUM_COORDINATE_BITS]);
    Fq::from_bigint(value).ok_or(non_canonical)
}

fn checked_point(x: Fq, y: Fq, index: usize) -> Result<G1Affine, RecursionOutputError> {
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(RecursionOutputError::InvalidPoint { index });
    }
    Ok(point)
}
