//! Verifier reference strings with precomputed pairing lines.
//!
//! The pairing check only ever pairs against two fixed G2 elements: the generator `[1]_2` and the
//! SRS element `[x]_2`. Preparing a G2 point (computing its Miller loop line coefficients) is the
//! expensive part of a pairing, so a reference string prepares both once at construction and hands
//! out the prepared lines for every subsequent check.

use std::fmt;

use ark_bn254::{Bn254, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};

/// Prepared G2 point for BN254 (Miller loop line coefficients).
pub type G2Lines = <Bn254 as Pairing>::G2Prepared;

/// Public setup material needed to evaluate the rollup's deferred pairing check.
pub trait VerifierReferenceString: Send + Sync {
    /// The SRS element `[x]_2`.
    fn g2_x(&self) -> G2Affine;

    /// Precomputed lines for `[1]_2` (index 0) and `[x]_2` (index 1).
    fn precomputed_g2_lines(&self) -> &[G2Lines; 2];
}

/// In-memory reference string built from a known `[x]_2`.
#[derive(Clone)]
pub struct MemVerifierReferenceString {
    g2_x: G2Affine,
    lines: [G2Lines; 2],
}

impl MemVerifierReferenceString {
    pub fn new(g2_x: G2Affine) -> Self {
        let lines = [G2Affine::generator().into(), g2_x.into()];
        Self { g2_x, lines }
    }

    /// Read `[x]_2` as a compressed, validated `G2Affine`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let g2_x = G2Affine::deserialize_compressed(bytes)?;
        Ok(Self::new(g2_x))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut bytes = Vec::with_capacity(self.g2_x.compressed_size());
        self.g2_x.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }
}

impl VerifierReferenceString for MemVerifierReferenceString {
    fn g2_x(&self) -> G2Affine {
        self.g2_x
    }

    fn precomputed_g2_lines(&self) -> &[G2Lines; 2] {
        &self.lines
    }
}

impl fmt::Debug for MemVerifierReferenceString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemVerifierReferenceString")
            .field("g2_x", &self.g2_x)
            .finish_non_exhaustive()
    }
}
