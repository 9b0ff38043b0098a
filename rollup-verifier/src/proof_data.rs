//! Reading the recursion output back out of serialized proof bytes.
//!
//! A rollup proof buffer starts with every public input of the circuit, each a 32-byte big-endian
//! field element, followed by the proof body owned by the proof system. The recursion output is
//! the trailing [`RECURSION_OUTPUT_NUM_FIELDS`] public inputs.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalDeserialize;
use thiserror::Error;

use crate::recursion_output::{RecursionOutput, RecursionOutputError, RECURSION_OUTPUT_NUM_FIELDS};

pub const FIELD_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofDataError {
    #[error("circuit declares {0} public inputs, fewer than the recursion output occupies")]
    TooFewPublicInputs(usize),

    #[error("proof data holds {actual} bytes, expected at least {expected}")]
    TooShort { expected: usize, actual: usize },

    #[error("public input {index} is not a canonical field element")]
    NonCanonicalField { index: usize },

    #[error(transparent)]
    RecursionOutput(#[from] RecursionOutputError),
}

/// Public inputs and recursion output decoded from a rollup proof buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollupProofData {
    pub public_inputs: Vec<Fr>,
    pub recursion_output: RecursionOutput,
}

impl RollupProofData {
    pub fn decode(proof_data: &[u8], num_public_inputs: usize) -> Result<Self, ProofDataError> {
        if num_public_inputs < RECURSION_OUTPUT_NUM_FIELDS {
            return Err(ProofDataError::TooFewPublicInputs(num_public_inputs));
        }
        let expected = num_public_inputs * FIELD_BYTES;
        if proof_data.len() < expected {
            return Err(ProofDataError::TooShort {
                expected,
                actual: proof_data.len(),
            });
        }

        let public_inputs = proof_data[..expected]
            .chunks_exact(FIELD_BYTES)
            .enumerate()
            .map(|(index, chunk)| {
                read_field(chunk).ok_or(ProofDataError::NonCanonicalField { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let offset = num_public_inputs - RECURSION_OUTPUT_NUM_FIELDS;
        let recursion_output = RecursionOutput::from_public_inputs(&public_inputs[offset..])?;

        Ok(Self {
            public_inputs,
            recursion_output,
        })
    }

    /// Public inputs that precede the recursion output.
    pub fn inner_public_inputs(&self) -> &[Fr] {
        &self.public_inputs[..self.public_inputs.len() - RECURSION_OUTPUT_NUM_FIELDS]
    }
}

/// Serialize public inputs in the layout [`RollupProofData::decode`] reads.
pub fn encode_public_inputs(public_inputs: &[Fr]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(public_inputs.len() * FIELD_BYTES);
    for input in public_inputs {
        bytes.extend_from_slice(&input.into_bigint().to_bytes_be());
    }
    bytes
}

fn read_field(chunk: &[u8]) -> Option<Fr> {
    let mut le = [0u8; FIELD_BYTES];
    le.copy_from_slice(chunk);
    le.reverse();
    Fr::deserialize_compressed(&le[..]).ok()
}
