//! Interfaces to the proof system and circuit builder the verifier drives.
//!
//! None of these are implemented here. A proof system supplies a [`Composer`] (a single-use
//! constraint system that can later be proven and checked) and its key types. A
//! [`RollupCircuitBuilder`] lays the recursive rollup circuit out on a composer.

use std::sync::Arc;

use ark_bn254::Fr;
use thiserror::Error;

use crate::recursion_output::RecursionOutput;
use crate::reference_string::VerifierReferenceString;
use crate::rollup_tx::RollupTx;

/// Error recorded by the circuit builder when the batch violates a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CircuitFailure(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProverError {
    #[error("proving key not provided")]
    MissingProvingKey,

    #[error("{0}")]
    Backend(String),
}

/// A serialized succinct proof. The layout of `proof_data` belongs to the proof system, except
/// that it must begin with the circuit's public inputs (see [`crate::proof_data`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Proof {
    pub proof_data: Vec<u8>,
}

pub trait VerificationKey: Send + Sync {
    /// Reference string the key was generated against.
    fn reference_string(&self) -> &Arc<dyn VerifierReferenceString>;
}

pub trait ProofGenerator {
    fn construct_proof(&mut self) -> Result<Proof, ProverError>;
}

pub trait ProofChecker {
    fn verify_proof(&self, proof: &Proof) -> bool;
}

/// Constraint system under construction.
///
/// A composer backs exactly one verification: once a prover and verifier have been created from
/// it, it is dropped with them.
pub trait Composer {
    type Prover: ProofGenerator;
    type Verifier: ProofChecker;

    /// Values of the circuit's public inputs, in declaration order.
    fn public_inputs(&self) -> Vec<Fr>;

    fn create_prover(&mut self) -> Self::Prover;

    fn create_verifier(&mut self) -> Self::Verifier;
}

/// Factory for composers and owner of the key types.
pub trait ProofSystem {
    type ProvingKey: Send + Sync;
    type VerificationKey: VerificationKey;
    type Composer: Composer;

    fn new_composer(
        &self,
        proving_key: Option<Arc<Self::ProvingKey>>,
        verification_key: Option<Arc<Self::VerificationKey>>,
        num_gates: usize,
    ) -> Self::Composer;
}

/// Lays out the recursive rollup circuit for a normalized batch.
///
/// On success returns the recursion output read from the circuit witness; the composer's public
/// inputs then end with its limb encoding.
pub trait RollupCircuitBuilder<S: ProofSystem> {
    fn build_rollup_circuit(
        &self,
        composer: &mut S::Composer,
        rollup: &RollupTx,
        verification_keys: &[Arc<S::VerificationKey>],
        rollup_size: usize,
    ) -> Result<RecursionOutput, CircuitFailure>;
}
