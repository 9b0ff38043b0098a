//! Error types for the rollup verification pipeline.

use thiserror::Error;

use crate::composer::{CircuitFailure, ProverError};

/// Reasons a rollup batch fails verification.
///
/// Every variant terminates the pipeline at the stage that produced it. The verifier entry points
/// never return these as `Err`; they are rendered into [`crate::VerifyResult::err`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The join-split circuit data carries no verification key.
    #[error("Join split verification key not provided.")]
    MissingJoinSplitKey,

    /// The join-split circuit data carries an empty padding proof.
    #[error("Join split padding proof not provided.")]
    MissingPaddingProof,

    /// No verifier reference string was configured.
    #[error("Verifier crs not provided.")]
    MissingReferenceString,

    /// The rollup circuit rejected the batch. Holds the error recorded by the circuit builder.
    #[error("{0}")]
    CircuitLogicFailure(String),

    /// The recursion output read from the circuit witness failed the native pairing check.
    #[error("Native pairing check failed.")]
    PairingCheckFailure,

    /// The recursion output re-read from the serialized proof failed to decode or failed the
    /// pairing check.
    #[error("Pairing check on serialized proof failed: {0}")]
    SerializationMismatch(String),

    /// The circuit data lists no recursion verification keys, so the serialized pairing check has
    /// no reference string to run against.
    #[error("Recursion verification keys not provided.")]
    MissingRecursionKey,

    /// The prover could not produce a succinct proof from the constraint system.
    #[error("Proof construction failed: {0}")]
    ProofConstruction(#[from] ProverError),

    /// The succinct proof checker rejected the proof.
    #[error("Proof validation failed.")]
    ProofRejected,
}

impl From<CircuitFailure> for VerificationError {
    fn from(failure: CircuitFailure) -> Self {
        VerificationError::CircuitLogicFailure(failure.0)
    }
}

impl VerificationError {
    /// Configuration errors: the caller must fix the circuit data before retrying.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            VerificationError::MissingJoinSplitKey
                | VerificationError::MissingPaddingProof
                | VerificationError::MissingReferenceString
                | VerificationError::MissingRecursionKey
        )
    }

    /// Cryptographic inconsistencies that must always be surfaced as hard failures.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            VerificationError::PairingCheckFailure
                | VerificationError::SerializationMismatch(_)
                | VerificationError::ProofRejected
        )
    }
}
