//! Rollup circuit configuration.

use std::fmt;
use std::sync::Arc;

use crate::composer::ProofSystem;
use crate::error::VerificationError;
use crate::reference_string::VerifierReferenceString;

/// The inner join-split circuit whose proofs the rollup aggregates.
pub struct JoinSplitCircuitData<S: ProofSystem> {
    pub verification_key: Option<Arc<S::VerificationKey>>,
    /// Canonical filler proof used to pad batches to capacity.
    pub padding_proof: Vec<u8>,
}

/// Keys and parameters for one rollup circuit size.
///
/// Shared read-only between verifications; every key is behind an `Arc`, so cloning is cheap.
pub struct CircuitData<S: ProofSystem> {
    pub proving_key: Option<Arc<S::ProvingKey>>,
    pub verification_key: Option<Arc<S::VerificationKey>>,
    /// Gate bound the composer is sized for.
    pub num_gates: usize,
    /// Fixed number of transactions the circuit verifies.
    pub num_txs: usize,
    pub join_split_circuit_data: JoinSplitCircuitData<S>,
    /// Verification keys for the proofs verified recursively inside the rollup circuit.
    pub verification_keys: Vec<Arc<S::VerificationKey>>,
    pub verifier_crs: Option<Arc<dyn VerifierReferenceString>>,
}

impl<S: ProofSystem> CircuitData<S> {
    pub fn new(num_gates: usize, num_txs: usize) -> Self {
        Self {
            proving_key: None,
            verification_key: None,
            num_gates,
            num_txs,
            join_split_circuit_data: JoinSplitCircuitData {
                verification_key: None,
                padding_proof: Vec::new(),
            },
            verification_keys: Vec::new(),
            verifier_crs: None,
        }
    }

    pub fn with_proving_key(mut self, key: Arc<S::ProvingKey>) -> Self {
        self.proving_key = Some(key);
        self
    }

    pub fn with_verification_key(mut self, key: Arc<S::VerificationKey>) -> Self {
        self.verification_key = Some(key);
        self
    }

    pub fn with_join_split_key(mut self, key: Arc<S::VerificationKey>) -> Self {
        self.join_split_circuit_data.verification_key = Some(key);
        self
    }

    pub fn with_padding_proof(mut self, padding_proof: Vec<u8>) -> Self {
        self.join_split_circuit_data.padding_proof = padding_proof;
        self
    }

    pub fn with_verification_keys(mut self, keys: Vec<Arc<S::VerificationKey>>) -> Self {
        self.verification_keys = keys;
        self
    }

    pub fn with_verifier_crs(mut self, crs: Arc<dyn VerifierReferenceString>) -> Self {
        self.verifier_crs = Some(crs);
        self
    }

    /// Report the first missing input, checked in a fixed order: join-split verification key,
    /// padding proof, verifier reference string. Returns the reference string on success.
    pub fn check_preconditions(
        &self,
    ) -> Result<&Arc<dyn VerifierReferenceString>, VerificationError> {
        if self.join_split_circuit_data.verification_key.is_none() {
            return Err(VerificationError::MissingJoinSplitKey);
        }
        if self.join_split_circuit_data.padding_proof.is_empty() {
            return Err(VerificationError::MissingPaddingProof);
        }
        self.verifier_crs
            .as_ref()
            .ok_or(VerificationError::MissingReferenceString)
    }
}

impl<S: ProofSystem> Clone for JoinSplitCircuitData<S> {
    fn clone(&self) -> Self {
        Self {
            verification_key: self.verification_key.clone(),
            padding_proof: self.padding_proof.clone(),
        }
    }
}

impl<S: ProofSystem> Clone for CircuitData<S> {
    fn clone(&self) -> Self {
        Self {
            proving_key: self.proving_key.clone(),
            verification_key: self.verification_key.clone(),
            num_gates: self.num_gates,
            num_txs: self.num_txs,
            join_split_circuit_data: self.join_split_circuit_data.clone(),
            verification_keys: self.verification_keys.clone(),
            verifier_crs: self.verifier_crs.clone(),
        }
    }
}

impl<S: ProofSystem> fmt::Debug for CircuitData<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitData")
            .field("has_proving_key", &self.proving_key.is_some())
            .field("has_verification_key", &self.verification_key.is_some())
            .field("num_gates", &self.num_gates)
            .field("num_txs", &self.num_txs)
            .field(
                "has_join_split_key",
                &self.join_split_circuit_data.verification_key.is_some(),
            )
            .field(
                "padding_proof_len",
                &self.join_split_circuit_data.padding_proof.len(),
            )
            .field("num_verification_keys", &self.verification_keys.len())
            .field("has_verifier_crs", &self.verifier_crs.is_some())
            .finish()
    }
}
