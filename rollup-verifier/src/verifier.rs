//! Two-phase rollup verification.
//!
//! [`RollupVerifier::verify_logic`] checks a batch against the in-memory constraint system only:
//! preconditions, padding, circuit construction and the native pairing check on the circuit's
//! recursion output. [`RollupVerifier::verify`] runs the same prefix on the same composer and then
//! produces a succinct proof, re-runs the pairing check on the recursion output decoded from the
//! proof bytes, and finally has the proof system check the proof.
//!
//! Every stage runs only if all previous stages succeeded, and the first failure ends the
//! pipeline. Failures are reported through [`VerifyResult`], never as a panic or `Err`.

use std::sync::Arc;

use ark_bn254::Fr;

use crate::circuit_data::CircuitData;
use crate::composer::{
    Composer, ProofChecker, ProofGenerator, ProofSystem, RollupCircuitBuilder, VerificationKey,
};
use crate::error::VerificationError;
use crate::pairing::{NativePairing, PairingCheck};
use crate::proof_data::RollupProofData;
use crate::rollup_tx::{pad_rollup_tx, RollupTx};

/// Outcome of a verification attempt.
///
/// Fields are filled in as stages succeed. `verified` implies `logic_verified`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyResult {
    /// The circuit accepted the batch and the in-circuit pairing check passed.
    pub logic_verified: bool,
    /// A succinct proof was produced, passed the serialized pairing check and was accepted.
    pub verified: bool,
    /// Reason for the first failure; empty on success.
    pub err: String,
    pub public_inputs: Vec<Fr>,
    /// Serialized succinct proof; empty unless `verify` got as far as proving.
    pub proof_data: Vec<u8>,
}

impl VerifyResult {
    fn logic_only(public_inputs: Vec<Fr>) -> Self {
        Self {
            logic_verified: true,
            public_inputs,
            ..Default::default()
        }
    }

    fn failed(err: &VerificationError) -> Self {
        Self {
            err: err.to_string(),
            ..Default::default()
        }
    }
}

/// Rollup verifier over a proof system `S`, a circuit builder `B` and a pairing check `P`.
///
/// Holds no per-batch state: each call builds its own composer, so independent batches can be
/// verified concurrently through a shared verifier.
pub struct RollupVerifier<'a, S, B, P = NativePairing> {
    proof_system: &'a S,
    circuit_builder: &'a B,
    pairing: P,
}

impl<'a, S, B> RollupVerifier<'a, S, B, NativePairing>
where
    S: ProofSystem,
    B: RollupCircuitBuilder<S>,
{
    pub fn new(proof_system: &'a S, circuit_builder: &'a B) -> Self {
        Self {
            proof_system,
            circuit_builder,
            pairing: NativePairing,
        }
    }
}

impl<'a, S, B, P> RollupVerifier<'a, S, B, P>
where
    S: ProofSystem,
    B: RollupCircuitBuilder<S>,
    P: PairingCheck,
{
    /// Replace the pairing check used for both the in-circuit and the serialized recursion output.
    pub fn with_pairing_check<Q: PairingCheck>(self, pairing: Q) -> RollupVerifier<'a, S, B, Q> {
        RollupVerifier {
            proof_system: self.proof_system,
            circuit_builder: self.circuit_builder,
            pairing,
        }
    }

    /// Check the batch's circuit logic without producing a succinct proof.
    ///
    /// Pads `rollup` in place to `circuit_data.num_txs` once the preconditions hold.
    #[tracing::instrument(
        skip_all,
        name = "RollupVerifier::verify_logic",
        fields(rollup_id = rollup.rollup_id, num_txs = circuit_data.num_txs)
    )]
    pub fn verify_logic(&self, rollup: &mut RollupTx, circuit_data: &CircuitData<S>) -> VerifyResult {
        let mut composer = self.new_composer(circuit_data);
        match self.verify_internal(&mut composer, rollup, circuit_data) {
            Ok(public_inputs) => VerifyResult::logic_only(public_inputs),
            Err(err) => VerifyResult::failed(&err),
        }
    }

    /// Check the batch's circuit logic, then prove it and verify the proof.
    ///
    /// Pads `rollup` in place to `circuit_data.num_txs` once the preconditions hold.
    #[tracing::instrument(
        skip_all,
        name = "RollupVerifier::verify",
        fields(rollup_id = rollup.rollup_id, num_txs = circuit_data.num_txs)
    )]
    pub fn verify(&self, rollup: &mut RollupTx, circuit_data: &CircuitData<S>) -> VerifyResult {
        let mut composer = self.new_composer(circuit_data);
        let public_inputs = match self.verify_internal(&mut composer, rollup, circuit_data) {
            Ok(public_inputs) => public_inputs,
            Err(err) => return VerifyResult::failed(&err),
        };

        let mut result = VerifyResult::logic_only(public_inputs);
        if let Err(err) = self.verify_proof(composer, circuit_data, &mut result) {
            tracing::warn!(%err, "rollup proof verification failed");
            result.err = err.to_string();
        }
        result
    }

    fn new_composer(&self, circuit_data: &CircuitData<S>) -> S::Composer {
        self.proof_system.new_composer(
            circuit_data.proving_key.clone(),
            circuit_data.verification_key.clone(),
            circuit_data.num_gates,
        )
    }

    /// Shared prefix of both entry points. Returns the circuit's public inputs.
    fn verify_internal(
        &self,
        composer: &mut S::Composer,
        rollup: &mut RollupTx,
        circuit_data: &CircuitData<S>,
    ) -> Result<Vec<Fr>, VerificationError> {
        let crs = circuit_data.check_preconditions().inspect_err(|err| {
            tracing::warn!(%err, "rollup circuit data incomplete");
        })?;

        pad_rollup_tx(
            rollup,
            circuit_data.num_txs,
            &circuit_data.join_split_circuit_data.padding_proof,
        );
        tracing::debug!(padded_len = rollup.len(), "rollup padded");

        let recursion_output = self
            .circuit_builder
            .build_rollup_circuit(
                composer,
                rollup,
                &circuit_data.verification_keys,
                circuit_data.num_txs,
            )
            .map_err(|failure| {
                tracing::warn!(err = %failure, "tx rollup circuit logic failed");
                VerificationError::from(failure)
            })?;

        if !self.pairing.check(&recursion_output, &**crs) {
            tracing::warn!("native pairing check on circuit recursion output failed");
            return Err(VerificationError::PairingCheckFailure);
        }

        tracing::debug!("rollup circuit logic verified");
        Ok(composer.public_inputs())
    }

    /// Proof phase of [`Self::verify`]. Consumes the composer the logic phase built.
    fn verify_proof(
        &self,
        mut composer: S::Composer,
        circuit_data: &CircuitData<S>,
        result: &mut VerifyResult,
    ) -> Result<(), VerificationError> {
        // The serialized recursion output is checked against the first recursion key's reference
        // string, not `verifier_crs`.
        let recursion_crs = circuit_data
            .verification_keys
            .first()
            .map(|key| Arc::clone(key.reference_string()))
            .ok_or(VerificationError::MissingRecursionKey)?;

        let mut prover = composer.create_prover();
        let proof = {
            let _span = tracing::info_span!("construct_proof").entered();
            prover.construct_proof()?
        };
        result.proof_data = proof.proof_data.clone();
        tracing::debug!(proof_len = proof.proof_data.len(), "rollup proof constructed");

        let data = RollupProofData::decode(&proof.proof_data, result.public_inputs.len())
            .map_err(|err| VerificationError::SerializationMismatch(err.to_string()))?;
        if !self.pairing.check(&data.recursion_output, &*recursion_crs) {
            return Err(VerificationError::SerializationMismatch(
                "pairing check on decoded recursion output failed".into(),
            ));
        }

        let verifier = composer.create_verifier();
        result.verified = verifier.verify_proof(&proof);
        if !result.verified {
            tracing::error!(
                "proof checker rejected a rollup proof that passed logic verification; \
                 prover and verifier disagree"
            );
            return Err(VerificationError::ProofRejected);
        }
        Ok(())
    }
}
