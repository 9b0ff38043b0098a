//! Deterministic stand-ins for the proof system and rollup circuit.
//!
//! The mock circuit accepts a batch iff every transaction carries a valid checksum byte, and emits
//! a recursion output that satisfies the pairing check for the fixture's reference string. The
//! mock prover lays proofs out as public inputs followed by a fixed body.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_std::{test_rng, UniformRand};

use rollup_verifier::proof_data::{encode_public_inputs, FIELD_BYTES};
use rollup_verifier::recursion_output::RECURSION_OUTPUT_NUM_FIELDS;
use rollup_verifier::{
    CircuitData, CircuitFailure, Composer, MemVerifierReferenceString, PairingCheck, Proof,
    ProofChecker, ProofGenerator, ProofSystem, ProverError, RecursionOutput, RollupCircuitBuilder,
    RollupTx, VerificationKey, VerifierReferenceString,
};

pub const PROOF_BODY: [u8; 64] = [0x5a; 64];
const TX_PAYLOAD_LEN: usize = 31;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Join-split proof stand-in: payload followed by an xor checksum.
pub fn make_tx(seed: u8) -> Vec<u8> {
    let mut tx: Vec<u8> = (0..TX_PAYLOAD_LEN as u8)
        .map(|i| seed.wrapping_mul(31).wrapping_add(i))
        .collect();
    let checksum = tx.iter().fold(0u8, |acc, b| acc ^ b);
    tx.push(checksum);
    tx
}

pub fn tamper_tx(tx: &mut [u8]) {
    tx[0] ^= 0x80;
}

pub fn padding_proof() -> Vec<u8> {
    make_tx(0)
}

fn tx_is_valid(tx: &[u8]) -> bool {
    match tx.split_last() {
        Some((checksum, payload)) => payload.iter().fold(0u8, |acc, b| acc ^ b) == *checksum,
        None => false,
    }
}

pub fn rollup(rollup_id: u32, num_real: usize) -> RollupTx {
    let txs = (1..=num_real).map(|i| make_tx(i as u8)).collect();
    RollupTx::new(rollup_id, 0, txs)
}

pub struct MockVerificationKey {
    crs: Arc<dyn VerifierReferenceString>,
}

impl VerificationKey for MockVerificationKey {
    fn reference_string(&self) -> &Arc<dyn VerifierReferenceString> {
        &self.crs
    }
}

pub struct MockProvingKey;

#[derive(Clone, Copy, Debug, Default)]
pub struct ProverBehaviour {
    /// Flip a bit of the serialized recursion output after proving.
    pub tamper_recursion_output: bool,
    /// Make the proof checker reject every proof.
    pub reject_proofs: bool,
}

#[derive(Default)]
pub struct MockProofSystem {
    pub behaviour: ProverBehaviour,
    pub composers_created: AtomicUsize,
}

impl MockProofSystem {
    pub fn with_behaviour(behaviour: ProverBehaviour) -> Self {
        Self {
            behaviour,
            composers_created: AtomicUsize::new(0),
        }
    }
}

impl ProofSystem for MockProofSystem {
    type ProvingKey = MockProvingKey;
    type VerificationKey = MockVerificationKey;
    type Composer = MockComposer;

    fn new_composer(
        &self,
        proving_key: Option<Arc<MockProvingKey>>,
        _verification_key: Option<Arc<MockVerificationKey>>,
        num_gates: usize,
    ) -> MockComposer {
        self.composers_created.fetch_add(1, Ordering::SeqCst);
        MockComposer {
            public_inputs: Vec::new(),
            num_gates,
            proving_key,
            behaviour: self.behaviour,
        }
    }
}

pub struct MockComposer {
    pub public_inputs: Vec<Fr>,
    pub num_gates: usize,
    proving_key: Option<Arc<MockProvingKey>>,
    behaviour: ProverBehaviour,
}

impl Composer for MockComposer {
    type Prover = MockProver;
    type Verifier = MockChecker;

    fn public_inputs(&self) -> Vec<Fr> {
        self.public_inputs.clone()
    }

    fn create_prover(&mut self) -> MockProver {
        MockProver {
            public_inputs: self.public_inputs.clone(),
            has_proving_key: self.proving_key.is_some(),
            tamper: self.behaviour.tamper_recursion_output,
        }
    }

    fn create_verifier(&mut self) -> MockChecker {
        MockChecker {
            public_inputs: self.public_inputs.clone(),
            reject: self.behaviour.reject_proofs,
        }
    }
}

pub fn expected_proof_data(public_inputs: &[Fr]) -> Vec<u8> {
    let mut bytes = encode_public_inputs(public_inputs);
    bytes.extend_from_slice(&PROOF_BODY);
    bytes
}

pub struct MockProver {
    public_inputs: Vec<Fr>,
    has_proving_key: bool,
    tamper: bool,
}

impl ProofGenerator for MockProver {
    fn construct_proof(&mut self) -> Result<Proof, ProverError> {
        if !self.has_proving_key {
            return Err(ProverError::MissingProvingKey);
        }
        let mut proof_data = expected_proof_data(&self.public_inputs);
        if self.tamper {
            // Lowest byte of the first limb of P0.x.
            let offset = (self.public_inputs.len() - RECURSION_OUTPUT_NUM_FIELDS) * FIELD_BYTES;
            proof_data[offset + FIELD_BYTES - 1] ^= 0x01;
        }
        Ok(Proof { proof_data })
    }
}

pub struct MockChecker {
    public_inputs: Vec<Fr>,
    reject: bool,
}

impl ProofChecker for MockChecker {
    fn verify_proof(&self, proof: &Proof) -> bool {
        !self.reject && proof.proof_data == expected_proof_data(&self.public_inputs)
    }
}

/// Rollup circuit stand-in. Counts invocations.
pub struct MockRollupCircuit {
    toxic: Fr,
    pub calls: AtomicUsize,
}

impl MockRollupCircuit {
    pub fn new(toxic: Fr) -> Self {
        Self {
            toxic,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RollupCircuitBuilder<MockProofSystem> for MockRollupCircuit {
    fn build_rollup_circuit(
        &self,
        composer: &mut MockComposer,
        rollup: &RollupTx,
        _verification_keys: &[Arc<MockVerificationKey>],
        rollup_size: usize,
    ) -> Result<RecursionOutput, CircuitFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if rollup.len() != rollup_size {
            return Err(CircuitFailure(format!(
                "rollup holds {} txs, circuit expects {}",
                rollup.len(),
                rollup_size
            )));
        }
        if let Some(index) = rollup.txs.iter().position(|tx| !tx_is_valid(tx)) {
            return Err(CircuitFailure(format!("join split proof {index} failed")));
        }

        composer.public_inputs.push(Fr::from(rollup.rollup_id));
        composer.public_inputs.push(Fr::from(rollup.num_txs));
        composer
            .public_inputs
            .extend(rollup.txs.iter().map(|tx| Fr::from_le_bytes_mod_order(tx)));

        // Accumulator scalar bound to the batch contents.
        let a = rollup
            .txs
            .iter()
            .fold(Fr::from(1u64), |acc, tx| {
                acc * Fr::from_le_bytes_mod_order(tx) + Fr::from(1u64)
            })
            .square();
        let g = G1Affine::generator();
        let output = RecursionOutput::new(
            (g * -(a * self.toxic)).into_affine(),
            (g * a).into_affine(),
        );
        composer.public_inputs.extend(output.to_public_inputs());
        Ok(output)
    }
}

/// Pairing check with a fixed answer.
pub struct FixedPairing(pub bool);

impl PairingCheck for FixedPairing {
    fn check(&self, _output: &RecursionOutput, _srs: &dyn VerifierReferenceString) -> bool {
        self.0
    }
}

pub struct Fixture {
    pub toxic: Fr,
    pub proof_system: MockProofSystem,
    pub circuit: MockRollupCircuit,
    pub circuit_data: CircuitData<MockProofSystem>,
}

pub fn reference_string(toxic: Fr) -> Arc<dyn VerifierReferenceString> {
    Arc::new(MemVerifierReferenceString::new(
        (G2Affine::generator() * toxic).into_affine(),
    ))
}

pub fn fixture(num_txs: usize) -> Fixture {
    fixture_with(num_txs, ProverBehaviour::default())
}

pub fn fixture_with(num_txs: usize, behaviour: ProverBehaviour) -> Fixture {
    let toxic = Fr::rand(&mut test_rng());
    let crs = reference_string(toxic);
    let key = Arc::new(MockVerificationKey { crs: crs.clone() });

    let circuit_data = CircuitData::new(1 << 16, num_txs)
        .with_proving_key(Arc::new(MockProvingKey))
        .with_verification_key(key.clone())
        .with_join_split_key(key.clone())
        .with_padding_proof(padding_proof())
        .with_verification_keys(vec![key])
        .with_verifier_crs(crs);

    Fixture {
        toxic,
        proof_system: MockProofSystem::with_behaviour(behaviour),
        circuit: MockRollupCircuit::new(toxic),
        circuit_data,
    }
}

/// Verification key whose reference string belongs to a different toxic value.
pub fn foreign_key() -> Arc<MockVerificationKey> {
    let toxic = Fr::rand(&mut test_rng()) + Fr::from(7u64);
    Arc::new(MockVerificationKey {
        crs: reference_string(toxic),
    })
}
