//! Rollup transaction batches and their normalization to the circuit's fixed capacity.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};

/// Nullifier tree roots recorded per transaction (one per input note).
pub const NULL_ROOTS_PER_TX: usize = 2;

/// A batch of join-split proofs to be aggregated by the rollup circuit.
#[derive(Clone, Debug, Default, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct RollupTx {
    pub rollup_id: u32,
    /// Number of real transactions; entries past this index are padding.
    pub num_txs: u32,
    pub data_start_index: u32,
    /// One serialized join-split proof per transaction.
    pub txs: Vec<Vec<u8>>,
    /// Nullifier tree roots after each nullifier insertion.
    pub new_null_roots: Vec<Fr>,
    /// Index into the data-roots tree for each transaction.
    pub data_roots_indices: Vec<u32>,
}

impl RollupTx {
    pub fn new(rollup_id: u32, data_start_index: u32, txs: Vec<Vec<u8>>) -> Self {
        let num_txs = txs.len();
        Self {
            rollup_id,
            num_txs: num_txs as u32,
            data_start_index,
            txs,
            new_null_roots: vec![Fr::zero(); num_txs * NULL_ROOTS_PER_TX],
            data_roots_indices: vec![0; num_txs],
        }
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        Self::deserialize_compressed(bytes)
    }
}

/// Extend `rollup` in place until it holds exactly `rollup_size` transactions.
///
/// Padded slots get a copy of `padding_proof`, the last recorded nullifier root (zero if there is
/// none) and data root index 0. `num_txs` keeps counting only the real transactions.
///
/// # Panics
/// Panics if the batch already holds more than `rollup_size` transactions.
pub fn pad_rollup_tx(rollup: &mut RollupTx, rollup_size: usize, padding_proof: &[u8]) {
    assert!(
        rollup.txs.len() <= rollup_size,
        "rollup holds {} txs, more than the circuit capacity {}",
        rollup.txs.len(),
        rollup_size
    );

    rollup.txs.resize(rollup_size, padding_proof.to_vec());

    let last_root = rollup.new_null_roots.last().copied().unwrap_or_else(Fr::zero);
    rollup
        .new_null_roots
        .resize(rollup_size * NULL_ROOTS_PER_TX, last_root);

    rollup.data_roots_indices.resize(rollup_size, 0);
}
