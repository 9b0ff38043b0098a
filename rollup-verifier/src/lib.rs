//! Rollup proof verification.
//!
//! A rollup batch is accepted only if the recursive rollup circuit built over it is consistent and
//! the pairing check the circuit defers to its verifier holds. This crate sequences those checks;
//! the circuit builder and the proof system are supplied by the caller through the traits in
//! [`composer`], and pairings are evaluated with arkworks over BN254.
//!
//! ```ignore
//! use rollup_verifier::{CircuitData, RollupTx, RollupVerifier};
//!
//! let verifier = RollupVerifier::new(&proof_system, &circuit_builder);
//! let mut rollup = RollupTx::new(rollup_id, data_start_index, txs);
//! let result = verifier.verify(&mut rollup, &circuit_data);
//! if !result.verified {
//!     tracing::warn!(err = %result.err, "rejecting rollup");
//! }
//! ```

pub mod circuit_data;
pub mod composer;
pub mod error;
pub mod pairing;
pub mod proof_data;
pub mod recursion_output;
pub mod reference_string;
pub mod rollup_tx;
pub mod verifier;

pub use circuit_data::{CircuitData, JoinSplitCircuitData};
pub use composer::{
    CircuitFailure, Composer, Proof, ProofChecker, ProofGenerator, ProofSystem, ProverError,
    RollupCircuitBuilder, VerificationKey,
};
pub use error::VerificationError;
pub use pairing::{pairing_check, NativePairing, PairingCheck};
pub use proof_data::RollupProofData;
pub use recursion_output::RecursionOutput;
pub use reference_string::{MemVerifierReferenceString, VerifierReferenceString};
pub use rollup_tx::{pad_rollup_tx, RollupTx};
pub use verifier::{RollupVerifier, VerifyResult};
