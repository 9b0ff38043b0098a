//! Native evaluation of the rollup circuit's deferred pairing check.

use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;
use ark_ff::One;

use crate::recursion_output::RecursionOutput;
use crate::reference_string::VerifierReferenceString;

/// Predicate over a recursion output. Implemented by [`NativePairing`]; other implementations exist
/// to substitute the check in tests.
pub trait PairingCheck: Send + Sync {
    fn check(&self, output: &RecursionOutput, srs: &dyn VerifierReferenceString) -> bool;
}

/// Batched BN254 pairing against the reference string's precomputed lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativePairing;

impl PairingCheck for NativePairing {
    fn check(&self, output: &RecursionOutput, srs: &dyn VerifierReferenceString) -> bool {
        pairing_check(output, srs)
    }
}

/// Returns true iff `e(P0, [1]_2) * e(P1, [x]_2)` is the identity of the target group.
///
/// A point at infinity on either side makes its factor trivially one, so such outputs are rejected
/// before any pairing work.
#[tracing::instrument(skip_all, name = "native_pairing_check")]
pub fn pairing_check(output: &RecursionOutput, srs: &dyn VerifierReferenceString) -> bool {
    if output.p0.infinity || output.p1.infinity {
        tracing::debug!("recursion output contains the point at infinity");
        return false;
    }

    let lines = srs.precomputed_g2_lines();
    let miller_output = Bn254::multi_miller_loop(output.points(), lines.iter().cloned());
    match Bn254::final_exponentiation(miller_output) {
        Some(result) => result.0.is_one(),
        None => false,
    }
}
