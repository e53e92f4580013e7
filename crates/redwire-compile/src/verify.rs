//! Exhaustive equivalence checking.
//!
//! Used after trimming to confirm that the optimized circuit computes the
//! same function as the original on every input vector.

use redwire_ir::Circuit;
use redwire_sim::simulate;
use tracing::debug;

use crate::error::{CompileError, CompileResult};

/// Largest input count checked exhaustively (2^16 vectors).
pub const MAX_EXHAUSTIVE_INPUTS: usize = 16;

/// Compare two circuits on every input vector.
///
/// Returns the number of vectors checked. Fails with
/// [`CompileError::NotEquivalent`] on the first disagreement and with
/// [`CompileError::TooManyInputs`] if the inputs cannot be enumerated.
pub fn verify_equivalence(original: &Circuit, candidate: &Circuit) -> CompileResult<usize> {
    let inputs = original.num_inputs();
    if inputs > MAX_EXHAUSTIVE_INPUTS {
        return Err(CompileError::TooManyInputs {
            inputs,
            max: MAX_EXHAUSTIVE_INPUTS,
        });
    }
    if candidate.num_inputs() != inputs || candidate.num_outputs() != original.num_outputs() {
        return Err(CompileError::NotEquivalent {
            inputs: "(any)".to_string(),
            expected: format!("{inputs} -> {} ports", original.num_outputs()),
            actual: format!("{} -> {} ports", candidate.num_inputs(), candidate.num_outputs()),
        });
    }

    let vectors = 1usize << inputs;
    for pattern in 0..vectors {
        let values: Vec<bool> = (0..inputs).map(|bit| (pattern >> bit) & 1 == 1).collect();
        let expected = simulate(original, &values)?;
        let actual = simulate(candidate, &values)?;
        if expected != actual {
            return Err(CompileError::NotEquivalent {
                inputs: bits(&values),
                expected: bits(&expected),
                actual: bits(&actual),
            });
        }
    }
    debug!(vectors, "circuits are equivalent");
    Ok(vectors)
}

/// Render bits as `0`/`1` characters, first bit first.
pub fn bits(values: &[bool]) -> String {
    values.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
