//! Final-answer discovery over a run's named outputs.
//!
//! Deliberately a heuristic: a substantive generated answer is long, a status
//! string or tool echo is short. Outputs are walked in the order the executor
//! reported them and the first textual value over the threshold wins, with
//! analysis-keyed outputs tried first.

use crate::plan::StepOutput;

/// Minimum character count for a value to qualify as the final answer.
pub const RESULT_LENGTH_THRESHOLD: usize = 100;

/// Key prefix marking output of the primary analysis step.
pub const ANALYSIS_KEY_PREFIX: &str = "$analysis";

/// Selects the output holding the final answer, or `None` when no output
/// qualifies. Pure and idempotent; O(n) over the outputs.
pub fn primary_output(outputs: &[(String, StepOutput)]) -> Option<&StepOutput> {
    let substantive = |output: &StepOutput| {
        output
            .as_text()
            .map(|text| text.chars().count() > RESULT_LENGTH_THRESHOLD)
            .unwrap_or(false)
    };
    outputs
        .iter()
        .find(|(key, output)| key.starts_with(ANALYSIS_KEY_PREFIX) && substantive(output))
        .or_else(|| outputs.iter().find(|(_, output)| substantive(output)))
        .map(|(_, output)| output)
}
