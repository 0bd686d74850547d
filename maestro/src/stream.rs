//! Conversion of plans and results into the streamed event sequence.
//!
//! Chunk boundaries are part of the observable contract: the extracted text is
//! split on `'\n'` and one `Response` event is emitted per piece, in order, so
//! rejoining the chunk contents with `'\n'` reproduces the original string
//! exactly. An empty text yields zero chunks and no error (an anomalous but
//! not erroneous empty answer). A failure message yields exactly one `Error`
//! event and nothing else.

use stream_event::AgentEvent;

use crate::plan::Plan;

/// One `Thought` per step, in plan order.
pub fn thought_events(plan: &Plan) -> impl Iterator<Item = AgentEvent> + '_ {
    plan.steps.iter().map(|step| AgentEvent::thought(&step.task))
}

/// One `Response` per line of the extracted text.
pub fn result_events(text: &str) -> Vec<AgentEvent> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(AgentEvent::response).collect()
}

/// Full event sequence for a finished run: thoughts first, then either the
/// result chunks or exactly one terminal error.
pub fn to_events(plan: &Plan, extracted: Option<&str>, failure: Option<&str>) -> Vec<AgentEvent> {
    let mut events: Vec<AgentEvent> = thought_events(plan).collect();
    match (extracted, failure) {
        (Some(text), _) => events.extend(result_events(text)),
        (None, Some(message)) => events.push(AgentEvent::error(message)),
        (None, None) => {}
    }
    events
}
