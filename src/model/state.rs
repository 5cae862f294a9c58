use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an actor currently is in its think/wait/eat cycle.
///
/// This is derived from the actor's position in its loop and is only ever
/// written by the actor's own task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    /// No resources held.
    Thinking,
    /// Blocked in `acquire` on the first or second resource.
    WaitingForResources,
    /// Both resources held.
    Eating,
    /// Terminal: the loop observed the stop signal and exited holding nothing.
    Stopped,
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActorState::Thinking => "thinking",
            ActorState::WaitingForResources => "waiting_for_resources",
            ActorState::Eating => "eating",
            ActorState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
