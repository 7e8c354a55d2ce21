//! Decision-making agents
mod error;
mod random;
#[cfg(test)]
pub mod testing;

pub use error::{AgentError, BuildAgentError};
pub use random::{ActionSpaces, RandomAgent, RandomAgentConfig};

use crate::composite::{CompositeAction, CompositeState};

/// Description of one orchestrator tick, as seen by a learning agent.
#[derive(Debug)]
pub struct Transition<'a, O, A> {
    /// The state the action was chosen from.
    pub state: &'a CompositeState<O>,
    /// The composite action chosen by the agent.
    pub action: &'a CompositeAction<A>,
    /// Sum of the rewards of every domain.
    pub reward: f64,
    /// The state after every domain has stepped.
    pub next_state: &'a CompositeState<O>,
    /// Whether any domain ended the episode.
    pub done: bool,
}

impl<'a, O, A> Clone for Transition<'a, O, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, O, A> Copy for Transition<'a, O, A> {}

/// An agent that produces a composite action from a composite state.
pub trait Agent<O, A> {
    /// Choose an action.
    ///
    /// Agents must tolerate domains in `state` that they do not know about.
    /// The returned action may omit domains; the orchestrator's routing policy
    /// decides what those domains receive.
    fn get_action(&mut self, state: &CompositeState<O>) -> Result<CompositeAction<A>, AgentError>;

    /// Update the agent from the most recent tick.
    ///
    /// Called once per tick, after every domain has stepped.
    fn learn(&mut self, _transition: Transition<O, A>) -> Result<(), AgentError> {
        Ok(()) // Default implementation does nothing
    }
}

impl<O, A, T: Agent<O, A> + ?Sized> Agent<O, A> for Box<T> {
    fn get_action(&mut self, state: &CompositeState<O>) -> Result<CompositeAction<A>, AgentError> {
        T::get_action(self, state)
    }

    fn learn(&mut self, transition: Transition<O, A>) -> Result<(), AgentError> {
        T::learn(self, transition)
    }
}

/// Build an agent from a configuration.
pub trait BuildAgent<T> {
    /// Build an agent instance.
    ///
    /// # Args
    /// * `seed` - Seed for pseudo-randomness used by the agent.
    fn build_agent(&self, seed: u64) -> Result<T, BuildAgentError>;
}
