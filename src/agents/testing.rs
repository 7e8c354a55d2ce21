//! Agent testing utilities
use super::{Agent, AgentError, Transition};
use crate::composite::{CompositeAction, CompositeState, Domain};
use std::io;

/// A transition with owned states and actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<O, A> {
    pub state: CompositeState<O>,
    pub action: CompositeAction<A>,
    pub reward: f64,
    pub next_state: CompositeState<O>,
    pub done: bool,
}

/// An agent that always returns the same composite action and records everything it sees.
#[derive(Debug, Clone)]
pub struct FixedAgent<O, A> {
    action: CompositeAction<A>,
    /// Every state passed to `get_action`.
    pub observed: Vec<CompositeState<O>>,
    /// Every transition passed to `learn`.
    pub learned: Vec<Recorded<O, A>>,
    /// Fail `learn` on this call (counting from 1).
    fail_learn_at: Option<usize>,
}

impl<O, A> FixedAgent<O, A> {
    pub fn new<I: IntoIterator<Item = (Domain, A)>>(action: I) -> Self {
        Self {
            action: action.into_iter().collect(),
            observed: Vec::new(),
            learned: Vec::new(),
            fail_learn_at: None,
        }
    }

    pub fn fail_learn_at(mut self, call: usize) -> Self {
        self.fail_learn_at = Some(call);
        self
    }

    /// The rewards of every learned transition, in order.
    pub fn rewards(&self) -> Vec<f64> {
        self.learned.iter().map(|t| t.reward).collect()
    }
}

impl<O: Clone, A: Clone> Agent<O, A> for FixedAgent<O, A> {
    fn get_action(&mut self, state: &CompositeState<O>) -> Result<CompositeAction<A>, AgentError> {
        self.observed.push(state.clone());
        Ok(self.action.clone())
    }

    fn learn(&mut self, transition: Transition<O, A>) -> Result<(), AgentError> {
        if self.fail_learn_at == Some(self.learned.len() + 1) {
            let error: Box<dyn std::error::Error + Send + Sync> =
                Box::new(io::Error::new(io::ErrorKind::Other, "update diverged"));
            return Err(error.into());
        }
        self.learned.push(Recorded {
            state: transition.state.clone(),
            action: transition.action.clone(),
            reward: transition.reward,
            next_state: transition.next_state.clone(),
            done: transition.done,
        });
        Ok(())
    }
}
