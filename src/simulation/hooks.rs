//! Orchestrator hooks.
//!
//! Hooks observe an episode at fixed points without taking part in its control flow.
use super::EpisodeSummary;
use crate::agents::Transition;
use crate::composite::{Composite, CompositeState};
use crate::logging::{Event, LogError, Logger};
use crate::simulators::Info;
use crate::spaces::Space;
use impl_trait_for_tuples::impl_for_tuples;

/// What happened to one domain during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainOutcome<'a, A> {
    /// The sub-action dispatched to the domain's simulator.
    pub action: Option<&'a A>,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

/// An orchestrator hook.
///
/// Callbacks invoked at defined points of an episode. Every method defaults to doing nothing.
/// An error returned by a hook aborts the run.
pub trait OrchestratorHook<O, A> {
    /// Called after every simulator has been reset.
    fn episode_start(
        &mut self,
        _state: &CompositeState<O>,
        _logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        Ok(())
    }

    /// Called at the start of a tick, before the agent chooses an action.
    fn pre_action(
        &mut self,
        _tick: u64,
        _state: &CompositeState<O>,
        _logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        Ok(())
    }

    /// Called once every domain has stepped, before the agent learns.
    ///
    /// # Args
    /// * `tick` - Index of the tick within the episode, starting from 0.
    /// * `transition` - The aggregated transition that is about to be learned from.
    /// * `outcomes` - The dispatched action and step result of each domain.
    /// * `logger` - A logger.
    fn post_step(
        &mut self,
        _tick: u64,
        _transition: &Transition<O, A>,
        _outcomes: &Composite<DomainOutcome<'_, A>>,
        _logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        Ok(())
    }

    /// Called when the episode finishes, by exhaustion or termination.
    fn episode_end(
        &mut self,
        _summary: &EpisodeSummary,
        _logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        Ok(())
    }
}

impl<O, A> OrchestratorHook<O, A> for () {}

// For a tuple of hooks, call each in order and stop at the first error.
#[impl_for_tuples(1, 8)]
impl<O, A> OrchestratorHook<O, A> for Tuple {
    fn episode_start(
        &mut self,
        state: &CompositeState<O>,
        logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        for_tuples!( #( self.Tuple.episode_start(state, logger)?; )* );
        Ok(())
    }

    fn pre_action(
        &mut self,
        tick: u64,
        state: &CompositeState<O>,
        logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        for_tuples!( #( self.Tuple.pre_action(tick, state, logger)?; )* );
        Ok(())
    }

    fn post_step(
        &mut self,
        tick: u64,
        transition: &Transition<O, A>,
        outcomes: &Composite<DomainOutcome<'_, A>>,
        logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        for_tuples!( #( self.Tuple.post_step(tick, transition, outcomes, logger)?; )* );
        Ok(())
    }

    fn episode_end(
        &mut self,
        summary: &EpisodeSummary,
        logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        for_tuples!( #( self.Tuple.episode_end(summary, logger)?; )* );
        Ok(())
    }
}

/// A hook that logs tick and episode statistics.
///
/// Per tick: the total reward, each domain's reward and info entries,
/// and the dispatched action of each domain with a known action space.
/// Per episode: the length, return, and how the episode ended.
#[derive(Debug, Clone, PartialEq)]
pub struct StepLogger<AS> {
    /// Action spaces used to log dispatched actions, by domain.
    pub action_spaces: Composite<AS>,

    /// Length of the current episode
    episode_length: u64,
    episode_reward: f64,
}

impl<AS> StepLogger<AS> {
    pub const fn new(action_spaces: Composite<AS>) -> Self {
        Self {
            action_spaces,
            episode_length: 0,
            episode_reward: 0.0,
        }
    }
}

impl<AS> Default for StepLogger<AS> {
    fn default() -> Self {
        Self::new(Composite::new())
    }
}

impl<O, AS: Space> OrchestratorHook<O, AS::Element> for StepLogger<AS> {
    fn episode_start(
        &mut self,
        _: &CompositeState<O>,
        _: &mut dyn Logger,
    ) -> Result<(), LogError> {
        self.episode_length = 0;
        self.episode_reward = 0.0;
        Ok(())
    }

    fn post_step(
        &mut self,
        _: u64,
        transition: &Transition<O, AS::Element>,
        outcomes: &Composite<DomainOutcome<'_, AS::Element>>,
        logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        logger.log(Event::Tick, "reward", transition.reward.into())?;
        for (domain, outcome) in outcomes.iter() {
            logger.log(
                Event::Tick,
                &format!("{}/reward", domain),
                outcome.reward.into(),
            )?;
            if let (Some(space), Some(action)) = (self.action_spaces.get(domain), outcome.action)
            {
                logger.log(
                    Event::Tick,
                    &format!("{}/action", domain),
                    space.as_loggable(action),
                )?;
            }
            for (key, value) in &outcome.info {
                logger.log(Event::Tick, &format!("{}/{}", domain, key), value.clone())?;
            }
        }
        logger.done(Event::Tick)?;

        self.episode_length += 1;
        self.episode_reward += transition.reward;
        Ok(())
    }

    fn episode_end(
        &mut self,
        summary: &EpisodeSummary,
        logger: &mut dyn Logger,
    ) -> Result<(), LogError> {
        logger.log(Event::Episode, "length", (self.episode_length as f64).into())?;
        logger.log(Event::Episode, "reward", self.episode_reward.into())?;
        let end = if summary.terminated {
            "terminated"
        } else {
            "exhausted"
        };
        logger.log(Event::Episode, "end", end.into())?;
        logger.done(Event::Episode)
    }
}
