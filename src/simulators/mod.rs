//! Simulator contract and built-in simulators.
mod idle;
mod quantum;
#[cfg(test)]
pub mod testing;

pub use idle::{IdleConfig, IdleSimulator};
pub use quantum::{MockQuantumConfig, MockQuantumSimulator};

use crate::logging::Loggable;
use std::collections::BTreeMap;
use std::error::Error;
use thiserror::Error;

/// Auxiliary information returned alongside observations.
///
/// Empty if the simulator has nothing to report.
pub type Info = BTreeMap<String, Loggable>;

/// The outcome of advancing a simulator by one unit of time.
#[derive(Debug, Clone, PartialEq)]
pub struct SimStep<O> {
    /// Observation of the resulting state.
    pub observation: O,
    /// Reward for this step.
    pub reward: f64,
    /// Whether the simulator has reached the end of its episode.
    pub done: bool,
    pub info: Info,
}

/// A simulated sub-environment (one domain) driven by the orchestrator.
///
/// Simulators own their configuration and any connection to an external engine.
/// Calls are made sequentially from a single thread and may block.
pub trait Simulator {
    type Observation;
    type Action;

    /// Establish the initial internal configuration.
    ///
    /// May be invoked implicitly by [`Simulator::reset`].
    fn setup(&mut self) -> Result<(), SimulatorError>;

    /// Return to an initial state and start a fresh episode.
    ///
    /// Repeated calls each produce a freshly initialized episode.
    ///
    /// # Returns
    /// * `observation` - The first observation of the episode.
    ///     Subsequent calls to [`Simulator::get_state`] return the same value.
    /// * `info` - Auxiliary information.
    fn reset(&mut self) -> Result<(Self::Observation, Info), SimulatorError>;

    /// Apply one action and advance simulation time by one unit.
    ///
    /// `None` requests a no-op step. This never fails for a simulator that has been reset.
    fn step(
        &mut self,
        action: Option<&Self::Action>,
    ) -> Result<SimStep<Self::Observation>, SimulatorError>;

    /// The most recent observation, without advancing time.
    fn get_state(&self) -> Result<Self::Observation, SimulatorError>;

    /// Release external resources. Safe to call more than once.
    fn close(&mut self) -> Result<(), SimulatorError> {
        Ok(())
    }
}

impl<S: Simulator + ?Sized> Simulator for Box<S> {
    type Observation = S::Observation;
    type Action = S::Action;

    fn setup(&mut self) -> Result<(), SimulatorError> {
        S::setup(self)
    }
    fn reset(&mut self) -> Result<(Self::Observation, Info), SimulatorError> {
        S::reset(self)
    }
    fn step(
        &mut self,
        action: Option<&Self::Action>,
    ) -> Result<SimStep<Self::Observation>, SimulatorError> {
        S::step(self, action)
    }
    fn get_state(&self) -> Result<Self::Observation, SimulatorError> {
        S::get_state(self)
    }
    fn close(&mut self) -> Result<(), SimulatorError> {
        S::close(self)
    }
}

/// Build a simulator from a configuration.
pub trait BuildSimulator<S> {
    /// Build a simulator instance.
    ///
    /// # Args
    /// * `seed` - Seed for any pseudo-randomness used by the simulator.
    fn build_simulator(&self, seed: u64) -> Result<S, SimulatorError>;
}

/// Error raised by a simulator.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Required preconditions could not be established (for example an unreachable endpoint).
    #[error("simulator initialization failed: {0}")]
    Initialization(String),
    /// The simulator was called in a way its contract does not allow.
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),
    /// A failure inside the simulated process itself.
    #[error("domain simulation failed")]
    Domain(#[source] Box<dyn Error + Send + Sync>),
}

/// Misuse of a simulator by its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("simulator used before reset")]
    NotReset,
    #[error("invalid action {action}; expected an element of {expected}")]
    InvalidAction { action: String, expected: String },
}
