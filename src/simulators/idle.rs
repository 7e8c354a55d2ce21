//! Idle simulator
use super::{BuildSimulator, ContractViolation, Info, SimStep, Simulator, SimulatorError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Configuration of an [`IdleSimulator`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Length of the (all-zero) observation vector.
    pub observation_size: usize,
}

impl<A> BuildSimulator<IdleSimulator<A>> for IdleConfig {
    fn build_simulator(&self, _seed: u64) -> Result<IdleSimulator<A>, SimulatorError> {
        Ok(IdleSimulator::new(self.observation_size))
    }
}

/// A domain with nothing behind it.
///
/// Accepts any action and ignores it; observes a constant zero vector,
/// yields zero reward and never ends the episode.
/// Useful to fill a domain whose engine is not available.
pub struct IdleSimulator<A> {
    observation_size: usize,
    is_reset: bool,
    action: PhantomData<fn(&A)>,
}

impl<A> IdleSimulator<A> {
    pub const fn new(observation_size: usize) -> Self {
        Self {
            observation_size,
            is_reset: false,
            action: PhantomData,
        }
    }
}

impl<A> fmt::Debug for IdleSimulator<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IdleSimulator")
            .field("observation_size", &self.observation_size)
            .field("is_reset", &self.is_reset)
            .finish()
    }
}

impl<A> Simulator for IdleSimulator<A> {
    type Observation = Array1<f64>;
    type Action = A;

    fn setup(&mut self) -> Result<(), SimulatorError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(Self::Observation, Info), SimulatorError> {
        self.setup()?;
        self.is_reset = true;
        Ok((Array1::zeros(self.observation_size), Info::new()))
    }

    fn step(&mut self, _: Option<&A>) -> Result<SimStep<Self::Observation>, SimulatorError> {
        if !self.is_reset {
            return Err(ContractViolation::NotReset.into());
        }
        Ok(SimStep {
            observation: Array1::zeros(self.observation_size),
            reward: 0.0,
            done: false,
            info: Info::new(),
        })
    }

    fn get_state(&self) -> Result<Self::Observation, SimulatorError> {
        if self.is_reset {
            Ok(Array1::zeros(self.observation_size))
        } else {
            Err(ContractViolation::NotReset.into())
        }
    }
}
