//! Mock quantum network
use super::{BuildSimulator, ContractViolation, Info, SimStep, Simulator, SimulatorError};
use crate::logging::Loggable;
use crate::spaces::{IndexSpace, Space};
use ndarray::Array1;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration of a [`MockQuantumSimulator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockQuantumConfig {
    /// Number of entangled channels.
    pub num_channels: usize,
    /// Range `[low, high)` from which initial channel fidelities are drawn.
    pub initial_fidelity: (f64, f64),
    /// Fidelity lost by every channel on each step.
    pub decay: f64,
    /// Fidelity of a channel right after it is refreshed.
    pub refresh_fidelity: f64,
}

impl Default for MockQuantumConfig {
    fn default() -> Self {
        Self {
            num_channels: 5,
            initial_fidelity: (0.7, 0.95),
            decay: 0.01,
            refresh_fidelity: 0.95,
        }
    }
}

impl BuildSimulator<MockQuantumSimulator> for MockQuantumConfig {
    fn build_simulator(&self, seed: u64) -> Result<MockQuantumSimulator, SimulatorError> {
        MockQuantumSimulator::new(*self, seed)
    }
}

/// Stand-in for a quantum network engine.
///
/// Tracks the entanglement fidelity of a fixed set of channels.
/// Every step all fidelities decay; the action is the index of a channel to refresh.
/// The reward is the mean fidelity and episodes never terminate on their own.
///
/// Observations are the vector of channel fidelities, each in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct MockQuantumSimulator {
    config: MockQuantumConfig,
    action_space: IndexSpace,
    initial_fidelity: Uniform<f64>,
    rng: StdRng,
    /// `None` until the first `setup`.
    fidelity: Option<Array1<f64>>,
    time_step: u64,
}

impl MockQuantumSimulator {
    pub fn new(config: MockQuantumConfig, seed: u64) -> Result<Self, SimulatorError> {
        let (low, high) = config.initial_fidelity;
        if config.num_channels == 0 {
            return Err(SimulatorError::Initialization(
                "at least one quantum channel is required".into(),
            ));
        }
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
            return Err(SimulatorError::Initialization(format!(
                "invalid initial fidelity range [{}, {})",
                low, high
            )));
        }
        if !config.decay.is_finite() || config.decay < 0.0 {
            return Err(SimulatorError::Initialization(format!(
                "invalid fidelity decay {}",
                config.decay
            )));
        }
        if !(0.0..=1.0).contains(&config.refresh_fidelity) {
            return Err(SimulatorError::Initialization(format!(
                "invalid refresh fidelity {}",
                config.refresh_fidelity
            )));
        }
        Ok(Self {
            config,
            action_space: IndexSpace::new(config.num_channels),
            initial_fidelity: Uniform::new(low, high),
            rng: StdRng::seed_from_u64(seed),
            fidelity: None,
            time_step: 0,
        })
    }

    /// The space of valid actions: one index per channel.
    pub const fn action_space(&self) -> IndexSpace {
        self.action_space
    }

    /// Number of steps taken since the last reset.
    pub const fn time_step(&self) -> u64 {
        self.time_step
    }

    fn info(&self) -> Info {
        let mut info = Info::new();
        info.insert("time_step".into(), Loggable::Scalar(self.time_step as f64));
        info
    }
}

impl fmt::Display for MockQuantumSimulator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MockQuantumSimulator({})", self.config.num_channels)
    }
}

impl Simulator for MockQuantumSimulator {
    type Observation = Array1<f64>;
    type Action = usize;

    fn setup(&mut self) -> Result<(), SimulatorError> {
        let rng = &mut self.rng;
        let initial_fidelity = &self.initial_fidelity;
        self.fidelity = Some(Array1::from_shape_fn(self.config.num_channels, |_| {
            initial_fidelity.sample(&mut *rng)
        }));
        self.time_step = 0;
        Ok(())
    }

    fn reset(&mut self) -> Result<(Self::Observation, Info), SimulatorError> {
        self.setup()?;
        Ok((self.get_state()?, self.info()))
    }

    fn step(
        &mut self,
        action: Option<&Self::Action>,
    ) -> Result<SimStep<Self::Observation>, SimulatorError> {
        if let Some(channel) = action {
            if !self.action_space.contains(channel) {
                return Err(ContractViolation::InvalidAction {
                    action: channel.to_string(),
                    expected: self.action_space.to_string(),
                }
                .into());
            }
        }
        let fidelity = self
            .fidelity
            .as_mut()
            .ok_or(ContractViolation::NotReset)?;

        let decay = self.config.decay;
        fidelity.mapv_inplace(|f| f - decay);
        if let Some(&channel) = action {
            fidelity[channel] = self.config.refresh_fidelity;
        }
        fidelity.mapv_inplace(|f| f.clamp(0.0, 1.0));
        self.time_step += 1;

        let reward = fidelity.mean().unwrap_or(0.0);
        Ok(SimStep {
            observation: fidelity.clone(),
            reward,
            done: false,
            info: self.info(),
        })
    }

    fn get_state(&self) -> Result<Self::Observation, SimulatorError> {
        Ok(self.fidelity.clone().ok_or(ContractViolation::NotReset)?)
    }

    /// Drops the channel state; the simulator must be reset before it is stepped again.
    fn close(&mut self) -> Result<(), SimulatorError> {
        self.fidelity = None;
        Ok(())
    }
}
