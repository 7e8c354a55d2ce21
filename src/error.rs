//! Error type
use crate::agents::BuildAgentError;
use crate::simulation::{ConfigError, RunError};
use crate::simulators::SimulatorError;
use thiserror::Error;

/// Error from building or running a composed simulation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("error building agent")]
    BuildAgent(#[from] BuildAgentError),
    #[error("error building simulator")]
    BuildSimulator(#[from] SimulatorError),
    #[error("invalid orchestrator configuration")]
    Config(#[from] ConfigError),
    #[error("simulation run failed")]
    Run(#[from] RunError),
}
