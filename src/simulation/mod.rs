//! Orchestrating agent-simulator interaction
pub mod hooks;
mod orchestrator;
mod routing;

pub use hooks::{DomainOutcome, OrchestratorHook, StepLogger};
pub use orchestrator::{BoxedSimulator, Orchestrator, OrchestratorConfig};
pub use routing::ActionRouting;

use crate::agents::AgentError;
use crate::composite::Domain;
use crate::logging::LogError;
use crate::simulators::SimulatorError;
use thiserror::Error;

/// Lifecycle of an [`Orchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Constructed; no episode has been run.
    Idle,
    /// Inside an episode. Remains set if a run fails.
    Running,
    /// The most recent episode completed, by exhaustion or termination.
    Finished,
}

/// Summary of one episode.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Number of completed ticks.
    pub ticks: u64,
    /// Sum of the total reward of every tick.
    pub total_reward: f64,
    /// Whether a domain ended the episode before the tick budget was exhausted.
    pub terminated: bool,
}

/// Error in the orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("domain {0} is configured more than once")]
    DuplicateDomain(Domain),
}

/// Error running an episode.
///
/// Errors are never recovered from; the first one aborts the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no simulators configured")]
    NoSimulators,
    #[error("simulator for domain {domain} failed")]
    Simulator {
        domain: Domain,
        #[source]
        source: SimulatorError,
    },
    #[error("agent failed")]
    Agent(#[from] AgentError),
    #[error("logging failed")]
    Log(#[from] LogError),
}

impl RunError {
    fn simulator(domain: &Domain, source: SimulatorError) -> Self {
        Self::Simulator {
            domain: domain.clone(),
            source,
        }
    }
}
