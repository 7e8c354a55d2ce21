//! Classical and quantum network simulators under one reinforcement learning control loop.
//!
//! An [`Orchestrator`] owns one [`Simulator`] per [`Domain`] and a single [`Agent`].
//! Each tick it gathers a [`CompositeState`], asks the agent for a [`CompositeAction`],
//! routes the sub-actions to the simulators and aggregates their rewards and termination flags.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)]
pub mod agents;
pub mod composite;
mod error;
pub mod logging;
pub mod simulation;
pub mod simulators;
pub mod spaces;

pub use agents::{Agent, BuildAgent, RandomAgent, Transition};
pub use composite::{Composite, CompositeAction, CompositeState, Domain};
pub use error::Error;
pub use simulation::{ActionRouting, EpisodeSummary, Orchestrator, Phase, RunError};
pub use simulators::{BuildSimulator, Info, SimStep, Simulator, SimulatorError};
