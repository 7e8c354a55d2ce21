//! Agent errors
use crate::composite::Domain;
use std::error::Error;
use thiserror::Error;

/// Error building an agent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildAgentError {
    #[error("action space of domain {0} must have at least one element")]
    EmptyActionSpace(Domain),
    #[error("no action domains configured")]
    NoDomains,
    #[error("action space of domain {0} is configured more than once")]
    DuplicateDomain(Domain),
}

/// Error raised while choosing an action or learning
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}
