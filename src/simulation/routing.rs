use crate::composite::{CompositeAction, Domain};
use serde::{Deserialize, Serialize};

/// How the orchestrator picks the sub-action dispatched to each domain.
///
/// A domain always receives the action stored under its own key if there is one.
/// When there is none, the policy decides.
/// If nothing is found the domain is stepped with `None` (a no-op).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRouting {
    /// Only the domain's own key is used.
    Strict,
    /// Use the action of the given domain when the own key is missing.
    ///
    /// Lets an agent with a single flat action space drive every domain.
    Fallback(Domain),
}

/// Falls back to the quantum domain.
impl Default for ActionRouting {
    fn default() -> Self {
        Self::Fallback(Domain::QUANTUM)
    }
}

impl ActionRouting {
    /// The sub-action to dispatch to `domain`, if any.
    pub fn resolve<'a, A>(&self, domain: &Domain, action: &'a CompositeAction<A>) -> Option<&'a A> {
        action.get(domain).or_else(|| match self {
            Self::Strict => None,
            Self::Fallback(default) => action.get(default),
        })
    }
}
