use super::{Agent, AgentError, BuildAgent, BuildAgentError};
use crate::composite::{Composite, CompositeAction, CompositeState, Domain};
use crate::spaces::IndexSpace;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinalities of the discrete action spaces a [`RandomAgent`] samples from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpaces {
    /// An independent action space per domain.
    PerDomain(Vec<(Domain, usize)>),
    /// One action space shared by several domains.
    ///
    /// A single index is sampled each tick and given to every domain.
    Shared { size: usize, domains: Vec<Domain> },
}

impl Default for ActionSpaces {
    fn default() -> Self {
        Self::Shared {
            size: 5,
            domains: vec![Domain::CLASSICAL, Domain::QUANTUM],
        }
    }
}

/// Configuration of a [`RandomAgent`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomAgentConfig {
    pub action_spaces: ActionSpaces,
}

impl BuildAgent<RandomAgent> for RandomAgentConfig {
    fn build_agent(&self, seed: u64) -> Result<RandomAgent, BuildAgentError> {
        RandomAgent::new(self.action_spaces.clone(), seed)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Sampling {
    Independent(Composite<IndexSpace>),
    Shared {
        space: IndexSpace,
        domains: Vec<Domain>,
    },
}

/// An agent that always acts uniformly at random.
///
/// Ignores the state and never learns.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    sampling: Sampling,
    rng: StdRng,
}

impl RandomAgent {
    /// Create a new random agent with a seeded generator.
    pub fn new(action_spaces: ActionSpaces, seed: u64) -> Result<Self, BuildAgentError> {
        Ok(Self {
            sampling: Sampling::try_from_spaces(action_spaces)?,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Sampling {
    fn try_from_spaces(action_spaces: ActionSpaces) -> Result<Self, BuildAgentError> {
        match action_spaces {
            ActionSpaces::PerDomain(sizes) => {
                if sizes.is_empty() {
                    return Err(BuildAgentError::NoDomains);
                }
                let mut spaces = Composite::with_capacity(sizes.len());
                for (domain, size) in sizes {
                    if size == 0 {
                        return Err(BuildAgentError::EmptyActionSpace(domain));
                    }
                    if spaces.contains(&domain) {
                        return Err(BuildAgentError::DuplicateDomain(domain));
                    }
                    spaces.insert(domain, IndexSpace::new(size));
                }
                Ok(Self::Independent(spaces))
            }
            ActionSpaces::Shared { size, domains } => {
                if domains.is_empty() {
                    return Err(BuildAgentError::NoDomains);
                }
                if size == 0 {
                    return Err(BuildAgentError::EmptyActionSpace(domains[0].clone()));
                }
                for (i, domain) in domains.iter().enumerate() {
                    if domains[..i].contains(domain) {
                        return Err(BuildAgentError::DuplicateDomain(domain.clone()));
                    }
                }
                Ok(Self::Shared {
                    space: IndexSpace::new(size),
                    domains,
                })
            }
        }
    }
}

impl<O> Agent<O, usize> for RandomAgent {
    fn get_action(
        &mut self,
        _state: &CompositeState<O>,
    ) -> Result<CompositeAction<usize>, AgentError> {
        let rng = &mut self.rng;
        Ok(match &self.sampling {
            Sampling::Independent(spaces) => spaces
                .iter()
                .map(|(domain, space)| (domain.clone(), space.sample(&mut *rng)))
                .collect(),
            Sampling::Shared { space, domains } => {
                let action = space.sample(&mut *rng);
                domains.iter().map(|domain| (domain.clone(), action)).collect()
            }
        })
    }
}

impl fmt::Display for RandomAgent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RandomAgent(")?;
        match &self.sampling {
            Sampling::Independent(spaces) => {
                for (i, (domain, space)) in spaces.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", domain, space)?;
                }
            }
            Sampling::Shared { space, domains } => {
                let names: Vec<_> = domains.iter().map(Domain::as_str).collect();
                write!(f, "{}: {}", names.join(" = "), space)?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    type State = CompositeState<f64>;

    #[fixture]
    fn state() -> State {
        vec![(Domain::CLASSICAL, 0.5), (Domain::from_static("unknown"), 1.0)]
            .into_iter()
            .collect()
    }

    fn per_domain(classical: usize, quantum: usize) -> ActionSpaces {
        ActionSpaces::PerDomain(vec![(Domain::CLASSICAL, classical), (Domain::QUANTUM, quantum)])
    }

    #[rstest]
    fn per_domain_actions_in_range(state: State) {
        let mut agent = RandomAgent::new(per_domain(2, 7), 0).unwrap();
        for _ in 0..100 {
            let action = agent.get_action(&state).unwrap();
            assert_eq!(action.len(), 2);
            assert!(*action.get("classical").unwrap() < 2);
            assert!(*action.get("quantum").unwrap() < 7);
        }
    }

    #[rstest]
    fn per_domain_samples_independently(state: State) {
        let mut agent = RandomAgent::new(per_domain(10, 10), 1).unwrap();
        let differs = (0..100).any(|_| {
            let action = agent.get_action(&state).unwrap();
            action.get("classical") != action.get("quantum")
        });
        assert!(differs);
    }

    #[rstest]
    fn shared_space_reuses_one_sample(state: State) {
        let mut agent = RandomAgent::new(ActionSpaces::default(), 2).unwrap();
        let mut seen = [false; 5];
        for _ in 0..200 {
            let action = agent.get_action(&state).unwrap();
            let classical = *action.get("classical").unwrap();
            assert_eq!(action.get("quantum"), Some(&classical));
            seen[classical] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[rstest]
    fn single_element_space(state: State) {
        let mut agent = RandomAgent::new(per_domain(1, 1), 3).unwrap();
        let action = agent.get_action(&state).unwrap();
        assert_eq!(action.get("classical"), Some(&0));
        assert_eq!(action.get("quantum"), Some(&0));
    }

    #[rstest]
    fn seeded_agents_agree(state: State) {
        let mut a = RandomAgent::new(per_domain(100, 100), 4).unwrap();
        let mut b = RandomAgent::new(per_domain(100, 100), 4).unwrap();
        for _ in 0..10 {
            assert_eq!(
                a.get_action(&state).unwrap(),
                b.get_action(&state).unwrap()
            );
        }
    }

    #[rstest]
    fn learn_is_a_noop(state: State) {
        let mut agent = RandomAgent::new(per_domain(3, 3), 5).unwrap();
        let action = agent.get_action(&state).unwrap();
        let transition = crate::agents::Transition {
            state: &state,
            action: &action,
            reward: 1.0,
            next_state: &state,
            done: false,
        };
        agent.learn(transition).unwrap();
    }

    #[rstest]
    #[case(per_domain(0, 3), BuildAgentError::EmptyActionSpace(Domain::CLASSICAL))]
    #[case(per_domain(3, 0), BuildAgentError::EmptyActionSpace(Domain::QUANTUM))]
    #[case(ActionSpaces::PerDomain(vec![]), BuildAgentError::NoDomains)]
    #[case(
        ActionSpaces::Shared { size: 0, domains: vec![Domain::QUANTUM] },
        BuildAgentError::EmptyActionSpace(Domain::QUANTUM)
    )]
    #[case(ActionSpaces::Shared { size: 3, domains: vec![] }, BuildAgentError::NoDomains)]
    #[case(
        ActionSpaces::PerDomain(vec![(Domain::QUANTUM, 2), (Domain::QUANTUM, 4)]),
        BuildAgentError::DuplicateDomain(Domain::QUANTUM)
    )]
    #[case(
        ActionSpaces::Shared { size: 3, domains: vec![Domain::CLASSICAL, Domain::CLASSICAL] },
        BuildAgentError::DuplicateDomain(Domain::CLASSICAL)
    )]
    fn invalid_action_spaces(#[case] spaces: ActionSpaces, #[case] expected: BuildAgentError) {
        assert_eq!(RandomAgent::new(spaces, 0).unwrap_err(), expected);
    }

    #[test]
    fn display() {
        let agent = RandomAgent::new(per_domain(2, 3), 0).unwrap();
        assert_eq!(
            agent.to_string(),
            "RandomAgent(classical: IndexSpace(2), quantum: IndexSpace(3))"
        );
        let agent = RandomAgent::new(ActionSpaces::default(), 0).unwrap();
        assert_eq!(
            agent.to_string(),
            "RandomAgent(classical = quantum: IndexSpace(5))"
        );
    }

    #[test]
    fn config_deserializes() {
        let config: RandomAgentConfig = serde_json::from_str(
            r#"{"action_spaces": {"per_domain": [["classical", 4], ["quantum", 2]]}}"#,
        )
        .unwrap();
        assert_eq!(config.action_spaces, per_domain(4, 2));
        let agent = config.build_agent(0).unwrap();
        assert!(agent.to_string().contains("quantum: IndexSpace(2)"));
    }
}
