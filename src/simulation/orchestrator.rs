use super::hooks::{DomainOutcome, OrchestratorHook};
use super::{ActionRouting, ConfigError, EpisodeSummary, Phase, RunError};
use crate::agents::{Agent, Transition};
use crate::composite::{Composite, CompositeState, Domain};
use crate::logging::Logger;
use crate::simulators::Simulator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A type-erased simulator.
pub type BoxedSimulator<O, A> = Box<dyn Simulator<Observation = O, Action = A>>;

/// Orchestrator configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub routing: ActionRouting,
}

/// Drives one agent against a set of simulators, one per domain.
///
/// Each tick the agent chooses a composite action from the composite state,
/// every simulator is stepped in configuration order with its sub-action,
/// and the agent learns from the aggregated transition.
/// The tick reward is the sum of the domain rewards
/// and the episode ends as soon as any domain reports `done`.
///
/// Simulators are never closed implicitly; call [`Orchestrator::close`] when done.
///
/// Every domain shares the observation type `O` and the action type `A`.
/// To compose simulators with different observation or action types,
/// wrap each in an adapter that maps its own types into a common enum,
/// for example `enum Observation { Classical(..), Quantum(Array1<f64>) }`.
pub struct Orchestrator<O, A, G, H = ()> {
    simulators: Composite<BoxedSimulator<O, A>>,
    agent: G,
    hook: H,
    routing: ActionRouting,
    phase: Phase,
}

impl<O, A, G> Orchestrator<O, A, G> {
    /// Create an orchestrator without simulators.
    pub fn new(agent: G) -> Self {
        Self {
            simulators: Composite::new(),
            agent,
            hook: (),
            routing: ActionRouting::default(),
            phase: Phase::Idle,
        }
    }
}

impl<O, A, G, H> Orchestrator<O, A, G, H> {
    /// Replace the hook.
    pub fn with_hook<H2>(self, hook: H2) -> Orchestrator<O, A, G, H2> {
        Orchestrator {
            simulators: self.simulators,
            agent: self.agent,
            hook,
            routing: self.routing,
            phase: self.phase,
        }
    }

    pub fn with_routing(mut self, routing: ActionRouting) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_config(self, config: &OrchestratorConfig) -> Self {
        self.with_routing(config.routing.clone())
    }

    /// Add the simulator responsible for `domain`.
    ///
    /// Domains are stepped in the order they are added.
    pub fn add_simulator<S>(&mut self, domain: Domain, simulator: S) -> Result<(), ConfigError>
    where
        S: Simulator<Observation = O, Action = A> + 'static,
    {
        if self.simulators.contains(&domain) {
            return Err(ConfigError::DuplicateDomain(domain));
        }
        self.simulators.insert(domain, Box::new(simulator));
        Ok(())
    }

    pub fn with_simulator<S>(mut self, domain: Domain, simulator: S) -> Result<Self, ConfigError>
    where
        S: Simulator<Observation = O, Action = A> + 'static,
    {
        self.add_simulator(domain, simulator)?;
        Ok(self)
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn routing(&self) -> &ActionRouting {
        &self.routing
    }

    /// Configured domains in stepping order.
    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.simulators.domains()
    }

    pub fn simulator(&self, domain: &str) -> Option<&BoxedSimulator<O, A>> {
        self.simulators.get(domain)
    }

    pub fn simulator_mut(&mut self, domain: &str) -> Option<&mut BoxedSimulator<O, A>> {
        self.simulators.get_mut(domain)
    }

    pub const fn agent(&self) -> &G {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut G {
        &mut self.agent
    }

    pub const fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Close every simulator.
    ///
    /// All simulators are closed even if some fail; the first error is returned.
    pub fn close(&mut self) -> Result<(), RunError> {
        let mut result = Ok(());
        for (domain, simulator) in self.simulators.iter_mut() {
            if let Err(error) = simulator.close() {
                if result.is_ok() {
                    result = Err(RunError::simulator(domain, error));
                }
            }
        }
        result
    }

    /// Decompose into the simulators, agent and hook.
    pub fn into_parts(self) -> (Composite<BoxedSimulator<O, A>>, G, H) {
        (self.simulators, self.agent, self.hook)
    }
}

impl<O, A, G, H> Orchestrator<O, A, G, H>
where
    G: Agent<O, A>,
    H: OrchestratorHook<O, A>,
{
    /// Run one episode of at most `num_steps` ticks.
    ///
    /// Every simulator is reset first, so an orchestrator may run any number of episodes.
    /// The first error aborts the run and leaves the phase at [`Phase::Running`].
    pub fn run(&mut self, num_steps: u64) -> Result<EpisodeSummary, RunError> {
        self.run_with_logger(num_steps, &mut ())
    }

    /// Run one episode of at most `num_steps` ticks, passing `logger` to the hook.
    pub fn run_with_logger(
        &mut self,
        num_steps: u64,
        logger: &mut dyn Logger,
    ) -> Result<EpisodeSummary, RunError> {
        if self.simulators.is_empty() {
            return Err(RunError::NoSimulators);
        }
        self.phase = Phase::Running;

        for (domain, simulator) in self.simulators.iter_mut() {
            simulator
                .reset()
                .map_err(|e| RunError::simulator(domain, e))?;
        }
        let mut state = self.composite_state()?;
        self.hook.episode_start(&state, logger)?;

        let mut summary = EpisodeSummary::default();
        while summary.ticks < num_steps {
            self.hook.pre_action(summary.ticks, &state, logger)?;
            let action = self.agent.get_action(&state)?;

            let mut next_state = Composite::with_capacity(self.simulators.len());
            let mut outcomes = Composite::with_capacity(self.simulators.len());
            let mut rewards = Vec::with_capacity(self.simulators.len());
            let mut done = false;
            for (domain, simulator) in self.simulators.iter_mut() {
                let sub_action = self.routing.resolve(domain, &action);
                let step = simulator
                    .step(sub_action)
                    .map_err(|e| RunError::simulator(domain, e))?;
                rewards.push(step.reward);
                done |= step.done;
                next_state.insert(domain.clone(), step.observation);
                outcomes.insert(
                    domain.clone(),
                    DomainOutcome {
                        action: sub_action,
                        reward: step.reward,
                        done: step.done,
                        info: step.info,
                    },
                );
            }

            let reward = sum_rewards(rewards);
            let transition = Transition {
                state: &state,
                action: &action,
                reward,
                next_state: &next_state,
                done,
            };
            self.hook
                .post_step(summary.ticks, &transition, &outcomes, logger)?;
            self.agent.learn(transition)?;

            summary.ticks += 1;
            summary.total_reward += reward;
            state = next_state;
            if done {
                summary.terminated = true;
                break;
            }
        }

        self.hook.episode_end(&summary, logger)?;
        self.phase = Phase::Finished;
        Ok(summary)
    }

    /// Run one episode then close every simulator, whether or not the run succeeded.
    ///
    /// A run error takes precedence over an error from closing.
    pub fn run_and_close(
        &mut self,
        num_steps: u64,
        logger: &mut dyn Logger,
    ) -> Result<EpisodeSummary, RunError> {
        let result = self.run_with_logger(num_steps, logger);
        let closed = self.close();
        let summary = result?;
        closed?;
        Ok(summary)
    }

    /// The current observation of every domain.
    fn composite_state(&self) -> Result<CompositeState<O>, RunError> {
        self.simulators
            .iter()
            .map(|(domain, simulator)| {
                simulator
                    .get_state()
                    .map(|observation| (domain.clone(), observation))
                    .map_err(|e| RunError::simulator(domain, e))
            })
            .collect()
    }
}

/// Sum of the domain rewards, independent of the order the domains were added in.
fn sum_rewards(mut rewards: Vec<f64>) -> f64 {
    rewards.sort_unstable_by(f64::total_cmp);
    rewards.into_iter().sum()
}

impl<O, A, G: fmt::Debug, H: fmt::Debug> fmt::Debug for Orchestrator<O, A, G, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("domains", &self.simulators.domains().collect::<Vec<_>>())
            .field("agent", &self.agent)
            .field("hook", &self.hook)
            .field("routing", &self.routing)
            .field("phase", &self.phase)
            .finish()
    }
}
