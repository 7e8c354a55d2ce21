//! Simulator testing utilities
use super::{ContractViolation, Info, SimStep, Simulator, SimulatorError};
use crate::logging::Loggable;
use std::cell::RefCell;
use std::fmt::Debug;
use std::io;
use std::rc::Rc;

/// Run a simulator through one episode and check that the contract is satisfied.
///
/// Checks that `get_state` agrees with `reset` and `step`, that repeated `get_state` calls
/// do not advance time, that `reset` may be repeated, and that `close` is idempotent.
pub fn check_simulator<S>(simulator: &mut S, actions: &[Option<S::Action>])
where
    S: Simulator,
    S::Observation: PartialEq + Debug,
{
    let (observation, _) = simulator.reset().unwrap();
    assert_eq!(simulator.get_state().unwrap(), observation);
    assert_eq!(simulator.get_state().unwrap(), observation);

    for action in actions {
        let step = simulator.step(action.as_ref()).unwrap();
        assert!(step.reward.is_finite());
        assert_eq!(simulator.get_state().unwrap(), step.observation);
        assert_eq!(simulator.get_state().unwrap(), step.observation);
    }

    let (observation, _) = simulator.reset().unwrap();
    assert_eq!(simulator.get_state().unwrap(), observation);

    simulator.close().unwrap();
    simulator.close().unwrap();
}

/// Record of the calls made to a [`ScriptedSimulator`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CallLog {
    pub setups: usize,
    pub resets: usize,
    /// The action passed to each call of `step`.
    pub actions: Vec<Option<usize>>,
    pub closes: usize,
    /// Number of times an open resource was actually released.
    pub releases: usize,
}

/// Shared handle to a [`CallLog`] that outlives the simulator.
pub type SharedCallLog = Rc<RefCell<CallLog>>;

/// A simulator with fixed, deterministic outcomes that records every call.
///
/// Observations are `"{name}:{t}"` where `t` is the number of steps since reset.
#[derive(Debug)]
pub struct ScriptedSimulator {
    name: &'static str,
    reward: f64,
    /// Step (1-based within an episode) on which `done` is returned.
    done_at: Option<u64>,
    /// Step (1-based within an episode) on which `step` fails.
    fail_at: Option<u64>,
    fail_reset: bool,
    fail_close: bool,

    log: SharedCallLog,
    time: Option<u64>,
    open: bool,
}

impl ScriptedSimulator {
    /// A simulator that always returns `reward` and never finishes.
    pub fn new(name: &'static str, reward: f64) -> Self {
        Self {
            name,
            reward,
            done_at: None,
            fail_at: None,
            fail_reset: false,
            fail_close: false,
            log: SharedCallLog::default(),
            time: None,
            open: false,
        }
    }

    /// Signal `done` on the given step of each episode (counting from 1).
    pub fn done_at(mut self, step: u64) -> Self {
        self.done_at = Some(step);
        self
    }

    /// Fail with a domain error on the given step of each episode (counting from 1).
    pub fn fail_at(mut self, step: u64) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Fail every reset with an initialization error.
    pub fn fail_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Fail every close with a domain error, after recording the call.
    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn log(&self) -> SharedCallLog {
        Rc::clone(&self.log)
    }

    fn observation(&self, time: u64) -> String {
        format!("{}:{}", self.name, time)
    }
}

impl Simulator for ScriptedSimulator {
    type Observation = String;
    type Action = usize;

    fn setup(&mut self) -> Result<(), SimulatorError> {
        self.log.borrow_mut().setups += 1;
        if self.fail_reset {
            return Err(SimulatorError::Initialization(format!(
                "{} endpoint unreachable",
                self.name
            )));
        }
        self.open = true;
        Ok(())
    }

    fn reset(&mut self) -> Result<(Self::Observation, Info), SimulatorError> {
        self.log.borrow_mut().resets += 1;
        self.setup()?;
        self.time = Some(0);
        let mut info = Info::new();
        info.insert("name".into(), Loggable::Message(self.name.into()));
        Ok((self.observation(0), info))
    }

    fn step(&mut self, action: Option<&usize>) -> Result<SimStep<String>, SimulatorError> {
        self.log.borrow_mut().actions.push(action.copied());
        let time = self.time.ok_or(ContractViolation::NotReset)? + 1;
        if self.fail_at == Some(time) {
            return Err(SimulatorError::Domain(Box::new(io::Error::new(
                io::ErrorKind::Other,
                format!("{} failed at step {}", self.name, time),
            ))));
        }
        self.time = Some(time);
        Ok(SimStep {
            observation: self.observation(time),
            reward: self.reward,
            done: self.done_at == Some(time),
            info: Info::new(),
        })
    }

    fn get_state(&self) -> Result<Self::Observation, SimulatorError> {
        let time = self.time.ok_or(ContractViolation::NotReset)?;
        Ok(self.observation(time))
    }

    fn close(&mut self) -> Result<(), SimulatorError> {
        let mut log = self.log.borrow_mut();
        log.closes += 1;
        if self.fail_close {
            return Err(SimulatorError::Domain(Box::new(io::Error::new(
                io::ErrorKind::Other,
                format!("{} failed to close", self.name),
            ))));
        }
        if self.open {
            self.open = false;
            log.releases += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_satisfies_contract() {
        check_simulator(&mut ScriptedSimulator::new("a", 1.0), &[Some(1), None]);
    }

    #[test]
    fn get_state_after_reset_equals_reset_observation() {
        let mut sim = ScriptedSimulator::new("a", 1.0);
        let (observation, info) = sim.reset().unwrap();
        assert_eq!(sim.get_state().unwrap(), observation);
        assert_eq!(observation, "a:0");
        assert_eq!(info.get("name"), Some(&Loggable::from("a")));
    }

    #[test]
    fn close_twice_releases_once() {
        let mut sim = ScriptedSimulator::new("a", 1.0);
        let log = sim.log();
        sim.reset().unwrap();
        sim.close().unwrap();
        sim.close().unwrap();
        let log = log.borrow();
        assert_eq!(log.closes, 2);
        assert_eq!(log.releases, 1);
    }

    #[test]
    fn close_without_reset_releases_nothing() {
        let mut sim = ScriptedSimulator::new("a", 1.0);
        let log = sim.log();
        sim.close().unwrap();
        assert_eq!(log.borrow().releases, 0);
    }

    #[test]
    fn done_on_scripted_step() {
        let mut sim = ScriptedSimulator::new("a", 1.0).done_at(2);
        sim.reset().unwrap();
        assert!(!sim.step(None).unwrap().done);
        assert!(sim.step(None).unwrap().done);
    }
}
