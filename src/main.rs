use clap::{crate_authors, crate_description, crate_version, Parser};
use qsagin::agents::{ActionSpaces, RandomAgentConfig};
use qsagin::logging::CLILogger;
use qsagin::simulation::StepLogger;
use qsagin::simulators::{IdleConfig, IdleSimulator, MockQuantumConfig, MockQuantumSimulator};
use qsagin::spaces::IndexSpace;
use qsagin::{
    ActionRouting, BuildAgent, BuildSimulator, Composite, Domain, Error, Orchestrator, RandomAgent,
};
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(
    version = crate_version!(),
    author = crate_authors!(),
    about = crate_description!(),
)]
pub struct Options {
    #[clap(long, default_value_t = 10)]
    /// Maximum number of ticks in the episode
    pub steps: u64,

    #[clap(long)]
    /// Random seed. Drawn from system entropy if omitted.
    pub seed: Option<u64>,

    #[clap(long, default_value_t = 5)]
    /// Number of quantum channels; also the size of the agent's action space
    pub channels: usize,

    #[clap(long)]
    /// Dispatch nothing to the classical domain instead of reusing the quantum action
    pub strict: bool,

    #[clap(long, default_value_t = 1.0)]
    /// Minimum number of seconds between log displays
    pub display_period: f64,
}

fn main() -> Result<(), Error> {
    let opts = Options::parse();
    println!("{:#?}", opts);
    let seed = opts.seed.unwrap_or_else(rand::random);

    let quantum: MockQuantumSimulator = MockQuantumConfig {
        num_channels: opts.channels,
        ..MockQuantumConfig::default()
    }
    .build_simulator(seed)?;
    let classical: IdleSimulator<usize> = IdleConfig::default().build_simulator(seed)?;

    let agent: RandomAgent = RandomAgentConfig {
        action_spaces: ActionSpaces::PerDomain(vec![(Domain::QUANTUM, opts.channels)]),
    }
    .build_agent(seed.wrapping_add(1))?;
    println!("Agent: {}", agent);

    let routing = if opts.strict {
        ActionRouting::Strict
    } else {
        ActionRouting::default()
    };
    let hook = StepLogger::new(
        vec![
            (Domain::CLASSICAL, IndexSpace::new(opts.channels)),
            (Domain::QUANTUM, IndexSpace::new(opts.channels)),
        ]
        .into_iter()
        .collect::<Composite<_>>(),
    );
    let mut orchestrator = Orchestrator::new(agent)
        .with_simulator(Domain::CLASSICAL, classical)?
        .with_simulator(Domain::QUANTUM, quantum)?
        .with_routing(routing)
        .with_hook(hook);

    let mut logger = CLILogger::new(Duration::from_secs_f64(opts.display_period));
    let summary = orchestrator.run_and_close(opts.steps, &mut logger)?;
    println!(
        "Finished after {} ticks with total reward {:.4}{}",
        summary.ticks,
        summary.total_reward,
        if summary.terminated {
            " (terminated)"
        } else {
            ""
        }
    );
    Ok(())
}
