use clap::Parser;
use feedforward::{Session, TrainingConfig};
use std::path::PathBuf;

/// Trains a 2-input network to approximate the sum of its inputs.
#[derive(Parser)]
#[command(name = "ff")]
#[command(version)]
struct Cli {
    /// Number of training steps
    #[arg(short, long, default_value = "100000")]
    steps: u64,

    /// Neurons in the hidden layer
    #[arg(long, default_value = "10")]
    hidden: usize,

    #[arg(short, long, default_value = "0.1")]
    learning_rate: f64,

    /// Evaluate the probe input every N steps
    #[arg(short, long, default_value = "1000")]
    report_every: u64,

    /// Seed for the training sample stream
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Input pair evaluated at each report
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values = ["0", "0"], allow_hyphen_values = true)]
    probe: Vec<f64>,

    /// Write the trained network as a Graphviz file
    #[arg(long)]
    dot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = TrainingConfig {
        hidden: cli.hidden,
        learning_rate: cli.learning_rate,
        steps: cli.steps,
        report_every: cli.report_every,
        seed: cli.seed,
        probe: cli.probe,
    };

    let mut session = Session::new(config)?;
    session.run()?;

    let probe = session.config().probe.clone();
    let last = session.evaluate(&probe)?;
    println!("{:?} : {:?}", last.inputs, last.outputs);

    if let Some(path) = cli.dot {
        session.network().snapshot()?.write_dot(path)?;
    }
    Ok(())
}
