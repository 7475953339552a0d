// Each sample feeds two uniform values x, y in [0, 1) and asks for x + y.
// Samples come from a seeded ChaCha stream, so a session is reproducible bit
// for bit from its configuration.

use crate::engine::Network;
use crate::error::{Error, Result};
use crate::nn::{NetworkBuilder, Trainer};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub inputs: Vec<f64>,
    pub desired: Vec<f64>,
}

pub struct SumTask {
    rng: ChaCha8Rng,
}

impl SumTask {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_sample(&mut self) -> Sample {
        let x: f64 = self.rng.gen();
        let y: f64 = self.rng.gen();

        Sample {
            inputs: vec![x, y],
            desired: vec![x + y],
        }
    }
}

impl Iterator for SumTask {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        Some(self.next_sample())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainingConfig {
    /// Neurons in the hidden layer
    pub hidden: usize,
    pub learning_rate: f64,
    /// Training steps to run
    pub steps: u64,
    /// Evaluate the probe every this many steps
    pub report_every: u64,
    /// Seed for the sample stream
    pub seed: u64,
    /// Input evaluated at each report
    pub probe: Vec<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            hidden: 10,
            learning_rate: 0.1,
            steps: 100_000,
            report_every: 1_000,
            seed: 0,
            probe: vec![0.0, 0.0],
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden == 0 {
            return Err(Error::Config("hidden layer needs at least one neuron".into()));
        }
        if self.report_every == 0 {
            return Err(Error::Config("report interval must be positive".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Config(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.probe.len() != 2 {
            return Err(Error::Config(format!(
                "probe needs exactly 2 inputs, got {}",
                self.probe.len()
            )));
        }
        Ok(())
    }
}

/// Network output for the probe input at a given iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub iteration: u64,
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

pub struct Session {
    config: TrainingConfig,
    network: Network,
    trainer: Trainer,
    task: SumTask,
    iteration: u64,
}

impl Session {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;

        let network = NetworkBuilder::build_simple(2, config.hidden, 1)?;
        let trainer = Trainer::new(config.learning_rate);
        let task = SumTask::new(config.seed);

        Ok(Self {
            config,
            network,
            trainer,
            task,
            iteration: 0,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn step(&mut self) -> Result<()> {
        let sample = self.task.next_sample();
        self.trainer
            .train(&mut self.network, &sample.inputs, &sample.desired)?;
        self.iteration += 1;
        Ok(())
    }

    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<Evaluation> {
        let outputs = self.trainer.run(&mut self.network, inputs)?;
        Ok(Evaluation {
            iteration: self.iteration,
            inputs: inputs.to_vec(),
            outputs,
        })
    }

    /// Runs the configured number of steps, evaluating the probe every
    /// `report_every` iterations.
    pub fn run(&mut self) -> Result<Vec<Evaluation>> {
        let mut evaluations = Vec::new();
        let probe = self.config.probe.clone();

        for _ in 0..self.config.steps {
            self.step()?;

            if self.iteration % self.config.report_every == 0 {
                let evaluation = self.evaluate(&probe)?;
                log::info!(
                    "Iteration: {} {:?} : {:?}",
                    evaluation.iteration,
                    evaluation.inputs,
                    evaluation.outputs
                );
                evaluations.push(evaluation);
            }
        }
        Ok(evaluations)
    }

    pub fn into_network(self) -> Network {
        self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_ask_for_the_sum() {
        for sample in SumTask::new(3).take(100) {
            assert_eq!(sample.inputs.len(), 2);
            let (x, y) = (sample.inputs[0], sample.inputs[1]);
            assert!((0.0..1.0).contains(&x));
            assert!((0.0..1.0).contains(&y));
            assert_eq!(sample.desired, vec![x + y]);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let a: Vec<_> = SumTask::new(42).take(10).collect();
        let b: Vec<_> = SumTask::new(42).take(10).collect();
        let c: Vec<_> = SumTask::new(43).take(10).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn default_config_is_valid() {
        TrainingConfig::default().validate().unwrap();
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let broken = [
            TrainingConfig {
                hidden: 0,
                ..Default::default()
            },
            TrainingConfig {
                report_every: 0,
                ..Default::default()
            },
            TrainingConfig {
                learning_rate: f64::NAN,
                ..Default::default()
            },
            TrainingConfig {
                learning_rate: -0.1,
                ..Default::default()
            },
            TrainingConfig {
                probe: vec![0.0],
                ..Default::default()
            },
        ];

        for config in broken {
            assert!(matches!(Session::new(config), Err(Error::Config(_))));
        }
    }

    #[test]
    fn run_reports_at_interval() {
        let config = TrainingConfig {
            steps: 250,
            report_every: 100,
            ..Default::default()
        };
        let mut session = Session::new(config).unwrap();
        let evaluations = session.run().unwrap();

        assert_eq!(session.iteration(), 250);
        let iterations: Vec<_> = evaluations.iter().map(|e| e.iteration).collect();
        assert_eq!(iterations, vec![100, 200]);
        for evaluation in &evaluations {
            assert_eq!(evaluation.inputs, vec![0.0, 0.0]);
            assert_eq!(evaluation.outputs.len(), 1);
        }
    }

    #[test]
    fn evaluate_does_not_train() {
        let mut session = Session::new(TrainingConfig::default()).unwrap();
        let before = session.network().snapshot().unwrap();

        session.evaluate(&[0.5, 0.25]).unwrap();
        let after = session.network().snapshot().unwrap();

        assert_eq!(session.iteration(), 0);
        assert_eq!(before.connections, after.connections);
    }
}
