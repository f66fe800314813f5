//! The epoch loop for training networks.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::{check_len, Error, Result};
use crate::network::Network;
use crate::vector::Vector;

/// A builder for training runs over a borrowed network.
///
/// Every epoch visits each example once, in order, and updates the network
/// after each one. Training ends when the mean per-example cost of an epoch
/// is at or below the threshold, or when one of the optional extra stop
/// conditions is met.
#[derive(Debug)]
pub struct Trainer<'a> {
    network: &'a mut Network,
    threshold: f64,
    limits: Vec<StopCondition>,
    logging: Logging,
    record_costs: bool,
}

impl<'a> Trainer<'a> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A cost threshold of 0.001.
    /// * No epoch or time limit.
    /// * Logs on training completion.
    /// * Keeps no per-epoch cost history.
    pub fn new(network: &'a mut Network) -> Self {
        Trainer {
            network,
            threshold: 0.001,
            limits: Vec::new(),
            logging: Logging::Completion,
            record_costs: false,
        }
    }

    /// Sets the epoch cost at or below which training has converged.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Stops after at most `epochs` epochs, converged or not.
    pub fn max_epochs(self, epochs: usize) -> Self {
        self.stop_condition(StopCondition::Epochs(epochs))
    }

    /// Stops once `limit` has elapsed, checked at the end of each epoch.
    pub fn time_limit(self, limit: Duration) -> Self {
        self.stop_condition(limit)
    }

    /// Adds a condition that ends training early.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.limits.push(condition.into());
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Keeps every epoch's cost in `TrainingReport::costs`.
    ///
    /// The history grows by one entry per epoch, so only enable it on
    /// bounded runs.
    pub fn record_costs(mut self, record: bool) -> Self {
        self.record_costs = record;
        self
    }

    /// Trains the network on the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`.
    ///
    /// Returns:
    ///   A summary of the run, or an error if the examples do not fit the
    ///   network.
    pub fn train(self, examples: &[(Vector, Vector)]) -> Result<TrainingReport> {
        self.validate(examples)?;

        let start_time = Instant::now();
        let mut costs = Vec::new();
        let mut epoch = 0;
        let mut cost;
        let converged = loop {
            let mut total = 0.0;
            for (input, expected) in examples {
                total += self.network.backpropagate(input, expected)?;
            }
            cost = total / examples.len() as f64;
            if self.record_costs {
                costs.push(cost);
            }
            epoch += 1;

            self.logging.epoch(epoch, cost);
            if cost <= self.threshold {
                break true;
            }
            if self
                .limits
                .iter()
                .any(|limit| limit.should_stop(epoch, start_time))
            {
                break false;
            }
        };

        let report = TrainingReport {
            epochs: epoch,
            cost,
            converged,
            elapsed: start_time.elapsed(),
            costs,
        };
        self.logging.completion(&report);
        Ok(report)
    }

    /// Verifies that every example fits the network.
    fn validate(&self, examples: &[(Vector, Vector)]) -> Result<()> {
        if examples.is_empty() {
            return Err(Error::InvalidConfig("no training examples".to_string()));
        }
        for (input, output) in examples {
            check_len(self.network.input_len(), input.size())?;
            check_len(self.network.output_len(), output.size())?;
        }
        Ok(())
    }
}

/// The outcome of a training run.
#[derive(Clone, Debug)]
pub struct TrainingReport {
    /// The number of completed epochs.
    pub epochs: usize,
    /// The cost of the final epoch.
    pub cost: f64,
    /// True if the final cost reached the threshold.
    pub converged: bool,
    pub elapsed: Duration,
    /// The cost of every epoch, in order. Empty unless the trainer was
    /// asked to record it.
    pub costs: Vec<f64>,
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` epochs, and at completion
    Epochs(usize),
}

impl Logging {
    /// Performs logging at the end of an epoch.
    fn epoch(&self, epoch: usize, cost: f64) {
        if let Logging::Epochs(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                debug!("epoch {}: cost={}", epoch, cost);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, report: &TrainingReport) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "ran {} epochs in {:.3} seconds, final cost {} ({})",
            report.epochs,
            report.elapsed.as_secs_f64(),
            report.cost,
            if report.converged {
                "converged"
            } else {
                "stopped early"
            }
        );
    }
}

/// Extra conditions that end training before the cost threshold is reached
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of epochs
    Epochs(usize),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training should end.
    fn should_stop(&self, epoch: usize, start_time: Instant) -> bool {
        match *self {
            StopCondition::Epochs(epochs) => epoch >= epochs,
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
