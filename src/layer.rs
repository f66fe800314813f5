use std::rc::Rc;

use itertools::izip;
use rand::Rng;

use crate::activator::Activator;
use crate::error::{check_len, Error, Result};
use crate::unit::Unit;
use crate::vector::Vector;

/// The fixed layout of a layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// The number of units in this layer.
    pub neurons: usize,
    /// The number of units in the previous layer, or the network input size
    /// for the first layer.
    pub prev_neurons: usize,
    pub learning_rate: f64,
    /// The fraction of the previous update reapplied on every step.
    pub momentum: f64,
    /// The activation function shared by every unit of the layer.
    pub activator: Activator,
}

impl LayerConfig {
    /// Creates a layer configuration with a learning rate of 0.1 and no
    /// momentum.
    pub fn new(prev_neurons: usize, neurons: usize, activator: Activator) -> Self {
        LayerConfig {
            neurons,
            prev_neurons,
            learning_rate: 0.1,
            momentum: 0.0,
            activator,
        }
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the momentum coefficient.
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.neurons == 0 || self.prev_neurons == 0 {
            return Err(Error::InvalidConfig(format!(
                "layer {} -> {} has no units",
                self.prev_neurons, self.neurons
            )));
        }
        Ok(())
    }
}

/// Selects how the backward pass turns error signals into updates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GradientRule {
    /// Ordinary backpropagation: every layer scales its error by the
    /// activation slope, every unit updates its own bias, and unit `k` of a
    /// hidden layer reads gradient sum `k + 1`.
    Standard,
    /// The older update arithmetic, with zero-initialised momentum: the
    /// output layer skips the activation slope and adds every bias update to
    /// its first unit, and unit `k` of a hidden layer reads gradient sum `k`,
    /// the bias slot included.
    Legacy,
}

impl Default for GradientRule {
    fn default() -> Self {
        GradientRule::Standard
    }
}

/// A fully connected layer of units trained with momentum.
///
/// Alongside its units the layer keeps, per unit, the update applied on the
/// previous backward call (`[bias, w_1..w_n]`). These accumulators live as
/// long as the layer and are never reset between samples or epochs.
#[derive(Clone, Debug)]
pub struct Layer {
    config: LayerConfig,
    units: Vec<Unit>,
    last_deltas: Vec<Vector>,
}

impl Layer {
    /// Initializes a new, untrained layer.
    ///
    /// Biases and weights are drawn uniformly from `±0.25 / (neurons +
    /// prev_neurons)`.
    ///
    /// Arguments:
    ///
    ///  * `config` - the layout and hyperparameters of the layer.
    ///  * `rng` - the random source used for the initial weights.
    pub fn new<R: Rng + ?Sized>(config: LayerConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let spread = 0.25 / (config.neurons + config.prev_neurons) as f64;
        let activation = config.activator.wake();
        let mut units = Vec::with_capacity(config.neurons);
        for _ in 0..config.neurons {
            let row = Vector::random_uniform(config.prev_neurons + 1, -spread, spread, rng)?;
            let weights = Vector::new(row.slice(1, config.prev_neurons)?);
            units.push(Unit::new(weights, row[0], Rc::clone(&activation)));
        }
        Ok(Layer {
            config,
            units,
            last_deltas: vec![Vector::zero(config.prev_neurons + 1); config.neurons],
        })
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.config.prev_neurons
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.config.neurons
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Feeds `input` through every unit, returning their outputs in order.
    pub fn compute(&mut self, input: &Vector) -> Result<Vector> {
        check_len(self.input_len(), input.size())?;
        let mut outputs = Vec::with_capacity(self.units.len());
        for unit in &mut self.units {
            unit.set_inputs(input.clone())?;
            outputs.push(unit.output());
        }
        Ok(Vector::new(outputs))
    }

    /// Runs the backward step of the output layer.
    ///
    /// `errors` holds `target - predicted` for every unit. Updates the
    /// layer's parameters in place and returns the gradient sums for the
    /// previous layer: slot 0 is the bias contribution and slot `j` the
    /// contribution routed through weight `j - 1`.
    pub fn compute_output_backward(
        &mut self,
        errors: &Vector,
        rule: GradientRule,
    ) -> Result<Vector> {
        check_len(self.output_len(), errors.size())?;
        let signals: Vec<f64> = match rule {
            GradientRule::Standard => self
                .units
                .iter()
                .zip(errors.iter())
                .map(|(unit, e)| unit.derivative() * e)
                .collect(),
            GradientRule::Legacy => errors.as_slice().to_vec(),
        };
        let sums = self.gradient_sums(&signals);
        self.apply_deltas(&signals, rule == GradientRule::Legacy);
        Ok(sums)
    }

    /// Runs the backward step of a hidden layer.
    ///
    /// `sums` are the gradient sums returned by the following layer, one
    /// entry per unit of this layer plus the bias slot. Each unit scales its
    /// share by its own activation slope before it is propagated and applied.
    pub fn compute_hidden_backward(&mut self, sums: &Vector, rule: GradientRule) -> Result<Vector> {
        check_len(self.output_len() + 1, sums.size())?;
        let offset = match rule {
            GradientRule::Standard => 1,
            GradientRule::Legacy => 0,
        };
        let signals: Vec<f64> = self
            .units
            .iter()
            .enumerate()
            .map(|(k, unit)| unit.derivative() * sums[k + offset])
            .collect();
        let next_sums = self.gradient_sums(&signals);
        self.apply_deltas(&signals, false);
        Ok(next_sums)
    }

    /// Replaces every unit's `[bias, w_1..w_n]` row.
    pub fn set_weights(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        if rows.len() != self.units.len() {
            return Err(Error::MalformedModel(format!(
                "expected {} weight rows, found {}",
                self.units.len(),
                rows.len()
            )));
        }
        let width = self.input_len() + 1;
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(Error::MalformedModel(format!(
                "expected weight rows of length {}, found {}",
                width,
                row.len()
            )));
        }
        for (unit, row) in self.units.iter_mut().zip(rows) {
            unit.set_bias(row[0]);
            unit.set_weights(Vector::from(&row[1..]));
        }
        Ok(())
    }

    /// Reads out every unit's `[bias, w_1..w_n]` row.
    pub fn get_weights(&self) -> Vec<Vec<f64>> {
        self.units
            .iter()
            .map(|unit| {
                let mut row = Vec::with_capacity(self.input_len() + 1);
                row.push(unit.bias());
                row.extend_from_slice(unit.weights().as_slice());
                row
            })
            .collect()
    }

    /// Sums every unit's weights scaled by its error signal, using the
    /// parameters as they were before this step's update.
    fn gradient_sums(&self, signals: &[f64]) -> Vector {
        let mut sums = vec![0.0; self.input_len() + 1];
        for (unit, &signal) in self.units.iter().zip(signals) {
            sums[0] += unit.bias() * signal;
            for (sum, w) in sums[1..].iter_mut().zip(unit.weights().iter()) {
                *sum += w * signal;
            }
        }
        Vector::new(sums)
    }

    fn apply_deltas(&mut self, signals: &[f64], bias_on_first: bool) {
        let LayerConfig {
            learning_rate,
            momentum,
            ..
        } = self.config;

        let mut bias_deltas = Vec::with_capacity(self.units.len());
        for (unit, last, &signal) in izip!(&mut self.units, &mut self.last_deltas, signals) {
            let mut deltas = Vec::with_capacity(last.size());
            deltas.push(momentum * last[0] + learning_rate * signal);
            for (n, x) in unit.inputs().iter().enumerate() {
                deltas.push(momentum * last[n + 1] + learning_rate * x * signal);
            }
            unit.weights_mut().update_each(|n, w| w + deltas[n + 1]);
            bias_deltas.push(deltas[0]);
            *last = Vector::new(deltas);
        }

        if bias_on_first {
            let first = &mut self.units[0];
            for delta in bias_deltas {
                first.set_bias(first.bias() + delta);
            }
        } else {
            for (unit, delta) in self.units.iter_mut().zip(bias_deltas) {
                unit.set_bias(unit.bias() + delta);
            }
        }
    }
}
