//! A [multilayer perceptron](https://en.wikipedia.org/wiki/Multilayer_perceptron)
//! trained by backpropagation with momentum.
//!
//! # Example
//!
//! Let's fit a network to a handful of points of `y = x / 2`:
//!
//! ```
//! # use perceptron::{Activator, LayerConfig, Network, Vector};
//! let examples: Vec<(Vector, Vector)> = (0..4)
//!     .map(|i| {
//!         let x = i as f64 / 4.0;
//!         (Vector::new(vec![x]), Vector::new(vec![x / 2.0]))
//!     })
//!     .collect();
//!
//! let mut network = Network::seeded(
//!     &[
//!         LayerConfig::new(1, 3, Activator::Sigmoid(1.0)).learning_rate(0.2),
//!         LayerConfig::new(3, 1, Activator::Identity).learning_rate(0.2),
//!     ],
//!     7,
//! )
//! .unwrap();
//!
//! let report = perceptron::Trainer::new(&mut network)
//!     .threshold(1e-4)
//!     .max_epochs(50_000)
//!     .train(&examples)
//!     .unwrap();
//! assert!(report.epochs >= 1);
//!
//! let y = network.predict(&Vector::new(vec![0.5])).unwrap();
//! assert_eq!(y.size(), 1);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::layer::{GradientRule, Layer, LayerConfig};
use crate::trainer::{Trainer, TrainingReport};
use crate::vector::Vector;

/// A feed-forward network: an ordered, non-empty stack of layers, the last
/// of which is the output layer.
#[derive(Clone, Debug)]
pub struct Network {
    layers: Vec<Layer>,
    rule: GradientRule,
}

impl Network {
    /// Creates a new, untrained network.
    ///
    /// Arguments:
    ///  * `configs` - one entry per computing layer; the input is not a
    ///                layer. Each layer's `prev_neurons` must equal the
    ///                previous layer's `neurons`.
    ///  * `rng` - the random source for the initial weights.
    pub fn new<R: Rng + ?Sized>(configs: &[LayerConfig], rng: &mut R) -> Result<Self> {
        check_chain(configs).map_err(Error::InvalidConfig)?;
        let layers = configs
            .iter()
            .map(|config| Layer::new(*config, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Network {
            layers,
            rule: GradientRule::default(),
        })
    }

    /// Creates a new network whose initial weights are determined by `seed`.
    pub fn seeded(configs: &[LayerConfig], seed: u64) -> Result<Self> {
        Network::new(configs, &mut StdRng::seed_from_u64(seed))
    }

    /// Sets the backward update rule used during training.
    pub fn gradient_rule(mut self, rule: GradientRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> GradientRule {
        self.rule
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Returns the configuration of every layer, in order.
    pub fn configs(&self) -> Vec<LayerConfig> {
        self.layers.iter().map(|layer| *layer.config()).collect()
    }

    /// Returns the size of the input to the network.
    pub fn input_len(&self) -> usize {
        self.layers[0].input_len()
    }

    /// Returns the size of the output layer.
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].output_len()
    }

    /// Feeds `input` through every layer and returns the output layer's
    /// values.
    ///
    /// Only the units' cached activations change; weights are untouched.
    pub fn predict(&mut self, input: &Vector) -> Result<Vector> {
        let mut layers = self.layers.iter_mut();
        let mut output = match layers.next() {
            Some(first) => first.compute(input)?,
            None => return Err(empty_network()),
        };
        for layer in layers {
            output = layer.compute(&output)?;
        }
        Ok(output)
    }

    /// Runs one backpropagation step on a single labelled example.
    ///
    /// Returns the example's cost `0.5 * |target - predicted|²`, measured
    /// before the update.
    pub fn backpropagate(&mut self, input: &Vector, target: &Vector) -> Result<f64> {
        let output = self.predict(input)?;
        let errors = target.subtract(&output)?;
        let cost = 0.5 * errors.dot(&errors)?;

        let rule = self.rule;
        let (last, hidden) = match self.layers.split_last_mut() {
            Some(split) => split,
            None => return Err(empty_network()),
        };
        let mut sums = last.compute_output_backward(&errors, rule)?;
        for layer in hidden.iter_mut().rev() {
            sums = layer.compute_hidden_backward(&sums, rule)?;
        }
        Ok(cost)
    }

    /// Trains until the mean epoch cost drops to `threshold` or below.
    ///
    /// There is no epoch limit: a network that never reaches the threshold
    /// trains forever. Use `Trainer` to bound the run.
    pub fn train(&mut self, examples: &[(Vector, Vector)], threshold: f64) -> Result<TrainingReport> {
        Trainer::new(self).threshold(threshold).train(examples)
    }
}

fn empty_network() -> Error {
    Error::InvalidConfig("network has no layers".to_string())
}

/// Verifies that consecutive layers agree on their shared dimension.
pub(crate) fn check_chain(configs: &[LayerConfig]) -> std::result::Result<(), String> {
    if configs.is_empty() {
        return Err("network has no layers".to_string());
    }
    for (i, pair) in configs.windows(2).enumerate() {
        if pair[1].prev_neurons != pair[0].neurons {
            return Err(format!(
                "layer {} expects {} inputs but layer {} has {} units",
                i + 1,
                pair[1].prev_neurons,
                i,
                pair[0].neurons
            ));
        }
    }
    Ok(())
}
