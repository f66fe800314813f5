use std::rc::Rc;

use crate::activator::Activation;
use crate::error::Result;
use crate::vector::Vector;

/// A single neuron: a weight vector, a bias and a shared activation function.
///
/// The unit caches the result of its last activation. `output` and
/// `derivative` are both recomputed whenever new inputs are assigned, so they
/// always describe the current `inputs`.
#[derive(Clone, Debug)]
pub struct Unit {
    weights: Vector,
    bias: f64,
    activation: Rc<dyn Activation>,
    inputs: Vector,
    output: f64,
    derivative: f64,
}

impl Unit {
    /// Creates a unit that has seen an all-zero input.
    pub fn new(weights: Vector, bias: f64, activation: Rc<dyn Activation>) -> Self {
        let inputs = Vector::zero(weights.size());
        let output = activation.activate(bias);
        let derivative = activation.derivative(bias);
        Unit {
            weights,
            bias,
            activation,
            inputs,
            output,
            derivative,
        }
    }

    /// Assigns a new input vector and reactivates the unit.
    ///
    /// Fails without touching the cache if `inputs` does not match the weight
    /// dimension.
    pub fn set_inputs(&mut self, inputs: Vector) -> Result<()> {
        let sum = self.bias + inputs.dot(&self.weights)?;
        self.inputs = inputs;
        self.output = self.activation.activate(sum);
        self.derivative = self.activation.derivative(sum);
        Ok(())
    }

    pub fn inputs(&self) -> &Vector {
        &self.inputs
    }

    /// The activated output for the current inputs.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// The activation slope for the current inputs.
    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    pub fn weights(&self) -> &Vector {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut Vector {
        &mut self.weights
    }

    pub fn set_weights(&mut self, weights: Vector) {
        self.weights = weights;
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::Activator;
    use approx::assert_abs_diff_eq;

    #[test]
    fn logistic_unit_at_zero() {
        let mut unit = Unit::new(Vector::new(vec![1.0]), 0.0, Activator::Sigmoid(1.0).wake());
        unit.set_inputs(Vector::new(vec![0.0])).unwrap();
        assert_abs_diff_eq!(unit.output(), 0.5);
        assert_abs_diff_eq!(unit.derivative(), 0.25);
    }

    #[test]
    fn reactivates_on_every_assignment() {
        let mut unit = Unit::new(
            Vector::new(vec![2.0, -1.0]),
            0.5,
            Activator::Identity.wake(),
        );
        unit.set_inputs(Vector::new(vec![1.0, 1.0])).unwrap();
        assert_abs_diff_eq!(unit.output(), 1.5);

        unit.set_bias(1.0);
        unit.weights_mut().set(1, 0.0);
        // Cached values still describe the previous activation.
        assert_abs_diff_eq!(unit.output(), 1.5);

        unit.set_inputs(Vector::new(vec![1.0, 1.0])).unwrap();
        assert_abs_diff_eq!(unit.output(), 3.0);
        assert_abs_diff_eq!(unit.derivative(), 1.0);
    }

    #[test]
    fn rejects_wrong_input_size() {
        let mut unit = Unit::new(Vector::zero(3), 0.0, Activator::Sigmoid(1.0).wake());
        assert!(unit.set_inputs(Vector::zero(2)).is_err());
        assert_eq!(unit.inputs().size(), 3);
    }
}
