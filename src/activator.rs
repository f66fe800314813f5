//! Activation function types.

use std::fmt::Debug;
use std::rc::Rc;

/// A stateless activation function.
///
/// Both methods take the pre-activation sum `x`, not the activated output.
/// Implementations hold only their fixed coefficients, so a single instance
/// can be shared by every unit of a layer.
pub trait Activation: Debug {
    /// Evaluates `f(x)`.
    fn activate(&self, x: f64) -> f64;

    /// Evaluates the derivative `f'(x)`.
    fn derivative(&self, x: f64) -> f64;
}

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types, together with their coefficients.
///
/// This is the serializable name of a function; `wake` turns it into the
/// shared object units evaluate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activator {
    /// The identity `f(x) = x`
    Identity,
    /// Leaky Rectified Linear Unit
    ///
    /// Takes an `alpha` value to use for negative inputs.
    LeakyReLU(f64),
    /// Logistic function with steepness `alpha`
    Sigmoid(f64),
    /// Smooth rectifier `ln(1 + e^(alpha * x))`
    SoftPlus(f64),
    /// Scaled hyperbolic tan `alpha * tanh(beta * x)`
    ///
    /// `alpha = 1.7159`, `beta = 2 / 3` are the customary choices.
    TanH(f64, f64),
}

impl Activator {
    /// Builds the shared activation object for this function.
    pub fn wake(&self) -> Rc<dyn Activation> {
        match *self {
            Activator::Identity => Rc::new(Identity),
            Activator::LeakyReLU(alpha) => Rc::new(LeakyReLU { alpha }),
            Activator::Sigmoid(alpha) => Rc::new(Sigmoid { alpha }),
            Activator::SoftPlus(alpha) => Rc::new(SoftPlus { alpha }),
            Activator::TanH(alpha, beta) => Rc::new(TanH { alpha, beta }),
        }
    }
}

#[derive(Debug)]
pub struct Identity;

impl Activation for Identity {
    fn activate(&self, x: f64) -> f64 {
        x
    }

    fn derivative(&self, _: f64) -> f64 {
        1.0
    }
}

#[derive(Debug)]
pub struct LeakyReLU {
    pub alpha: f64,
}

impl Activation for LeakyReLU {
    fn activate(&self, x: f64) -> f64 {
        if x < 0.0 {
            self.alpha * x
        } else {
            x
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        if x < 0.0 {
            self.alpha
        } else {
            1.0
        }
    }
}

#[derive(Debug)]
pub struct Sigmoid {
    pub alpha: f64,
}

impl Activation for Sigmoid {
    fn activate(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-self.alpha * x).exp())
    }

    fn derivative(&self, x: f64) -> f64 {
        let y = self.activate(x);
        self.alpha * y * (1.0 - y)
    }
}

#[derive(Debug)]
pub struct SoftPlus {
    pub alpha: f64,
}

impl Activation for SoftPlus {
    fn activate(&self, x: f64) -> f64 {
        (self.alpha * x).exp().ln_1p()
    }

    fn derivative(&self, x: f64) -> f64 {
        self.alpha / (1.0 + (-self.alpha * x).exp())
    }
}

#[derive(Debug)]
pub struct TanH {
    pub alpha: f64,
    pub beta: f64,
}

impl Activation for TanH {
    fn activate(&self, x: f64) -> f64 {
        self.alpha * (self.beta * x).tanh()
    }

    fn derivative(&self, x: f64) -> f64 {
        let y = self.activate(x);
        self.beta / self.alpha * (self.alpha * self.alpha - y * y)
    }
}
