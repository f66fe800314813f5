//! Run configuration for building and training a network.
//!
//! The configuration can be read from a JSON file. Only `layers` is
//! required:
//!
//! ```json
//! {
//!   "layers": [
//!     { "neurons": 8, "prev_neurons": 2, "learning_rate": 0.05,
//!       "momentum": 0.01, "activator": { "Sigmoid": 1.0 } },
//!     { "neurons": 1, "prev_neurons": 8, "learning_rate": 0.05,
//!       "momentum": 0.01, "activator": "Identity" }
//!   ],
//!   "threshold": 0.0005,
//!   "max_epochs": 20000,
//!   "seed": 42,
//!   "rule": "Standard"
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activator::Activator;
use crate::error::Result;
use crate::layer::{GradientRule, LayerConfig};
use crate::network::Network;

/// Everything needed to build a network and train it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// One entry per computing layer.
    pub layers: Vec<LayerConfig>,
    /// Epoch cost at or below which training stops.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Upper bound on the number of epochs. Training is unbounded if unset.
    #[serde(default)]
    pub max_epochs: Option<usize>,
    /// Seed for the initial weights. Drawn from the OS if unset.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rule: GradientRule,
}

fn default_threshold() -> f64 {
    0.001
}

impl RunConfig {
    /// Loads a run configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// The one-input function approximator: 100 hidden `TanH(1, 1)` units
    /// feeding a single `LeakyReLU(0.1)` output.
    pub fn approximator() -> RunConfig {
        RunConfig {
            layers: vec![
                LayerConfig::new(1, 100, Activator::TanH(1.0, 1.0))
                    .learning_rate(0.005)
                    .momentum(0.005),
                LayerConfig::new(100, 1, Activator::LeakyReLU(0.1))
                    .learning_rate(0.01)
                    .momentum(0.005),
            ],
            threshold: 0.0009,
            max_epochs: Some(100_000),
            seed: None,
            rule: GradientRule::Standard,
        }
    }

    /// Builds an untrained network from this configuration.
    pub fn build(&self) -> Result<Network> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Network::new(&self.layers, &mut rng)?.gradient_rule(self.rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let json = r#"{
            "layers": [
                { "neurons": 3, "prev_neurons": 2, "learning_rate": 0.1,
                  "momentum": 0.0, "activator": { "TanH": [1.7159, 0.6666] } }
            ]
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.threshold, 0.001);
        assert_eq!(config.max_epochs, None);
        assert_eq!(config.seed, None);
        assert_eq!(config.rule, GradientRule::Standard);
        assert_eq!(config.layers[0].activator, Activator::TanH(1.7159, 0.6666));
    }

    #[test]
    fn seeded_builds_are_identical() {
        let mut config = RunConfig::approximator();
        config.seed = Some(3);
        config.rule = GradientRule::Legacy;
        let a = config.build().unwrap();
        let b = config.build().unwrap();
        assert_eq!(a.rule(), GradientRule::Legacy);
        assert_eq!(a.to_records(), b.to_records());
        assert_eq!(a.input_len(), 1);
        assert_eq!(a.output_len(), 1);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let config = RunConfig::approximator();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(RunConfig::load(&path).unwrap(), config);
    }
}
