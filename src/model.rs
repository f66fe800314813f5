//! Saving and loading trained networks as JSON.
//!
//! A model file is an array with one record per layer. Each record holds the
//! layer's configuration and one `[bias, w_1..w_n]` row per unit.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::layer::LayerConfig;
use crate::network::{check_chain, Network};

/// The persisted form of one layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub config: LayerConfig,
    pub weights: Vec<Vec<f64>>,
}

impl Network {
    /// Reads out every layer's configuration and weights.
    pub fn to_records(&self) -> Vec<LayerRecord> {
        self.layers()
            .iter()
            .map(|layer| LayerRecord {
                config: *layer.config(),
                weights: layer.get_weights(),
            })
            .collect()
    }

    /// Rebuilds a network from persisted records.
    ///
    /// Fails with `MalformedModel` if the layers do not chain or a weight
    /// matrix does not match its layer's declared shape.
    pub fn from_records(records: &[LayerRecord]) -> Result<Network> {
        let configs: Vec<LayerConfig> = records.iter().map(|record| record.config).collect();
        check_chain(&configs).map_err(Error::MalformedModel)?;

        // Every weight is overwritten below, so the seed is irrelevant.
        let mut network = Network::new(&configs, &mut StdRng::seed_from_u64(0))?;
        for (layer, record) in network.layers_mut().iter_mut().zip(records) {
            layer.set_weights(&record.weights)?;
        }
        Ok(network)
    }

    /// Writes the model to `path`.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, &self.to_records())?;
        writer.flush()?;
        info!("saved model to {}", path.as_ref().display());
        Ok(())
    }

    /// Writes the model to a new, timestamped file in `dir` and returns its
    /// path.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let name = format!("model{}.json", Utc::now().format("%Y%m%d%H%M%S%f"));
        let path = dir.as_ref().join(name);
        self.save_to(&path)?;
        Ok(path)
    }

    /// Reads a model written by `save` or `save_to`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let reader = BufReader::new(File::open(path)?);
        let records: Vec<LayerRecord> = serde_json::from_reader(reader)?;
        Network::from_records(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::Activator;
    use crate::trainer::{Logging, Trainer};
    use crate::vector::Vector;
    use std::fs;
    use tempfile::tempdir;

    fn trained() -> Network {
        let mut network = Network::seeded(
            &[
                LayerConfig::new(2, 5, Activator::TanH(1.7159, 2.0 / 3.0))
                    .learning_rate(0.05)
                    .momentum(0.01),
                LayerConfig::new(5, 1, Activator::LeakyReLU(0.1)).learning_rate(0.05),
            ],
            21,
        )
        .unwrap();
        let examples = vec![
            (Vector::new(vec![0.0, 1.0]), Vector::new(vec![1.0])),
            (Vector::new(vec![1.0, 0.0]), Vector::new(vec![1.0])),
            (Vector::new(vec![1.0, 1.0]), Vector::new(vec![0.0])),
        ];
        Trainer::new(&mut network)
            .max_epochs(25)
            .logging(Logging::Silent)
            .train(&examples)
            .unwrap();
        network
    }

    #[test]
    fn save_and_load_reproduce_predictions() {
        let mut network = trained();
        let dir = tempdir().unwrap();
        let path = network.save(dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("model"));
        assert!(name.ends_with(".json"));

        let mut loaded = Network::load(&path).unwrap();
        assert_eq!(loaded.configs(), network.configs());
        for input in &[[0.25, -3.0], [1.0, 1.0], [7.5, 0.125]] {
            let input = Vector::from(&input[..]);
            assert_eq!(loaded.predict(&input).unwrap(), network.predict(&input).unwrap());
        }
    }

    #[test]
    fn file_is_an_array_of_layer_records() {
        let network = trained();
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        network.save_to(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let layers = value.as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0]["config"]["neurons"], 5);
        assert_eq!(layers[0]["weights"].as_array().unwrap().len(), 5);
        assert_eq!(layers[1]["weights"][0].as_array().unwrap().len(), 6);
    }

    #[test]
    fn rejects_short_rows() {
        let mut records = trained().to_records();
        records[1].weights[0].pop();
        match Network::from_records(&records) {
            Err(Error::MalformedModel(_)) => {}
            other => panic!("unexpected result {:?}", other),
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
        assert!(matches!(Network::load(&path), Err(Error::MalformedModel(_))));
    }

    #[test]
    fn rejects_mis_chained_layers() {
        let mut records = trained().to_records();
        records[1].config.prev_neurons = 4;
        for row in &mut records[1].weights {
            row.pop();
        }
        assert!(matches!(
            Network::from_records(&records),
            Err(Error::MalformedModel(_))
        ));
        assert!(matches!(
            Network::from_records(&[]),
            Err(Error::MalformedModel(_))
        ));
    }

    #[test]
    fn missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Network::load(dir.path().join("absent.json")),
            Err(Error::Io(_))
        ));
    }
}
