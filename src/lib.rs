extern crate chrono;
extern crate itertools;
extern crate log;
extern crate rand;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate thiserror;

pub mod activator;
pub mod config;
pub mod error;
pub mod layer;
pub mod model;
pub mod network;
pub mod trainer;
pub mod unit;
pub mod vector;

pub use activator::{Activation, Activator};
pub use config::RunConfig;
pub use error::{Error, Result};
pub use layer::{GradientRule, Layer, LayerConfig};
pub use model::LayerRecord;
pub use network::Network;
pub use trainer::{Logging, StopCondition, Trainer, TrainingReport};
pub use unit::Unit;
pub use vector::Vector;
